// Input handling system
//
// Translates keyboard and mouse input into game actions per player, with
// remappable bindings.
//
// ## Architecture
//
// - `action`: Defines game actions and default key bindings
// - `player`: Per-player input state management
// - `config`: Input configuration and remapping system
// - `manager`: Main input manager coordinating everything
//
// ## Usage Example
//
// ```rust,ignore
// use blade_chain::engine::input::{Action, InputManager};
//
// let mut input = InputManager::new(1);
//
// // In your event loop, forward winit events
// input.process_keyboard_event(&key_event);
// input.process_mouse_button(state, button);
//
// // Query input state during the fixed update
// if let Some(player) = input.player(0) {
//     if player.just_pressed(Action::ComboAttack) {
//         // Start or buffer a combo attack
//     }
//     let (right, forward) = player.get_direction();
// }
//
// // At the end of each update, roll the frame state over
// input.update();
// ```

pub mod action;
pub mod config;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::{InputConfig, InputConfigManager};
pub use manager::InputManager;
pub use player::PlayerInput;
