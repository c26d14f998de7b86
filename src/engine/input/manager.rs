// Input manager - Main coordination system for all input

use super::action::{Action, InputSource};
use super::config::InputConfigManager;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent, MouseButton};
use winit::keyboard::PhysicalKey;

/// Mouse motion to look-axis scale
const MOUSE_LOOK_SENSITIVITY: f32 = 0.0025;

/// Main input manager that coordinates all input for all players
pub struct InputManager {
    config: InputConfigManager,
    players: Vec<PlayerInput>,
}

impl InputManager {
    pub fn new(max_players: usize) -> Self {
        Self {
            config: InputConfigManager::new(max_players),
            players: (0..max_players).map(PlayerInput::new).collect(),
        }
    }

    /// Route a press or release from any source to every player bound to it.
    /// Key repeats are ignored.
    pub fn process_input(&mut self, source: InputSource, pressed: bool, repeat: bool) {
        if pressed && repeat {
            return;
        }

        for player in &mut self.players {
            let Some(action) = self.config.get_action(player.player_id(), source) else {
                continue;
            };
            if pressed {
                player.press(action);
            } else {
                player.release(action);
            }
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_input(
                InputSource::key(key_code),
                event.state == ElementState::Pressed,
                event.repeat,
            );
        }
    }

    /// Process a mouse button event from winit
    pub fn process_mouse_button(&mut self, state: ElementState, button: MouseButton) {
        self.process_input(
            InputSource::mouse(button),
            state == ElementState::Pressed,
            false,
        );
    }

    /// Process raw mouse motion; it drives the first player's look axis
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        if let Some(player) = self.players.first_mut() {
            player.add_look(
                delta.0 as f32 * MOUSE_LOOK_SENSITIVITY,
                delta.1 as f32 * MOUSE_LOOK_SENSITIVITY,
            );
        }
    }

    /// Update all player input states for a new frame
    pub fn update(&mut self) {
        for player in &mut self.players {
            player.update();
        }
    }

    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    pub fn player_mut(&mut self, player_id: usize) -> Option<&mut PlayerInput> {
        self.players.get_mut(player_id)
    }

    pub fn config(&self) -> &InputConfigManager {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut InputConfigManager {
        &mut self.config
    }

    /// Check if any player pressed a specific action this frame
    pub fn any_player_just_pressed(&self, action: Action) -> bool {
        self.players.iter().any(|p| p.just_pressed(action))
    }

    /// Reset all player input states
    pub fn reset_all(&mut self) {
        for player in &mut self.players {
            player.reset();
        }
    }

    pub fn num_players(&self) -> usize {
        self.players.len()
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(1)
    }
}
