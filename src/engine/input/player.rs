// Per-player input state management

use super::action::Action;
use std::collections::HashSet;

/// Represents the input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    player_id: usize,

    /// Actions that are currently pressed
    pressed: HashSet<Action>,

    /// Actions that were pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were released this frame (release events)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous frame
    previous_pressed: HashSet<Action>,

    /// Look delta accumulated this frame (yaw, pitch)
    look: (f32, f32),
}

impl PlayerInput {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            previous_pressed: HashSet::new(),
            look: (0.0, 0.0),
        }
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple frames)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Accumulate a look delta (mouse motion, right stick)
    pub fn add_look(&mut self, yaw: f32, pitch: f32) {
        self.look.0 += yaw;
        self.look.1 += pitch;
    }

    /// Look delta accumulated this frame as (yaw, pitch)
    pub fn look_axis(&self) -> (f32, f32) {
        self.look
    }

    /// Update input state for a new frame
    /// Call this once per frame after the frame's input has been consumed
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
        self.look = (0.0, 0.0);
    }

    /// Reset all input state
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed.clear();
        self.look = (0.0, 0.0);
    }

    /// Get all currently pressed actions
    pub fn get_pressed_actions(&self) -> Vec<Action> {
        self.pressed.iter().copied().collect()
    }

    /// Get directional movement input, each axis in -1.0..=1.0
    /// Returns (right, forward)
    pub fn get_direction(&self) -> (f32, f32) {
        let mut right = 0.0;
        let mut forward = 0.0;

        if self.is_pressed(Action::MoveLeft) {
            right -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            right += 1.0;
        }
        if self.is_pressed(Action::MoveBackward) {
            forward -= 1.0;
        }
        if self.is_pressed(Action::MoveForward) {
            forward += 1.0;
        }

        (right, forward)
    }
}
