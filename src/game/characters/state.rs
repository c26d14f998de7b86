// Character movement state machine

/// Represents the current movement state of a character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementState {
    /// Standing still on ground
    #[default]
    Idle,
    /// Moving on ground at walk speed
    Walking,
    /// Moving on ground with the run button held
    Running,
    /// In the air, moving upward
    Jumping,
    /// In the air, moving downward
    Falling,
    /// Movement disabled, ragdolling
    Dead,
}

impl MovementState {
    /// Check if the character is on the ground
    pub fn is_grounded(&self) -> bool {
        matches!(self, Self::Idle | Self::Walking | Self::Running)
    }

    /// Check if the character is in the air
    pub fn is_airborne(&self) -> bool {
        matches!(self, Self::Jumping | Self::Falling)
    }

    pub fn can_move(&self) -> bool {
        !matches!(self, Self::Dead)
    }

    pub fn can_jump(&self) -> bool {
        self.is_grounded()
    }
}

/// Minimum horizontal speed that counts as moving
const MOVING_SPEED: f32 = 0.1;

/// State machine that handles movement state transitions
#[derive(Debug, Default)]
pub struct MovementStateMachine {
    current_state: MovementState,
    previous_state: MovementState,
    state_time: f32,
}

impl MovementStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MovementState {
        self.current_state
    }

    pub fn previous_state(&self) -> MovementState {
        self.previous_state
    }

    /// Get time spent in current state
    pub fn state_time(&self) -> f32 {
        self.state_time
    }

    /// Transition to a new state
    pub fn transition(&mut self, new_state: MovementState) {
        if self.current_state != new_state {
            log::debug!("Movement {:?} -> {:?}", self.current_state, new_state);
            self.previous_state = self.current_state;
            self.current_state = new_state;
            self.state_time = 0.0;
        }
    }

    /// Update the state machine from the latest physics state (called every step)
    pub fn update(
        &mut self,
        dt: f32,
        is_grounded: bool,
        horizontal_speed: f32,
        velocity_y: f32,
        is_running: bool,
    ) {
        self.state_time += dt;

        // Don't update if dead
        if self.current_state == MovementState::Dead {
            return;
        }

        if is_grounded {
            // Airborne to grounded transitions are handled by set_grounded()
            if self.current_state.is_grounded() {
                self.transition(Self::ground_state(horizontal_speed, is_running));
            }
        } else {
            match self.current_state {
                MovementState::Jumping if velocity_y <= 0.0 => {
                    self.transition(MovementState::Falling);
                }
                MovementState::Idle | MovementState::Walking | MovementState::Running => {
                    // Walked off ledge
                    self.transition(MovementState::Falling);
                }
                _ => {}
            }
        }
    }

    fn ground_state(horizontal_speed: f32, is_running: bool) -> MovementState {
        if horizontal_speed <= MOVING_SPEED {
            MovementState::Idle
        } else if is_running {
            MovementState::Running
        } else {
            MovementState::Walking
        }
    }

    /// Called when character jumps
    pub fn jump(&mut self) {
        if self.current_state.can_jump() {
            self.transition(MovementState::Jumping);
        }
    }

    /// Called when character lands on ground
    pub fn set_grounded(&mut self, horizontal_speed: f32, is_running: bool) {
        if self.current_state.is_airborne() {
            self.transition(Self::ground_state(horizontal_speed, is_running));
        }
    }

    pub fn die(&mut self) {
        self.transition(MovementState::Dead);
    }

    pub fn respawn(&mut self) {
        self.transition(MovementState::Falling);
    }
}
