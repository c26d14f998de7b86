/// Game loop timing and control system
///
/// Implements a fixed timestep game loop. Gameplay reads time from the
/// simulation clock, which only moves forward by whole fixed steps.
use std::time::{Duration, Instant};

/// Target simulation rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667); // ~1/60 second

/// Maximum number of simulation steps per frame to prevent spiral of death
const MAX_PHYSICS_STEPS: u32 = 5;

/// Monotonic simulation clock (seconds since the world started)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    seconds: f32,
}

impl SimClock {
    pub fn new() -> Self {
        Self { seconds: 0.0 }
    }

    /// Current world time in seconds
    pub fn now(&self) -> f32 {
        self.seconds
    }

    /// Advance the clock; negative deltas are ignored
    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 {
            self.seconds += dt;
        }
    }
}

/// Game loop timing state
pub struct GameLoop {
    /// Accumulated time for fixed timestep updates
    accumulator: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Whether the game is paused
    paused: bool,

    /// Current frame number
    frame_count: u64,

    /// Total updates executed
    update_count: u64,

    /// World time, advanced once per fixed update
    clock: SimClock,
}

impl GameLoop {
    /// Create a new game loop
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            update_count: 0,
            clock: SimClock::new(),
        }
    }

    /// Begin a new frame measured against the wall clock,
    /// returns the number of fixed updates to run
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.begin_frame_with(frame_time)
    }

    /// Begin a new frame with an explicit frame duration (headless runs, tests)
    pub fn begin_frame_with(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        // If paused, don't accumulate time for updates
        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_PHYSICS_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        updates
    }

    /// Run one fixed update: advances world time and returns the new time
    pub fn fixed_update(&mut self) -> f32 {
        self.update_count += 1;
        self.clock.advance(FIXED_TIMESTEP);
        self.clock.now()
    }

    /// Get the fixed timestep for simulation updates (in seconds)
    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Current world time in seconds
    pub fn world_time(&self) -> f32 {
        self.clock.now()
    }

    /// Get the simulation clock
    pub fn clock(&self) -> SimClock {
        self.clock
    }

    /// Get the interpolation alpha between simulation steps
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    /// Get total number of frames begun
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of updates executed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Check if game is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Pause the game
    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused at t={:.3}", self.clock.now());
        }
    }

    /// Resume the game
    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed at t={:.3}", self.clock.now());
        }
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
