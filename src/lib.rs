// Blade Chain - third-person melee character simulation
//
// - `core`: math helpers
// - `engine`: game loop, montage playback, input, physics
// - `game`: combat, characters and the arena that ties them together

pub mod core;
pub mod engine;
pub mod game;
