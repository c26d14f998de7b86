// Gameplay: combat rules, characters and the arena that runs them

pub mod arena;
pub mod characters;
pub mod combat;
