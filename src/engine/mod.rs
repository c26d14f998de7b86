// Engine modules: game loop, animation, input, physics

pub mod animation;
pub mod game_loop;
pub mod input;
pub mod physics;
