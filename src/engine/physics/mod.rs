// Physics system using rapier3d

pub mod body;
pub mod collision;
mod world;

pub use body::{BodyBuilder, ColliderBuilder3D, ColliderHandle, RigidBodyHandle};
pub use collision::CollisionGroups;
pub use world::{PhysicsWorld, SweepHit};

// Re-export commonly used rapier types for convenience
pub use rapier3d::prelude::{Group, Point, QueryFilter, Real, Vector};
