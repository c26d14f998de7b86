// Character system
//
// This module contains everything related to melee characters:
// - Character entity and management
// - Character stats and movement tuning
// - Movement state machine
// - Skeleton sockets, ragdoll blending and the standard attack montages

pub mod character;
pub mod montages;
pub mod ragdoll;
pub mod skeleton;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use character::{Character, CharacterId, CharacterManager, SpawnError, PLAYER_TAG};
pub use montages::{standard_player, WEAPON_SOCKET};
pub use ragdoll::{MeshTransform, RagdollState};
pub use skeleton::{Skeleton, PELVIS_BONE};
pub use state::{MovementState, MovementStateMachine};
pub use stats::{CharacterStats, BASE_STATS};
