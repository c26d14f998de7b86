// Named sockets on the character mesh

use glam::Vec3;
use std::collections::HashMap;

use crate::core::math::{yaw_forward, yaw_right};

/// Bone name that stays kinematic during partial ragdoll
pub const PELVIS_BONE: &str = "pelvis";

/// Socket offsets relative to the capsule center, in the character's local
/// frame (x right, y up, z forward)
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    sockets: HashMap<String, Vec3>,
}

impl Skeleton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Humanoid sockets used by the standard montages
    pub fn humanoid() -> Self {
        Self::new()
            .with_socket(PELVIS_BONE, Vec3::ZERO)
            .with_socket("head", Vec3::new(0.0, 0.75, 0.05))
            .with_socket("hand_r", Vec3::new(0.3, 0.35, 0.45))
            .with_socket("hand_l", Vec3::new(-0.3, 0.35, 0.45))
            .with_socket("foot_r", Vec3::new(0.15, -0.8, 0.25))
            .with_socket("foot_l", Vec3::new(-0.15, -0.8, 0.25))
    }

    pub fn with_socket(mut self, name: &str, offset: Vec3) -> Self {
        self.sockets.insert(name.to_string(), offset);
        self
    }

    pub fn has_socket(&self, name: &str) -> bool {
        self.sockets.contains_key(name)
    }

    /// Local offset of a socket
    pub fn socket_offset(&self, name: &str) -> Option<Vec3> {
        self.sockets.get(name).copied()
    }

    /// World location of a socket for a character at `center` facing `yaw`.
    /// Unknown sockets resolve to the center, like a mesh without that socket.
    pub fn socket_location(&self, name: &str, center: Vec3, yaw: f32) -> Vec3 {
        let Some(offset) = self.socket_offset(name) else {
            log::warn!("Unknown socket '{}', using mesh origin", name);
            return center;
        };

        center + yaw_right(yaw) * offset.x + Vec3::Y * offset.y + yaw_forward(yaw) * offset.z
    }
}
