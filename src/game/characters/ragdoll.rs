// Ragdoll state of the character mesh

use glam::Vec3;
use std::collections::HashSet;

use super::skeleton::PELVIS_BONE;

/// Mesh transform relative to the capsule, saved at spawn so a ragdolled
/// mesh can be put back on respawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshTransform {
    pub offset: Vec3,
    pub yaw: f32,
}

impl Default for MeshTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::ZERO,
            yaw: 0.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RagdollState {
    /// 0.0 = fully animated, 1.0 = fully simulated
    blend_weight: f32,
    /// Full ragdoll, the whole mesh simulates physics
    simulating: bool,
    /// Bones excluded from simulation during partial ragdoll
    kinematic_bones: HashSet<String>,
    mesh: MeshTransform,
    saved_mesh: MeshTransform,
}

impl RagdollState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blend_weight(&self) -> f32 {
        self.blend_weight
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn is_bone_kinematic(&self, bone: &str) -> bool {
        self.kinematic_bones.contains(bone)
    }

    pub fn mesh_transform(&self) -> MeshTransform {
        self.mesh
    }

    /// Move the mesh away from its rest pose (ragdoll drift)
    pub fn set_mesh_transform(&mut self, mesh: MeshTransform) {
        self.mesh = mesh;
    }

    /// Remember the current mesh transform as the rest pose
    pub fn save_mesh_transform(&mut self) {
        self.saved_mesh = self.mesh;
    }

    /// Blend in physics after a survived hit, keeping the pelvis upright
    pub fn enable_partial(&mut self, blend_weight: f32) {
        self.blend_weight = blend_weight.clamp(0.0, 1.0);
        self.kinematic_bones.insert(PELVIS_BONE.to_string());
    }

    /// Full ragdoll on death
    pub fn enable_full(&mut self) {
        self.simulating = true;
        self.blend_weight = 1.0;
        self.kinematic_bones.clear();
    }

    pub fn clear_blend(&mut self) {
        self.blend_weight = 0.0;
    }

    /// Back to a fully animated mesh in its saved pose
    pub fn reset(&mut self) {
        self.simulating = false;
        self.blend_weight = 0.0;
        self.kinematic_bones.clear();
        self.mesh = self.saved_mesh;
    }
}
