// Melee hit detection contract and its rapier-backed implementation

use glam::Vec3;

use super::damage::ActorId;
use crate::core::math::{from_vector, to_point, to_vector};
use crate::engine::physics::{CollisionGroups, Group, PhysicsWorld};

/// A sphere sweep along the attacker's forward vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepQuery {
    pub origin: Vec3,
    /// Sweep direction, normalized by the tester
    pub forward: Vec3,
    pub distance: f32,
    pub radius: f32,
    /// Actor whose colliders are never reported
    pub ignore: Option<ActorId>,
    pub max_hits: usize,
}

impl SweepQuery {
    /// World-space end point of the sweep
    pub fn end(&self) -> Vec3 {
        self.origin + self.forward.normalize_or_zero() * self.distance
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeleeHit {
    pub actor: ActorId,
    pub impact_point: Vec3,
    /// Surface normal of the hit, facing the attacker
    pub impact_normal: Vec3,
}

/// World query used by melee traces. Hits come back nearest first, one per
/// actor collider, limited to pawns and movable props.
pub trait MeleeHitTester {
    fn sweep(&self, query: &SweepQuery) -> Vec<MeleeHit>;
}

/// Object types a melee trace can hit
pub fn melee_object_types() -> Group {
    CollisionGroups::union(&[CollisionGroups::Pawn, CollisionGroups::WorldDynamic])
}

impl MeleeHitTester for PhysicsWorld {
    fn sweep(&self, query: &SweepQuery) -> Vec<MeleeHit> {
        self.sweep_sphere(
            to_point(query.origin),
            to_vector(query.forward),
            query.distance,
            query.radius,
            melee_object_types(),
            query.ignore,
            query.max_hits,
        )
        .into_iter()
        .filter_map(|hit| {
            // Colliders without an actor behind them cannot take damage
            let actor = hit.entity?;
            Some(MeleeHit {
                actor,
                impact_point: from_vector(&hit.point.coords),
                impact_normal: from_vector(&hit.normal),
            })
        })
        .collect()
    }
}
