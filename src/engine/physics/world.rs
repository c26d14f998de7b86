use rapier3d::parry::query::{PointQuery, ShapeCastOptions};
use rapier3d::parry::shape::Ball;
use rapier3d::prelude::*;
use std::collections::HashMap;

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier3d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier3d::prelude::ColliderHandle;

/// One blocking hit of a sphere sweep, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    pub collider: ColliderHandle,
    /// Game entity owning the collider's body, if mapped
    pub entity: Option<u64>,
    /// Distance travelled along the sweep when the hit happened
    pub distance: Real,
    /// Closest point on the hit surface
    pub point: Point<Real>,
    /// Surface normal at `point`, facing the swept sphere
    pub normal: Vector<Real>,
}

/// Physics world that manages all physics simulation
pub struct PhysicsWorld {
    /// Gravity vector (default: -9.81 m/s² in y-axis)
    gravity: Vector<Real>,

    /// Integration parameters for the physics simulation
    integration_parameters: IntegrationParameters,

    /// Physics pipeline handles collision detection and solving
    physics_pipeline: PhysicsPipeline,

    /// Island manager for sleeping bodies
    island_manager: IslandManager,

    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,

    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,

    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    /// CCD solver for fast-moving objects
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// User data mapping from handles to game entity IDs
    body_to_entity: HashMap<RigidBodyHandle, u64>,
}

impl PhysicsWorld {
    /// Create a new physics world with default settings
    pub fn new() -> Self {
        Self::with_gravity(vector![0.0, -9.81, 0.0])
    }

    /// Create a new physics world with custom gravity
    pub fn with_gravity(gravity: Vector<Real>) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        // Fixed timestep of 1/60 seconds (60 FPS)
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity,
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep.
    /// Also refreshes the query pipeline used by casts.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true, // remove attached colliders
        );
        self.body_to_entity.remove(&handle);
    }

    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Associate a game entity ID with a rigid body
    pub fn set_entity_mapping(&mut self, body_handle: RigidBodyHandle, entity_id: u64) {
        self.body_to_entity.insert(body_handle, entity_id);
    }

    /// Get the entity ID associated with a rigid body
    pub fn get_entity_id(&self, body_handle: RigidBodyHandle) -> Option<u64> {
        self.body_to_entity.get(&body_handle).copied()
    }

    fn collider_entity(&self, collider: &Collider) -> Option<u64> {
        collider.parent().and_then(|body| self.get_entity_id(body))
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        ray_origin: Point<Real>,
        ray_dir: Vector<Real>,
        max_toi: Real,
        solid: bool,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, Real)> {
        let ray = Ray::new(ray_origin, ray_dir);
        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_toi,
            solid,
            filter,
        )
    }

    /// Sweep a sphere from `origin` along `direction` for `distance` meters and
    /// collect every collider it touches, nearest first.
    ///
    /// Only colliders whose membership intersects `object_types` are reported.
    /// Colliders belonging to `ignore_entity` are skipped. Each collider is
    /// reported at most once and at most `max_hits` hits are returned.
    #[allow(clippy::too_many_arguments)]
    pub fn sweep_sphere(
        &self,
        origin: Point<Real>,
        direction: Vector<Real>,
        distance: Real,
        radius: Real,
        object_types: Group,
        ignore_entity: Option<u64>,
        max_hits: usize,
    ) -> Vec<SweepHit> {
        let mut hits: Vec<SweepHit> = Vec::new();
        if radius <= 0.0 {
            return hits;
        }

        let direction = direction.try_normalize(Real::EPSILON).unwrap_or_else(Vector::zeros);
        let distance = distance.max(0.0);
        let ball = Ball::new(radius);
        let shape_pos = Isometry::translation(origin.x, origin.y, origin.z);

        while hits.len() < max_hits {
            let predicate = |handle: ColliderHandle, collider: &Collider| {
                collider.collision_groups().memberships.intersects(object_types)
                    && !hits.iter().any(|hit| hit.collider == handle)
                    && (ignore_entity.is_none()
                        || self.collider_entity(collider) != ignore_entity)
            };
            let filter = QueryFilter::default().predicate(&predicate);

            let Some((handle, cast)) = self.query_pipeline.cast_shape(
                &self.rigid_body_set,
                &self.collider_set,
                &shape_pos,
                &direction,
                &ball,
                ShapeCastOptions {
                    max_time_of_impact: distance,
                    target_distance: 0.0,
                    stop_at_penetration: true,
                    compute_impact_geometry_on_penetration: true,
                },
                filter,
            ) else {
                break;
            };
            let Some(collider) = self.collider_set.get(handle) else {
                break;
            };

            let toi = cast.time_of_impact.clamp(0.0, distance);
            let center = origin + direction * toi;
            let projection = collider
                .shape()
                .project_point(collider.position(), &center, false);
            let offset = if projection.is_inside {
                projection.point - center
            } else {
                center - projection.point
            };
            let normal = offset
                .try_normalize(Real::EPSILON)
                .unwrap_or_else(|| -direction);

            hits.push(SweepHit {
                collider: handle,
                entity: self.collider_entity(collider),
                distance: toi,
                point: projection.point,
                normal,
            });
        }

        hits
    }

    /// Set gravity for the physics world
    pub fn set_gravity(&mut self, gravity: Vector<Real>) {
        self.gravity = gravity;
    }

    pub fn gravity(&self) -> Vector<Real> {
        self.gravity
    }

    /// Set the timestep for physics simulation
    pub fn set_timestep(&mut self, dt: Real) {
        self.integration_parameters.dt = dt;
    }

    pub fn timestep(&self) -> Real {
        self.integration_parameters.dt
    }

    pub fn num_bodies(&self) -> usize {
        self.rigid_body_set.len()
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::body::presets;
    use crate::engine::physics::collision::CollisionGroups;

    fn melee_types() -> Group {
        CollisionGroups::union(&[CollisionGroups::Pawn, CollisionGroups::WorldDynamic])
    }

    fn spawn_pawn(world: &mut PhysicsWorld, x: Real, z: Real, entity: u64) -> RigidBodyHandle {
        let mut body = presets::character_body(x, 1.0, z);
        body.set_gravity_scale(0.0, true);
        let handle = world.add_rigid_body(body);
        world.add_collider(presets::character_collider(0.55, 0.35), handle);
        world.set_entity_mapping(handle, entity);
        handle
    }

    #[test]
    fn test_gravity_default() {
        let world = PhysicsWorld::new();
        assert_eq!(world.gravity(), vector![0.0, -9.81, 0.0]);
        assert_eq!(world.timestep(), 1.0 / 60.0);
    }

    #[test]
    fn test_dynamic_body_falls() {
        let mut world = PhysicsWorld::new();
        let handle = world.add_rigid_body(presets::prop_body(0.0, 10.0, 0.0));
        world.add_collider(presets::prop_collider(0.5), handle);

        for _ in 0..30 {
            world.step();
        }
        assert!(world.get_rigid_body(handle).unwrap().translation().y < 10.0);
    }

    #[test]
    fn test_entity_mapping_removed_with_body() {
        let mut world = PhysicsWorld::new();
        let handle = spawn_pawn(&mut world, 0.0, 0.0, 7);
        assert_eq!(world.get_entity_id(handle), Some(7));

        world.remove_rigid_body(handle);
        assert_eq!(world.get_entity_id(handle), None);
        assert_eq!(world.num_bodies(), 0);
    }

    #[test]
    fn test_raycast_hits_floor() {
        let mut world = PhysicsWorld::new();
        let floor = world.add_rigid_body(presets::static_body(0.0, -0.5, 0.0));
        world.add_collider(presets::static_collider(10.0, 0.5, 10.0), floor);
        world.step();

        let hit = world.raycast(
            point![0.0, 2.0, 0.0],
            vector![0.0, -1.0, 0.0],
            10.0,
            true,
            QueryFilter::default(),
        );
        let (_, toi) = hit.expect("ray should hit the floor");
        assert!((toi - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_sweep_collects_targets_in_order() {
        let mut world = PhysicsWorld::new();
        spawn_pawn(&mut world, 0.0, 3.0, 2);
        spawn_pawn(&mut world, 0.0, 1.5, 1);
        world.step();

        let hits = world.sweep_sphere(
            point![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            5.0,
            0.5,
            melee_types(),
            None,
            8,
        );

        let entities: Vec<_> = hits.iter().map(|h| h.entity).collect();
        assert_eq!(entities, vec![Some(1), Some(2)]);
        assert!(hits[0].distance <= hits[1].distance);
        // The first pawn's front faces the sweep
        assert!(hits[0].normal.z < 0.0);
    }

    #[test]
    fn test_sweep_ignores_self() {
        let mut world = PhysicsWorld::new();
        spawn_pawn(&mut world, 0.0, 0.0, 1);
        spawn_pawn(&mut world, 0.0, 1.0, 2);
        world.step();

        let hits = world.sweep_sphere(
            point![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            0.75,
            0.75,
            melee_types(),
            Some(1),
            8,
        );

        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, Some(2));
    }

    #[test]
    fn test_sweep_filters_object_types() {
        let mut world = PhysicsWorld::new();
        let wall = world.add_rigid_body(presets::static_body(0.0, 1.0, 1.0));
        world.add_collider(presets::static_collider(2.0, 2.0, 0.2), wall);
        world.step();

        let hits = world.sweep_sphere(
            point![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            2.0,
            0.5,
            melee_types(),
            None,
            8,
        );
        assert!(hits.is_empty());

        let hits = world.sweep_sphere(
            point![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            2.0,
            0.5,
            CollisionGroups::WorldStatic.group(),
            None,
            8,
        );
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_sweep_respects_max_hits() {
        let mut world = PhysicsWorld::new();
        for i in 0..4 {
            spawn_pawn(&mut world, 0.0, 1.0 + i as Real, i as u64);
        }
        world.step();

        let hits = world.sweep_sphere(
            point![0.0, 1.0, 0.0],
            vector![0.0, 0.0, 1.0],
            10.0,
            0.5,
            melee_types(),
            None,
            2,
        );
        assert_eq!(hits.len(), 2);
    }
}
