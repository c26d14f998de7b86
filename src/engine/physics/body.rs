use super::collision::CollisionGroups;
use rapier3d::prelude::*;

pub use rapier3d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    fn with_type(body_type: RigidBodyType) -> Self {
        Self {
            body_type,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale: if body_type == RigidBodyType::Dynamic { 1.0 } else { 0.0 },
            can_sleep: body_type == RigidBodyType::Dynamic,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self::with_type(RigidBodyType::Dynamic)
    }

    /// Create a new fixed (static) body
    pub fn new_fixed() -> Self {
        Self::with_type(RigidBodyType::Fixed)
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real, z: Real) -> Self {
        self.position = Isometry::translation(x, y, z);
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, x: Real, y: Real, z: Real) -> Self {
        self.linvel = vector![x, y, z];
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock all rotations (upright characters)
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes |= LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let mut body = RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build();

        if self.body_type == RigidBodyType::Dynamic {
            body.set_linear_damping(0.1);
            body.set_angular_damping(1.0);
        }

        body
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder3D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    density: Real,
}

impl ColliderBuilder3D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_x: Real, half_y: Real, half_z: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_x, half_y, half_z))
    }

    /// Create a sphere collider
    pub fn ball(radius: Real) -> Self {
        Self::with_shape(SharedShape::ball(radius))
    }

    /// Create an upright capsule collider (characters)
    pub fn capsule(half_height: Real, radius: Real) -> Self {
        Self::with_shape(SharedShape::capsule_y(half_height, radius))
    }

    /// Set the collision object type
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Make this a sensor (detects overlaps but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .build()
    }
}

/// Common rigid body configurations for game objects
pub mod presets {
    use super::*;

    /// Character body: dynamic, upright, never sleeps
    pub fn character_body(x: Real, y: Real, z: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y, z)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Character capsule; `half_height` is the half height of the cylinder part
    pub fn character_collider(half_height: Real, radius: Real) -> Collider {
        ColliderBuilder3D::capsule(half_height, radius)
            .collision_groups(CollisionGroups::Pawn)
            .friction(0.0) // Movement code owns horizontal velocity
            .restitution(0.0)
            .density(1.0)
            .build()
    }

    /// Floor or wall body
    pub fn static_body(x: Real, y: Real, z: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y, z).build()
    }

    /// Floor or wall collider
    pub fn static_collider(half_x: Real, half_y: Real, half_z: Real) -> Collider {
        ColliderBuilder3D::box_shape(half_x, half_y, half_z)
            .collision_groups(CollisionGroups::WorldStatic)
            .friction(0.8)
            .build()
    }

    /// Movable prop body
    pub fn prop_body(x: Real, y: Real, z: Real) -> RigidBody {
        BodyBuilder::new_dynamic().position(x, y, z).build()
    }

    /// Movable prop collider (box)
    pub fn prop_collider(half_extent: Real) -> Collider {
        ColliderBuilder3D::box_shape(half_extent, half_extent, half_extent)
            .collision_groups(CollisionGroups::WorldDynamic)
            .friction(0.6)
            .density(0.5)
            .build()
    }
}
