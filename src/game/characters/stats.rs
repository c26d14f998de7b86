// Character stats - every character shares one movement and health profile
// Differentiation comes from attack configs, not base stats

/// Fixed character stats (meters, seconds, degrees)
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterStats {
    // Movement
    /// Max ground speed while walking
    pub walk_speed: f32,
    /// Max ground speed while the run button is held
    pub run_speed: f32,
    /// Ground speed floor for very small analog input
    pub min_analog_walk_speed: f32,
    /// Horizontal acceleration toward the input direction
    pub max_acceleration: f32,
    /// Deceleration on the ground with no input
    pub braking_walking: f32,
    /// Deceleration in the air with no input
    pub braking_falling: f32,
    /// Upward velocity applied when jumping
    pub jump_velocity: f32,
    /// Share of `max_acceleration` available in the air (0.0 = none, 1.0 = full)
    pub air_control: f32,
    /// How fast the character turns toward its movement direction
    pub rotation_rate_degrees: f32,

    // Combat
    pub max_hp: f32,
    /// Ragdoll blend weight used when a hit is survived
    pub partial_ragdoll_blend: f32,

    // Dimensions (for physics collider)
    pub capsule_radius: f32,
    /// Half of the full capsule height, caps included
    pub capsule_half_height: f32,
    /// Extra ray length below the capsule for ground detection
    pub ground_probe_distance: f32,
}

/// The ONE character stats profile
pub const BASE_STATS: CharacterStats = CharacterStats {
    walk_speed: 4.0,
    run_speed: 7.5,
    min_analog_walk_speed: 0.2,
    max_acceleration: 20.0,
    braking_walking: 20.0,
    braking_falling: 15.0,
    jump_velocity: 5.0,
    air_control: 0.35,
    rotation_rate_degrees: 500.0,

    max_hp: 5.0,
    partial_ragdoll_blend: 0.5,

    capsule_radius: 0.35,
    capsule_half_height: 0.9,
    ground_probe_distance: 0.1,
};

impl Default for CharacterStats {
    fn default() -> Self {
        BASE_STATS
    }
}

impl CharacterStats {
    pub fn standard() -> Self {
        BASE_STATS
    }

    /// Half height of the cylinder between the capsule caps
    pub fn capsule_cylinder_half_height(&self) -> f32 {
        (self.capsule_half_height - self.capsule_radius).max(0.0)
    }

    pub fn rotation_rate_radians(&self) -> f32 {
        self.rotation_rate_degrees.to_radians()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_stats() {
        let stats = CharacterStats::default();
        assert_eq!(stats.walk_speed, 4.0);
        assert_eq!(stats.run_speed, 7.5);
        assert_eq!(stats.max_hp, 5.0);
        assert_eq!(stats, CharacterStats::standard());
    }

    #[test]
    fn test_capsule_dimensions() {
        let stats = CharacterStats::standard();
        assert_relative_eq!(stats.capsule_cylinder_half_height(), 0.55);
    }

    #[test]
    fn test_rotation_rate() {
        let stats = CharacterStats::standard();
        assert_relative_eq!(stats.rotation_rate_radians(), 500.0_f32.to_radians());
    }
}
