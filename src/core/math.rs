// Math utilities and helper functions

use glam::Vec3;
use rapier3d::prelude::{point, vector, Point, Real, Vector};

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Check if two f32 values are approximately equal
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

/// Horizontal forward direction for a yaw angle (radians, 0 = +Z)
pub fn yaw_forward(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Horizontal right direction for a yaw angle (radians, 0 = +X)
pub fn yaw_right(yaw: f32) -> Vec3 {
    Vec3::Y.cross(yaw_forward(yaw))
}

/// Yaw angle of a horizontal direction (inverse of `yaw_forward`)
pub fn yaw_of(direction: Vec3) -> f32 {
    direction.x.atan2(direction.z)
}

/// Wrap an angle into [-PI, PI)
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    (angle + PI).rem_euclid(TAU) - PI
}

/// Rotate `current` toward `target` by at most `max_step` radians, taking the short way round
pub fn rotate_towards(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_step {
        wrap_angle(target)
    } else {
        wrap_angle(current + max_step * delta.signum())
    }
}

/// Convert a glam vector to a rapier vector
pub fn to_vector(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

/// Convert a glam vector to a rapier point
pub fn to_point(v: Vec3) -> Point<Real> {
    point![v.x, v.y, v.z]
}

/// Convert a rapier vector to a glam vector
pub fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(5.0, 0.0, 10.0), 5.0);
        assert_eq!(clamp(-5.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(15.0, 0.0, 10.0), 10.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn test_approx_equal() {
        assert!(approx_equal(1.0, 1.00001, 0.0001));
        assert!(!approx_equal(1.0, 1.1, 0.01));
    }

    #[test]
    fn test_yaw_axes() {
        let forward = yaw_forward(0.0);
        let right = yaw_right(0.0);
        assert_relative_eq!(forward.z, 1.0);
        assert_relative_eq!(right.x, 1.0);
        assert_relative_eq!(forward.dot(right), 0.0);

        let quarter = yaw_forward(FRAC_PI_2);
        assert_relative_eq!(quarter.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(yaw_of(quarter), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn test_rotate_towards_short_way() {
        // From just below +PI to just above -PI is a small step, not a full turn
        let current = PI - 0.1;
        let target = -PI + 0.1;
        let next = rotate_towards(current, target, 0.05);
        assert!(approx_equal(wrap_angle(next - current), 0.05, 1e-4));

        assert_relative_eq!(rotate_towards(0.0, 0.2, 1.0), 0.2);
    }

    #[test]
    fn test_vector_conversions() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        assert_eq!(from_vector(&to_vector(v)), v);
        let p = to_point(v);
        assert_eq!((p.x, p.y, p.z), (1.0, -2.0, 3.5));
    }
}
