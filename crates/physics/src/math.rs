//! Vector helpers shared by the gravity and movement code.
//!
//! Everything here guards against degenerate input (zero-length vectors,
//! zero-width ranges) by returning a neutral value instead of NaN.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Squared length below which a vector is treated as zero.
pub const DEGENERATE_LENGTH_SQUARED: f32 = 1e-12;

/// A rigid transform: rotation followed by translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// World-space origin.
    pub translation: Vec3,
    /// World-space orientation.
    pub rotation: Quat,
}

impl Default for Frame {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Frame {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            rotation: Quat::IDENTITY,
        }
    }

    /// Local point to world space.
    #[inline]
    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * point
    }

    /// World point to local space.
    #[inline]
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation.inverse() * (point - self.translation)
    }

    /// Local direction to world space (no translation, no scale).
    #[inline]
    pub fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation * direction
    }

    /// World direction to local space.
    #[inline]
    pub fn inverse_transform_direction(&self, direction: Vec3) -> Vec3 {
        self.rotation.inverse() * direction
    }

    /// The frame's local +Y axis in world space.
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Compose `self * child`: `child` expressed in this frame.
    pub fn mul_frame(&self, child: &Frame) -> Frame {
        Frame {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }
}

/// Project `direction` onto the plane with the given normal and normalize.
///
/// Returns `Vec3::ZERO` when the direction is parallel to the normal.
pub fn project_direction_on_plane(direction: Vec3, normal: Vec3) -> Vec3 {
    (direction - normal * direction.dot(normal))
        .try_normalize()
        .unwrap_or(Vec3::ZERO)
}

/// Clamp the length of a vector without changing its direction.
pub fn clamp_magnitude(vector: Vec3, max_length: f32) -> Vec3 {
    let length_squared = vector.length_squared();
    if length_squared > max_length * max_length && length_squared > DEGENERATE_LENGTH_SQUARED {
        vector * (max_length / length_squared.sqrt())
    } else {
        vector
    }
}

/// Move `current` toward `target` by at most `max_delta`.
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let diff = target - current;
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

/// Linear interpolation without clamping `t`.
#[inline]
pub fn lerp_unclamped(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Smoothstep on [0, 1].
#[inline]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_project_direction_on_plane() {
        let projected = project_direction_on_plane(Vec3::new(1.0, 1.0, 0.0), Vec3::Y);
        assert!((projected - Vec3::X).length() < 1e-6);

        // Parallel to the normal collapses to zero instead of NaN
        let degenerate = project_direction_on_plane(Vec3::Y, Vec3::Y);
        assert_eq!(degenerate, Vec3::ZERO);
    }

    #[test]
    fn test_clamp_magnitude() {
        let clamped = clamp_magnitude(Vec3::new(3.0, 4.0, 0.0), 1.0);
        assert!((clamped.length() - 1.0).abs() < 1e-6);

        let untouched = clamp_magnitude(Vec3::new(0.3, 0.0, 0.0), 1.0);
        assert_eq!(untouched, Vec3::new(0.3, 0.0, 0.0));
    }

    #[test]
    fn test_move_towards() {
        assert_eq!(move_towards(0.0, 10.0, 3.0), 3.0);
        assert_eq!(move_towards(9.0, 10.0, 3.0), 10.0);
        assert_eq!(move_towards(0.0, -10.0, 3.0), -3.0);
    }

    #[test]
    fn test_frame_round_trip() {
        let frame = Frame::new(Vec3::new(1.0, 2.0, 3.0), Quat::from_rotation_z(FRAC_PI_2));
        let local = Vec3::new(1.0, 0.0, 0.0);
        let world = frame.transform_point(local);
        assert!((world - Vec3::new(1.0, 3.0, 3.0)).length() < 1e-5);
        assert!((frame.inverse_transform_point(world) - local).length() < 1e-5);
        assert!((frame.up() - Vec3::NEG_X).length() < 1e-5);
    }
}
