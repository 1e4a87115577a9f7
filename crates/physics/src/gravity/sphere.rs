//! Spherical shell gravity.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::source::{linear_falloff, STANDARD_GRAVITY};

/// Gravity toward (or away from) a center point.
///
/// Radii partition space into bands, from the center outward:
///
/// | band | effect |
/// |---|---|
/// | `< inner_falloff_radius` | none |
/// | `inner_falloff_radius..inner_radius` | repels, ramping up to full strength |
/// | `inner_radius..=outer_radius` | attracts at full strength |
/// | `outer_radius..outer_falloff_radius` | attracts, ramping down to zero |
/// | `> outer_falloff_radius` | none |
///
/// The repelling core lets a character walk on the inside of a hollow
/// planet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereGravity {
    pub center: Vec3,
    pub gravity: f32,
    pub inner_falloff_radius: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub outer_falloff_radius: f32,
}

impl Default for SphereGravity {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            gravity: STANDARD_GRAVITY,
            inner_falloff_radius: 1.0,
            inner_radius: 5.0,
            outer_radius: 10.0,
            outer_falloff_radius: 15.0,
        }
    }
}

impl SphereGravity {
    /// Attracting sphere without a repelling core.
    pub fn new(center: Vec3, gravity: f32, outer_radius: f32, outer_falloff_radius: f32) -> Self {
        Self {
            center,
            gravity,
            inner_falloff_radius: 0.0,
            inner_radius: 0.0,
            outer_radius,
            outer_falloff_radius,
        }
        .normalized()
    }

    pub fn with_core(mut self, inner_falloff_radius: f32, inner_radius: f32) -> Self {
        self.inner_falloff_radius = inner_falloff_radius;
        self.inner_radius = inner_radius;
        self.normalized()
    }

    /// Enforce `0 <= inner_falloff <= inner <= outer <= outer_falloff`.
    pub fn normalized(mut self) -> Self {
        self.inner_falloff_radius = self.inner_falloff_radius.max(0.0);
        self.inner_radius = self.inner_radius.max(self.inner_falloff_radius);
        self.outer_radius = self.outer_radius.max(self.inner_radius);
        self.outer_falloff_radius = self.outer_falloff_radius.max(self.outer_radius);
        self
    }

    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        let vector = self.center - position;
        let distance = vector.length();
        if distance > self.outer_falloff_radius
            || distance < self.inner_falloff_radius
            || distance <= f32::EPSILON
        {
            return Vec3::ZERO;
        }

        let mut g = self.gravity / distance;
        if distance > self.outer_radius {
            g *= linear_falloff(distance, self.outer_radius, self.outer_falloff_radius);
        } else if distance < self.inner_radius {
            g *= -linear_falloff(distance, self.inner_radius, self.inner_falloff_radius);
        }
        vector * g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet() -> SphereGravity {
        SphereGravity::default()
    }

    #[test]
    fn test_full_strength_band_points_at_center() {
        let source = planet();
        let position = Vec3::new(0.0, 7.0, 0.0);
        let g = source.gravity_at(position);
        assert!((g.length() - STANDARD_GRAVITY).abs() < 1e-4);
        assert!((g.normalize() - Vec3::NEG_Y).length() < 1e-6);
    }

    #[test]
    fn test_zero_beyond_outer_falloff() {
        let source = planet();
        assert_eq!(source.gravity_at(Vec3::new(15.01, 0.0, 0.0)), Vec3::ZERO);
        assert_eq!(source.gravity_at(Vec3::new(0.0, -100.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_outer_band_is_continuous() {
        let source = planet();
        let at_outer = source.gravity_at(Vec3::new(10.0, 0.0, 0.0)).length();
        let just_past = source.gravity_at(Vec3::new(10.001, 0.0, 0.0)).length();
        assert!((at_outer - just_past).abs() < 0.01);

        let near_edge = source.gravity_at(Vec3::new(14.999, 0.0, 0.0)).length();
        assert!(near_edge < 0.01);

        let midway = source.gravity_at(Vec3::new(12.5, 0.0, 0.0)).length();
        assert!((midway - STANDARD_GRAVITY * 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_core_repels() {
        let source = planet();
        let outside_core = source.gravity_at(Vec3::new(5.01, 0.0, 0.0));
        let inside_core = source.gravity_at(Vec3::new(4.99, 0.0, 0.0));
        // Attraction just outside the inner radius, repulsion just inside
        assert!(outside_core.x < 0.0);
        assert!(inside_core.x > 0.0);

        // Midway through the core ramp: half strength, pointing outward
        let ramp = source.gravity_at(Vec3::new(3.0, 0.0, 0.0));
        assert!((ramp - Vec3::new(STANDARD_GRAVITY * 0.5, 0.0, 0.0)).length() < 1e-3);

        // Inside the inner falloff radius there is no gravity at all
        assert_eq!(source.gravity_at(Vec3::new(0.5, 0.0, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_center_is_never_nan() {
        let source = SphereGravity::new(Vec3::ZERO, 9.81, 10.0, 15.0);
        let g = source.gravity_at(Vec3::ZERO);
        assert_eq!(g, Vec3::ZERO);
    }

    #[test]
    fn test_normalization_orders_radii() {
        let source = SphereGravity {
            inner_falloff_radius: -2.0,
            inner_radius: 8.0,
            outer_radius: 4.0,
            outer_falloff_radius: 1.0,
            ..Default::default()
        }
        .normalized();
        assert_eq!(source.inner_falloff_radius, 0.0);
        assert_eq!(source.inner_radius, 8.0);
        assert_eq!(source.outer_radius, 8.0);
        assert_eq!(source.outer_falloff_radius, 8.0);
    }
}
