//! Half-space gravity above a plane.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::Frame;

use super::source::STANDARD_GRAVITY;

/// Pulls along the frame's `-up` axis.
///
/// Full strength on and below the plane, fading linearly to zero at
/// `range` above it. Nothing beyond `range`. The test is a signed distance
/// along the normal only, so the plane is unbounded sideways and has no
/// far side cut-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneGravity {
    pub frame: Frame,
    pub gravity: f32,
    pub range: f32,
}

impl Default for PlaneGravity {
    fn default() -> Self {
        Self {
            frame: Frame::IDENTITY,
            gravity: STANDARD_GRAVITY,
            range: 1.0,
        }
    }
}

impl PlaneGravity {
    pub fn new(frame: Frame, gravity: f32, range: f32) -> Self {
        Self {
            frame,
            gravity,
            range,
        }
        .normalized()
    }

    pub fn normalized(mut self) -> Self {
        self.range = self.range.max(0.0);
        self
    }

    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        let up = self.frame.up();
        let distance = up.dot(position - self.frame.translation);
        if distance > self.range {
            return Vec3::ZERO;
        }
        let mut g = -self.gravity;
        if distance > 0.0 {
            g *= 1.0 - distance / self.range;
        }
        up * g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::PI;

    #[test]
    fn test_full_strength_on_and_below_plane() {
        let source = PlaneGravity::new(Frame::IDENTITY, 9.81, 4.0);
        assert_eq!(source.gravity_at(Vec3::ZERO), Vec3::new(0.0, -9.81, 0.0));
        assert_eq!(
            source.gravity_at(Vec3::new(3.0, -50.0, 2.0)),
            Vec3::new(0.0, -9.81, 0.0)
        );
    }

    #[test]
    fn test_fades_to_zero_at_range() {
        let source = PlaneGravity::new(Frame::IDENTITY, 9.81, 4.0);
        let half = source.gravity_at(Vec3::new(0.0, 2.0, 0.0));
        assert!((half.y + 9.81 * 0.5).abs() < 1e-5);
        assert!(source.gravity_at(Vec3::new(0.0, 4.0, 0.0)).length() < 1e-5);
        assert_eq!(source.gravity_at(Vec3::new(0.0, 4.01, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_zero_range_never_divides() {
        let source = PlaneGravity::new(Frame::IDENTITY, 9.81, -1.0);
        assert_eq!(source.range, 0.0);
        assert_eq!(source.gravity_at(Vec3::new(0.0, 0.5, 0.0)), Vec3::ZERO);
        assert_eq!(source.gravity_at(Vec3::ZERO), Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn test_ceiling_plane_pulls_up() {
        let frame = Frame::new(Vec3::new(0.0, 10.0, 0.0), Quat::from_rotation_x(PI));
        let source = PlaneGravity::new(frame, 9.81, 2.0);
        let g = source.gravity_at(Vec3::new(0.0, 9.5, 0.0));
        assert!(g.y > 0.0);
    }
}
