//! Launch pads and lifts.

use glam::Vec3;
use gravwalk_physics::collision::ColliderId;
use gravwalk_physics::math::{move_towards, Frame};
use serde::{Deserialize, Serialize};

/// Trigger volume that drives bodies along its local up axis.
///
/// With zero `acceleration` a body is set to `speed` the moment it enters;
/// otherwise it is accelerated toward `speed` every tick it stays inside.
/// Bodies already moving up faster than `speed` are left alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccelerationZone {
    /// Trigger collider marking the zone.
    pub collider: ColliderId,
    /// Zone orientation; velocity is driven along `frame.up()`.
    pub frame: Frame,
    pub acceleration: f32,
    pub speed: f32,
}

impl AccelerationZone {
    pub fn new(collider: ColliderId, frame: Frame, acceleration: f32, speed: f32) -> Self {
        Self {
            collider,
            frame,
            acceleration: acceleration.max(0.0),
            speed: speed.max(0.0),
        }
    }

    /// Whether a body overlapping the zone is driven this tick.
    pub fn acts_on(&self, entering: bool) -> bool {
        entering || self.acceleration > 0.0
    }

    /// Drive `velocity` toward the zone speed, in the zone's local frame.
    ///
    /// Returns `None` when the body is already fast enough.
    pub fn accelerate(&self, velocity: Vec3, dt: f32) -> Option<Vec3> {
        let mut local = self.frame.inverse_transform_direction(velocity);
        if local.y >= self.speed {
            return None;
        }
        local.y = if self.acceleration > 0.0 {
            move_towards(local.y, self.speed, self.acceleration * dt)
        } else {
            self.speed
        };
        Some(self.frame.transform_direction(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    const DT: f32 = 0.02;

    #[test]
    fn test_instant_launch() {
        let zone = AccelerationZone::new(ColliderId(0), Frame::IDENTITY, 0.0, 10.0);
        let velocity = zone.accelerate(Vec3::new(2.0, -1.0, 0.0), DT).unwrap();
        assert_eq!(velocity, Vec3::new(2.0, 10.0, 0.0));
        assert!(zone.acts_on(true));
        assert!(!zone.acts_on(false));
    }

    #[test]
    fn test_gradual_lift() {
        let zone = AccelerationZone::new(ColliderId(0), Frame::IDENTITY, 5.0, 3.0);
        let velocity = zone.accelerate(Vec3::ZERO, DT).unwrap();
        assert!((velocity.y - 0.1).abs() < 1e-6);
        assert!(zone.acts_on(false));
    }

    #[test]
    fn test_never_slows_faster_body() {
        let zone = AccelerationZone::new(ColliderId(0), Frame::IDENTITY, 5.0, 3.0);
        for speed in [3.0, 3.5, 20.0] {
            assert!(zone.accelerate(Vec3::new(1.0, speed, 0.0), DT).is_none());
        }
    }

    #[test]
    fn test_tilted_zone_uses_local_up() {
        // Rotated so local up points along world +X
        let frame = Frame::new(Vec3::ZERO, Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2));
        let zone = AccelerationZone::new(ColliderId(0), frame, 0.0, 8.0);

        let velocity = zone.accelerate(Vec3::new(0.0, -3.0, 0.0), DT).unwrap();
        assert!((velocity - Vec3::new(8.0, -3.0, 0.0)).length() < 1e-4);
    }
}
