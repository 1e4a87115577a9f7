//! Platform riding.
//!
//! The velocity of a ridden body is measured at the character's position by
//! finite difference: each tick an anchor is dropped at the character and
//! stored in the body's local frame; next tick, if the character is still on
//! the same body, the anchor's world displacement over `dt` is the
//! connection velocity. This captures both translation and rotation of the
//! platform without needing its velocities.

use glam::Vec3;

use crate::collision::{BodyHandle, PhysicsQuery};

use super::state::ConnectionState;

impl ConnectionState {
    /// Rotate this tick's connection in and measure its velocity.
    ///
    /// `climb_override` (from the accumulator) replaces last tick's body as
    /// the previous connection, so grabbing a moving wall connects to it
    /// immediately. Bodies lighter than the character and not kinematic are
    /// ignored: the character pushes those around instead.
    pub fn update<Q: PhysicsQuery + ?Sized>(
        &mut self,
        connected: Option<BodyHandle>,
        climb_override: Option<Option<BodyHandle>>,
        position: Vec3,
        own_mass: f32,
        dt: f32,
        world: &Q,
    ) {
        self.previous = climb_override.unwrap_or(self.connected);
        self.connected = connected;
        self.velocity = Vec3::ZERO;

        let Some(body) = connected else {
            return;
        };
        let Some(body_state) = world.body_state(body) else {
            log::warn!("connected body {:?} is not in the world", body);
            return;
        };
        if !body_state.kinematic && body_state.mass < own_mass {
            return;
        }

        if self.previous == Some(body) && dt > 0.0 {
            let movement = body_state.pose.transform_point(self.local_anchor) - self.world_anchor;
            self.velocity = movement / dt;
        }
        self.world_anchor = position;
        self.local_anchor = body_state.pose.inverse_transform_point(position);
    }

    pub fn is_riding(&self) -> bool {
        self.connected.is_some() && self.connected == self.previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::CollisionWorld;
    use crate::math::Frame;
    use glam::Quat;

    const DT: f32 = 0.02;

    #[test]
    fn test_first_contact_has_no_velocity() {
        let mut world = CollisionWorld::new();
        let platform = world.add_body(Frame::IDENTITY, 10.0, true);
        let mut connection = ConnectionState::default();

        connection.update(Some(platform), None, Vec3::Y, 1.0, DT, &world);
        assert_eq!(connection.velocity, Vec3::ZERO);
        assert_eq!(connection.world_anchor, Vec3::Y);
        assert!(!connection.is_riding());
    }

    #[test]
    fn test_translating_platform_velocity() {
        let mut world = CollisionWorld::new();
        let platform = world.add_body(Frame::IDENTITY, 10.0, true);
        let mut connection = ConnectionState::default();
        let mut position = Vec3::Y;

        connection.update(Some(platform), None, position, 1.0, DT, &world);
        for tick in 1..=5 {
            let offset = Vec3::new(0.05 * tick as f32, 0.0, 0.0);
            world.set_body_pose(platform, Frame::from_translation(offset), DT);
            position = Vec3::Y + offset;
            connection.update(Some(platform), None, position, 1.0, DT, &world);
            assert!((connection.velocity - Vec3::new(2.5, 0.0, 0.0)).length() < 1e-3);
        }
        assert!(connection.is_riding());
    }

    #[test]
    fn test_rotating_platform_velocity() {
        let mut world = CollisionWorld::new();
        let platform = world.add_body(Frame::IDENTITY, 10.0, true);
        let mut connection = ConnectionState::default();
        // Standing 2 m off the rotation axis
        let position = Vec3::new(2.0, 1.0, 0.0);

        connection.update(Some(platform), None, position, 1.0, DT, &world);
        let angle = 0.01;
        world.set_body_pose(platform, Frame::new(Vec3::ZERO, Quat::from_rotation_y(angle)), DT);
        connection.update(Some(platform), None, position, 1.0, DT, &world);

        // Tangential speed = omega * r
        let expected_speed = angle / DT * 2.0;
        assert!((connection.velocity.length() - expected_speed).abs() < 1e-2);
        assert!(connection.velocity.z < 0.0);
    }

    #[test]
    fn test_light_body_is_ignored() {
        let mut world = CollisionWorld::new();
        let crate_body = world.add_body(Frame::IDENTITY, 0.5, false);
        let mut connection = ConnectionState::default();

        connection.update(Some(crate_body), None, Vec3::Y, 1.0, DT, &world);
        world.set_body_pose(crate_body, Frame::from_translation(Vec3::X), DT);
        connection.update(Some(crate_body), None, Vec3::Y, 1.0, DT, &world);
        assert_eq!(connection.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_changing_body_resets_velocity() {
        let mut world = CollisionWorld::new();
        let a = world.add_body(Frame::IDENTITY, 10.0, true);
        let b = world.add_body(Frame::IDENTITY, 10.0, true);
        let mut connection = ConnectionState::default();

        connection.update(Some(a), None, Vec3::Y, 1.0, DT, &world);
        world.set_body_pose(b, Frame::from_translation(Vec3::X), DT);
        connection.update(Some(b), None, Vec3::Y, 1.0, DT, &world);
        assert_eq!(connection.velocity, Vec3::ZERO);
        assert_eq!(connection.previous, Some(a));
    }

    #[test]
    fn test_climb_override_counts_as_previous() {
        let mut world = CollisionWorld::new();
        let wall = world.add_body(Frame::IDENTITY, 10.0, true);
        let mut connection = ConnectionState {
            local_anchor: Vec3::ZERO,
            world_anchor: Vec3::ZERO,
            ..Default::default()
        };
        world.set_body_pose(wall, Frame::from_translation(Vec3::new(0.0, 0.02, 0.0)), DT);
        connection.update(Some(wall), Some(Some(wall)), Vec3::ZERO, 1.0, DT, &world);
        assert_eq!(connection.previous, Some(wall));
        assert!((connection.velocity - Vec3::Y).length() < 1e-4);
    }
}
