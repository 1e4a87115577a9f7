//! Built-in levels.

use std::f32::consts::FRAC_PI_4;
use std::rc::Rc;

use glam::{Quat, Vec3};
use gravwalk_physics::collision::{CollisionWorld, Layer, SphereBody};
use gravwalk_physics::gravity::{BoxGravity, GravitySource, SphereGravity, UniformGravity};
use gravwalk_physics::math::Frame;
use thiserror::Error;

use crate::environment::{
    AccelerationZone, AutomaticSlider, Buoyancy, DetectionZone, FloatingBody,
    PositionInterpolator, SlidingPlatform,
};

/// Errors selecting a level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("unknown level `{name}` (available: {available})")]
    Unknown { name: String, available: String },
}

/// A level: collision geometry, gravity and the behaviours acting in it.
#[derive(Debug)]
pub struct Level {
    /// Level identifier.
    pub id: String,

    /// Display name.
    pub name: String,

    /// Collision world for physics.
    pub world: CollisionWorld,

    /// Gravity sources, registered with the simulation's field.
    pub gravity: Vec<Rc<GravitySource>>,

    /// Character spawn position.
    pub spawn: Vec3,

    pub acceleration_zones: Vec<AccelerationZone>,
    pub platforms: Vec<SlidingPlatform>,
    pub detection_zones: Vec<DetectionZone>,
    pub floating: Vec<FloatingBody>,
}

impl Level {
    /// Names accepted by [`Level::by_name`].
    pub const NAMES: [&'static str; 5] = ["flat", "planet", "cube", "pool", "platform"];

    /// Create an empty level without gravity.
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            world: CollisionWorld::new(),
            gravity: Vec::new(),
            spawn: Vec3::ZERO,
            acceleration_zones: Vec::new(),
            platforms: Vec::new(),
            detection_zones: Vec::new(),
            floating: Vec::new(),
        }
    }

    /// Look up a built-in level.
    pub fn by_name(name: &str) -> Result<Self, LevelError> {
        match name {
            "flat" => Ok(Self::flat()),
            "planet" => Ok(Self::planet()),
            "cube" => Ok(Self::cube()),
            "pool" => Ok(Self::pool()),
            "platform" => Ok(Self::platform()),
            _ => Err(LevelError::Unknown {
                name: name.to_string(),
                available: Self::NAMES.join(", "),
            }),
        }
    }

    pub fn add_gravity(&mut self, source: impl Into<GravitySource>) {
        self.gravity.push(Rc::new(source.into()));
    }

    /// Flat ground with a climbable wall and a stair ramp.
    pub fn flat() -> Self {
        let mut level = Self::new("flat", "Flat Ground");
        level.add_gravity(UniformGravity::default());

        // Floor
        level.world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(50.0, 0.5, 50.0),
            Layer::DEFAULT,
        );

        // Climbing wall
        level.world.add_box(
            Vec3::new(10.0, 5.0, 0.0),
            Vec3::new(0.5, 5.0, 5.0),
            Layer::CLIMBABLE,
        );

        // 45 degree ramp: too steep for ground, fine as stairs
        level.world.add_oriented_box(
            Frame::new(Vec3::new(-10.0, 0.0, 0.0), Quat::from_rotation_z(-FRAC_PI_4)),
            Vec3::new(3.0, 3.0, 3.0),
            Layer::STAIRS,
        );

        level.spawn = Vec3::new(0.0, 0.5, 0.0);
        level
    }

    /// A small planet with a repelling core.
    pub fn planet() -> Self {
        let mut level = Self::new("planet", "Planetoid");
        level.add_gravity(SphereGravity::new(Vec3::ZERO, 9.81, 15.0, 20.0).with_core(1.0, 5.0));

        level.world.add_ball(Vec3::ZERO, 10.0, Layer::DEFAULT);

        level.spawn = Vec3::new(0.0, 10.5, 0.0);
        level
    }

    /// The inside of a hollow cube; every wall is a floor.
    pub fn cube() -> Self {
        let mut level = Self::new("cube", "Inside the Cube");
        level.add_gravity(
            BoxGravity::new(Frame::IDENTITY, 9.81, Vec3::splat(10.0)).with_inner(3.0, 6.0),
        );

        let wall = 10.5;
        let extent = 11.0;
        for sign in [-1.0, 1.0] {
            level.world.add_box(
                Vec3::new(sign * wall, 0.0, 0.0),
                Vec3::new(0.5, extent, extent),
                Layer::DEFAULT,
            );
            level.world.add_box(
                Vec3::new(0.0, sign * wall, 0.0),
                Vec3::new(extent, 0.5, extent),
                Layer::DEFAULT,
            );
            level.world.add_box(
                Vec3::new(0.0, 0.0, sign * wall),
                Vec3::new(extent, extent, 0.5),
                Layer::DEFAULT,
            );
        }

        level.spawn = Vec3::new(0.0, -9.5, 0.0);
        level
    }

    /// A shelf next to a pool, with a floating crate in the water.
    pub fn pool() -> Self {
        let mut level = Self::new("pool", "Pool");
        level.add_gravity(UniformGravity::default());

        // Pool bottom and the dry shelf
        level.world.add_box(
            Vec3::new(0.0, -4.5, 0.0),
            Vec3::new(30.0, 0.5, 30.0),
            Layer::DEFAULT,
        );
        level.world.add_box(
            Vec3::new(-15.0, -2.0, 0.0),
            Vec3::new(5.0, 2.0, 10.0),
            Layer::DEFAULT,
        );

        // Water surface at y = 0
        level.world.add_trigger_box(
            Frame::from_translation(Vec3::new(5.0, -2.0, 0.0)),
            Vec3::new(15.0, 2.0, 10.0),
            Layer::WATER,
            None,
        );

        let buoyancy = Buoyancy {
            buoyancy: 1.3,
            points: vec![
                Vec3::new(0.25, 0.0, 0.25),
                Vec3::new(-0.25, 0.0, 0.25),
                Vec3::new(0.25, 0.0, -0.25),
                Vec3::new(-0.25, 0.0, -0.25),
            ],
            ..Default::default()
        };
        let crate_body = SphereBody::new(Vec3::new(5.0, -1.0, 0.0), 0.5, 0.5);
        level.floating.push(FloatingBody::new(crate_body, buoyancy));

        level.spawn = Vec3::new(-15.0, 0.5, 0.0);
        level
    }

    /// A moving platform, a launch pad and a detection gate.
    pub fn platform() -> Self {
        let mut level = Self::new("platform", "Platforms");
        level.add_gravity(UniformGravity::default());

        level.world.add_box(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(30.0, 0.5, 30.0),
            Layer::DEFAULT,
        );

        // Platform shuttling along z, one metre up
        let start = Vec3::new(0.0, 0.75, 4.0);
        let end = Vec3::new(0.0, 0.75, 14.0);
        let body = level
            .world
            .add_body(Frame::from_translation(start), 100.0, true);
        level
            .world
            .attach_box(body, Frame::IDENTITY, Vec3::new(2.0, 0.25, 2.0), Layer::DEFAULT);
        level.platforms.push(SlidingPlatform {
            slider: AutomaticSlider::new(4.0).with_auto_reverse().with_smoothstep(),
            interpolator: PositionInterpolator::new(body, start, end),
        });

        // Launch pad
        let pad_frame = Frame::from_translation(Vec3::new(-6.0, 0.25, 0.0));
        let pad = level.world.add_trigger_box(
            pad_frame,
            Vec3::new(1.0, 0.5, 1.0),
            Layer::TRIGGER,
            None,
        );
        level
            .acceleration_zones
            .push(AccelerationZone::new(pad, pad_frame, 0.0, 12.0));

        // Gate
        let gate = level.world.add_trigger_box(
            Frame::from_translation(Vec3::new(6.0, 1.0, 0.0)),
            Vec3::new(1.0, 1.0, 3.0),
            Layer::TRIGGER,
            None,
        );
        level.detection_zones.push(DetectionZone::new("gate", gate));

        level.spawn = Vec3::new(0.0, 0.5, 0.0);
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gravwalk_physics::gravity::GravityField;

    fn field_for(level: &Level) -> GravityField {
        let mut field = GravityField::new();
        for source in &level.gravity {
            field.register(source);
        }
        field
    }

    #[test]
    fn test_level_creation() {
        let level = Level::new("test", "Test Level");
        assert_eq!(level.id, "test");
        assert_eq!(level.world.collider_count(), 0);
        assert!(level.gravity.is_empty());
    }

    #[test]
    fn test_every_name_loads() {
        for name in Level::NAMES {
            let level = Level::by_name(name).unwrap();
            assert_eq!(level.id, name);
            assert!(level.world.collider_count() > 0);
            assert!(!level.gravity.is_empty());
        }
    }

    #[test]
    fn test_unknown_level() {
        let err = Level::by_name("moon").unwrap_err();
        assert!(err.to_string().contains("moon"));
        assert!(err.to_string().contains("planet"));
    }

    #[test]
    fn test_cube_floor_under_spawn() {
        let level = Level::cube();
        let field = field_for(&level);
        let up = field.up_axis_at(level.spawn).unwrap();
        assert!((up - Vec3::Y).length() < 1e-5);

        // Near a side wall "down" is that wall
        let up = field.up_axis_at(Vec3::new(9.0, 0.0, 0.0)).unwrap();
        assert!((up - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_planet_up_is_radial() {
        let level = Level::planet();
        let field = field_for(&level);
        let up = field.up_axis_at(level.spawn).unwrap();
        assert!((up - Vec3::Y).length() < 1e-5);
    }
}
