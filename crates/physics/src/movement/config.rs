//! Controller tuning.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! metric units (meters, seconds) and angles in degrees.

use serde::{Deserialize, Serialize};

use crate::collision::{Layer, LayerMask};

/// Configuration for a character controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    // ========================================================================
    // Speeds (meters/second)
    // ========================================================================
    /// Top speed on the ground and in the air.
    pub max_speed: f32,

    /// Top speed while climbing, and while walking with climb held.
    pub max_climb_speed: f32,

    /// Top speed while fully swimming.
    pub max_swim_speed: f32,

    /// Above this speed the ground snap gives up and the body flies off.
    pub max_snap_speed: f32,

    // ========================================================================
    // Accelerations (meters/second²)
    // ========================================================================
    pub max_acceleration: f32,
    pub max_air_acceleration: f32,
    pub max_climb_acceleration: f32,
    pub max_swim_acceleration: f32,

    // ========================================================================
    // Jumping
    // ========================================================================
    /// Apex height of a standing jump (meters).
    pub jump_height: f32,

    /// Extra jumps allowed while airborne.
    pub max_air_jumps: u32,

    // ========================================================================
    // Surfaces (degrees)
    // ========================================================================
    /// Steepest slope still counted as ground.
    pub max_ground_angle: f32,

    /// Steepest slope counted as ground on stair layers.
    pub max_stair_angle: f32,

    /// Most overhanging surface that can still be climbed (90..180).
    pub max_climb_angle: f32,

    /// Length of the ground snap ray (meters).
    pub probe_distance: f32,

    // ========================================================================
    // Layers
    // ========================================================================
    /// Surfaces the ground snap ray may hit.
    pub probe_mask: LayerMask,

    /// Surfaces using `max_stair_angle` instead of `max_ground_angle`.
    pub stair_mask: LayerMask,

    /// Surfaces that can be climbed.
    pub climbable_mask: LayerMask,

    /// Trigger volumes treated as water.
    pub water_mask: LayerMask,

    // ========================================================================
    // Water
    // ========================================================================
    /// Height above the body center where the submergence ray starts.
    pub submergence_offset: f32,

    /// Depth over which submergence goes from 0 to 1.
    pub submergence_range: f32,

    /// Fraction of gravity cancelled per unit of submergence.
    pub buoyancy: f32,

    /// Velocity damping per second at full submergence.
    pub water_drag: f32,

    /// Submergence at which the body starts swimming (0.01..1).
    pub swim_threshold: f32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            max_speed: 10.0,
            max_climb_speed: 2.0,
            max_swim_speed: 5.0,
            max_snap_speed: 100.0,

            max_acceleration: 10.0,
            max_air_acceleration: 1.0,
            max_climb_acceleration: 20.0,
            max_swim_acceleration: 5.0,

            jump_height: 2.0,
            max_air_jumps: 0,

            max_ground_angle: 25.0,
            max_stair_angle: 50.0,
            max_climb_angle: 140.0,
            probe_distance: 1.0,

            probe_mask: LayerMask::PROBE,
            stair_mask: Layer::STAIRS.mask(),
            climbable_mask: Layer::CLIMBABLE.mask(),
            water_mask: Layer::WATER.mask(),

            submergence_offset: 0.5,
            submergence_range: 1.0,
            buoyancy: 1.0,
            water_drag: 1.0,
            swim_threshold: 0.5,
        }
    }
}

impl ControllerConfig {
    /// Quick and floaty: double air jumps and strong air control.
    pub fn agile() -> Self {
        Self {
            max_speed: 12.0,
            max_acceleration: 20.0,
            max_air_acceleration: 6.0,
            jump_height: 3.0,
            max_air_jumps: 2,
            max_ground_angle: 35.0,
            ..Default::default()
        }
    }

    /// Slow and grounded: no air control, sinks in water.
    pub fn heavy() -> Self {
        Self {
            max_speed: 6.0,
            max_acceleration: 6.0,
            max_air_acceleration: 0.0,
            max_climb_speed: 1.0,
            jump_height: 1.0,
            buoyancy: 0.6,
            water_drag: 2.0,
            ..Default::default()
        }
    }

    /// Clamp every parameter into its valid range.
    pub fn validated(mut self) -> Self {
        self.max_speed = self.max_speed.clamp(0.0, 100.0);
        self.max_climb_speed = self.max_climb_speed.clamp(0.0, 100.0);
        self.max_swim_speed = self.max_swim_speed.clamp(0.0, 100.0);
        self.max_snap_speed = self.max_snap_speed.clamp(0.0, 100.0);

        self.max_acceleration = self.max_acceleration.clamp(0.0, 100.0);
        self.max_air_acceleration = self.max_air_acceleration.clamp(0.0, 100.0);
        self.max_climb_acceleration = self.max_climb_acceleration.clamp(0.0, 100.0);
        self.max_swim_acceleration = self.max_swim_acceleration.clamp(0.0, 100.0);

        self.jump_height = self.jump_height.clamp(0.0, 10.0);
        self.max_air_jumps = self.max_air_jumps.min(5);

        self.max_ground_angle = self.max_ground_angle.clamp(0.0, 90.0);
        self.max_stair_angle = self.max_stair_angle.clamp(0.0, 90.0);
        self.max_climb_angle = self.max_climb_angle.clamp(90.0, 180.0);
        self.probe_distance = self.probe_distance.max(0.0);

        self.submergence_offset = self.submergence_offset.max(0.0);
        self.submergence_range = self.submergence_range.max(0.01);
        self.buoyancy = self.buoyancy.max(0.0);
        self.water_drag = self.water_drag.clamp(0.0, 10.0);
        self.swim_threshold = self.swim_threshold.clamp(0.01, 1.0);
        self
    }

    /// Cosine of `max_ground_angle`.
    pub fn min_ground_dot(&self) -> f32 {
        self.max_ground_angle.to_radians().cos()
    }

    /// Cosine of `max_stair_angle`.
    pub fn min_stair_dot(&self) -> f32 {
        self.max_stair_angle.to_radians().cos()
    }

    /// Cosine of `max_climb_angle`; negative for overhangs.
    pub fn min_climb_dot(&self) -> f32 {
        self.max_climb_angle.to_radians().cos()
    }
}
