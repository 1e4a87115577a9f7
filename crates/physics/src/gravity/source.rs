//! The closed set of gravity source kinds.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cuboid::BoxGravity;
use super::plane::PlaneGravity;
use super::sphere::SphereGravity;

/// Standard gravity magnitude (m/s²).
pub const STANDARD_GRAVITY: f32 = 9.81;

/// A volume that contributes acceleration to the gravity field.
///
/// Each variant is a pure function of the query point. The returned vector's
/// direction is the pull direction and its length is the strength; outside
/// the source's influence it is exactly zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GravitySource {
    Uniform(UniformGravity),
    Box(BoxGravity),
    Sphere(SphereGravity),
    Plane(PlaneGravity),
}

impl GravitySource {
    /// Acceleration contributed at `position`.
    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        match self {
            Self::Uniform(source) => source.acceleration,
            Self::Box(source) => source.gravity_at(position),
            Self::Sphere(source) => source.gravity_at(position),
            Self::Plane(source) => source.gravity_at(position),
        }
    }

    /// Short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Uniform(_) => "uniform",
            Self::Box(_) => "box",
            Self::Sphere(_) => "sphere",
            Self::Plane(_) => "plane",
        }
    }
}

impl From<UniformGravity> for GravitySource {
    fn from(source: UniformGravity) -> Self {
        Self::Uniform(source)
    }
}

impl From<BoxGravity> for GravitySource {
    fn from(source: BoxGravity) -> Self {
        Self::Box(source)
    }
}

impl From<SphereGravity> for GravitySource {
    fn from(source: SphereGravity) -> Self {
        Self::Sphere(source)
    }
}

impl From<PlaneGravity> for GravitySource {
    fn from(source: PlaneGravity) -> Self {
        Self::Plane(source)
    }
}

/// Constant acceleration everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformGravity {
    pub acceleration: Vec3,
}

impl Default for UniformGravity {
    fn default() -> Self {
        Self {
            acceleration: Vec3::new(0.0, -STANDARD_GRAVITY, 0.0),
        }
    }
}

impl UniformGravity {
    pub fn new(acceleration: Vec3) -> Self {
        Self { acceleration }
    }
}

/// Strength multiplier for a linear falloff band.
///
/// 1.0 at `full_distance`, 0.0 at `zero_distance`. The band may run either
/// way (inward bands have `zero_distance < full_distance`). Callers only
/// evaluate it inside the band; an empty band yields full strength.
#[inline]
pub(crate) fn linear_falloff(distance: f32, full_distance: f32, zero_distance: f32) -> f32 {
    let width = zero_distance - full_distance;
    if width.abs() <= f32::EPSILON {
        return 1.0;
    }
    1.0 - (distance - full_distance) / width
}
