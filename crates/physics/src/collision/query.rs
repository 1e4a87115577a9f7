//! Engine-facing interface.
//!
//! The character controller never talks to a concrete physics engine. It
//! reads contacts handed to it as [`Collision`] values, probes the world
//! through [`PhysicsQuery`] and drives its body through [`ControlledBody`].
//! [`CollisionWorld`](super::CollisionWorld) and
//! [`SphereBody`](super::SphereBody) are the reference implementations.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::Frame;

use super::layers::{Layer, LayerMask};

/// Handle to a rigid body known to the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// Whether a query reports trigger volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TriggerInteraction {
    /// Trigger volumes are invisible to the query.
    #[default]
    Ignore,
    /// Trigger volumes are hit like solid geometry.
    Collide,
}

/// Closest hit of a ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance from the ray origin to the hit point.
    pub distance: f32,
    pub point: Vec3,
    /// Outward surface normal at the hit point.
    pub normal: Vec3,
    /// Body the hit collider is attached to, `None` for static geometry.
    pub body: Option<BodyHandle>,
    pub layer: Layer,
}

/// Snapshot of a rigid body's simulation state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub pose: Frame,
    pub mass: f32,
    pub kinematic: bool,
    pub sleeping: bool,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

/// One collision event: all contact normals against a single collider.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Collision {
    /// Body the other collider is attached to, `None` for static geometry.
    pub body: Option<BodyHandle>,
    pub layer: Layer,
    /// Outward surface normals of the other collider, one per contact point.
    pub normals: Vec<Vec3>,
}

impl Collision {
    pub fn new(body: Option<BodyHandle>, layer: Layer, normals: Vec<Vec3>) -> Self {
        Self {
            body,
            layer,
            normals,
        }
    }

    /// Single-contact collision against static geometry.
    pub fn static_contact(layer: Layer, normal: Vec3) -> Self {
        Self::new(None, layer, vec![normal])
    }
}

/// Overlap between the controlled body and a trigger volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerContact {
    pub body: Option<BodyHandle>,
    pub layer: Layer,
}

/// Read-only queries against the physics world.
pub trait PhysicsQuery {
    /// Closest hit along a ray, if any.
    ///
    /// `direction` need not be normalized; a zero direction never hits.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        triggers: TriggerInteraction,
    ) -> Option<RayHit>;

    /// Current state of a body, `None` if the handle is stale.
    fn body_state(&self, body: BodyHandle) -> Option<BodyState>;
}

/// The rigid body a character controller drives.
pub trait ControlledBody {
    fn position(&self) -> Vec3;
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    fn mass(&self) -> f32;
}
