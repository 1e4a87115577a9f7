//! Collision interface and reference world.
//!
//! # Key Types
//!
//! - [`PhysicsQuery`] / [`ControlledBody`]: what the character controller
//!   needs from a physics engine
//! - [`Collision`]: contact normals against one collider, handed to the
//!   controller once per tick
//! - [`CollisionWorld`]: parry3d-backed world implementing [`PhysicsQuery`]
//! - [`SphereBody`]: dynamic sphere integrated against a [`CollisionWorld`]

mod body;
mod layers;
mod query;
mod world;

pub use body::{SphereBody, StepContacts, CONTACT_SKIN};
pub use layers::{Layer, LayerMask};
pub use query::{
    BodyHandle, BodyState, Collision, ControlledBody, PhysicsQuery, RayHit, TriggerContact,
    TriggerInteraction,
};
pub use world::{Body, Collider, ColliderId, CollisionWorld, SphereContact, TriggerOverlap};
