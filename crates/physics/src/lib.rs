//! Gravwalk Physics
//!
//! A rigid-body character controller that walks on arbitrary gravity: the
//! inside and outside of boxes, around planets, on planes and in water.
//!
//! # Architecture
//!
//! The crate is split into four systems:
//!
//! - **Gravity**: sums weakly-held gravity sources into an acceleration and
//!   an up axis at any point
//! - **Contact**: buckets the engine's contact normals into ground, steep
//!   and climb contacts for one tick
//! - **Movement**: resolves the locomotion mode and solves the character's
//!   new velocity
//! - **Collision**: the interface the controller needs from a physics
//!   engine, plus a parry3d-backed reference world implementing it
//!
//! # Design Principles
//!
//! 1. **Engine agnostic**: the controller only sees [`Collision`] batches,
//!    [`PhysicsQuery`] and [`ControlledBody`]
//! 2. **Fixed tick**: everything runs to completion inside one tick
//! 3. **Degenerate input is not an error**: zero gravity, zero normals and
//!    empty input fall back to the previous tick's state

pub mod collision;
pub mod contact;
pub mod gravity;
pub mod math;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    BodyHandle, Collision, CollisionWorld, ControlledBody, Layer, LayerMask, PhysicsQuery,
    SphereBody, TriggerContact,
};
pub use contact::{ContactClassifier, TickAccumulator};
pub use gravity::{
    BoxGravity, GravityField, GravitySource, PlaneGravity, SphereGravity, UniformGravity,
};
pub use math::Frame;
pub use movement::{
    CharacterController, ControllerConfig, ControllerState, LocomotionMode, MoveInput, TickReport,
};
