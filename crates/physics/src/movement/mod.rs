//! Character movement.
//!
//! This module turns a tick's contacts into a velocity:
//!
//! - Locomotion mode resolution (climbing, grounded, snapped, steep
//!   recovery, swimming, airborne)
//! - Tangent-plane acceleration relative to ridden platforms
//! - Jumps, wall jumps and air jumps
//! - Gravity, buoyancy and water drag
//!
//! # Design
//!
//! Movement is driven by the [`CharacterController`], which owns the
//! persistent [`ControllerState`] and the per-tick contact accumulator.
//! The stages it runs are plain functions and borrowing structs so each can
//! be tested on its own.

mod config;
mod connection;
mod controller;
mod jump;
mod locomotion;
mod state;
mod submergence;
mod velocity;

pub use config::ControllerConfig;
pub use controller::CharacterController;
pub use jump::{jump_direction, jump_speed, submerged_jump_factor, try_jump, JumpImpulse};
pub use locomotion::{LocomotionStateMachine, Resolution, JUMP_GRACE_STEPS};
pub use state::{
    ConnectionState, ControllerState, InputSpace, LocomotionMode, MoveInput, ResolvedContacts,
    TickReport,
};
pub use submergence::probe_submergence;
pub use velocity::{apply_water_drag, VelocitySolver, CLIMB_ADHESION, RESTING_SPEED_SQUARED};
