//! Gravwalk game logic
//!
//! This crate hosts the character controller in a headless, deterministic
//! simulation:
//!
//! - Player input handling
//! - Built-in levels with their gravity sources
//! - Level behaviours (launch pads, moving platforms, detection zones,
//!   floating props)
//! - Simulation configuration loaded from TOML
//!
//! # Architecture
//!
//! All state updates are driven by player input and a fixed timestep.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Simulation                            │
//! │  ┌─────────┐    ┌─────────────┐    ┌──────────────────────┐  │
//! │  │ Player  │───►│ Character   │───►│ Level                │  │
//! │  │ input   │    │ controller  │    │ (world, gravity,     │  │
//! │  └─────────┘    └─────────────┘    │  zones, platforms)   │  │
//! │                                    └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod character;
pub mod config;
pub mod environment;
pub mod input;
pub mod level;
pub mod simulation;

// Re-export main types
pub use character::Character;
pub use config::{ConfigError, SimulationConfig};
pub use input::{InputParseError, PlayerInput};
pub use level::{Level, LevelError};
pub use simulation::{EventKind, Simulation, SimulationEvent};

// Re-export physics types for convenience
pub use gravwalk_physics::{
    CharacterController, CollisionWorld, ControllerConfig, GravityField, Layer, LocomotionMode,
    MoveInput,
};
