//! Player input handling.
//!
//! This module converts raw key states into the [`MoveInput`] the
//! character controller consumes, and parses the compact key lists used by
//! scripted runs.

use std::str::FromStr;

use glam::Vec3;
use gravwalk_physics::movement::{InputSpace, MoveInput};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw player input for a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerInput {
    /// Movement keys pressed.
    pub movement: MovementInput,

    /// Action buttons pressed.
    pub actions: ActionInput,

    /// Camera axes the movement keys are relative to.
    pub camera: Option<InputSpace>,
}

/// Movement key states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

/// Action button states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionInput {
    pub jump: bool,
    pub climb: bool,
    pub swim_up: bool,
    pub swim_down: bool,
}

/// Unknown key name in an input list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown input key `{0}` (expected forward, back, left, right, jump, climb, up, down)")]
pub struct InputParseError(pub String);

impl PlayerInput {
    /// Convert to a controller input.
    pub fn to_move_input(&self) -> MoveInput {
        let mut move_vector = Vec3::ZERO;

        // Movement axes
        if self.movement.forward {
            move_vector.z += 1.0;
        }
        if self.movement.backward {
            move_vector.z -= 1.0;
        }
        if self.movement.right {
            move_vector.x += 1.0;
        }
        if self.movement.left {
            move_vector.x -= 1.0;
        }
        if self.actions.swim_up {
            move_vector.y += 1.0;
        }
        if self.actions.swim_down {
            move_vector.y -= 1.0;
        }

        // Normalize diagonal movement
        if move_vector.length_squared() > 1.0 {
            move_vector = move_vector.normalize();
        }

        MoveInput {
            move_vector,
            jump_pressed: self.actions.jump,
            climb_held: self.actions.climb,
            input_space: self.camera,
        }
    }

    /// Check if any movement input is active.
    pub fn has_movement(&self) -> bool {
        self.movement.forward
            || self.movement.backward
            || self.movement.left
            || self.movement.right
            || self.actions.swim_up
            || self.actions.swim_down
    }
}

impl FromStr for PlayerInput {
    type Err = InputParseError;

    /// Parse a `+`-separated key list such as `forward+jump`.
    ///
    /// An empty string or `idle` is no input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut input = PlayerInput::default();
        for key in s.split('+').map(str::trim).filter(|k| !k.is_empty()) {
            match key.to_ascii_lowercase().as_str() {
                "idle" => {}
                "forward" | "w" => input.movement.forward = true,
                "back" | "backward" | "s" => input.movement.backward = true,
                "left" | "a" => input.movement.left = true,
                "right" | "d" => input.movement.right = true,
                "jump" | "space" => input.actions.jump = true,
                "climb" => input.actions.climb = true,
                "up" => input.actions.swim_up = true,
                "down" => input.actions.swim_down = true,
                _ => return Err(InputParseError(key.to_string())),
            }
        }
        Ok(input)
    }
}
