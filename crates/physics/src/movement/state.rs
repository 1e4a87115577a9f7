//! Controller state and input structures.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::collision::BodyHandle;

/// Effective locomotion mode for one tick.
///
/// Variants are listed in resolution precedence: the first whose condition
/// holds wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocomotionMode {
    /// Holding onto a climbable surface.
    Climbing,
    /// Touching ground this tick.
    Grounded,
    /// Pulled back onto ground found by the snap probe.
    Snapped,
    /// Wedged between steep surfaces that together act as ground.
    SteepRecovered,
    /// Submerged past the swim threshold.
    Swimming,
    #[default]
    Airborne,
}

impl LocomotionMode {
    /// Every mode but airborne counts as supported.
    #[inline]
    pub fn is_supported(self) -> bool {
        self != Self::Airborne
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Climbing => "climbing",
            Self::Grounded => "grounded",
            Self::Snapped => "snapped",
            Self::SteepRecovered => "steep-recovered",
            Self::Swimming => "swimming",
            Self::Airborne => "airborne",
        }
    }
}

impl std::fmt::Display for LocomotionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// World-space reference directions the movement input is relative to,
/// typically a camera's right and forward vectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputSpace {
    pub right: Vec3,
    pub forward: Vec3,
}

impl Default for InputSpace {
    fn default() -> Self {
        Self {
            right: Vec3::X,
            forward: Vec3::Z,
        }
    }
}

/// Player intent for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveInput {
    /// x = right, y = swim up/down, z = forward. Clamped to unit length.
    pub move_vector: Vec3,
    /// Jump was pressed since the last tick.
    pub jump_pressed: bool,
    /// Climb button is held.
    pub climb_held: bool,
    /// Axes for `move_vector`; world X/Z when `None`.
    pub input_space: Option<InputSpace>,
}

impl MoveInput {
    pub fn new(right: f32, forward: f32) -> Self {
        Self {
            move_vector: Vec3::new(right, 0.0, forward),
            ..Default::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    pub fn with_climb(mut self) -> Self {
        self.climb_held = true;
        self
    }

    pub fn with_swim(mut self, vertical: f32) -> Self {
        self.move_vector.y = vertical;
        self
    }

    pub fn with_input_space(mut self, space: InputSpace) -> Self {
        self.input_space = Some(space);
        self
    }
}

/// Platform riding bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConnectionState {
    /// Body resolved as the connection this tick.
    pub connected: Option<BodyHandle>,
    /// Connection of the previous tick.
    pub previous: Option<BodyHandle>,
    /// Anchor in world space, re-taken at the character every tick.
    pub world_anchor: Vec3,
    /// The same anchor in the connected body's local frame.
    pub local_anchor: Vec3,
    /// Velocity of the anchor point, zero unless riding the same body twice.
    pub velocity: Vec3,
}

/// Folded outcome of one tick's contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedContacts {
    pub mode: LocomotionMode,
    pub ground_contact_count: u32,
    pub steep_contact_count: u32,
    pub climb_contact_count: u32,
    /// Unit normal of the active contact plane; the up axis when airborne.
    pub contact_normal: Vec3,
    /// Unit steep normal, zero without steep contacts.
    pub steep_normal: Vec3,
    /// Unit climb normal, zero without climb contacts.
    pub climb_normal: Vec3,
    pub submergence: f32,
}

impl Default for ResolvedContacts {
    fn default() -> Self {
        Self {
            mode: LocomotionMode::Airborne,
            ground_contact_count: 0,
            steep_contact_count: 0,
            climb_contact_count: 0,
            contact_normal: Vec3::Y,
            steep_normal: Vec3::ZERO,
            climb_normal: Vec3::ZERO,
            submergence: 0.0,
        }
    }
}

impl ResolvedContacts {
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.ground_contact_count > 0
    }

    #[inline]
    pub fn on_steep(&self) -> bool {
        self.steep_contact_count > 0
    }

    #[inline]
    pub fn in_water(&self) -> bool {
        self.submergence > 0.0
    }
}

/// State that survives from one tick to the next.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerState {
    pub velocity: Vec3,
    pub up_axis: Vec3,
    pub steps_since_last_grounded: i32,
    /// Goes negative when a launcher suppresses ground snapping.
    pub steps_since_last_jump: i32,
    pub jump_phase: u32,
    pub last_contact_normal: Vec3,
    pub last_steep_normal: Vec3,
    /// Fallback when pinched between climbable walls.
    pub last_climb_normal: Vec3,
    pub desired_jump: bool,
    pub desires_climbing: bool,
    /// Swim input latched for this tick (y of the move vector).
    pub move_vector: Vec3,
    pub right_axis: Vec3,
    pub forward_axis: Vec3,
    pub connection: ConnectionState,
    /// Last tick's resolution, kept for the mode queries.
    pub resolved: ResolvedContacts,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            up_axis: Vec3::Y,
            steps_since_last_grounded: 0,
            steps_since_last_jump: 0,
            jump_phase: 0,
            last_contact_normal: Vec3::Y,
            last_steep_normal: Vec3::ZERO,
            last_climb_normal: Vec3::ZERO,
            desired_jump: false,
            desires_climbing: false,
            move_vector: Vec3::ZERO,
            right_axis: Vec3::X,
            forward_axis: Vec3::Z,
            connection: ConnectionState::default(),
            resolved: ResolvedContacts::default(),
        }
    }
}

/// What happened during one `advance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub mode: LocomotionMode,
    pub velocity: Vec3,
    pub up_axis: Vec3,
    pub contact_normal: Vec3,
    pub jumped: bool,
}
