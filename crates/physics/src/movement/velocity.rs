//! Velocity solver.
//!
//! Runs after mode resolution each tick:
//!
//! 1. [`apply_water_drag`] damps the velocity in proportion to submergence
//! 2. [`VelocitySolver::adjust_velocity`] accelerates toward the input
//!    velocity within the contact plane, relative to any ridden platform
//! 3. (jumping, see [`super::jump`])
//! 4. [`VelocitySolver::apply_vertical_forces`] adds gravity, buoyancy and
//!    the climbing and resting corrections

use glam::Vec3;

use crate::math::{clamp_magnitude, lerp_unclamped, project_direction_on_plane};

use super::config::ControllerConfig;
use super::locomotion::LocomotionStateMachine;
use super::state::{ControllerState, LocomotionMode, ResolvedContacts};

/// Fraction of the climb acceleration pressing a climber into the wall.
/// Kept below 1 so the push never fully cancels climbing along the wall.
pub const CLIMB_ADHESION: f32 = 0.9;

/// Squared speed under which a grounded body counts as resting.
pub const RESTING_SPEED_SQUARED: f32 = 0.01;

/// Damp `velocity` for one tick in water.
///
/// `v * max(0, 1 - drag * submergence * dt)`; untouched when dry.
pub fn apply_water_drag(velocity: Vec3, water_drag: f32, submergence: f32, dt: f32) -> Vec3 {
    if submergence <= 0.0 {
        return velocity;
    }
    velocity * (1.0 - water_drag * submergence * dt).max(0.0)
}

/// Tangent-plane acceleration and per-mode forces.
#[derive(Debug, Clone, Copy)]
pub struct VelocitySolver<'a> {
    pub config: &'a ControllerConfig,
}

impl<'a> VelocitySolver<'a> {
    pub fn new(config: &'a ControllerConfig) -> Self {
        Self { config }
    }

    /// Target speed and acceleration cap for the resolved contacts.
    pub fn limits(&self, contacts: &ResolvedContacts, desires_climbing: bool) -> (f32, f32) {
        let config = self.config;
        let ground_acceleration = if contacts.on_ground() {
            config.max_acceleration
        } else {
            config.max_air_acceleration
        };

        if contacts.mode == LocomotionMode::Climbing {
            (config.max_climb_speed, config.max_climb_acceleration)
        } else if contacts.in_water() {
            let swim_factor = (contacts.submergence / config.swim_threshold).min(1.0);
            (
                lerp_unclamped(config.max_speed, config.max_swim_speed, swim_factor),
                lerp_unclamped(ground_acceleration, config.max_swim_acceleration, swim_factor),
            )
        } else if contacts.on_ground() && desires_climbing {
            (config.max_climb_speed, ground_acceleration)
        } else {
            (config.max_speed, ground_acceleration)
        }
    }

    /// Accelerate toward the input velocity and return the change applied.
    ///
    /// The change never exceeds `acceleration * dt` in magnitude.
    pub fn adjust_velocity(
        &self,
        state: &mut ControllerState,
        contacts: &ResolvedContacts,
        dt: f32,
    ) -> Vec3 {
        let (speed, acceleration) = self.limits(contacts, state.desires_climbing);
        let up = state.up_axis;
        let normal = contacts.contact_normal;
        let swimming = contacts.submergence >= self.config.swim_threshold;

        let (x_axis, z_axis) = if contacts.mode == LocomotionMode::Climbing {
            (normal.cross(up), up)
        } else {
            (state.right_axis, state.forward_axis)
        };
        let x_axis = project_direction_on_plane(x_axis, normal);
        let z_axis = project_direction_on_plane(z_axis, normal);

        let input = clamp_magnitude(state.move_vector, 1.0);
        let relative = state.velocity - state.connection.velocity;
        let vertical = if swimming {
            input.y * speed - relative.dot(up)
        } else {
            0.0
        };
        let adjustment = Vec3::new(
            input.x * speed - relative.dot(x_axis),
            vertical,
            input.z * speed - relative.dot(z_axis),
        );
        let max_change = acceleration * dt;
        let adjustment = clamp_magnitude(adjustment, max_change);

        let mut delta = x_axis * adjustment.x + z_axis * adjustment.z;
        if swimming {
            delta += up * adjustment.y;
        }
        // Projected axes on a slope are not orthogonal
        let delta = clamp_magnitude(delta, max_change);
        state.velocity += delta;
        delta
    }

    /// Gravity and the mode-specific corrections layered on top of it.
    pub fn apply_vertical_forces(
        &self,
        state: &mut ControllerState,
        contacts: &ResolvedContacts,
        gravity: Vec3,
        dt: f32,
    ) {
        let config = self.config;
        let normal = contacts.contact_normal;
        let climbing = contacts.mode == LocomotionMode::Climbing
            && LocomotionStateMachine::is_climbing(
                contacts.climb_contact_count,
                state.steps_since_last_jump,
            );

        if climbing {
            // Press into the wall so convex corners do not fling us off
            state.velocity -= normal * (config.max_climb_acceleration * CLIMB_ADHESION * dt);
        } else if contacts.in_water() {
            state.velocity += gravity * ((1.0 - contacts.submergence * config.buoyancy) * dt);
        } else if contacts.on_ground() && state.velocity.length_squared() < RESTING_SPEED_SQUARED {
            // Only the part of gravity into the surface, so resting bodies do not creep
            state.velocity += normal * (gravity.dot(normal) * dt);
        } else if state.desires_climbing && contacts.on_ground() {
            state.velocity +=
                (gravity - normal * (config.max_climb_acceleration * CLIMB_ADHESION)) * dt;
        } else {
            state.velocity += gravity * dt;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
