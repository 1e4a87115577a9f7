//! Character controller.
//!
//! This is the main entry point for character movement. The physics engine
//! feeds it contacts and trigger overlaps as they happen; once per fixed
//! tick the host calls [`CharacterController::advance`], which folds them
//! into a locomotion mode and writes a new velocity to the body.

use glam::Vec3;

use crate::collision::{Collision, ControlledBody, PhysicsQuery, TriggerContact};
use crate::contact::{ContactClassifier, TickAccumulator};
use crate::gravity::GravityField;
use crate::math::{clamp_magnitude, project_direction_on_plane};

use super::config::ControllerConfig;
use super::jump::try_jump;
use super::locomotion::{LocomotionStateMachine, Resolution};
use super::state::{ControllerState, LocomotionMode, MoveInput, TickReport};
use super::submergence::probe_submergence;
use super::velocity::{apply_water_drag, VelocitySolver};

/// Character controller for a single rigid body.
///
/// # Example
///
/// ```ignore
/// let mut controller = CharacterController::new(ControllerConfig::default());
///
/// // Each physics tick:
/// controller.advance(dt, &input, &mut body, &field, &world);
/// let contacts = body.step(&world, dt);
/// for trigger in &contacts.triggers {
///     controller.on_trigger(trigger.contact, body.position, &world);
/// }
/// controller.on_contacts(&contacts.collisions);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    config: ControllerConfig,
    classifier: ContactClassifier,
    state: ControllerState,
    accumulator: TickAccumulator,
}

impl Default for CharacterController {
    fn default() -> Self {
        Self::new(ControllerConfig::default())
    }
}

impl CharacterController {
    /// Create a controller; out-of-range settings are clamped.
    pub fn new(config: ControllerConfig) -> Self {
        let config = config.validated();
        Self {
            classifier: ContactClassifier::from_config(&config),
            config,
            state: ControllerState::default(),
            accumulator: TickAccumulator::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Replace the configuration, clamping it and rebuilding the thresholds.
    pub fn set_config(&mut self, config: ControllerConfig) {
        self.config = config.validated();
        self.classifier = ContactClassifier::from_config(&self.config);
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Contacts gathered since the last `advance`.
    pub fn pending(&self) -> &TickAccumulator {
        &self.accumulator
    }

    // ========================================================================
    // Engine notifications
    // ========================================================================

    /// Report collisions the body is touching.
    ///
    /// May be called any number of times per tick; deliver trigger overlaps
    /// first so contacts are ignored once the body is swimming.
    pub fn on_contacts(&mut self, collisions: &[Collision]) {
        for collision in collisions {
            self.classifier.classify(
                &mut self.accumulator,
                collision,
                self.state.up_axis,
                self.state.desires_climbing,
                self.config.swim_threshold,
            );
        }
    }

    /// Report a trigger volume the body overlaps.
    ///
    /// Only water volumes matter here: they update the submergence and,
    /// once swimming, make the volume's body the connection candidate.
    pub fn on_trigger<Q: PhysicsQuery + ?Sized>(
        &mut self,
        contact: TriggerContact,
        position: Vec3,
        world: &Q,
    ) {
        if !self.config.water_mask.contains(contact.layer) {
            return;
        }
        let submergence = probe_submergence(world, position, self.state.up_axis, &self.config);
        let acc = &mut self.accumulator;
        acc.submergence = acc.submergence.max(submergence);
        if acc.submergence >= self.config.swim_threshold {
            acc.connected_body = contact.body;
        }
    }

    /// Treat the character as freshly jumped so ground snapping stays off
    /// for the next few ticks. Launch pads call this.
    pub fn prevent_ground_snap(&mut self) {
        self.state.steps_since_last_jump = -1;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Mode resolved by the last `advance`.
    pub fn mode(&self) -> LocomotionMode {
        self.state.resolved.mode
    }

    pub fn on_ground(&self) -> bool {
        self.state.resolved.on_ground()
    }

    pub fn on_steep(&self) -> bool {
        self.state.resolved.on_steep()
    }

    pub fn is_climbing(&self) -> bool {
        self.mode() == LocomotionMode::Climbing
    }

    pub fn is_swimming(&self) -> bool {
        self.state.resolved.submergence >= self.config.swim_threshold
    }

    pub fn velocity(&self) -> Vec3 {
        self.state.velocity
    }

    pub fn up_axis(&self) -> Vec3 {
        self.state.up_axis
    }

    pub fn contact_normal(&self) -> Vec3 {
        self.state.resolved.contact_normal
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Run one fixed tick and write the new velocity to `body`.
    ///
    /// Consumes everything reported since the previous call. A non-positive
    /// `dt` leaves the controller and the body untouched.
    pub fn advance<B, Q>(
        &mut self,
        dt: f32,
        input: &MoveInput,
        body: &mut B,
        field: &GravityField,
        world: &Q,
    ) -> TickReport
    where
        B: ControlledBody + ?Sized,
        Q: PhysicsQuery + ?Sized,
    {
        if dt <= 0.0 || !dt.is_finite() {
            log::warn!("ignoring character tick with dt = {}", dt);
            return self.report(false);
        }

        let position = body.position();
        let (gravity, up) = field.gravity_and_up(position);
        // No gravity here: keep the previous notion of up
        if let Some(up) = up {
            self.state.up_axis = up;
        }
        self.latch_input(input);

        let acc = std::mem::take(&mut self.accumulator);
        let state = &mut self.state;
        state.steps_since_last_grounded = state.steps_since_last_grounded.saturating_add(1);
        state.steps_since_last_jump = state.steps_since_last_jump.saturating_add(1);
        state.velocity = body.velocity();

        let machine = LocomotionStateMachine::new(&self.classifier, &self.config);
        let Resolution {
            contacts,
            connected,
        } = machine.resolve(state, &acc, position, world);
        state.connection.update(
            connected,
            acc.climb_connection,
            position,
            body.mass(),
            dt,
            world,
        );

        state.velocity = apply_water_drag(
            state.velocity,
            self.config.water_drag,
            contacts.submergence,
            dt,
        );
        let solver = VelocitySolver::new(&self.config);
        solver.adjust_velocity(state, &contacts, dt);

        let jumped = if state.desired_jump {
            state.desired_jump = false;
            try_jump(state, &contacts, &self.config, gravity).is_some()
        } else {
            false
        };

        solver.apply_vertical_forces(state, &contacts, gravity, dt);
        body.set_velocity(state.velocity);

        state.last_contact_normal = contacts.contact_normal;
        state.last_steep_normal = contacts.steep_normal;
        if contacts.climb_contact_count > 0
            && contacts.climb_normal != Vec3::ZERO
            && state.up_axis.dot(contacts.climb_normal) < self.classifier.min_ground_dot
        {
            state.last_climb_normal = contacts.climb_normal;
        }

        let previous_mode = state.resolved.mode;
        state.resolved = contacts;
        if previous_mode != contacts.mode {
            log::debug!("locomotion {} -> {}", previous_mode, contacts.mode);
        }
        log::trace!(
            "tick: mode {} velocity {:?} up {:?}",
            contacts.mode,
            state.velocity,
            state.up_axis
        );

        self.report(jumped)
    }

    fn latch_input(&mut self, input: &MoveInput) {
        let state = &mut self.state;
        let up = state.up_axis;

        state.move_vector = clamp_magnitude(input.move_vector, 1.0);
        state.desired_jump |= input.jump_pressed;
        // Swimmers cannot grab walls
        state.desires_climbing =
            input.climb_held && state.resolved.submergence < self.config.swim_threshold;

        let (right, forward) = match input.input_space {
            Some(space) => (space.right, space.forward),
            None => (Vec3::X, Vec3::Z),
        };
        state.right_axis = project_direction_on_plane(right, up);
        state.forward_axis = project_direction_on_plane(forward, up);
    }

    fn report(&self, jumped: bool) -> TickReport {
        TickReport {
            mode: self.state.resolved.mode,
            velocity: self.state.velocity,
            up_axis: self.state.up_axis,
            contact_normal: self.state.resolved.contact_normal,
            jumped,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
