//! Locomotion mode resolution.
//!
//! Folds a tick's [`TickAccumulator`] into a single [`LocomotionMode`] and
//! the contact normal every later stage works against. Modes are tried in
//! strict precedence:
//!
//! 1. climbing
//! 2. grounded (direct contact)
//! 3. snapped (ground probe)
//! 4. steep recovered (wedged between steep faces)
//! 5. swimming
//! 6. airborne

use glam::Vec3;

use crate::collision::{BodyHandle, PhysicsQuery, TriggerInteraction};
use crate::contact::{ContactClassifier, TickAccumulator};

use super::config::ControllerConfig;
use super::state::{ControllerState, LocomotionMode, ResolvedContacts};

/// Ticks after a jump during which climbing and snapping stay disabled.
pub const JUMP_GRACE_STEPS: i32 = 2;

/// Outcome of [`LocomotionStateMachine::resolve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub contacts: ResolvedContacts,
    /// Body to connect to this tick.
    pub connected: Option<BodyHandle>,
}

/// Mode resolution against one controller's configuration.
#[derive(Debug, Clone, Copy)]
pub struct LocomotionStateMachine<'a> {
    pub classifier: &'a ContactClassifier,
    pub config: &'a ControllerConfig,
}

impl<'a> LocomotionStateMachine<'a> {
    pub fn new(classifier: &'a ContactClassifier, config: &'a ControllerConfig) -> Self {
        Self { classifier, config }
    }

    /// Resolve this tick's mode.
    ///
    /// Expects `state.velocity` and `state.up_axis` to be current and the
    /// step counters already advanced. Updates the counters, the jump phase
    /// and (when snapping) the velocity.
    pub fn resolve<Q: PhysicsQuery + ?Sized>(
        &self,
        state: &mut ControllerState,
        acc: &TickAccumulator,
        position: Vec3,
        world: &Q,
    ) -> Resolution {
        let up = state.up_axis;
        let mut contacts = ResolvedContacts {
            mode: LocomotionMode::Airborne,
            ground_contact_count: acc.ground_contact_count,
            steep_contact_count: acc.steep_contact_count,
            climb_contact_count: acc.climb_contact_count,
            contact_normal: acc.ground_normal,
            steep_normal: acc.steep_normal,
            climb_normal: acc.climb_normal,
            submergence: acc.submergence,
        };
        let mut connected = acc.connected_body;

        let mode = if self.check_climbing(state, &mut contacts) {
            LocomotionMode::Climbing
        } else if contacts.on_ground() {
            LocomotionMode::Grounded
        } else if self.snap_to_ground(state, &mut contacts, &mut connected, position, world) {
            LocomotionMode::Snapped
        } else if self.check_steep_contacts(&mut contacts, up) {
            LocomotionMode::SteepRecovered
        } else if self.check_swimming(&mut contacts, up) {
            LocomotionMode::Swimming
        } else {
            LocomotionMode::Airborne
        };

        if mode.is_supported() {
            state.steps_since_last_grounded = 0;
            // The tick right after a jump may still touch the ground
            if state.steps_since_last_jump > 1 {
                state.jump_phase = 0;
            }
            contacts.contact_normal = contacts.contact_normal.try_normalize().unwrap_or(up);
        } else {
            contacts.contact_normal = up;
        }
        contacts.steep_normal = contacts.steep_normal.try_normalize().unwrap_or(Vec3::ZERO);
        contacts.climb_normal = contacts.climb_normal.try_normalize().unwrap_or(Vec3::ZERO);
        contacts.mode = mode;

        Resolution {
            contacts,
            connected,
        }
    }

    /// Whether climbing is possible with the given counts and timers.
    #[inline]
    pub fn is_climbing(climb_contact_count: u32, steps_since_last_jump: i32) -> bool {
        climb_contact_count > 0 && steps_since_last_jump > JUMP_GRACE_STEPS
    }

    fn check_climbing(&self, state: &ControllerState, contacts: &mut ResolvedContacts) -> bool {
        if !Self::is_climbing(contacts.climb_contact_count, state.steps_since_last_jump) {
            return false;
        }
        if contacts.climb_contact_count > 1 {
            let normal = contacts.climb_normal.try_normalize().unwrap_or(Vec3::ZERO);
            // Pinched in a crevice: the summed walls read as floor
            contacts.climb_normal = if state.up_axis.dot(normal) >= self.classifier.min_ground_dot {
                state.last_climb_normal
            } else {
                normal
            };
        }
        contacts.ground_contact_count = contacts.climb_contact_count;
        contacts.contact_normal = contacts.climb_normal;
        true
    }

    fn snap_to_ground<Q: PhysicsQuery + ?Sized>(
        &self,
        state: &mut ControllerState,
        contacts: &mut ResolvedContacts,
        connected: &mut Option<BodyHandle>,
        position: Vec3,
        world: &Q,
    ) -> bool {
        if state.steps_since_last_grounded > 1 || state.steps_since_last_jump <= JUMP_GRACE_STEPS {
            return false;
        }
        let speed = state.velocity.length();
        if speed > self.config.max_snap_speed {
            return false;
        }
        let Some(hit) = world.raycast(
            position,
            -state.up_axis,
            self.config.probe_distance,
            self.config.probe_mask,
            TriggerInteraction::Ignore,
        ) else {
            return false;
        };
        if state.up_axis.dot(hit.normal) < self.classifier.min_dot(hit.layer) {
            return false;
        }

        contacts.ground_contact_count = 1;
        contacts.contact_normal = hit.normal;
        let dot = state.velocity.dot(hit.normal);
        // Moving away from the surface: bend the velocity along it
        if dot > 0.0 {
            state.velocity = (state.velocity - hit.normal * dot).normalize_or_zero() * speed;
        }
        *connected = hit.body;
        log::trace!("snapped to ground at distance {:.3}", hit.distance);
        true
    }

    fn check_steep_contacts(&self, contacts: &mut ResolvedContacts, up: Vec3) -> bool {
        if contacts.steep_contact_count <= 1 {
            return false;
        }
        let Some(normal) = contacts.steep_normal.try_normalize() else {
            return false;
        };
        contacts.steep_normal = normal;
        if up.dot(normal) < self.classifier.min_ground_dot {
            return false;
        }
        contacts.ground_contact_count = 1;
        contacts.contact_normal = normal;
        true
    }

    fn check_swimming(&self, contacts: &mut ResolvedContacts, up: Vec3) -> bool {
        if contacts.submergence < self.config.swim_threshold {
            return false;
        }
        contacts.ground_contact_count = 0;
        contacts.contact_normal = up;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{CollisionWorld, Layer, LayerMask, RayHit, BodyState};

    /// Query whose ray always hits flat ground.
    struct AlwaysGround;

    impl PhysicsQuery for AlwaysGround {
        fn raycast(
            &self,
            origin: Vec3,
            _direction: Vec3,
            _max_distance: f32,
            _mask: LayerMask,
            _triggers: TriggerInteraction,
        ) -> Option<RayHit> {
            Some(RayHit {
                distance: 0.6,
                point: origin - Vec3::Y * 0.6,
                normal: Vec3::Y,
                body: Some(BodyHandle(7)),
                layer: Layer::DEFAULT,
            })
        }

        fn body_state(&self, _body: BodyHandle) -> Option<BodyState> {
            None
        }
    }

    fn resolve(
        state: &mut ControllerState,
        acc: &TickAccumulator,
        world: &impl PhysicsQuery,
    ) -> Resolution {
        let config = ControllerConfig::default();
        let classifier = ContactClassifier::from_config(&config);
        LocomotionStateMachine::new(&classifier, &config).resolve(state, acc, Vec3::ZERO, world)
    }

    fn settled_state() -> ControllerState {
        ControllerState {
            steps_since_last_grounded: 1,
            steps_since_last_jump: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_flat_ground_contact() {
        let mut state = settled_state();
        let acc = TickAccumulator {
            ground_contact_count: 1,
            ground_normal: Vec3::Y,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Grounded);
        assert!(resolution.contacts.on_ground());
        assert!((resolution.contacts.contact_normal - Vec3::Y).length() < 1e-6);
        assert_eq!(state.steps_since_last_grounded, 0);
    }

    #[test]
    fn test_climbing_beats_ground() {
        let mut state = settled_state();
        let acc = TickAccumulator {
            ground_contact_count: 1,
            ground_normal: Vec3::Y,
            steep_contact_count: 1,
            steep_normal: Vec3::X,
            climb_contact_count: 1,
            climb_normal: Vec3::X,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Climbing);
        assert!((resolution.contacts.contact_normal - Vec3::X).length() < 1e-6);
        assert_eq!(resolution.contacts.ground_contact_count, 1);
    }

    #[test]
    fn test_no_climbing_right_after_jump() {
        let mut state = ControllerState {
            steps_since_last_jump: 2,
            ..settled_state()
        };
        let acc = TickAccumulator {
            climb_contact_count: 1,
            climb_normal: Vec3::X,
            steep_contact_count: 1,
            steep_normal: Vec3::X,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);
    }

    #[test]
    fn test_pinched_climb_uses_last_normal() {
        let mut state = ControllerState {
            last_climb_normal: Vec3::Z,
            ..settled_state()
        };
        // Two walls of a V-shaped crevice: their sum points straight up
        let a = Vec3::new(0.6, 0.8, 0.0);
        let b = Vec3::new(-0.6, 0.8, 0.0);
        let acc = TickAccumulator {
            climb_contact_count: 2,
            climb_normal: a + b,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Climbing);
        assert!((resolution.contacts.contact_normal - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_snap_to_probe_hit() {
        let mut state = settled_state();
        state.velocity = Vec3::new(3.0, 4.0, 0.0);
        let resolution = resolve(&mut state, &TickAccumulator::new(), &AlwaysGround);
        assert_eq!(resolution.contacts.mode, LocomotionMode::Snapped);
        assert_eq!(resolution.connected, Some(BodyHandle(7)));
        // Upward motion bent along the ground, speed preserved
        assert!(state.velocity.y.abs() < 1e-5);
        assert!((state.velocity.length() - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_snap_never_right_after_jump() {
        for steps in -1..=JUMP_GRACE_STEPS {
            let mut state = ControllerState {
                steps_since_last_jump: steps,
                ..settled_state()
            };
            let resolution = resolve(&mut state, &TickAccumulator::new(), &AlwaysGround);
            assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);
        }
    }

    #[test]
    fn test_no_snap_after_long_fall_or_fast() {
        let mut state = ControllerState {
            steps_since_last_grounded: 2,
            ..settled_state()
        };
        let resolution = resolve(&mut state, &TickAccumulator::new(), &AlwaysGround);
        assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);

        let mut state = settled_state();
        state.velocity = Vec3::new(200.0, 0.0, 0.0);
        let resolution = resolve(&mut state, &TickAccumulator::new(), &AlwaysGround);
        assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);
    }

    #[test]
    fn test_snap_against_real_world() {
        let mut world = CollisionWorld::new();
        world.add_box(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(10.0, 0.5, 10.0),
            Layer::DEFAULT,
        );
        // Body center at the origin, floor top at -0.5
        let mut state = settled_state();
        let resolution = resolve(&mut state, &TickAccumulator::new(), &world);
        assert_eq!(resolution.contacts.mode, LocomotionMode::Snapped);
        assert_eq!(resolution.connected, None);
    }

    #[test]
    fn test_steep_recovery() {
        let mut state = ControllerState {
            steps_since_last_grounded: 5,
            ..settled_state()
        };
        let a = Vec3::new(0.7, 0.714, 0.0);
        let b = Vec3::new(-0.7, 0.714, 0.0);
        let acc = TickAccumulator {
            steep_contact_count: 2,
            steep_normal: a + b,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::SteepRecovered);
        assert!((resolution.contacts.contact_normal - Vec3::Y).length() < 1e-5);

        // A single steep wall is not enough
        let acc = TickAccumulator {
            steep_contact_count: 1,
            steep_normal: a,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);
        assert!((resolution.contacts.steep_normal - a.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_swimming() {
        let mut state = ControllerState {
            steps_since_last_grounded: 5,
            ..settled_state()
        };
        let acc = TickAccumulator {
            submergence: 0.6,
            ..Default::default()
        };
        let resolution = resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Swimming);
        assert_eq!(resolution.contacts.ground_contact_count, 0);
        assert_eq!(resolution.contacts.contact_normal, Vec3::Y);
        assert_eq!(state.steps_since_last_grounded, 0);
    }

    #[test]
    fn test_airborne_resets_normal_to_up() {
        let mut state = ControllerState {
            steps_since_last_grounded: 5,
            up_axis: Vec3::X,
            ..settled_state()
        };
        let resolution = resolve(&mut state, &TickAccumulator::new(), &CollisionWorld::new());
        assert_eq!(resolution.contacts.mode, LocomotionMode::Airborne);
        assert_eq!(resolution.contacts.contact_normal, Vec3::X);
        assert_eq!(state.steps_since_last_grounded, 5);
    }

    #[test]
    fn test_jump_phase_kept_on_tick_after_jump() {
        let acc = TickAccumulator {
            ground_contact_count: 1,
            ground_normal: Vec3::Y,
            ..Default::default()
        };

        let mut state = ControllerState {
            steps_since_last_jump: 1,
            jump_phase: 1,
            ..settled_state()
        };
        resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(state.jump_phase, 1);

        let mut state = ControllerState {
            steps_since_last_jump: 2,
            jump_phase: 1,
            ..settled_state()
        };
        resolve(&mut state, &acc, &CollisionWorld::new());
        assert_eq!(state.jump_phase, 0);
    }
}
