//! Jump impulse.
//!
//! A requested jump is latched until the next tick and then resolved
//! against that tick's contacts:
//!
//! - on ground (including climbing and snapped), jump off the contact normal
//! - against a steep wall, wall-jump off its normal and refill air jumps
//! - in the air, spend an air jump straight up if any remain
//! - otherwise the request is dropped

use glam::Vec3;

use super::config::ControllerConfig;
use super::state::{ControllerState, ResolvedContacts};

/// A jump that was performed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JumpImpulse {
    /// Unit jump direction.
    pub direction: Vec3,
    /// Speed added along `direction`, after reductions.
    pub speed: f32,
}

/// Launch speed reaching `height` against gravity of `gravity_magnitude`.
#[inline]
pub fn jump_speed(gravity_magnitude: f32, height: f32) -> f32 {
    (2.0 * gravity_magnitude.max(0.0) * height.max(0.0)).sqrt()
}

/// Bias a surface normal toward up: `normalize(base + up)`.
///
/// Falls back to `up` when the two cancel out.
#[inline]
pub fn jump_direction(base: Vec3, up: Vec3) -> Vec3 {
    (base + up).try_normalize().unwrap_or(up)
}

/// Jump speed multiplier while partly submerged; zero once swimming.
#[inline]
pub fn submerged_jump_factor(submergence: f32, swim_threshold: f32) -> f32 {
    (1.0 - submergence / swim_threshold).max(0.0)
}

/// Try to jump, adding the impulse to `state.velocity`.
///
/// Returns `None` when no jump is possible from the current contacts.
pub fn try_jump(
    state: &mut ControllerState,
    contacts: &ResolvedContacts,
    config: &ControllerConfig,
    gravity: Vec3,
) -> Option<JumpImpulse> {
    let base = if contacts.on_ground() {
        contacts.contact_normal
    } else if contacts.on_steep() {
        state.jump_phase = 0;
        contacts.steep_normal
    } else if config.max_air_jumps > 0 && state.jump_phase <= config.max_air_jumps {
        // Walking off a ledge spends the first air jump
        if state.jump_phase == 0 {
            state.jump_phase = 1;
        }
        contacts.contact_normal
    } else {
        return None;
    };

    state.steps_since_last_jump = 0;
    state.jump_phase += 1;

    let mut speed = jump_speed(gravity.length(), config.jump_height);
    if contacts.in_water() {
        speed *= submerged_jump_factor(contacts.submergence, config.swim_threshold);
    }

    let direction = jump_direction(base, state.up_axis);
    let aligned_speed = state.velocity.dot(direction);
    if aligned_speed > 0.0 {
        speed = (speed - aligned_speed).max(0.0);
    }
    state.velocity += direction * speed;

    log::debug!(
        "jump phase {} along {:?} at {:.2} m/s",
        state.jump_phase,
        direction,
        speed
    );
    Some(JumpImpulse { direction, speed })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::LocomotionMode;

    const GRAVITY: Vec3 = Vec3::new(0.0, -9.81, 0.0);

    fn grounded() -> ResolvedContacts {
        ResolvedContacts {
            mode: LocomotionMode::Grounded,
            ground_contact_count: 1,
            contact_normal: Vec3::Y,
            ..Default::default()
        }
    }

    fn airborne() -> ResolvedContacts {
        ResolvedContacts::default()
    }

    #[test]
    fn test_basic_jump() {
        let mut state = ControllerState::default();
        let config = ControllerConfig::default();

        let impulse = try_jump(&mut state, &grounded(), &config, GRAVITY).expect("on ground");
        let expected = (2.0f32 * 9.81 * 2.0).sqrt();
        assert!((impulse.speed - expected).abs() < 1e-4);
        assert!((state.velocity - Vec3::Y * expected).length() < 1e-4);
        assert_eq!(state.steps_since_last_jump, 0);
        assert_eq!(state.jump_phase, 1);
    }

    #[test]
    fn test_cannot_jump_while_airborne() {
        let mut state = ControllerState::default();
        let config = ControllerConfig::default();
        assert!(try_jump(&mut state, &airborne(), &config, GRAVITY).is_none());
        assert_eq!(state.velocity, Vec3::ZERO);
    }

    #[test]
    fn test_air_jumps_are_limited() {
        let mut state = ControllerState::default();
        let config = ControllerConfig {
            max_air_jumps: 1,
            ..Default::default()
        };

        assert!(try_jump(&mut state, &grounded(), &config, GRAVITY).is_some());
        assert!(try_jump(&mut state, &airborne(), &config, GRAVITY).is_some());
        assert!(try_jump(&mut state, &airborne(), &config, GRAVITY).is_none());
    }

    #[test]
    fn test_falling_off_ledge_spends_first_air_jump() {
        let mut state = ControllerState::default();
        let config = ControllerConfig {
            max_air_jumps: 1,
            ..Default::default()
        };
        assert!(try_jump(&mut state, &airborne(), &config, GRAVITY).is_some());
        assert_eq!(state.jump_phase, 2);
        assert!(try_jump(&mut state, &airborne(), &config, GRAVITY).is_none());
    }

    #[test]
    fn test_wall_jump_refills_phase() {
        let mut state = ControllerState {
            jump_phase: 3,
            ..Default::default()
        };
        let config = ControllerConfig::default();
        let wall = ResolvedContacts {
            steep_contact_count: 1,
            steep_normal: Vec3::X,
            ..Default::default()
        };

        let impulse = try_jump(&mut state, &wall, &config, GRAVITY).expect("wall jump");
        assert_eq!(state.jump_phase, 1);
        let expected = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert!((impulse.direction - expected).length() < 1e-5);
    }

    #[test]
    fn test_jump_direction_is_unit() {
        let up = Vec3::Y;
        for base in [
            Vec3::Y,
            Vec3::X,
            Vec3::new(0.3, 0.9, -0.2).normalize(),
            Vec3::new(-1.0, 0.05, 0.0).normalize(),
        ] {
            let direction = jump_direction(base, up);
            assert!((direction.length() - 1.0).abs() < 1e-6);
            assert!((direction - (base + up).normalize()).length() < 1e-6);
        }
        // Opposite vectors cancel: fall back to up
        assert_eq!(jump_direction(Vec3::NEG_Y, Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_aligned_velocity_reduces_jump() {
        let mut state = ControllerState {
            velocity: Vec3::Y * 10.0,
            ..Default::default()
        };
        let config = ControllerConfig::default();
        let impulse = try_jump(&mut state, &grounded(), &config, GRAVITY).expect("on ground");
        assert_eq!(impulse.speed, 0.0);
        assert_eq!(state.velocity, Vec3::Y * 10.0);
    }

    #[test]
    fn test_submerged_jump_is_weaker() {
        let mut state = ControllerState::default();
        let config = ControllerConfig::default();
        let wading = ResolvedContacts {
            submergence: 0.25,
            ..grounded()
        };
        let impulse = try_jump(&mut state, &wading, &config, GRAVITY).expect("on ground");
        let full = jump_speed(9.81, config.jump_height);
        assert!((impulse.speed - full * 0.5).abs() < 1e-4);

        assert_eq!(submerged_jump_factor(0.8, 0.5), 0.0);
    }
}
