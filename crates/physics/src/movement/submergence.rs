//! Water depth probe.

use glam::Vec3;

use crate::collision::{PhysicsQuery, TriggerInteraction};

use super::config::ControllerConfig;

/// How deep the character at `position` sits in water, in [0, 1].
///
/// A ray is cast down from `submergence_offset` above the position over
/// `submergence_range + 1`. Hitting a water surface at distance `d` gives
/// `1 - d / range`; no hit means the probe started underwater.
pub fn probe_submergence<Q: PhysicsQuery + ?Sized>(
    world: &Q,
    position: Vec3,
    up: Vec3,
    config: &ControllerConfig,
) -> f32 {
    let origin = position + up * config.submergence_offset;
    let hit = world.raycast(
        origin,
        -up,
        config.submergence_range + 1.0,
        config.water_mask,
        TriggerInteraction::Collide,
    );
    match hit {
        Some(hit) => (1.0 - hit.distance / config.submergence_range).clamp(0.0, 1.0),
        None => 1.0,
    }
}
