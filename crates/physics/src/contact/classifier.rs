//! Sorting collision normals into ground, steep and climb buckets.

use glam::Vec3;

use crate::collision::{BodyHandle, Collision, Layer, LayerMask};
use crate::movement::ControllerConfig;

/// Steep contacts must face at least this far up; anything lower is a
/// ceiling.
pub const MIN_STEEP_DOT: f32 = -0.01;

/// Everything the physics engine reported during one tick.
///
/// Starts empty, is filled by any number of [`ContactClassifier::classify`]
/// calls and trigger evaluations, and is consumed exactly once by the
/// controller's `advance`. Every update only adds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickAccumulator {
    pub ground_contact_count: u32,
    /// Unnormalized sum of ground normals.
    pub ground_normal: Vec3,
    pub steep_contact_count: u32,
    /// Unnormalized sum of steep normals.
    pub steep_normal: Vec3,
    pub climb_contact_count: u32,
    /// Unnormalized sum of climb normals.
    pub climb_normal: Vec3,
    /// Body the character stands on or leans against.
    pub connected_body: Option<BodyHandle>,
    /// Body of the last climbed surface. `Some(None)` is static geometry.
    pub climb_connection: Option<Option<BodyHandle>>,
    /// Water depth ratio in [0, 1].
    pub submergence: f32,
}

impl TickAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_water(&self) -> bool {
        self.submergence > 0.0
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Slope thresholds and layer filters for bucketing contacts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactClassifier {
    pub min_ground_dot: f32,
    pub min_stair_dot: f32,
    pub min_climb_dot: f32,
    pub stair_mask: LayerMask,
    pub climbable_mask: LayerMask,
}

impl Default for ContactClassifier {
    fn default() -> Self {
        Self::from_config(&ControllerConfig::default())
    }
}

impl ContactClassifier {
    pub fn from_config(config: &ControllerConfig) -> Self {
        Self {
            min_ground_dot: config.min_ground_dot(),
            min_stair_dot: config.min_stair_dot(),
            min_climb_dot: config.min_climb_dot(),
            stair_mask: config.stair_mask,
            climbable_mask: config.climbable_mask,
        }
    }

    /// Ground threshold for a surface on `layer`.
    #[inline]
    pub fn min_dot(&self, layer: Layer) -> f32 {
        if self.stair_mask.contains(layer) {
            self.min_stair_dot
        } else {
            self.min_ground_dot
        }
    }

    /// Whether a normal on `layer` counts as ground under `up`.
    #[inline]
    pub fn is_ground(&self, normal: Vec3, up: Vec3, layer: Layer) -> bool {
        up.dot(normal) >= self.min_dot(layer)
    }

    /// Add one collision event to the tick's accumulator.
    ///
    /// Ignored entirely once the accumulator already reports swimming, so
    /// trigger overlaps must be evaluated before contacts.
    pub fn classify(
        &self,
        acc: &mut TickAccumulator,
        collision: &Collision,
        up: Vec3,
        desires_climbing: bool,
        swim_threshold: f32,
    ) {
        if acc.submergence >= swim_threshold {
            return;
        }

        let min_dot = self.min_dot(collision.layer);
        let climbable = self.climbable_mask.contains(collision.layer);

        for &normal in &collision.normals {
            let up_dot = up.dot(normal);
            if up_dot >= min_dot {
                acc.ground_contact_count += 1;
                acc.ground_normal += normal;
                acc.connected_body = collision.body;
                continue;
            }

            if up_dot > MIN_STEEP_DOT {
                acc.steep_contact_count += 1;
                acc.steep_normal += normal;
                if acc.ground_contact_count == 0 {
                    acc.connected_body = collision.body;
                }
            }

            if desires_climbing && up_dot > self.min_climb_dot && climbable {
                acc.climb_contact_count += 1;
                acc.climb_normal += normal;
                acc.climb_connection = Some(collision.body);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLD: f32 = 0.5;

    fn wall(layer: Layer) -> Collision {
        Collision::static_contact(layer, Vec3::X)
    }

    #[test]
    fn test_flat_ground_is_ground() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        classifier.classify(
            &mut acc,
            &Collision::static_contact(Layer::DEFAULT, Vec3::Y),
            Vec3::Y,
            false,
            THRESHOLD,
        );
        assert_eq!(acc.ground_contact_count, 1);
        assert_eq!(acc.ground_normal, Vec3::Y);
        assert_eq!(acc.steep_contact_count, 0);
    }

    #[test]
    fn test_slope_thresholds() {
        let classifier = ContactClassifier::default();
        // 40 degrees: too steep for ground, fine for stairs
        let normal = Vec3::new(40f32.to_radians().sin(), 40f32.to_radians().cos(), 0.0);

        let mut acc = TickAccumulator::new();
        let slope = Collision::static_contact(Layer::DEFAULT, normal);
        classifier.classify(&mut acc, &slope, Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.ground_contact_count, 0);
        assert_eq!(acc.steep_contact_count, 1);

        let mut acc = TickAccumulator::new();
        let stairs = Collision::static_contact(Layer::STAIRS, normal);
        classifier.classify(&mut acc, &stairs, Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.ground_contact_count, 1);
    }

    #[test]
    fn test_ceiling_is_ignored() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        let ceiling = Collision::static_contact(Layer::DEFAULT, Vec3::NEG_Y);
        classifier.classify(&mut acc, &ceiling, Vec3::Y, false, THRESHOLD);
        assert!(acc.is_empty());
    }

    #[test]
    fn test_climbable_wall_counts_as_steep_and_climb() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        classifier.classify(&mut acc, &wall(Layer::CLIMBABLE), Vec3::Y, true, THRESHOLD);
        assert_eq!(acc.steep_contact_count, 1);
        assert_eq!(acc.climb_contact_count, 1);
        assert_eq!(acc.climb_connection, Some(None));

        // Without intent, only steep
        let mut acc = TickAccumulator::new();
        classifier.classify(&mut acc, &wall(Layer::CLIMBABLE), Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.climb_contact_count, 0);

        // Wrong layer, only steep
        let mut acc = TickAccumulator::new();
        classifier.classify(&mut acc, &wall(Layer::DEFAULT), Vec3::Y, true, THRESHOLD);
        assert_eq!(acc.climb_contact_count, 0);
    }

    #[test]
    fn test_overhang_is_climb_only() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        // 120 degrees from up: a ceiling for walking, fine for climbing
        let normal = Vec3::new(120f32.to_radians().sin(), 120f32.to_radians().cos(), 0.0);
        let overhang = Collision::static_contact(Layer::CLIMBABLE, normal);
        classifier.classify(&mut acc, &overhang, Vec3::Y, true, THRESHOLD);
        assert_eq!(acc.steep_contact_count, 0);
        assert_eq!(acc.climb_contact_count, 1);
    }

    #[test]
    fn test_steep_connection_only_without_ground() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        let floor = Collision::new(Some(BodyHandle(1)), Layer::DEFAULT, vec![Vec3::Y]);
        let side = Collision::new(Some(BodyHandle(2)), Layer::DEFAULT, vec![Vec3::X]);

        classifier.classify(&mut acc, &floor, Vec3::Y, false, THRESHOLD);
        classifier.classify(&mut acc, &side, Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.connected_body, Some(BodyHandle(1)));

        let mut acc = TickAccumulator::new();
        classifier.classify(&mut acc, &side, Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.connected_body, Some(BodyHandle(2)));
    }

    #[test]
    fn test_accumulation_is_additive() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        let floor = Collision::new(None, Layer::DEFAULT, vec![Vec3::Y, Vec3::Y]);
        classifier.classify(&mut acc, &floor, Vec3::Y, false, THRESHOLD);
        classifier.classify(&mut acc, &floor, Vec3::Y, false, THRESHOLD);
        assert_eq!(acc.ground_contact_count, 4);
        assert_eq!(acc.ground_normal, Vec3::new(0.0, 4.0, 0.0));
    }

    #[test]
    fn test_swimming_skips_contacts() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator {
            submergence: 0.6,
            ..Default::default()
        };
        classifier.classify(
            &mut acc,
            &Collision::static_contact(Layer::DEFAULT, Vec3::Y),
            Vec3::Y,
            false,
            THRESHOLD,
        );
        assert_eq!(acc.ground_contact_count, 0);

        // Shallow water still collides
        acc.submergence = 0.2;
        classifier.classify(
            &mut acc,
            &Collision::static_contact(Layer::DEFAULT, Vec3::Y),
            Vec3::Y,
            false,
            THRESHOLD,
        );
        assert_eq!(acc.ground_contact_count, 1);
    }

    #[test]
    fn test_tilted_up_axis() {
        let classifier = ContactClassifier::default();
        let mut acc = TickAccumulator::new();
        // Standing on the side of a planet: up is +X
        classifier.classify(&mut acc, &wall(Layer::DEFAULT), Vec3::X, false, THRESHOLD);
        assert_eq!(acc.ground_contact_count, 1);
    }
}
