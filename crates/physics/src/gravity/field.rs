//! Registry of active gravity sources.

use std::rc::{Rc, Weak};

use glam::Vec3;

use crate::math::DEGENERATE_LENGTH_SQUARED;

use super::source::GravitySource;

/// Sum of every registered source's contribution.
///
/// The field does not own its sources: the host keeps each one in an `Rc`
/// and the field holds a `Weak`. A source that has been dropped without
/// being unregistered simply stops contributing.
#[derive(Debug, Default)]
pub struct GravityField {
    sources: Vec<Weak<GravitySource>>,
}

impl GravityField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a source to the active set.
    ///
    /// # Panics
    ///
    /// If the source is already registered.
    pub fn register(&mut self, source: &Rc<GravitySource>) {
        assert!(
            self.position_of(source).is_none(),
            "duplicate registration of {} gravity source",
            source.kind()
        );
        log::debug!("registered {} gravity source", source.kind());
        self.sources.push(Rc::downgrade(source));
    }

    /// Remove a source from the active set.
    ///
    /// # Panics
    ///
    /// If the source was never registered.
    pub fn unregister(&mut self, source: &Rc<GravitySource>) {
        let index = self.position_of(source);
        assert!(
            index.is_some(),
            "unregistration of unknown {} gravity source",
            source.kind()
        );
        if let Some(index) = index {
            self.sources.swap_remove(index);
            log::debug!("unregistered {} gravity source", source.kind());
        }
    }

    pub fn contains(&self, source: &Rc<GravitySource>) -> bool {
        self.position_of(source).is_some()
    }

    /// Number of registered sources that are still alive.
    pub fn len(&self) -> usize {
        self.sources.iter().filter(|s| s.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forget sources whose owners have been dropped.
    pub fn prune(&mut self) {
        self.sources.retain(|s| s.strong_count() > 0);
    }

    /// Summed acceleration at `position`.
    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        self.sources
            .iter()
            .filter_map(Weak::upgrade)
            .fold(Vec3::ZERO, |sum, source| sum + source.gravity_at(position))
    }

    /// Unit vector opposite to gravity, or `None` where gravity cancels out.
    pub fn up_axis_at(&self, position: Vec3) -> Option<Vec3> {
        up_from_gravity(self.gravity_at(position))
    }

    /// Gravity and its up axis from a single sum.
    pub fn gravity_and_up(&self, position: Vec3) -> (Vec3, Option<Vec3>) {
        let gravity = self.gravity_at(position);
        (gravity, up_from_gravity(gravity))
    }

    fn position_of(&self, source: &Rc<GravitySource>) -> Option<usize> {
        let target = Rc::as_ptr(source);
        self.sources.iter().position(|s| s.as_ptr() == target)
    }
}

fn up_from_gravity(gravity: Vec3) -> Option<Vec3> {
    if gravity.length_squared() <= DEGENERATE_LENGTH_SQUARED {
        return None;
    }
    Some(-gravity.normalize())
}
