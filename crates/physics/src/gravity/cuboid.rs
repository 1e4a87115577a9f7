//! Box-shaped gravity: pulls toward the nearest wall from inside, toward the
//! box surface from outside.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::math::Frame;

use super::source::{linear_falloff, STANDARD_GRAVITY};

/// Gravity around and inside an oriented box.
///
/// Inside the box only the axis with the closest wall pulls, at full
/// strength within `inner_distance` of that wall and fading to zero at
/// `inner_falloff_distance`. Outside, gravity points from the query point
/// to the nearest point on the box, full strength up to `outer_distance`
/// and fading to zero at `outer_falloff_distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxGravity {
    pub frame: Frame,
    pub gravity: f32,
    /// Half-extents of the box in its local frame.
    pub boundary_distance: Vec3,
    pub inner_distance: f32,
    pub inner_falloff_distance: f32,
    pub outer_distance: f32,
    pub outer_falloff_distance: f32,
}

impl Default for BoxGravity {
    fn default() -> Self {
        Self {
            frame: Frame::IDENTITY,
            gravity: STANDARD_GRAVITY,
            boundary_distance: Vec3::ONE,
            inner_distance: 0.0,
            inner_falloff_distance: 0.0,
            outer_distance: 1.0,
            outer_falloff_distance: 2.0,
        }
    }
}

impl BoxGravity {
    /// Box with the given half-extents and default falloff bands.
    pub fn new(frame: Frame, gravity: f32, boundary_distance: Vec3) -> Self {
        Self {
            frame,
            gravity,
            boundary_distance,
            ..Default::default()
        }
        .normalized()
    }

    pub fn with_inner(mut self, inner_distance: f32, inner_falloff_distance: f32) -> Self {
        self.inner_distance = inner_distance;
        self.inner_falloff_distance = inner_falloff_distance;
        self.normalized()
    }

    pub fn with_outer(mut self, outer_distance: f32, outer_falloff_distance: f32) -> Self {
        self.outer_distance = outer_distance;
        self.outer_falloff_distance = outer_falloff_distance;
        self.normalized()
    }

    /// Clamp distances into a consistent order instead of rejecting them.
    pub fn normalized(mut self) -> Self {
        self.boundary_distance = self.boundary_distance.max(Vec3::ZERO);
        let max_inner = self.boundary_distance.min_element();
        self.inner_distance = self.inner_distance.max(0.0).min(max_inner);
        self.inner_falloff_distance = self
            .inner_falloff_distance
            .min(max_inner)
            .max(self.inner_distance);
        self.outer_distance = self.outer_distance.max(0.0);
        self.outer_falloff_distance = self.outer_falloff_distance.max(self.outer_distance);
        self
    }

    pub fn gravity_at(&self, position: Vec3) -> Vec3 {
        let local = self.frame.inverse_transform_direction(position - self.frame.translation);
        let bounds = self.boundary_distance;

        let mut vector = Vec3::ZERO;
        let mut outside = 0;
        for axis in 0..3 {
            if local[axis] > bounds[axis] {
                vector[axis] = bounds[axis] - local[axis];
                outside += 1;
            } else if local[axis] < -bounds[axis] {
                vector[axis] = -bounds[axis] - local[axis];
                outside += 1;
            }
        }

        if outside > 0 {
            // Face region: only one component is non-zero
            let distance = if outside == 1 {
                (vector.x + vector.y + vector.z).abs()
            } else {
                vector.length()
            };
            if distance > self.outer_falloff_distance || distance <= f32::EPSILON {
                return Vec3::ZERO;
            }
            let mut g = self.gravity / distance;
            if distance > self.outer_distance {
                g *= linear_falloff(distance, self.outer_distance, self.outer_falloff_distance);
            }
            return self.frame.transform_direction(vector * g);
        }

        let distances = bounds - local.abs();
        if distances.x < distances.y {
            if distances.x < distances.z {
                vector.x = self.gravity_component(local.x, distances.x);
            } else {
                vector.z = self.gravity_component(local.z, distances.z);
            }
        } else if distances.y < distances.z {
            vector.y = self.gravity_component(local.y, distances.y);
        } else {
            vector.z = self.gravity_component(local.z, distances.z);
        }
        self.frame.transform_direction(vector)
    }

    /// Pull along one axis toward the wall `distance` away.
    fn gravity_component(&self, coordinate: f32, distance: f32) -> f32 {
        if distance > self.inner_falloff_distance {
            return 0.0;
        }
        let mut g = self.gravity;
        if distance > self.inner_distance {
            g *= linear_falloff(distance, self.inner_distance, self.inner_falloff_distance);
        }
        if coordinate > 0.0 {
            g
        } else {
            -g
        }
    }
}
