//! Reference collision world backed by parry3d.
//!
//! Holds colliders (optionally attached to rigid bodies) and answers the
//! queries a character controller needs: ray casts, sphere contact
//! manifolds and trigger overlaps. Bodies are only moved by the host;
//! there is no rigid-body solver here.

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{self, Ray, RayCast};
use parry3d::shape::{Ball, SharedShape};
use serde::{Deserialize, Serialize};

use crate::math::{Frame, DEGENERATE_LENGTH_SQUARED};

use super::layers::{Layer, LayerMask};
use super::query::{BodyHandle, BodyState, PhysicsQuery, RayHit, TriggerContact, TriggerInteraction};

/// Identifier of a collider within a [`CollisionWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColliderId(pub u32);

/// A piece of collision geometry.
#[derive(Debug, Clone)]
pub struct Collider {
    pub id: ColliderId,
    pub shape: SharedShape,
    /// Pose relative to the attached body, or world pose when static.
    pub local: Frame,
    pub body: Option<BodyHandle>,
    pub layer: Layer,
    /// Triggers report overlaps but never push anything.
    pub trigger: bool,
}

/// A rigid body the host moves explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pose: Frame,
    pub mass: f32,
    pub kinematic: bool,
    pub sleeping: bool,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Body {
    fn state(&self) -> BodyState {
        BodyState {
            pose: self.pose,
            mass: self.mass,
            kinematic: self.kinematic,
            sleeping: self.sleeping,
            linear_velocity: self.linear_velocity,
            angular_velocity: self.angular_velocity,
        }
    }

    /// Velocity of the material point at `point` (world space).
    pub fn velocity_at(&self, point: Vec3) -> Vec3 {
        self.linear_velocity + self.angular_velocity.cross(point - self.pose.translation)
    }
}

/// Contact between a query sphere and a solid collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereContact {
    pub collider: ColliderId,
    pub body: Option<BodyHandle>,
    pub layer: Layer,
    /// Outward normal of the collider, pointing at the sphere.
    pub normal: Vec3,
    /// Closest point on the collider surface.
    pub point: Vec3,
    /// Signed separation; negative when penetrating.
    pub distance: f32,
}

/// Overlap between a query sphere and a trigger collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerOverlap {
    pub collider: ColliderId,
    pub contact: TriggerContact,
}

/// The collision world containing all geometry.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    colliders: Vec<Collider>,
    bodies: Vec<Body>,
    next_collider: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Bodies
    // ========================================================================

    /// Add a rigid body. Colliders attached to it follow its pose.
    pub fn add_body(&mut self, pose: Frame, mass: f32, kinematic: bool) -> BodyHandle {
        let handle = BodyHandle(self.bodies.len() as u32);
        self.bodies.push(Body {
            pose,
            mass: mass.max(0.0),
            kinematic,
            sleeping: false,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        });
        handle
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        self.bodies.get(handle.0 as usize)
    }

    pub fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        self.bodies.get_mut(handle.0 as usize)
    }

    /// Move a body to a new pose, deriving its velocities from the motion
    /// over `dt`.
    pub fn set_body_pose(&mut self, handle: BodyHandle, pose: Frame, dt: f32) {
        let Some(body) = self.bodies.get_mut(handle.0 as usize) else {
            log::warn!("set_body_pose on unknown body {:?}", handle);
            return;
        };
        if dt > 0.0 {
            body.linear_velocity = (pose.translation - body.pose.translation) / dt;
            body.angular_velocity = angular_velocity(body.pose.rotation, pose.rotation, dt);
        }
        body.pose = pose;
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    // ========================================================================
    // Colliders
    // ========================================================================

    /// Add a collider with an arbitrary parry3d shape.
    pub fn add_collider(
        &mut self,
        shape: SharedShape,
        local: Frame,
        body: Option<BodyHandle>,
        layer: Layer,
        trigger: bool,
    ) -> ColliderId {
        let id = ColliderId(self.next_collider);
        self.next_collider += 1;
        self.colliders.push(Collider {
            id,
            shape,
            local,
            body,
            layer,
            trigger,
        });
        id
    }

    /// Add a static axis-aligned box.
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, layer: Layer) -> ColliderId {
        self.add_oriented_box(Frame::from_translation(center), half_extents, layer)
    }

    /// Add a static oriented box.
    pub fn add_oriented_box(&mut self, pose: Frame, half_extents: Vec3, layer: Layer) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.add_collider(shape, pose, None, layer, false)
    }

    /// Add a static ball.
    pub fn add_ball(&mut self, center: Vec3, radius: f32, layer: Layer) -> ColliderId {
        let shape = SharedShape::ball(radius);
        self.add_collider(shape, Frame::from_translation(center), None, layer, false)
    }

    /// Attach a solid box to a body.
    pub fn attach_box(
        &mut self,
        body: BodyHandle,
        local: Frame,
        half_extents: Vec3,
        layer: Layer,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.add_collider(shape, local, Some(body), layer, false)
    }

    /// Attach a solid ball to a body.
    pub fn attach_ball(&mut self, body: BodyHandle, radius: f32, layer: Layer) -> ColliderId {
        let shape = SharedShape::ball(radius);
        self.add_collider(shape, Frame::IDENTITY, Some(body), layer, false)
    }

    /// Add a trigger box, optionally attached to a body.
    pub fn add_trigger_box(
        &mut self,
        pose: Frame,
        half_extents: Vec3,
        layer: Layer,
        body: Option<BodyHandle>,
    ) -> ColliderId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.add_collider(shape, pose, body, layer, true)
    }

    pub fn collider(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.id == id)
    }

    pub fn remove_collider(&mut self, id: ColliderId) -> Option<Collider> {
        let index = self.colliders.iter().position(|c| c.id == id)?;
        Some(self.colliders.remove(index))
    }

    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// World pose of a collider.
    pub fn collider_pose(&self, collider: &Collider) -> Frame {
        match collider.body.and_then(|b| self.body(b)) {
            Some(body) => body.pose.mul_frame(&collider.local),
            None => collider.local,
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Solid contacts of a sphere within `prediction` of its surface.
    ///
    /// Colliders attached to `exclude` are skipped so a body never collides
    /// with itself.
    pub fn sphere_contacts(
        &self,
        center: Vec3,
        radius: f32,
        prediction: f32,
        mask: LayerMask,
        exclude: Option<BodyHandle>,
    ) -> Vec<SphereContact> {
        let ball = Ball::new(radius);
        let ball_pose = to_isometry(&Frame::from_translation(center));

        let mut contacts = Vec::new();
        for collider in self.filtered(mask, TriggerInteraction::Ignore, exclude) {
            let pose = to_isometry(&self.collider_pose(collider));
            // Collider first so normal1 is its outward surface normal
            let Ok(Some(contact)) = query::contact(
                &pose,
                collider.shape.as_ref(),
                &ball_pose,
                &ball,
                prediction,
            ) else {
                continue;
            };
            let normal = from_vector(&contact.normal1);
            if normal.length_squared() <= DEGENERATE_LENGTH_SQUARED {
                continue;
            }
            contacts.push(SphereContact {
                collider: collider.id,
                body: collider.body,
                layer: collider.layer,
                normal,
                point: from_point(&contact.point1),
                distance: contact.dist,
            });
        }
        contacts
    }

    /// Trigger colliders overlapping a sphere.
    pub fn overlapping_triggers(
        &self,
        center: Vec3,
        radius: f32,
        mask: LayerMask,
        exclude: Option<BodyHandle>,
    ) -> Vec<TriggerOverlap> {
        let ball = Ball::new(radius);
        let ball_pose = to_isometry(&Frame::from_translation(center));

        self.colliders
            .iter()
            .filter(|c| c.trigger && mask.contains(c.layer))
            .filter(|c| exclude.is_none() || c.body != exclude)
            .filter(|c| {
                let pose = to_isometry(&self.collider_pose(c));
                matches!(
                    query::intersection_test(&pose, c.shape.as_ref(), &ball_pose, &ball),
                    Ok(true)
                )
            })
            .map(|c| TriggerOverlap {
                collider: c.id,
                contact: TriggerContact {
                    body: c.body,
                    layer: c.layer,
                },
            })
            .collect()
    }

    fn filtered(
        &self,
        mask: LayerMask,
        triggers: TriggerInteraction,
        exclude: Option<BodyHandle>,
    ) -> impl Iterator<Item = &Collider> {
        self.colliders.iter().filter(move |c| {
            mask.contains(c.layer)
                && (!c.trigger || triggers == TriggerInteraction::Collide)
                && (exclude.is_none() || c.body != exclude)
        })
    }
}

impl PhysicsQuery for CollisionWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
        triggers: TriggerInteraction,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        if max_distance <= 0.0 {
            return None;
        }
        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let mut closest: Option<RayHit> = None;
        for collider in self.filtered(mask, triggers, None) {
            let pose = to_isometry(&self.collider_pose(collider));
            // Solid cast: a ray starting inside a volume hits at distance 0
            let Some(hit) = collider
                .shape
                .cast_ray_and_get_normal(&pose, &ray, max_distance, true)
            else {
                continue;
            };
            if closest.is_some_and(|c| hit.time_of_impact >= c.distance) {
                continue;
            }
            let normal = from_vector(&hit.normal);
            closest = Some(RayHit {
                distance: hit.time_of_impact,
                point: origin + dir * hit.time_of_impact,
                normal: normal.try_normalize().unwrap_or(-dir),
                body: collider.body,
                layer: collider.layer,
            });
        }
        closest
    }

    fn body_state(&self, body: BodyHandle) -> Option<BodyState> {
        self.body(body).map(Body::state)
    }
}

// ============================================================================
// glam <-> nalgebra conversions
// ============================================================================

fn to_isometry(frame: &Frame) -> Isometry<Real> {
    let t = frame.translation;
    let q = frame.rotation;
    Isometry::from_parts(
        Translation3::new(t.x, t.y, t.z),
        UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z)),
    )
}

fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

fn angular_velocity(from: Quat, to: Quat, dt: f32) -> Vec3 {
    let mut delta = to * from.inverse();
    // Shortest arc
    if delta.w < 0.0 {
        delta = -delta;
    }
    let (axis, angle) = delta.to_axis_angle();
    if angle.abs() <= f32::EPSILON || !axis.is_finite() {
        return Vec3::ZERO;
    }
    axis * (angle / dt)
}

// ============================================================================
// Tests
// ============================================================================
