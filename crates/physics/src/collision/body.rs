//! A dynamic sphere moved through the [`CollisionWorld`].
//!
//! The integrator is deliberately minimal: explicit Euler, penetration
//! pushed out along contact normals, and the approaching part of the
//! velocity removed. It is enough to let a character controller stand,
//! slide, climb and ride platforms without a full rigid-body solver.

use std::collections::BTreeMap;

use glam::Vec3;

use super::layers::LayerMask;
use super::query::{BodyHandle, Collision, ControlledBody};
use super::world::{ColliderId, CollisionWorld, TriggerOverlap};

/// Solver iterations for penetration recovery.
const MAX_ITERATIONS: usize = 4;

/// Separation under which a surface still counts as touching.
pub const CONTACT_SKIN: f32 = 0.02;

/// Result of one integration step.
#[derive(Debug, Clone, Default)]
pub struct StepContacts {
    /// One entry per collider touched, with all its contact normals.
    pub collisions: Vec<Collision>,
    /// Trigger volumes overlapping the body after the step.
    pub triggers: Vec<TriggerOverlap>,
}

/// Dynamic sphere.
#[derive(Debug, Clone, PartialEq)]
pub struct SphereBody {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub mass: f32,
    /// Layers this body collides with.
    pub collision_mask: LayerMask,
    /// Layers whose triggers this body reports.
    pub trigger_mask: LayerMask,
    /// Own body in the world, excluded from every query.
    pub handle: Option<BodyHandle>,
}

impl SphereBody {
    pub fn new(position: Vec3, radius: f32, mass: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            radius,
            mass,
            collision_mask: LayerMask::ALL,
            trigger_mask: LayerMask::ALL,
            handle: None,
        }
    }

    pub fn with_masks(mut self, collision_mask: LayerMask, trigger_mask: LayerMask) -> Self {
        self.collision_mask = collision_mask;
        self.trigger_mask = trigger_mask;
        self
    }

    pub fn with_handle(mut self, handle: BodyHandle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Integrate over `dt` and resolve contacts against the world.
    pub fn step(&mut self, world: &CollisionWorld, dt: f32) -> StepContacts {
        self.position += self.velocity * dt;

        let mut touched: BTreeMap<ColliderId, Collision> = BTreeMap::new();
        for _ in 0..MAX_ITERATIONS {
            let contacts = world.sphere_contacts(
                self.position,
                self.radius,
                CONTACT_SKIN,
                self.collision_mask,
                self.handle,
            );
            let mut penetrating = false;

            for contact in &contacts {
                let entry = touched.entry(contact.collider).or_insert_with(|| Collision {
                    body: contact.body,
                    layer: contact.layer,
                    normals: Vec::new(),
                });
                if !entry
                    .normals
                    .iter()
                    .any(|n| n.dot(contact.normal) > 0.9999)
                {
                    entry.normals.push(contact.normal);
                }

                if contact.distance < 0.0 {
                    penetrating = true;
                    self.position += contact.normal * -contact.distance;
                }

                // Never approach the surface faster than it moves
                let surface_velocity = contact
                    .body
                    .and_then(|b| world.body(b))
                    .map(|b| b.velocity_at(contact.point))
                    .unwrap_or(Vec3::ZERO);
                let approach = (self.velocity - surface_velocity).dot(contact.normal);
                if approach < 0.0 && contact.distance <= 0.0 {
                    self.velocity -= contact.normal * approach;
                }
            }

            if !penetrating {
                break;
            }
        }

        let triggers =
            world.overlapping_triggers(self.position, self.radius, self.trigger_mask, self.handle);

        log::trace!(
            "sphere body at {:?}: {} collisions, {} triggers",
            self.position,
            touched.len(),
            triggers.len()
        );

        StepContacts {
            collisions: touched.into_values().collect(),
            triggers,
        }
    }
}

impl ControlledBody for SphereBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn mass(&self) -> f32 {
        self.mass
    }
}
