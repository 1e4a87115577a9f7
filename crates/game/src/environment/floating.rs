//! Dynamic props that fall along the gravity field and float in water.

use glam::Vec3;
use gravwalk_physics::collision::{CollisionWorld, PhysicsQuery, SphereBody, TriggerInteraction};
use gravwalk_physics::gravity::GravityField;
use gravwalk_physics::{Layer, LayerMask};

/// Squared speed under which a floating body counts as still.
const REST_SPEED_SQUARED: f32 = 0.0001;

/// Seconds a body must stay still before it goes to sleep.
const SLEEP_DELAY: f32 = 1.0;

/// Buoyancy parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Buoyancy {
    /// Probe start above each buoyancy point.
    pub submergence_offset: f32,
    /// Depth over which a point goes from dry to fully submerged.
    pub submergence_range: f32,
    /// 1 is neutral, above floats, below sinks.
    pub buoyancy: f32,
    pub water_drag: f32,
    pub water_mask: LayerMask,
    /// Offsets from the body center where buoyancy acts. Forces are split
    /// evenly between them.
    pub points: Vec<Vec3>,
}

impl Default for Buoyancy {
    fn default() -> Self {
        Self {
            submergence_offset: 0.5,
            submergence_range: 1.0,
            buoyancy: 1.0,
            water_drag: 1.0,
            water_mask: Layer::WATER.mask(),
            points: vec![Vec3::ZERO],
        }
    }
}

/// A sphere driven by the gravity field with per-point buoyancy.
#[derive(Debug, Clone)]
pub struct FloatingBody {
    pub body: SphereBody,
    pub buoyancy: Buoyancy,
    /// Let the body sleep once it has been still for a while.
    pub float_to_sleep: bool,
    submergence: Vec<f32>,
    still_time: f32,
    sleeping: bool,
}

impl FloatingBody {
    pub fn new(body: SphereBody, buoyancy: Buoyancy) -> Self {
        let points = buoyancy.points.len();
        Self {
            body,
            buoyancy,
            float_to_sleep: true,
            submergence: vec![0.0; points],
            still_time: 0.0,
            sleeping: false,
        }
    }

    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    pub fn wake(&mut self) {
        self.sleeping = false;
        self.still_time = 0.0;
    }

    /// Current submergence of each buoyancy point.
    pub fn submergence(&self) -> &[f32] {
        &self.submergence
    }

    /// Probe water depth at every buoyancy point. Call while overlapping
    /// water; the result is used and cleared by the next `apply_forces`.
    pub fn evaluate_submergence(&mut self, world: &CollisionWorld, up: Vec3) {
        let params = &self.buoyancy;
        for (depth, offset) in self.submergence.iter_mut().zip(&params.points) {
            let origin = self.body.position + *offset + up * params.submergence_offset;
            let hit = world.raycast(
                origin,
                -up,
                params.submergence_range + 1.0,
                params.water_mask,
                TriggerInteraction::Collide,
            );
            *depth = match hit {
                Some(hit) => (1.0 - hit.distance / params.submergence_range).clamp(0.0, 1.0),
                None => 1.0,
            };
        }
    }

    /// Apply gravity, buoyancy and drag for one tick.
    pub fn apply_forces(&mut self, field: &GravityField, dt: f32) {
        if self.sleeping {
            return;
        }
        if self.float_to_sleep && self.update_sleep(dt) {
            return;
        }

        let gravity = field.gravity_at(self.body.position);
        let mut velocity = self.body.velocity;
        let mut acceleration = gravity;

        let count = self.submergence.len().max(1) as f32;
        let params = &self.buoyancy;
        for depth in &mut self.submergence {
            if *depth > 0.0 {
                let drag = (1.0 - params.water_drag * *depth * dt / count).max(0.0);
                velocity *= drag;
                acceleration -= gravity * (params.buoyancy * *depth / count);
            }
            *depth = 0.0;
        }
        self.body.velocity = velocity + acceleration * dt;
    }

    /// Advance the still timer; true once the body has fallen asleep.
    fn update_sleep(&mut self, dt: f32) -> bool {
        if self.body.velocity.length_squared() < REST_SPEED_SQUARED {
            self.still_time += dt;
            if self.still_time >= SLEEP_DELAY {
                self.sleeping = true;
                self.body.velocity = Vec3::ZERO;
                log::trace!("floating body at {:?} fell asleep", self.body.position);
                return true;
            }
        } else {
            self.still_time = 0.0;
        }
        false
    }
}
