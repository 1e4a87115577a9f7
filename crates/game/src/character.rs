//! The player character: a sphere body steered by a character controller.

use glam::Vec3;
use gravwalk_physics::collision::{CollisionWorld, Layer, LayerMask, SphereBody, StepContacts};
use gravwalk_physics::gravity::GravityField;
use gravwalk_physics::movement::{CharacterController, LocomotionMode, MoveInput, TickReport};

use crate::config::SimulationConfig;

/// A controlled character in the game.
#[derive(Debug, Clone)]
pub struct Character {
    /// Rigid body moved through the world.
    pub body: SphereBody,

    /// Movement controller driving the body.
    pub controller: CharacterController,

    /// Where the character (re)spawns.
    pub spawn: Vec3,
}

impl Character {
    /// Create a character standing at `spawn`.
    pub fn new(spawn: Vec3, config: &SimulationConfig) -> Self {
        let body = SphereBody::new(spawn, config.character_radius, config.character_mass)
            .with_masks(LayerMask::ALL.without(Layer::AGENT), LayerMask::ALL);

        Self {
            body,
            controller: CharacterController::new(config.controller.clone()),
            spawn,
        }
    }

    /// Get the character's current position.
    #[inline]
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    #[inline]
    pub fn mode(&self) -> LocomotionMode {
        self.controller.mode()
    }

    #[inline]
    pub fn on_ground(&self) -> bool {
        self.controller.on_ground()
    }

    /// Run the controller for one tick, writing the body's velocity.
    pub fn steer(
        &mut self,
        input: &MoveInput,
        field: &GravityField,
        world: &CollisionWorld,
        dt: f32,
    ) -> TickReport {
        self.controller
            .advance(dt, input, &mut self.body, field, world)
    }

    /// Move the body and collect what it touched.
    pub fn integrate(&mut self, world: &CollisionWorld, dt: f32) -> StepContacts {
        self.body.step(world, dt)
    }

    /// Hand a step's overlaps and contacts to the controller, triggers first.
    pub fn deliver(&mut self, contacts: &StepContacts, world: &CollisionWorld) {
        for overlap in &contacts.triggers {
            self.controller
                .on_trigger(overlap.contact, self.body.position, world);
        }
        self.controller.on_contacts(&contacts.collisions);
    }

    /// Put the character back at a position with a fresh controller.
    pub fn respawn(&mut self, position: Vec3) {
        self.body.position = position;
        self.body.velocity = Vec3::ZERO;
        self.controller = CharacterController::new(self.controller.config().clone());
        log::debug!("character respawned at {:?}", position);
    }
}
