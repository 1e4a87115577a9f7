//! Game simulation - the main game loop.
//!
//! Every tick runs in a fixed order so that the same inputs always produce
//! the same result:
//!
//! 1. sliding platforms move their kinematic bodies
//! 2. the character controller writes the character's velocity
//! 3. the character and the floating props integrate against the world
//! 4. contacts and trigger overlaps are handed back to their owners
//! 5. acceleration zones and detection zones react to the overlaps

use std::collections::BTreeSet;

use glam::Vec3;
use gravwalk_physics::collision::{ColliderId, TriggerOverlap};
use gravwalk_physics::gravity::GravityField;
use gravwalk_physics::movement::LocomotionMode;
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::config::SimulationConfig;
use crate::environment::{Occupant, ZoneEvent};
use crate::input::PlayerInput;
use crate::level::Level;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Tick the event happened in.
    pub frame: u64,
    pub kind: EventKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// The character's locomotion mode changed.
    ModeChanged {
        from: LocomotionMode,
        to: LocomotionMode,
    },
    /// The character jumped.
    Jumped,
    /// A detection zone became occupied or empty.
    Zone { name: String, event: ZoneEvent },
}

/// The game simulation: one character in one level.
#[derive(Debug)]
pub struct Simulation {
    /// Current frame/tick number.
    pub frame: u64,

    /// Simulation configuration.
    pub config: SimulationConfig,

    /// Current level.
    pub level: Level,

    /// Gravity field built from the level's sources.
    pub field: GravityField,

    /// The player character.
    pub character: Character,

    /// Acceleration zones (by index) and who was inside them last tick.
    zone_occupants: BTreeSet<(usize, Occupant)>,

    events: Vec<SimulationEvent>,
}

impl Simulation {
    /// Create a new simulation with the given configuration and level.
    pub fn new(config: SimulationConfig, level: Level) -> Self {
        let config = config.validated();

        let mut field = GravityField::new();
        for source in &level.gravity {
            field.register(source);
        }

        let character = Character::new(level.spawn, &config);
        log::info!(
            "simulation started in level `{}` at {} Hz with {} gravity source(s)",
            level.id,
            config.tick_rate,
            field.len()
        );

        Self {
            frame: 0,
            config,
            level,
            field,
            character,
            zone_occupants: BTreeSet::new(),
            events: Vec::new(),
        }
    }

    /// Create a simulation with default configuration on flat ground.
    pub fn test() -> Self {
        Self::new(SimulationConfig::default(), Level::flat())
    }

    /// Get the delta time for this simulation.
    pub fn delta_time(&self) -> f32 {
        self.config.delta_time()
    }

    /// Events recorded since the last drain.
    pub fn events(&self) -> &[SimulationEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Put the character back at the level spawn.
    pub fn respawn(&mut self) {
        self.character.respawn(self.level.spawn);
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self, input: &PlayerInput) {
        let dt = self.config.delta_time();

        for platform in &mut self.level.platforms {
            platform.advance(&mut self.level.world, dt);
        }

        // Character controller
        let previous_mode = self.character.mode();
        let report = self.character.steer(
            &input.to_move_input(),
            &self.field,
            &self.level.world,
            dt,
        );
        if report.mode != previous_mode {
            self.push(EventKind::ModeChanged {
                from: previous_mode,
                to: report.mode,
            });
        }
        if report.jumped {
            self.push(EventKind::Jumped);
        }

        // Integration
        let character_contacts = self.character.integrate(&self.level.world, dt);
        self.character.deliver(&character_contacts, &self.level.world);
        let character_triggers = trigger_ids(&character_contacts.triggers);

        let mut floating_triggers = Vec::with_capacity(self.level.floating.len());
        for floating in &mut self.level.floating {
            floating.apply_forces(&self.field, dt);
            let contacts = floating.body.step(&self.level.world, dt);
            let in_water = contacts
                .triggers
                .iter()
                .any(|t| floating.buoyancy.water_mask.contains(t.contact.layer));
            if in_water {
                let up = self
                    .field
                    .up_axis_at(floating.body.position)
                    .unwrap_or(Vec3::Y);
                floating.evaluate_submergence(&self.level.world, up);
            }
            floating_triggers.push(trigger_ids(&contacts.triggers));
        }

        self.update_acceleration_zones(&character_triggers, &floating_triggers, dt);
        self.update_detection_zones(&character_triggers, &floating_triggers);

        log::trace!(
            "frame {} {} at {:?}",
            self.frame,
            report.mode,
            self.character.position()
        );
        self.frame += 1;
    }

    fn update_acceleration_zones(
        &mut self,
        character_triggers: &[ColliderId],
        floating_triggers: &[Vec<ColliderId>],
        dt: f32,
    ) {
        let mut inside = BTreeSet::new();

        for (index, zone) in self.level.acceleration_zones.iter().enumerate() {
            if character_triggers.contains(&zone.collider) {
                let key = (index, Occupant::Character);
                let entering = !self.zone_occupants.contains(&key);
                inside.insert(key);
                if zone.acts_on(entering) {
                    if let Some(velocity) = zone.accelerate(self.character.body.velocity, dt) {
                        self.character.body.velocity = velocity;
                        self.character.controller.prevent_ground_snap();
                    }
                }
            }

            for (i, triggers) in floating_triggers.iter().enumerate() {
                if !triggers.contains(&zone.collider) {
                    continue;
                }
                let key = (index, Occupant::Floating(i));
                let entering = !self.zone_occupants.contains(&key);
                inside.insert(key);
                if !zone.acts_on(entering) {
                    continue;
                }
                if let Some(floating) = self.level.floating.get_mut(i) {
                    if let Some(velocity) = zone.accelerate(floating.body.velocity, dt) {
                        floating.body.velocity = velocity;
                        floating.wake();
                    }
                }
            }
        }

        self.zone_occupants = inside;
    }

    fn update_detection_zones(
        &mut self,
        character_triggers: &[ColliderId],
        floating_triggers: &[Vec<ColliderId>],
    ) {
        let mut fired = Vec::new();
        for zone in &mut self.level.detection_zones {
            let mut present = Vec::new();
            if character_triggers.contains(&zone.collider) {
                present.push(Occupant::Character);
            }
            for (i, triggers) in floating_triggers.iter().enumerate() {
                if triggers.contains(&zone.collider) {
                    present.push(Occupant::Floating(i));
                }
            }

            for event in zone.sync(&present) {
                log::debug!("zone `{}`: {:?}", zone.name, event);
                fired.push(EventKind::Zone {
                    name: zone.name.clone(),
                    event,
                });
            }
        }
        for kind in fired {
            self.push(kind);
        }
    }

    fn push(&mut self, kind: EventKind) {
        if let EventKind::ModeChanged { from, to } = &kind {
            log::debug!("frame {}: {} -> {}", self.frame, from, to);
        }
        self.events.push(SimulationEvent {
            frame: self.frame,
            kind,
        });
    }
}

fn trigger_ids(triggers: &[TriggerOverlap]) -> Vec<ColliderId> {
    triggers.iter().map(|t| t.collider).collect()
}

// ============================================================================
// Tests
// ============================================================================
