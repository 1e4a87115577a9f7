//! Occupancy tracking for trigger volumes.

use gravwalk_physics::collision::ColliderId;
use serde::{Deserialize, Serialize};

/// Something that can stand in a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Occupant {
    Character,
    /// Index into the level's floating bodies.
    Floating(usize),
}

/// Occupancy transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoneEvent {
    /// The zone went from empty to occupied.
    FirstEnter,
    /// The zone went from occupied to empty.
    LastExit,
}

/// Trigger volume that reports when it becomes occupied and empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionZone {
    pub name: String,
    pub collider: ColliderId,
    enabled: bool,
    occupants: Vec<Occupant>,
}

impl DetectionZone {
    pub fn new(name: impl Into<String>, collider: ColliderId) -> Self {
        Self {
            name: name.into(),
            collider,
            enabled: true,
            occupants: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_occupied(&self) -> bool {
        !self.occupants.is_empty()
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn enter(&mut self, occupant: Occupant) -> Option<ZoneEvent> {
        if !self.enabled || self.occupants.contains(&occupant) {
            return None;
        }
        self.occupants.push(occupant);
        (self.occupants.len() == 1).then_some(ZoneEvent::FirstEnter)
    }

    /// Remove an occupant that left or no longer exists.
    pub fn exit(&mut self, occupant: Occupant) -> Option<ZoneEvent> {
        let index = self.occupants.iter().position(|o| *o == occupant)?;
        self.occupants.remove(index);
        self.occupants.is_empty().then_some(ZoneEvent::LastExit)
    }

    /// Reconcile with the occupants overlapping the zone this tick.
    ///
    /// Exits are processed before entries, so a full swap of occupants in
    /// one tick reports `LastExit` then `FirstEnter`.
    pub fn sync(&mut self, present: &[Occupant]) -> Vec<ZoneEvent> {
        if !self.enabled {
            return Vec::new();
        }
        let mut events = Vec::new();
        let gone: Vec<Occupant> = self
            .occupants
            .iter()
            .copied()
            .filter(|o| !present.contains(o))
            .collect();
        for occupant in gone {
            events.extend(self.exit(occupant));
        }
        for &occupant in present {
            events.extend(self.enter(occupant));
        }
        events
    }

    /// Disable the zone, emptying it.
    pub fn disable(&mut self) -> Option<ZoneEvent> {
        self.enabled = false;
        if self.occupants.is_empty() {
            return None;
        }
        self.occupants.clear();
        Some(ZoneEvent::LastExit)
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> DetectionZone {
        DetectionZone::new("gate", ColliderId(3))
    }

    #[test]
    fn test_first_enter_and_last_exit() {
        let mut zone = zone();
        assert_eq!(zone.enter(Occupant::Character), Some(ZoneEvent::FirstEnter));
        assert_eq!(zone.enter(Occupant::Floating(0)), None);
        assert_eq!(zone.exit(Occupant::Character), None);
        assert_eq!(zone.exit(Occupant::Floating(0)), Some(ZoneEvent::LastExit));
        assert!(!zone.is_occupied());
    }

    #[test]
    fn test_one_event_pair_per_occupancy() {
        let mut zone = zone();
        let frames: [&[Occupant]; 6] = [
            &[],
            &[Occupant::Character],
            &[Occupant::Character, Occupant::Floating(1)],
            &[Occupant::Floating(1)],
            &[],
            &[],
        ];
        let events: Vec<ZoneEvent> = frames.iter().flat_map(|present| zone.sync(present)).collect();
        assert_eq!(events, vec![ZoneEvent::FirstEnter, ZoneEvent::LastExit]);
    }

    #[test]
    fn test_unknown_exit_is_ignored() {
        let mut zone = zone();
        assert_eq!(zone.exit(Occupant::Character), None);
    }

    #[test]
    fn test_disable_reports_last_exit() {
        let mut zone = zone();
        zone.enter(Occupant::Character);
        assert_eq!(zone.disable(), Some(ZoneEvent::LastExit));
        assert!(!zone.is_occupied());
        // Disabled zones track nothing
        assert_eq!(zone.enter(Occupant::Character), None);
        assert!(zone.sync(&[Occupant::Character]).is_empty());
        assert_eq!(zone.disable(), None);

        zone.enable();
        assert_eq!(zone.enter(Occupant::Character), Some(ZoneEvent::FirstEnter));
    }
}
