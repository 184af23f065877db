//! The scenario's fleet: members, alignment rounds and unit speed.

use navigation::{FleetCommand, PositionBeacon, ShipId};
use glam::Vec3;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};

/// Fleet command shared by every member helm.
///
/// A fleet-wide move opens an alignment round over its participants. The
/// round reports aligned once every participant waits; it stays aligned while
/// ships unregister on their way out and closes when the last one leaves.
#[derive(Debug)]
pub struct Fleet {
    name: String,
    flagship: RefCell<Option<PositionBeacon>>,
    members: RefCell<BTreeMap<ShipId, f32>>,
    participants: RefCell<BTreeSet<ShipId>>,
    waiting: RefCell<BTreeSet<ShipId>>,
    aligned: Cell<bool>,
    support_range: f32,
}

impl Fleet {
    pub fn new(name: impl Into<String>, support_range: f32) -> Self {
        Self {
            name: name.into(),
            flagship: RefCell::new(None),
            members: RefCell::new(BTreeMap::new()),
            participants: RefCell::new(BTreeSet::new()),
            waiting: RefCell::new(BTreeSet::new()),
            aligned: Cell::new(false),
            support_range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a ship. The first member becomes the flagship.
    pub fn add_member(&self, ship: ShipId, full_speed: f32, beacon: &PositionBeacon) {
        self.members.borrow_mut().insert(ship, full_speed);
        let mut flagship = self.flagship.borrow_mut();
        if flagship.is_none() {
            *flagship = Some(beacon.clone());
        }
    }

    pub fn is_member(&self, ship: ShipId) -> bool {
        self.members.borrow().contains_key(&ship)
    }

    pub fn member_ids(&self) -> Vec<ShipId> {
        self.members.borrow().keys().copied().collect()
    }

    /// Record a member's new full speed. Returns whether the fleet's unit
    /// speed changed as a result.
    pub fn set_member_full_speed(&self, ship: ShipId, full_speed: f32) -> bool {
        let before = self.unit_full_speed_value();
        if let Some(speed) = self.members.borrow_mut().get_mut(&ship) {
            *speed = full_speed;
        }
        self.unit_full_speed_value() != before
    }

    /// Open an alignment round for the ships taking part in a fleet-wide move.
    pub fn begin_fleet_move(&self, ships: impl IntoIterator<Item = ShipId>) {
        let ships: BTreeSet<ShipId> = ships.into_iter().filter(|ship| self.is_member(*ship)).collect();
        log::info!("{}: fleet-wide move with {} ship(s)", self.name, ships.len());
        *self.participants.borrow_mut() = ships;
        self.waiting.borrow_mut().clear();
        self.aligned.set(false);
    }

    /// Drop a ship from the open round. For participants whose order never
    /// got them waiting (rejected, or already at the destination).
    pub fn withdraw(&self, ship: ShipId) {
        let removed = self.participants.borrow_mut().remove(&ship);
        self.waiting.borrow_mut().remove(&ship);
        if removed {
            log::debug!("{}: {ship} withdrawn from the fleet-wide move", self.name);
            self.update_alignment();
        }
    }

    fn update_alignment(&self) {
        let participants = self.participants.borrow();
        let waiting = self.waiting.borrow();
        if !participants.is_empty() && participants.iter().all(|ship| waiting.contains(ship)) {
            if !self.aligned.get() {
                log::info!("{}: all {} ship(s) aligned", self.name, participants.len());
            }
            self.aligned.set(true);
        }
    }
}

impl FleetCommand for Fleet {
    fn wait_for_fleet_to_align(&self, ship: ShipId) {
        log::debug!("{}: {ship} waiting for the fleet to align", self.name);
        self.waiting.borrow_mut().insert(ship);
        self.update_alignment();
    }

    fn remove_fleet_is_aligned_callback(&self, ship: ShipId) {
        let mut waiting = self.waiting.borrow_mut();
        if !waiting.remove(&ship) {
            return;
        }
        if waiting.is_empty() && self.aligned.get() {
            self.participants.borrow_mut().clear();
            self.aligned.set(false);
        }
    }

    fn is_fleet_aligned(&self) -> bool {
        self.aligned.get()
    }

    fn unit_full_speed_value(&self) -> f32 {
        self.members
            .borrow()
            .values()
            .copied()
            .reduce(f32::min)
            .unwrap_or(0.0)
    }

    fn position(&self) -> Vec3 {
        self.flagship
            .borrow()
            .as_ref()
            .map_or(Vec3::ZERO, PositionBeacon::get)
    }

    fn support_range(&self) -> f32 {
        self.support_range
    }
}
