//! The fleet a ship may be moving with.

use engine_core::Vec3;

/// Identifies a ship within its fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ShipId(pub u32);

impl std::fmt::Display for ShipId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Fleet-level coordination the autopilot relies on for fleet-wide moves.
///
/// Alignment is polled: a ship registers with [`wait_for_fleet_to_align`]
/// once it faces its destination, checks [`is_fleet_aligned`] every frame, and
/// unregisters with [`remove_fleet_is_aligned_callback`] when it gets under
/// way or abandons the move.
///
/// [`wait_for_fleet_to_align`]: FleetCommand::wait_for_fleet_to_align
/// [`is_fleet_aligned`]: FleetCommand::is_fleet_aligned
/// [`remove_fleet_is_aligned_callback`]: FleetCommand::remove_fleet_is_aligned_callback
pub trait FleetCommand {
    fn wait_for_fleet_to_align(&self, ship: ShipId);
    fn remove_fleet_is_aligned_callback(&self, ship: ShipId);
    fn is_fleet_aligned(&self) -> bool;
    /// Full speed of the fleet as a unit, in units per hour.
    fn unit_full_speed_value(&self) -> f32;
    /// Position of the fleet command (its flagship).
    fn position(&self) -> Vec3;
    /// Distance from the command within which targets can be supported.
    fn support_range(&self) -> f32;
}
