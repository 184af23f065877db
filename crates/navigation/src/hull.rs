//! The physical body a helm steers and an engine room pushes.

use engine_core::{Quat, SimClock, Vec3};

/// Rigid-body surface the navigation core reads and writes.
///
/// Velocities are in units per real second; the engine room converts them to
/// units per game hour with the clock's adjusted hours-per-second rate.
pub trait ShipHull {
    fn position(&self) -> Vec3;
    fn rotation(&self) -> Quat;
    fn set_rotation(&mut self, rotation: Quat);
    fn velocity(&self) -> Vec3;
    fn set_velocity(&mut self, velocity: Vec3);
    /// Replace the force applied during the next physics step.
    fn set_force(&mut self, force: Vec3);
    fn set_drag(&mut self, drag: f32);
    /// Freeze or unfreeze the body in the physics simulation.
    fn set_frozen(&mut self, frozen: bool);

    /// Forward direction of the hull.
    fn heading(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }
}

/// Read-only view of a ship taken once per frame for the autopilot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipSnapshot {
    pub position: Vec3,
    pub heading: Vec3,
    /// Units per real second.
    pub velocity: Vec3,
    /// Units per game hour.
    pub speed: f32,
}

impl ShipSnapshot {
    pub fn capture(hull: &dyn ShipHull, clock: &SimClock) -> Self {
        let velocity = hull.velocity();
        Self {
            position: hull.position(),
            heading: hull.heading(),
            velocity,
            speed: speed_per_hour(velocity, clock),
        }
    }

    /// A stationary ship at `position` facing `heading`.
    pub fn at_rest(position: Vec3, heading: Vec3) -> Self {
        Self {
            position,
            heading: heading.normalize_or_zero(),
            velocity: Vec3::ZERO,
            speed: 0.0,
        }
    }
}

/// Convert a per-second velocity into a speed in units per game hour.
pub fn speed_per_hour(velocity: Vec3, clock: &SimClock) -> f32 {
    let hours_per_second = clock.hours_per_second_adjusted();
    if hours_per_second <= 0.0 {
        return 0.0;
    }
    velocity.length() / hours_per_second
}
