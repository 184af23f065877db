//! Engine room: turns a requested speed into thrust every physics tick.
//!
//! The thrust job runs while a non-zero speed is requested. Each fixed tick it
//! measures the hull's speed, picks a thrust from the current [`ThrustRegime`],
//! toggles the flaps and hands the resulting force to the hull. Pause and
//! game-speed changes are read off the injected clock.

use engine_core::{SimClock, Vec3};

use crate::hull::{speed_per_hour, ShipHull};
use crate::stats::ShipStats;
use crate::thrust::{is_same_speed_request, ThrustBand, ThrustRegime, ThrustSelection};

/// Drag multiplier while the flaps are deployed.
pub const FLAPS_DRAG_MULTIPLIER: f32 = 10.0;
/// Lateral speed (units per hour) below which drift counts as eliminated.
const DRIFT_TOLERANCE: f32 = 0.05;
/// Strength of the drift counter-force, per second.
const DRIFT_CORRECTION_GAIN: f32 = 2.0;

pub struct EngineRoom {
    ship_name: String,
    mass: f32,
    drag: f32,
    max_thrust: f32,
    max_speed: f32,
    regime: ThrustRegime,
    flaps_deployed: bool,
    is_thrust_engaged: bool,
    is_drift_correction_engaged: bool,
    velocity_at_pause: Option<Vec3>,
    /// Multiplier seen on the last clock; `None` until the first tick.
    game_speed_multiplier: Option<f32>,
    is_paused: bool,
    last_band: Option<ThrustBand>,
}

impl EngineRoom {
    pub fn new(ship_name: impl Into<String>, stats: &ShipStats) -> Self {
        Self {
            ship_name: ship_name.into(),
            mass: stats.mass,
            drag: stats.drag,
            max_thrust: stats.max_thrust,
            max_speed: stats.full_speed,
            regime: ThrustRegime::default(),
            flaps_deployed: false,
            is_thrust_engaged: false,
            is_drift_correction_engaged: false,
            velocity_at_pause: None,
            game_speed_multiplier: None,
            is_paused: false,
            last_band: None,
        }
    }

    pub fn requested_speed(&self) -> f32 {
        self.regime.requested_speed
    }

    pub fn regime(&self) -> &ThrustRegime {
        &self.regime
    }

    pub fn flaps_deployed(&self) -> bool {
        self.flaps_deployed
    }

    /// Drag currently applied to the hull.
    pub fn current_drag(&self) -> f32 {
        if self.flaps_deployed {
            self.drag * FLAPS_DRAG_MULTIPLIER
        } else {
            self.drag
        }
    }

    pub fn is_thrust_engaged(&self) -> bool {
        self.is_thrust_engaged
    }

    pub fn is_drift_correction_engaged(&self) -> bool {
        self.is_drift_correction_engaged
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn max_speed(&self) -> f32 {
        self.max_speed
    }

    /// New ceiling for speed requests (e.g. after damage).
    pub fn set_max_speed(&mut self, max_speed: f32) {
        self.max_speed = max_speed.max(0.0);
    }

    /// Request a new speed in units per hour.
    ///
    /// Returns `false` when the request matches the current one closely
    /// enough that nothing changes; the thresholds are left untouched.
    pub fn change_speed(&mut self, new_speed_request: f32) -> bool {
        let request = if new_speed_request.is_finite() {
            new_speed_request.clamp(0.0, self.max_speed)
        } else {
            log::warn!(
                "{}: ignoring non-finite speed request {}",
                self.ship_name,
                new_speed_request
            );
            return false;
        };

        let previous = self.regime.requested_speed;
        if is_same_speed_request(previous, request) {
            log::debug!(
                "{}: speed request {:.2} matches current {:.2}, ignored",
                self.ship_name,
                request,
                previous
            );
            return false;
        }

        self.regime = ThrustRegime::new(request, self.drag, self.mass, self.max_thrust);
        log::debug!(
            "{}: requested speed {:.2} -> {:.2} (thrust {:.2}/{:.2}/{:.2})",
            self.ship_name,
            previous,
            request,
            self.regime.target_minus,
            self.regime.target,
            self.regime.target_plus
        );
        if !self.is_thrust_engaged && request > 0.0 {
            self.is_thrust_engaged = true;
        }
        true
    }

    /// Thrust for a ship moving at `current_speed` units per hour.
    pub fn thrust_for(&self, current_speed: f32) -> ThrustSelection {
        self.regime.select(current_speed)
    }

    /// Speed of the hull in units per hour.
    pub fn current_speed(&self, hull: &dyn ShipHull, clock: &SimClock) -> f32 {
        speed_per_hour(hull.velocity(), clock)
    }

    /// A turn is starting; any drift correction in progress would fight it.
    pub fn handle_turn_beginning(&mut self) {
        self.is_drift_correction_engaged = false;
    }

    /// Start bleeding off velocity perpendicular to the heading.
    pub fn engage_drift_correction(&mut self) {
        self.is_drift_correction_engaged = true;
    }

    pub fn deploy_flaps(&mut self, hull: &mut dyn ShipHull) {
        if !self.flaps_deployed {
            self.flaps_deployed = true;
            hull.set_drag(self.current_drag());
        }
    }

    pub fn retract_flaps(&mut self, hull: &mut dyn ShipHull) {
        if self.flaps_deployed {
            self.flaps_deployed = false;
            hull.set_drag(self.current_drag());
        }
    }

    /// React to pause and game-speed transitions carried by `clock`.
    pub fn sync_clock(&mut self, clock: &SimClock, hull: &mut dyn ShipHull) {
        match self.game_speed_multiplier {
            None => self.game_speed_multiplier = Some(clock.game_speed),
            Some(previous) if previous != clock.game_speed => {
                self.handle_game_speed_changed(clock.game_speed, hull);
            }
            Some(_) => {}
        }
        if clock.paused != self.is_paused {
            self.handle_pause_changed(clock.paused, hull);
        }
    }

    /// Rescale the hull's velocity so the ship keeps its speed in game time.
    pub fn handle_game_speed_changed(&mut self, new_multiplier: f32, hull: &mut dyn ShipHull) {
        let previous = self.game_speed_multiplier.unwrap_or(new_multiplier);
        self.game_speed_multiplier = Some(new_multiplier);
        if previous <= 0.0 || previous == new_multiplier {
            return;
        }
        let factor = new_multiplier / previous;
        if let Some(cached) = self.velocity_at_pause.as_mut() {
            *cached *= factor;
        } else {
            hull.set_velocity(hull.velocity() * factor);
        }
        log::debug!(
            "{}: game speed x{} -> x{}, velocity scaled by {:.3}",
            self.ship_name,
            previous,
            new_multiplier,
            factor
        );
    }

    /// Freeze the hull on pause and restore it exactly on resume.
    pub fn handle_pause_changed(&mut self, paused: bool, hull: &mut dyn ShipHull) {
        if paused == self.is_paused {
            return;
        }
        self.is_paused = paused;
        if paused {
            self.velocity_at_pause = Some(hull.velocity());
            hull.set_force(Vec3::ZERO);
            hull.set_frozen(true);
        } else {
            hull.set_frozen(false);
            if let Some(velocity) = self.velocity_at_pause.take() {
                hull.set_velocity(velocity);
            }
        }
    }

    /// One physics tick.
    pub fn fixed_update(&mut self, clock: &SimClock, hull: &mut dyn ShipHull) {
        self.sync_clock(clock, hull);
        if self.is_paused {
            return;
        }

        let hours_per_second = clock.hours_per_second_adjusted();
        let mut force = Vec3::ZERO;

        if self.is_thrust_engaged {
            let selection = self.thrust_for(self.current_speed(hull, clock));
            if selection.band.deploys_flaps() {
                self.deploy_flaps(hull);
            } else {
                self.retract_flaps(hull);
            }
            if self.last_band != Some(selection.band) {
                log::trace!(
                    "{}: thrust band {:?}, thrust {:.2}",
                    self.ship_name,
                    selection.band,
                    selection.thrust
                );
                self.last_band = Some(selection.band);
            }
            if selection.band == ThrustBand::Stopped {
                self.is_thrust_engaged = false;
                self.last_band = None;
                log::debug!("{}: all stop, thrust disengaged", self.ship_name);
            }
            force += hull.heading() * selection.thrust * hours_per_second;
        }

        if self.is_drift_correction_engaged {
            force += self.drift_correction_force(hull, clock);
        }

        hull.set_force(force);
    }

    fn drift_correction_force(&mut self, hull: &dyn ShipHull, clock: &SimClock) -> Vec3 {
        let heading = hull.heading();
        let velocity = hull.velocity();
        let lateral = velocity - heading * velocity.dot(heading);
        if speed_per_hour(lateral, clock) < DRIFT_TOLERANCE {
            self.is_drift_correction_engaged = false;
            log::trace!("{}: drift eliminated", self.ship_name);
            return Vec3::ZERO;
        }
        -lateral * self.mass * DRIFT_CORRECTION_GAIN
    }

    /// Stop the thrust job and drift correction.
    pub fn shutdown(&mut self) {
        self.is_thrust_engaged = false;
        self.is_drift_correction_engaged = false;
        self.last_band = None;
    }
}
