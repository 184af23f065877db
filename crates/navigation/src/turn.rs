//! Turn execution: a rate-limited rotation advanced once per frame.

use engine_core::{angle_between_degrees, turn_towards, GameDate, SimClock, Vec3};

use crate::hull::ShipHull;
use crate::tasks::TaskKind;

/// A heading within this many degrees of the intended one counts as reached.
pub const HEADING_REACHED_DEGREES: f32 = 0.1;
/// Slack applied to the expected turn duration before warning.
const TURN_WARN_FACTOR: f64 = 3.0;
/// Smallest budget a turn gets before a warning, in game hours.
const MIN_TURN_WARN_HOURS: f64 = 0.1;
/// Further game hours past the warning before an overdue turn is an error.
const TURN_ERROR_GRACE_HOURS: f64 = 2.0;

/// Identifies one requested turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(pub u64);

/// Who hears about a turn's outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnListener {
    None,
    /// Reported as a helm event.
    Captain(TurnId),
    /// Routed back to the pursuit task that asked for it.
    Pilot { task: TaskKind, tag: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnProgress {
    Turning,
    Reached,
}

#[derive(Debug)]
pub struct TurnTask {
    id: TurnId,
    intended_heading: Vec3,
    eliminate_drift: bool,
    listener: TurnListener,
    warn_date: Option<GameDate>,
    error_date: Option<GameDate>,
    warned: bool,
    errored: bool,
}

impl TurnTask {
    pub fn new(id: TurnId, intended_heading: Vec3, eliminate_drift: bool, listener: TurnListener) -> Self {
        Self {
            id,
            intended_heading,
            eliminate_drift,
            listener,
            warn_date: None,
            error_date: None,
            warned: false,
            errored: false,
        }
    }

    pub fn id(&self) -> TurnId {
        self.id
    }

    pub fn intended_heading(&self) -> Vec3 {
        self.intended_heading
    }

    pub fn eliminate_drift(&self) -> bool {
        self.eliminate_drift
    }

    pub fn listener(&self) -> TurnListener {
        self.listener
    }

    /// Rotate the hull toward the intended heading by what the turn rate
    /// allows for this frame.
    pub fn advance(
        &mut self,
        clock: &SimClock,
        hull: &mut dyn ShipHull,
        max_turn_rate: f32,
        ship_name: &str,
    ) -> TurnProgress {
        if self.warn_date.is_none() {
            self.schedule_diagnostics(clock.date, hull.heading(), max_turn_rate);
        }

        let allowed_turn = max_turn_rate * clock.hours_per_second_adjusted() * clock.real_delta;
        let rotation = turn_towards(hull.rotation(), self.intended_heading, allowed_turn);
        hull.set_rotation(rotation);

        let remaining = angle_between_degrees(rotation * -Vec3::Z, self.intended_heading);
        if remaining <= HEADING_REACHED_DEGREES {
            return TurnProgress::Reached;
        }

        self.check_overdue(clock.date, remaining, ship_name);
        TurnProgress::Turning
    }

    fn schedule_diagnostics(&mut self, now: GameDate, heading: Vec3, max_turn_rate: f32) {
        let angle = angle_between_degrees(heading, self.intended_heading) as f64;
        let expected_hours = angle / max_turn_rate.max(f32::EPSILON) as f64;
        let warn_date = now.add_hours((expected_hours * TURN_WARN_FACTOR).max(MIN_TURN_WARN_HOURS));
        self.warn_date = Some(warn_date);
        self.error_date = Some(warn_date.add_hours(TURN_ERROR_GRACE_HOURS));
    }

    fn check_overdue(&mut self, now: GameDate, remaining: f32, ship_name: &str) {
        if let Some(warn_date) = self.warn_date {
            if !self.warned && now >= warn_date {
                self.warned = true;
                log::warn!(
                    "{ship_name}: turn {:?} overdue at {now}, {remaining:.2} deg remaining",
                    self.id
                );
            }
        }
        if let Some(error_date) = self.error_date {
            if !self.errored && now >= error_date {
                self.errored = true;
                log::error!(
                    "{ship_name}: turn {:?} still incomplete at {now} ({remaining:.2} deg remaining), check turn rate",
                    self.id
                );
            }
        }
    }

    #[cfg(test)]
    fn is_overdue(&self) -> bool {
        self.warned
    }
}
