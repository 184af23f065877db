//! Shared travel machinery behind every task strategy.
//!
//! The core turns the ship toward its destination, coordinates a fleet-wide
//! departure, then keeps the ship on course with periodic checks:
//!
//! - a progress check every `PROGRESS_CHECK_DISTANCE / speed` hours re-aims
//!   the ship and watches whether a mobile target is getting away;
//! - an obstacle check every `OBSTACLE_CHECK_DISTANCE / speed` hours looks for
//!   something between the ship and its next destination and plots a detour.

use engine_core::{angle_between_degrees, GameDate, Vec3};

use super::{CheckPeriodFlags, PilotDirective, TaskContext};
use crate::course::CourseRefreshMode;
use crate::obstacle::Obstacle;
use crate::proxy::{ApDestinationProxy, ProxyRef};
use crate::speed::Speed;

/// Distance travelled between progress checks.
pub const PROGRESS_CHECK_DISTANCE: f32 = 5.0;
/// Distance travelled between obstacle checks.
pub const OBSTACLE_CHECK_DISTANCE: f32 = 20.0;
/// Longest interval between checks, in game hours.
const MAX_CHECK_PERIOD_HOURS: f64 = 2.0;
/// Speed floor used when deriving check periods.
const MIN_CHECK_SPEED: f32 = 0.5;
/// Game hours without closing on a mobile target before it is uncatchable.
pub const UNCATCHABLE_AFTER_HOURS: f64 = 6.0;
/// Smallest distance gain that counts as closing on the target.
const CLOSING_EPSILON: f32 = 0.5;
/// Heading error tolerated before the ship is re-aimed.
const STEER_TOLERANCE_DEGREES: f32 = 1.0;
/// Detour points sit this many obstacle radii from the obstacle's center.
const DETOUR_STANDOFF_FACTOR: f32 = 1.6;
/// Arrival window of a detour waypoint.
const DETOUR_ARRIVAL_RADIUS: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Turning toward the destination before a fleet-wide departure.
    Aligning,
    /// Facing the destination, waiting on the rest of the fleet.
    AwaitingFleet,
    Underway,
    /// Reached or gave up; nothing left to do until reset.
    Finished,
}

#[derive(Debug)]
pub struct Pursuit {
    phase: Phase,
    target: Option<ProxyRef>,
    speed: Speed,
    is_fleetwide: bool,
    flags: CheckPeriodFlags,
    progress_period_hours: f64,
    obstacle_period_hours: f64,
    next_progress_check: Option<GameDate>,
    next_obstacle_check: Option<GameDate>,
    next_tag: u32,
    pending_turn: Option<u32>,
    last_heading: Option<Vec3>,
    waypoint: Option<ProxyRef>,
    closest_distance: f32,
    last_closing: GameDate,
    keep_out_warned: bool,
}

impl Default for Pursuit {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            target: None,
            speed: Speed::None,
            is_fleetwide: false,
            flags: CheckPeriodFlags::default(),
            progress_period_hours: MAX_CHECK_PERIOD_HOURS,
            obstacle_period_hours: MAX_CHECK_PERIOD_HOURS,
            next_progress_check: None,
            next_obstacle_check: None,
            next_tag: 0,
            pending_turn: None,
            last_heading: None,
            waypoint: None,
            closest_distance: f32::MAX,
            last_closing: GameDate::ZERO,
            keep_out_warned: false,
        }
    }
}

impl Pursuit {
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_engaged(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn target(&self) -> Option<&ProxyRef> {
        self.target.as_ref()
    }

    pub fn waypoint(&self) -> Option<&ProxyRef> {
        self.waypoint.as_ref()
    }

    pub fn flags_mut(&mut self) -> &mut CheckPeriodFlags {
        &mut self.flags
    }

    #[cfg(test)]
    pub fn periods(&self) -> (f64, f64) {
        (self.progress_period_hours, self.obstacle_period_hours)
    }

    /// Plot `[ship, target]`, aim at the target and either get under way or
    /// start aligning with the fleet.
    pub fn begin(&mut self, target: ProxyRef, speed: Speed, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        let tag_floor = self.next_tag;
        *self = Self::default();
        self.next_tag = tag_floor;

        let mut out = vec![PilotDirective::RefreshCourse {
            mode: CourseRefreshMode::NewCourse,
            waypoint: None,
        }];
        let to_target = target.position() - ctx.ship.position;
        self.closest_distance = to_target.length();
        self.last_closing = ctx.clock.date;
        self.speed = speed;
        self.is_fleetwide = ctx.is_fleetwide_move;
        self.flags.raise_all();
        self.target = Some(target);

        let turning = self.request_heading(to_target, &mut out);
        if !self.is_fleetwide {
            out.push(PilotDirective::ChangeSpeed {
                speed,
                is_fleet_speed: false,
            });
            self.phase = Phase::Underway;
        } else if turning {
            self.phase = Phase::Aligning;
        } else {
            out.push(PilotDirective::WaitForFleetToAlign);
            self.phase = Phase::AwaitingFleet;
        }
        out
    }

    /// Back to idle. Asks to be taken off the fleet's alignment roll if the
    /// ship was still waiting on it.
    pub fn reset(&mut self) -> Vec<PilotDirective> {
        let mut out = Vec::new();
        if self.phase == Phase::AwaitingFleet {
            out.push(PilotDirective::RemoveFleetIsAlignedCallback);
        }
        let tag_floor = self.next_tag;
        *self = Self::default();
        // Tags keep counting so a late outcome from a previous order is stale.
        self.next_tag = tag_floor;
        out
    }

    pub fn finish(&mut self) {
        self.phase = Phase::Finished;
    }

    pub fn handle_turn_completed(&mut self, tag: u32, reached: bool) -> Vec<PilotDirective> {
        if self.pending_turn != Some(tag) {
            log::trace!("stale turn outcome {tag} ignored");
            return Vec::new();
        }
        self.pending_turn = None;
        let mut out = Vec::new();
        if self.phase == Phase::Aligning && reached {
            out.push(PilotDirective::WaitForFleetToAlign);
            self.phase = Phase::AwaitingFleet;
        }
        out
    }

    /// Common per-frame bookkeeping. Returns true once the ship is under way
    /// and the strategy may steer.
    pub fn prepare(&mut self, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) -> bool {
        if !self.is_engaged() {
            return false;
        }
        self.refresh_periods(ctx);
        match self.phase {
            Phase::AwaitingFleet => {
                if ctx.fleet_aligned {
                    log::debug!("{}: fleet aligned, getting under way", ctx.ship_name);
                    out.push(PilotDirective::ChangeSpeed {
                        speed: self.speed,
                        is_fleet_speed: true,
                    });
                    out.push(PilotDirective::RemoveFleetIsAlignedCallback);
                    self.phase = Phase::Underway;
                }
                false
            }
            Phase::Underway => {
                self.warn_if_inside_keep_out(ctx);
                true
            }
            Phase::Idle | Phase::Aligning | Phase::Finished => false,
        }
    }

    /// Chase the target through the current course: detour bookkeeping,
    /// obstacle avoidance, re-aiming and the uncatchable check.
    pub fn pursue(&mut self, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        self.check_waypoint_arrival(ctx, out);
        let now = ctx.clock.date;
        let Some(aim) = self.aim_point() else {
            return;
        };

        if Self::is_due(&mut self.next_obstacle_check, self.obstacle_period_hours, now)
            && self.avoid_obstacles(aim, ctx, out)
        {
            return;
        }

        if Self::is_due(&mut self.next_progress_check, self.progress_period_hours, now) {
            if !self.check_catchable(ctx, out) {
                return;
            }
            self.steer_toward(aim, ctx, out);
        }
    }

    /// True when a progress check falls due this frame; schedules the next one.
    pub fn progress_check_due(&mut self, now: GameDate) -> bool {
        Self::is_due(&mut self.next_progress_check, self.progress_period_hours, now)
    }

    /// Current waypoint if any, otherwise the target.
    pub fn aim_point(&self) -> Option<Vec3> {
        self.waypoint
            .as_ref()
            .or(self.target.as_ref())
            .map(|proxy| proxy.position())
    }

    /// Turn toward `point` unless already heading there.
    pub fn steer_toward(&mut self, point: Vec3, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        self.steer_along(point - ctx.ship.position, out);
    }

    /// Turn onto `direction` unless already heading that way.
    pub fn steer_along(&mut self, direction: Vec3, out: &mut Vec<PilotDirective>) {
        let on_course = self
            .last_heading
            .is_some_and(|heading| angle_between_degrees(heading, direction) <= STEER_TOLERANCE_DEGREES);
        if !on_course {
            self.request_heading(direction, out);
        }
    }

    /// Insert `waypoint` ahead of the target (or swap out the current one) and
    /// head for it.
    pub fn divert_to(&mut self, waypoint: ProxyRef, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        let mode = if self.waypoint.is_some() {
            CourseRefreshMode::ReplaceObstacleDetour
        } else {
            CourseRefreshMode::AddWaypoint
        };
        let point = waypoint.position();
        out.push(PilotDirective::RefreshCourse {
            mode,
            waypoint: Some(waypoint.clone()),
        });
        self.waypoint = Some(waypoint);
        self.steer_toward(point, ctx, out);
    }

    /// Re-approach after the target was reached and the course cleared.
    pub fn replot(&mut self, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        out.push(PilotDirective::RefreshCourse {
            mode: CourseRefreshMode::NewCourse,
            waypoint: None,
        });
        self.waypoint = None;
        self.reset_closing(ctx);
        self.next_progress_check = None;
        self.next_obstacle_check = None;
    }

    fn request_heading(&mut self, direction: Vec3, out: &mut Vec<PilotDirective>) -> bool {
        let Some(heading) = direction.try_normalize() else {
            return false;
        };
        let tag = self.next_tag;
        self.next_tag = self.next_tag.wrapping_add(1);
        self.pending_turn = Some(tag);
        self.last_heading = Some(heading);
        out.push(PilotDirective::ChangeHeading {
            heading,
            eliminate_drift: true,
            tag,
        });
        true
    }

    fn refresh_periods(&mut self, ctx: &TaskContext<'_>) {
        if !self.flags.progress && !self.flags.obstacle {
            return;
        }
        let speed = self.speed.units_per_hour(ctx.full_speed).max(MIN_CHECK_SPEED);
        let now = ctx.clock.date;
        if self.flags.progress {
            self.progress_period_hours = Self::period_for(PROGRESS_CHECK_DISTANCE, speed);
            if self.next_progress_check.is_some() {
                self.next_progress_check = Some(now.add_hours(self.progress_period_hours));
            }
            self.flags.progress = false;
        }
        if self.flags.obstacle {
            self.obstacle_period_hours = Self::period_for(OBSTACLE_CHECK_DISTANCE, speed);
            if self.next_obstacle_check.is_some() {
                self.next_obstacle_check = Some(now.add_hours(self.obstacle_period_hours));
            }
            self.flags.obstacle = false;
        }
        log::trace!(
            "{}: check periods {:.3}h progress, {:.3}h obstacle",
            ctx.ship_name,
            self.progress_period_hours,
            self.obstacle_period_hours
        );
    }

    fn period_for(distance: f32, speed: f32) -> f64 {
        ((distance / speed) as f64).min(MAX_CHECK_PERIOD_HOURS)
    }

    fn is_due(next: &mut Option<GameDate>, period_hours: f64, now: GameDate) -> bool {
        match *next {
            Some(date) if now < date => false,
            _ => {
                *next = Some(now.add_hours(period_hours));
                true
            }
        }
    }

    fn check_waypoint_arrival(&mut self, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        let Some(waypoint) = self.waypoint.as_ref() else {
            return;
        };
        if !waypoint.has_arrived(ctx.ship.position) {
            return;
        }
        log::debug!("{}: passed waypoint {}", ctx.ship_name, waypoint.debug_name());
        out.push(PilotDirective::RefreshCourse {
            mode: CourseRefreshMode::RemoveWaypoint,
            waypoint: self.waypoint.take(),
        });
        self.reset_closing(ctx);
        self.next_progress_check = None;
    }

    fn avoid_obstacles(&mut self, aim: Vec3, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) -> bool {
        let Some(obstacle) = ctx.obstacles.find_obstacle(ctx.ship.position, aim) else {
            return false;
        };
        if aim.distance(obstacle.center) <= obstacle.radius {
            // Destination sits on the obstacle itself; nothing to go around.
            return false;
        }
        let point = detour_point(ctx.ship.position, aim, &obstacle);
        let name = match self.target.as_ref() {
            Some(target) => format!("{} detour", target.debug_name()),
            None => "detour".to_string(),
        };
        log::debug!(
            "{}: obstacle at {:?} (r {:.1}), detouring via {:?}",
            ctx.ship_name,
            obstacle.center,
            obstacle.radius,
            point
        );
        let detour = ApDestinationProxy::fixed(name, point, 0.0, DETOUR_ARRIVAL_RADIUS).into_ref();
        self.divert_to(detour, ctx, out);
        true
    }

    fn check_catchable(&mut self, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) -> bool {
        let Some(target) = self.target.as_ref() else {
            return true;
        };
        if !target.is_mobile() || self.waypoint.is_some() {
            return true;
        }
        let distance = ctx.ship.position.distance(target.position());
        if distance < self.closest_distance - CLOSING_EPSILON {
            self.closest_distance = distance;
            self.last_closing = ctx.clock.date;
            return true;
        }
        if ctx.clock.date.hours_since(self.last_closing) < UNCATCHABLE_AFTER_HOURS {
            return true;
        }
        log::warn!(
            "{}: {} has not come closer than {:.1} since {}, giving up",
            ctx.ship_name,
            target.debug_name(),
            self.closest_distance,
            self.last_closing
        );
        out.push(PilotDirective::TargetUncatchable);
        self.finish();
        false
    }

    fn reset_closing(&mut self, ctx: &TaskContext<'_>) {
        if let Some(target) = self.target.as_ref() {
            self.closest_distance = ctx.ship.position.distance(target.position());
        }
        self.last_closing = ctx.clock.date;
    }

    fn warn_if_inside_keep_out(&mut self, ctx: &TaskContext<'_>) {
        let Some(target) = self.target.as_ref() else {
            return;
        };
        let inside = ctx.ship.position.distance(target.position()) < target.inner_radius();
        if inside && !self.keep_out_warned {
            log::warn!(
                "{}: inside the keep-out radius {:.1} of {}",
                ctx.ship_name,
                target.inner_radius(),
                target.debug_name()
            );
        }
        self.keep_out_warned = inside;
    }
}

/// Point beside `obstacle`, on the side of the ship's line of travel it
/// already leans toward.
fn detour_point(from: Vec3, to: Vec3, obstacle: &Obstacle) -> Vec3 {
    let travel = (to - from).normalize_or_zero();
    let offset = from - obstacle.center;
    let lateral = offset - travel * offset.dot(travel);
    let side = lateral
        .try_normalize()
        .unwrap_or_else(|| travel.any_orthonormal_vector());
    obstacle.center + side * obstacle.radius * DETOUR_STANDOFF_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Course;
    use crate::hull::ShipSnapshot;
    use crate::obstacle::{ObstacleField, OpenSpace};
    use crate::proxy::PositionBeacon;
    use crate::testing::clock;

    struct Frame {
        ship: ShipSnapshot,
        clock: engine_core::SimClock,
        course: Course,
        fleetwide: bool,
        aligned: bool,
    }

    impl Frame {
        fn at(position: Vec3, hours: f64) -> Self {
            Self {
                ship: ShipSnapshot::at_rest(position, -Vec3::Z),
                clock: clock(0, hours, 1.0 / 60.0),
                course: Course::new(),
                fleetwide: false,
                aligned: true,
            }
        }

        fn ctx<'a>(&'a self, obstacles: &'a dyn crate::obstacle::ObstacleSensor) -> TaskContext<'a> {
            TaskContext {
                ship_name: "Test",
                ship: &self.ship,
                clock: &self.clock,
                course: &self.course,
                full_speed: 10.0,
                is_fleetwide_move: self.fleetwide,
                fleet_aligned: self.aligned,
                obstacles,
            }
        }
    }

    fn point(z: f32) -> ProxyRef {
        ApDestinationProxy::fixed("Point", Vec3::new(0.0, 0.0, z), 0.0, 2.0).into_ref()
    }

    #[test]
    fn solo_departure_turns_and_accelerates_at_once() {
        let frame = Frame::at(Vec3::ZERO, 0.0);
        let mut core = Pursuit::default();
        let out = core.begin(point(-100.0), Speed::Full, &frame.ctx(&OpenSpace));
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::NewCourse, waypoint: None }
        ));
        assert!(matches!(out[1], PilotDirective::ChangeHeading { .. }));
        assert!(matches!(out[2], PilotDirective::ChangeSpeed { is_fleet_speed: false, .. }));
        assert_eq!(core.phase(), Phase::Underway);
    }

    #[test]
    fn fleetwide_departure_waits_for_alignment() {
        let mut frame = Frame::at(Vec3::ZERO, 0.0);
        frame.fleetwide = true;
        frame.aligned = false;
        let mut core = Pursuit::default();
        let out = core.begin(point(-100.0), Speed::Standard, &frame.ctx(&OpenSpace));
        let PilotDirective::ChangeHeading { tag, .. } = out[1] else {
            panic!("expected a heading change, got {:?}", out[1]);
        };
        assert_eq!(core.phase(), Phase::Aligning);

        assert!(core.handle_turn_completed(tag.wrapping_add(9), true).is_empty());
        let out = core.handle_turn_completed(tag, true);
        assert!(matches!(out[..], [PilotDirective::WaitForFleetToAlign]));

        let mut out = Vec::new();
        assert!(!core.prepare(&frame.ctx(&OpenSpace), &mut out));
        assert!(out.is_empty());

        frame.aligned = true;
        assert!(!core.prepare(&frame.ctx(&OpenSpace), &mut out));
        assert!(matches!(out[0], PilotDirective::ChangeSpeed { is_fleet_speed: true, .. }));
        assert!(matches!(out[1], PilotDirective::RemoveFleetIsAlignedCallback));
        assert_eq!(core.phase(), Phase::Underway);
    }

    #[test]
    fn reset_while_awaiting_fleet_unregisters() {
        let mut frame = Frame::at(Vec3::ZERO, 0.0);
        frame.fleetwide = true;
        let mut core = Pursuit::default();
        let out = core.begin(point(-100.0), Speed::Full, &frame.ctx(&OpenSpace));
        let PilotDirective::ChangeHeading { tag, .. } = out[1] else {
            panic!("expected a heading change");
        };
        core.handle_turn_completed(tag, true);
        let out = core.reset();
        assert!(matches!(out[..], [PilotDirective::RemoveFleetIsAlignedCallback]));
        assert!(!core.is_engaged());
        // The old tag is stale after reset.
        assert!(core.handle_turn_completed(tag, true).is_empty());
    }

    #[test]
    fn check_periods_follow_speed() {
        let frame = Frame::at(Vec3::ZERO, 0.0);
        let mut core = Pursuit::default();
        core.begin(point(-100.0), Speed::Full, &frame.ctx(&OpenSpace));
        let mut out = Vec::new();
        core.prepare(&frame.ctx(&OpenSpace), &mut out);
        let (progress, obstacle) = core.periods();
        assert!((progress - 0.5).abs() < 1e-6);
        assert!((obstacle - 2.0).abs() < 1e-6);

        core.speed = Speed::Slow;
        core.flags_mut().raise_all();
        core.prepare(&frame.ctx(&OpenSpace), &mut out);
        let (progress, obstacle) = core.periods();
        assert!((progress - 2.0).abs() < 1e-6);
        assert!((obstacle - 2.0).abs() < 1e-6);
    }

    #[test]
    fn obstacle_on_course_adds_then_replaces_detour() {
        let field = ObstacleField {
            obstacles: vec![Obstacle { center: Vec3::new(0.5, 0.0, -50.0), radius: 10.0 }],
        };
        let frame = Frame::at(Vec3::ZERO, 0.0);
        let mut core = Pursuit::default();
        core.begin(point(-100.0), Speed::Full, &frame.ctx(&field));

        let mut out = Vec::new();
        assert!(core.prepare(&frame.ctx(&field), &mut out));
        core.pursue(&frame.ctx(&field), &mut out);
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::AddWaypoint, waypoint: Some(_) }
        ));
        let detour = core.waypoint().map(|w| w.position()).unwrap();
        assert!(detour.distance(Vec3::new(0.5, 0.0, -50.0)) > 10.0);
        assert!(detour.x < 0.0);

        // Another obstacle check later still sees the obstacle on the way.
        let later = Frame::at(Vec3::new(0.0, 0.0, -1.0), 5.0);
        let mut out = Vec::new();
        let wider = ObstacleField {
            obstacles: vec![Obstacle { center: Vec3::new(-10.0, 0.0, -25.0), radius: 5.0 }],
        };
        core.pursue(&later.ctx(&wider), &mut out);
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::ReplaceObstacleDetour, .. }
        ));
    }

    #[test]
    fn reaching_detour_removes_it() {
        let frame = Frame::at(Vec3::ZERO, 0.0);
        let mut core = Pursuit::default();
        core.begin(point(-100.0), Speed::Full, &frame.ctx(&OpenSpace));
        let detour = ApDestinationProxy::fixed("Detour", Vec3::new(10.0, 0.0, -10.0), 0.0, 3.0).into_ref();
        let mut out = Vec::new();
        core.divert_to(detour, &frame.ctx(&OpenSpace), &mut out);

        let arrived = Frame::at(Vec3::new(9.0, 0.0, -10.0), 0.1);
        let mut out = Vec::new();
        core.pursue(&arrived.ctx(&OpenSpace), &mut out);
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::RemoveWaypoint, waypoint: Some(_) }
        ));
        assert!(core.waypoint().is_none());
        assert!(out.iter().any(|d| matches!(d, PilotDirective::ChangeHeading { .. })));
    }

    #[test]
    fn fleeing_target_becomes_uncatchable() {
        let beacon = PositionBeacon::new(Vec3::new(0.0, 0.0, -50.0));
        let target = ApDestinationProxy::tracking("Runner", beacon.clone(), 0.0, 2.0).into_ref();
        let mut core = Pursuit::default();
        core.begin(target, Speed::Full, &Frame::at(Vec3::ZERO, 0.0).ctx(&OpenSpace));

        let mut hours = 0.0;
        let mut gave_up = false;
        while hours < UNCATCHABLE_AFTER_HOURS + 2.0 {
            // The target keeps pace with the ship.
            let frame = Frame::at(Vec3::new(0.0, 0.0, -(hours as f32) * 10.0), hours);
            beacon.publish(Vec3::new(0.0, 0.0, -50.0 - (hours as f32) * 10.0));
            let mut out = Vec::new();
            if core.prepare(&frame.ctx(&OpenSpace), &mut out) {
                core.pursue(&frame.ctx(&OpenSpace), &mut out);
            }
            if out.iter().any(|d| matches!(d, PilotDirective::TargetUncatchable)) {
                gave_up = true;
                break;
            }
            hours += 0.25;
        }
        assert!(gave_up);
        assert_eq!(core.phase(), Phase::Finished);
        assert!(hours >= UNCATCHABLE_AFTER_HOURS);
    }

    #[test]
    fn detour_point_clears_obstacle() {
        let obstacle = Obstacle { center: Vec3::new(0.0, 0.0, -50.0), radius: 10.0 };
        let point = detour_point(Vec3::ZERO, Vec3::new(0.0, 0.0, -100.0), &obstacle);
        assert!((point.distance(obstacle.center) - 16.0).abs() < 1e-3);
    }
}
