//! ShipHelm: the command surface for a ship's heading and speed.
//!
//! The helm owns the engine room, the autopilot and the course. Captains give
//! it orders; the autopilot reaches it through [`HelmCommand`]s. Turn outcomes
//! are queued and routed to whoever asked for the turn once the current call
//! is done with its own state, so a new turn requested while an outcome is
//! being handled never sees a half-updated helm.

use std::collections::VecDeque;
use std::rc::Rc;

use engine_core::{SimClock, Vec3};

use crate::autopilot::{AutoPilot, HelmCommand, NavOrder, PilotFrame};
use crate::course::{Course, CourseRefreshMode};
use crate::engine_room::EngineRoom;
use crate::error::{NavError, NavResult};
use crate::fleet::{FleetCommand, ShipId};
use crate::hull::{ShipHull, ShipSnapshot};
use crate::obstacle::{ObstacleSensor, OpenSpace};
use crate::proxy::ProxyRef;
use crate::speed::Speed;
use crate::stats::ShipStats;
use crate::tasks::TaskKind;
use crate::turn::{TurnId, TurnListener, TurnProgress, TurnTask};

/// Outbound notifications for the ship's captain.
#[derive(Debug, Clone, PartialEq)]
pub enum HelmEvent {
    CourseChanged {
        mode: CourseRefreshMode,
        entries: usize,
    },
    TargetReached {
        target: String,
    },
    TargetUncatchable {
        target: String,
    },
    /// Outcome of a turn the captain asked to be told about.
    TurnCompleted {
        turn: TurnId,
        reached: bool,
    },
}

pub struct ShipHelm {
    name: String,
    ship_id: ShipId,
    stats: ShipStats,
    engine_room: EngineRoom,
    autopilot: AutoPilot,
    course: Course,
    turn: Option<TurnTask>,
    intended_heading: Vec3,
    speed_setting: Speed,
    is_fleet_speed: bool,
    fleet: Option<Rc<dyn FleetCommand>>,
    next_turn_id: u64,
    frame: u64,
    events: Vec<HelmEvent>,
    outcomes: VecDeque<(TurnListener, bool)>,
    is_shut_down: bool,
}

impl ShipHelm {
    pub fn new(name: impl Into<String>, ship_id: ShipId, stats: ShipStats, heading: Vec3) -> NavResult<Self> {
        stats.validate()?;
        let intended_heading = heading.try_normalize().ok_or(NavError::InvalidHeading)?;
        let name = name.into();
        Ok(Self {
            engine_room: EngineRoom::new(name.clone(), &stats),
            autopilot: AutoPilot::new(name.clone(), ship_id),
            name,
            ship_id,
            stats,
            course: Course::new(),
            turn: None,
            intended_heading,
            speed_setting: Speed::None,
            is_fleet_speed: false,
            fleet: None,
            next_turn_id: 1,
            frame: 0,
            events: Vec::new(),
            outcomes: VecDeque::new(),
            is_shut_down: false,
        })
    }

    pub fn set_fleet(&mut self, fleet: Option<Rc<dyn FleetCommand>>) {
        self.autopilot.set_fleet(fleet.clone());
        self.fleet = fleet;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ship_id(&self) -> ShipId {
        self.ship_id
    }

    pub fn stats(&self) -> &ShipStats {
        &self.stats
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn autopilot(&self) -> &AutoPilot {
        &self.autopilot
    }

    pub fn engine_room(&self) -> &EngineRoom {
        &self.engine_room
    }

    pub fn intended_heading(&self) -> Vec3 {
        self.intended_heading
    }

    pub fn is_turning(&self) -> bool {
        self.turn.is_some()
    }

    pub fn speed_setting(&self) -> Speed {
        self.speed_setting
    }

    /// Events raised since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<HelmEvent> {
        std::mem::take(&mut self.events)
    }

    /// Captain's order to come about. Disengages the autopilot.
    ///
    /// With `notify` the outcome is reported as [`HelmEvent::TurnCompleted`].
    pub fn change_heading(&mut self, heading: Vec3, notify: bool) -> NavResult<TurnId> {
        if self.is_shut_down {
            return Err(NavError::HelmShutDown);
        }
        let heading = heading.try_normalize().ok_or(NavError::InvalidHeading)?;
        self.disengage_autopilot();
        let id = self.begin_turn(heading, true, |id| {
            if notify {
                TurnListener::Captain(id)
            } else {
                TurnListener::None
            }
        });
        self.dispatch_outcomes();
        Ok(id)
    }

    /// Captain's order to change speed. Disengages the autopilot.
    pub fn change_speed(&mut self, speed: Speed) {
        if self.is_shut_down {
            return;
        }
        self.disengage_autopilot();
        self.set_speed(speed, false);
        self.dispatch_outcomes();
    }

    pub fn engage_autopilot(&mut self, order: NavOrder, ship: &ShipSnapshot, clock: &SimClock) -> NavResult<()> {
        if self.is_shut_down {
            return Err(NavError::HelmShutDown);
        }
        if !order.speed.is_valid_for_autopilot() {
            return Err(NavError::InvalidAutoPilotSpeed(order.speed));
        }
        self.frame = clock.frame;
        self.disengage_autopilot();
        let frame = PilotFrame {
            ship,
            clock,
            obstacles: &OpenSpace,
            own_full_speed: self.stats.full_speed,
        };
        let commands = self.autopilot.engage(order, &frame, &mut self.course)?;
        self.execute(commands);
        self.dispatch_outcomes();
        Ok(())
    }

    pub fn engage_move(&mut self, target: ProxyRef, speed: Speed, ship: &ShipSnapshot, clock: &SimClock) -> NavResult<()> {
        self.engage_autopilot(NavOrder::new(TaskKind::Move, target, speed), ship, clock)
    }

    pub fn engage_besiege(&mut self, target: ProxyRef, speed: Speed, ship: &ShipSnapshot, clock: &SimClock) -> NavResult<()> {
        self.engage_autopilot(NavOrder::new(TaskKind::Besiege, target, speed), ship, clock)
    }

    pub fn engage_strafe(&mut self, target: ProxyRef, speed: Speed, ship: &ShipSnapshot, clock: &SimClock) -> NavResult<()> {
        self.engage_autopilot(NavOrder::new(TaskKind::Strafe, target, speed), ship, clock)
    }

    /// Stand the autopilot down. Any turn in flight is cancelled.
    pub fn disengage_autopilot(&mut self) {
        if !self.autopilot.is_engaged() {
            return;
        }
        self.kill_turn();
        let commands = self.autopilot.disengage(self.frame, &mut self.course);
        self.execute(commands);
        self.dispatch_outcomes();
    }

    /// Advance the turn in flight. Call once per frame.
    pub fn update_heading(&mut self, clock: &SimClock, hull: &mut dyn ShipHull) {
        self.frame = clock.frame;
        if clock.paused || self.is_shut_down {
            return;
        }
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        if turn.advance(clock, hull, self.stats.max_turn_rate, &self.name) == TurnProgress::Turning {
            return;
        }
        if let Some(turn) = self.turn.take() {
            if turn.eliminate_drift() {
                self.engine_room.engage_drift_correction();
            }
            self.outcomes.push_back((turn.listener(), true));
        }
        self.dispatch_outcomes();
    }

    /// Tick the autopilot. Call once per frame after [`Self::update_heading`].
    pub fn update_autopilot(&mut self, clock: &SimClock, ship: &ShipSnapshot, obstacles: &dyn ObstacleSensor) {
        self.frame = clock.frame;
        if clock.paused || self.is_shut_down || !self.autopilot.is_engaged() {
            return;
        }
        let frame = PilotFrame {
            ship,
            clock,
            obstacles,
            own_full_speed: self.stats.full_speed,
        };
        let commands = self.autopilot.update(&frame, &mut self.course);
        self.execute(commands);
        self.dispatch_outcomes();
    }

    /// Physics tick for the engine room.
    pub fn fixed_update(&mut self, clock: &SimClock, hull: &mut dyn ShipHull) {
        if self.is_shut_down {
            return;
        }
        self.engine_room.fixed_update(clock, hull);
    }

    /// The ship's own full speed changed (damage, repairs).
    pub fn handle_full_speed_changed(&mut self, full_speed: f32) {
        self.stats.full_speed = full_speed;
        self.engine_room.set_max_speed(full_speed);
        if !self.is_fleet_speed && !self.is_shut_down {
            self.reissue_speed();
        }
        self.autopilot.refresh_check_periods();
    }

    /// The fleet's full speed changed.
    pub fn handle_fleet_full_speed_changed(&mut self) {
        if self.is_fleet_speed && !self.is_shut_down {
            self.reissue_speed();
        }
        self.autopilot.refresh_check_periods();
    }

    /// Stop every job without delivering turn outcomes.
    ///
    /// Terminal: afterwards orders are refused with [`NavError::HelmShutDown`]
    /// or ignored, and the per-frame updates do nothing.
    pub fn shutdown(&mut self) {
        if self.is_shut_down {
            return;
        }
        self.is_shut_down = true;
        self.turn = None;
        self.outcomes.clear();
        let parting = self.autopilot.disengage(self.frame, &mut self.course);
        if !parting.is_empty() {
            log::trace!("{}: {} parting command(s) dropped", self.name, parting.len());
        }
        self.engine_room.shutdown();
        log::debug!("{}: helm shut down", self.name);
    }

    fn begin_turn(
        &mut self,
        heading: Vec3,
        eliminate_drift: bool,
        listener_for: impl FnOnce(TurnId) -> TurnListener,
    ) -> TurnId {
        let id = TurnId(self.next_turn_id);
        self.next_turn_id += 1;
        self.kill_turn();
        assert!(self.turn.is_none(), "{}: turn still in flight", self.name);
        self.intended_heading = heading;
        self.engine_room.handle_turn_beginning();
        self.turn = Some(TurnTask::new(id, heading, eliminate_drift, listener_for(id)));
        log::trace!("{}: turn {:?} toward {:?}", self.name, id, heading);
        id
    }

    /// Cancel the turn in flight, if any. Its listener hears `reached = false`.
    fn kill_turn(&mut self) {
        if let Some(turn) = self.turn.take() {
            if !self.is_shut_down {
                self.outcomes.push_back((turn.listener(), false));
            }
        }
    }

    fn set_speed(&mut self, speed: Speed, is_fleet_speed: bool) {
        self.speed_setting = speed;
        self.is_fleet_speed = is_fleet_speed;
        self.reissue_speed();
    }

    fn reissue_speed(&mut self) {
        let full_speed = self.full_speed_for(self.is_fleet_speed);
        self.engine_room
            .change_speed(self.speed_setting.units_per_hour(full_speed));
    }

    fn full_speed_for(&self, is_fleet_speed: bool) -> f32 {
        match (&self.fleet, is_fleet_speed) {
            (Some(fleet), true) => fleet.unit_full_speed_value(),
            (None, true) => {
                log::warn!("{}: fleet speed requested without a fleet", self.name);
                self.stats.full_speed
            }
            (_, false) => self.stats.full_speed,
        }
    }

    fn execute(&mut self, commands: Vec<HelmCommand>) {
        for command in commands {
            match command {
                HelmCommand::ChangeHeading {
                    heading,
                    eliminate_drift,
                    listener,
                } => {
                    self.begin_turn(heading, eliminate_drift, |_| listener);
                }
                HelmCommand::ChangeSpeed {
                    speed,
                    is_fleet_speed,
                } => self.set_speed(speed, is_fleet_speed),
                HelmCommand::Notify(event) => self.events.push(event),
            }
        }
    }

    fn dispatch_outcomes(&mut self) {
        while let Some((listener, reached)) = self.outcomes.pop_front() {
            match listener {
                TurnListener::None => {}
                TurnListener::Captain(turn) => self.events.push(HelmEvent::TurnCompleted { turn, reached }),
                TurnListener::Pilot { task, tag } => {
                    let commands = self
                        .autopilot
                        .handle_turn_completed(task, tag, reached, &mut self.course);
                    self.execute(commands);
                }
            }
        }
    }
}

impl Drop for ShipHelm {
    fn drop(&mut self) {
        self.shutdown();
    }
}
