//! AutoPilot: engages a task strategy for an order and manages the course.
//!
//! The pilot owns the task table and applies the [`PilotDirective`]s its
//! active task produces. Course edits happen here; heading and speed changes
//! and notifications go back to the helm as [`HelmCommand`]s.

use std::rc::Rc;

use engine_core::{SimClock, Vec3};

use crate::course::{Course, CourseRefreshMode};
use crate::error::{NavError, NavResult};
use crate::fleet::{FleetCommand, ShipId};
use crate::helm::HelmEvent;
use crate::hull::ShipSnapshot;
use crate::obstacle::ObstacleSensor;
use crate::proxy::ProxyRef;
use crate::speed::Speed;
use crate::tasks::{PilotDirective, TaskContext, TaskKind, TaskTable};
use crate::turn::TurnListener;

/// A navigation order: travel to `target` at `speed` using `kind`.
#[derive(Debug, Clone)]
pub struct NavOrder {
    pub kind: TaskKind,
    pub target: ProxyRef,
    pub speed: Speed,
    pub is_fleetwide: bool,
}

impl NavOrder {
    pub fn new(kind: TaskKind, target: ProxyRef, speed: Speed) -> Self {
        Self {
            kind,
            target,
            speed,
            is_fleetwide: false,
        }
    }

    pub fn fleetwide(mut self) -> Self {
        self.is_fleetwide = true;
        self
    }
}

/// What the pilot asks of the helm.
#[derive(Debug, Clone, PartialEq)]
pub enum HelmCommand {
    ChangeHeading {
        heading: Vec3,
        eliminate_drift: bool,
        listener: TurnListener,
    },
    ChangeSpeed {
        speed: Speed,
        is_fleet_speed: bool,
    },
    Notify(HelmEvent),
}

/// Per-frame inputs the helm gathers for the pilot.
pub struct PilotFrame<'a> {
    pub ship: &'a ShipSnapshot,
    pub clock: &'a SimClock,
    pub obstacles: &'a dyn ObstacleSensor,
    /// The ship's own full speed, in units per hour.
    pub own_full_speed: f32,
}

pub struct AutoPilot {
    ship_name: String,
    ship_id: ShipId,
    fleet: Option<Rc<dyn FleetCommand>>,
    tasks: TaskTable,
    is_engaged: bool,
    target: Option<ProxyRef>,
    travel_speed: Speed,
    is_fleetwide_move: bool,
    active: Option<TaskKind>,
    last_disengaged_frame: Option<u64>,
}

impl AutoPilot {
    pub fn new(ship_name: impl Into<String>, ship_id: ShipId) -> Self {
        Self::with_task_factory(ship_name, ship_id, TaskTable::default())
    }

    pub fn with_task_factory(ship_name: impl Into<String>, ship_id: ShipId, tasks: impl Into<TaskTable>) -> Self {
        Self {
            ship_name: ship_name.into(),
            ship_id,
            fleet: None,
            tasks: tasks.into(),
            is_engaged: false,
            target: None,
            travel_speed: Speed::None,
            is_fleetwide_move: false,
            active: None,
            last_disengaged_frame: None,
        }
    }

    pub fn set_fleet(&mut self, fleet: Option<Rc<dyn FleetCommand>>) {
        self.fleet = fleet;
    }

    pub fn is_engaged(&self) -> bool {
        self.is_engaged
    }

    pub fn target(&self) -> Option<&ProxyRef> {
        self.target.as_ref()
    }

    pub fn travel_speed(&self) -> Speed {
        self.travel_speed
    }

    pub fn is_fleetwide_move(&self) -> bool {
        self.is_fleetwide_move
    }

    pub fn active_task(&self) -> Option<TaskKind> {
        self.active
    }

    /// Frame of the most recent disengagement.
    pub fn last_disengaged_frame(&self) -> Option<u64> {
        self.last_disengaged_frame
    }

    /// Engage for `order`.
    ///
    /// # Panics
    /// If the pilot is already engaged.
    pub fn engage(
        &mut self,
        order: NavOrder,
        frame: &PilotFrame<'_>,
        course: &mut Course,
    ) -> NavResult<Vec<HelmCommand>> {
        if !order.speed.is_valid_for_autopilot() {
            return Err(NavError::InvalidAutoPilotSpeed(order.speed));
        }
        assert!(
            !self.is_engaged,
            "{}: autopilot engaged while already engaged",
            self.ship_name
        );

        let parting = self.tasks.reset_all();
        let mut commands = self.apply(parting, course);

        log::info!(
            "{}: autopilot engaged, {:?} to {} at {:?}{}",
            self.ship_name,
            order.kind,
            order.target.debug_name(),
            order.speed,
            if order.is_fleetwide { " (fleet-wide)" } else { "" }
        );
        self.target = Some(order.target.clone());
        self.travel_speed = order.speed;
        self.is_fleetwide_move = order.is_fleetwide;
        self.is_engaged = true;
        self.active = Some(order.kind);

        if order.kind == TaskKind::Move && order.target.has_arrived(frame.ship.position) {
            log::debug!(
                "{}: already at {}, nothing to do",
                self.ship_name,
                order.target.debug_name()
            );
            commands.extend(self.handle_target_reached(course));
            return Ok(commands);
        }

        let directives = {
            let ctx = task_context(
                &self.ship_name,
                self.fleet.as_ref(),
                self.is_fleetwide_move,
                frame,
                course,
            );
            self.tasks
                .get_or_create(order.kind)
                .execute(order.target.clone(), order.speed, &ctx)
        };
        commands.extend(self.apply(directives, course));

        if let Some(fleet) = self.fleet.as_ref() {
            let distance = fleet.position().distance(order.target.position());
            if distance > fleet.support_range() {
                log::warn!(
                    "{}: {} is {:.1} from the fleet command, beyond its support range {:.1}",
                    self.ship_name,
                    order.target.debug_name(),
                    distance,
                    fleet.support_range()
                );
            }
        }
        Ok(commands)
    }

    /// Per-frame tick of the active task.
    pub fn update(&mut self, frame: &PilotFrame<'_>, course: &mut Course) -> Vec<HelmCommand> {
        let Some(kind) = self.active.filter(|_| self.is_engaged) else {
            return Vec::new();
        };
        let directives = {
            let ctx = task_context(
                &self.ship_name,
                self.fleet.as_ref(),
                self.is_fleetwide_move,
                frame,
                course,
            );
            match self.tasks.get_mut(kind) {
                Some(task) => task.update(&ctx),
                None => Vec::new(),
            }
        };
        self.apply(directives, course)
    }

    /// Route a turn outcome back to the task that asked for the turn.
    pub fn handle_turn_completed(
        &mut self,
        kind: TaskKind,
        tag: u32,
        reached: bool,
        course: &mut Course,
    ) -> Vec<HelmCommand> {
        if !self.is_engaged || self.active != Some(kind) {
            log::trace!(
                "{}: turn outcome for idle {:?} task dropped",
                self.ship_name,
                kind
            );
            return Vec::new();
        }
        let directives = match self.tasks.get_mut(kind) {
            Some(task) => task.handle_turn_completed(tag, reached),
            None => Vec::new(),
        };
        self.apply(directives, course)
    }

    /// Rebuild or edit the course.
    ///
    /// # Panics
    /// If `waypoint` is given for a mode that takes none (or missing for one
    /// that needs it), or the course shape does not allow the edit.
    pub fn refresh_course(
        &self,
        mode: CourseRefreshMode,
        waypoint: Option<&ProxyRef>,
        course: &mut Course,
    ) -> HelmCommand {
        match mode {
            CourseRefreshMode::NewCourse => {
                assert!(waypoint.is_none(), "{}: NewCourse takes no waypoint", self.ship_name);
                match self.target.as_ref() {
                    Some(target) => course.plot(target),
                    None => panic!("{}: NewCourse without a target", self.ship_name),
                }
            }
            CourseRefreshMode::AddWaypoint => course.add_waypoint(self.required_waypoint(mode, waypoint)),
            CourseRefreshMode::ReplaceObstacleDetour => {
                course.replace_detour(self.required_waypoint(mode, waypoint))
            }
            CourseRefreshMode::RemoveWaypoint => {
                course.remove_waypoint(self.required_waypoint(mode, waypoint))
            }
            CourseRefreshMode::ClearCourse => course.clear(),
        }
        log::debug!(
            "{}: course {:?} -> {} entries",
            self.ship_name,
            mode,
            course.len()
        );
        HelmCommand::Notify(HelmEvent::CourseChanged {
            mode,
            entries: course.len(),
        })
    }

    fn required_waypoint<'w>(&self, mode: CourseRefreshMode, waypoint: Option<&'w ProxyRef>) -> &'w ProxyRef {
        match waypoint {
            Some(waypoint) => waypoint,
            None => panic!("{}: {:?} needs a waypoint", self.ship_name, mode),
        }
    }

    /// # Panics
    /// If the pilot is not engaged.
    pub fn handle_target_reached(&mut self, course: &mut Course) -> Vec<HelmCommand> {
        assert!(self.is_engaged, "{}: target reached while disengaged", self.ship_name);
        let target = self.target_name();
        log::info!("{}: reached {}", self.ship_name, target);
        vec![
            self.refresh_course(CourseRefreshMode::ClearCourse, None, course),
            HelmCommand::Notify(HelmEvent::TargetReached { target }),
        ]
    }

    /// # Panics
    /// If the pilot is not engaged.
    pub fn handle_target_uncatchable(&mut self, course: &mut Course) -> Vec<HelmCommand> {
        assert!(
            self.is_engaged,
            "{}: target uncatchable while disengaged",
            self.ship_name
        );
        let target = self.target_name();
        log::info!("{}: {} is uncatchable", self.ship_name, target);
        vec![
            self.refresh_course(CourseRefreshMode::ClearCourse, None, course),
            HelmCommand::Notify(HelmEvent::TargetUncatchable { target }),
        ]
    }

    /// Stand down: reset tasks, clear the course and forget the target.
    pub fn disengage(&mut self, frame: u64, course: &mut Course) -> Vec<HelmCommand> {
        let parting = self.tasks.reset_all();
        let mut commands = self.apply(parting, course);
        if !course.is_empty() {
            commands.push(self.refresh_course(CourseRefreshMode::ClearCourse, None, course));
        }
        if self.is_engaged {
            log::debug!("{}: autopilot disengaged at frame {}", self.ship_name, frame);
            self.last_disengaged_frame = Some(frame);
        }
        self.target = None;
        self.active = None;
        self.is_engaged = false;
        commands
    }

    /// Ask the active task to recompute its check periods before its next tick.
    pub fn refresh_check_periods(&mut self) {
        if !self.is_engaged {
            return;
        }
        if let Some(task) = self.active.and_then(|kind| self.tasks.get_mut(kind)) {
            task.check_period_flags_mut().raise_all();
        }
    }

    pub fn wait_for_fleet_to_align(&self) {
        match self.fleet.as_ref() {
            Some(fleet) => fleet.wait_for_fleet_to_align(self.ship_id),
            None => log::warn!(
                "{}: fleet-wide move without a fleet, nothing to align with",
                self.ship_name
            ),
        }
    }

    pub fn remove_fleet_is_aligned_callback(&self) {
        if let Some(fleet) = self.fleet.as_ref() {
            fleet.remove_fleet_is_aligned_callback(self.ship_id);
        }
    }

    fn target_name(&self) -> String {
        self.target
            .as_ref()
            .map(|target| target.debug_name().to_string())
            .unwrap_or_default()
    }

    fn apply(&mut self, directives: Vec<PilotDirective>, course: &mut Course) -> Vec<HelmCommand> {
        let mut commands = Vec::new();
        for directive in directives {
            match directive {
                PilotDirective::ChangeHeading {
                    heading,
                    eliminate_drift,
                    tag,
                } => {
                    let listener = match self.active {
                        Some(task) => TurnListener::Pilot { task, tag },
                        None => TurnListener::None,
                    };
                    commands.push(HelmCommand::ChangeHeading {
                        heading,
                        eliminate_drift,
                        listener,
                    });
                }
                PilotDirective::ChangeSpeed {
                    speed,
                    is_fleet_speed,
                } => commands.push(HelmCommand::ChangeSpeed {
                    speed,
                    is_fleet_speed,
                }),
                PilotDirective::RefreshCourse { mode, waypoint } => {
                    commands.push(self.refresh_course(mode, waypoint.as_ref(), course));
                }
                PilotDirective::WaitForFleetToAlign => self.wait_for_fleet_to_align(),
                PilotDirective::RemoveFleetIsAlignedCallback => self.remove_fleet_is_aligned_callback(),
                PilotDirective::TargetReached => commands.extend(self.handle_target_reached(course)),
                PilotDirective::TargetUncatchable => {
                    commands.extend(self.handle_target_uncatchable(course))
                }
            }
        }
        commands
    }
}

fn task_context<'a>(
    ship_name: &'a str,
    fleet: Option<&Rc<dyn FleetCommand>>,
    is_fleetwide_move: bool,
    frame: &'a PilotFrame<'_>,
    course: &'a Course,
) -> TaskContext<'a> {
    let full_speed = match fleet {
        Some(fleet) if is_fleetwide_move => fleet.unit_full_speed_value(),
        _ => frame.own_full_speed,
    };
    TaskContext {
        ship_name,
        ship: frame.ship,
        clock: frame.clock,
        course,
        full_speed,
        is_fleetwide_move,
        fleet_aligned: fleet.map_or(true, |fleet| fleet.is_fleet_aligned()),
        obstacles: frame.obstacles,
    }
}
