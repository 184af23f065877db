//! Pursuit task strategies the autopilot delegates travel to.
//!
//! A task never touches the helm or the course directly. Every call returns
//! a list of [`PilotDirective`]s that the autopilot applies in order, so the
//! task can be driven from a plain per-frame tick without holding references
//! back into its owner.

mod besiege;
mod move_task;
mod pursuit;
mod strafe;

use engine_core::{SimClock, Vec3};
use serde::{Deserialize, Serialize};

use crate::course::{Course, CourseRefreshMode};
use crate::hull::ShipSnapshot;
use crate::obstacle::ObstacleSensor;
use crate::proxy::ProxyRef;
use crate::speed::Speed;

pub use besiege::BesiegeTask;
pub use move_task::MoveTask;
pub use strafe::StrafeTask;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    Move,
    Besiege,
    Strafe,
}

impl TaskKind {
    pub const ALL: [TaskKind; 3] = [TaskKind::Move, TaskKind::Besiege, TaskKind::Strafe];

    fn index(self) -> usize {
        match self {
            TaskKind::Move => 0,
            TaskKind::Besiege => 1,
            TaskKind::Strafe => 2,
        }
    }
}

/// Raised by the autopilot when the check periods must be recomputed,
/// typically after a full-speed change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckPeriodFlags {
    pub progress: bool,
    pub obstacle: bool,
}

impl CheckPeriodFlags {
    pub fn raise_all(&mut self) {
        self.progress = true;
        self.obstacle = true;
    }
}

/// What a task sees of the world on one call.
pub struct TaskContext<'a> {
    pub ship_name: &'a str,
    pub ship: &'a ShipSnapshot,
    pub clock: &'a SimClock,
    pub course: &'a Course,
    /// Full speed the travel speed resolves against, in units per hour.
    pub full_speed: f32,
    pub is_fleetwide_move: bool,
    pub fleet_aligned: bool,
    pub obstacles: &'a dyn ObstacleSensor,
}

/// A request from a task to its autopilot.
#[derive(Debug, Clone)]
pub enum PilotDirective {
    ChangeHeading {
        heading: Vec3,
        eliminate_drift: bool,
        /// Echoed back through [`NavTask::handle_turn_completed`].
        tag: u32,
    },
    ChangeSpeed {
        speed: Speed,
        is_fleet_speed: bool,
    },
    RefreshCourse {
        mode: CourseRefreshMode,
        waypoint: Option<ProxyRef>,
    },
    WaitForFleetToAlign,
    RemoveFleetIsAlignedCallback,
    TargetReached,
    TargetUncatchable,
}

/// Uniform contract for Move, Besiege and Strafe.
pub trait NavTask {
    fn kind(&self) -> TaskKind;

    fn is_engaged(&self) -> bool;

    /// Start travelling to `target` at `speed`.
    fn execute(&mut self, target: ProxyRef, speed: Speed, ctx: &TaskContext<'_>) -> Vec<PilotDirective>;

    /// Per-frame tick while the autopilot is engaged.
    fn update(&mut self, ctx: &TaskContext<'_>) -> Vec<PilotDirective>;

    /// Outcome of a heading change this task requested with `tag`.
    fn handle_turn_completed(&mut self, tag: u32, reached: bool) -> Vec<PilotDirective>;

    /// Return to the idle state so the instance can serve the next order.
    fn reset_for_reuse(&mut self) -> Vec<PilotDirective>;

    fn check_period_flags_mut(&mut self) -> &mut CheckPeriodFlags;
}

pub type TaskFactory = Box<dyn FnMut(TaskKind) -> Box<dyn NavTask>>;

pub fn default_task(kind: TaskKind) -> Box<dyn NavTask> {
    match kind {
        TaskKind::Move => Box::new(MoveTask::new()),
        TaskKind::Besiege => Box::new(BesiegeTask::new()),
        TaskKind::Strafe => Box::new(StrafeTask::new()),
    }
}

/// At most one live instance per kind, built on first use.
pub struct TaskTable {
    slots: [Option<Box<dyn NavTask>>; 3],
    factory: TaskFactory,
}

impl TaskTable {
    pub fn new(factory: TaskFactory) -> Self {
        Self {
            slots: [None, None, None],
            factory,
        }
    }

    pub fn get_or_create(&mut self, kind: TaskKind) -> &mut dyn NavTask {
        let factory = &mut self.factory;
        self.slots[kind.index()]
            .get_or_insert_with(|| factory(kind))
            .as_mut()
    }

    pub fn get_mut(&mut self, kind: TaskKind) -> Option<&mut dyn NavTask> {
        match &mut self.slots[kind.index()] {
            Some(task) => Some(task.as_mut()),
            None => None,
        }
    }

    pub fn is_created(&self, kind: TaskKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    /// Reset every task that has been built, collecting their parting requests.
    pub fn reset_all(&mut self) -> Vec<PilotDirective> {
        self.slots
            .iter_mut()
            .flatten()
            .filter(|task| task.is_engaged())
            .flat_map(|task| task.reset_for_reuse())
            .collect()
    }
}

impl From<TaskFactory> for TaskTable {
    fn from(factory: TaskFactory) -> Self {
        TaskTable::new(factory)
    }
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new(Box::new(default_task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::counting_factory;

    #[test]
    fn tasks_are_built_lazily_once_per_kind() {
        let (factory, built) = counting_factory();
        let mut table = TaskTable::new(factory);
        assert!(!table.is_created(TaskKind::Move));
        assert_eq!(table.get_or_create(TaskKind::Move).kind(), TaskKind::Move);
        table.get_or_create(TaskKind::Move);
        assert_eq!(built.get(), 1);
        assert!(table.get_mut(TaskKind::Strafe).is_none());
        table.get_or_create(TaskKind::Strafe);
        assert_eq!(built.get(), 2);
    }

    #[test]
    fn reset_of_idle_tasks_is_quiet() {
        let mut table = TaskTable::default();
        for kind in TaskKind::ALL {
            table.get_or_create(kind);
        }
        assert!(table.reset_all().is_empty());
    }
}
