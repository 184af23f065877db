//! Move: travel to a destination and report arrival.

use super::pursuit::Pursuit;
use super::{CheckPeriodFlags, NavTask, PilotDirective, TaskContext, TaskKind};
use crate::proxy::ProxyRef;
use crate::speed::Speed;

#[derive(Debug, Default)]
pub struct MoveTask {
    core: Pursuit,
}

impl MoveTask {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NavTask for MoveTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Move
    }

    fn is_engaged(&self) -> bool {
        self.core.is_engaged()
    }

    fn execute(&mut self, target: ProxyRef, speed: Speed, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        log::debug!("{}: moving to {} at {:?}", ctx.ship_name, target.debug_name(), speed);
        self.core.begin(target, speed, ctx)
    }

    fn update(&mut self, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        let mut out = Vec::new();
        if !self.core.prepare(ctx, &mut out) {
            return out;
        }
        let arrived = self
            .core
            .target()
            .is_some_and(|target| target.has_arrived(ctx.ship.position));
        if arrived {
            out.push(PilotDirective::TargetReached);
            self.core.finish();
            return out;
        }
        self.core.pursue(ctx, &mut out);
        out
    }

    fn handle_turn_completed(&mut self, tag: u32, reached: bool) -> Vec<PilotDirective> {
        self.core.handle_turn_completed(tag, reached)
    }

    fn reset_for_reuse(&mut self) -> Vec<PilotDirective> {
        self.core.reset()
    }

    fn check_period_flags_mut(&mut self) -> &mut CheckPeriodFlags {
        self.core.flags_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::Course;
    use crate::hull::ShipSnapshot;
    use crate::proxy::ApDestinationProxy;
    use crate::tasks::pursuit::Phase;
    use crate::testing::{clock, task_context};
    use engine_core::Vec3;

    #[test]
    fn reports_arrival_once() {
        let target = ApDestinationProxy::fixed("Dock", Vec3::new(0.0, 0.0, -30.0), 0.0, 2.0).into_ref();
        let course = Course::new();
        let tick = clock(0, 0.0, 0.1);
        let start = ShipSnapshot::at_rest(Vec3::ZERO, -Vec3::Z);

        let mut task = MoveTask::new();
        task.execute(target, Speed::Full, &task_context(&start, &tick, &course));
        assert!(task.is_engaged());
        let out = task.update(&task_context(&start, &tick, &course));
        assert!(!out.iter().any(|d| matches!(d, PilotDirective::TargetReached)));

        let there = ShipSnapshot::at_rest(Vec3::new(0.0, 0.0, -29.0), -Vec3::Z);
        let out = task.update(&task_context(&there, &tick, &course));
        assert!(matches!(out[..], [PilotDirective::TargetReached]));
        assert_eq!(task.core.phase(), Phase::Finished);
        assert!(task.update(&task_context(&there, &tick, &course)).is_empty());

        assert!(task.reset_for_reuse().is_empty());
        assert!(!task.is_engaged());
    }
}
