//! Strafe: repeated attack runs through the target's window, each followed
//! by an egress leg that carries the ship clear before it turns back in.

use super::pursuit::Pursuit;
use super::{CheckPeriodFlags, NavTask, PilotDirective, TaskContext, TaskKind};
use crate::proxy::{ApDestinationProxy, ProxyRef};
use crate::speed::Speed;

/// Distance past the target's keep-out radius an egress leg runs out to.
const EGRESS_DISTANCE: f32 = 25.0;
const EGRESS_ARRIVAL_RADIUS: f32 = 4.0;

#[derive(Debug, Default)]
pub struct StrafeTask {
    core: Pursuit,
    runs: u32,
}

impl StrafeTask {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs_completed(&self) -> u32 {
        self.runs
    }
}

impl NavTask for StrafeTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Strafe
    }

    fn is_engaged(&self) -> bool {
        self.core.is_engaged()
    }

    fn execute(&mut self, target: ProxyRef, speed: Speed, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        log::debug!("{}: strafing {} at {:?}", ctx.ship_name, target.debug_name(), speed);
        self.runs = 0;
        self.core.begin(target, speed, ctx)
    }

    fn update(&mut self, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        let mut out = Vec::new();
        if !self.core.prepare(ctx, &mut out) {
            return out;
        }
        let Some(target) = self.core.target().cloned() else {
            return out;
        };

        if self.core.waypoint().is_none() && target.has_arrived(ctx.ship.position) {
            self.runs += 1;
            let center = target.position();
            let outbound = (center - ctx.ship.position)
                .try_normalize()
                .unwrap_or(ctx.ship.heading);
            let point = center + outbound * (target.inner_radius() + EGRESS_DISTANCE);
            log::debug!(
                "{}: run {} over {} complete, egress toward {:?}",
                ctx.ship_name,
                self.runs,
                target.debug_name(),
                point
            );
            let egress = ApDestinationProxy::fixed(
                format!("{} egress", target.debug_name()),
                point,
                0.0,
                EGRESS_ARRIVAL_RADIUS,
            )
            .into_ref();
            self.core.divert_to(egress, ctx, &mut out);
            return out;
        }

        self.core.pursue(ctx, &mut out);
        out
    }

    fn handle_turn_completed(&mut self, tag: u32, reached: bool) -> Vec<PilotDirective> {
        self.core.handle_turn_completed(tag, reached)
    }

    fn reset_for_reuse(&mut self) -> Vec<PilotDirective> {
        self.runs = 0;
        self.core.reset()
    }

    fn check_period_flags_mut(&mut self) -> &mut CheckPeriodFlags {
        self.core.flags_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Course, CourseRefreshMode};
    use crate::hull::ShipSnapshot;
    use crate::testing::{clock, task_context};
    use engine_core::Vec3;

    #[test]
    fn alternates_runs_and_egress_without_reporting_reached() {
        let target = ApDestinationProxy::fixed("Battery", Vec3::new(0.0, 0.0, -50.0), 2.0, 6.0).into_ref();
        let course = Course::new();
        let mut task = StrafeTask::new();
        let start = ShipSnapshot::at_rest(Vec3::ZERO, -Vec3::Z);
        task.execute(target, Speed::Full, &task_context(&start, &clock(0, 0.0, 0.1), &course));

        let over_target = ShipSnapshot::at_rest(Vec3::new(0.0, 0.0, -45.0), -Vec3::Z);
        let out = task.update(&task_context(&over_target, &clock(1, 1.0, 0.1), &course));
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::AddWaypoint, .. }
        ));
        assert_eq!(task.runs_completed(), 1);
        let egress = task.core.waypoint().map(|w| w.position()).unwrap();
        assert!((egress - Vec3::new(0.0, 0.0, -77.0)).length() < 1e-3);

        // Still inside the window on the way out: no second run yet.
        let out = task.update(&task_context(&over_target, &clock(2, 1.1, 0.1), &course));
        assert!(!out.iter().any(|d| matches!(
            d,
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::AddWaypoint, .. }
        )));

        let clear = ShipSnapshot::at_rest(Vec3::new(0.0, 0.0, -76.0), -Vec3::Z);
        let out = task.update(&task_context(&clear, &clock(3, 2.0, 0.1), &course));
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::RemoveWaypoint, .. }
        ));
        assert!(out.iter().any(|d| matches!(d, PilotDirective::ChangeHeading { .. })));
        assert!(!out.iter().any(|d| matches!(d, PilotDirective::TargetReached)));
        assert_eq!(task.runs_completed(), 1);
    }
}
