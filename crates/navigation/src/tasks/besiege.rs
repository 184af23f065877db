//! Besiege: close to the target's standoff window, report it once, then
//! circle the target at the distance the ship arrived at.

use engine_core::Vec3;

use super::pursuit::Pursuit;
use super::{CheckPeriodFlags, NavTask, PilotDirective, TaskContext, TaskKind};
use crate::proxy::ProxyRef;
use crate::speed::Speed;

/// How hard the orbit heading leans back toward the orbit radius.
const ORBIT_RADIUS_GAIN: f32 = 2.0;
const MAX_ORBIT_CORRECTION: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Stance {
    Approaching,
    Orbiting { radius: f32 },
}

#[derive(Debug)]
pub struct BesiegeTask {
    core: Pursuit,
    stance: Stance,
    reported: bool,
}

impl Default for BesiegeTask {
    fn default() -> Self {
        Self {
            core: Pursuit::default(),
            stance: Stance::Approaching,
            reported: false,
        }
    }
}

impl BesiegeTask {
    pub fn new() -> Self {
        Self::default()
    }

    fn orbit(&mut self, radius: f32, ctx: &TaskContext<'_>, out: &mut Vec<PilotDirective>) {
        let Some(center) = self.core.target().map(|target| target.position()) else {
            return;
        };
        if !self.core.progress_check_due(ctx.clock.date) {
            return;
        }
        let heading = orbit_heading(ctx.ship.position, ctx.ship.heading, center, radius);
        self.core.steer_along(heading, out);
    }
}

/// Tangential heading around `center`, bent inward or outward to hold `radius`.
fn orbit_heading(position: Vec3, heading: Vec3, center: Vec3, radius: f32) -> Vec3 {
    let offset = position - center;
    let distance = offset.length();
    let Some(outward) = offset.try_normalize() else {
        return heading;
    };
    let mut tangent = Vec3::Y.cross(outward);
    if tangent.length_squared() < 1e-6 {
        tangent = outward.any_orthonormal_vector();
    }
    // Keep circling in whichever direction the ship already faces.
    if tangent.dot(heading) < 0.0 {
        tangent = -tangent;
    }
    let error = ((distance - radius) / radius.max(1.0) * ORBIT_RADIUS_GAIN)
        .clamp(-MAX_ORBIT_CORRECTION, MAX_ORBIT_CORRECTION);
    (tangent.normalize() - outward * error).normalize_or_zero()
}

impl NavTask for BesiegeTask {
    fn kind(&self) -> TaskKind {
        TaskKind::Besiege
    }

    fn is_engaged(&self) -> bool {
        self.core.is_engaged()
    }

    fn execute(&mut self, target: ProxyRef, speed: Speed, ctx: &TaskContext<'_>) -> Vec<PilotDirective> {
        log::debug!("{}: besieging {} at {:?}", ctx.ship_name, target.debug_name(), speed);
        self.stance = Stance::Approaching;
        self.reported = false;
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
        let arrived = target.has_arrived(ctx.ship.position);

        match self.stance {
            Stance::Approaching if arrived => {
                let radius = ctx.ship.position.distance(target.position());
                self.stance = Stance::Orbiting { radius };
                if !self.reported {
                    self.reported = true;
                    out.push(PilotDirective::TargetReached);
                } else {
                    log::debug!("{}: back on station around {}", ctx.ship_name, target.debug_name());
                }
                self.orbit(radius, ctx, &mut out);
            }
            Stance::Approaching => self.core.pursue(ctx, &mut out),
            Stance::Orbiting { .. } if !arrived => {
                log::debug!(
                    "{}: pushed off station around {}, closing again",
                    ctx.ship_name,
                    target.debug_name()
                );
                self.stance = Stance::Approaching;
                self.core.replot(ctx, &mut out);
                self.core.pursue(ctx, &mut out);
            }
            Stance::Orbiting { radius } => self.orbit(radius, ctx, &mut out),
        }
        out
    }

    fn handle_turn_completed(&mut self, tag: u32, reached: bool) -> Vec<PilotDirective> {
        self.core.handle_turn_completed(tag, reached)
    }

    fn reset_for_reuse(&mut self) -> Vec<PilotDirective> {
        self.stance = Stance::Approaching;
        self.reported = false;
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
    use crate::proxy::ApDestinationProxy;
    use crate::testing::{clock, task_context};
    use engine_core::angle_between_degrees;

    #[test]
    fn orbit_heading_is_tangential_on_station() {
        let heading = orbit_heading(Vec3::new(10.0, 0.0, 0.0), -Vec3::Z, Vec3::ZERO, 10.0);
        assert!((angle_between_degrees(heading, -Vec3::Z)).abs() < 1e-3);
    }

    #[test]
    fn orbit_heading_leans_in_when_wide() {
        let heading = orbit_heading(Vec3::new(14.0, 0.0, 0.0), -Vec3::Z, Vec3::ZERO, 10.0);
        assert!(heading.x < 0.0);
        let heading = orbit_heading(Vec3::new(7.0, 0.0, 0.0), -Vec3::Z, Vec3::ZERO, 10.0);
        assert!(heading.x > 0.0);
    }

    #[test]
    fn reports_reached_once_then_orbits() {
        let target = ApDestinationProxy::fixed("Fort", Vec3::new(0.0, 0.0, -40.0), 4.0, 10.0).into_ref();
        let course = Course::new();
        let mut task = BesiegeTask::new();
        let start = ShipSnapshot::at_rest(Vec3::ZERO, -Vec3::Z);
        task.execute(target, Speed::Standard, &task_context(&start, &clock(0, 0.0, 0.1), &course));

        let on_station = ShipSnapshot::at_rest(Vec3::new(0.0, 0.0, -31.0), -Vec3::Z);
        let out = task.update(&task_context(&on_station, &clock(1, 1.0, 0.1), &course));
        assert!(matches!(out[0], PilotDirective::TargetReached));
        assert!(out.iter().any(|d| matches!(d, PilotDirective::ChangeHeading { .. })));
        assert_eq!(task.stance, Stance::Orbiting { radius: 9.0 });

        // Drifting out of the window and back in does not report again.
        let off_station = ShipSnapshot::at_rest(Vec3::new(0.0, 0.0, -20.0), -Vec3::Z);
        let out = task.update(&task_context(&off_station, &clock(2, 2.0, 0.1), &course));
        assert!(matches!(
            out[0],
            PilotDirective::RefreshCourse { mode: CourseRefreshMode::NewCourse, .. }
        ));
        assert_eq!(task.stance, Stance::Approaching);

        let out = task.update(&task_context(&on_station, &clock(3, 3.0, 0.1), &course));
        assert!(!out.iter().any(|d| matches!(d, PilotDirective::TargetReached)));
        assert!(matches!(task.stance, Stance::Orbiting { .. }));
    }
}
