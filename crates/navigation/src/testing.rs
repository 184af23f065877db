//! Test doubles shared by the unit tests of this crate.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use engine_core::{heading_rotation, GameDate, Quat, SimClock, Vec3};

use crate::course::Course;
use crate::fleet::{FleetCommand, ShipId};
use crate::hull::{ShipHull, ShipSnapshot};
use crate::obstacle::OpenSpace;
use crate::tasks::{default_task, TaskContext, TaskFactory, TaskKind};

/// Point-mass hull integrated with explicit Euler steps.
#[derive(Debug, Clone)]
pub struct TestHull {
    pub position: Vec3,
    pub rotation: Quat,
    pub velocity: Vec3,
    pub force: Vec3,
    pub drag: f32,
    pub frozen: bool,
    pub drag_changes: u32,
}

impl TestHull {
    pub fn facing(heading: Vec3) -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: heading_rotation(heading),
            velocity: Vec3::ZERO,
            force: Vec3::ZERO,
            drag: 1.0,
            frozen: false,
            drag_changes: 0,
        }
    }

    pub fn integrate(&mut self, dt: f32, mass: f32) {
        if self.frozen {
            return;
        }
        self.velocity += (self.force / mass - self.velocity * self.drag) * dt;
        self.position += self.velocity * dt;
    }
}

impl ShipHull for TestHull {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }

    fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    fn set_force(&mut self, force: Vec3) {
        self.force = force;
    }

    fn set_drag(&mut self, drag: f32) {
        self.drag = drag;
        self.drag_changes += 1;
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}

/// Clock at `date_hours` with one game hour per real second.
pub fn clock(frame: u64, date_hours: f64, real_delta: f32) -> SimClock {
    SimClock {
        date: GameDate::from_hours(date_hours),
        real_delta,
        game_speed: 1.0,
        paused: false,
        hours_per_second: 1.0,
        frame,
    }
}

/// Solo, open-space context with a full speed of 10 units per hour.
pub fn task_context<'a>(ship: &'a ShipSnapshot, clock: &'a SimClock, course: &'a Course) -> TaskContext<'a> {
    TaskContext {
        ship_name: "Test",
        ship,
        clock,
        course,
        full_speed: 10.0,
        is_fleetwide_move: false,
        fleet_aligned: true,
        obstacles: &OpenSpace,
    }
}

/// Task factory that counts how many tasks it has built.
pub fn counting_factory() -> (TaskFactory, Rc<Cell<usize>>) {
    let built = Rc::new(Cell::new(0));
    let counter = built.clone();
    let factory: TaskFactory = Box::new(move |kind: TaskKind| {
        counter.set(counter.get() + 1);
        default_task(kind)
    });
    (factory, built)
}

/// Fleet whose alignment is toggled by the test.
#[derive(Debug, Default)]
pub struct FakeFleet {
    pub full_speed: f32,
    pub position: Vec3,
    pub support_range: f32,
    pub aligned: Cell<bool>,
    pub waiting: RefCell<BTreeSet<ShipId>>,
    pub removals: Cell<u32>,
}

impl FakeFleet {
    pub fn new(full_speed: f32) -> Rc<Self> {
        Rc::new(Self {
            full_speed,
            support_range: f32::MAX,
            ..Default::default()
        })
    }
}

impl FleetCommand for FakeFleet {
    fn wait_for_fleet_to_align(&self, ship: ShipId) {
        self.waiting.borrow_mut().insert(ship);
    }

    fn remove_fleet_is_aligned_callback(&self, ship: ShipId) {
        self.waiting.borrow_mut().remove(&ship);
        self.removals.set(self.removals.get() + 1);
    }

    fn is_fleet_aligned(&self) -> bool {
        self.aligned.get()
    }

    fn unit_full_speed_value(&self) -> f32 {
        self.full_speed
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn support_range(&self) -> f32 {
        self.support_range
    }
}
