//! Headless simulation loop: physics, helms, autopilots and a captain that
//! reacts to what the helms report.

use crate::config::{ObstacleConfig, ScatterConfig, SimConfig, TargetConfig};
use crate::fleet::Fleet;
use anyhow::{bail, Context, Result};
use engine_core::{heading_rotation, GameDate, GameSpeed, GameTime, SimClock};
use glam::Vec3;
use navigation::{
    ApDestinationProxy, CourseRefreshMode, DestinationProxy, FleetCommand, HelmEvent, NavOrder, PhysicsObstacleSensor,
    PositionBeacon, ProxyRef, RapierHull, ShipHelm, ShipId, ShipSnapshot, Speed, TaskKind,
};
use physics::{PhysicsWorld, RigidBodyHandle};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// A ship in the simulation: its helm, its rapier body and the beacon other
/// ships track it by.
pub struct SimShip {
    pub helm: ShipHelm,
    pub body: RigidBodyHandle,
    pub beacon: PositionBeacon,
    detours: u32,
    course_changes: u32,
}

struct ScheduledOrder {
    at_seconds: f32,
    ship: usize,
    kind: TaskKind,
    target: ProxyRef,
    speed: Speed,
    fleetwide: bool,
}

#[derive(Clone, Copy)]
struct ScheduledGameSpeed {
    at_seconds: f32,
    speed: GameSpeed,
}

#[derive(Clone, Copy)]
struct ScheduledFullSpeed {
    at_seconds: f32,
    ship: usize,
    full_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Reached,
    Uncatchable,
}

#[derive(Debug, Clone)]
pub struct OutcomeRecord {
    pub ship: String,
    pub target: String,
    pub task: Option<TaskKind>,
    pub outcome: Outcome,
    pub date: GameDate,
    pub elapsed_seconds: f32,
}

#[derive(Debug, Clone)]
pub struct ShipSummary {
    pub name: String,
    pub position: Vec3,
    /// Units per game hour.
    pub speed: f32,
    pub autopilot: Option<TaskKind>,
    pub course_changes: u32,
    pub detours: u32,
}

/// What happened during a run.
#[derive(Debug, Clone)]
pub struct SimReport {
    pub frames: u64,
    pub date: GameDate,
    pub outcomes: Vec<OutcomeRecord>,
    pub ships: Vec<ShipSummary>,
}

impl fmt::Display for SimReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Simulated {} frames, game date {}", self.frames, self.date)?;
        if self.outcomes.is_empty() {
            writeln!(f, "No autopilot outcomes")?;
        }
        for record in &self.outcomes {
            writeln!(
                f,
                "  {:<16} {:?} {} ({:?}) at {} [{:.1}s]",
                record.ship,
                record.outcome,
                record.target,
                record.task,
                record.date,
                record.elapsed_seconds
            )?;
        }
        for ship in &self.ships {
            writeln!(
                f,
                "  {:<16} at ({:.1}, {:.1}, {:.1}) speed {:.1}/h, autopilot {:?}, {} course change(s), {} detour(s)",
                ship.name,
                ship.position.x,
                ship.position.y,
                ship.position.z,
                ship.speed,
                ship.autopilot,
                ship.course_changes,
                ship.detours
            )?;
        }
        Ok(())
    }
}

/// Owns the physics world, the clock, the ships and their fleet.
pub struct FleetSim {
    world: PhysicsWorld,
    time: GameTime,
    ships: Vec<SimShip>,
    fleet: Rc<Fleet>,
    orders: VecDeque<ScheduledOrder>,
    game_speed_changes: VecDeque<ScheduledGameSpeed>,
    full_speed_changes: VecDeque<ScheduledFullSpeed>,
    pause: Option<(f32, f32)>,
    frame_delta: Duration,
    elapsed: f32,
    duration: f32,
    outcomes: Vec<OutcomeRecord>,
}

impl FleetSim {
    pub fn from_config(config: &SimConfig) -> Result<Self> {
        if config.physics_rate <= 0.0 || config.frame_rate <= 0.0 {
            bail!("physics and frame rates must be positive");
        }
        let mut world = PhysicsWorld::new();
        world.set_timestep(1.0 / config.physics_rate);
        let mut time = GameTime::new(config.hours_per_second);
        time.set_fixed_rate(config.physics_rate as f64);

        let fleet = Rc::new(Fleet::new("Fleet", config.support_range));
        let mut ships = Vec::with_capacity(config.ships.len());
        let mut index_by_name = HashMap::new();
        for (i, ship_config) in config.ships.iter().enumerate() {
            if index_by_name.insert(ship_config.name.as_str(), i).is_some() {
                bail!("duplicate ship name {:?}", ship_config.name);
            }
            let ship_id = ShipId(i as u32 + 1);
            let stats = ship_config.stats;
            let mut helm = ShipHelm::new(ship_config.name.clone(), ship_id, stats, ship_config.heading)
                .with_context(|| format!("ship {:?}", ship_config.name))?;
            let (body, _) = world.add_ship_body(
                ship_config.position,
                heading_rotation(helm.intended_heading()),
                stats.mass,
                stats.drag,
                stats.hull_radius,
            );
            let beacon = PositionBeacon::new(ship_config.position);
            if ship_config.in_fleet {
                fleet.add_member(ship_id, stats.full_speed, &beacon);
                helm.set_fleet(Some(fleet.clone() as Rc<dyn FleetCommand>));
            }
            ships.push(SimShip {
                helm,
                body,
                beacon,
                detours: 0,
                course_changes: 0,
            });
        }

        for obstacle in &config.obstacles {
            world.add_obstacle(obstacle.position, obstacle.radius);
        }
        if let Some(scatter) = config.scatter {
            let starts: Vec<Vec3> = config.ships.iter().map(|ship| ship.position).collect();
            for obstacle in scatter_obstacles(&scatter, config.seed, &starts)? {
                world.add_obstacle(obstacle.position, obstacle.radius);
            }
        }
        world.update_query_pipeline();

        let ship_index = |name: &str| {
            index_by_name
                .get(name)
                .copied()
                .with_context(|| format!("unknown ship {name:?}"))
        };

        let mut orders = Vec::with_capacity(config.orders.len());
        for order in &config.orders {
            let ship = ship_index(order.ship.as_str())?;
            if order.fleetwide && !config.ships[ship].in_fleet {
                bail!("{}: fleet-wide order for a ship outside the fleet", order.ship);
            }
            let target = match &order.target {
                TargetConfig::Point { position, inner, outer } => {
                    check_radii(&order.ship, *inner, *outer)?;
                    let name = format!("point ({:.0}, {:.0}, {:.0})", position.x, position.y, position.z);
                    ApDestinationProxy::fixed(name, *position, *inner, *outer).into_ref()
                }
                TargetConfig::Ship { name, inner, outer } => {
                    check_radii(&order.ship, *inner, *outer)?;
                    let target = ship_index(name.as_str())?;
                    if target == ship {
                        bail!("{}: ordered to pursue itself", order.ship);
                    }
                    ApDestinationProxy::tracking(name.clone(), ships[target].beacon.clone(), *inner, *outer)
                        .into_ref()
                }
            };
            orders.push(ScheduledOrder {
                at_seconds: order.at_seconds,
                ship,
                kind: order.kind,
                target,
                speed: order.speed,
                fleetwide: order.fleetwide,
            });
        }
        orders.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));

        let mut game_speed_changes: Vec<ScheduledGameSpeed> = config
            .game_speed_changes
            .iter()
            .map(|change| ScheduledGameSpeed {
                at_seconds: change.at_seconds,
                speed: change.speed,
            })
            .collect();
        game_speed_changes.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));

        let mut full_speed_changes = Vec::with_capacity(config.full_speed_changes.len());
        for change in &config.full_speed_changes {
            if change.full_speed <= 0.0 {
                bail!("{}: full speed must be positive", change.ship);
            }
            full_speed_changes.push(ScheduledFullSpeed {
                at_seconds: change.at_seconds,
                ship: ship_index(change.ship.as_str())?,
                full_speed: change.full_speed,
            });
        }
        full_speed_changes.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));

        log::info!(
            "Scenario: {} ship(s), {} in {}, {} order(s)",
            ships.len(),
            fleet.member_ids().len(),
            fleet.name(),
            orders.len()
        );

        Ok(Self {
            world,
            time,
            ships,
            fleet,
            orders: orders.into(),
            game_speed_changes: game_speed_changes.into(),
            full_speed_changes: full_speed_changes.into(),
            pause: config.pause.map(|window| (window.start_seconds, window.end_seconds)),
            frame_delta: Duration::from_secs_f64(1.0 / config.frame_rate as f64),
            elapsed: 0.0,
            duration: config.duration_seconds,
            outcomes: Vec::new(),
        })
    }

    /// Run until the configured duration has elapsed.
    pub fn run(&mut self) -> SimReport {
        while self.elapsed < self.duration {
            self.step();
        }
        self.report()
    }

    /// Simulate one frame.
    pub fn step(&mut self) {
        self.apply_schedule();
        self.time.advance(self.frame_delta);
        while self.time.should_fixed_update() {
            self.fixed_tick();
        }
        self.frame_tick();
        self.act_as_captain();
        self.elapsed += self.frame_delta.as_secs_f32();
    }

    fn fixed_tick(&mut self) {
        let clock = self.time.fixed_clock();
        for ship in &mut self.ships {
            ship.helm.fixed_update(&clock, &mut RapierHull::new(&mut self.world, ship.body));
        }
        if !clock.paused {
            self.world.step();
        }
        for ship in &self.ships {
            ship.beacon.publish(self.world.body_position(ship.body));
        }
    }

    fn frame_tick(&mut self) {
        let clock = self.time.clock();
        for ship in &mut self.ships {
            let snapshot = {
                let mut hull = RapierHull::new(&mut self.world, ship.body);
                ship.helm.update_heading(&clock, &mut hull);
                ShipSnapshot::capture(&hull, &clock)
            };
            let sensor = PhysicsObstacleSensor::new(&self.world);
            ship.helm.update_autopilot(&clock, &snapshot, &sensor);
        }
    }

    fn act_as_captain(&mut self) {
        let date = self.time.date();
        for ship in &mut self.ships {
            for event in ship.helm.drain_events() {
                match event {
                    HelmEvent::CourseChanged { mode, entries } => {
                        ship.course_changes += 1;
                        if mode == CourseRefreshMode::AddWaypoint {
                            ship.detours += 1;
                        }
                        log::debug!("{}: course {:?}, {} entries", ship.helm.name(), mode, entries);
                    }
                    HelmEvent::TargetReached { target } => {
                        let task = ship.helm.autopilot().active_task();
                        log::info!("{}: reached {} at {}", ship.helm.name(), target, date);
                        self.outcomes.push(OutcomeRecord {
                            ship: ship.helm.name().to_string(),
                            target,
                            task,
                            outcome: Outcome::Reached,
                            date,
                            elapsed_seconds: self.elapsed,
                        });
                        if task == Some(TaskKind::Move) {
                            ship.helm.change_speed(Speed::Stop);
                        }
                    }
                    HelmEvent::TargetUncatchable { target } => {
                        let task = ship.helm.autopilot().active_task();
                        log::warn!("{}: {} is uncatchable, standing down", ship.helm.name(), target);
                        self.outcomes.push(OutcomeRecord {
                            ship: ship.helm.name().to_string(),
                            target,
                            task,
                            outcome: Outcome::Uncatchable,
                            date,
                            elapsed_seconds: self.elapsed,
                        });
                        ship.helm.change_speed(Speed::Stop);
                    }
                    HelmEvent::TurnCompleted { turn, reached } => {
                        log::debug!("{}: turn {:?} completed, reached {}", ship.helm.name(), turn, reached);
                    }
                }
            }
        }
    }

    fn apply_schedule(&mut self) {
        let elapsed = self.elapsed;

        if let Some((start, end)) = self.pause {
            let paused = elapsed >= start && elapsed < end;
            if paused != self.time.is_paused() {
                log::info!("{} at {:.2}s", if paused { "Paused" } else { "Resumed" }, elapsed);
                self.time.set_paused(paused);
            }
        }

        for change in take_due(&mut self.game_speed_changes, elapsed, |c| c.at_seconds) {
            self.time.set_game_speed(change.speed);
        }

        for change in take_due(&mut self.full_speed_changes, elapsed, |c| c.at_seconds) {
            self.change_full_speed(change.ship, change.full_speed);
        }

        let orders = take_due(&mut self.orders, elapsed, |o| o.at_seconds);
        let fleetwide: Vec<ShipId> = orders
            .iter()
            .filter(|order| order.fleetwide)
            .map(|order| self.ships[order.ship].helm.ship_id())
            .collect();
        if !fleetwide.is_empty() {
            self.fleet.begin_fleet_move(fleetwide);
        }
        let clock = self.time.clock();
        for order in orders {
            self.issue(order, &clock);
        }
    }

    fn issue(&mut self, order: ScheduledOrder, clock: &SimClock) {
        let ship = &mut self.ships[order.ship];
        let snapshot = ShipSnapshot::capture(&RapierHull::new(&mut self.world, ship.body), clock);
        log::info!(
            "{}: {:?} {} at {:?}{}",
            ship.helm.name(),
            order.kind,
            order.target.debug_name(),
            order.speed,
            if order.fleetwide { " with the fleet" } else { "" }
        );
        let arrived = order.kind == TaskKind::Move && order.target.has_arrived(snapshot.position);
        let mut nav_order = NavOrder::new(order.kind, order.target, order.speed);
        if order.fleetwide {
            nav_order = nav_order.fleetwide();
        }
        let engaged = match ship.helm.engage_autopilot(nav_order, &snapshot, clock) {
            Ok(()) => true,
            Err(e) => {
                log::error!("{}: order rejected: {}", ship.helm.name(), e);
                false
            }
        };
        // Neither of these ever waits on the round.
        if order.fleetwide && (!engaged || arrived) {
            self.fleet.withdraw(ship.helm.ship_id());
        }
    }

    fn change_full_speed(&mut self, ship: usize, full_speed: f32) {
        let ship_id = {
            let ship = &mut self.ships[ship];
            log::info!("{}: full speed now {:.1}", ship.helm.name(), full_speed);
            ship.helm.handle_full_speed_changed(full_speed);
            ship.helm.ship_id()
        };
        if !self.fleet.is_member(ship_id) || !self.fleet.set_member_full_speed(ship_id, full_speed) {
            return;
        }
        log::info!("Fleet full speed now {:.1}", self.fleet.unit_full_speed_value());
        let fleet = &self.fleet;
        for ship in self.ships.iter_mut().filter(|ship| fleet.is_member(ship.helm.ship_id())) {
            ship.helm.handle_fleet_full_speed_changed();
        }
    }

    fn report(&self) -> SimReport {
        let clock = self.time.clock();
        let ships = self
            .ships
            .iter()
            .map(|ship| {
                let velocity = self.world.body_velocity(ship.body);
                ShipSummary {
                    name: ship.helm.name().to_string(),
                    position: self.world.body_position(ship.body),
                    speed: navigation::hull::speed_per_hour(velocity, &clock),
                    autopilot: ship.helm.autopilot().active_task(),
                    course_changes: ship.course_changes,
                    detours: ship.detours,
                }
            })
            .collect();
        SimReport {
            frames: self.time.frame_count(),
            date: self.time.date(),
            outcomes: self.outcomes.clone(),
            ships,
        }
    }
}

/// Pop the leading entries of a time-sorted queue that are due.
fn take_due<T>(queue: &mut VecDeque<T>, elapsed: f32, at_seconds: impl Fn(&T) -> f32) -> Vec<T> {
    let due = queue.iter().take_while(|item| at_seconds(item) <= elapsed).count();
    queue.drain(..due).collect()
}

fn check_radii(ship: &str, inner: f32, outer: f32) -> Result<()> {
    if inner < 0.0 || outer < inner {
        bail!("{ship}: arrival radius {outer} must not be inside keep-out radius {inner}");
    }
    Ok(())
}

/// Reproducible random obstacles that keep clear of the ships' starting points.
fn scatter_obstacles(scatter: &ScatterConfig, seed: u64, starts: &[Vec3]) -> Result<Vec<ObstacleConfig>> {
    if scatter.extent <= 0.0 || scatter.min_radius <= 0.0 || scatter.max_radius < scatter.min_radius {
        bail!("invalid obstacle scatter {:?}", scatter);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut obstacles = Vec::with_capacity(scatter.count);
    let max_attempts = scatter.count.saturating_mul(20);
    let mut attempts = 0;
    while obstacles.len() < scatter.count && attempts < max_attempts {
        attempts += 1;
        let position = Vec3::new(
            rng.gen_range(-scatter.extent..=scatter.extent),
            rng.gen_range(-scatter.extent..=scatter.extent),
            rng.gen_range(-scatter.extent..=scatter.extent),
        );
        let radius = rng.gen_range(scatter.min_radius..=scatter.max_radius);
        let clear = starts
            .iter()
            .all(|start| start.distance(position) > radius + scatter.spawn_clearance);
        if clear {
            obstacles.push(ObstacleConfig { position, radius });
        }
    }
    if obstacles.len() < scatter.count {
        log::warn!(
            "Placed {} of {} scattered obstacles after {} attempts",
            obstacles.len(),
            scatter.count,
            attempts
        );
    }
    Ok(obstacles)
}
