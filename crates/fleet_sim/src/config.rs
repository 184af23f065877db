//! Scenario configuration. Loaded from `fleet_sim.ron` (or the path given on
//! the command line) at startup.

use engine_core::GameSpeed;
use glam::Vec3;
use navigation::{ShipStats, Speed, TaskKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "fleet_sim.ron";

/// A complete scenario: clock settings, the obstacle field, ships and the
/// orders the captain issues over time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Game hours that pass per real second at normal game speed.
    #[serde(default = "default_hours_per_second")]
    pub hours_per_second: f32,
    /// Physics ticks per real second.
    #[serde(default = "default_physics_rate")]
    pub physics_rate: f32,
    /// Frames per real second.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: f32,
    /// Real seconds to simulate.
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f32,
    /// Seed for the obstacle scatter.
    #[serde(default)]
    pub seed: u64,
    /// Range from the flagship within which the fleet supports its ships.
    #[serde(default = "default_support_range")]
    pub support_range: f32,
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
    #[serde(default)]
    pub scatter: Option<ScatterConfig>,
    #[serde(default = "default_ships")]
    pub ships: Vec<ShipConfig>,
    #[serde(default = "default_orders")]
    pub orders: Vec<OrderConfig>,
    #[serde(default)]
    pub game_speed_changes: Vec<GameSpeedChange>,
    #[serde(default)]
    pub full_speed_changes: Vec<FullSpeedChange>,
    #[serde(default)]
    pub pause: Option<PauseWindow>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObstacleConfig {
    pub position: Vec3,
    pub radius: f32,
}

/// Random obstacles inside a cube of half-width `extent` around the origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScatterConfig {
    pub count: usize,
    pub extent: f32,
    #[serde(default = "default_min_obstacle_radius")]
    pub min_radius: f32,
    #[serde(default = "default_max_obstacle_radius")]
    pub max_radius: f32,
    /// Keep scattered obstacles this far from every ship's start.
    #[serde(default = "default_spawn_clearance")]
    pub spawn_clearance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
    pub name: String,
    #[serde(default)]
    pub position: Vec3,
    /// Initial heading; need not be normalized.
    #[serde(default = "default_heading")]
    pub heading: Vec3,
    #[serde(default)]
    pub stats: ShipStats,
    /// Member of the scenario's fleet. The first member is the flagship.
    #[serde(default)]
    pub in_fleet: bool,
}

/// An autopilot order issued `at_seconds` into the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderConfig {
    pub ship: String,
    pub kind: TaskKind,
    pub target: TargetConfig,
    #[serde(default = "default_order_speed")]
    pub speed: Speed,
    #[serde(default)]
    pub fleetwide: bool,
    #[serde(default)]
    pub at_seconds: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TargetConfig {
    Point {
        position: Vec3,
        #[serde(default)]
        inner: f32,
        #[serde(default = "default_arrival_radius")]
        outer: f32,
    },
    Ship {
        name: String,
        #[serde(default)]
        inner: f32,
        #[serde(default = "default_arrival_radius")]
        outer: f32,
    },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GameSpeedChange {
    pub at_seconds: f32,
    pub speed: GameSpeed,
}

/// A ship's own full speed changes mid-run (damage, repairs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullSpeedChange {
    pub at_seconds: f32,
    pub ship: String,
    pub full_speed: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PauseWindow {
    pub start_seconds: f32,
    pub end_seconds: f32,
}

fn default_hours_per_second() -> f32 {
    1.0
}
fn default_physics_rate() -> f32 {
    60.0
}
fn default_frame_rate() -> f32 {
    30.0
}
fn default_duration_seconds() -> f32 {
    30.0
}
fn default_support_range() -> f32 {
    500.0
}
fn default_min_obstacle_radius() -> f32 {
    2.0
}
fn default_max_obstacle_radius() -> f32 {
    8.0
}
fn default_spawn_clearance() -> f32 {
    15.0
}
fn default_heading() -> Vec3 {
    Vec3::NEG_Z
}
fn default_order_speed() -> Speed {
    Speed::Full
}
fn default_arrival_radius() -> f32 {
    3.0
}

fn default_ships() -> Vec<ShipConfig> {
    vec![ShipConfig {
        name: "Rodger Young".into(),
        position: Vec3::ZERO,
        heading: default_heading(),
        stats: ShipStats::default(),
        in_fleet: false,
    }]
}

fn default_orders() -> Vec<OrderConfig> {
    vec![OrderConfig {
        ship: "Rodger Young".into(),
        kind: TaskKind::Move,
        target: TargetConfig::Point {
            position: Vec3::new(80.0, 0.0, -120.0),
            inner: 0.0,
            outer: default_arrival_radius(),
        },
        speed: default_order_speed(),
        fleetwide: false,
        at_seconds: 0.0,
    }]
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            hours_per_second: default_hours_per_second(),
            physics_rate: default_physics_rate(),
            frame_rate: default_frame_rate(),
            duration_seconds: default_duration_seconds(),
            seed: 0,
            support_range: default_support_range(),
            obstacles: Vec::new(),
            scatter: None,
            ships: default_ships(),
            orders: default_orders(),
            game_speed_changes: Vec::new(),
            full_speed_changes: Vec::new(),
            pause: None,
        }
    }
}

impl SimConfig {
    /// Load a scenario from `path`. If the file is missing or invalid, returns
    /// the default scenario.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(data) => match Self::parse(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            },
            Err(e) => log::info!("No scenario at {:?} ({}), using defaults", path, e),
        }
        Self::default()
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }

    /// Write the scenario to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

/// The scenario file named on the command line, else `fleet_sim.ron` in the
/// current directory.
pub fn config_path(arg: Option<String>) -> PathBuf {
    match arg {
        Some(arg) => PathBuf::from(arg),
        None => std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(DEFAULT_CONFIG_FILE),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = SimConfig::parse(
            r#"(
                ships: [(name: "Alpha", stats: (full_speed: 12.0))],
                orders: [(
                    ship: "Alpha",
                    kind: Besiege,
                    target: Point(position: (10.0, 0.0, 0.0), inner: 4.0, outer: 8.0),
                    speed: TwoThirds,
                )],
            )"#,
        )
        .unwrap();
        assert_eq!(config.hours_per_second, 1.0);
        assert_eq!(config.ships[0].heading, Vec3::NEG_Z);
        assert_eq!(config.ships[0].stats.full_speed, 12.0);
        assert_eq!(config.ships[0].stats.max_thrust, ShipStats::default().max_thrust);
        assert_eq!(config.orders[0].kind, TaskKind::Besiege);
        assert_eq!(config.orders[0].speed, Speed::TwoThirds);
        assert!(!config.orders[0].fleetwide);
        assert!(matches!(
            config.orders[0].target,
            TargetConfig::Point { inner, outer, .. } if inner == 4.0 && outer == 8.0
        ));
    }

    #[test]
    fn sample_scenario_parses() {
        let config = SimConfig::parse(include_str!("../../../fleet_sim.ron")).unwrap();
        assert_eq!(config.ships.len(), 5);
        assert!(config.ships.iter().filter(|ship| ship.in_fleet).count() == 2);
        assert!(config.orders.iter().any(|order| order.kind == TaskKind::Strafe));
        assert_eq!(config.scatter.map(|s| s.spawn_clearance), Some(15.0));
    }

    #[test]
    fn invalid_file_loads_default_scenario() {
        let path = std::env::temp_dir().join(format!("fleet_sim_invalid_{}.ron", std::process::id()));
        std::fs::write(&path, "(ships: [nonsense").unwrap();
        let config = SimConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(config.ships.len(), 1);
        assert_eq!(config.orders.len(), 1);
    }

    #[test]
    fn saved_scenario_loads_back() {
        let path = std::env::temp_dir().join(format!("fleet_sim_saved_{}.ron", std::process::id()));
        let mut config = SimConfig::default();
        config.pause = Some(PauseWindow { start_seconds: 1.0, end_seconds: 2.0 });
        config.game_speed_changes.push(GameSpeedChange { at_seconds: 3.0, speed: GameSpeed::Fast });
        config.save(&path);
        let loaded = SimConfig::load(&path);
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.game_speed_changes[0].speed, GameSpeed::Fast);
        assert_eq!(loaded.pause.map(|p| p.end_seconds), Some(2.0));
    }
}
