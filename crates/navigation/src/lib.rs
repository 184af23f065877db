//! Ship navigation and propulsion control.
//!
//! - [`EngineRoom`]: turns a requested speed into thrust and drag
//! - [`ShipHelm`]: heading and speed commands, turn execution
//! - [`AutoPilot`]: engages Move / Besiege / Strafe strategies and keeps the
//!   [`Course`] they travel on
//!
//! Everything is advanced by the caller's tick with an injected
//! [`engine_core::SimClock`]; nothing here reads global time.

pub mod autopilot;
pub mod course;
pub mod engine_room;
pub mod error;
pub mod fleet;
pub mod helm;
pub mod hull;
pub mod obstacle;
pub mod proxy;
pub mod rapier;
pub mod speed;
pub mod stats;
pub mod tasks;
pub mod thrust;
pub mod turn;

#[cfg(test)]
mod testing;

pub use autopilot::{AutoPilot, HelmCommand, NavOrder};
pub use course::{Course, CourseEntry, CourseRefreshMode};
pub use engine_room::EngineRoom;
pub use error::{NavError, NavResult};
pub use fleet::{FleetCommand, ShipId};
pub use helm::{HelmEvent, ShipHelm};
pub use hull::{ShipHull, ShipSnapshot};
pub use obstacle::{Obstacle, ObstacleField, ObstacleSensor, OpenSpace};
pub use proxy::{ApDestinationProxy, DestinationProxy, PositionBeacon, ProxyRef};
pub use rapier::{PhysicsObstacleSensor, RapierHull};
pub use speed::Speed;
pub use stats::ShipStats;
pub use tasks::{NavTask, TaskKind};
pub use turn::{TurnId, TurnListener};
