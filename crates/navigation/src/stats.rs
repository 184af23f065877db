//! Hull numbers consumed by the helm and engine room.

use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

/// Propulsion and maneuvering characteristics of a hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    /// Hull mass.
    #[serde(default = "default_mass")]
    pub mass: f32,
    /// Linear drag coefficient (per second).
    #[serde(default = "default_drag")]
    pub drag: f32,
    /// Maximum thrust the engines can deliver.
    #[serde(default = "default_max_thrust")]
    pub max_thrust: f32,
    /// Full speed in units per hour.
    #[serde(default = "default_full_speed")]
    pub full_speed: f32,
    /// Maximum turn rate in degrees per game hour.
    #[serde(default = "default_max_turn_rate")]
    pub max_turn_rate: f32,
    /// Radius of the hull's collision sphere.
    #[serde(default = "default_hull_radius")]
    pub hull_radius: f32,
}

fn default_mass() -> f32 {
    1.0
}
fn default_drag() -> f32 {
    1.0
}
fn default_max_thrust() -> f32 {
    40.0
}
fn default_full_speed() -> f32 {
    20.0
}
fn default_max_turn_rate() -> f32 {
    180.0
}
fn default_hull_radius() -> f32 {
    1.0
}

impl Default for ShipStats {
    fn default() -> Self {
        Self {
            mass: default_mass(),
            drag: default_drag(),
            max_thrust: default_max_thrust(),
            full_speed: default_full_speed(),
            max_turn_rate: default_max_turn_rate(),
            hull_radius: default_hull_radius(),
        }
    }
}

impl ShipStats {
    /// Highest speed (units per hour) the engines can hold against drag.
    pub fn max_sustainable_speed(&self) -> f32 {
        self.max_thrust / (self.drag * self.mass)
    }

    pub fn validate(&self) -> NavResult<()> {
        let positive = [
            ("mass", self.mass),
            ("drag", self.drag),
            ("max_thrust", self.max_thrust),
            ("max_turn_rate", self.max_turn_rate),
            ("hull_radius", self.hull_radius),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(NavError::InvalidStats(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if !self.full_speed.is_finite() || self.full_speed < 0.0 {
            return Err(NavError::InvalidStats(format!(
                "full_speed must be non-negative, got {}",
                self.full_speed
            )));
        }
        if self.full_speed > self.max_sustainable_speed() {
            log::warn!(
                "Full speed {:.2} exceeds what max thrust {:.2} can hold against drag ({:.2})",
                self.full_speed,
                self.max_thrust,
                self.max_sustainable_speed()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_valid() {
        assert!(ShipStats::default().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_mass() {
        let stats = ShipStats {
            mass: 0.0,
            ..Default::default()
        };
        assert!(matches!(stats.validate(), Err(NavError::InvalidStats(_))));
    }

    #[test]
    fn rejects_nan_turn_rate() {
        let stats = ShipStats {
            max_turn_rate: f32::NAN,
            ..Default::default()
        };
        assert!(stats.validate().is_err());
    }
}
