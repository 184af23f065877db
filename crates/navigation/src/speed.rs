//! Speed settings a helm can hold.

use serde::{Deserialize, Serialize};

/// Discrete speed setting. Absolute values are resolved against a full-speed
/// value (the ship's own or its fleet's) in units per hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Speed {
    #[default]
    None,
    HardStop,
    Stop,
    ThrustersOnly,
    Docking,
    Slowest,
    Slow,
    OneThird,
    TwoThirds,
    Standard,
    Full,
}

impl Speed {
    /// Fraction of full speed this setting represents.
    pub fn fraction(self) -> f32 {
        match self {
            Speed::None | Speed::HardStop | Speed::Stop => 0.0,
            Speed::ThrustersOnly => 0.05,
            Speed::Docking => 0.10,
            Speed::Slowest => 0.15,
            Speed::Slow => 0.25,
            Speed::OneThird => 1.0 / 3.0,
            Speed::TwoThirds => 2.0 / 3.0,
            Speed::Standard => 0.85,
            Speed::Full => 1.0,
        }
    }

    /// Absolute speed in units per hour given a full-speed value.
    pub fn units_per_hour(self, full_speed: f32) -> f32 {
        self.fraction() * full_speed.max(0.0)
    }

    /// Settings that make no sense for autopilot travel.
    pub fn is_valid_for_autopilot(self) -> bool {
        !matches!(self, Speed::None | Speed::HardStop | Speed::Stop)
    }
}
