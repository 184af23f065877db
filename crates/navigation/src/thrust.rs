//! Thrust banding: which thrust to apply for a given speed ratio.
//!
//! The ratio `current / requested` falls into exactly one band. The `plus` and
//! `minus` thresholds nudge the ship back toward the on-target band without
//! oscillating across its edges; shedding a large excess is left to the flaps.

/// Lower edge of the on-target band.
pub const ON_TARGET_LOW: f32 = 0.99;
/// Upper edge of the on-target band.
pub const ON_TARGET_HIGH: f32 = 1.01;
/// Lower edge of the slightly-below band.
pub const SLIGHTLY_BELOW_LOW: f32 = 0.90;
/// Upper edge of the slightly-above band.
pub const SLIGHTLY_ABOVE_HIGH: f32 = 1.10;
/// Upper edge of the way-above band.
pub const WAY_ABOVE_HIGH: f32 = 10.0;

/// Scale between `target` and the `plus`/`minus` thresholds.
const THRUST_ADJUSTMENT_FACTOR: f32 = 1.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrustBand {
    /// Requested speed is zero.
    Stopped,
    WayBelow,
    SlightlyBelow,
    OnTarget,
    SlightlyAbove,
    WayAbove,
    /// Ratio outside every band (including non-finite ratios).
    OutOfRange,
}

impl ThrustBand {
    /// Band containing `ratio = current / requested`.
    pub fn classify(ratio: f32) -> ThrustBand {
        if !ratio.is_finite() || ratio < 0.0 {
            ThrustBand::OutOfRange
        } else if ratio < SLIGHTLY_BELOW_LOW {
            ThrustBand::WayBelow
        } else if ratio < ON_TARGET_LOW {
            ThrustBand::SlightlyBelow
        } else if ratio <= ON_TARGET_HIGH {
            ThrustBand::OnTarget
        } else if ratio <= SLIGHTLY_ABOVE_HIGH {
            ThrustBand::SlightlyAbove
        } else if ratio <= WAY_ABOVE_HIGH {
            ThrustBand::WayAbove
        } else {
            ThrustBand::OutOfRange
        }
    }

    /// Flaps are out only when stopping or shedding a large excess.
    pub fn deploys_flaps(self) -> bool {
        matches!(self, ThrustBand::Stopped | ThrustBand::WayAbove)
    }
}

/// True when `new / previous` is close enough to count as the same request.
pub fn is_same_speed_request(previous: f32, new: f32) -> bool {
    if previous == 0.0 {
        return new == 0.0;
    }
    let ratio = new / previous;
    (ON_TARGET_LOW..=ON_TARGET_HIGH).contains(&ratio)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrustSelection {
    pub band: ThrustBand,
    pub thrust: f32,
}

/// Thresholds derived from one speed request.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrustRegime {
    pub requested_speed: f32,
    pub target_minus: f32,
    pub target: f32,
    pub target_plus: f32,
    pub max_thrust: f32,
}

impl ThrustRegime {
    pub fn new(requested_speed: f32, drag: f32, mass: f32, max_thrust: f32) -> Self {
        let target = (requested_speed * drag * mass).min(max_thrust);
        Self {
            requested_speed,
            target_minus: (target / THRUST_ADJUSTMENT_FACTOR).min(max_thrust),
            target,
            target_plus: (target * THRUST_ADJUSTMENT_FACTOR).min(max_thrust),
            max_thrust,
        }
    }

    /// Thrust for a ship currently moving at `current_speed` (units per hour).
    pub fn select(&self, current_speed: f32) -> ThrustSelection {
        if self.requested_speed <= 0.0 {
            return ThrustSelection {
                band: ThrustBand::Stopped,
                thrust: 0.0,
            };
        }
        let band = ThrustBand::classify(current_speed / self.requested_speed);
        let thrust = match band {
            ThrustBand::WayBelow => self.max_thrust,
            ThrustBand::SlightlyBelow => self.target_plus,
            ThrustBand::OnTarget => self.target,
            ThrustBand::SlightlyAbove => self.target_minus,
            ThrustBand::Stopped | ThrustBand::WayAbove | ThrustBand::OutOfRange => 0.0,
        };
        ThrustSelection { band, thrust }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banding_is_total_and_matches_thrust() {
        let regime = ThrustRegime::new(10.0, 1.0, 1.0, 20.0);
        let mut ratio = 0.0f32;
        while ratio < 12.0 {
            let speed = ratio * 10.0;
            let selection = regime.select(speed);
            assert_eq!(selection.band, ThrustBand::classify(speed / regime.requested_speed));
            let expected = match selection.band {
                ThrustBand::WayBelow => regime.max_thrust,
                ThrustBand::SlightlyBelow => regime.target_plus,
                ThrustBand::OnTarget => regime.target,
                ThrustBand::SlightlyAbove => regime.target_minus,
                _ => 0.0,
            };
            assert_eq!(selection.thrust, expected, "ratio {ratio}");
            assert!([
                0.0,
                regime.target_minus,
                regime.target,
                regime.target_plus,
                regime.max_thrust
            ]
            .contains(&selection.thrust));
            ratio += 0.0037;
        }
    }

    #[test]
    fn band_edges() {
        assert_eq!(ThrustBand::classify(0.0), ThrustBand::WayBelow);
        assert_eq!(ThrustBand::classify(0.9), ThrustBand::SlightlyBelow);
        assert_eq!(ThrustBand::classify(0.99), ThrustBand::OnTarget);
        assert_eq!(ThrustBand::classify(1.01), ThrustBand::OnTarget);
        assert_eq!(ThrustBand::classify(1.05), ThrustBand::SlightlyAbove);
        assert_eq!(ThrustBand::classify(1.10), ThrustBand::SlightlyAbove);
        assert_eq!(ThrustBand::classify(2.0), ThrustBand::WayAbove);
        assert_eq!(ThrustBand::classify(10.5), ThrustBand::OutOfRange);
        assert_eq!(ThrustBand::classify(f32::NAN), ThrustBand::OutOfRange);
    }

    #[test]
    fn zero_request_is_stopped() {
        let regime = ThrustRegime::new(0.0, 1.0, 1.0, 20.0);
        let selection = regime.select(3.0);
        assert_eq!(selection.band, ThrustBand::Stopped);
        assert_eq!(selection.thrust, 0.0);
        assert!(selection.band.deploys_flaps());
    }

    #[test]
    fn thresholds_are_capped_by_max_thrust() {
        let regime = ThrustRegime::new(30.0, 1.0, 1.0, 20.0);
        assert_eq!(regime.target, 20.0);
        assert_eq!(regime.target_plus, 20.0);
        assert!(regime.target_minus < 20.0);
    }

    #[test]
    fn reference_scenario() {
        let regime = ThrustRegime::new(10.0, 1.0, 1.0, 20.0);
        assert_eq!(regime.target, 10.0);
        assert_eq!(regime.select(5.0).thrust, 20.0);
        let on_target = regime.select(9.95);
        assert_eq!(on_target.band, ThrustBand::OnTarget);
        assert_eq!(on_target.thrust, 10.0);
        assert!(!on_target.band.deploys_flaps());
    }

    #[test]
    fn same_request_tolerance() {
        assert!(is_same_speed_request(10.0, 10.05));
        assert!(is_same_speed_request(10.0, 9.95));
        assert!(!is_same_speed_request(10.0, 10.2));
        assert!(is_same_speed_request(0.0, 0.0));
        assert!(!is_same_speed_request(0.0, 1.0));
        assert!(!is_same_speed_request(10.0, 0.0));
    }
}
