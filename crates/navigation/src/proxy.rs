//! Destination proxies: what the autopilot travels to.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use engine_core::Vec3;

/// A navigable destination as seen by the autopilot.
pub trait DestinationProxy {
    /// Current position of the destination.
    fn position(&self) -> Vec3;
    /// True when a ship at `ship_position` counts as having arrived.
    fn has_arrived(&self, ship_position: Vec3) -> bool;
    /// Mobile destinations are tracked live by the course; stationary ones are frozen.
    fn is_mobile(&self) -> bool;
    /// Keep-out radius around the destination.
    fn inner_radius(&self) -> f32;
    fn debug_name(&self) -> &str;
}

pub type ProxyRef = Rc<dyn DestinationProxy>;

impl fmt::Debug for dyn DestinationProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{:?}", self.debug_name(), self.position())
    }
}

/// Shared live position of a moving object, republished by the simulation
/// after every physics step.
#[derive(Debug, Clone, Default)]
pub struct PositionBeacon(Rc<Cell<Vec3>>);

impl PositionBeacon {
    pub fn new(position: Vec3) -> Self {
        Self(Rc::new(Cell::new(position)))
    }

    pub fn get(&self) -> Vec3 {
        self.0.get()
    }

    pub fn publish(&self, position: Vec3) {
        self.0.set(position);
    }
}

#[derive(Debug, Clone)]
enum Anchor {
    Fixed(Vec3),
    Tracked(PositionBeacon),
}

/// Standard destination proxy: a point or a tracked object with an arrival
/// window `[.., outer_radius]` and a keep-out `inner_radius`.
#[derive(Debug, Clone)]
pub struct ApDestinationProxy {
    name: String,
    anchor: Anchor,
    inner_radius: f32,
    outer_radius: f32,
}

impl ApDestinationProxy {
    /// A stationary destination.
    pub fn fixed(name: impl Into<String>, point: Vec3, inner_radius: f32, outer_radius: f32) -> Self {
        Self::with_anchor(name.into(), Anchor::Fixed(point), inner_radius, outer_radius)
    }

    /// A mobile destination following `beacon`.
    pub fn tracking(
        name: impl Into<String>,
        beacon: PositionBeacon,
        inner_radius: f32,
        outer_radius: f32,
    ) -> Self {
        Self::with_anchor(name.into(), Anchor::Tracked(beacon), inner_radius, outer_radius)
    }

    fn with_anchor(name: String, anchor: Anchor, inner_radius: f32, outer_radius: f32) -> Self {
        assert!(
            outer_radius >= inner_radius,
            "{name}: arrival radius {outer_radius} inside keep-out radius {inner_radius}"
        );
        Self {
            name,
            anchor,
            inner_radius,
            outer_radius,
        }
    }

    pub fn into_ref(self) -> ProxyRef {
        Rc::new(self)
    }
}

impl DestinationProxy for ApDestinationProxy {
    fn position(&self) -> Vec3 {
        match &self.anchor {
            Anchor::Fixed(point) => *point,
            Anchor::Tracked(beacon) => beacon.get(),
        }
    }

    fn has_arrived(&self, ship_position: Vec3) -> bool {
        ship_position.distance(self.position()) <= self.outer_radius
    }

    fn is_mobile(&self) -> bool {
        matches!(self.anchor, Anchor::Tracked(_))
    }

    fn inner_radius(&self) -> f32 {
        self.inner_radius
    }

    fn debug_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_proxy_arrival_window() {
        let proxy = ApDestinationProxy::fixed("Beacon", Vec3::new(10.0, 0.0, 0.0), 1.0, 3.0);
        assert!(!proxy.is_mobile());
        assert!(proxy.has_arrived(Vec3::new(8.0, 0.0, 0.0)));
        assert!(!proxy.has_arrived(Vec3::ZERO));
    }

    #[test]
    fn tracking_proxy_follows_beacon() {
        let beacon = PositionBeacon::new(Vec3::ZERO);
        let proxy = ApDestinationProxy::tracking("Raider", beacon.clone(), 2.0, 5.0);
        assert!(proxy.is_mobile());
        beacon.publish(Vec3::new(0.0, 0.0, -40.0));
        assert_eq!(proxy.position(), Vec3::new(0.0, 0.0, -40.0));
        assert!(proxy.has_arrived(Vec3::new(0.0, 0.0, -36.0)));
    }

    #[test]
    #[should_panic]
    fn arrival_radius_must_enclose_keep_out() {
        ApDestinationProxy::fixed("Bad", Vec3::ZERO, 5.0, 1.0);
    }
}
