//! The ordered list of destinations from the ship to its final target.
//!
//! Legal shapes are `[]`, `[ship, target]` and `[ship, detour, target]`.
//! Mutations outside those shapes are contract violations and panic.

use engine_core::Vec3;

use crate::proxy::{DestinationProxy, ProxyRef};

/// Ways the autopilot can rebuild or edit the course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseRefreshMode {
    NewCourse,
    AddWaypoint,
    ReplaceObstacleDetour,
    RemoveWaypoint,
    ClearCourse,
}

/// One navigable point on the course.
#[derive(Debug, Clone)]
pub enum CourseEntry {
    /// The ship itself, always first.
    Ship,
    /// A mobile destination, tracked live.
    Tracked(ProxyRef),
    /// A stationary destination, frozen at the time it was added.
    Fixed { name: String, point: Vec3 },
}

impl CourseEntry {
    /// Tracked if the proxy is mobile, frozen otherwise.
    pub fn for_proxy(proxy: &ProxyRef) -> Self {
        if proxy.is_mobile() {
            CourseEntry::Tracked(proxy.clone())
        } else {
            CourseEntry::Fixed {
                name: proxy.debug_name().to_string(),
                point: proxy.position(),
            }
        }
    }

    pub fn position(&self, ship_position: Vec3) -> Vec3 {
        match self {
            CourseEntry::Ship => ship_position,
            CourseEntry::Tracked(proxy) => proxy.position(),
            CourseEntry::Fixed { point, .. } => *point,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            CourseEntry::Ship => "ship",
            CourseEntry::Tracked(proxy) => proxy.debug_name(),
            CourseEntry::Fixed { name, .. } => name,
        }
    }

    fn refers_to(&self, proxy: &dyn DestinationProxy) -> bool {
        match self {
            CourseEntry::Ship => false,
            CourseEntry::Tracked(tracked) => tracked.debug_name() == proxy.debug_name(),
            CourseEntry::Fixed { name, point } => {
                name == proxy.debug_name() && point.distance(proxy.position()) < 1e-3
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Course {
    entries: Vec<CourseEntry>,
}

impl Course {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CourseEntry] {
        &self.entries
    }

    /// Position the ship is currently heading for (the entry after the ship).
    pub fn next_destination(&self, ship_position: Vec3) -> Option<Vec3> {
        self.entries.get(1).map(|e| e.position(ship_position))
    }

    pub fn final_destination(&self, ship_position: Vec3) -> Option<Vec3> {
        match self.entries.len() {
            0 | 1 => None,
            n => Some(self.entries[n - 1].position(ship_position)),
        }
    }

    /// Discard everything and plot `[ship, target]`.
    pub fn plot(&mut self, target: &ProxyRef) {
        self.entries.clear();
        self.entries.push(CourseEntry::Ship);
        self.entries.push(CourseEntry::for_proxy(target));
    }

    /// Insert a detour before the final target.
    pub fn add_waypoint(&mut self, waypoint: &ProxyRef) {
        assert_eq!(
            self.entries.len(),
            2,
            "AddWaypoint needs [ship, target], course has {} entries",
            self.entries.len()
        );
        self.entries.insert(1, CourseEntry::for_proxy(waypoint));
    }

    /// Swap the existing detour for a new one.
    pub fn replace_detour(&mut self, waypoint: &ProxyRef) {
        assert_eq!(
            self.entries.len(),
            3,
            "ReplaceObstacleDetour needs [ship, detour, target], course has {} entries",
            self.entries.len()
        );
        self.entries[1] = CourseEntry::for_proxy(waypoint);
    }

    /// Drop the detour, leaving `[ship, target]`.
    pub fn remove_waypoint(&mut self, waypoint: &ProxyRef) {
        assert_eq!(
            self.entries.len(),
            3,
            "RemoveWaypoint needs [ship, detour, target], course has {} entries",
            self.entries.len()
        );
        assert!(
            self.entries[1].refers_to(waypoint.as_ref()),
            "RemoveWaypoint: {} is not the current detour ({})",
            waypoint.debug_name(),
            self.entries[1].name()
        );
        self.entries.remove(1);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
