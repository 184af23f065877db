//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for different body types.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static obstacles (planets, stations, asteroid fields)
    Obstacle = 1 << 0,
    /// Ship hulls
    Ship = 1 << 1,
}

impl CollisionGroup {
    /// Obstacles collide with everything.
    pub fn obstacle() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Obstacle as u32);
        let filter = Group::ALL;
        (membership, filter)
    }

    /// Ships only collide with obstacles; hulls pass through each other.
    pub fn ship() -> (Group, Group) {
        let membership = Group::from_bits_retain(Self::Ship as u32);
        let filter = Group::from_bits_retain(Self::Obstacle as u32);
        (membership, filter)
    }
}
