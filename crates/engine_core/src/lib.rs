//! Core engine types shared by the simulation crates.
//!
//! This crate provides the foundational types used across all systems:
//! - Game clock (date, game speed, pause, fixed-step timing)
//! - Transform and orientation helpers

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Quat, Vec3};
