//! Errors reported to callers of the navigation API.
//!
//! Contract violations (re-engaging an engaged pilot, malformed course
//! mutations) are not represented here; they are assertion failures.

use thiserror::Error;

use crate::speed::Speed;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum NavError {
    #[error("{0:?} is not a valid autopilot travel speed")]
    InvalidAutoPilotSpeed(Speed),

    #[error("invalid ship stats: {0}")]
    InvalidStats(String),

    #[error("heading must be a non-zero, finite vector")]
    InvalidHeading,

    #[error("the helm has been shut down")]
    HelmShutDown,
}

pub type NavResult<T> = Result<T, NavError>;
