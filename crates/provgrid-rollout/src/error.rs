//! Rollout error types.
//!
//! Only rollout-level failures live here. Per-device failures are contained
//! inside the worker and become [`crate::Outcome`]s, never errors.

use thiserror::Error;

/// Result type alias for rollout operations.
pub type RolloutResult<T> = Result<T, RolloutError>;

/// Errors that abort a whole rollout.
#[derive(Debug, Error)]
pub enum RolloutError {
    /// The venue did not resolve; nothing was dispatched.
    #[error("venue no longer exists: {0}")]
    VenueNotFound(String),

    #[error("state store error: {0}")]
    State(#[from] provgrid_state::StateError),
}
