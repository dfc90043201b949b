//! Configuration compute error types.

use thiserror::Error;

/// Result type alias for configuration compute.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while computing a device configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("venue not found: {0}")]
    VenueNotFound(String),

    #[error("no template applies to device type: {0}")]
    NoApplicableTemplate(String),

    #[error("template {0} is not a JSON object")]
    MalformedTemplate(String),

    #[error("state store error: {0}")]
    State(#[from] provgrid_state::StateError),
}
