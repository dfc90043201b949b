//! Gateway client error types.

use thiserror::Error;

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors that can occur while pushing a configuration.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("connection to gateway failed: {0}")]
    Connect(String),

    #[error("gateway request failed: {0}")]
    Request(String),

    #[error("gateway push timed out")]
    Timeout,

    #[error("malformed gateway response: {0}")]
    MalformedResponse(String),
}
