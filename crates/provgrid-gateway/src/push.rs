//! The configuration push capability.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::GatewayResult;

/// Verdict of the device gateway on one configuration push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushResult {
    /// The device accepted the configuration.
    Accepted,
    /// The device (or its gateway) rejected the configuration. Carries the
    /// offending configuration lines if the gateway reported them.
    Rejected { lines: Vec<String> },
}

impl PushResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PushResult::Accepted)
    }
}

/// Pushes configuration documents to device gateway sessions.
///
/// Transport-level failures surface as `Err`; an explicit rejection from the
/// gateway is a successful call returning `PushResult::Rejected`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn push(&self, serial_number: &str, document: &Value) -> GatewayResult<PushResult>;
}
