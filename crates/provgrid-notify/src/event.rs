//! Completion event types.

use serde::{Deserialize, Serialize};

/// The notification emitted once when a rollout finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutCompletion {
    /// Id of the rollout job this event concludes.
    pub job_id: String,
    /// Human-readable title, e.g. `Updating HQ configurations`.
    pub title: String,
    /// Device ids whose configuration was accepted.
    pub success: Vec<String>,
    /// Device ids whose configuration was rejected by the device.
    pub warning: Vec<String>,
    /// Device ids that could not be configured (bad configuration,
    /// unexpected error, or the device vanished mid-rollout).
    pub error: Vec<String>,
    /// Human-readable summary text.
    pub details: String,
}
