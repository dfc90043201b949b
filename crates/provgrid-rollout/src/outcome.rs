//! Per-device outcome classification.

use serde::{Deserialize, Serialize};

/// Final classification of one processed device.
///
/// Set exactly once by the worker, immutable afterwards. Exactly one of
/// these is recorded per submitted device id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The device accepted the pushed configuration.
    Updated,
    /// The device (or its gateway) explicitly rejected the configuration.
    Failed,
    /// The configuration could not be computed, or an unexpected error
    /// occurred while processing the device.
    BadConfig,
    /// The device record vanished between listing and processing.
    NotFound,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Updated => "updated",
            Outcome::Failed => "failed",
            Outcome::BadConfig => "bad_config",
            Outcome::NotFound => "not_found",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
