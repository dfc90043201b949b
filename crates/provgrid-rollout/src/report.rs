//! Aggregate rollout report.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::outcome::Outcome;
use crate::task::DeviceTask;

/// Per-outcome tallies for one completed rollout.
///
/// Ids are appended in harvest order, which is nondeterministic across runs;
/// counts are the list lengths, so the two can never disagree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateReport {
    /// Devices that accepted their configuration.
    pub updated: Vec<String>,
    /// Devices that explicitly rejected their configuration.
    pub failed: Vec<String>,
    /// Devices whose configuration could not be computed or errored.
    pub bad_config: Vec<String>,
    /// Device ids that no longer resolved.
    pub not_found: Vec<String>,
}

impl AggregateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one harvested task into the report.
    ///
    /// Called only from the dispatcher's single task, once per device. A
    /// task without an outcome would violate the dispatcher's contract; it
    /// is tallied as `BadConfig` and logged rather than dropped, so the
    /// total still matches the number of submitted devices.
    pub fn record(&mut self, task: &DeviceTask) {
        let outcome = match task.outcome() {
            Some(outcome) => outcome,
            None => {
                warn!(device_id = %task.device_id, "task harvested without outcome");
                Outcome::BadConfig
            }
        };
        let bucket = match outcome {
            Outcome::Updated => &mut self.updated,
            Outcome::Failed => &mut self.failed,
            Outcome::BadConfig => &mut self.bad_config,
            Outcome::NotFound => &mut self.not_found,
        };
        bucket.push(task.device_id.clone());
    }

    /// Total number of devices tallied across all buckets.
    pub fn total(&self) -> usize {
        self.updated.len() + self.failed.len() + self.bad_config.len() + self.not_found.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Human-readable completion summary. Pure over the report contents:
    /// the same report always yields the same text.
    pub fn details(&self, job_id: &str) -> String {
        format!(
            "Rollout {} completed: {} updated, {} failed to update, {} bad configurations, {} missing devices.",
            job_id,
            self.updated.len(),
            self.failed.len(),
            self.bad_config.len(),
            self.not_found.len()
        )
    }
}
