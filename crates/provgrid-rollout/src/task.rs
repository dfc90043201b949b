//! Per-device execution record.
//!
//! A `DeviceTask` is an owned value: the dispatcher creates it, moves it
//! into the worker future, and receives it back completed over the result
//! channel. No task is shared between threads while mutable.

use crate::outcome::Outcome;

/// Lifecycle of a device task. Transitions only forward:
/// `NotStarted → Started → Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    NotStarted,
    Started,
    Done,
}

/// Execution record for one device in a rollout.
#[derive(Debug, Clone)]
pub struct DeviceTask {
    /// The device id this task processes.
    pub device_id: String,
    /// The venue context the device belongs to.
    pub venue_id: String,
    state: TaskState,
    outcome: Option<Outcome>,
    /// Serial number, filled in once the device record resolves.
    pub serial_number: Option<String>,
    /// Configuration lines the gateway rejected, if any.
    pub rejected: Vec<String>,
}

impl DeviceTask {
    pub fn new(device_id: impl Into<String>, venue_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            venue_id: venue_id.into(),
            state: TaskState::NotStarted,
            outcome: None,
            serial_number: None,
            rejected: Vec::new(),
        }
    }

    /// Mark the task as started. No-op if already past `NotStarted`.
    pub fn start(&mut self) {
        if self.state == TaskState::NotStarted {
            self.state = TaskState::Started;
        }
    }

    /// Finish the task with its outcome. The first call wins; the outcome
    /// is immutable afterwards.
    pub fn finish(&mut self, outcome: Outcome) {
        if self.state != TaskState::Done {
            self.state = TaskState::Done;
            self.outcome = Some(outcome);
        }
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == TaskState::Done
    }

    /// The outcome, present once the task is done.
    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}
