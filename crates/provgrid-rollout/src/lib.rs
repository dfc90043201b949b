//! provgrid-rollout — venue-wide configuration rollout executor.
//!
//! Takes every device registered under a venue, computes and pushes its
//! configuration, never running more than a fixed number of pushes at once,
//! and reports a classified per-device outcome back to the requesting user.
//!
//! # Architecture
//!
//! ```text
//! RolloutJob
//!   ├── RecordStore (resolve venue → device id list)
//!   └── Dispatcher (K permits)
//!       ├── worker task per device
//!       │     resolve device → compute config → push config → Outcome
//!       └── result channel → AggregateReport
//! ```
//!
//! Admission is gated by a semaphore of K owned permits; each worker sends
//! its completed task over an mpsc channel that the dispatcher drains on its
//! own single task. The channel closing after the last worker is the join
//! barrier. Per-device failures never abort the run; they become outcomes.
//!
//! # Components
//!
//! - **`outcome`** — the closed per-device outcome classification
//! - **`task`** — per-device execution record and lifecycle
//! - **`worker`** — resolve/compute/push for one device
//! - **`report`** — per-outcome tallies and the human-readable summary
//! - **`dispatcher`** — the bounded fan-out itself
//! - **`job`** — rollout job lifecycle: venue resolution, run, notification

pub mod dispatcher;
pub mod error;
pub mod job;
pub mod outcome;
pub mod report;
pub mod task;
pub mod worker;

#[cfg(test)]
pub(crate) mod testutil;

pub use dispatcher::{Dispatcher, FanoutConfig};
pub use error::{RolloutError, RolloutResult};
pub use job::{JobContext, RolloutJob};
pub use outcome::Outcome;
pub use report::AggregateReport;
pub use task::{DeviceTask, TaskState};
