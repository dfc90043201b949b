//! Bounded-concurrency fan-out over a venue's devices.
//!
//! Admission is gated by a semaphore holding K permits: acquiring a permit
//! is the "wait for a free slot", and dropping it when the worker finishes
//! frees the slot. Completed tasks come back over an mpsc channel drained on
//! the dispatcher's own task, which is the only writer of the aggregate
//! report. The channel closing after the last worker is the join barrier.

use std::sync::Arc;

use tokio::sync::{Semaphore, mpsc};
use tracing::{debug, info};

use provgrid_config::ConfigCompute;
use provgrid_gateway::Gateway;
use provgrid_state::RecordStore;

use crate::report::AggregateReport;
use crate::task::DeviceTask;
use crate::worker;

/// Fan-out tuning.
#[derive(Debug, Clone)]
pub struct FanoutConfig {
    /// Maximum number of devices processed concurrently.
    pub max_workers: usize,
}

impl Default for FanoutConfig {
    fn default() -> Self {
        Self { max_workers: 16 }
    }
}

/// Runs the per-device workers for one rollout, bounded to `max_workers`
/// in flight at any instant.
pub struct Dispatcher {
    store: RecordStore,
    compute: Arc<dyn ConfigCompute>,
    gateway: Arc<dyn Gateway>,
    config: FanoutConfig,
}

impl Dispatcher {
    pub fn new(
        store: RecordStore,
        compute: Arc<dyn ConfigCompute>,
        gateway: Arc<dyn Gateway>,
        config: FanoutConfig,
    ) -> Self {
        Self {
            store,
            compute,
            gateway,
            config,
        }
    }

    /// Process every device id, in submission order, and return the tallied
    /// report once all workers have been harvested.
    pub async fn run(&self, venue_id: &str, device_ids: &[String]) -> AggregateReport {
        let mut report = AggregateReport::new();
        let permits = Arc::new(Semaphore::new(self.config.max_workers.max(1)));
        let (tx, mut rx) = mpsc::unbounded_channel::<DeviceTask>();

        for device_id in device_ids {
            // Fold in whatever finished while we were admitting.
            while let Ok(task) = rx.try_recv() {
                report.record(&task);
            }

            let permit = match Arc::clone(&permits).acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => break, // the semaphore is never closed
            };

            debug!(%device_id, "worker admitted");
            let task = DeviceTask::new(device_id.clone(), venue_id.to_string());
            let store = self.store.clone();
            let compute = Arc::clone(&self.compute);
            let gateway = Arc::clone(&self.gateway);
            let tx = tx.clone();
            tokio::spawn(async move {
                let done = worker::process_device(task, store, compute, gateway).await;
                // The receiver outlives every sender; a send only fails if
                // the dispatcher itself was dropped mid-run.
                let _ = tx.send(done);
                drop(permit);
            });
        }
        drop(tx);

        // Join barrier: every worker sends exactly once, and the channel
        // closes when the last sender drops.
        while let Some(task) = rx.recv().await {
            report.record(&task);
        }

        info!(
            %venue_id,
            devices = device_ids.len(),
            updated = report.updated.len(),
            failed = report.failed.len(),
            bad_config = report.bad_config.len(),
            not_found = report.not_found.len(),
            "fan-out drained"
        );
        report
    }
}
