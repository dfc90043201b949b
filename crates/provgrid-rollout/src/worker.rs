//! Per-device worker: resolve → compute → push → classify.
//!
//! Every failure is contained here and converted into an outcome. Nothing a
//! single device does can abort the dispatcher or leak its permit.

use std::sync::Arc;

use tracing::{debug, info, warn};

use provgrid_config::ConfigCompute;
use provgrid_gateway::{Gateway, PushResult};
use provgrid_state::RecordStore;

use crate::outcome::Outcome;
use crate::task::DeviceTask;

/// Process one device and return its completed task.
pub(crate) async fn process_device(
    mut task: DeviceTask,
    store: RecordStore,
    compute: Arc<dyn ConfigCompute>,
    gateway: Arc<dyn Gateway>,
) -> DeviceTask {
    task.start();

    let device = match store.get_device(&task.device_id) {
        Ok(Some(device)) => device,
        Ok(None) => {
            debug!(device_id = %task.device_id, "device no longer exists");
            task.finish(Outcome::NotFound);
            return task;
        }
        Err(e) => {
            warn!(device_id = %task.device_id, error = %e, "device lookup failed");
            task.finish(Outcome::BadConfig);
            return task;
        }
    };
    task.serial_number = Some(device.serial_number.clone());

    debug!(serial = %device.serial_number, "computing configuration");
    let document = match compute
        .compute(&device.serial_number, &device.device_type, &task.venue_id)
        .await
    {
        Ok(document) => document,
        Err(e) => {
            debug!(serial = %device.serial_number, error = %e, "configuration is bad");
            task.finish(Outcome::BadConfig);
            return task;
        }
    };

    debug!(serial = %device.serial_number, "pushing configuration");
    match gateway.push(&device.serial_number, &document).await {
        Ok(PushResult::Accepted) => {
            info!(serial = %device.serial_number, "updated");
            task.finish(Outcome::Updated);
        }
        Ok(PushResult::Rejected { lines }) => {
            info!(serial = %device.serial_number, rejected = lines.len(), "not updated");
            task.rejected = lines;
            task.finish(Outcome::Failed);
        }
        Err(e) => {
            debug!(serial = %device.serial_number, error = %e, "configuration push errored");
            task.finish(Outcome::BadConfig);
        }
    }
    task
}
