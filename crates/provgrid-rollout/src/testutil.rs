//! Shared test doubles for the rollout crate's module tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use provgrid_config::{ConfigCompute, ConfigError, ConfigResult};
use provgrid_gateway::{Gateway, GatewayError, GatewayResult, PushResult};
use provgrid_notify::{NotifySink, RolloutCompletion};
use provgrid_state::{DeviceRecord, RecordStore, VenueRecord};

/// Seed one device record.
pub(crate) fn seed_device(store: &RecordStore, id: &str, serial: &str) {
    store
        .put_device(&DeviceRecord {
            id: id.to_string(),
            serial_number: serial.to_string(),
            device_type: "edgecore_eap101".to_string(),
            venue_id: Some("venue-1".to_string()),
            created_at: 1000,
            modified_at: 1000,
        })
        .unwrap();
}

/// Seed `count` devices `dev-0..` with serials `serial-0..`, returning the ids.
pub(crate) fn seed_devices(store: &RecordStore, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let id = format!("dev-{i}");
            seed_device(store, &id, &format!("serial-{i}"));
            id
        })
        .collect()
}

/// Seed a venue holding the given device ids.
pub(crate) fn seed_venue(store: &RecordStore, venue_id: &str, devices: Vec<String>) {
    store
        .put_venue(&VenueRecord {
            id: venue_id.to_string(),
            name: "HQ".to_string(),
            description: String::new(),
            devices,
            templates: Vec::new(),
            created_at: 1000,
            modified_at: 1000,
        })
        .unwrap();
}

/// Compute double: fixed document, optionally failing for chosen serials.
#[derive(Default)]
pub(crate) struct StaticCompute {
    fail_serials: HashSet<String>,
}

impl StaticCompute {
    pub(crate) fn failing<const N: usize>(mut self, serials: [&str; N]) -> Self {
        self.fail_serials
            .extend(serials.iter().map(|s| s.to_string()));
        self
    }
}

#[async_trait]
impl ConfigCompute for StaticCompute {
    async fn compute(
        &self,
        serial_number: &str,
        device_type: &str,
        _venue_id: &str,
    ) -> ConfigResult<Value> {
        if self.fail_serials.contains(serial_number) {
            return Err(ConfigError::NoApplicableTemplate(device_type.to_string()));
        }
        Ok(serde_json::json!({ "uuid": 1, "serial": serial_number }))
    }
}

/// Gateway double: scripted accept/reject/error per serial, optional delay,
/// push-order recording, and an in-flight concurrency gauge.
#[derive(Default)]
pub(crate) struct ScriptedGateway {
    reject_serials: HashSet<String>,
    error_serials: HashSet<String>,
    delay: Option<Duration>,
    pushed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ScriptedGateway {
    pub(crate) fn rejecting<const N: usize>(mut self, serials: [&str; N]) -> Self {
        self.reject_serials
            .extend(serials.iter().map(|s| s.to_string()));
        self
    }

    pub(crate) fn erroring<const N: usize>(mut self, serials: [&str; N]) -> Self {
        self.error_serials
            .extend(serials.iter().map(|s| s.to_string()));
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Serial numbers in the order their pushes arrived.
    pub(crate) fn pushed(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }

    /// Highest number of pushes ever in flight at once.
    pub(crate) fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn push(&self, serial_number: &str, _document: &Value) -> GatewayResult<PushResult> {
        self.pushed.lock().unwrap().push(serial_number.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.error_serials.contains(serial_number) {
            return Err(GatewayError::Connect("scripted".to_string()));
        }
        if self.reject_serials.contains(serial_number) {
            return Ok(PushResult::Rejected {
                lines: vec!["radios.0.channel".to_string()],
            });
        }
        Ok(PushResult::Accepted)
    }
}

/// Notification double that records every delivered event.
#[derive(Default)]
pub(crate) struct CollectingSink {
    events: Mutex<Vec<(String, RolloutCompletion)>>,
}

impl CollectingSink {
    pub(crate) fn events(&self) -> Vec<(String, RolloutCompletion)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotifySink for CollectingSink {
    async fn notify(&self, user: &str, event: RolloutCompletion) {
        self.events
            .lock()
            .unwrap()
            .push((user.to_string(), event));
    }
}
