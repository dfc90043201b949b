//! Rollout job lifecycle.
//!
//! A [`RolloutJob`] owns one venue-wide rollout from venue resolution to the
//! single completion notification. Completing the job is an explicit,
//! exactly-once transition: every exit path, including the venue vanishing
//! before dispatch, delivers one notification and marks the job complete.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use provgrid_config::ConfigCompute;
use provgrid_gateway::Gateway;
use provgrid_notify::{NotifySink, RolloutCompletion};
use provgrid_state::RecordStore;

use crate::dispatcher::{Dispatcher, FanoutConfig};
use crate::error::{RolloutError, RolloutResult};
use crate::report::AggregateReport;

/// Identity and completion state of one rollout job.
#[derive(Debug)]
pub struct JobContext {
    job_id: String,
    user: String,
    complete: bool,
}

impl JobContext {
    pub fn new(user: &str) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            user: user.to_string(),
            complete: false,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    /// Mark the job complete. The first call wins; later calls are no-ops.
    pub fn complete(&mut self) {
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }
}

/// One venue-wide configuration rollout.
pub struct RolloutJob {
    context: JobContext,
    store: RecordStore,
    compute: Arc<dyn ConfigCompute>,
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn NotifySink>,
    config: FanoutConfig,
}

impl RolloutJob {
    pub fn new(
        user: &str,
        store: RecordStore,
        compute: Arc<dyn ConfigCompute>,
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn NotifySink>,
    ) -> Self {
        Self {
            context: JobContext::new(user),
            store,
            compute,
            gateway,
            sink,
            config: FanoutConfig::default(),
        }
    }

    pub fn with_config(mut self, config: FanoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn job_id(&self) -> &str {
        self.context.job_id()
    }

    /// Run the rollout over every device registered under `venue_id`.
    ///
    /// A venue that no longer resolves still notifies the requesting user
    /// before the job errors out; per-device failures never surface here.
    pub async fn run(mut self, venue_id: &str) -> RolloutResult<AggregateReport> {
        let venue = match self.store.get_venue(venue_id)? {
            Some(venue) => venue,
            None => {
                warn!(job_id = %self.context.job_id(), venue_id, "venue vanished before rollout");
                let event = RolloutCompletion {
                    job_id: self.context.job_id().to_string(),
                    title: "Updating venue configurations".to_string(),
                    success: Vec::new(),
                    warning: Vec::new(),
                    error: Vec::new(),
                    details: format!("Venue {venue_id} no longer exists."),
                };
                self.sink.notify(self.context.user(), event).await;
                self.context.complete();
                return Err(RolloutError::VenueNotFound(venue_id.to_string()));
            }
        };

        info!(
            job_id = %self.context.job_id(),
            venue_id,
            venue = %venue.name,
            devices = venue.devices.len(),
            "starting rollout"
        );

        let dispatcher = Dispatcher::new(
            self.store.clone(),
            Arc::clone(&self.compute),
            Arc::clone(&self.gateway),
            self.config,
        );
        let report = dispatcher.run(venue_id, &venue.devices).await;

        // Unresolvable devices join the error list alongside bad
        // configurations; the details line still counts them separately.
        let mut error = report.bad_config.clone();
        error.extend(report.not_found.iter().cloned());

        let event = RolloutCompletion {
            job_id: self.context.job_id().to_string(),
            title: format!("Updating {} configurations", venue.name),
            success: report.updated.clone(),
            warning: report.failed.clone(),
            error,
            details: report.details(self.context.job_id()),
        };
        self.sink.notify(self.context.user(), event).await;
        self.context.complete();

        Ok(report)
    }
}
