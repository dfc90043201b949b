//! The configuration compute capability.
//!
//! `ConfigCompute` is the seam the rollout worker calls; `TemplateCompute`
//! is the production implementation, reading the venue's templates from the
//! record store and merging the applicable ones.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use provgrid_state::RecordStore;

use crate::error::{ConfigError, ConfigResult};
use crate::merge::merge_documents;

/// Computes the configuration document for one device.
#[async_trait]
pub trait ConfigCompute: Send + Sync {
    /// Build the configuration for a device identified by serial number and
    /// device type, in the context of the given venue.
    async fn compute(
        &self,
        serial_number: &str,
        device_type: &str,
        venue_id: &str,
    ) -> ConfigResult<Value>;
}

/// Store-backed compute: merges the venue's weighted templates.
#[derive(Clone)]
pub struct TemplateCompute {
    store: RecordStore,
}

impl TemplateCompute {
    pub fn new(store: RecordStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ConfigCompute for TemplateCompute {
    async fn compute(
        &self,
        serial_number: &str,
        device_type: &str,
        venue_id: &str,
    ) -> ConfigResult<Value> {
        let venue = self
            .store
            .get_venue(venue_id)?
            .ok_or_else(|| ConfigError::VenueNotFound(venue_id.to_string()))?;

        let mut templates: Vec<_> = self
            .store
            .list_templates_for_venue(&venue)?
            .into_iter()
            .filter(|t| t.applies_to(device_type))
            .collect();

        if templates.is_empty() {
            return Err(ConfigError::NoApplicableTemplate(device_type.to_string()));
        }

        for template in &templates {
            if !template.document.is_object() {
                return Err(ConfigError::MalformedTemplate(template.id.clone()));
            }
        }

        // Ascending weight; heavier templates override lighter ones.
        templates.sort_by_key(|t| t.weight);
        let document = merge_documents(templates.iter().map(|t| &t.document));

        debug!(
            %serial_number,
            %device_type,
            templates = templates.len(),
            "configuration computed"
        );
        Ok(document)
    }
}
