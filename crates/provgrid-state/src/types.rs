//! Domain types for the provgrid record store.
//!
//! These types represent the persisted provisioning inventory: venues,
//! devices, and the configuration templates a venue applies to its devices.
//! All types are serializable to/from JSON for storage in redb tables.

use serde::{Deserialize, Serialize};

/// Unique identifier for a venue.
pub type VenueId = String;

/// Unique identifier for a device.
pub type DeviceId = String;

/// Unique identifier for a configuration template.
pub type TemplateId = String;

// ── Venue ─────────────────────────────────────────────────────────

/// A named collection of devices subject to joint configuration rollouts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VenueRecord {
    pub id: VenueId,
    pub name: String,
    pub description: String,
    /// Device ids registered under this venue (denormalized; kept in sync
    /// with each device's `venue_id` by the store's membership helpers).
    pub devices: Vec<DeviceId>,
    /// Configuration template ids applied to this venue's devices.
    pub templates: Vec<TemplateId>,
    /// Unix timestamp (seconds) when this record was created.
    pub created_at: u64,
    /// Unix timestamp (seconds) when this record was last modified.
    pub modified_at: u64,
}

// ── Device ────────────────────────────────────────────────────────

/// Inventory record for a single managed device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviceRecord {
    pub id: DeviceId,
    /// Hardware serial number, the identity the gateway addresses.
    pub serial_number: String,
    /// Device model string (e.g. "edgecore_eap101"), selects which
    /// templates apply.
    pub device_type: String,
    /// The venue this device is registered under, if any.
    pub venue_id: Option<VenueId>,
    /// Unix timestamp (seconds) when this record was created.
    pub created_at: u64,
    /// Unix timestamp (seconds) when this record was last modified.
    pub modified_at: u64,
}

// ── Configuration template ────────────────────────────────────────

/// A weighted configuration fragment applied to matching devices.
///
/// Templates attached to a venue are merged in ascending `weight` order,
/// later (heavier) templates overriding earlier ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigTemplate {
    pub id: TemplateId,
    pub name: String,
    /// Merge precedence; higher weight wins on conflicting keys.
    pub weight: u32,
    /// Device types this template applies to. Empty means all types.
    pub device_types: Vec<String>,
    /// The configuration fragment itself (a JSON object).
    pub document: serde_json::Value,
    /// Unix timestamp (seconds) when this record was created.
    pub created_at: u64,
    /// Unix timestamp (seconds) when this record was last modified.
    pub modified_at: u64,
}

impl ConfigTemplate {
    /// Whether this template applies to the given device type.
    pub fn applies_to(&self, device_type: &str) -> bool {
        self.device_types.is_empty() || self.device_types.iter().any(|t| t == device_type)
    }
}
