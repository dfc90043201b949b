//! RecordStore — redb-backed persistence for the provisioning inventory.
//!
//! Provides typed CRUD operations over venues, devices, and configuration
//! templates. All values are JSON-serialized into redb's `&[u8]` value
//! columns. The store supports both on-disk and in-memory backends (the
//! latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Thread-safe record store backed by redb.
#[derive(Clone)]
pub struct RecordStore {
    db: Arc<Database>,
}

impl RecordStore {
    /// Open (or create) a persistent record store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "record store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory record store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory record store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(VENUES).map_err(map_err!(Table))?;
        txn.open_table(DEVICES).map_err(map_err!(Table))?;
        txn.open_table(TEMPLATES).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Venues ─────────────────────────────────────────────────────

    /// Insert or update a venue record.
    pub fn put_venue(&self, venue: &VenueRecord) -> StateResult<()> {
        let value = serde_json::to_vec(venue).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(VENUES).map_err(map_err!(Table))?;
            table
                .insert(venue.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(venue_id = %venue.id, "venue stored");
        Ok(())
    }

    /// Get a venue by id.
    pub fn get_venue(&self, venue_id: &str) -> StateResult<Option<VenueRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(VENUES).map_err(map_err!(Table))?;
        match table.get(venue_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let venue: VenueRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(venue))
            }
            None => Ok(None),
        }
    }

    /// List all venues.
    pub fn list_venues(&self) -> StateResult<Vec<VenueRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(VENUES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let venue: VenueRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(venue);
        }
        Ok(results)
    }

    /// Delete a venue by id. Returns true if it existed.
    ///
    /// Devices registered under the venue keep their records but lose the
    /// back-pointer.
    pub fn delete_venue(&self, venue_id: &str) -> StateResult<bool> {
        let orphans: Vec<DeviceId> = match self.get_venue(venue_id)? {
            Some(venue) => venue.devices,
            None => return Ok(false),
        };

        for device_id in &orphans {
            if let Some(mut device) = self.get_device(device_id)? {
                device.venue_id = None;
                self.put_device(&device)?;
            }
        }

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(VENUES).map_err(map_err!(Table))?;
            existed = table.remove(venue_id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(%venue_id, existed, "venue deleted");
        Ok(existed)
    }

    // ── Devices ────────────────────────────────────────────────────

    /// Insert or update a device record.
    pub fn put_device(&self, device: &DeviceRecord) -> StateResult<()> {
        let value = serde_json::to_vec(device).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
            table
                .insert(device.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Get a device by id.
    pub fn get_device(&self, device_id: &str) -> StateResult<Option<DeviceRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
        match table.get(device_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let device: DeviceRecord =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(device))
            }
            None => Ok(None),
        }
    }

    /// List all devices.
    pub fn list_devices(&self) -> StateResult<Vec<DeviceRecord>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let device: DeviceRecord =
                serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
            results.push(device);
        }
        Ok(results)
    }

    /// Delete a device by id. Returns true if it existed.
    ///
    /// If the device is registered under a venue, it is removed from that
    /// venue's device list first.
    pub fn delete_device(&self, device_id: &str) -> StateResult<bool> {
        if let Some(device) = self.get_device(device_id)? {
            if let Some(venue_id) = &device.venue_id {
                if let Some(mut venue) = self.get_venue(venue_id)? {
                    venue.devices.retain(|d| d != device_id);
                    self.put_venue(&venue)?;
                }
            }
        }

        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
            existed = table.remove(device_id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }

    // ── Membership ─────────────────────────────────────────────────

    /// Register a device under a venue.
    ///
    /// Updates the venue's denormalized device list and the device's
    /// back-pointer in one pass. Moving a device between venues removes it
    /// from its previous venue's list.
    pub fn add_device_to_venue(&self, device_id: &str, venue_id: &str) -> StateResult<()> {
        let mut device = self
            .get_device(device_id)?
            .ok_or_else(|| StateError::NotFound(format!("device {device_id}")))?;
        let mut venue = self
            .get_venue(venue_id)?
            .ok_or_else(|| StateError::NotFound(format!("venue {venue_id}")))?;

        if let Some(previous) = device.venue_id.as_deref() {
            if previous != venue_id {
                if let Some(mut old_venue) = self.get_venue(previous)? {
                    old_venue.devices.retain(|d| d != device_id);
                    self.put_venue(&old_venue)?;
                }
            }
        }

        if !venue.devices.iter().any(|d| d == device_id) {
            venue.devices.push(device_id.to_string());
        }
        device.venue_id = Some(venue_id.to_string());

        self.put_venue(&venue)?;
        self.put_device(&device)?;
        debug!(%device_id, %venue_id, "device registered under venue");
        Ok(())
    }

    /// Remove a device from its venue. Both sides are updated.
    pub fn remove_device_from_venue(&self, device_id: &str) -> StateResult<()> {
        let mut device = self
            .get_device(device_id)?
            .ok_or_else(|| StateError::NotFound(format!("device {device_id}")))?;

        if let Some(venue_id) = device.venue_id.take() {
            if let Some(mut venue) = self.get_venue(&venue_id)? {
                venue.devices.retain(|d| d != device_id);
                self.put_venue(&venue)?;
            }
            self.put_device(&device)?;
            debug!(%device_id, %venue_id, "device removed from venue");
        }
        Ok(())
    }

    // ── Configuration templates ────────────────────────────────────

    /// Insert or update a configuration template.
    pub fn put_template(&self, template: &ConfigTemplate) -> StateResult<()> {
        let value = serde_json::to_vec(template).map_err(map_err!(Serialize))?;
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(TEMPLATES).map_err(map_err!(Table))?;
            table
                .insert(template.id.as_str(), value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Get a template by id.
    pub fn get_template(&self, template_id: &str) -> StateResult<Option<ConfigTemplate>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(TEMPLATES).map_err(map_err!(Table))?;
        match table.get(template_id).map_err(map_err!(Read))? {
            Some(guard) => {
                let template: ConfigTemplate =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(template))
            }
            None => Ok(None),
        }
    }

    /// List the templates attached to a venue, in the venue's order.
    ///
    /// Dangling template ids are skipped.
    pub fn list_templates_for_venue(&self, venue: &VenueRecord) -> StateResult<Vec<ConfigTemplate>> {
        let mut results = Vec::new();
        for template_id in &venue.templates {
            if let Some(template) = self.get_template(template_id)? {
                results.push(template);
            }
        }
        Ok(results)
    }

    /// Delete a template by id. Returns true if it existed.
    pub fn delete_template(&self, template_id: &str) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(TEMPLATES).map_err(map_err!(Table))?;
            existed = table.remove(template_id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_venue(id: &str) -> VenueRecord {
        VenueRecord {
            id: id.to_string(),
            name: format!("venue {id}"),
            description: String::new(),
            devices: Vec::new(),
            templates: Vec::new(),
            created_at: 1000,
            modified_at: 1000,
        }
    }

    fn test_device(id: &str) -> DeviceRecord {
        DeviceRecord {
            id: id.to_string(),
            serial_number: format!("aa000000{id}"),
            device_type: "edgecore_eap101".to_string(),
            venue_id: None,
            created_at: 1000,
            modified_at: 1000,
        }
    }

    fn test_template(id: &str, weight: u32) -> ConfigTemplate {
        ConfigTemplate {
            id: id.to_string(),
            name: format!("template {id}"),
            weight,
            device_types: Vec::new(),
            document: serde_json::json!({ "radios": [] }),
            created_at: 1000,
            modified_at: 1000,
        }
    }

    // ── Venue CRUD ─────────────────────────────────────────────────

    #[test]
    fn venue_put_and_get() {
        let store = RecordStore::open_in_memory().unwrap();
        let venue = test_venue("venue-1");

        store.put_venue(&venue).unwrap();
        let retrieved = store.get_venue("venue-1").unwrap();

        assert_eq!(retrieved, Some(venue));
    }

    #[test]
    fn venue_get_nonexistent_returns_none() {
        let store = RecordStore::open_in_memory().unwrap();
        assert!(store.get_venue("nope").unwrap().is_none());
    }

    #[test]
    fn venue_list_all() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("a")).unwrap();
        store.put_venue(&test_venue("b")).unwrap();

        assert_eq!(store.list_venues().unwrap().len(), 2);
    }

    #[test]
    fn venue_update_in_place() {
        let store = RecordStore::open_in_memory().unwrap();
        let mut venue = test_venue("venue-1");
        store.put_venue(&venue).unwrap();

        venue.name = "renamed".to_string();
        venue.modified_at = 2000;
        store.put_venue(&venue).unwrap();

        let retrieved = store.get_venue("venue-1").unwrap().unwrap();
        assert_eq!(retrieved.name, "renamed");
        assert_eq!(retrieved.modified_at, 2000);
    }

    #[test]
    fn venue_delete_clears_device_back_pointers() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();
        store.add_device_to_venue("dev-1", "venue-1").unwrap();

        assert!(store.delete_venue("venue-1").unwrap());
        assert!(!store.delete_venue("venue-1").unwrap());

        let device = store.get_device("dev-1").unwrap().unwrap();
        assert_eq!(device.venue_id, None);
    }

    // ── Device CRUD ────────────────────────────────────────────────

    #[test]
    fn device_put_and_get() {
        let store = RecordStore::open_in_memory().unwrap();
        let device = test_device("dev-1");

        store.put_device(&device).unwrap();
        assert_eq!(store.get_device("dev-1").unwrap(), Some(device));
    }

    #[test]
    fn device_delete_updates_venue_list() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();
        store.add_device_to_venue("dev-1", "venue-1").unwrap();

        assert!(store.delete_device("dev-1").unwrap());

        let venue = store.get_venue("venue-1").unwrap().unwrap();
        assert!(venue.devices.is_empty());
    }

    // ── Membership sync ────────────────────────────────────────────

    #[test]
    fn add_device_updates_both_sides() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();

        store.add_device_to_venue("dev-1", "venue-1").unwrap();

        let venue = store.get_venue("venue-1").unwrap().unwrap();
        assert_eq!(venue.devices, vec!["dev-1".to_string()]);
        let device = store.get_device("dev-1").unwrap().unwrap();
        assert_eq!(device.venue_id.as_deref(), Some("venue-1"));
    }

    #[test]
    fn add_device_is_idempotent() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();

        store.add_device_to_venue("dev-1", "venue-1").unwrap();
        store.add_device_to_venue("dev-1", "venue-1").unwrap();

        let venue = store.get_venue("venue-1").unwrap().unwrap();
        assert_eq!(venue.devices.len(), 1);
    }

    #[test]
    fn moving_device_between_venues_removes_old_entry() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_venue(&test_venue("venue-2")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();

        store.add_device_to_venue("dev-1", "venue-1").unwrap();
        store.add_device_to_venue("dev-1", "venue-2").unwrap();

        let old = store.get_venue("venue-1").unwrap().unwrap();
        assert!(old.devices.is_empty());
        let new = store.get_venue("venue-2").unwrap().unwrap();
        assert_eq!(new.devices, vec!["dev-1".to_string()]);
    }

    #[test]
    fn add_device_to_missing_venue_fails() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_device(&test_device("dev-1")).unwrap();

        let result = store.add_device_to_venue("dev-1", "nope");
        assert!(matches!(result, Err(StateError::NotFound(_))));
    }

    #[test]
    fn remove_device_from_venue_clears_both_sides() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_venue(&test_venue("venue-1")).unwrap();
        store.put_device(&test_device("dev-1")).unwrap();
        store.add_device_to_venue("dev-1", "venue-1").unwrap();

        store.remove_device_from_venue("dev-1").unwrap();

        let venue = store.get_venue("venue-1").unwrap().unwrap();
        assert!(venue.devices.is_empty());
        let device = store.get_device("dev-1").unwrap().unwrap();
        assert_eq!(device.venue_id, None);
    }

    // ── Template CRUD ──────────────────────────────────────────────

    #[test]
    fn template_put_and_get() {
        let store = RecordStore::open_in_memory().unwrap();
        let template = test_template("tmpl-1", 10);

        store.put_template(&template).unwrap();
        assert_eq!(store.get_template("tmpl-1").unwrap(), Some(template));
    }

    #[test]
    fn templates_for_venue_skips_dangling_ids() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_template(&test_template("tmpl-1", 10)).unwrap();

        let mut venue = test_venue("venue-1");
        venue.templates = vec!["tmpl-1".to_string(), "gone".to_string()];
        store.put_venue(&venue).unwrap();

        let templates = store.list_templates_for_venue(&venue).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].id, "tmpl-1");
    }

    #[test]
    fn template_delete() {
        let store = RecordStore::open_in_memory().unwrap();
        store.put_template(&test_template("tmpl-1", 10)).unwrap();

        assert!(store.delete_template("tmpl-1").unwrap());
        assert!(!store.delete_template("tmpl-1").unwrap());
    }

    // ── Persistence (on-disk) ──────────────────────────────────────

    #[test]
    fn persistence_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.redb");

        {
            let store = RecordStore::open(&db_path).unwrap();
            store.put_venue(&test_venue("venue-1")).unwrap();
        }

        // Reopen the same database file.
        let store = RecordStore::open(&db_path).unwrap();
        let venue = store.get_venue("venue-1").unwrap();
        assert!(venue.is_some());
    }

    // ── Edge cases ─────────────────────────────────────────────────

    #[test]
    fn empty_store_operations() {
        let store = RecordStore::open_in_memory().unwrap();

        assert!(store.list_venues().unwrap().is_empty());
        assert!(store.list_devices().unwrap().is_empty());
        assert!(!store.delete_venue("nope").unwrap());
        assert!(!store.delete_device("nope").unwrap());
        assert!(!store.delete_template("nope").unwrap());
    }
}
