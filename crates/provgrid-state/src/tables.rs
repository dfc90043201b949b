//! redb table definitions for the provgrid record store.
//!
//! Each table uses `&str` keys and `&[u8]` values (JSON-serialized domain
//! types). Records are keyed by their plain id; relationships are carried as
//! denormalized id lists inside the records themselves.

use redb::TableDefinition;

/// Venue records keyed by `{venue_id}`.
pub const VENUES: TableDefinition<&str, &[u8]> = TableDefinition::new("venues");

/// Device records keyed by `{device_id}`.
pub const DEVICES: TableDefinition<&str, &[u8]> = TableDefinition::new("devices");

/// Configuration templates keyed by `{template_id}`.
pub const TEMPLATES: TableDefinition<&str, &[u8]> = TableDefinition::new("templates");
