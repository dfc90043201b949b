//! provgrid-state — embedded record store for provgrid.
//!
//! Backed by [redb](https://docs.rs/redb), holds the provisioning inventory:
//! venues, devices, and configuration templates.
//!
//! # Architecture
//!
//! All domain types are JSON-serialized into redb's `&[u8]` value columns,
//! keyed by plain record ids. The venue record carries a denormalized list of
//! its device ids; `add_device_to_venue` / `remove_device_from_venue` keep
//! that list and the device's back-pointer consistent.
//!
//! The `RecordStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::RecordStore;
pub use types::*;
