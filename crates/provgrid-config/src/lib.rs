//! provgrid-config — configuration compute for managed devices.
//!
//! Builds the configuration document pushed to a device by merging the
//! weighted templates attached to its venue. Templates are filtered by device
//! type and merged in ascending weight order, heavier templates overriding
//! lighter ones key-by-key.
//!
//! # Components
//!
//! - **`merge`** — deep JSON object merge
//! - **`compute`** — the `ConfigCompute` trait and the store-backed
//!   `TemplateCompute` implementation

pub mod compute;
pub mod error;
pub mod merge;

pub use compute::{ConfigCompute, TemplateCompute};
pub use error::{ConfigError, ConfigResult};
pub use merge::merge_documents;
