//! provgrid-notify — rollout completion notifications.
//!
//! One structured notification per rollout, addressed to the requesting
//! user: aggregate counts plus the per-outcome device id lists. Delivery
//! failures are logged and swallowed; a rollout never fails because nobody
//! was listening.

pub mod event;
pub mod sink;

pub use event::RolloutCompletion;
pub use sink::{AddressedCompletion, BroadcastSink, LogSink, NotifySink};
