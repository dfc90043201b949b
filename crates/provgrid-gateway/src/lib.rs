//! provgrid-gateway — configuration push to device gateway sessions.
//!
//! The gateway holds the live websocket session to each managed device; this
//! crate only speaks to the gateway's northbound HTTP API. A push either
//! comes back accepted, or rejected with the offending configuration lines.
//!
//! # Components
//!
//! - **`push`** — the `Gateway` trait and `PushResult`
//! - **`http`** — `HttpGateway`, a hand-rolled hyper 1 client
//! - **`response`** — rejected-line extraction from gateway response bodies

pub mod error;
pub mod http;
pub mod push;
pub mod response;

pub use error::{GatewayError, GatewayResult};
pub use http::HttpGateway;
pub use push::{Gateway, PushResult};
pub use response::rejected_lines;
