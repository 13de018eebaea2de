//! HTTP transport module
//!
//! Executes one unified request/response exchange over a real HTTP client.
//!
//! # Features
//!
//! - **Unified model**: protocol-neutral [`UnifiedRequest`] / [`UnifiedResponse`]
//! - **Blocking transport**: [`SyncTransport`] for callers without an async runtime
//! - **Non-blocking transport**: [`AsyncTransport`] with identical wire behaviour
//! - **Header translation**: structural headers mapped to dedicated client fields,
//!   `content-*` response headers attached to the body

mod client;
mod message;
mod nonblocking;
pub(crate) mod translate;

pub use client::SyncTransport;
pub use message::{Body, BodyContent, UnifiedRequest, UnifiedResponse};
pub use nonblocking::AsyncTransport;
pub use translate::{split_response_headers, WireRequest};
