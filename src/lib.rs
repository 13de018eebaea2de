// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::needless_pass_by_value)]

//! # cloudstore-core
//!
//! The mechanical core of a cloud object-storage client: a generic cursor
//! pagination engine and an HTTP transport that runs on a strictly blocking
//! client while staying wire-identical to its non-blocking twin.
//!
//! ## Features
//!
//! - **Cursor Pagination**: one generic engine for every marker-based listing
//! - **Dual Consumption**: the same paginator serves `Iterator` and `Stream` callers, once
//! - **Blocking Transport**: unified request/response over `reqwest::blocking`
//! - **Non-blocking Transport**: identical headers and body semantics over async `reqwest`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cloudstore_core::http::{SyncTransport, UnifiedRequest};
//! use cloudstore_core::operations::{ListObjectsCursor, ListObjectsRequest};
//! use cloudstore_core::pagination::Paginator;
//! use cloudstore_core::{Method, TransportOptions};
//!
//! let transport = SyncTransport::new(TransportOptions::default())?;
//! let paginator = Paginator::new(
//!     ListObjectsRequest::new("photos"),
//!     ListObjectsCursor,
//!     |request| {
//!         let response = transport.send(sign(encode(&request)))?;
//!         decode_list_objects(response)
//!     },
//! )
//! .with_page_size(1000);
//!
//! for page in paginator.pages()? {
//!     for object in page?.contents {
//!         println!("{} {}", object.key, object.size);
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  caller: initial request + fetch fn (sign, encode, decode)    │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │  Paginator<CursorDescriptor, Fetch>   pages() | stream()      │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ one fetch per page
//! ┌───────────────┬──────────────┴──────────────┬────────────────┐
//! │ SyncTransport │  WireRequest translation    │ AsyncTransport │
//! │ (blocking)    │  content-* body headers     │ (non-blocking) │
//! └───────────────┴─────────────────────────────┴────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types: methods, header multimap, completion mode
pub mod types;

/// Transport configuration
pub mod config;

/// Unified request/response model and transports
pub mod http;

/// Cursor pagination engine
pub mod pagination;

/// Paged listing operations and their cursor descriptors
pub mod operations;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::TransportOptions;
pub use error::{Error, Result};
pub use types::*;

pub use http::{AsyncTransport, SyncTransport, UnifiedRequest, UnifiedResponse};
pub use pagination::{CursorDescriptor, Paginator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
