//! Pagination module
//!
//! Turns a server's cursor-based paged listing into a lazy, one-shot sequence
//! of pages.
//!
//! # Overview
//!
//! A [`Paginator`] is built from an initial request, a fetch function and a
//! [`CursorDescriptor`] that knows where the operation keeps its cursor. After
//! each page the engine checks the truncation flag and, while it is `true`,
//! copies the result's "next" cursor into the following request. Absent and
//! `false` both end the traversal after the page has been delivered.
//!
//! ```rust,ignore
//! use cloudstore_core::operations::{ListObjectsCursor, ListObjectsRequest};
//! use cloudstore_core::pagination::Paginator;
//!
//! let request = ListObjectsRequest::new("photos");
//! let paginator = Paginator::new(request, ListObjectsCursor, |req| client.list_objects(req))
//!     .with_page_size(500);
//! for page in paginator.pages()? {
//!     for object in page?.contents {
//!         println!("{}", object.key);
//!     }
//! }
//! ```

mod paginator;
mod types;

pub use paginator::{Pages, Paginator};
pub use types::{Blocking, CursorDescriptor, FetchPage, Suspending};
