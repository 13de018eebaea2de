//! Generic cursor pagination engine
//!
//! A [`Paginator`] walks any cursor-based listing operation one page at a
//! time. It can be consumed exactly once, either as a blocking [`Iterator`]
//! ([`Paginator::pages`]) or as a [`Stream`] ([`Paginator::stream`]).

use super::types::{Blocking, CursorDescriptor, FetchPage, Suspending};
use crate::error::{Error, Result};
use async_stream::try_stream;
use futures::{Future, Stream};
use parking_lot::Mutex;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// One-shot lazy sequence of pages for a listing operation.
///
/// Exactly one fetch is outstanding at a time and nothing is fetched ahead of
/// the consumer. The first call to [`pages`](Self::pages) or
/// [`stream`](Self::stream) claims the paginator; every later call on either
/// entry point fails with [`Error::IllegalReuse`] without fetching.
pub struct Paginator<D: CursorDescriptor, F> {
    claimed: AtomicBool,
    traversal: Mutex<Option<Traversal<D, F>>>,
}

struct Traversal<D: CursorDescriptor, F> {
    descriptor: D,
    request: D::Request,
    fetch: F,
    cursor: Option<D::Cursor>,
    page: usize,
}

impl<D, F> Traversal<D, F>
where
    D: CursorDescriptor,
    D::Request: Clone,
{
    /// Write the pending cursor into the request and hand out a copy for fetch
    fn next_request(&mut self) -> D::Request {
        if let Some(cursor) = self.cursor.take() {
            self.descriptor.set_cursor(&mut self.request, cursor);
        }
        self.request.clone()
    }

    /// Record a fetched page; true when another page should be requested
    fn advance(&mut self, result: &D::Result) -> bool {
        self.page += 1;
        match self.descriptor.is_truncated(result) {
            Some(true) => {
                self.cursor = Some(self.descriptor.next_cursor(result));
                trace!("{} page {} truncated, continuing", self.descriptor.name(), self.page);
                true
            }
            truncated => {
                debug!(
                    "{} finished after {} page(s) (truncated = {:?})",
                    self.descriptor.name(),
                    self.page,
                    truncated
                );
                false
            }
        }
    }
}

impl<D, F, E> Paginator<D, Blocking<F>>
where
    D: CursorDescriptor,
    F: FnMut(D::Request) -> std::result::Result<D::Result, E>,
{
    /// Create a paginator over a blocking fetch function
    pub fn new(request: D::Request, descriptor: D, fetch: F) -> Self {
        Self::with_fetcher(request, descriptor, Blocking(fetch))
    }
}

impl<D, F, Fut, E> Paginator<D, Suspending<F>>
where
    D: CursorDescriptor,
    F: FnMut(D::Request) -> Fut,
    Fut: Future<Output = std::result::Result<D::Result, E>>,
{
    /// Create a paginator over an async fetch function
    pub fn new_async(request: D::Request, descriptor: D, fetch: F) -> Self {
        Self::with_fetcher(request, descriptor, Suspending(fetch))
    }
}

impl<D: CursorDescriptor, F> Paginator<D, F> {
    /// Create a paginator from any [`FetchPage`] implementation
    pub fn with_fetcher(request: D::Request, descriptor: D, fetch: F) -> Self {
        let cursor = descriptor.cursor(&request);
        Self {
            claimed: AtomicBool::new(false),
            traversal: Mutex::new(Some(Traversal {
                descriptor,
                request,
                fetch,
                cursor: Some(cursor),
                page: 0,
            })),
        }
    }

    /// Limit every page to `limit` items.
    ///
    /// Written into the initial request once; the engine never touches the
    /// field again, so it carries over unchanged to later requests.
    #[must_use]
    pub fn with_page_size(mut self, limit: u32) -> Self {
        if let Some(traversal) = self.traversal.get_mut() {
            traversal
                .descriptor
                .set_page_size(&mut traversal.request, limit);
        }
        self
    }

    /// True once either entry point has been called
    pub fn is_claimed(&self) -> bool {
        self.claimed.load(Ordering::Acquire)
    }

    fn claim(&self) -> Result<Traversal<D, F>> {
        if self
            .claimed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::IllegalReuse);
        }
        self.traversal.lock().take().ok_or(Error::IllegalReuse)
    }
}

impl<D, F> Paginator<D, F>
where
    D: CursorDescriptor,
    D::Request: Clone,
    F: FetchPage<D::Request, D::Result>,
{
    /// Claim the paginator for blocking iteration.
    ///
    /// Each call to `next` blocks for one fetch. A fetch error is yielded once
    /// and ends the iteration.
    pub fn pages(&self) -> Result<Pages<D, F>> {
        let traversal = self.claim()?;
        Ok(Pages {
            traversal: Some(traversal),
        })
    }

    /// Claim the paginator for async consumption.
    ///
    /// The stream suspends only while a fetch is outstanding. Dropping it
    /// abandons the current fetch; pages already yielded stay delivered.
    pub fn stream(
        &self,
    ) -> Result<impl Stream<Item = std::result::Result<D::Result, F::Error>>> {
        let mut traversal = self.claim()?;
        Ok(try_stream! {
            loop {
                let request = traversal.next_request();
                let result = traversal.fetch.fetch(request).await?;
                let more = traversal.advance(&result);
                yield result;
                if !more {
                    break;
                }
            }
        })
    }
}

impl<D: CursorDescriptor, F> std::fmt::Debug for Paginator<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Paginator")
            .field("claimed", &self.is_claimed())
            .finish_non_exhaustive()
    }
}

/// Blocking iterator returned by [`Paginator::pages`]
pub struct Pages<D: CursorDescriptor, F> {
    traversal: Option<Traversal<D, F>>,
}

impl<D, F> Iterator for Pages<D, F>
where
    D: CursorDescriptor,
    D::Request: Clone,
    F: FetchPage<D::Request, D::Result>,
{
    type Item = std::result::Result<D::Result, F::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let traversal = self.traversal.as_mut()?;
        let request = traversal.next_request();

        match traversal.fetch.fetch_blocking(request) {
            Ok(result) => {
                if !traversal.advance(&result) {
                    self.traversal = None;
                }
                Some(Ok(result))
            }
            Err(e) => {
                self.traversal = None;
                Some(Err(e))
            }
        }
    }
}

impl<D, F> FusedIterator for Pages<D, F>
where
    D: CursorDescriptor,
    D::Request: Clone,
    F: FetchPage<D::Request, D::Result>,
{
}
