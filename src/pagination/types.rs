//! Pagination types and traits
//!
//! Defines the core pagination abstractions: how a listing operation exposes
//! its cursor ([`CursorDescriptor`]) and how a page is fetched ([`FetchPage`]).

use futures::future::{self, Future, Ready};

/// Field accessors for one cursor-based listing operation.
///
/// A descriptor is stateless: it only reads and writes fields on the
/// operation's request and result records. The engine never looks inside a
/// cursor, it copies the value from one page's "next" fields into the
/// following request.
pub trait CursorDescriptor {
    /// Page request record
    type Request;
    /// Page result record
    type Result;
    /// Opaque cursor value, possibly several fields (e.g. key + version id)
    type Cursor;

    /// Operation name used in log output
    fn name(&self) -> &'static str;

    /// Read the cursor fields currently set on `request`
    fn cursor(&self, request: &Self::Request) -> Self::Cursor;

    /// Write cursor fields into `request`
    fn set_cursor(&self, request: &mut Self::Request, cursor: Self::Cursor);

    /// Read the "next" cursor fields mirrored on a result
    fn next_cursor(&self, result: &Self::Result) -> Self::Cursor;

    /// Tri-state truncation flag; `None` means the server did not say
    fn is_truncated(&self, result: &Self::Result) -> Option<bool>;

    /// Write the page-size limit into `request`
    fn set_page_size(&self, request: &mut Self::Request, limit: u32);
}

/// Something that turns a page request into a page result.
///
/// Implemented by [`Blocking`] and [`Suspending`]; build paginators with
/// [`Paginator::new`](super::Paginator::new) or
/// [`Paginator::new_async`](super::Paginator::new_async) instead of using this
/// directly.
pub trait FetchPage<Req, Res> {
    /// Error returned by a failed fetch; propagated to the consumer verbatim
    type Error;
    /// Future returned by [`FetchPage::fetch`]
    type Future: Future<Output = Result<Res, Self::Error>>;

    /// Fetch one page without blocking the caller's executor
    fn fetch(&mut self, request: Req) -> Self::Future;

    /// Fetch one page on the calling thread
    fn fetch_blocking(&mut self, request: Req) -> Result<Res, Self::Error>;
}

/// A blocking fetch function, `FnMut(Req) -> Result<Res, E>`.
///
/// Through the stream entry point the call runs inline on the polling task.
#[derive(Debug, Clone)]
pub struct Blocking<F>(pub F);

impl<Req, Res, E, F> FetchPage<Req, Res> for Blocking<F>
where
    F: FnMut(Req) -> Result<Res, E>,
{
    type Error = E;
    type Future = Ready<Result<Res, E>>;

    fn fetch(&mut self, request: Req) -> Self::Future {
        future::ready((self.0)(request))
    }

    fn fetch_blocking(&mut self, request: Req) -> Result<Res, E> {
        (self.0)(request)
    }
}

/// A suspend-capable fetch function, `FnMut(Req) -> impl Future<Output = Result<Res, E>>`.
///
/// Through the blocking entry point each future is driven to completion on
/// the calling thread with a local executor, so it must not depend on being
/// polled by a specific runtime.
#[derive(Debug, Clone)]
pub struct Suspending<F>(pub F);

impl<Req, Res, E, F, Fut> FetchPage<Req, Res> for Suspending<F>
where
    F: FnMut(Req) -> Fut,
    Fut: Future<Output = Result<Res, E>>,
{
    type Error = E;
    type Future = Fut;

    fn fetch(&mut self, request: Req) -> Fut {
        (self.0)(request)
    }

    fn fetch_blocking(&mut self, request: Req) -> Result<Res, E> {
        futures::executor::block_on((self.0)(request))
    }
}
