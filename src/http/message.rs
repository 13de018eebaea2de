//! Unified request/response model
//!
//! Protocol-neutral representation of one HTTP exchange. Both transports
//! consume a [`UnifiedRequest`] and produce a [`UnifiedResponse`]; neither type
//! is tied to the HTTP library underneath.

use crate::types::{Headers, Method};
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::fmt;
use std::io::{self, Cursor, Read};

/// Where the bytes of a body come from
pub enum BodyContent {
    /// No bytes (placeholder body that only carries headers)
    Empty,
    /// Fully buffered in memory, read from the current cursor position
    Buffered(Cursor<Bytes>),
    /// Blocking reader, e.g. a file or a live blocking network response
    Reader(Box<dyn Read + Send>),
    /// Non-blocking byte stream, e.g. a live async network response
    Stream(BoxStream<'static, io::Result<Bytes>>),
}

impl fmt::Debug for BodyContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Buffered(cursor) => f
                .debug_struct("Buffered")
                .field("len", &cursor.get_ref().len())
                .field("position", &cursor.position())
                .finish(),
            Self::Reader(_) => f.write_str("Reader(..)"),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A body stream together with its own header subset (`content-*` headers)
#[derive(Debug)]
pub struct Body {
    content: BodyContent,
    headers: Headers,
}

impl Default for Body {
    fn default() -> Self {
        Self::empty()
    }
}

impl Body {
    /// Body with no bytes and no headers
    pub fn empty() -> Self {
        Self {
            content: BodyContent::Empty,
            headers: Headers::new(),
        }
    }

    /// In-memory body
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        Self {
            content: BodyContent::Buffered(Cursor::new(bytes.into())),
            headers: Headers::new(),
        }
    }

    /// Body read from a blocking reader
    pub fn from_reader(reader: impl Read + Send + 'static) -> Self {
        Self {
            content: BodyContent::Reader(Box::new(reader)),
            headers: Headers::new(),
        }
    }

    /// Body read from a non-blocking byte stream
    pub fn from_stream(stream: BoxStream<'static, io::Result<Bytes>>) -> Self {
        Self {
            content: BodyContent::Stream(stream),
            headers: Headers::new(),
        }
    }

    /// Add a header to the body's own subset
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// The body's header subset
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable access to the body's header subset
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }

    /// Borrow the content
    pub fn content(&self) -> &BodyContent {
        &self.content
    }

    /// Take the content, leaving the headers behind
    pub fn into_content(self) -> BodyContent {
        self.content
    }

    /// Swap in new content; the header subset is kept untouched
    pub fn attach(&mut self, content: BodyContent) {
        self.content = content;
    }

    /// Declared `content-length` from the header subset, or the buffered size
    pub fn content_length(&self) -> Option<u64> {
        if let Some(len) = self
            .headers
            .get("content-length")
            .and_then(|v| v.trim().parse().ok())
        {
            return Some(len);
        }
        match &self.content {
            BodyContent::Empty => Some(0),
            BodyContent::Buffered(cursor) => Some(cursor.get_ref().len() as u64),
            _ => None,
        }
    }

    /// True when the content is held in memory
    pub fn is_buffered(&self) -> bool {
        matches!(self.content, BodyContent::Buffered(_))
    }

    /// Buffered bytes, if the content is held in memory
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match &self.content {
            BodyContent::Buffered(cursor) => Some(cursor.get_ref()),
            _ => None,
        }
    }

    /// Drain the body into memory using blocking reads.
    ///
    /// Buffered content is returned whole regardless of the cursor position.
    pub fn into_bytes(self) -> io::Result<Bytes> {
        match self.content {
            BodyContent::Empty => Ok(Bytes::new()),
            BodyContent::Buffered(cursor) => Ok(cursor.into_inner()),
            BodyContent::Reader(mut reader) => {
                let mut buf = Vec::new();
                reader.read_to_end(&mut buf)?;
                Ok(Bytes::from(buf))
            }
            BodyContent::Stream(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stream body must be collected asynchronously",
            )),
        }
    }

    /// Drain the body into memory without blocking the executor.
    ///
    /// Blocking readers are refused here; use [`Body::into_bytes`] for them.
    pub async fn collect(self) -> io::Result<Bytes> {
        match self.content {
            BodyContent::Stream(mut stream) => {
                let mut buf = Vec::new();
                while let Some(chunk) = stream.next().await {
                    buf.extend_from_slice(&chunk?);
                }
                Ok(Bytes::from(buf))
            }
            BodyContent::Reader(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "blocking reader body cannot be collected asynchronously",
            )),
            content => Body {
                content,
                headers: Headers::new(),
            }
            .into_bytes(),
        }
    }
}

impl Read for Body {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.content {
            BodyContent::Empty => Ok(0),
            BodyContent::Buffered(cursor) => cursor.read(buf),
            BodyContent::Reader(reader) => reader.read(buf),
            BodyContent::Stream(_) => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "stream body cannot be read synchronously",
            )),
        }
    }
}

// ============================================================================
// Request
// ============================================================================

/// One outbound HTTP request
#[derive(Debug, Default)]
pub struct UnifiedRequest {
    /// HTTP method
    pub method: Method,
    /// Absolute target URL; required by both transports
    pub target: Option<String>,
    /// Top-level headers in insertion order
    pub headers: Headers,
    /// Optional body with its own header subset
    pub body: Option<Body>,
}

impl UnifiedRequest {
    /// Create a request for `target`
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: Some(target.into()),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Append a top-level header
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Attach a body
    #[must_use]
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }
}

// ============================================================================
// Response
// ============================================================================

/// One inbound HTTP response; HTTP error statuses are ordinary values here
#[derive(Debug, Default)]
pub struct UnifiedResponse {
    /// Status code
    pub status: u16,
    /// Reason phrase
    pub reason: String,
    /// Top-level (non `content-*`) headers
    pub headers: Headers,
    /// Body with its `content-*` header subset
    pub body: Option<Body>,
}

impl UnifiedResponse {
    /// Create a response with no headers and no body
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body, creating an empty placeholder if none exists yet
    pub fn body_or_placeholder(&mut self) -> &mut Body {
        self.body.get_or_insert_with(Body::empty)
    }

    /// The body's header subset, if there is a body
    pub fn body_headers(&self) -> Option<&Headers> {
        self.body.as_ref().map(Body::headers)
    }

    /// Take the body out of the response
    pub fn take_body(&mut self) -> Option<Body> {
        self.body.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attach_keeps_body_headers() {
        let mut body = Body::empty().with_header("Content-Type", "text/plain");
        body.attach(BodyContent::Buffered(Cursor::new(Bytes::from_static(b"hi"))));

        assert_eq!(body.headers().get("content-type"), Some("text/plain"));
        assert_eq!(body.as_bytes().map(|b| &b[..]), Some(&b"hi"[..]));
    }

    #[test]
    fn test_content_length_prefers_header() {
        let body = Body::from_bytes("abc").with_header("Content-Length", "10");
        assert_eq!(body.content_length(), Some(10));

        let body = Body::from_bytes("abc");
        assert_eq!(body.content_length(), Some(3));

        let body = Body::from_reader(io::empty());
        assert_eq!(body.content_length(), None);
    }

    #[test]
    fn test_read_and_into_bytes() {
        let mut body = Body::from_bytes("hello world");
        let mut first = [0u8; 5];
        body.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"hello");
        // whole buffer regardless of cursor position
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"hello world"));

        let body = Body::from_reader(&b"from reader"[..]);
        assert_eq!(body.into_bytes().unwrap(), Bytes::from_static(b"from reader"));
    }

    #[test]
    fn test_stream_body_refuses_blocking_read() {
        let stream = futures::stream::iter(vec![Ok(Bytes::from_static(b"x"))]).boxed();
        let err = Body::from_stream(stream).into_bytes().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }

    #[tokio::test]
    async fn test_collect_stream() {
        let chunks = vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
        let body = Body::from_stream(futures::stream::iter(chunks).boxed());
        assert_eq!(body.collect().await.unwrap(), Bytes::from_static(b"abcd"));
    }

    #[test]
    fn test_response_placeholder() {
        let mut response = UnifiedResponse::new(204, "No Content");
        assert!(response.body_headers().is_none());

        response
            .body_or_placeholder()
            .headers_mut()
            .append("Content-Length", "0");
        assert_eq!(response.body_headers().map(Headers::len), Some(1));
        assert!(response.is_success());
    }

    #[test]
    fn test_request_builder() {
        let request = UnifiedRequest::new(Method::PUT, "https://bucket.example.com/key")
            .header("x-amz-acl", "private")
            .body(Body::from_bytes("data").with_header("Content-Type", "text/plain"));

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.target.as_deref(), Some("https://bucket.example.com/key"));
        assert_eq!(request.headers.get("X-Amz-Acl"), Some("private"));
        assert!(request.body.is_some());
    }
}
