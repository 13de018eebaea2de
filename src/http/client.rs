//! Blocking transport
//!
//! Executes one [`UnifiedRequest`] on a pooled blocking HTTP client and returns
//! a [`UnifiedResponse`]. Header handling is shared with the non-blocking
//! transport through [`WireRequest`], so both put identical bytes on the wire
//! for the same request and options.

use super::message::{Body, BodyContent, UnifiedRequest, UnifiedResponse};
use super::translate::{
    configure_client, send_failure, split_response_headers, WireRequest,
};
use crate::config::TransportOptions;
use crate::error::{Error, Result};
use crate::types::Completion;
use reqwest::blocking::{Client, RequestBuilder};
use std::io::{Cursor, Read};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

/// HTTP transport built on a strictly blocking client.
///
/// Cheap to share across threads: every call checks out its own pooled
/// connection and nothing mutable is shared between calls.
///
/// Must not be constructed or dropped from inside an async runtime; use
/// [`AsyncTransport`](super::AsyncTransport) there.
#[derive(Clone)]
pub struct SyncTransport {
    client: Client,
    options: Arc<TransportOptions>,
}

impl SyncTransport {
    /// Create a transport with the given options
    pub fn new(options: TransportOptions) -> Result<Self> {
        options.validate()?;
        // No overall deadline: streamed bodies may be read for longer than any
        // fixed timeout. Connect and idle limits come from the options.
        let builder = configure_client!(Client::builder().timeout(None), &options);
        let client = builder.build()?;

        Ok(Self {
            client,
            options: Arc::new(options),
        })
    }

    /// Create a transport with default options
    pub fn with_defaults() -> Result<Self> {
        Self::new(TransportOptions::default())
    }

    /// The options this transport was built with
    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    /// Execute a request, buffering the whole response body
    pub fn send(&self, request: UnifiedRequest) -> Result<UnifiedResponse> {
        self.execute(request, Completion::ReadFully, &CancellationToken::new())
    }

    /// Execute one request/response exchange.
    ///
    /// Fails with [`Error::InvalidArgument`] for a missing or relative target
    /// and with [`Error::Cancelled`] if `cancel` is already set, both before
    /// touching the network. Non-2xx statuses are returned as responses.
    pub fn execute(
        &self,
        request: UnifiedRequest,
        completion: Completion,
        cancel: &CancellationToken,
    ) -> Result<UnifiedResponse> {
        let url = target_url(&request)?;
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let wire = WireRequest::from_request(&request);
        let method = request.method;
        let mut builder = self
            .client
            .request(method.into(), url.clone())
            .headers(wire.header_map());

        if method.carries_body() {
            if let Some(body) = request.body {
                builder = attach_body(builder, body, wire.chunked)?;
            }
        }

        let response = match builder.send() {
            Ok(response) => response,
            Err(e) => {
                warn!("{} {} failed: {}", method, url, e);
                return Err(send_failure(e));
            }
        };

        let status = response.status();
        debug!("{} {} -> {}", method, url, status.as_u16());

        let (headers, body_headers) = split_response_headers(response.headers());
        let mut unified = UnifiedResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            headers,
            body: None,
        };
        if !body_headers.is_empty() {
            *unified.body_or_placeholder().headers_mut() = body_headers;
        }

        match completion {
            Completion::ReadFully => {
                let bytes = response.bytes()?;
                unified
                    .body_or_placeholder()
                    .attach(BodyContent::Buffered(Cursor::new(bytes)));
            }
            Completion::Stream => {
                unified
                    .body_or_placeholder()
                    .attach(BodyContent::Reader(Box::new(response)));
            }
        }

        Ok(unified)
    }
}

impl std::fmt::Debug for SyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncTransport")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Validate and parse the request target
pub(crate) fn target_url(request: &UnifiedRequest) -> Result<Url> {
    let target = request
        .target
        .as_deref()
        .ok_or_else(|| Error::invalid_argument("request target is missing"))?;
    let url = Url::parse(target)
        .map_err(|e| Error::invalid_argument(format!("invalid request target '{target}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::invalid_argument(format!(
            "unsupported scheme '{}' in request target",
            url.scheme()
        )));
    }
    Ok(url)
}

fn attach_body(builder: RequestBuilder, body: Body, chunked: bool) -> Result<RequestBuilder> {
    match body.content() {
        BodyContent::Stream(_) => {
            return Err(Error::invalid_argument(
                "stream bodies require the non-blocking transport",
            ))
        }
        BodyContent::Empty => return Ok(builder),
        _ => {}
    }

    // no declared size on the wire: the client frames it as chunked
    if chunked {
        return Ok(builder.body(reqwest::blocking::Body::new(body)));
    }

    let length = body.content_length();
    let body = match body.into_content() {
        BodyContent::Buffered(cursor) => reqwest::blocking::Body::from(cursor.into_inner()),
        BodyContent::Reader(reader) => match length {
            Some(len) => reqwest::blocking::Body::sized(reader, len),
            None => {
                let mut buf = Vec::new();
                let mut reader = reader;
                reader.read_to_end(&mut buf)?;
                reqwest::blocking::Body::from(buf)
            }
        },
        BodyContent::Empty | BodyContent::Stream(_) => return Ok(builder),
    };

    Ok(builder.body(body))
}
