//! Non-blocking transport
//!
//! The async twin of [`SyncTransport`](super::SyncTransport). It shares the
//! options and header translation, never calls into blocking code, and also
//! honours cancellation while the exchange is in flight.

use super::client::target_url;
use super::message::{Body, BodyContent, UnifiedRequest, UnifiedResponse};
use super::translate::{
    configure_client, send_failure, split_response_headers, WireRequest,
};
use crate::config::TransportOptions;
use crate::error::{Error, Result};
use crate::types::Completion;
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, RequestBuilder};
use std::io::Cursor;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// HTTP transport built on the async client
#[derive(Clone)]
pub struct AsyncTransport {
    client: Client,
    options: Arc<TransportOptions>,
}

impl AsyncTransport {
    /// Create a transport with the given options
    pub fn new(options: TransportOptions) -> Result<Self> {
        options.validate()?;
        let builder = configure_client!(Client::builder(), &options);
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
    pub async fn send(&self, request: UnifiedRequest) -> Result<UnifiedResponse> {
        self.execute(request, Completion::ReadFully, &CancellationToken::new())
            .await
    }

    /// Execute one request/response exchange.
    ///
    /// Same pre-flight checks and header semantics as
    /// [`SyncTransport::execute`](super::SyncTransport::execute). Request
    /// bodies backed by a blocking reader are rejected.
    pub async fn execute(
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

        let response = tokio::select! {
            () = cancel.cancelled() => return Err(Error::Cancelled),
            result = builder.send() => match result {
                Ok(response) => response,
                Err(e) => {
                    warn!("{} {} failed: {}", method, url, e);
                    return Err(send_failure(e));
                }
            },
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
                let bytes = tokio::select! {
                    () = cancel.cancelled() => return Err(Error::Cancelled),
                    bytes = response.bytes() => bytes?,
                };
                unified
                    .body_or_placeholder()
                    .attach(BodyContent::Buffered(Cursor::new(bytes)));
            }
            Completion::Stream => {
                let stream = response.bytes_stream().map_err(std::io::Error::other);
                unified
                    .body_or_placeholder()
                    .attach(BodyContent::Stream(stream.boxed()));
            }
        }

        Ok(unified)
    }
}

impl std::fmt::Debug for AsyncTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncTransport")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

fn attach_body(builder: RequestBuilder, body: Body, chunked: bool) -> Result<RequestBuilder> {
    let body = match body.into_content() {
        BodyContent::Reader(_) => {
            return Err(Error::invalid_argument(
                "blocking reader bodies require the blocking transport",
            ))
        }
        BodyContent::Empty => return Ok(builder),
        // an unsized stream is framed as chunked by the client
        BodyContent::Buffered(cursor) if chunked => {
            let bytes = cursor.into_inner();
            reqwest::Body::wrap_stream(futures::stream::once(async move {
                Ok::<_, std::io::Error>(bytes)
            }))
        }
        BodyContent::Buffered(cursor) => reqwest::Body::from(cursor.into_inner()),
        BodyContent::Stream(stream) => reqwest::Body::wrap_stream(stream),
    };

    Ok(builder.body(body))
}
