//! Header translation shared by both transports
//!
//! A [`UnifiedRequest`]'s headers are split into the dedicated fields the
//! HTTP client handles specially ([`WireRequest`]) plus a generic passthrough
//! collection. Responses go the other way: `content-*` headers belong to the
//! body, everything else to the response. Keeping this logic in one place is
//! what makes the blocking and non-blocking transports wire-identical.

use super::message::{BodyContent, UnifiedRequest};
use crate::config::TransportOptions;
use crate::error::{Error, Result};
use crate::types::Headers;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, warn};

/// Request headers after translation into the client's dedicated fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WireRequest {
    /// `accept`
    pub accept: Option<String>,
    /// Persistent connection flag from `connection: keep-alive|close`
    pub keep_alive: Option<bool>,
    /// Top-level `content-type`
    pub content_type: Option<String>,
    /// `expect: 100-continue`
    pub expect_continue: bool,
    /// `user-agent`
    pub user_agent: Option<String>,
    /// `host`
    pub host: Option<String>,
    /// `referer`
    pub referer: Option<String>,
    /// `transfer-encoding: chunked`
    pub chunked: bool,
    /// Everything without dedicated handling, plus the body's header subset
    pub headers: Headers,
}

impl WireRequest {
    /// Translate the top-level and body headers of `request`
    pub fn from_request(request: &UnifiedRequest) -> Self {
        let mut wire = WireRequest::default();

        for (name, value) in request.headers.iter() {
            let lower = name.to_ascii_lowercase();
            match lower.as_str() {
                "accept" => wire.accept = Some(value.to_string()),
                "connection" if value.eq_ignore_ascii_case("keep-alive") => {
                    wire.keep_alive = Some(true);
                }
                "connection" if value.eq_ignore_ascii_case("close") => {
                    wire.keep_alive = Some(false);
                }
                "content-type" => wire.content_type = Some(value.to_string()),
                "expect" if value.eq_ignore_ascii_case("100-continue") => {
                    wire.expect_continue = true;
                }
                "user-agent" => wire.user_agent = Some(value.to_string()),
                "host" => wire.host = Some(value.to_string()),
                "referer" => wire.referer = Some(value.to_string()),
                "transfer-encoding" if value.eq_ignore_ascii_case("chunked") => {
                    wire.chunked = true;
                }
                _ => wire.headers.append(name, value),
            }
        }

        // GET and HEAD never write a body, so its headers would describe nothing
        let body = request.body.as_ref().filter(|_| request.method.carries_body());
        if let Some(body) = body {
            // chunked and in-memory bodies are framed by the client from the real bytes
            let framed = wire.chunked
                || matches!(
                    body.content(),
                    BodyContent::Buffered(_) | BodyContent::Empty
                );
            for (name, value) in body.headers().iter() {
                if framed && name.eq_ignore_ascii_case("content-length") {
                    continue;
                }
                wire.headers.append(name, value);
            }
        }

        wire
    }

    /// Build the outbound header map.
    ///
    /// Generic headers are appended first and dedicated fields then replace any
    /// same-named entry, so a structural header is never sent twice. A name or
    /// value the client rejects is dropped and the request goes ahead.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.headers.len() + 8);

        for (name, value) in self.headers.iter() {
            match (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                (Ok(name), Ok(value)) => {
                    map.append(name, value);
                }
                _ => debug!("Dropping request header '{}' rejected by the client", name),
            }
        }

        let dedicated = [
            (header::ACCEPT, self.accept.as_deref()),
            (
                header::CONNECTION,
                self.keep_alive
                    .map(|keep| if keep { "keep-alive" } else { "close" }),
            ),
            (header::CONTENT_TYPE, self.content_type.as_deref()),
            (
                header::EXPECT,
                self.expect_continue.then_some("100-continue"),
            ),
            (header::USER_AGENT, self.user_agent.as_deref()),
            (header::HOST, self.host.as_deref()),
            (header::REFERER, self.referer.as_deref()),
            (header::TRANSFER_ENCODING, self.chunked.then_some("chunked")),
        ];
        for (name, value) in dedicated {
            let Some(value) = value else { continue };
            match HeaderValue::from_str(value) {
                Ok(value) => {
                    map.insert(name, value);
                }
                Err(_) => debug!("Dropping invalid value for request header '{}'", name),
            }
        }

        map
    }
}

/// Split response headers into (top-level, body subset).
///
/// Names starting with `content-` go to the body subset. Values that are not
/// visible ASCII cannot be represented and are skipped.
pub fn split_response_headers(map: &HeaderMap) -> (Headers, Headers) {
    let mut headers = Headers::new();
    let mut body_headers = Headers::new();

    for (name, value) in map {
        let Ok(value) = value.to_str() else {
            debug!("Skipping response header '{}' with non-text value", name);
            continue;
        };
        // HeaderName is always lower-case
        if name.as_str().starts_with("content-") {
            body_headers.append(name.as_str(), value);
        } else {
            headers.append(name.as_str(), value);
        }
    }

    (headers, body_headers)
}

/// Classify an error returned while sending a request.
///
/// A failure reading the caller's request body comes back from the client
/// wrapped as a body error; it is handed back as the underlying I/O error.
/// Everything else is a connection-level transport failure.
pub(crate) fn send_failure(e: reqwest::Error) -> Error {
    if e.is_body() {
        let mut source = std::error::Error::source(&e);
        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<std::io::Error>() {
                return Error::Io(std::io::Error::new(io.kind(), io.to_string()));
            }
            source = err.source();
        }
    }
    Error::Transport(e)
}

/// Apply [`TransportOptions`] to a reqwest client builder.
///
/// Works for both `reqwest::ClientBuilder` and `reqwest::blocking::ClientBuilder`,
/// which expose the same configuration surface.
macro_rules! configure_client {
    ($builder:expr, $options:expr) => {{
        let options: &$crate::config::TransportOptions = $options;
        let mut builder = $builder
            .connect_timeout(options.connect_timeout)
            .pool_idle_timeout(options.idle_connection_timeout)
            .pool_max_idle_per_host(options.max_connections)
            .tcp_keepalive(options.keep_alive_timeout)
            .redirect($crate::http::translate::redirect_policy(options))
            .danger_accept_invalid_certs(
                $crate::http::translate::skip_tls_verification(options),
            );
        if let Some(proxy) = $crate::http::translate::proxy(options)? {
            builder = builder.proxy(proxy);
        }
        builder
    }};
}

pub(crate) use configure_client;

pub(crate) fn redirect_policy(options: &TransportOptions) -> reqwest::redirect::Policy {
    if options.enabled_redirect {
        reqwest::redirect::Policy::limited(10)
    } else {
        reqwest::redirect::Policy::none()
    }
}

pub(crate) fn proxy(options: &TransportOptions) -> Result<Option<reqwest::Proxy>> {
    options
        .http_proxy
        .as_deref()
        .map(reqwest::Proxy::all)
        .transpose()
        .map_err(Into::into)
}

/// Verification is skipped on every platform when asked for, loudly.
pub(crate) fn skip_tls_verification(options: &TransportOptions) -> bool {
    if options.insecure_skip_verify {
        warn!("TLS certificate verification is disabled (insecure_skip_verify = true)");
    }
    options.insecure_skip_verify
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::message::Body;
    use crate::types::Method;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn request_with(name: &str, value: &str) -> UnifiedRequest {
        UnifiedRequest::new(Method::GET, "http://localhost/").header(name, value)
    }

    #[test]
    fn test_keep_alive_is_dedicated() {
        let wire = WireRequest::from_request(&request_with("Connection", "keep-alive"));
        assert_eq!(wire.keep_alive, Some(true));
        assert!(wire.headers.is_empty());

        let map = wire.header_map();
        assert_eq!(map.get_all(header::CONNECTION).iter().count(), 1);
        assert_eq!(map[header::CONNECTION], "keep-alive");
    }

    #[test]
    fn test_connection_close() {
        let wire = WireRequest::from_request(&request_with("CONNECTION", "Close"));
        assert_eq!(wire.keep_alive, Some(false));
        assert!(wire.headers.is_empty());
    }

    #[test]
    fn test_connection_other_value_is_generic() {
        let wire = WireRequest::from_request(&request_with("Connection", "Upgrade"));
        assert_eq!(wire.keep_alive, None);
        assert_eq!(wire.headers.get("connection"), Some("Upgrade"));
    }

    #[test_case("Accept", "application/xml" ; "accept")]
    #[test_case("Content-Type", "application/octet-stream" ; "content type")]
    #[test_case("User-Agent", "cloudstore/1.0" ; "user agent")]
    #[test_case("Host", "bucket.storage.local" ; "host")]
    #[test_case("Referer", "https://console.local/" ; "referer")]
    fn test_dedicated_headers_not_duplicated(name: &str, value: &str) {
        let wire = WireRequest::from_request(&request_with(name, value));
        assert!(wire.headers.is_empty(), "{name} leaked into generic headers");

        let map = wire.header_map();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(name).and_then(|v| v.to_str().ok()), Some(value));
    }

    #[test]
    fn test_expect_and_chunked() {
        let request = UnifiedRequest::new(Method::PUT, "http://localhost/o")
            .header("Expect", "100-continue")
            .header("Transfer-Encoding", "chunked")
            .body(
                Body::from_reader(std::io::empty())
                    .with_header("Content-Length", "42")
                    .with_header("Content-MD5", "abc=="),
            );
        let wire = WireRequest::from_request(&request);

        assert!(wire.expect_continue);
        assert!(wire.chunked);
        assert!(!wire.headers.contains("content-length"));
        assert_eq!(wire.headers.get("content-md5"), Some("abc=="));
    }

    #[test]
    fn test_body_headers_are_generic() {
        let request = UnifiedRequest::new(Method::PUT, "http://localhost/o")
            .header("x-amz-meta-owner", "ops")
            .body(
                Body::from_bytes("abc")
                    .with_header("Content-Type", "text/plain")
                    .with_header("Content-Length", "3"),
            );
        let wire = WireRequest::from_request(&request);

        assert_eq!(wire.content_type, None);
        let names: Vec<_> = wire.headers.iter().map(|(n, _)| n.to_string()).collect();
        // the client frames in-memory bytes itself
        assert_eq!(names, ["x-amz-meta-owner", "Content-Type"]);
    }

    #[test]
    fn test_buffered_body_length_never_desyncs() {
        let request = UnifiedRequest::new(Method::PUT, "http://localhost/o")
            .body(Body::from_bytes("hello").with_header("Content-Length", "99"));
        let map = WireRequest::from_request(&request).header_map();

        assert!(map.get(header::CONTENT_LENGTH).is_none());
    }

    #[test]
    fn test_sized_reader_keeps_declared_length() {
        let request = UnifiedRequest::new(Method::PUT, "http://localhost/o").body(
            Body::from_reader(&b"four"[..]).with_header("Content-Length", "4"),
        );
        let wire = WireRequest::from_request(&request);

        assert_eq!(wire.headers.get("content-length"), Some("4"));
    }

    #[test_case(Method::GET ; "get")]
    #[test_case(Method::HEAD ; "head")]
    fn test_bodiless_method_drops_body_headers(method: Method) {
        let request = UnifiedRequest::new(method, "http://localhost/o")
            .header("x-amz-meta-owner", "ops")
            .body(
                Body::from_reader(&b"hello"[..])
                    .with_header("Content-Length", "5")
                    .with_header("Content-Type", "text/plain"),
            );
        let wire = WireRequest::from_request(&request);

        assert!(!wire.headers.contains("content-length"));
        assert!(!wire.headers.contains("content-type"));
        assert_eq!(wire.headers.get("x-amz-meta-owner"), Some("ops"));
    }

    #[test]
    fn test_dedicated_content_type_wins() {
        let request = UnifiedRequest::new(Method::PUT, "http://localhost/o")
            .header("Content-Type", "application/json")
            .body(Body::from_bytes("{}").with_header("Content-Type", "text/plain"));
        let map = WireRequest::from_request(&request).header_map();

        assert_eq!(map.get_all(header::CONTENT_TYPE).iter().count(), 1);
        assert_eq!(map[header::CONTENT_TYPE], "application/json");
    }

    #[test]
    fn test_rejected_header_is_dropped() {
        let request = UnifiedRequest::new(Method::GET, "http://localhost/")
            .header("bad header name", "x")
            .header("x-ok", "fine")
            .header("x-bad-value", "line\nbreak");
        let map = WireRequest::from_request(&request).header_map();

        assert_eq!(map.len(), 1);
        assert_eq!(map["x-ok"], "fine");
    }

    #[test]
    fn test_repeated_generic_headers_kept() {
        let request = UnifiedRequest::new(Method::GET, "http://localhost/")
            .header("x-amz-grant", "a")
            .header("X-Amz-Grant", "b");
        let map = WireRequest::from_request(&request).header_map();
        let values: Vec<_> = map.get_all("x-amz-grant").iter().collect();
        assert_eq!(values, ["a", "b"]);
    }

    #[test]
    fn test_split_content_type_only() {
        let mut map = HeaderMap::new();
        map.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let (headers, body_headers) = split_response_headers(&map);
        assert!(headers.is_empty());
        assert_eq!(body_headers.len(), 1);
        assert_eq!(body_headers.get("Content-Type"), Some("text/plain"));
    }

    #[test]
    fn test_split_mixed() {
        let mut map = HeaderMap::new();
        map.insert(header::ETAG, HeaderValue::from_static("\"abc\""));
        map.insert(header::CONTENT_LENGTH, HeaderValue::from_static("12"));
        map.insert("x-amz-request-id", HeaderValue::from_static("req-1"));
        map.insert(
            "x-amz-meta-name",
            HeaderValue::from_bytes(b"caf\xc3\xa9").unwrap(),
        );

        let (headers, body_headers) = split_response_headers(&map);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("etag"), Some("\"abc\""));
        assert!(!headers.contains("x-amz-meta-name"));
        assert_eq!(body_headers.get("content-length"), Some("12"));
    }

    #[test]
    fn test_redirect_and_proxy_options() {
        let options = TransportOptions::default();
        assert!(proxy(&options).unwrap().is_none());
        assert!(!skip_tls_verification(&options));

        let options = TransportOptions {
            http_proxy: Some("http://127.0.0.1:3128".to_string()),
            ..TransportOptions::default()
        };
        assert!(proxy(&options).unwrap().is_some());
    }
}
