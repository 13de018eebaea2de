//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands};
use crate::config::TransportOptions;
use crate::error::{Error, Result};
use crate::http::{Body, SyncTransport, UnifiedRequest, UnifiedResponse};
use crate::types::{Completion, Method};
use std::io::{self, Write};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Request {
                url,
                method,
                headers,
                data,
                stream,
                head_only,
            } => {
                let request = build_request(url, method, headers, data.as_deref())?;
                let completion = if *stream {
                    Completion::Stream
                } else {
                    Completion::ReadFully
                };
                self.request(request, completion, *head_only)
            }
            Commands::Options => {
                let options = self.load_options()?;
                print!("{}", serde_yaml::to_string(&options)?);
                Ok(())
            }
        }
    }

    fn load_options(&self) -> Result<TransportOptions> {
        match &self.cli.options {
            Some(path) => {
                info!("Loading transport options from {}", path.display());
                TransportOptions::from_file(path)
            }
            None => Ok(TransportOptions::default()),
        }
    }

    fn request(
        &self,
        request: UnifiedRequest,
        completion: Completion,
        head_only: bool,
    ) -> Result<()> {
        let transport = SyncTransport::new(self.load_options()?)?;
        let response = transport.execute(request, completion, &CancellationToken::new())?;

        let stdout = io::stdout();
        let mut out = stdout.lock();
        write_response(response, &mut out, head_only)?;
        out.flush()?;
        Ok(())
    }
}

/// Build a unified request from command-line arguments
pub(crate) fn build_request(
    url: &str,
    method: &str,
    headers: &[String],
    data: Option<&str>,
) -> Result<UnifiedRequest> {
    let method: Method = method.parse()?;
    let mut request = UnifiedRequest::new(method, url);

    for raw in headers {
        let (name, value) = parse_header(raw)?;
        request.headers.append(name, value);
    }
    if let Some(data) = data {
        request.body = Some(
            Body::from_bytes(data.to_string())
                .with_header("Content-Length", data.len().to_string()),
        );
    }

    Ok(request)
}

/// Split `Name: value`
pub(crate) fn parse_header(raw: &str) -> Result<(&str, &str)> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| Error::invalid_argument(format!("header '{raw}' is not 'Name: value'")))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::invalid_argument(format!("header '{raw}' has no name")));
    }
    Ok((name, value.trim()))
}

/// Print status line, headers and body
pub(crate) fn write_response(
    mut response: UnifiedResponse,
    out: &mut impl Write,
    head_only: bool,
) -> Result<()> {
    writeln!(out, "HTTP {} {}", response.status, response.reason)?;
    for (name, value) in response.headers.iter() {
        writeln!(out, "{name}: {value}")?;
    }
    if let Some(body_headers) = response.body_headers() {
        for (name, value) in body_headers.iter() {
            writeln!(out, "{name}: {value}")?;
        }
    }

    if head_only {
        return Ok(());
    }
    if let Some(mut body) = response.take_body() {
        writeln!(out)?;
        io::copy(&mut body, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::BodyContent;
    use bytes::Bytes;
    use std::io::Cursor;

    #[test]
    fn test_parse_header() {
        assert_eq!(
            parse_header("Content-Type: text/plain").unwrap(),
            ("Content-Type", "text/plain")
        );
        assert_eq!(
            parse_header("x-amz-date:20240101T000000Z").unwrap(),
            ("x-amz-date", "20240101T000000Z")
        );
        assert!(parse_header("no separator").is_err());
        assert!(parse_header(": value").is_err());
    }

    #[test]
    fn test_build_request() {
        let request = build_request(
            "https://storage.local/bucket/key",
            "put",
            &["Content-Type: text/plain".to_string()],
            Some("hello"),
        )
        .unwrap();

        assert_eq!(request.method, Method::PUT);
        assert_eq!(request.headers.get("content-type"), Some("text/plain"));
        let body = request.body.unwrap();
        assert_eq!(body.headers().get("content-length"), Some("5"));
        assert_eq!(body.content_length(), Some(5));
    }

    #[test]
    fn test_build_request_bad_method() {
        let err = build_request("http://x/", "BREW", &[], None).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument { .. }));
    }

    #[test]
    fn test_write_response() {
        let mut response = UnifiedResponse::new(404, "Not Found");
        response.headers.append("x-amz-request-id", "abc");
        let body = response.body_or_placeholder();
        body.headers_mut().append("content-type", "application/xml");
        body.attach(BodyContent::Buffered(Cursor::new(Bytes::from_static(b"<Error/>"))));

        let mut out = Vec::new();
        write_response(response, &mut out, false).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "HTTP 404 Not Found\nx-amz-request-id: abc\ncontent-type: application/xml\n\n<Error/>"
        );
    }

    #[test]
    fn test_write_response_head_only() {
        let mut response = UnifiedResponse::new(200, "OK");
        response.body_or_placeholder().attach(BodyContent::Buffered(Cursor::new(
            Bytes::from_static(b"ignored"),
        )));

        let mut out = Vec::new();
        write_response(response, &mut out, true).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "HTTP 200 OK\n");
    }
}
