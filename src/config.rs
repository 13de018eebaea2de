//! Transport configuration
//!
//! `TransportOptions` is an immutable snapshot fixed when a transport is
//! constructed and shared read-only by every call made through it. It can be
//! built in code or loaded from YAML:
//!
//! ```yaml
//! connect_timeout_ms: 5000
//! idle_connection_timeout_ms: 60000
//! max_connections: 32
//! enabled_redirect: false
//! http_proxy: http://proxy.internal:3128
//! insecure_skip_verify: false
//! ```

use crate::error::{Error, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration shared by the blocking and non-blocking transports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransportOptions {
    /// Time allowed to establish a TCP/TLS connection
    #[serde(rename = "connect_timeout_ms", with = "duration_ms")]
    pub connect_timeout: Duration,

    /// How long a sender would wait for `100 Continue` before sending the body.
    ///
    /// The underlying HTTP client sends the body immediately after the
    /// headers, so this is carried for parity with other transports only.
    #[serde(rename = "expect_continue_timeout_ms", with = "duration_ms")]
    pub expect_continue_timeout: Duration,

    /// How long an idle pooled connection is kept before being closed
    #[serde(rename = "idle_connection_timeout_ms", with = "duration_ms")]
    pub idle_connection_timeout: Duration,

    /// TCP keep-alive interval for open connections
    #[serde(rename = "keep_alive_timeout_ms", with = "duration_ms")]
    pub keep_alive_timeout: Duration,

    /// Maximum idle connections kept per host in the pool
    pub max_connections: usize,

    /// Follow 3xx redirects
    pub enabled_redirect: bool,

    /// Proxy URL applied to every scheme
    pub http_proxy: Option<String>,

    /// Skip TLS certificate verification
    pub insecure_skip_verify: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            expect_continue_timeout: Duration::from_secs(1),
            idle_connection_timeout: Duration::from_secs(90),
            keep_alive_timeout: Duration::from_secs(30),
            max_connections: 100,
            enabled_redirect: false,
            http_proxy: None,
            insecure_skip_verify: false,
        }
    }
}

impl TransportOptions {
    /// Create a new options builder
    pub fn builder() -> TransportOptionsBuilder {
        TransportOptionsBuilder::default()
    }

    /// Parse options from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let options: Self = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read transport options {}", path.display()))?;
        Self::from_yaml_str(&yaml)
    }

    /// Check values that would otherwise fail later inside the HTTP client
    pub fn validate(&self) -> Result<()> {
        if self.max_connections == 0 {
            return Err(Error::config("max_connections must be at least 1"));
        }
        if self.connect_timeout.is_zero() {
            return Err(Error::config("connect_timeout_ms must be greater than 0"));
        }
        if let Some(proxy) = &self.http_proxy {
            url::Url::parse(proxy)
                .map_err(|e| Error::config(format!("invalid http_proxy '{proxy}': {e}")))?;
        }
        Ok(())
    }
}

/// Builder for transport options
#[derive(Debug, Default)]
pub struct TransportOptionsBuilder {
    options: TransportOptions,
}

impl TransportOptionsBuilder {
    /// Set the connect timeout
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.options.connect_timeout = timeout;
        self
    }

    /// Set the expect-continue timeout
    pub fn expect_continue_timeout(mut self, timeout: Duration) -> Self {
        self.options.expect_continue_timeout = timeout;
        self
    }

    /// Set the idle pooled connection timeout
    pub fn idle_connection_timeout(mut self, timeout: Duration) -> Self {
        self.options.idle_connection_timeout = timeout;
        self
    }

    /// Set the TCP keep-alive interval
    pub fn keep_alive_timeout(mut self, timeout: Duration) -> Self {
        self.options.keep_alive_timeout = timeout;
        self
    }

    /// Set the pool size per host
    pub fn max_connections(mut self, max: usize) -> Self {
        self.options.max_connections = max;
        self
    }

    /// Enable or disable redirect following
    pub fn enabled_redirect(mut self, enabled: bool) -> Self {
        self.options.enabled_redirect = enabled;
        self
    }

    /// Route all traffic through a proxy
    pub fn http_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.options.http_proxy = Some(proxy.into());
        self
    }

    /// Skip TLS certificate verification
    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.options.insecure_skip_verify = skip;
        self
    }

    /// Validate and build the options
    pub fn build(self) -> Result<TransportOptions> {
        self.options.validate()?;
        Ok(self.options)
    }
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = TransportOptions::default();
        assert_eq!(options.connect_timeout, Duration::from_secs(10));
        assert_eq!(options.max_connections, 100);
        assert!(!options.enabled_redirect);
        assert!(!options.insecure_skip_verify);
        assert!(options.http_proxy.is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let options = TransportOptions::builder()
            .connect_timeout(Duration::from_millis(1500))
            .idle_connection_timeout(Duration::from_secs(5))
            .keep_alive_timeout(Duration::from_secs(15))
            .expect_continue_timeout(Duration::from_millis(250))
            .max_connections(8)
            .enabled_redirect(true)
            .http_proxy("http://127.0.0.1:3128")
            .insecure_skip_verify(true)
            .build()
            .unwrap();

        assert_eq!(options.connect_timeout, Duration::from_millis(1500));
        assert_eq!(options.idle_connection_timeout, Duration::from_secs(5));
        assert_eq!(options.keep_alive_timeout, Duration::from_secs(15));
        assert_eq!(options.expect_continue_timeout, Duration::from_millis(250));
        assert_eq!(options.max_connections, 8);
        assert!(options.enabled_redirect);
        assert_eq!(options.http_proxy.as_deref(), Some("http://127.0.0.1:3128"));
        assert!(options.insecure_skip_verify);
    }

    #[test]
    fn test_builder_rejects_invalid() {
        let err = TransportOptions::builder()
            .max_connections(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Config { .. }));

        let err = TransportOptions::builder()
            .http_proxy("not a url")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("invalid http_proxy"));
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r"
connect_timeout_ms: 2500
max_connections: 4
enabled_redirect: true
";
        let options = TransportOptions::from_yaml_str(yaml).unwrap();
        assert_eq!(options.connect_timeout, Duration::from_millis(2500));
        assert_eq!(options.max_connections, 4);
        assert!(options.enabled_redirect);
        // untouched keys keep their defaults
        assert_eq!(options.idle_connection_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_from_yaml_unknown_key() {
        let err = TransportOptions::from_yaml_str("connect_timeout: 5").unwrap_err();
        assert!(matches!(err, Error::YamlParse(_)));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_millis() {
        let options = TransportOptions::builder()
            .keep_alive_timeout(Duration::from_millis(1234))
            .build()
            .unwrap();
        let yaml = serde_yaml::to_string(&options).unwrap();
        assert!(yaml.contains("keep_alive_timeout_ms: 1234"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "insecure_skip_verify: true").unwrap();
        writeln!(file, "http_proxy: http://proxy.local:8080").unwrap();

        let options = TransportOptions::from_file(file.path()).unwrap();
        assert!(options.insecure_skip_verify);
        assert_eq!(options.http_proxy.as_deref(), Some("http://proxy.local:8080"));
    }

    #[test]
    fn test_from_missing_file() {
        let err = TransportOptions::from_file("/nonexistent/cloudstore.yaml").unwrap_err();
        assert!(err.to_string().contains("Failed to read transport options"));
    }
}
