//! Common types used throughout cloudstore-core
//!
//! This module contains the protocol-neutral building blocks shared by the
//! unified request/response model and both transports.

use serde::{Deserialize, Serialize};

// ============================================================================
// HTTP Method
// ============================================================================

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    #[default]
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    OPTIONS,
}

impl Method {
    /// Whether a request body is written for this method.
    ///
    /// HEAD and GET never send one, even if the unified request carries a body.
    pub fn carries_body(self) -> bool {
        !matches!(self, Method::GET | Method::HEAD)
    }

    /// Canonical upper-case name
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::GET),
            "HEAD" => Ok(Method::HEAD),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "PATCH" => Ok(Method::PATCH),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            other => Err(crate::Error::invalid_argument(format!(
                "unsupported HTTP method: {other}"
            ))),
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::GET => reqwest::Method::GET,
            Method::HEAD => reqwest::Method::HEAD,
            Method::POST => reqwest::Method::POST,
            Method::PUT => reqwest::Method::PUT,
            Method::PATCH => reqwest::Method::PATCH,
            Method::DELETE => reqwest::Method::DELETE,
            Method::OPTIONS => reqwest::Method::OPTIONS,
        }
    }
}

// ============================================================================
// Header Multimap
// ============================================================================

/// Ordered header multimap with case-insensitive name lookup.
///
/// Names keep the casing they were inserted with; insertion order is
/// preserved across names and across repeated values of one name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Create an empty header collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, keeping any existing values for the same name
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Replace every value of `name` with a single value
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.remove(&name);
        self.entries.push((name, value.into()));
    }

    /// First value for `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for `name` in insertion order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether any value exists for `name`
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Remove all values for `name`, returning how many were removed
    pub fn remove(&mut self, name: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        before - self.entries.len()
    }

    /// Number of entries (counting repeated names)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

impl<N: Into<String>, V: Into<String>> Extend<(N, V)> for Headers {
    fn extend<I: IntoIterator<Item = (N, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.append(name, value);
        }
    }
}

// ============================================================================
// Completion Mode
// ============================================================================

/// How a response body is materialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completion {
    /// Copy the whole body into memory before returning
    #[default]
    ReadFully,
    /// Attach the live network stream without buffering
    Stream,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_carries_body() {
        assert!(!Method::GET.carries_body());
        assert!(!Method::HEAD.carries_body());
        assert!(Method::PUT.carries_body());
        assert!(Method::POST.carries_body());
        assert!(Method::DELETE.carries_body());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("put".parse::<Method>().unwrap(), Method::PUT);
        assert_eq!("HEAD".parse::<Method>().unwrap(), Method::HEAD);
        assert!("TRACE".parse::<Method>().is_err());
        assert_eq!(reqwest::Method::from(Method::PATCH), reqwest::Method::PATCH);
    }

    #[test]
    fn test_headers_case_insensitive() {
        let mut headers = Headers::new();
        headers.append("X-Amz-Meta-A", "1");
        headers.append("x-amz-meta-a", "2");
        headers.append("Accept", "*/*");

        assert_eq!(headers.get("x-amz-meta-A"), Some("1"));
        assert_eq!(headers.get_all("X-AMZ-META-A").collect::<Vec<_>>(), ["1", "2"]);
        assert!(headers.contains("ACCEPT"));
        assert_eq!(headers.len(), 3);

        headers.set("X-Amz-Meta-A", "3");
        assert_eq!(headers.get_all("x-amz-meta-a").collect::<Vec<_>>(), ["3"]);
        assert_eq!(headers.remove("accept"), 1);
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_headers_preserve_order() {
        let headers: Headers = [("b", "1"), ("a", "2"), ("b", "3")].into_iter().collect();
        let names: Vec<_> = headers.iter().map(|(n, v)| format!("{n}={v}")).collect();
        assert_eq!(names, ["b=1", "a=2", "b=3"]);
    }
}
