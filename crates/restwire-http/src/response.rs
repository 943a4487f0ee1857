//! Raw and normalized response values

use std::collections::HashSet;

use serde_json::Value;

/// A single response header
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Response exactly as the transport produced it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// `None` when the transport had no body to report
    pub body: Option<String>,
}

impl RawResponse {
    /// Create a response with a status code and no headers or body
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Default::default()
        }
    }

    /// Attach a body
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Append a header entry
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Normalized result of one successful call
#[derive(Debug, Clone, PartialEq)]
pub struct RestResponse {
    status_code: u16,
    body: Option<Value>,
    headers: HashSet<Header>,
    raw: RawResponse,
}

impl RestResponse {
    pub(crate) fn new(
        status_code: u16,
        body: Option<Value>,
        headers: HashSet<Header>,
        raw: RawResponse,
    ) -> Self {
        Self {
            status_code,
            body,
            headers,
            raw,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Parsed body, absent when the raw body was empty or missing
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    pub fn into_body(self) -> Option<Value> {
        self.body
    }

    pub fn headers(&self) -> &HashSet<Header> {
        &self.headers
    }

    /// Value of the first header with this name (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Underlying transport response
    pub fn raw(&self) -> &RawResponse {
        &self.raw
    }

    /// True for 2xx status codes
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
