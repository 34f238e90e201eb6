//! HTTP Response representation for handlers

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Represents an outgoing HTTP response.
///
/// Headers stay mutable after the router returns, so callers can augment the
/// response (content type, CORS) after dispatch.
///
/// # Quick Reference
///
/// | Method | Status | Use Case |
/// |--------|--------|----------|
/// | `ok(body)` | 200 | Successful GET response |
/// | `text(status, body)` | any | Plain text |
/// | `not_found_msg(msg)` | 404 | Resource not found |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Response body
    #[serde(default)]
    pub body: Option<String>,
}

impl Response {
    /// Create a new response with the given status code (no body).
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Create a 200 OK response with JSON body.
    ///
    /// # Example
    /// ```ignore
    /// Response::ok(json!({"message": "Success"}))
    /// Response::ok(&posts) // anything that implements Serialize
    /// ```
    pub fn ok<T: Serialize>(body: T) -> Self {
        Self::json(200, body)
    }

    /// Create a JSON response with a custom status code.
    pub fn json<T: Serialize>(status: u16, body: T) -> Self {
        Self::new(status)
            .with_header("Content-Type", "application/json")
            .with_optional_body(serde_json::to_string(&body).ok())
    }

    /// Create a plain text response.
    ///
    /// # Example
    /// ```
    /// use codex_edge_sdk::Response;
    ///
    /// let res = Response::text(200, "It works");
    /// assert_eq!(res.body.as_deref(), Some("It works"));
    /// ```
    pub fn text(status: u16, body: impl Into<String>) -> Self {
        Self::new(status)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(body)
    }

    /// Create a 404 Not Found response with a plain text message.
    pub fn not_found_msg(message: impl Into<String>) -> Self {
        Self::text(404, message)
    }

    /// Add a header to the response (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_header(key, value);
        self
    }

    /// Set the body (builder pattern).
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    fn with_optional_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    /// Set a header, replacing any existing header with the same name
    /// regardless of case.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        self.headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
        self.headers.insert(key, value.into());
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true for 2xx status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl Default for Response {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut res = Response::text(200, "hi");
        res.set_header("content-type", "application/json");

        assert_eq!(res.headers.len(), 1);
        assert_eq!(res.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_json_response() {
        let res = Response::ok(serde_json::json!({"slug": "a"}));
        assert_eq!(res.status, 200);
        assert!(res.is_success());
        assert_eq!(res.body.as_deref(), Some(r#"{"slug":"a"}"#));
        assert_eq!(res.header("content-type"), Some("application/json"));
    }
}
