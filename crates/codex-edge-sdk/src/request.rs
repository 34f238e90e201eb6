//! HTTP Request representation for handlers

use std::collections::HashMap;
use url::Url;

/// Represents an incoming HTTP request
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method as received (GET, get, OPTIONS, ...)
    pub method: String,

    /// Full request URL, including host and query
    pub url: Url,

    /// HTTP headers
    pub headers: HashMap<String, String>,

    /// Request ID for tracing
    pub request_id: String,
}

impl Request {
    /// Create a request for the given method and absolute URL.
    ///
    /// # Example
    /// ```
    /// use codex_edge_sdk::Request;
    ///
    /// let req = Request::new("GET", "http://example.com/posts?page=2").unwrap();
    /// assert_eq!(req.path(), "/posts");
    /// ```
    pub fn new(method: impl Into<String>, url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            method: method.into(),
            url: Url::parse(url)?,
            headers: HashMap::new(),
            request_id: String::new(),
        })
    }

    /// Shorthand for a GET request.
    pub fn get(url: &str) -> Result<Self, url::ParseError> {
        Self::new("GET", url)
    }

    /// Path component of the URL. An empty path is reported as `/`.
    pub fn path(&self) -> &str {
        match self.url.path() {
            "" => "/",
            path => path,
        }
    }

    /// Add a header (builder pattern).
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request ID (builder pattern).
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Get a header value (case-insensitive lookup).
    pub fn header(&self, key: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }
}
