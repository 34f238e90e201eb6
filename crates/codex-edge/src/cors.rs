//! Cross-origin header augmentation
//!
//! Applied to the router's response after dispatch. Preflight (OPTIONS)
//! requests and origins outside the allowlist are left untouched.

use codex_edge_sdk::{Method, Request, Response};
use url::Url;

/// Methods advertised to allowed origins
pub const CORS_METHODS: [Method; 2] = [Method::Get, Method::Options];

/// Origin allowlist
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    allowed_hosts: Vec<String>,
}

impl CorsPolicy {
    /// `hosts` are compared against the origin's `host[:port]`.
    pub fn new(hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed_hosts: hosts.into_iter().map(Into::into).collect(),
        }
    }

    /// Add CORS headers to `response` when the request's origin is allowed.
    pub fn apply(&self, req: &Request, response: &mut Response) {
        let Some(origin) = req.header("Origin") else {
            return;
        };
        if Method::Options.matches(&req.method) {
            return;
        }

        let origin_url = match Url::parse(origin) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(origin = %origin, error = %e, "Ignoring unparseable origin");
                return;
            }
        };
        let Some(host) = origin_host(&origin_url) else {
            return;
        };
        if !self.allowed_hosts.iter().any(|h| *h == host) {
            tracing::debug!(host = %host, "Origin not in CORS allowlist");
            return;
        }

        let methods: Vec<&str> = CORS_METHODS.iter().map(Method::as_str).collect();
        response.set_header(
            "Access-Control-Allow-Origin",
            format!("{}://{}", origin_url.scheme(), host),
        );
        response.set_header("Access-Control-Allow-Methods", methods.join(", "));
    }
}

fn origin_host(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}
