//! Application configuration

use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the API listens on
    pub port: u16,

    /// Directory backing the post store (one JSON document per file)
    pub data_dir: PathBuf,

    /// Origin hosts (`host[:port]`) allowed to make cross-origin requests
    pub cors_hosts: Vec<String>,

    /// Time-to-live for cached responses in seconds
    pub cache_ttl_secs: u64,

    /// Number of cached responses before expired entries are swept
    pub cache_max_entries: usize,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("CODEX_EDGE_PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),

            data_dir: lookup("CODEX_EDGE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./data/posts")),

            cors_hosts: lookup("CODEX_EDGE_CORS_HOSTS")
                .map(|s| parse_list(&s))
                .unwrap_or_else(|| vec!["localhost:3000".to_string()]),

            cache_ttl_secs: lookup("CODEX_EDGE_CACHE_TTL_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(300),

            cache_max_entries: lookup("CODEX_EDGE_CACHE_MAX_ENTRIES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1000),

            request_timeout_secs: lookup("CODEX_EDGE_REQUEST_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),

            max_body_bytes: lookup("CODEX_EDGE_MAX_BODY_BYTES")
                .and_then(|s| s.parse().ok())
                .unwrap_or(1024 * 1024),
        }
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("./data/posts"));
        assert_eq!(config.cors_hosts, ["localhost:3000"]);
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CODEX_EDGE_PORT", "9000"),
            ("CODEX_EDGE_CORS_HOSTS", "blog.example.com, localhost:8000,,"),
            ("CODEX_EDGE_CACHE_TTL_SECS", "not-a-number"),
        ]
        .into();

        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.port, 9000);
        assert_eq!(config.cors_hosts, ["blog.example.com", "localhost:8000"]);
        // unparseable values fall back to defaults
        assert_eq!(config.cache_ttl_secs, 300);
    }
}
