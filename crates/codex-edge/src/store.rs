//! Post store - key-value listing and fetch
//!
//! Every post is stored as one JSON document under its own key. The store is
//! passed to request handling explicitly; nothing here is global.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use codex_edge_sdk::handler::BoxFuture;
use codex_edge_sdk::HandlerError;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// A blog post as stored in the key-value store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub filename: String,
    #[serde(rename = "contentURI")]
    pub content_uri: String,
    pub body: String,
    pub slug: String,
    pub date: DateTime<Utc>,
}

/// Errors from the key-value store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Malformed value for key {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for HandlerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidKey(key) => HandlerError::BadRequest(format!("Invalid key: {}", key)),
            other => HandlerError::Unavailable(other.to_string()),
        }
    }
}

/// Key-value store interface
pub trait KvStore: Send + Sync {
    /// All keys currently in the store
    fn list_keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>>;

    /// Value stored under `key`, if any
    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>>;
}

/// In-memory store, used for tests and local development
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<DashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Store a post as JSON under its slug
    pub fn put_post(&self, post: &Post) -> Result<(), StoreError> {
        let json = serde_json::to_string(post).map_err(|source| StoreError::Malformed {
            key: post.slug.clone(),
            source,
        })?;
        self.put(post.slug.clone(), json);
        Ok(())
    }
}

impl KvStore for MemoryStore {
    fn list_keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        Box::pin(std::future::ready(Ok(keys)))
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        let value = self.entries.get(key).map(|v| v.value().clone());
        Box::pin(std::future::ready(Ok(value)))
    }
}

/// Directory-backed store: each regular file is one entry, keyed by file name
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key == "." || key == ".." {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }
}

impl KvStore for DirStore {
    fn list_keys(&self) -> BoxFuture<'_, Result<Vec<String>, StoreError>> {
        Box::pin(async move {
            let mut entries = tokio::fs::read_dir(&self.root).await?;
            let mut keys = Vec::new();

            while let Some(entry) = entries.next_entry().await? {
                if !entry.file_type().await?.is_file() {
                    continue;
                }
                match entry.file_name().into_string() {
                    Ok(name) => keys.push(name),
                    Err(name) => tracing::warn!(?name, "Skipping non UTF-8 store key"),
                }
            }

            keys.sort();
            Ok(keys)
        })
    }

    fn get<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, StoreError>> {
        Box::pin(async move {
            let path = self.path_for(key)?;
            match tokio::fs::read_to_string(&path).await {
                Ok(value) => Ok(Some(value)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}

/// Fetch and parse every post in the store.
///
/// Values are fetched concurrently. Missing or empty values are skipped;
/// a value that is not a valid post is an error.
pub async fn get_all_posts(store: &dyn KvStore) -> Result<Vec<Post>, StoreError> {
    let keys = store.list_keys().await?;
    let values = futures::future::try_join_all(keys.iter().map(|key| store.get(key))).await?;

    let mut posts = Vec::with_capacity(keys.len());
    for (key, value) in keys.iter().zip(values) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            continue;
        };
        let post = serde_json::from_str(&value).map_err(|source| StoreError::Malformed {
            key: key.clone(),
            source,
        })?;
        posts.push(post);
    }

    tracing::debug!(count = posts.len(), "Loaded posts from store");
    Ok(posts)
}

/// Value under `key`, or `default` when it is missing or empty.
pub async fn get_from_store(
    store: &dyn KvStore,
    key: &str,
    default: Option<&str>,
) -> Result<Option<String>, StoreError> {
    let value = store.get(key).await?.filter(|v| !v.is_empty());
    Ok(value.or_else(|| default.map(str::to_string)))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn sample_post(slug: &str, body: &str) -> Post {
        Post {
            filename: format!("{}.md", slug),
            content_uri: format!("posts/{}.md", slug),
            body: body.to_string(),
            slug: slug.to_string(),
            date: Utc.with_ymd_and_hms(2019, 6, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_post_wire_format() {
        let post = sample_post("hello", "Hi");
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["contentURI"], "posts/hello.md");
        assert_eq!(json["date"], "2019-06-01T12:00:00Z");

        let back: Post = serde_json::from_value(json).unwrap();
        assert_eq!(back, post);
    }

    #[tokio::test]
    async fn test_get_all_posts_from_memory() {
        let store = MemoryStore::new();
        store.put_post(&sample_post("b", "second")).unwrap();
        store.put_post(&sample_post("a", "first")).unwrap();
        store.put("empty", "");

        let posts = get_all_posts(&store).await.unwrap();
        let slugs: Vec<&str> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["a", "b"]);
    }

    #[tokio::test]
    async fn test_malformed_value_is_an_error() {
        let store = MemoryStore::new();
        store.put("broken", "{not json");

        let err = get_all_posts(&store).await.unwrap_err();
        assert!(matches!(err, StoreError::Malformed { ref key, .. } if key == "broken"));
        assert_eq!(HandlerError::from(err).status_code(), 503);
    }

    #[tokio::test]
    async fn test_get_from_store_default() {
        let store = MemoryStore::new();
        store.put("present", "value");
        store.put("blank", "");

        assert_eq!(
            get_from_store(&store, "present", Some("d")).await.unwrap().as_deref(),
            Some("value")
        );
        assert_eq!(
            get_from_store(&store, "blank", Some("d")).await.unwrap().as_deref(),
            Some("d")
        );
        assert_eq!(get_from_store(&store, "missing", None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_dir_store() {
        let dir = tempfile::tempdir().unwrap();
        let post = sample_post("hello-there", "Hello");
        std::fs::write(
            dir.path().join("hello-there"),
            serde_json::to_string(&post).unwrap(),
        )
        .unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let store = DirStore::new(dir.path());
        assert_eq!(store.list_keys().await.unwrap(), ["hello-there"]);
        assert!(store.get("missing").await.unwrap().is_none());
        assert!(matches!(
            store.get("../etc").await,
            Err(StoreError::InvalidKey(_))
        ));

        let posts = get_all_posts(&store).await.unwrap();
        assert_eq!(posts, [post]);
    }

    #[tokio::test]
    async fn test_dir_store_missing_root() {
        let store = DirStore::new("/nonexistent/codex-edge-test");
        assert!(matches!(store.list_keys().await, Err(StoreError::Io(_))));
    }
}
