//! Response cache actor
//!
//! Keeps serialized responses in memory, keyed by the full request URL, with
//! a time-to-live. Handlers consult it before computing a fresh response; the
//! router itself never touches it.

pub mod actor;

use std::collections::HashMap;
use std::time::{Duration, Instant};

use codex_edge_sdk::{HandlerError, Request, Response};
use tokio::sync::{mpsc, oneshot};

use actor::{spawn_actor, ActorError, ActorHandle, ActorMessage};

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied to stored responses; zero disables expiry
    pub ttl: Duration,

    /// Maximum number of stored entries. Expired entries are swept first,
    /// then the oldest entries are evicted.
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300),
            max_entries: 1000,
        }
    }
}

/// Errors related to cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(#[from] ActorError),

    #[error("Cached response could not be encoded: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<CacheError> for HandlerError {
    fn from(err: CacheError) -> Self {
        HandlerError::Unavailable(err.to_string())
    }
}

/// Commands sent to the cache actor
enum CacheCommand {
    Get {
        key: String,
        reply: oneshot::Sender<Option<String>>,
    },
    Set {
        key: String,
        value: String,
        reply: oneshot::Sender<()>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
}

impl ActorMessage for CacheCommand {}

/// Cache entry with expiration
struct CacheEntry {
    value: String,
    seq: u64,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at.map(|e| Instant::now() > e).unwrap_or(false)
    }
}

/// Response cache handle - cheap to clone
#[derive(Clone, Debug)]
pub struct ResponseCache {
    handle: ActorHandle<CacheCommand>,
}

impl ResponseCache {
    /// Start the cache actor and return a handle
    pub fn start(config: CacheConfig) -> Self {
        let handle = spawn_actor(100, move |rx| cache_actor(config, rx));
        Self { handle }
    }

    /// Cached response for this request, if present and not expired.
    pub async fn lookup(&self, req: &Request) -> Result<Option<Response>, CacheError> {
        let key = cache_key(req);
        let cached = self
            .handle
            .request(|reply| CacheCommand::Get { key: key.clone(), reply })
            .await?;

        match cached {
            Some(json) => {
                tracing::debug!(key = %key, "Cache hit");
                Ok(Some(serde_json::from_str(&json)?))
            }
            None => Ok(None),
        }
    }

    /// Store a response for this request.
    pub async fn store(&self, req: &Request, response: &Response) -> Result<(), CacheError> {
        let value = serde_json::to_string(response)?;
        let key = cache_key(req);
        self.handle
            .request(|reply| CacheCommand::Set { key, value, reply })
            .await?;
        Ok(())
    }

    /// Number of stored entries, expired ones included until swept.
    pub async fn len(&self) -> Result<usize, CacheError> {
        Ok(self.handle.request(|reply| CacheCommand::Len { reply }).await?)
    }
}

fn cache_key(req: &Request) -> String {
    format!("{} {}", req.method.to_ascii_uppercase(), req.url)
}

/// The cache actor loop
async fn cache_actor(config: CacheConfig, mut rx: mpsc::Receiver<CacheCommand>) {
    tracing::info!(
        ttl_secs = config.ttl.as_secs(),
        max_entries = config.max_entries,
        "Starting response cache"
    );

    let mut store: HashMap<String, CacheEntry> = HashMap::new();
    let mut next_seq: u64 = 0;

    while let Some(cmd) = rx.recv().await {
        match cmd {
            CacheCommand::Get { key, reply } => {
                let value = match store.get(&key) {
                    Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
                    Some(_) => {
                        store.remove(&key);
                        None
                    }
                    None => None,
                };
                let _ = reply.send(value);
            }

            CacheCommand::Set { key, value, reply } => {
                let expires_at = (!config.ttl.is_zero()).then(|| Instant::now() + config.ttl);
                next_seq += 1;
                store.insert(
                    key,
                    CacheEntry {
                        value,
                        seq: next_seq,
                        expires_at,
                    },
                );
                enforce_capacity(&mut store, config.max_entries);
                let _ = reply.send(());
            }

            CacheCommand::Len { reply } => {
                let _ = reply.send(store.len());
            }
        }
    }

    tracing::info!("Response cache stopped");
}

/// Sweep expired entries, then evict the oldest until `store` fits.
fn enforce_capacity(store: &mut HashMap<String, CacheEntry>, max_entries: usize) {
    if store.len() <= max_entries {
        return;
    }

    store.retain(|_, v| !v.is_expired());

    while store.len() > max_entries {
        let Some(oldest) = store
            .iter()
            .min_by_key(|(_, v)| v.seq)
            .map(|(k, _)| k.clone())
        else {
            break;
        };
        tracing::debug!(key = %oldest, "Evicting cached response");
        store.remove(&oldest);
    }
}
