//! The cache tier contract.

use futures::future::BoxFuture;

/// Errors from a cache tier.
///
/// The orchestrator never surfaces these to callers: a failed `get` counts as
/// a miss and a failed `set` is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache entry serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One level of a tiered key/value cache.
///
/// Values are opaque bytes. Each tier stores its own copy, so a tier is free
/// to drop, expire or overwrite entries at any time.
pub trait CacheTier: Send + Sync {
    /// Short name for log output.
    fn name(&self) -> &str;

    /// Look up a key. `Ok(None)` is a miss.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>>;

    /// Store a value, replacing any previous one.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>>;
}
