//! In-process cache tier backed by moka.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use moka::future::Cache as MokaCache;

use super::{CacheError, CacheTier};

/// Bounded in-memory tier with a time-to-live.
#[derive(Clone)]
pub struct MemoryTier {
    entries: MokaCache<String, Arc<[u8]>>,
}

impl MemoryTier {
    /// Create a tier holding at most `max_capacity` entries for `ttl` each.
    pub fn new(ttl: Duration, max_capacity: u64) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(ttl)
            .max_capacity(max_capacity)
            .build();
        Self { entries }
    }

    /// Approximate number of live entries (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.entries.entry_count()
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }
}

impl CacheTier for MemoryTier {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let key = key.to_string();
        Box::pin(async move { Ok(self.entries.get(&key).await.map(|v| v.to_vec())) })
    }

    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let key = key.to_string();
        Box::pin(async move {
            self.entries.insert(key, Arc::from(value)).await;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let tier = MemoryTier::new(Duration::from_secs(60), 100);
        assert_eq!(tier.get("a").await.unwrap(), None);

        tier.set("a", b"hello".to_vec()).await.unwrap();
        assert_eq!(tier.get("a").await.unwrap(), Some(b"hello".to_vec()));
        assert_eq!(tier.get("b").await.unwrap(), None);
    }

    #[tokio::test]
    async fn last_write_wins() {
        let tier = MemoryTier::new(Duration::from_secs(60), 100);
        tier.set("k", b"one".to_vec()).await.unwrap();
        tier.set("k", b"two".to_vec()).await.unwrap();
        assert_eq!(tier.get("k").await.unwrap(), Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn expires_after_ttl() {
        let tier = MemoryTier::new(Duration::from_millis(50), 100);
        tier.set("k", b"v".to_vec()).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(tier.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn invalidate_all_clears() {
        let tier = MemoryTier::new(Duration::from_secs(60), 100);
        tier.set("k", b"v".to_vec()).await.unwrap();
        tier.invalidate_all();
        assert_eq!(tier.get("k").await.unwrap(), None);
    }
}
