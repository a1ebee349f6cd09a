//! On-disk cache tier: one JSON file per key.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::{CacheError, CacheTier};

/// Default entry lifetime: 24 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Distinguishes temp files of concurrent writes within this process.
static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// File contents for one entry.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    /// The full key, to detect file name collisions.
    key: String,
    /// Unix timestamp when the entry was written.
    cached_at_secs: u64,
    /// Base64 of the stored bytes.
    value: String,
}

/// A directory of cache files, with a time-to-live checked on read.
#[derive(Debug, Clone)]
pub struct DiskTier {
    dir: PathBuf,
    ttl: Duration,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl DiskTier {
    /// Create a tier rooted at `dir` with the default TTL (24 hours).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ttl: DEFAULT_TTL,
        }
    }

    /// Set a custom TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Get the cache directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Get the entry TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// SHA-256 of the key, so names stay the same across builds.
    fn key_to_filename(key: &str) -> String {
        format!("{:x}.json", Sha256::digest(key.as_bytes()))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let sequence = WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        path.with_extension(format!("{}.{sequence}.tmp", std::process::id()))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(Self::key_to_filename(key))
    }

    fn unwrap_envelope(&self, key: &str, contents: &[u8]) -> Option<Vec<u8>> {
        let envelope: Envelope = match serde_json::from_slice(contents) {
            Ok(envelope) => envelope,
            Err(e) => {
                debug!(key, error = %e, "unreadable disk cache entry");
                return None;
            }
        };
        if envelope.key != key {
            debug!(key, stored = %envelope.key, "disk cache file name collision");
            return None;
        }
        let age_secs = now_secs().saturating_sub(envelope.cached_at_secs);
        if age_secs >= self.ttl.as_secs() {
            return None;
        }
        STANDARD.decode(envelope.value).ok()
    }
}

impl CacheTier for DiskTier {
    fn name(&self) -> &str {
        "disk"
    }

    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>> {
        let path = self.key_path(key);
        let key = key.to_string();
        Box::pin(async move {
            match tokio::fs::read(&path).await {
                Ok(contents) => Ok(self.unwrap_envelope(&key, &contents)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CacheError::Io(e)),
            }
        })
    }

    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>> {
        let path = self.key_path(key);
        let envelope = Envelope {
            key: key.to_string(),
            cached_at_secs: now_secs(),
            value: STANDARD.encode(value),
        };
        Box::pin(async move {
            let json = serde_json::to_vec(&envelope)?;
            tokio::fs::create_dir_all(&self.dir).await?;

            // Each write renames its own temp file into place
            let temp_path = Self::temp_path(&path);
            tokio::fs::write(&temp_path, &json).await?;
            if let Err(e) = tokio::fs::rename(&temp_path, &path).await {
                let _ = tokio::fs::remove_file(&temp_path).await;
                return Err(e.into());
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[tokio::test]
    async fn set_then_get() {
        let dir = tempdir().unwrap();
        let tier = DiskTier::new(dir.path());

        assert_eq!(tier.get("station 8000105").await.unwrap(), None);
        tier.set("station 8000105", b"[1,2,3]".to_vec()).await.unwrap();
        assert_eq!(
            tier.get("station 8000105").await.unwrap(),
            Some(b"[1,2,3]".to_vec())
        );
    }

    #[tokio::test]
    async fn survives_a_new_instance() {
        let dir = tempdir().unwrap();
        DiskTier::new(dir.path())
            .set("k", b"persisted".to_vec())
            .await
            .unwrap();

        let reopened = DiskTier::new(dir.path());
        assert_eq!(reopened.get("k").await.unwrap(), Some(b"persisted".to_vec()));
    }

    #[tokio::test]
    async fn expired_entry_is_a_miss() {
        let dir = tempdir().unwrap();
        let tier = DiskTier::new(dir.path()).with_ttl(Duration::from_secs(0));

        tier.set("k", b"v".to_vec()).await.unwrap();

        // With 0 TTL, the entry is immediately expired
        assert_eq!(tier.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn creates_missing_directories() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("nested").join("cache");
        let tier = DiskTier::new(&nested);

        tier.set("k", b"v".to_vec()).await.unwrap();
        assert!(nested.exists());
        assert_eq!(tier.get("k").await.unwrap(), Some(b"v".to_vec()));
    }

    #[tokio::test]
    async fn colliding_file_is_a_miss() {
        let dir = tempdir().unwrap();
        let tier = DiskTier::new(dir.path());

        // Simulate a collision: another key's envelope under this key's file name
        let envelope = Envelope {
            key: "some other key".to_string(),
            cached_at_secs: now_secs(),
            value: STANDARD.encode(b"wrong"),
        };
        std::fs::write(
            tier.key_path("k"),
            serde_json::to_vec(&envelope).unwrap(),
        )
        .unwrap();

        assert_eq!(tier.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_file_is_a_miss() {
        let dir = tempdir().unwrap();
        let tier = DiskTier::new(dir.path());
        std::fs::write(tier.key_path("k"), b"not json").unwrap();
        assert_eq!(tier.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn concurrent_writes_to_one_key_all_succeed() {
        let dir = tempdir().unwrap();
        let tier = Arc::new(DiskTier::new(dir.path()));

        let writers: Vec<_> = (0..8u8)
            .map(|i| {
                let tier = Arc::clone(&tier);
                tokio::spawn(async move {
                    for _ in 0..20 {
                        tier.set("k", vec![i; 64 * 1024]).await?;
                    }
                    Ok::<_, CacheError>(())
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap().unwrap();
        }

        // Last write wins: one whole value, no leftover temp files
        let value = tier.get("k").await.unwrap().unwrap();
        assert_eq!(value.len(), 64 * 1024);
        assert!(value.iter().all(|b| *b == value[0]));
        let files: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn file_names_are_stable_and_distinct() {
        // Fixed digest, independent of the toolchain
        assert_eq!(
            DiskTier::key_to_filename(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.json"
        );
        assert_eq!(
            DiskTier::key_to_filename("station 1"),
            DiskTier::key_to_filename("station 1")
        );
        assert_ne!(
            DiskTier::key_to_filename("station 1"),
            DiskTier::key_to_filename("station 2")
        );
        assert!(DiskTier::key_to_filename("x").ends_with(".json"));
    }
}
