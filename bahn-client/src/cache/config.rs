//! Tier configuration.

use std::path::PathBuf;
use std::time::Duration;

use super::{CacheTier, DiskTier, MemoryTier};

/// Configuration for the cache tiers.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for in-memory entries.
    pub memory_ttl: Duration,

    /// Maximum number of in-memory entries.
    pub memory_capacity: u64,

    /// Directory for the disk tier. No disk tier when `None`.
    pub disk_dir: Option<PathBuf>,

    /// TTL for disk entries.
    pub disk_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            memory_ttl: Duration::from_secs(60),
            memory_capacity: 1000,
            disk_dir: None,
            disk_ttl: super::disk::DEFAULT_TTL,
        }
    }
}

impl CacheConfig {
    /// Enable the disk tier in `dir`.
    pub fn with_disk_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.disk_dir = Some(dir.into());
        self
    }

    /// Build the tiers, fastest first: memory, then disk if configured.
    pub fn build_tiers(&self) -> Vec<Box<dyn CacheTier>> {
        let mut tiers: Vec<Box<dyn CacheTier>> = vec![Box::new(MemoryTier::new(
            self.memory_ttl,
            self.memory_capacity,
        ))];
        if let Some(dir) = &self.disk_dir {
            tiers.push(Box::new(DiskTier::new(dir).with_ttl(self.disk_ttl)));
        }
        tiers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_memory_only() {
        let tiers = CacheConfig::default().build_tiers();
        let names: Vec<_> = tiers.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["memory"]);
    }

    #[test]
    fn disk_comes_after_memory() {
        let tiers = CacheConfig::default()
            .with_disk_dir("/tmp/bahn-cache")
            .build_tiers();
        let names: Vec<_> = tiers.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["memory", "disk"]);
    }
}
