//! Tiered response cache.
//!
//! A cache is an ordered list of [`CacheTier`]s, fastest first. Tiers only
//! see opaque bytes; the API client serialises values before storing them
//! and decides how lookups, promotions and fills flow between tiers.

mod config;
mod disk;
mod memory;
mod tier;

pub use config::CacheConfig;
pub use disk::DiskTier;
pub use memory::MemoryTier;
pub use tier::{CacheError, CacheTier};
