//! Named asset stores.
//!
//! A store is a set of URL -> response entries under one name. The worker
//! only ever writes a store in one batch, so implementations must make
//! `put_all` all-or-nothing: readers see either the old entries or every
//! new one.

mod fs;
mod memory;

pub use fs::FsCacheStorage;
pub use memory::MemoryCacheStorage;

use async_trait::async_trait;

use crate::error::{CacheError, CacheResult};
use crate::response::AssetResponse;

/// Backing store for named caches.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Names of all stores, sorted.
    async fn keys(&self) -> CacheResult<Vec<String>>;

    /// Whether a store with this name exists.
    async fn has(&self, name: &str) -> CacheResult<bool>;

    /// Delete a store. Returns `false` if it did not exist.
    async fn delete(&self, name: &str) -> CacheResult<bool>;

    /// Add every response to the store, creating it if needed.
    ///
    /// Entries already in the store are kept unless replaced by URL.
    async fn put_all(&self, name: &str, responses: Vec<AssetResponse>) -> CacheResult<()>;

    /// Look up one URL in a store.
    async fn lookup(&self, name: &str, url: &str) -> CacheResult<Option<AssetResponse>>;

    /// URLs held by a store, sorted. Empty if the store does not exist.
    async fn entries(&self, name: &str) -> CacheResult<Vec<String>>;
}

/// Reject names that cannot be used as a directory name.
pub(crate) fn validate_name(name: &str) -> CacheResult<()> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());
    if bad {
        return Err(CacheError::InvalidName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("psyrang-planner-v1.1").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(".staging").is_err());
        assert!(validate_name("../escape").is_err());
        assert!(validate_name("a/b").is_err());
        assert!(validate_name("a\\b").is_err());
    }
}
