#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

mod error;
mod fetch;
mod manifest;
mod response;
mod storage;
mod worker;

// ============================================================================
// Public API
// ============================================================================

// Lifecycle
pub use worker::{DEFAULT_ORIGIN, OfflineCache, ServedFrom, ServedResponse, WorkerState};

// Manifest
pub use manifest::{CacheManifest, DEFAULT_ASSETS, DEFAULT_CACHE_PREFIX, DEFAULT_CACHE_VERSION};

// Ports and adapters
pub use fetch::{DEFAULT_FETCH_TIMEOUT, Fetcher, HttpFetcher};
pub use response::AssetResponse;
pub use storage::{CacheStorage, FsCacheStorage, MemoryCacheStorage};

// Errors
pub use error::{CacheError, CacheResult};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
