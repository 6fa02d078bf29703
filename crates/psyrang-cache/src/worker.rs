//! Cache lifecycle: install a generation, activate it, serve from it.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::error::{CacheError, CacheResult};
use crate::fetch::Fetcher;
use crate::manifest::CacheManifest;
use crate::response::AssetResponse;
use crate::storage::CacheStorage;

/// Origin that relative manifest entries resolve against by default.
pub const DEFAULT_ORIGIN: &str = "http://localhost:8888/";

/// Lifecycle phase of one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Created, nothing done yet.
    Parsed,
    /// Fetching and storing the manifest assets.
    Installing,
    /// Current generation is stored.
    Installed,
    /// Removing older generations.
    Activating,
    /// Serving the current generation.
    Activated,
    /// Install failed; this worker will never activate.
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Parsed => "parsed",
            Self::Installing => "installing",
            Self::Installed => "installed",
            Self::Activating => "activating",
            Self::Activated => "activated",
            Self::Redundant => "redundant",
        };
        f.write_str(s)
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServedFrom {
    /// Current generation store.
    Cache,
    /// Network, after a cache miss.
    Network,
}

/// Result of intercepting one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResponse {
    /// The response, unmodified.
    pub response: AssetResponse,
    /// Where it came from.
    pub source: ServedFrom,
}

/// Versioned offline cache worker.
pub struct OfflineCache {
    manifest: CacheManifest,
    origin: Url,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    state: WorkerState,
    skipped_waiting: bool,
    clients_claimed: bool,
}

impl OfflineCache {
    /// Create a worker for `manifest`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Manifest`] if the manifest cannot name a store.
    pub fn new(
        manifest: CacheManifest,
        origin: Url,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
    ) -> CacheResult<Self> {
        manifest.validate()?;
        Ok(Self {
            manifest,
            origin,
            storage,
            fetcher,
            state: WorkerState::Parsed,
            skipped_waiting: false,
            clients_claimed: false,
        })
    }

    /// Store name of the current generation.
    #[must_use]
    pub fn cache_name(&self) -> String {
        self.manifest.cache_name()
    }

    #[must_use]
    pub const fn manifest(&self) -> &CacheManifest {
        &self.manifest
    }

    #[must_use]
    pub const fn origin(&self) -> &Url {
        &self.origin
    }

    #[must_use]
    pub const fn state(&self) -> WorkerState {
        self.state
    }

    /// Whether install asked to take over without waiting for old clients.
    #[must_use]
    pub const fn skipped_waiting(&self) -> bool {
        self.skipped_waiting
    }

    /// Whether activation claimed the open clients.
    #[must_use]
    pub const fn clients_claimed(&self) -> bool {
        self.clients_claimed
    }

    /// Resolve a manifest entry or request URL against the origin.
    pub fn resolve(&self, url: &str) -> CacheResult<Url> {
        self.origin.join(url).map_err(|e| CacheError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    /// Absolute asset URLs in manifest order, without duplicates.
    pub fn asset_urls(&self) -> CacheResult<Vec<Url>> {
        let mut seen = HashSet::new();
        let mut urls = Vec::with_capacity(self.manifest.assets.len());
        for asset in &self.manifest.assets {
            let url = self.resolve(asset)?;
            if seen.insert(url.to_string()) {
                urls.push(url);
            }
        }
        Ok(urls)
    }

    /// Fetch every manifest asset and store them as the current generation.
    ///
    /// Nothing is written unless every asset fetched with a 2xx status. On
    /// failure the worker becomes [`WorkerState::Redundant`].
    ///
    /// Returns the number of stored entries.
    pub async fn install(&mut self) -> CacheResult<usize> {
        self.state = WorkerState::Installing;
        self.skipped_waiting = true;

        match self.populate().await {
            Ok(count) => {
                self.state = WorkerState::Installed;
                info!(cache = %self.cache_name(), entries = count, "Cache installed");
                Ok(count)
            }
            Err(e) => {
                self.state = WorkerState::Redundant;
                error!(cache = %self.cache_name(), error = %e, "Cache install failed");
                Err(e)
            }
        }
    }

    async fn populate(&self) -> CacheResult<usize> {
        let name = self.cache_name();
        info!(cache = %name, "Opened cache and caching core assets");

        let urls = self.asset_urls()?;
        let responses = try_join_all(urls.iter().map(|url| self.fetch_asset(url))).await?;
        let count = responses.len();
        self.storage.put_all(&name, responses).await?;
        Ok(count)
    }

    async fn fetch_asset(&self, url: &Url) -> CacheResult<AssetResponse> {
        let populate = |reason: String| CacheError::Populate {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| populate(e.to_string()))?;
        if !response.is_ok() {
            return Err(populate(format!("status {}", response.status)));
        }
        response.url = url.to_string();
        Ok(response)
    }

    /// Pick up a generation installed by an earlier process.
    ///
    /// Returns `true` if the current store exists and the worker is now
    /// [`WorkerState::Installed`].
    pub async fn restore(&mut self) -> CacheResult<bool> {
        if self.state != WorkerState::Parsed {
            return Ok(matches!(
                self.state,
                WorkerState::Installed | WorkerState::Activated
            ));
        }
        let found = self.storage.has(&self.cache_name()).await?;
        if found {
            debug!(cache = %self.cache_name(), "Restored installed cache");
            self.state = WorkerState::Installed;
        }
        Ok(found)
    }

    /// Delete every other generation and claim clients.
    ///
    /// Returns the names of the deleted stores.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotInstalled`] unless install (or restore)
    /// succeeded first.
    pub async fn activate(&mut self) -> CacheResult<Vec<String>> {
        let current = self.cache_name();
        if self.state != WorkerState::Installed {
            return Err(CacheError::NotInstalled { name: current });
        }
        self.state = WorkerState::Activating;

        match self.remove_stale(&current).await {
            Ok(deleted) => {
                self.clients_claimed = true;
                self.state = WorkerState::Activated;
                info!(cache = %current, deleted = deleted.len(), "Cache activated");
                Ok(deleted)
            }
            Err(e) => {
                self.state = WorkerState::Installed;
                Err(e)
            }
        }
    }

    async fn remove_stale(&self, current: &str) -> CacheResult<Vec<String>> {
        let mut deleted = Vec::new();
        for name in self.storage.keys().await? {
            if name == current {
                continue;
            }
            info!("Deleting old cache: {name}");
            if self.storage.delete(&name).await? {
                deleted.push(name);
            } else {
                warn!(cache = %name, "Old cache disappeared before deletion");
            }
        }
        Ok(deleted)
    }

    /// Serve a request cache-first.
    ///
    /// A hit in the current generation never touches the network. A miss is
    /// fetched and returned as-is, without being stored.
    pub async fn handle_fetch(&self, url: &str) -> CacheResult<ServedResponse> {
        let url = self.resolve(url)?;
        let name = self.cache_name();

        if let Some(response) = self.storage.lookup(&name, url.as_str()).await? {
            debug!(%url, cache = %name, "Cache hit");
            return Ok(ServedResponse {
                response,
                source: ServedFrom::Cache,
            });
        }

        debug!(%url, cache = %name, "Cache miss, fetching from network");
        let response = self.fetcher.fetch(&url).await?;
        Ok(ServedResponse {
            response,
            source: ServedFrom::Network,
        })
    }
}

impl fmt::Debug for OfflineCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineCache")
            .field("cache_name", &self.cache_name())
            .field("origin", &self.origin.as_str())
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::MockFetcher;
    use crate::storage::MemoryCacheStorage;

    fn origin() -> Url {
        Url::parse(DEFAULT_ORIGIN).unwrap()
    }

    fn manifest(version: &str, assets: &[&str]) -> CacheManifest {
        CacheManifest {
            name: "app".to_string(),
            version: version.to_string(),
            assets: assets.iter().map(ToString::to_string).collect(),
        }
    }

    fn echo_fetcher() -> MockFetcher {
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|url| Ok(AssetResponse::ok(url.as_str(), Some("text/plain"), url.path())));
        fetcher
    }

    fn worker(
        manifest: CacheManifest,
        storage: &Arc<MemoryCacheStorage>,
        fetcher: MockFetcher,
    ) -> OfflineCache {
        OfflineCache::new(manifest, origin(), storage.clone(), Arc::new(fetcher)).unwrap()
    }

    #[tokio::test]
    async fn test_install_stores_every_asset() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut cache = worker(
            manifest("v1", &["/", "/index.html", "https://cdn.example/lib.js"]),
            &storage,
            echo_fetcher(),
        );

        assert_eq!(cache.install().await.unwrap(), 3);
        assert_eq!(cache.state(), WorkerState::Installed);
        assert!(cache.skipped_waiting());
        assert_eq!(
            storage.entries("app-v1").await.unwrap(),
            vec![
                "http://localhost:8888/",
                "http://localhost:8888/index.html",
                "https://cdn.example/lib.js",
            ]
        );
    }

    #[tokio::test]
    async fn test_install_dedupes_resolved_urls() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|url| Ok(AssetResponse::ok(url.as_str(), None, "x")));
        let mut cache = worker(
            manifest("v1", &["/index.html", "index.html", "http://localhost:8888/index.html"]),
            &storage,
            fetcher,
        );

        assert_eq!(cache.install().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_install_is_all_or_nothing() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .withf(|url| url.path() == "/missing.js")
            .returning(|url| {
                Ok(AssetResponse {
                    status: 404,
                    ..AssetResponse::ok(url.as_str(), None, "not found")
                })
            });
        fetcher
            .expect_fetch()
            .withf(|url| url.path() != "/missing.js")
            .returning(|url| Ok(AssetResponse::ok(url.as_str(), None, "ok")));
        let mut cache = worker(manifest("v1", &["/", "/missing.js"]), &storage, fetcher);

        let err = cache.install().await.unwrap_err();
        assert!(
            matches!(err, CacheError::Populate { ref url, ref reason } if url.ends_with("/missing.js") && reason.contains("404"))
        );
        assert_eq!(cache.state(), WorkerState::Redundant);
        assert!(!storage.has("app-v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_install_network_failure_writes_nothing() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            Err(CacheError::Network {
                url: url.to_string(),
                message: "connection refused".to_string(),
            })
        });
        let mut cache = worker(manifest("v1", &["/"]), &storage, fetcher);

        assert!(matches!(cache.install().await, Err(CacheError::Populate { .. })));
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activate_requires_install() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut cache = worker(manifest("v1", &["/"]), &storage, MockFetcher::new());

        let err = cache.activate().await.unwrap_err();
        assert_eq!(
            err,
            CacheError::NotInstalled {
                name: "app-v1".to_string()
            }
        );
        assert!(!cache.clients_claimed());
    }

    #[tokio::test]
    async fn test_activate_deletes_other_generations() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage.put_all("app-v0", Vec::new()).await.unwrap();
        storage.put_all("unrelated", Vec::new()).await.unwrap();

        let mut cache = worker(manifest("v1", &["/"]), &storage, echo_fetcher());
        cache.install().await.unwrap();

        let deleted = cache.activate().await.unwrap();
        assert_eq!(deleted, vec!["app-v0", "unrelated"]);
        assert_eq!(storage.keys().await.unwrap(), vec!["app-v1"]);
        assert_eq!(cache.state(), WorkerState::Activated);
        assert!(cache.clients_claimed());
    }

    #[tokio::test]
    async fn test_restore_allows_activation_in_new_worker() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage.put_all("app-v1", Vec::new()).await.unwrap();

        let mut cache = worker(manifest("v1", &["/"]), &storage, MockFetcher::new());
        assert!(cache.restore().await.unwrap());
        assert_eq!(cache.state(), WorkerState::Installed);
        assert!(cache.activate().await.is_ok());

        let mut fresh = worker(manifest("v2", &["/"]), &storage, MockFetcher::new());
        assert!(!fresh.restore().await.unwrap());
        assert_eq!(fresh.state(), WorkerState::Parsed);
    }

    #[tokio::test]
    async fn test_cache_hit_never_touches_network() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage
            .put_all(
                "app-v1",
                vec![AssetResponse::ok("http://localhost:8888/index.html", Some("text/html"), "<html>")],
            )
            .await
            .unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(0);
        let cache = worker(manifest("v1", &["/index.html"]), &storage, fetcher);

        let served = cache.handle_fetch("/index.html").await.unwrap();
        assert_eq!(served.source, ServedFrom::Cache);
        assert_eq!(served.response.body, b"<html>");
    }

    #[tokio::test]
    async fn test_old_generation_does_not_serve_hits() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage
            .put_all(
                "app-v0",
                vec![AssetResponse::ok("http://localhost:8888/app.js", None, "stale")],
            )
            .await
            .unwrap();
        let mut fetcher = MockFetcher::new();
        fetcher
            .expect_fetch()
            .times(1)
            .returning(|url| Ok(AssetResponse::ok(url.as_str(), None, "fresh")));
        let cache = worker(manifest("v1", &["/"]), &storage, fetcher);

        let served = cache.handle_fetch("/app.js").await.unwrap();
        assert_eq!(served.source, ServedFrom::Network);
        assert_eq!(served.response.body, b"fresh");
    }

    #[tokio::test]
    async fn test_cache_miss_is_not_written_back() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().times(1).returning(|url| {
            Ok(AssetResponse {
                status: 503,
                ..AssetResponse::ok(url.as_str(), None, "down")
            })
        });
        let cache = worker(manifest("v1", &["/"]), &storage, fetcher);

        let served = cache.handle_fetch("https://api.example/data").await.unwrap();
        assert_eq!(served.source, ServedFrom::Network);
        assert_eq!(served.response.status, 503);
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cache_miss_network_error_propagates() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let mut fetcher = MockFetcher::new();
        fetcher.expect_fetch().returning(|url| {
            Err(CacheError::Network {
                url: url.to_string(),
                message: "offline".to_string(),
            })
        });
        let cache = worker(manifest("v1", &["/"]), &storage, fetcher);

        assert!(matches!(
            cache.handle_fetch("/other.js").await,
            Err(CacheError::Network { .. })
        ));
    }

    #[test]
    fn test_new_rejects_invalid_manifest() {
        let result = OfflineCache::new(
            manifest("", &["/"]),
            origin(),
            Arc::new(MemoryCacheStorage::new()),
            Arc::new(MockFetcher::new()),
        );
        assert!(matches!(result, Err(CacheError::Manifest(_))));
    }
}
