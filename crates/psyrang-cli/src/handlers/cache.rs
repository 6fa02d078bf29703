//! Cache command handlers.
//!
//! Each invocation is a fresh worker over the on-disk store, so `activate`
//! and `fetch` first pick up whatever generation an earlier `install` left.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use psyrang_cache::{
    CacheError, CacheManifest, CacheStorage, FsCacheStorage, HttpFetcher, OfflineCache,
    ServedFrom,
};
use tracing::{debug, info};

use crate::commands::{CacheCommand, CacheOptions};
use crate::error::CliError;

/// Default store location under the platform data directory.
pub fn default_store_dir() -> Result<PathBuf, CliError> {
    dirs::data_local_dir()
        .map(|dir| dir.join("psyrang").join("cache"))
        .ok_or_else(|| {
            CliError::Config("cannot determine a data directory; pass --store-dir".to_string())
        })
}

async fn load_manifest(path: Option<&Path>) -> Result<CacheManifest, CliError> {
    match path {
        Some(path) => Ok(CacheManifest::from_json_file(path).await?),
        None => Ok(CacheManifest::default()),
    }
}

/// Execute a cache command against the filesystem store.
pub async fn execute(options: &CacheOptions, command: CacheCommand) -> Result<(), CliError> {
    let store_dir = match &options.store_dir {
        Some(dir) => dir.clone(),
        None => default_store_dir()?,
    };
    debug!(store = %store_dir.display(), "Using cache store");

    let storage = Arc::new(FsCacheStorage::new(store_dir));
    let manifest = load_manifest(options.manifest.as_deref()).await?;
    let fetcher = Arc::new(HttpFetcher::new()?);
    let mut worker =
        OfflineCache::new(manifest, options.origin.clone(), storage.clone(), fetcher)?;

    match command {
        CacheCommand::Install => install(&mut worker).await,
        CacheCommand::Activate => activate(&mut worker).await,
        CacheCommand::List => list(&worker, storage.as_ref()).await,
        CacheCommand::Fetch { url, output } => fetch(&mut worker, &url, output.as_deref()).await,
    }
}

/// Install the current generation.
pub async fn install(worker: &mut OfflineCache) -> Result<(), CliError> {
    let count = worker.install().await?;
    println!("Installed {count} assets into {}", worker.cache_name());
    Ok(())
}

/// Activate the current generation, deleting the others.
pub async fn activate(worker: &mut OfflineCache) -> Result<(), CliError> {
    worker.restore().await?;
    let deleted = worker.activate().await?;

    if deleted.is_empty() {
        println!("{} is active; no old caches to delete", worker.cache_name());
    } else {
        for name in &deleted {
            println!("Deleted {name}");
        }
        println!("{} is active", worker.cache_name());
    }
    Ok(())
}

/// Print every stored generation, marking the current one.
pub async fn list(worker: &OfflineCache, storage: &dyn CacheStorage) -> Result<(), CliError> {
    let current = worker.cache_name();
    let names = storage.keys().await?;
    if names.is_empty() {
        println!("No cache generations stored");
        return Ok(());
    }

    for name in names {
        let entries = storage.entries(&name).await?.len();
        let marker = if name == current { "*" } else { " " };
        println!("{marker} {name} ({entries} entries)");
    }
    Ok(())
}

/// Serve one URL cache-first and write its body.
///
/// A non-2xx response is still written, then reported as an error.
pub async fn fetch(
    worker: &mut OfflineCache,
    url: &str,
    output: Option<&Path>,
) -> Result<(), CliError> {
    worker.restore().await?;
    let served = worker.handle_fetch(url).await?;
    let response = served.response;

    let source = match served.source {
        ServedFrom::Cache => "cache",
        ServedFrom::Network => "network",
    };
    info!(url = %response.url, status = response.status, source, "Served");

    match output {
        Some(path) => tokio::fs::write(path, &response.body).await?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&response.body)?;
            stdout.flush()?;
        }
    }

    if response.is_ok() {
        Ok(())
    } else {
        Err(CacheError::BadStatus {
            url: response.url,
            status: response.status,
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use psyrang_cache::{AssetResponse, CacheResult, Fetcher, MemoryCacheStorage};
    use tempfile::TempDir;
    use url::Url;

    /// Answers every URL with its own text and a fixed status.
    struct FixedNetwork {
        status: u16,
    }

    #[async_trait]
    impl Fetcher for FixedNetwork {
        async fn fetch(&self, url: &Url) -> CacheResult<AssetResponse> {
            Ok(AssetResponse {
                status: self.status,
                ..AssetResponse::ok(url.as_str(), Some("text/plain"), url.as_str())
            })
        }
    }

    fn worker(storage: &Arc<MemoryCacheStorage>, status: u16) -> OfflineCache {
        let manifest = CacheManifest {
            name: "planner".to_string(),
            version: "v1".to_string(),
            assets: vec!["/".to_string(), "/app.js".to_string()],
        };
        OfflineCache::new(
            manifest,
            Url::parse("https://planner.example/").unwrap(),
            storage.clone(),
            Arc::new(FixedNetwork { status }),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_install_then_activate_in_fresh_worker() {
        let storage = Arc::new(MemoryCacheStorage::new());
        storage.put_all("planner-v0", Vec::new()).await.unwrap();

        install(&mut worker(&storage, 200)).await.unwrap();
        activate(&mut worker(&storage, 200)).await.unwrap();

        assert_eq!(storage.keys().await.unwrap(), vec!["planner-v1"]);
        list(&worker(&storage, 200), storage.as_ref()).await.unwrap();
    }

    #[tokio::test]
    async fn test_activate_without_install_fails() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let err = activate(&mut worker(&storage, 200)).await.unwrap_err();
        assert!(matches!(err, CliError::Cache(_)));
    }

    #[tokio::test]
    async fn test_install_failure_maps_to_network_error() {
        let storage = Arc::new(MemoryCacheStorage::new());
        let err = install(&mut worker(&storage, 404)).await.unwrap_err();
        assert_eq!(err.exit_code(), 69);
        assert!(storage.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_writes_body_to_output() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("app.js");
        let storage = Arc::new(MemoryCacheStorage::new());

        fetch(&mut worker(&storage, 200), "/app.js", Some(output.as_path()))
            .await
            .unwrap();
        assert_eq!(
            std::fs::read_to_string(&output).unwrap(),
            "https://planner.example/app.js"
        );
    }

    #[tokio::test]
    async fn test_fetch_error_status_still_writes_body() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("missing");
        let storage = Arc::new(MemoryCacheStorage::new());

        let err = fetch(&mut worker(&storage, 404), "/missing", Some(output.as_path()))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Network(_)));
        assert!(output.exists());
    }

    #[tokio::test]
    async fn test_missing_manifest_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_manifest(Some(missing.as_path())).await.unwrap_err();
        assert!(matches!(err, CliError::Io(_)));
        assert_eq!(
            load_manifest(None).await.unwrap(),
            CacheManifest::default()
        );
    }
}
