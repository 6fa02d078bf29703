//! Directory-backed store.
//!
//! Layout: `<root>/<store name>/<sha256(url)>.json`, one JSON file per entry
//! with the body base64-encoded. Writes are built in a `.staging-<uuid>`
//! directory next to the stores and swapped in with renames, so a failed
//! batch leaves the previous contents untouched.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{CacheStorage, validate_name};
use crate::error::{CacheError, CacheResult};
use crate::response::AssetResponse;

const ENTRY_EXTENSION: &str = "json";

/// On-disk form of one entry.
#[derive(Debug, Serialize, Deserialize)]
struct StoredEntry {
    url: String,
    status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content_type: Option<String>,
    body: String,
}

impl From<&AssetResponse> for StoredEntry {
    fn from(response: &AssetResponse) -> Self {
        Self {
            url: response.url.clone(),
            status: response.status,
            content_type: response.content_type.clone(),
            body: STANDARD.encode(&response.body),
        }
    }
}

impl StoredEntry {
    fn into_response(self) -> CacheResult<AssetResponse> {
        let body = STANDARD
            .decode(self.body.as_bytes())
            .map_err(|e| CacheError::Corrupt(format!("{}: {e}", self.url)))?;
        Ok(AssetResponse {
            url: self.url,
            status: self.status,
            content_type: self.content_type,
            body,
        })
    }
}

/// Stores kept as directories under one root.
#[derive(Debug, Clone)]
pub struct FsCacheStorage {
    root: PathBuf,
}

impl FsCacheStorage {
    /// Use `root` as the storage directory. It is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Storage directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn store_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn entry_file_name(url: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        format!("{:x}.{ENTRY_EXTENSION}", hasher.finalize())
    }

    fn parse_entry(path: &Path, raw: &[u8]) -> CacheResult<StoredEntry> {
        serde_json::from_slice(raw)
            .map_err(|e| CacheError::Corrupt(format!("{}: {e}", path.display())))
    }

    /// Entry files in a store directory, or `None` if the store is absent.
    async fn entry_files(dir: &Path) -> CacheResult<Option<Vec<PathBuf>>> {
        let mut read_dir = match fs::read_dir(dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                files.push(path);
            }
        }
        Ok(Some(files))
    }

    /// Fill `staging` with the current entries of `name` plus `responses`.
    async fn stage(&self, staging: &Path, name: &str, responses: &[AssetResponse]) -> CacheResult<()> {
        fs::create_dir_all(staging).await?;

        if let Some(existing) = Self::entry_files(&self.store_dir(name)).await? {
            for path in existing {
                if let Some(file_name) = path.file_name() {
                    fs::copy(&path, staging.join(file_name)).await?;
                }
            }
        }

        for response in responses {
            let entry = StoredEntry::from(response);
            let bytes = serde_json::to_vec(&entry)
                .map_err(|e| CacheError::Corrupt(format!("{}: {e}", response.url)))?;
            fs::write(staging.join(Self::entry_file_name(&response.url)), bytes).await?;
        }
        Ok(())
    }

    /// Replace the store directory with the staged one.
    async fn commit(&self, staging: &Path, name: &str) -> CacheResult<()> {
        let target = self.store_dir(name);
        if fs::try_exists(&target).await? {
            let trash = self.root.join(format!(".trash-{}", Uuid::new_v4()));
            fs::rename(&target, &trash).await?;
            fs::rename(staging, &target).await?;
            if let Err(e) = fs::remove_dir_all(&trash).await {
                warn!(path = %trash.display(), error = %e, "Failed to remove replaced store");
            }
        } else {
            fs::rename(staging, &target).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl CacheStorage for FsCacheStorage {
    async fn keys(&self) -> CacheResult<Vec<String>> {
        let mut read_dir = match fs::read_dir(&self.root).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = read_dir.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with('.') {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    async fn has(&self, name: &str) -> CacheResult<bool> {
        if validate_name(name).is_err() {
            return Ok(false);
        }
        let dir = self.store_dir(name);
        Ok(fs::try_exists(&dir).await? && fs::metadata(&dir).await?.is_dir())
    }

    async fn delete(&self, name: &str) -> CacheResult<bool> {
        validate_name(name)?;
        match fs::remove_dir_all(self.store_dir(name)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn put_all(&self, name: &str, responses: Vec<AssetResponse>) -> CacheResult<()> {
        validate_name(name)?;
        fs::create_dir_all(&self.root).await?;

        let staging = self.root.join(format!(".staging-{}", Uuid::new_v4()));
        let result = match self.stage(&staging, name, &responses).await {
            Ok(()) => self.commit(&staging, name).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            warn!(store = %name, error = %e, "Discarding staged cache write");
            match fs::remove_dir_all(&staging).await {
                Ok(()) => {}
                Err(cleanup) if cleanup.kind() == std::io::ErrorKind::NotFound => {}
                Err(cleanup) => {
                    warn!(path = %staging.display(), error = %cleanup, "Failed to remove staging dir");
                }
            }
        } else {
            debug!(store = %name, entries = responses.len(), "Committed cache write");
        }
        result
    }

    async fn lookup(&self, name: &str, url: &str) -> CacheResult<Option<AssetResponse>> {
        if validate_name(name).is_err() {
            return Ok(None);
        }
        let path = self.store_dir(name).join(Self::entry_file_name(url));
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Self::parse_entry(&path, &raw)?.into_response().map(Some)
    }

    async fn entries(&self, name: &str) -> CacheResult<Vec<String>> {
        if validate_name(name).is_err() {
            return Ok(Vec::new());
        }
        let Some(files) = Self::entry_files(&self.store_dir(name)).await? else {
            return Ok(Vec::new());
        };

        let mut urls = Vec::with_capacity(files.len());
        for path in files {
            let raw = fs::read(&path).await?;
            urls.push(Self::parse_entry(&path, &raw)?.url);
        }
        urls.sort();
        Ok(urls)
    }
}
