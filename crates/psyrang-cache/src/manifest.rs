//! Cache manifest: the versioned list of assets to keep offline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, CacheResult};

/// Store name prefix for the planner app.
pub const DEFAULT_CACHE_PREFIX: &str = "psyrang-planner";

/// Current generation tag. Bump it to invalidate every client's cache.
pub const DEFAULT_CACHE_VERSION: &str = "v1.1";

/// Core assets the planner needs to start offline.
pub const DEFAULT_ASSETS: &[&str] = &[
    "/",
    "/index.html",
    "/manifest.json",
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/react@18/umd/react.development.js",
    "https://unpkg.com/react-dom@18/umd/react-dom.development.js",
    "https://unpkg.com/@babel/standalone/babel.min.js",
    "https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap",
    "https://www.psyrang.com/wp-content/uploads/2023/10/logo-192.png",
    "https://www.psyrang.com/wp-content/uploads/2023/10/logo-512.png",
];

/// Versioned asset list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheManifest {
    /// Store name prefix.
    pub name: String,
    /// Generation tag.
    pub version: String,
    /// Absolute or origin-relative asset URLs.
    pub assets: Vec<String>,
}

impl Default for CacheManifest {
    fn default() -> Self {
        Self {
            name: DEFAULT_CACHE_PREFIX.to_string(),
            version: DEFAULT_CACHE_VERSION.to_string(),
            assets: DEFAULT_ASSETS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl CacheManifest {
    /// Name of the store holding this generation, e.g. `psyrang-planner-v1.1`.
    #[must_use]
    pub fn cache_name(&self) -> String {
        format!("{}-{}", self.name, self.version)
    }

    /// Replace the generation tag.
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Check the manifest can name a store.
    pub fn validate(&self) -> CacheResult<()> {
        if self.name.trim().is_empty() {
            return Err(CacheError::Manifest("name must not be empty".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(CacheError::Manifest("version must not be empty".to_string()));
        }
        if let Some(blank) = self.assets.iter().position(|a| a.trim().is_empty()) {
            return Err(CacheError::Manifest(format!("asset #{blank} is empty")));
        }
        Ok(())
    }

    /// Load and validate a manifest from a JSON file.
    pub async fn from_json_file(path: &Path) -> CacheResult<Self> {
        let raw = tokio::fs::read(path).await?;
        let manifest: Self = serde_json::from_slice(&raw)
            .map_err(|e| CacheError::Manifest(format!("{}: {e}", path.display())))?;
        manifest.validate()?;
        Ok(manifest)
    }
}
