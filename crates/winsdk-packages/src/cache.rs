//! Persistent record of transitive package dependents
//!
//! The cache maps `"{Package}.{Version}"` to the other packages that were
//! materialized when that package was installed. It lets a re-run report the
//! full dependency set of an already-present package without contacting the
//! feed. It is advisory: the packages directory on disk stays authoritative.
//!
//! File format (`package-cache.json`):
//!
//! ```json
//! {
//!   "installedPackages": {
//!     "Microsoft.WindowsAppSDK.1.7.250606001": {
//!       "Microsoft.Windows.SDK.BuildTools": "10.0.22621.756"
//!     }
//!   }
//! }
//! ```

use crate::PackageSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use winsdk_core::paths::{package_folder_name, WorkspaceLayout};
use winsdk_core::{Error, Outcome, Result, Warning};

/// On-disk representation of the package cache
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCacheFile {
    /// `"{Package}.{Version}"` to dependent package versions
    #[serde(default)]
    pub installed_packages: BTreeMap<String, PackageSet>,
}

impl PackageCacheFile {
    /// Entry for a key, matching case-insensitively
    pub fn get(&self, key: &str) -> Option<&PackageSet> {
        self.installed_packages
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Insert or replace an entry, matching the key case-insensitively
    pub fn insert(&mut self, key: String, dependents: PackageSet) {
        if let Some(existing) = self
            .installed_packages
            .keys()
            .find(|k| k.eq_ignore_ascii_case(&key))
            .cloned()
        {
            self.installed_packages.remove(&existing);
        }
        self.installed_packages.insert(key, dependents);
    }
}

/// Reads and writes the package cache file
#[derive(Debug, Clone)]
pub struct PackageCache {
    /// Path of `package-cache.json`
    path: PathBuf,
}

impl PackageCache {
    /// Cache stored at an explicit path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache stored in the packages directory of a workspace
    pub fn for_workspace(layout: &WorkspaceLayout) -> Self {
        Self::new(layout.package_cache_file())
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the cache, falling back to an empty cache with a warning on errors
    pub async fn load(&self) -> Outcome<PackageCacheFile> {
        match self.read().await {
            Ok(Some(cache)) => Outcome::clean(cache),
            Ok(None) => Outcome::clean(PackageCacheFile::default()),
            Err(e) => Outcome::degraded(
                PackageCacheFile::default(),
                Warning::new(self.path.display().to_string(), e),
            ),
        }
    }

    /// Write the whole cache file
    pub async fn save(&self, cache: &PackageCacheFile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(cache)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Record the dependents materialized by installing `name` at `version`
    ///
    /// Any entry naming the package itself is dropped before saving.
    pub async fn update_package(
        &self,
        name: &str,
        version: &str,
        installed: &PackageSet,
    ) -> Result<()> {
        let mut cache = self.load().await.log_warnings();

        let dependents: PackageSet = installed
            .iter()
            .filter(|(pkg, _)| !pkg.eq_ignore_ascii_case(name))
            .map(|(pkg, ver)| (pkg.clone(), ver.clone()))
            .collect();

        debug!(
            "Caching {} dependents for {} {}",
            dependents.len(),
            name,
            version
        );
        cache.insert(package_folder_name(name, version), dependents);
        self.save(&cache).await
    }

    /// Dependents recorded for `name` at `version`
    ///
    /// `Ok(None)` means the package has no entry yet. `Err` means the cache
    /// file exists but could not be read.
    pub async fn get_cached_package(
        &self,
        name: &str,
        version: &str,
    ) -> Result<Option<PackageSet>> {
        let key = package_folder_name(name, version);
        Ok(self
            .read()
            .await?
            .and_then(|cache| cache.get(&key).cloned()))
    }

    async fn read(&self) -> Result<Option<PackageCacheFile>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };
        if content.trim().is_empty() {
            return Ok(Some(PackageCacheFile::default()));
        }
        Ok(Some(serde_json::from_str(&content)?))
    }
}
