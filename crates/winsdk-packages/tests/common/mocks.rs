//! In-memory feed for acquisition tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use winsdk_core::paths::package_folder_name;
use winsdk_core::version::{is_prerelease, latest};
use winsdk_core::{CancelToken, Error, Result};
use winsdk_packages::nuget::COMPLETION_MARKER;
use winsdk_packages::{NuGetFeed, PackageSet};

/// A feed that materializes marker-only package folders
#[derive(Default)]
pub struct FakeFeed {
    /// Published versions per package id
    versions: HashMap<String, Vec<String>>,

    /// Dependencies installed alongside each package id
    dependencies: HashMap<String, Vec<(String, String)>>,

    /// Calls to `install_package`
    pub installs: AtomicUsize,

    /// Calls to `ensure_tool_available`
    pub tool_checks: AtomicUsize,

    /// Calls to `get_latest_version`
    pub latest_queries: AtomicUsize,

    /// (name, version) of every install, in call order
    pub installed: Mutex<Vec<(String, String)>>,
}

impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish versions of a package
    pub fn with_versions(mut self, name: &str, versions: &[&str]) -> Self {
        self.versions.insert(
            name.to_lowercase(),
            versions.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    /// Install `dep` at `version` whenever `name` is installed
    pub fn with_dependency(mut self, name: &str, dep: &str, version: &str) -> Self {
        self.dependencies
            .entry(name.to_lowercase())
            .or_default()
            .push((dep.to_string(), version.to_string()));
        self
    }

    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn tool_check_count(&self) -> usize {
        self.tool_checks.load(Ordering::SeqCst)
    }

    pub fn latest_query_count(&self) -> usize {
        self.latest_queries.load(Ordering::SeqCst)
    }
}

fn materialize(output_dir: &Path, name: &str, version: &str) -> Result<()> {
    let dir = output_dir.join(package_folder_name(name, version));
    std::fs::create_dir_all(&dir)?;
    std::fs::write(dir.join(COMPLETION_MARKER), b"")?;
    Ok(())
}

#[async_trait]
impl NuGetFeed for FakeFeed {
    async fn ensure_tool_available(
        &self,
        workspace_root: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        cancel.check()?;
        self.tool_checks.fetch_add(1, Ordering::SeqCst);
        Ok(workspace_root.join("tools").join("nuget.exe"))
    }

    async fn get_latest_version(
        &self,
        package: &str,
        include_prerelease: bool,
        cancel: &CancelToken,
    ) -> Result<String> {
        cancel.check()?;
        self.latest_queries.fetch_add(1, Ordering::SeqCst);
        let versions = self
            .versions
            .get(&package.to_lowercase())
            .ok_or_else(|| Error::package_not_found(package))?;
        latest(
            versions
                .iter()
                .map(String::as_str)
                .filter(|v| include_prerelease || !is_prerelease(v)),
        )
        .map(str::to_string)
        .ok_or_else(|| Error::version_not_resolved(package, "no matching versions"))
    }

    async fn install_package(
        &self,
        _workspace_root: &Path,
        package: &str,
        version: &str,
        output_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<PackageSet> {
        cancel.check()?;
        self.installs.fetch_add(1, Ordering::SeqCst);
        self.installed
            .lock()
            .unwrap()
            .push((package.to_string(), version.to_string()));

        let mut set = PackageSet::new();
        materialize(output_dir, package, version)?;
        set.insert(package.to_string(), version.to_string());

        for (dep, dep_version) in self
            .dependencies
            .get(&package.to_lowercase())
            .cloned()
            .unwrap_or_default()
        {
            materialize(output_dir, &dep, &dep_version)?;
            set.insert(dep, dep_version);
        }
        Ok(set)
    }
}
