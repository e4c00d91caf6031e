//! Package acquisition: pinned-or-latest resolution with skip-if-present
//!
//! For each requested package the target version is, in order: an explicit
//! version on the request, the pin in `winsdk.yaml` (unless the config is
//! ignored), or the latest version on the feed. A package whose folder is
//! already complete on disk is not reinstalled; its dependents are recovered
//! from the package cache, keeping only those whose folders still exist.
//! Packages are processed one at a time in request order.

use crate::cache::PackageCache;
use crate::nuget::{is_package_installed, NuGetFeed};
use crate::PackageSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use winsdk_core::config::{ConfigStore, WinsdkConfig};
use winsdk_core::paths::WorkspaceLayout;
use winsdk_core::version::compare_versions;
use winsdk_core::{CancelToken, Error, Outcome, Result, Warning};

/// A package to acquire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequest {
    /// Package id
    pub name: String,

    /// Exact version to install, overriding pins and latest
    pub version: Option<String>,
}

impl PackageRequest {
    /// Request a package at its pinned or latest version
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Request a package at an exact version
    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }
}

/// Options controlling version resolution
#[derive(Debug, Clone, Default)]
pub struct AcquisitionOptions {
    /// Consider prerelease versions when resolving latest
    pub include_prerelease: bool,

    /// Do not consult pinned versions
    pub ignore_config: bool,
}

/// Result of an acquisition run
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    /// Every package and version present on disk for this request set
    pub packages: PackageSet,

    /// Version each requested package resolved to
    pub requested: PackageSet,

    /// Requested packages that were already installed
    pub skipped: Vec<String>,

    /// Requested packages that were downloaded
    pub installed: Vec<String>,

    /// Cache problems encountered along the way
    pub warnings: Vec<Warning>,
}

impl InstallReport {
    /// Version recorded for a package (case-insensitive)
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.packages
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Coordinates the config, the package cache and a NuGet feed
pub struct PackageAcquisitionService {
    /// Package feed
    feed: Arc<dyn NuGetFeed>,

    /// Workspace receiving the packages
    layout: WorkspaceLayout,

    /// Dependent-package cache
    cache: PackageCache,

    /// Pinned-version configuration, when one applies
    config: Option<ConfigStore>,
}

impl PackageAcquisitionService {
    /// Create a service installing into `layout`
    pub fn new(feed: Arc<dyn NuGetFeed>, layout: WorkspaceLayout, cache: PackageCache) -> Self {
        Self {
            feed,
            layout,
            cache,
            config: None,
        }
    }

    /// Resolve pinned versions from a configuration file
    pub fn with_config(mut self, config: ConfigStore) -> Self {
        self.config = Some(config);
        self
    }

    /// The workspace packages are installed into
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// The feed packages are resolved against
    pub fn feed(&self) -> &Arc<dyn NuGetFeed> {
        &self.feed
    }

    /// Install every requested package, in order
    ///
    /// Resolution failures (no version obtainable) and install failures abort
    /// the run. Cache failures and a missing command-line tool are reported
    /// as warnings.
    pub async fn install_packages(
        &self,
        requests: &[PackageRequest],
        options: &AcquisitionOptions,
        cancel: &CancelToken,
    ) -> Result<InstallReport> {
        let packages_dir = self.layout.packages_dir();
        tokio::fs::create_dir_all(&packages_dir).await?;

        let pinned = self.load_pins(options);
        let mut report = InstallReport::default();
        report.warnings.extend(pinned.warnings);
        let pinned = pinned.value;
        let mut tool_ready = false;

        for request in requests {
            cancel.check()?;
            let version = self
                .resolve_version(request, &pinned, options, cancel)
                .await?;
            report
                .requested
                .insert(request.name.clone(), version.clone());

            if is_package_installed(&packages_dir, &request.name, &version) {
                debug!("{} {} already installed, skipping", request.name, version);
                merge_higher(&mut report.packages, &request.name, &version);
                self.merge_cached_dependents(&request.name, &version, &mut report)
                    .await;
                report.skipped.push(request.name.clone());
                continue;
            }

            if !tool_ready {
                match self
                    .feed
                    .ensure_tool_available(self.layout.root(), cancel)
                    .await
                {
                    Ok(tool) => debug!("Package tool at {}", tool.display()),
                    Err(Error::Cancelled) => return Err(Error::Cancelled),
                    Err(e) => report.warnings.push(Warning::new(
                        "package tool",
                        format!("could not fetch the NuGet command-line tool: {}", e),
                    )),
                }
                tool_ready = true;
            }

            info!("Installing {} {}", request.name, version);
            let installed = self
                .feed
                .install_package(
                    self.layout.root(),
                    &request.name,
                    &version,
                    &packages_dir,
                    cancel,
                )
                .await?;
            for (pkg, ver) in &installed {
                merge_higher(&mut report.packages, pkg, ver);
            }
            report.installed.push(request.name.clone());

            if let Err(e) = self
                .cache
                .update_package(&request.name, &version, &installed)
                .await
            {
                report.warnings.push(Warning::new(
                    self.cache.path().display().to_string(),
                    format!("could not record dependents of {}: {}", request.name, e),
                ));
            }
        }

        Ok(report)
    }

    /// Resolve the version of every request without installing anything
    pub async fn resolve_versions(
        &self,
        requests: &[PackageRequest],
        options: &AcquisitionOptions,
        cancel: &CancelToken,
    ) -> Result<Outcome<PackageSet>> {
        let pinned = self.load_pins(options);
        let mut resolved = Outcome {
            value: PackageSet::new(),
            warnings: pinned.warnings,
        };
        for request in requests {
            cancel.check()?;
            let version = self
                .resolve_version(request, &pinned.value, options, cancel)
                .await?;
            resolved.value.insert(request.name.clone(), version);
        }
        Ok(resolved)
    }

    /// Install a single package, reporting failure as `false`
    pub async fn ensure_package(
        &self,
        request: PackageRequest,
        options: &AcquisitionOptions,
        cancel: &CancelToken,
    ) -> bool {
        let name = request.name.clone();
        match self.install_packages(&[request], options, cancel).await {
            Ok(report) => {
                for warning in &report.warnings {
                    warn!("{}", warning);
                }
                true
            }
            Err(e) => {
                warn!("Failed to ensure package {}: {}", name, e);
                false
            }
        }
    }

    fn load_pins(&self, options: &AcquisitionOptions) -> Outcome<WinsdkConfig> {
        match (&self.config, options.ignore_config) {
            (Some(store), false) => store.load(),
            _ => Outcome::clean(WinsdkConfig::default()),
        }
    }

    async fn resolve_version(
        &self,
        request: &PackageRequest,
        pinned: &WinsdkConfig,
        options: &AcquisitionOptions,
        cancel: &CancelToken,
    ) -> Result<String> {
        if let Some(version) = request.version.as_deref().filter(|v| !v.trim().is_empty()) {
            return Ok(version.to_string());
        }
        if let Some(version) = pinned.get_version(&request.name) {
            debug!("Using pinned {} {}", request.name, version);
            return Ok(version.to_string());
        }
        self.feed
            .get_latest_version(&request.name, options.include_prerelease, cancel)
            .await
    }

    async fn merge_cached_dependents(&self, name: &str, version: &str, report: &mut InstallReport) {
        let packages_dir = self.layout.packages_dir();
        match self.cache.get_cached_package(name, version).await {
            Ok(Some(dependents)) => {
                for (dep, dep_version) in dependents {
                    if is_package_installed(&packages_dir, &dep, &dep_version) {
                        merge_higher(&mut report.packages, &dep, &dep_version);
                    } else {
                        report.warnings.push(Warning::new(
                            format!("{} {}", name, version),
                            format!(
                                "cached dependent {} {} is missing on disk",
                                dep, dep_version
                            ),
                        ));
                    }
                }
            }
            Ok(None) => debug!("No cached dependents for {} {}", name, version),
            Err(e) => report.warnings.push(Warning::new(
                self.cache.path().display().to_string(),
                e,
            )),
        }
    }
}

/// Record `name` at `version` unless a higher version is already recorded
fn merge_higher(packages: &mut PackageSet, name: &str, version: &str) {
    let existing_key = packages
        .keys()
        .find(|k| k.eq_ignore_ascii_case(name))
        .cloned();
    match existing_key {
        Some(key) => {
            if let Some(current) = packages.get(&key) {
                if compare_versions(version, current).is_gt() {
                    packages.insert(key, version.to_string());
                }
            }
        }
        None => {
            packages.insert(name.to_string(), version.to_string());
        }
    }
}
