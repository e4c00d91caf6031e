//! NuGet feed access
//!
//! [`NuGetFeed`] is the seam the acquisition service drives; [`NuGetClient`]
//! implements it against a NuGet v3 flat-container feed.

mod client;
pub mod extract;
pub mod nuspec;

pub use client::NuGetClient;
pub use extract::{is_package_installed, COMPLETION_MARKER};

use crate::PackageSet;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use winsdk_core::{CancelToken, Result};

/// Operations the package pipeline needs from a package feed
#[async_trait]
pub trait NuGetFeed: Send + Sync {
    /// Make sure the NuGet command-line executable exists in the workspace
    ///
    /// Returns its path. Does nothing when it is already present.
    async fn ensure_tool_available(
        &self,
        workspace_root: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf>;

    /// Highest published version of a package
    ///
    /// Stable versions only unless `include_prerelease` is set. Fails when
    /// the package is unknown or has no matching version.
    async fn get_latest_version(
        &self,
        package: &str,
        include_prerelease: bool,
        cancel: &CancelToken,
    ) -> Result<String>;

    /// Install a package version and its dependencies into `output_dir`
    ///
    /// Each package lands in `{output_dir}/{name}.{version}`. Returns every
    /// package materialized for this request, the requested one included.
    /// Already-extracted packages are reused without downloading.
    async fn install_package(
        &self,
        workspace_root: &Path,
        package: &str,
        version: &str,
        output_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<PackageSet>;
}
