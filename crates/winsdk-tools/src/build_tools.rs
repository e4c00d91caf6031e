//! BuildTools installation on demand and tool invocation

use crate::error::{Error, Result};
use crate::locator::BuildToolLocator;
use crate::runner::{ProcessOutput, RunOptions, ToolRunner};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use winsdk_core::sdk::BUILD_TOOLS_PACKAGE;
use winsdk_core::CancelToken;
use winsdk_packages::{AcquisitionOptions, PackageAcquisitionService, PackageRequest};

/// Makes sure BuildTools are present and runs their executables
#[derive(Clone)]
pub struct BuildToolsService {
    /// Finds installed binaries
    locator: BuildToolLocator,

    /// Installs BuildTools when missing
    acquisition: Arc<PackageAcquisitionService>,

    /// Runs the executables
    tools: ToolRunner,
}

impl BuildToolsService {
    /// Create a service over a locator and an acquisition service for the same workspace
    pub fn new(
        locator: BuildToolLocator,
        acquisition: Arc<PackageAcquisitionService>,
        tools: ToolRunner,
    ) -> Self {
        Self {
            locator,
            acquisition,
            tools,
        }
    }

    /// The underlying locator
    pub fn locator(&self) -> &BuildToolLocator {
        &self.locator
    }

    /// The underlying tool runner
    pub fn tools(&self) -> &ToolRunner {
        &self.tools
    }

    /// Ensure BuildTools are installed and return their bin folder
    ///
    /// Existing binaries are reused unless `force_latest` is set. Otherwise
    /// the pinned version is installed (the latest one when forcing or when
    /// nothing is pinned). Returns `None` when installation fails or the
    /// binaries still cannot be located afterwards; a pinned version is never
    /// substituted by another installed one.
    pub async fn ensure_build_tools(
        &self,
        force_latest: bool,
        cancel: &CancelToken,
    ) -> Result<Option<PathBuf>> {
        cancel.check()?;
        let existing = self.locator.resolve_bin_path();
        if let (Some(bin), false) = (&existing, force_latest) {
            debug!("BuildTools already available at {}", bin.display());
            return Ok(existing);
        }

        let pinned = if force_latest {
            None
        } else {
            self.locator.pinned_version()
        };

        let action = if existing.is_some() { "Updating" } else { "Installing" };
        match (&pinned, force_latest) {
            (Some(version), _) => info!(
                "{} {} (pinned version {})",
                action, BUILD_TOOLS_PACKAGE, version
            ),
            (None, true) => info!("{} {} (latest version)", action, BUILD_TOOLS_PACKAGE),
            (None, false) => info!("{} {}", action, BUILD_TOOLS_PACKAGE),
        }

        let request = match pinned {
            Some(version) => PackageRequest::exact(BUILD_TOOLS_PACKAGE, version),
            None => PackageRequest::new(BUILD_TOOLS_PACKAGE),
        };
        let options = AcquisitionOptions {
            include_prerelease: false,
            ignore_config: force_latest,
        };
        if !self.acquisition.ensure_package(request, &options, cancel).await {
            cancel.check()?;
            return Ok(None);
        }

        let bin = self.locator.resolve_bin_path();
        if let Some(bin) = &bin {
            info!("BuildTools installed successfully → {}", bin.display());
        }
        Ok(bin)
    }

    /// Path of a BuildTools executable, installing BuildTools when needed
    pub async fn ensure_build_tool_available(
        &self,
        tool: &str,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        if let Some(path) = self.locator.get_tool_path(tool) {
            return Ok(path);
        }

        if self.ensure_build_tools(false, cancel).await?.is_none() {
            return Err(Error::BuildToolsNotFound {
                pinned: self.locator.pinned_version(),
            });
        }
        self.locator
            .get_tool_path(tool)
            .ok_or_else(|| Error::tool_not_found(tool))
    }

    /// Run a BuildTools executable, failing on a non-zero exit code
    pub async fn run_build_tool(
        &self,
        tool: &str,
        args: &[String],
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        let path = self.ensure_build_tool_available(tool, cancel).await?;
        self.tools
            .run(&path, args, &RunOptions::new(), cancel)
            .await
    }
}
