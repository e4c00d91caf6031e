//! Service wiring for commands
//!
//! Package downloads go to a workspace's own `packages` folder; the
//! dependent-package cache always lives in the global workspace. Tool
//! commands use the nearest local `.winsdk` when there is one and fall back
//! to the global workspace.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;
use winsdk_core::config::{ConfigStore, NetworkConfig};
use winsdk_core::paths::{global_workspace_dir, WorkspaceLayout};
use winsdk_core::{Arch, AssumeYes, ConfirmationPort};
use winsdk_packages::{NuGetClient, PackageAcquisitionService, PackageCache};
use winsdk_tools::{
    BuildToolLocator, BuildToolsService, CertificateService, MsixPackagingService, PowerShell,
    ToolRunner,
};
use winsdk_workspace::WorkspaceSetupService;

use crate::confirm::TerminalConfirm;

/// The current directory
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir().context("Failed to read the current directory")
}

/// `dir`, or the current directory
pub fn dir_or_current(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => current_dir(),
    }
}

/// The global workspace
pub fn global_layout() -> Result<WorkspaceLayout> {
    let dir = global_workspace_dir(None).context("Failed to locate the global workspace")?;
    Ok(WorkspaceLayout::new(dir))
}

/// Workspace tool commands operate on
pub fn tool_layout(base_dir: &Path) -> Result<WorkspaceLayout> {
    let local = WorkspaceLayout::discover(base_dir);
    if local.exists() {
        debug!("Using workspace {}", local.root().display());
        return Ok(local);
    }
    let global = global_layout()?;
    debug!("No local workspace, using {}", global.root().display());
    Ok(global)
}

fn feed() -> Result<Arc<NuGetClient>> {
    let client = NuGetClient::new(NetworkConfig::from_env())
        .context("Failed to create the NuGet client")?;
    Ok(Arc::new(client))
}

fn cache() -> Result<PackageCache> {
    Ok(PackageCache::for_workspace(&global_layout()?))
}

/// Setup service asking on the terminal unless `assume_yes`
pub fn setup_service(assume_yes: bool) -> Result<WorkspaceSetupService> {
    let confirm: Arc<dyn ConfirmationPort> = if assume_yes {
        Arc::new(AssumeYes)
    } else {
        Arc::new(TerminalConfirm)
    };
    Ok(WorkspaceSetupService::new(
        feed()?,
        cache()?,
        ToolRunner::system(),
        confirm,
    ))
}

/// Services for commands that run BuildTools and PowerShell
pub struct ToolServices {
    pub build_tools: BuildToolsService,
    pub powershell: PowerShell,
}

impl ToolServices {
    /// Wire the services for the workspace used from `base_dir`
    ///
    /// BuildTools pins are read from `winsdk.yaml` in `base_dir`.
    pub fn for_dir(base_dir: &Path) -> Result<Self> {
        let layout = tool_layout(base_dir)?;
        let config = ConfigStore::new(base_dir);
        let tools = ToolRunner::system();

        let acquisition = PackageAcquisitionService::new(feed()?, layout.clone(), cache()?)
            .with_config(config.clone());
        let locator = BuildToolLocator::new(layout, Arch::host()).with_config(config);
        Ok(Self {
            build_tools: BuildToolsService::new(locator, Arc::new(acquisition), tools.clone()),
            powershell: PowerShell::new(tools),
        })
    }

    pub fn certificates(&self) -> CertificateService {
        CertificateService::new(self.powershell.clone(), self.build_tools.clone())
    }

    pub fn msix(&self) -> MsixPackagingService {
        MsixPackagingService::new(
            self.build_tools.clone(),
            self.certificates(),
            self.powershell.clone(),
        )
    }
}
