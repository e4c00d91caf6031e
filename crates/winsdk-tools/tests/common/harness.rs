//! Services wired over a temporary workspace

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use winsdk_core::config::ConfigStore;
use winsdk_core::paths::WorkspaceLayout;
use winsdk_core::Arch;
use winsdk_packages::{PackageAcquisitionService, PackageCache};
use winsdk_tools::{
    BuildToolLocator, BuildToolsService, CertificateService, MsixPackagingService, PowerShell,
    ToolRunner,
};

use super::mocks::{BuildToolsFeed, FakeProcessRunner};

/// A project folder with a `.winsdk` workspace and fake collaborators
pub struct ToolsHarness {
    pub temp: TempDir,
    pub layout: WorkspaceLayout,
    pub config: ConfigStore,
    pub runner: Arc<FakeProcessRunner>,
    pub feed: Arc<BuildToolsFeed>,
    pub host: Arch,
}

impl ToolsHarness {
    pub fn new(runner: FakeProcessRunner, feed: BuildToolsFeed) -> Self {
        let temp = TempDir::new().unwrap();
        let layout = WorkspaceLayout::new(temp.path().join(".winsdk"));
        layout.ensure_created().unwrap();
        let config = ConfigStore::new(temp.path());
        Self {
            temp,
            layout,
            config,
            runner: Arc::new(runner),
            feed: Arc::new(feed),
            host: Arch::X64,
        }
    }

    pub fn with_host(mut self, host: Arch) -> Self {
        self.host = host;
        self
    }

    pub fn project_dir(&self) -> &Path {
        self.temp.path()
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.layout.packages_dir()
    }

    pub fn tool_runner(&self) -> ToolRunner {
        ToolRunner::new(self.runner.clone())
    }

    pub fn locator(&self) -> BuildToolLocator {
        BuildToolLocator::new(self.layout.clone(), self.host).with_config(self.config.clone())
    }

    pub fn build_tools(&self) -> BuildToolsService {
        let cache = PackageCache::new(self.temp.path().join("global").join("package-cache.json"));
        let acquisition = PackageAcquisitionService::new(self.feed.clone(), self.layout.clone(), cache)
            .with_config(self.config.clone());
        BuildToolsService::new(self.locator(), Arc::new(acquisition), self.tool_runner())
    }

    pub fn powershell(&self) -> PowerShell {
        PowerShell::new(self.tool_runner())
    }

    pub fn certificates(&self) -> CertificateService {
        CertificateService::new(self.powershell(), self.build_tools())
    }

    pub fn msix(&self) -> MsixPackagingService {
        MsixPackagingService::new(self.build_tools(), self.certificates(), self.powershell())
    }
}
