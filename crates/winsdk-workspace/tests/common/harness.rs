//! A setup service wired over a temporary project

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use winsdk_core::paths::{WorkspaceLayout, WORKSPACE_DIR_NAME};
use winsdk_core::Arch;
use winsdk_packages::PackageCache;
use winsdk_tools::ToolRunner;
use winsdk_workspace::{UpdateOptions, WorkspaceSetupOptions, WorkspaceSetupService};

use super::mocks::{FakeProcessRunner, RecordingConfirm, SdkFeed};

/// A project folder with fake collaborators
pub struct SetupHarness {
    pub temp: TempDir,
    pub feed: Arc<SdkFeed>,
    pub runner: Arc<FakeProcessRunner>,
    pub confirm: Arc<RecordingConfirm>,
}

impl SetupHarness {
    /// Harness answering every confirmation with no
    pub fn new() -> Self {
        Self::with(SdkFeed::new(), FakeProcessRunner::new(), false)
    }

    pub fn with(feed: SdkFeed, runner: FakeProcessRunner, answer: bool) -> Self {
        Self {
            temp: TempDir::new().unwrap(),
            feed: Arc::new(feed),
            runner: Arc::new(runner),
            confirm: Arc::new(RecordingConfirm::answering(answer)),
        }
    }

    /// The project folder receiving `.winsdk`
    pub fn project_dir(&self) -> PathBuf {
        self.temp.path().join("app")
    }

    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::new(self.project_dir().join(WORKSPACE_DIR_NAME))
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.layout().packages_dir()
    }

    pub fn cache(&self) -> PackageCache {
        PackageCache::new(self.temp.path().join("global").join("packages").join("package-cache.json"))
    }

    pub fn service(&self) -> WorkspaceSetupService {
        WorkspaceSetupService::new(
            self.feed.clone(),
            self.cache(),
            ToolRunner::new(self.runner.clone()),
            self.confirm.clone(),
        )
        .with_host(Arch::X64)
    }

    pub fn setup_options(&self) -> WorkspaceSetupOptions {
        WorkspaceSetupOptions::new(self.project_dir())
    }

    pub fn init_options(&self) -> WorkspaceSetupOptions {
        WorkspaceSetupOptions::init(self.project_dir())
    }

    pub fn restore_options(&self) -> WorkspaceSetupOptions {
        WorkspaceSetupOptions::restore(self.project_dir())
    }

    pub fn update_options(&self) -> UpdateOptions {
        UpdateOptions::new(self.project_dir())
    }

    /// Versions installed by the feed for `package`
    pub fn installs_of(&self, package: &str) -> Vec<String> {
        self.feed
            .installed()
            .into_iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(package))
            .map(|(_, version)| version)
            .collect()
    }
}

/// Whether `dir` exists and holds a file named `name`
pub fn has_file(dir: &Path, name: &str) -> bool {
    dir.join(name).is_file()
}
