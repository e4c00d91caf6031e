//! BuildTools binary location
//!
//! Resolution walks `packages/Microsoft.Windows.SDK.BuildTools.{version}/bin/{sdk}/{arch}`:
//!
//! 1. Package folder: the pinned version when `winsdk.yaml` pins one (and
//!    nothing else, even if other versions are installed), else the highest
//!    installed version.
//! 2. SDK folder: the highest four-part numeric folder under `bin`.
//! 3. Architecture: the host's folder, else x64, x86, arm64 in that order.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use winsdk_core::config::ConfigStore;
use winsdk_core::paths::{package_folder_name, WorkspaceLayout};
use winsdk_core::sdk::BUILD_TOOLS_PACKAGE;
use winsdk_core::version::{folder_sort_key, trailing_version};
use winsdk_core::Arch;

static SDK_VERSION_DIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+\.\d+\.\d+$").expect("SDK version folder regex is valid")
});

/// Finds BuildTools executables inside a workspace
#[derive(Debug, Clone)]
pub struct BuildToolLocator {
    /// Workspace holding the packages
    layout: WorkspaceLayout,

    /// Pinned versions, when a configuration applies
    config: Option<ConfigStore>,

    /// Architecture tried first
    host: Arch,
}

impl BuildToolLocator {
    /// Locator for `layout`, preferring `host` binaries
    pub fn new(layout: WorkspaceLayout, host: Arch) -> Self {
        Self {
            layout,
            config: None,
            host,
        }
    }

    /// Honor the BuildTools pin in a configuration file
    pub fn with_config(mut self, config: ConfigStore) -> Self {
        self.config = Some(config);
        self
    }

    /// The workspace searched
    pub fn layout(&self) -> &WorkspaceLayout {
        &self.layout
    }

    /// The preferred architecture
    pub fn host(&self) -> Arch {
        self.host
    }

    /// The pinned BuildTools version, if any
    pub fn pinned_version(&self) -> Option<String> {
        let store = self.config.as_ref()?;
        if !store.exists() {
            return None;
        }
        store
            .load()
            .log_warnings()
            .get_version(BUILD_TOOLS_PACKAGE)
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    /// Folder holding the BuildTools executables for the best architecture
    ///
    /// `None` when BuildTools are not installed, the pinned version is not
    /// on disk, or no usable architecture folder exists.
    pub fn resolve_bin_path(&self) -> Option<PathBuf> {
        let packages_dir = self.layout.packages_dir();
        let prefix = format!("{}.", BUILD_TOOLS_PACKAGE).to_ascii_lowercase();
        let candidates: Vec<PathBuf> = subdirs(&packages_dir)
            .into_iter()
            .filter(|d| is_build_tools_folder(&dir_name(d), &prefix))
            .collect();
        if candidates.is_empty() {
            debug!("No {} package in {}", BUILD_TOOLS_PACKAGE, packages_dir.display());
            return None;
        }

        let package_dir = match self.pinned_version() {
            Some(pinned) => {
                let expected = package_folder_name(BUILD_TOOLS_PACKAGE, &pinned);
                let found = candidates
                    .into_iter()
                    .find(|d| dir_name(d).eq_ignore_ascii_case(&expected));
                if found.is_none() {
                    debug!("Pinned {} {} is not installed", BUILD_TOOLS_PACKAGE, pinned);
                }
                found?
            }
            None => candidates.into_iter().max_by_key(|d| {
                folder_sort_key(&trailing_version(&dir_name(d), 4).unwrap_or_default())
            })?,
        };

        let sdk_dir = subdirs(&package_dir.join("bin"))
            .into_iter()
            .filter(|d| SDK_VERSION_DIR_RE.is_match(&dir_name(d)))
            .max_by_key(|d| folder_sort_key(&dir_name(d)))?;

        let bin = Arch::build_tools_search_order(self.host)
            .into_iter()
            .map(|arch| sdk_dir.join(arch.as_str()))
            .find(|dir| dir.is_dir());
        if let Some(bin) = &bin {
            debug!("BuildTools bin folder: {}", bin.display());
        }
        bin
    }

    /// Full path of a BuildTools executable, `None` when it does not exist
    pub fn get_tool_path(&self, tool: &str) -> Option<PathBuf> {
        let path = self.resolve_bin_path()?.join(tool);
        path.is_file().then_some(path)
    }
}

/// `Microsoft.Windows.SDK.BuildTools.{version}`, not a sibling package
/// such as `Microsoft.Windows.SDK.BuildTools.MSIX`
fn is_build_tools_folder(name: &str, prefix: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_digit())
}

fn subdirs(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect()
        })
        .unwrap_or_default()
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}
