//! Workspace directory discovery and layout
//!
//! A workspace is a `.winsdk` folder holding downloaded packages and the
//! headers, import libraries and binaries laid out from them. Every function
//! here takes the directory to start from explicitly; nothing consults the
//! process working directory.

use crate::error::{Error, Result};
use crate::utils::get_home_dir;
use std::path::{Path, PathBuf};

/// Name of the workspace folder
pub const WORKSPACE_DIR_NAME: &str = ".winsdk";

/// Environment variable overriding the global workspace location
pub const CACHE_DIR_ENV: &str = "WINSDK_CACHE_DIRECTORY";

/// File name of the package cache inside the packages directory
pub const PACKAGE_CACHE_FILE: &str = "package-cache.json";

/// Find the nearest `.winsdk` folder at or above `base_dir`
///
/// When no ancestor contains one, the not-yet-created `{base_dir}/.winsdk`
/// is returned; callers check existence themselves.
pub fn find_workspace_root(base_dir: &Path) -> PathBuf {
    base_dir
        .ancestors()
        .map(|dir| dir.join(WORKSPACE_DIR_NAME))
        .find(|candidate| candidate.is_dir())
        .unwrap_or_else(|| base_dir.join(WORKSPACE_DIR_NAME))
}

/// Resolve the global workspace directory
///
/// Precedence: explicit override, then `WINSDK_CACHE_DIRECTORY`, then
/// `~/.winsdk`.
pub fn global_workspace_dir(override_dir: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = override_dir {
        return Ok(dir.to_path_buf());
    }

    if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    let home = get_home_dir().map_err(|e| Error::workspace_not_found(e.to_string()))?;
    Ok(home.join(WORKSPACE_DIR_NAME))
}

/// Well-known locations inside a workspace root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceLayout {
    /// The `.winsdk` directory
    root: PathBuf,
}

impl WorkspaceLayout {
    /// Layout rooted at an existing or future `.winsdk` directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Layout of the nearest workspace at or above `base_dir`
    pub fn discover(base_dir: &Path) -> Self {
        Self::new(find_workspace_root(base_dir))
    }

    /// The workspace root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether the workspace root exists
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Directory containing the project using this workspace
    pub fn project_dir(&self) -> Option<&Path> {
        self.root.parent()
    }

    /// Extracted NuGet packages
    pub fn packages_dir(&self) -> PathBuf {
        self.root.join("packages")
    }

    /// Consolidated headers
    pub fn include_dir(&self) -> PathBuf {
        self.root.join("include")
    }

    /// Import libraries partitioned by architecture
    pub fn lib_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Runtime binaries partitioned by architecture
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// License and other shared files
    pub fn share_dir(&self) -> PathBuf {
        self.root.join("share")
    }

    /// Helper executables downloaded into the workspace
    pub fn tools_dir(&self) -> PathBuf {
        self.root.join("tools")
    }

    /// Package cache file
    pub fn package_cache_file(&self) -> PathBuf {
        self.packages_dir().join(PACKAGE_CACHE_FILE)
    }

    /// Install folder of one package version
    pub fn package_dir(&self, name: &str, version: &str) -> PathBuf {
        self.packages_dir().join(package_folder_name(name, version))
    }

    /// Create the root and its packages, include, lib and bin folders
    pub fn ensure_created(&self) -> Result<()> {
        for dir in [
            self.root.clone(),
            self.packages_dir(),
            self.include_dir(),
            self.lib_dir(),
            self.bin_dir(),
        ] {
            std::fs::create_dir_all(&dir)?;
        }
        Ok(())
    }
}

/// Folder name of an installed package: `{name}.{version}`
pub fn package_folder_name(name: &str, version: &str) -> String {
    format!("{}.{}", name, version)
}
