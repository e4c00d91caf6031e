//! On-disk fixtures

use std::fs;
use std::path::{Path, PathBuf};
use winsdk_core::config::{ConfigStore, WinsdkConfig};
use winsdk_core::paths::package_folder_name;
use winsdk_core::sdk::BUILD_TOOLS_PACKAGE;
use winsdk_packages::nuget::COMPLETION_MARKER;

use super::constants::BUILD_TOOL_EXES;

/// Create `BuildTools.{version}/bin/{sdk}/{arch}/*.exe` for each arch
///
/// Returns the package folder.
pub fn install_build_tools(packages_dir: &Path, version: &str, sdk: &str, archs: &[&str]) -> PathBuf {
    let package = packages_dir.join(package_folder_name(BUILD_TOOLS_PACKAGE, version));
    fs::create_dir_all(&package).unwrap();
    fs::write(package.join(COMPLETION_MARKER), b"").unwrap();
    for arch in archs {
        let bin = package.join("bin").join(sdk).join(arch);
        fs::create_dir_all(&bin).unwrap();
        for exe in BUILD_TOOL_EXES {
            fs::write(bin.join(exe), b"MZ").unwrap();
        }
    }
    package
}

/// Pin package versions in `winsdk.yaml` under `config_dir`
pub fn write_pins(config_dir: &Path, pins: &[(&str, &str)]) -> ConfigStore {
    let store = ConfigStore::new(config_dir);
    let mut config = WinsdkConfig::new();
    for (name, version) in pins {
        config.set_version(*name, *version);
    }
    store.save(&config).unwrap();
    store
}

/// Write `content` to `root/relative`, creating parent folders
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Path of the BuildTools bin folder for a fixture
pub fn bin_path(packages_dir: &Path, version: &str, sdk: &str, arch: &str) -> PathBuf {
    packages_dir
        .join(package_folder_name(BUILD_TOOLS_PACKAGE, version))
        .join("bin")
        .join(sdk)
        .join(arch)
}
