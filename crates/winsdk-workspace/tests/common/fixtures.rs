//! On-disk fixtures

use std::fs;
use std::path::{Path, PathBuf};
use winsdk_core::config::{ConfigStore, WinsdkConfig};
use winsdk_core::paths::package_folder_name;
use winsdk_core::sdk::{BUILD_TOOLS_PACKAGE, CPPWINRT_PACKAGE, WINDOWS_APP_SDK_PACKAGE};
use winsdk_packages::nuget::COMPLETION_MARKER;

use super::constants::SDK_FOLDER;

/// What a materialized package folder leaves out
#[derive(Debug, Clone, Copy, Default)]
pub struct Omit {
    /// No `bin/cppwinrt.exe` in the C++/WinRT package
    pub cppwinrt_exe: bool,

    /// No `.winmd` files anywhere
    pub metadata: bool,
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

/// Create a complete package folder with the files a real release ships
///
/// Returns the package folder.
pub fn materialize_package(packages_dir: &Path, name: &str, version: &str, omit: Omit) -> PathBuf {
    let dir = packages_dir.join(package_folder_name(name, version));
    fs::create_dir_all(&dir).unwrap();

    if name.eq_ignore_ascii_case(CPPWINRT_PACKAGE) {
        if !omit.cppwinrt_exe {
            write_file(&dir, "bin/cppwinrt.exe", b"MZ");
        }
    } else if name.eq_ignore_ascii_case(BUILD_TOOLS_PACKAGE) {
        for exe in ["makeappx.exe", "makepri.exe", "mt.exe", "signtool.exe"] {
            write_file(&dir, &format!("bin/{}/x64/{}", SDK_FOLDER, exe), b"MZ");
        }
    } else if name.eq_ignore_ascii_case(WINDOWS_APP_SDK_PACKAGE) {
        write_file(&dir, "include/MddBootstrap.h", b"#pragma once");
        write_file(&dir, "lib/win10-x64/Microsoft.WindowsAppRuntime.Bootstrap.lib", b"LIB");
        write_file(
            &dir,
            "runtimes/win-x64/native/Microsoft.WindowsAppRuntime.Bootstrap.dll",
            b"MZ",
        );
        write_file(&dir, "license.txt", b"MIT License");
        if !omit.metadata {
            write_file(&dir, "lib/uap10.0/Microsoft.UI.winmd", b"WINMD");
        }
    } else if name.eq_ignore_ascii_case("Microsoft.Windows.SDK.CPP") {
        write_file(&dir, "c/Include/10.0.26100.0/um/windows.h", b"#pragma once");
        if !omit.metadata {
            write_file(
                &dir,
                "c/References/10.0.26100.0/Windows.Foundation.FoundationContract/Windows.Foundation.FoundationContract.winmd",
                b"WINMD",
            );
        }
    } else if let Some(arch) = name.strip_prefix("Microsoft.Windows.SDK.CPP.") {
        write_file(&dir, &format!("c/lib/{}/kernel32.lib", arch), b"LIB");
    } else {
        write_file(&dir, &format!("include/{}.h", name), b"#pragma once");
    }

    fs::write(dir.join(COMPLETION_MARKER), b"").unwrap();
    dir
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

/// Pins stored in `winsdk.yaml` under `config_dir`, in file order
pub fn read_pins(config_dir: &Path) -> Vec<(String, String)> {
    ConfigStore::new(config_dir)
        .try_load()
        .unwrap()
        .packages
        .into_iter()
        .map(|pin| (pin.name, pin.version))
        .collect()
}
