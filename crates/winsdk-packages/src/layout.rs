//! Consolidated header, library and runtime layout
//!
//! Installed packages spread their artifacts across conventional folders.
//! The layout pass flattens them into the workspace:
//!
//! | Source (anywhere under a package)                      | Destination        |
//! |--------------------------------------------------------|--------------------|
//! | `include/*`                                            | `include/`         |
//! | `lib/{win-A, win10-A, A, native/win10-A, native/A}/*.lib` | `lib/A/`        |
//! | `runtimes/win-A/native/*`                              | `bin/A/`           |
//!
//! Copying is best effort: a file that cannot be copied is reported as a
//! warning and the pass continues.

use crate::PackageSet;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;
use winsdk_core::paths::package_folder_name;
use winsdk_core::sdk::WINDOWS_APP_SDK_PACKAGE;
use winsdk_core::{Arch, Outcome, Warning};

/// Flattens installed package trees into the workspace
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageLayoutService;

impl PackageLayoutService {
    /// Create a layout service
    pub fn new() -> Self {
        Self
    }

    /// Copy the top-level files of every `include` folder into `include_out`
    ///
    /// Returns the number of files copied.
    pub fn copy_includes(&self, packages_dir: &Path, include_out: &Path) -> Outcome<usize> {
        let mut outcome = Outcome::clean(0);
        if let Err(e) = fs::create_dir_all(include_out) {
            outcome.push(Warning::new(include_out.display().to_string(), e));
            return outcome;
        }

        for include_dir in find_dirs_named(packages_dir, "include") {
            let copied = copy_top_files(&include_dir, include_out, |_| true);
            let n = outcome.absorb(copied);
            outcome.value += n;
        }
        outcome
    }

    /// Copy import libraries into `lib_root/{arch}` for every architecture found
    pub fn copy_libs_all_arch(&self, packages_dir: &Path, lib_root: &Path) -> Outcome<usize> {
        let mut outcome = Outcome::clean(0);
        if let Err(e) = fs::create_dir_all(lib_root) {
            outcome.push(Warning::new(lib_root.display().to_string(), e));
            return outcome;
        }

        for lib_dir in find_dirs_named(packages_dir, "lib") {
            for sub in subdirs(&lib_dir) {
                let name = dir_name(&sub);
                if name.eq_ignore_ascii_case("native") {
                    for native_sub in subdirs(&sub) {
                        let native_name = dir_name(&native_sub);
                        let arch = strip_prefix_ci(&native_name, "win10-")
                            .or_else(|| known_arch(&native_name));
                        if let Some(arch) = arch {
                            let copied =
                                copy_top_files(&native_sub, &lib_root.join(arch), is_import_lib);
                            let n = outcome.absorb(copied);
                            outcome.value += n;
                        }
                    }
                    continue;
                }

                let arch = strip_prefix_ci(&name, "win-")
                    .or_else(|| strip_prefix_ci(&name, "win10-"))
                    .or_else(|| known_arch(&name));
                if let Some(arch) = arch {
                    let copied = copy_top_files(&sub, &lib_root.join(arch), is_import_lib);
                    let n = outcome.absorb(copied);
                    outcome.value += n;
                }
            }
        }
        outcome
    }

    /// Copy `runtimes/win-{arch}/native` files into `bin_root/{arch}`
    pub fn copy_runtimes_all_arch(&self, packages_dir: &Path, bin_root: &Path) -> Outcome<usize> {
        let mut outcome = Outcome::clean(0);
        if let Err(e) = fs::create_dir_all(bin_root) {
            outcome.push(Warning::new(bin_root.display().to_string(), e));
            return outcome;
        }

        for runtimes_dir in find_dirs_named(packages_dir, "runtimes") {
            for platform in subdirs(&runtimes_dir) {
                let name = dir_name(&platform);
                if let Some(arch) = strip_prefix_ci(&name, "win-") {
                    let copied =
                        copy_top_files(&platform.join("native"), &bin_root.join(arch), |_| true);
                    let n = outcome.absorb(copied);
                    outcome.value += n;
                }
            }
        }
        outcome
    }

    /// Find `.winmd` metadata in exactly the package versions in `used`
    ///
    /// Searches `metadata/` (and its `10.0.18362.0` folder), `lib/` (and its
    /// `uap10.0` and `uap10.0.18362` folders) and everything under
    /// `References/`. Folders of packages not listed in `used` are never
    /// visited, even when present on disk. Results are absolute, unique and
    /// sorted.
    pub fn find_winmds(&self, packages_dir: &Path, used: &PackageSet) -> Vec<PathBuf> {
        let mut results = BTreeSet::new();

        for (name, version) in used {
            let package_dir = packages_dir.join(package_folder_name(name, version));
            if !package_dir.is_dir() {
                continue;
            }

            for metadata_dir in find_dirs_named(&package_dir, "metadata") {
                results.extend(winmds_in(&metadata_dir));
                results.extend(winmds_in(&metadata_dir.join("10.0.18362.0")));
            }

            for lib_dir in find_dirs_named(&package_dir, "lib") {
                results.extend(winmds_in(&lib_dir));
                results.extend(winmds_in(&lib_dir.join("uap10.0")));
                results.extend(winmds_in(&lib_dir.join("uap10.0.18362")));
            }

            for references_dir in find_dirs_named(&package_dir, "References") {
                results.extend(
                    WalkDir::new(&references_dir)
                        .into_iter()
                        .filter_map(|e| e.ok())
                        .filter(|e| e.file_type().is_file() && has_extension(e.path(), "winmd"))
                        .map(|e| absolute(e.path())),
                );
            }
        }

        debug!("Found {} metadata files", results.len());
        results.into_iter().collect()
    }

    /// Copy the Windows App SDK license to `share/Microsoft.WindowsAppSDK/copyright`
    ///
    /// Returns the destination when a license was found and copied.
    pub fn copy_license(
        &self,
        packages_dir: &Path,
        used: &PackageSet,
        share_dir: &Path,
    ) -> Outcome<Option<PathBuf>> {
        let Some((name, version)) = used
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(WINDOWS_APP_SDK_PACKAGE))
        else {
            return Outcome::clean(None);
        };

        let license = packages_dir
            .join(package_folder_name(name, version))
            .join("license.txt");
        if !license.is_file() {
            return Outcome::clean(None);
        }

        let dest_dir = share_dir.join(WINDOWS_APP_SDK_PACKAGE);
        let dest = dest_dir.join("copyright");
        match fs::create_dir_all(&dest_dir).and_then(|_| fs::copy(&license, &dest)) {
            Ok(_) => Outcome::clean(Some(dest)),
            Err(e) => Outcome::degraded(None, Warning::new(dest.display().to_string(), e)),
        }
    }
}

/// Names of the architecture folders present under `root`
pub fn arch_dirs(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = subdirs(root).iter().map(|d| dir_name(d)).collect();
    names.sort();
    names
}

/// Every directory under `root` (at any depth) whose name matches `name` ignoring case
fn find_dirs_named(root: &Path, name: &str) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_dir() && e.file_name().to_string_lossy().eq_ignore_ascii_case(name)
        })
        .map(|e| e.into_path())
        .collect()
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

fn strip_prefix_ci(name: &str, prefix: &str) -> Option<String> {
    match (name.get(..prefix.len()), name.get(prefix.len()..)) {
        (Some(head), Some(rest)) if !rest.is_empty() && head.eq_ignore_ascii_case(prefix) => {
            Some(rest.to_string())
        }
        _ => None,
    }
}

fn known_arch(name: &str) -> Option<String> {
    Arch::ALL
        .iter()
        .find(|a| a.as_str().eq_ignore_ascii_case(name))
        .map(|a| a.as_str().to_string())
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

fn is_import_lib(path: &Path) -> bool {
    has_extension(path, "lib")
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

fn winmds_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && has_extension(p, "winmd"))
                .map(|p| absolute(&p))
                .collect()
        })
        .unwrap_or_default()
}

/// Copy files directly inside `from` that pass `filter` into `to`
fn copy_top_files(from: &Path, to: &Path, filter: impl Fn(&Path) -> bool) -> Outcome<usize> {
    let mut outcome = Outcome::clean(0);
    let entries = match fs::read_dir(from) {
        Ok(entries) => entries,
        Err(_) => return outcome,
    };

    let files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && filter(p))
        .collect();
    if files.is_empty() {
        return outcome;
    }

    if let Err(e) = fs::create_dir_all(to) {
        outcome.push(Warning::new(to.display().to_string(), e));
        return outcome;
    }

    for file in files {
        let Some(file_name) = file.file_name() else {
            continue;
        };
        let target = to.join(file_name);
        match fs::copy(&file, &target) {
            Ok(_) => outcome.value += 1,
            Err(e) => outcome.push(Warning::new(file.display().to_string(), e)),
        }
    }
    outcome
}
