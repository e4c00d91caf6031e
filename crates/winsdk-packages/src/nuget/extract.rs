//! Package folder materialization
//!
//! A `.nupkg` is extracted into a hidden staging folder next to its final
//! location. Once every entry is written, a completion marker is created and
//! the staging folder is renamed to `{Package}.{Version}`. A package folder is
//! only considered installed when it carries that marker (or the
//! `.nupkg.metadata` file nuget.exe writes as its own last step), so a crash
//! mid-extraction never leaves a folder that passes for a finished install.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use winsdk_core::paths::package_folder_name;
use winsdk_core::{Error, Result};

/// Marker written into a package folder after a complete extraction
pub const COMPLETION_MARKER: &str = ".winsdk-complete";

/// Completion file written by nuget.exe
const NUGET_METADATA_MARKER: &str = ".nupkg.metadata";

/// Whether `dir` holds a completely extracted package
pub fn is_complete(dir: &Path) -> bool {
    dir.is_dir()
        && (dir.join(COMPLETION_MARKER).is_file() || dir.join(NUGET_METADATA_MARKER).is_file())
}

/// Whether `{packages_dir}/{name}.{version}` holds a completely extracted package
pub fn is_package_installed(packages_dir: &Path, name: &str, version: &str) -> bool {
    is_complete(&packages_dir.join(package_folder_name(name, version)))
}

/// Extract `nupkg` into `target`, replacing any incomplete folder there
///
/// Returns the contents of the package's `.nuspec`, if it has one.
pub fn extract_package(nupkg: &Path, target: &Path) -> Result<Option<String>> {
    let parent = target
        .parent()
        .ok_or_else(|| Error::archive(target.display().to_string(), "no parent directory"))?;
    fs::create_dir_all(parent)?;

    let staging = parent.join(format!(".staging-{}", uuid::Uuid::new_v4()));
    let result = extract_into(nupkg, &staging).and_then(|nuspec| {
        fs::write(staging.join(COMPLETION_MARKER), b"")?;
        if target.exists() {
            debug!("Removing incomplete package folder {}", target.display());
            fs::remove_dir_all(target)?;
        }
        fs::rename(&staging, target)?;
        Ok(nuspec)
    });

    if result.is_err() && staging.exists() {
        let _ = fs::remove_dir_all(&staging);
    }
    result
}

/// Read the `.nuspec` at the top level of an extracted package folder
pub fn read_nuspec(dir: &Path) -> Option<String> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .find(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("nuspec"))
        })
        .and_then(|path| fs::read_to_string(path).ok())
}

fn extract_into(nupkg: &Path, dest: &Path) -> Result<Option<String>> {
    let archive_err = |e: zip::result::ZipError| Error::archive(nupkg.display().to_string(), e);

    let file = File::open(nupkg)?;
    let mut archive = zip::ZipArchive::new(file).map_err(archive_err)?;
    fs::create_dir_all(dest)?;

    let mut nuspec = None;
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(archive_err)?;
        let Some(relative) = entry.enclosed_name().map(decode_entry_path) else {
            return Err(Error::archive(
                nupkg.display().to_string(),
                format!("entry escapes the package root: {}", entry.name()),
            ));
        };
        if is_packaging_metadata(&relative) {
            continue;
        }

        let out_path = dest.join(&relative);
        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut out = File::create(&out_path)?;
        io::copy(&mut entry, &mut out)?;

        let is_root_nuspec = relative.components().count() == 1
            && relative
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("nuspec"));
        if is_root_nuspec {
            nuspec = fs::read_to_string(&out_path).ok();
        }
    }

    Ok(nuspec)
}

/// OPC bookkeeping entries that nuget.exe does not extract either
fn is_packaging_metadata(relative: &Path) -> bool {
    let first = relative
        .components()
        .next()
        .map(|c| c.as_os_str().to_string_lossy().to_string())
        .unwrap_or_default();
    first == "_rels" || first == "package" || first == "[Content_Types].xml"
}

/// Undo the percent-encoding OPC applies to entry names (`%2B` → `+`)
fn decode_entry_path(path: PathBuf) -> PathBuf {
    let raw = path.to_string_lossy().into_owned();
    if !raw.contains('%') {
        return path;
    }

    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok();
            if let Some(value) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                decoded.push(value);
                i += 3;
                continue;
            }
        }
        decoded.push(bytes[i]);
        i += 1;
    }
    PathBuf::from(String::from_utf8_lossy(&decoded).to_string())
}
