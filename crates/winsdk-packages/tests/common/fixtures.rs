//! Package archives and package folders for tests

use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use winsdk_core::paths::package_folder_name;
use winsdk_packages::nuget::COMPLETION_MARKER;
use zip::write::SimpleFileOptions;

use super::constants::HEADER_CONTENT;

/// Build a `.nupkg` in memory
pub fn build_nupkg(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        zip.start_file(*name, SimpleFileOptions::default()).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

/// A minimal nuspec declaring `dependencies` as (id, version range)
pub fn nuspec(id: &str, version: &str, dependencies: &[(&str, &str)]) -> String {
    let deps: String = dependencies
        .iter()
        .map(|(dep, range)| format!(r#"        <dependency id="{}" version="{}" />"#, dep, range))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<package xmlns="http://schemas.microsoft.com/packaging/2013/05/nuspec.xsd">
  <metadata>
    <id>{id}</id>
    <version>{version}</version>
    <dependencies>
      <group targetFramework="native0.0">
{deps}
      </group>
    </dependencies>
  </metadata>
</package>"#
    )
}

/// A `.nupkg` holding a nuspec and one header
pub fn simple_nupkg(id: &str, version: &str, dependencies: &[(&str, &str)]) -> Vec<u8> {
    let nuspec_xml = nuspec(id, version, dependencies);
    let header = format!("include/{}.h", id.to_lowercase());
    let nuspec_name = format!("{}.nuspec", id);
    let entries: Vec<(&str, &[u8])> = vec![
        (nuspec_name.as_str(), nuspec_xml.as_bytes()),
        (header.as_str(), HEADER_CONTENT.as_bytes()),
        ("_rels/.rels", b"<Relationships />".as_slice()),
        ("[Content_Types].xml", b"<Types />".as_slice()),
    ];
    build_nupkg(&entries)
}

/// Create a complete package folder and return its path
pub fn installed_package(packages_dir: &Path, name: &str, version: &str) -> PathBuf {
    let dir = packages_dir.join(package_folder_name(name, version));
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(COMPLETION_MARKER), b"").unwrap();
    dir
}

/// Create a package folder without a completion marker
pub fn partial_package(packages_dir: &Path, name: &str, version: &str) -> PathBuf {
    let dir = packages_dir.join(package_folder_name(name, version));
    fs::create_dir_all(dir.join("include")).unwrap();
    dir
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
