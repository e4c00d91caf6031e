//! AppX manifest identity and minimal manifest generation

use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::debug;
use winsdk_core::paths::WORKSPACE_DIR_NAME;
use winsdk_core::utils::{clean_package_name, normalize_publisher, xml_escape};

/// Manifest file name inside a package folder or workspace
pub const MANIFEST_FILE_NAME: &str = "appxmanifest.xml";

static IDENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<Identity\b[^>]*>").expect("identity regex is valid"));

static NAME_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bName\s*=\s*["']([^"']*)["']"#).expect("name attribute regex is valid")
});

static PUBLISHER_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bPublisher\s*=\s*["']([^"']*)["']"#)
        .expect("publisher attribute regex is valid")
});

static APPLICATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<Application\b[^>]*\bId\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("application regex is valid")
});

/// Package identity declared by an AppX manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsixIdentity {
    /// `Identity/@Name`
    pub package_name: String,

    /// `Identity/@Publisher`
    pub publisher: String,

    /// `Application/@Id` of the first application
    pub application_id: String,
}

/// Extract the identity from manifest XML
pub fn parse_manifest_identity(content: &str) -> Result<MsixIdentity> {
    let identity = IDENTITY_RE
        .find(content)
        .ok_or_else(|| Error::invalid_manifest("No Identity element found in AppX manifest"))?
        .as_str();

    let attr = |re: &Regex| re.captures(identity).map(|c| c[1].to_string());
    let (Some(package_name), Some(publisher)) = (attr(&NAME_ATTR_RE), attr(&PUBLISHER_ATTR_RE))
    else {
        return Err(Error::invalid_manifest(
            "AppX manifest Identity element missing required Name or Publisher attributes",
        ));
    };

    let application_id = APPLICATION_RE
        .captures(content)
        .map(|c| c[1].to_string())
        .ok_or_else(|| {
            Error::invalid_manifest("No Application element with Id attribute found in AppX manifest")
        })?;

    Ok(MsixIdentity {
        package_name,
        publisher,
        application_id,
    })
}

/// Read and parse the identity of the manifest at `path`
pub fn read_manifest_identity(path: &Path) -> Result<MsixIdentity> {
    if !path.is_file() {
        return Err(Error::manifest_not_found(path));
    }
    parse_manifest_identity(&fs::read_to_string(path)?)
}

/// The `Identity/@Publisher` of a manifest, without requiring an application
pub fn read_manifest_publisher(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let identity = IDENTITY_RE.find(&content)?;
    PUBLISHER_ATTR_RE
        .captures(identity.as_str())
        .map(|c| c[1].to_string())
}

/// The `Identity/@Name` of a manifest, without requiring an application
pub fn read_manifest_name(path: &Path) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    let identity = IDENTITY_RE.find(&content)?;
    NAME_ATTR_RE
        .captures(identity.as_str())
        .map(|c| c[1].to_string())
}

/// Find `.winsdk/appxmanifest.xml` at or above `start_dir`
pub fn find_project_manifest(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(WORKSPACE_DIR_NAME).join(MANIFEST_FILE_NAME))
        .find(|path| path.is_file())
}

/// Find the manifest file in a folder, matching the file name case-insensitively
pub fn find_manifest_in(dir: &Path) -> Option<PathBuf> {
    fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.is_file()
                && p.file_name()
                    .is_some_and(|n| n.to_string_lossy().eq_ignore_ascii_case(MANIFEST_FILE_NAME))
        })
}

/// Fields of a generated manifest
#[derive(Debug, Clone)]
pub struct ManifestOptions {
    /// Package name (cleaned to MSIX rules)
    pub package_name: String,

    /// Publisher distinguished name
    pub publisher: String,

    /// Four-part package version
    pub version: String,

    /// Display description
    pub description: String,

    /// Executable launched by the application
    pub executable: String,

    /// Sparse package (identity for an unpackaged executable)
    pub sparse: bool,

    /// Logo image copied into `Assets/`
    pub logo_path: Option<PathBuf>,
}

impl ManifestOptions {
    /// Options with the default version and description
    pub fn new(package_name: impl Into<String>, publisher: impl Into<String>) -> Self {
        let package_name = package_name.into();
        Self {
            executable: format!("{}.exe", package_name),
            package_name,
            publisher: publisher.into(),
            version: "1.0.0.0".to_string(),
            description: "Windows Application".to_string(),
            sparse: false,
            logo_path: None,
        }
    }
}

/// Render a minimal AppX manifest
pub fn render_manifest(options: &ManifestOptions) -> String {
    let name = xml_escape(&clean_package_name(&options.package_name));
    let display = xml_escape(&options.package_name);
    let publisher = xml_escape(&normalize_publisher(&options.publisher));
    let version = xml_escape(&options.version);
    let description = xml_escape(&options.description);
    let executable = xml_escape(&options.executable);
    let logo = options
        .logo_path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| format!("Assets\\{}", n.to_string_lossy()))
        .unwrap_or_else(|| "Assets\\StoreLogo.png".to_string());
    let logo = xml_escape(&logo);

    let (sparse_properties, sparse_attrs) = if options.sparse {
        (
            "\n    <uap10:AllowExternalContent>true</uap10:AllowExternalContent>",
            " uap10:TrustLevel=\"mediumIL\" uap10:RuntimeBehavior=\"win32App\"",
        )
    } else {
        ("", "")
    };
    let entry_point = if options.sparse {
        ""
    } else {
        " EntryPoint=\"Windows.FullTrustApplication\""
    };

    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<Package
  xmlns="http://schemas.microsoft.com/appx/manifest/foundation/windows10"
  xmlns:uap="http://schemas.microsoft.com/appx/manifest/uap/windows10"
  xmlns:uap10="http://schemas.microsoft.com/appx/manifest/uap/windows10/10"
  xmlns:rescap="http://schemas.microsoft.com/appx/manifest/foundation/windows10/restrictedcapabilities"
  IgnorableNamespaces="uap uap10 rescap">

  <Identity Name="{name}" Publisher="{publisher}" Version="{version}" />

  <Properties>
    <DisplayName>{display}</DisplayName>
    <PublisherDisplayName>{publisher}</PublisherDisplayName>
    <Logo>{logo}</Logo>{sparse_properties}
  </Properties>

  <Dependencies>
    <TargetDeviceFamily Name="Windows.Desktop" MinVersion="10.0.18362.0" MaxVersionTested="10.0.26100.0" />
  </Dependencies>

  <Resources>
    <Resource Language="en-us" />
  </Resources>

  <Applications>
    <Application Id="App" Executable="{executable}"{entry_point}{sparse_attrs}>
      <uap:VisualElements
        DisplayName="{display}"
        Description="{description}"
        BackgroundColor="transparent"
        Square150x150Logo="{logo}"
        Square44x44Logo="{logo}" />
    </Application>
  </Applications>

  <Capabilities>
    <rescap:Capability Name="runFullTrust" />
  </Capabilities>
</Package>
"#
    )
}

/// Write `appxmanifest.xml` into `dir`, refusing to overwrite an existing one
///
/// A logo given in the options is copied into `dir/Assets`.
pub fn generate_manifest(dir: &Path, options: &ManifestOptions) -> Result<PathBuf> {
    let path = dir.join(MANIFEST_FILE_NAME);
    if path.exists() {
        return Err(Error::invalid_input(format!(
            "Manifest already exists at: {}",
            path.display()
        )));
    }

    fs::create_dir_all(dir)?;
    fs::write(&path, render_manifest(options))?;
    debug!("Manifest written to {}", path.display());

    if let Some(logo) = &options.logo_path {
        if !logo.is_file() {
            return Err(Error::file_not_found(logo));
        }
        if let Some(file_name) = logo.file_name() {
            let assets = dir.join("Assets");
            fs::create_dir_all(&assets)?;
            fs::copy(logo, assets.join(file_name))?;
        }
    }
    Ok(path)
}
