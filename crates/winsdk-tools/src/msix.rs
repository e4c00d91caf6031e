//! MSIX packaging and executable identity
//!
//! Packaging runs `makepri` (optional), `makeappx pack` and, when signing is
//! requested, the certificate flow. Identity injection rewrites the win32
//! resource manifest embedded in an executable with `mt.exe` so an unpackaged
//! binary runs with the identity of a registered sparse package.

use crate::build_tools::BuildToolsService;
use crate::certificate::{CertificateService, DEFAULT_CERT_PASSWORD, DEFAULT_VALID_DAYS};
use crate::error::{Error, Result};
use crate::manifest::{
    find_manifest_in, read_manifest_identity, read_manifest_name, read_manifest_publisher,
    MsixIdentity, MANIFEST_FILE_NAME,
};
use crate::powershell::{quote, PowerShell};
use crate::runner::RunOptions;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info, warn};
use winsdk_core::utils::{clean_package_name, xml_escape};
use winsdk_core::CancelToken;

/// PRI configuration written into the package folder
pub const PRI_CONFIG_FILE: &str = "priconfig.xml";

/// Resource index written into the package folder
pub const PRI_FILE: &str = "resources.pri";

const EXTRACTED_MANIFEST_FILE: &str = "temp_extracted.manifest";
const COMBINED_MANIFEST_FILE: &str = "combined.manifest";

static MSIX_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<msix\b[^>]*>[\s\S]*?</msix\s*>").expect("msix block regex is valid")
});

static MSIX_EMPTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<msix\b[^>]*/>").expect("msix element regex is valid"));

/// How an MSIX package is built and signed
#[derive(Debug, Clone)]
pub struct MsixPackageOptions {
    /// Package file name stem (defaults to the manifest Identity Name)
    pub package_name: Option<String>,

    /// Skip `resources.pri` generation
    pub skip_pri: bool,

    /// Sign the package after packing
    pub sign: bool,

    /// Certificate used for signing
    pub certificate_path: Option<PathBuf>,

    /// Certificate password
    pub certificate_password: String,

    /// Generate a development certificate when none is given
    pub generate_dev_cert: bool,

    /// Install the certificate into TrustedPeople before signing
    pub install_dev_cert: bool,

    /// Publisher for a generated certificate (defaults to the manifest's)
    pub publisher: Option<String>,

    /// RFC 3161 timestamp server
    pub timestamp_url: Option<String>,
}

impl Default for MsixPackageOptions {
    fn default() -> Self {
        Self {
            package_name: None,
            skip_pri: false,
            sign: false,
            certificate_path: None,
            certificate_password: DEFAULT_CERT_PASSWORD.to_string(),
            generate_dev_cert: false,
            install_dev_cert: false,
            publisher: None,
            timestamp_url: None,
        }
    }
}

/// Result of a packaging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMsixPackageResult {
    /// Package written
    pub msix_path: PathBuf,

    /// Whether the package was signed
    pub signed: bool,
}

/// Options for registering a debug identity
#[derive(Debug, Clone, Default)]
pub struct DebugIdentityOptions {
    /// Only embed the identity, do not register the package
    pub no_install: bool,

    /// Application root (defaults to the executable's folder)
    pub location: Option<PathBuf>,
}

/// Builds MSIX packages and stamps identity into executables
#[derive(Clone)]
pub struct MsixPackagingService {
    build_tools: BuildToolsService,
    certificates: CertificateService,
    powershell: PowerShell,
}

impl MsixPackagingService {
    /// Create a service from its collaborators
    pub fn new(
        build_tools: BuildToolsService,
        certificates: CertificateService,
        powershell: PowerShell,
    ) -> Self {
        Self {
            build_tools,
            certificates,
            powershell,
        }
    }

    /// Embed the identity from `manifest` into the resource manifest of `exe`
    ///
    /// Temporary manifests go to `work_dir` (the executable's folder by
    /// default) and are removed afterwards.
    pub async fn add_msix_identity_to_exe(
        &self,
        exe: &Path,
        manifest: &Path,
        work_dir: Option<&Path>,
        cancel: &CancelToken,
    ) -> Result<MsixIdentity> {
        if !exe.is_file() {
            return Err(Error::file_not_found(exe));
        }
        let identity = read_manifest_identity(manifest)?;

        let work_dir = match work_dir {
            Some(dir) => dir.to_path_buf(),
            None => exe
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let extracted = work_dir.join(EXTRACTED_MANIFEST_FILE);
        let combined = work_dir.join(COMBINED_MANIFEST_FILE);

        let result = self
            .embed_identity(exe, &identity, &extracted, &combined, cancel)
            .await;
        remove_quietly(&extracted);
        remove_quietly(&combined);
        result?;

        info!(
            "Added identity {} ({}) to {}",
            identity.package_name,
            identity.application_id,
            exe.display()
        );
        Ok(identity)
    }

    async fn embed_identity(
        &self,
        exe: &Path,
        identity: &MsixIdentity,
        extracted: &Path,
        combined: &Path,
        cancel: &CancelToken,
    ) -> Result<()> {
        let extract_args = vec![
            format!("-inputresource:{};#1", exe.display()),
            format!("-out:{}", extracted.display()),
        ];
        let existing = match self
            .build_tools
            .run_build_tool("mt.exe", &extract_args, cancel)
            .await
        {
            Ok(_) if extracted.is_file() => Some(fs::read_to_string(extracted)?),
            Ok(_) => None,
            Err(e) if e.is_cancelled() || e.is_resolution() => return Err(e),
            Err(e) => {
                debug!("No embedded manifest in {}: {}", exe.display(), e);
                None
            }
        };

        let manifest = match existing {
            Some(content) => merge_identity_into_manifest(&content, identity)?,
            None => new_identity_manifest(identity),
        };
        fs::write(combined, manifest)?;

        let embed_args = vec![
            "-manifest".to_string(),
            combined.display().to_string(),
            format!("-outputresource:{};#1", exe.display()),
        ];
        self.build_tools
            .run_build_tool("mt.exe", &embed_args, cancel)
            .await?;
        Ok(())
    }

    /// Embed identity into `exe` and register `manifest` as a sparse package
    pub async fn create_debug_identity(
        &self,
        exe: &Path,
        manifest: &Path,
        options: &DebugIdentityOptions,
        cancel: &CancelToken,
    ) -> Result<MsixIdentity> {
        let identity = self
            .add_msix_identity_to_exe(exe, manifest, None, cancel)
            .await?;
        if options.no_install {
            return Ok(identity);
        }

        let location = match &options.location {
            Some(location) => location.clone(),
            None => exe
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };
        let manifest = std::path::absolute(manifest)?;
        let location = std::path::absolute(location)?;
        let command = format!(
            "Add-AppxPackage -Register {} -ExternalLocation {} -ForceUpdateFromAnyVersion",
            quote(&manifest.display().to_string()),
            quote(&location.display().to_string())
        );
        self.powershell
            .run_command(&command, &RunOptions::new(), cancel)
            .await?;
        info!("Registered debug identity {}", identity.package_name);
        Ok(identity)
    }

    /// Write `priconfig.xml` for the package folder
    pub async fn create_pri_config(
        &self,
        package_dir: &Path,
        language: &str,
        platform_version: &str,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        if !package_dir.is_dir() {
            return Err(Error::directory_not_found(package_dir));
        }
        let config = package_dir.join(PRI_CONFIG_FILE);
        let args = vec![
            "createconfig".to_string(),
            "/cf".to_string(),
            config.display().to_string(),
            "/dq".to_string(),
            language.to_string(),
            "/pv".to_string(),
            platform_version.to_string(),
            "/o".to_string(),
        ];
        self.build_tools
            .run_build_tool("makepri.exe", &args, cancel)
            .await?;
        Ok(config)
    }

    /// Index the package folder into `resources.pri`
    pub async fn generate_pri(
        &self,
        package_dir: &Path,
        config: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        if !package_dir.is_dir() {
            return Err(Error::directory_not_found(package_dir));
        }
        if !config.is_file() {
            return Err(Error::file_not_found(config));
        }
        let output = package_dir.join(PRI_FILE);
        let args = vec![
            "new".to_string(),
            "/pr".to_string(),
            package_dir.display().to_string(),
            "/cf".to_string(),
            config.display().to_string(),
            "/of".to_string(),
            output.display().to_string(),
            "/o".to_string(),
        ];
        self.build_tools
            .run_build_tool("makepri.exe", &args, cancel)
            .await?;
        Ok(output)
    }

    /// Pack `input` into an MSIX at `output`
    ///
    /// `output` ending in `.msix` is used as the package path; anything else
    /// is a folder receiving `{package name}.msix`. On failure after packing
    /// started the partial package is removed. PRI intermediates are always
    /// removed from the input folder.
    pub async fn create_msix_package(
        &self,
        input: &Path,
        output: &Path,
        options: &MsixPackageOptions,
        cancel: &CancelToken,
    ) -> Result<CreateMsixPackageResult> {
        if !input.is_dir() {
            return Err(Error::directory_not_found(input));
        }
        let manifest = find_manifest_in(input)
            .ok_or_else(|| Error::manifest_not_found(&input.join(MANIFEST_FILE_NAME)))?;

        let package_name = options
            .package_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .or_else(|| read_manifest_name(&manifest))
            .unwrap_or_else(|| "Package".to_string());
        let package_name = clean_package_name(&package_name);
        let publisher = options
            .publisher
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| read_manifest_publisher(&manifest));

        let msix_path = resolve_output_path(output, &package_name);
        let out_dir = msix_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        fs::create_dir_all(&out_dir)?;
        info!("Creating MSIX package {}", msix_path.display());

        if !options.skip_pri {
            let pri = self.build_pri(input, cancel).await;
            if let Err(e) = pri {
                remove_pri_intermediates(input);
                return Err(e);
            }
        }

        let signing = self
            .pack_and_sign(input, &msix_path, &out_dir, &package_name, publisher, options, cancel)
            .await;
        if !options.skip_pri {
            remove_pri_intermediates(input);
        }
        if let Err(e) = signing {
            if msix_path.exists() {
                debug!("Removing partial package {}", msix_path.display());
                remove_quietly(&msix_path);
            }
            return Err(e);
        }

        info!("MSIX package created: {}", msix_path.display());
        Ok(CreateMsixPackageResult {
            msix_path,
            signed: options.sign,
        })
    }

    async fn build_pri(&self, input: &Path, cancel: &CancelToken) -> Result<()> {
        info!("Generating resource index");
        let config = self
            .create_pri_config(input, "en-US", "10.0.0", cancel)
            .await?;
        self.generate_pri(input, &config, cancel).await?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn pack_and_sign(
        &self,
        input: &Path,
        msix_path: &Path,
        out_dir: &Path,
        package_name: &str,
        publisher: Option<String>,
        options: &MsixPackageOptions,
        cancel: &CancelToken,
    ) -> Result<()> {
        let args = vec![
            "pack".to_string(),
            "/o".to_string(),
            "/d".to_string(),
            input.display().to_string(),
            "/nv".to_string(),
            "/p".to_string(),
            msix_path.display().to_string(),
        ];
        self.build_tools
            .run_build_tool("makeappx.exe", &args, cancel)
            .await?;

        if !options.sign {
            return Ok(());
        }

        let password = options.certificate_password.as_str();
        let cert_path = match (&options.certificate_path, options.generate_dev_cert) {
            (Some(path), _) => path.clone(),
            (None, true) => {
                let publisher = publisher.ok_or_else(|| {
                    Error::invalid_input(
                        "Publisher name required for certificate generation. Provide a publisher or set one in the manifest.",
                    )
                })?;
                let path = out_dir.join(format!("{}_cert.pfx", package_name));
                self.certificates
                    .generate_dev_certificate(
                        &publisher,
                        &path,
                        password,
                        DEFAULT_VALID_DAYS,
                        cancel,
                    )
                    .await?
                    .path
            }
            (None, false) => {
                return Err(Error::invalid_input(
                    "Certificate path required for signing. Provide a certificate or enable development certificate generation.",
                ))
            }
        };

        if options.install_dev_cert {
            self.certificates
                .install_certificate(&cert_path, password, false, cancel)
                .await?;
        }

        self.certificates
            .sign_file(
                msix_path,
                &cert_path,
                password,
                options.timestamp_url.as_deref(),
                cancel,
            )
            .await
    }
}

/// Final package path for an output argument
pub fn resolve_output_path(output: &Path, package_name: &str) -> PathBuf {
    let is_msix = output
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("msix"));
    if is_msix {
        output.to_path_buf()
    } else {
        output.join(format!("{}.msix", package_name))
    }
}

/// The `<msix>` element carrying an identity
pub fn msix_element(identity: &MsixIdentity) -> String {
    format!(
        r#"<msix xmlns="urn:schemas-microsoft-com:msix.v1" publisher="{}" packageName="{}" applicationId="{}" />"#,
        xml_escape(&identity.publisher),
        xml_escape(&identity.package_name),
        xml_escape(&identity.application_id)
    )
}

/// Replace any `<msix>` element in an assembly manifest with `identity`
///
/// The new element goes right before the first `</assembly>`.
pub fn merge_identity_into_manifest(existing: &str, identity: &MsixIdentity) -> Result<String> {
    let Some((head, tail)) = existing.split_once("</assembly>") else {
        return Err(Error::invalid_manifest(
            "Invalid existing manifest structure: no closing assembly element",
        ));
    };

    let head = MSIX_EMPTY_RE.replace_all(head, "");
    let head = MSIX_BLOCK_RE.replace_all(&head, "");
    Ok(format!(
        "{}\n  {}\n</assembly>{}",
        head.trim_end(),
        msix_element(identity),
        tail
    ))
}

/// A minimal assembly manifest declaring only `identity`
pub fn new_identity_manifest(identity: &MsixIdentity) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<assembly xmlns="urn:schemas-microsoft-com:asm.v1" manifestVersion="1.0">
  <assemblyIdentity version="1.0.0.0" name="{}" type="win32"/>
  {}
</assembly>
"#,
        xml_escape(&identity.package_name),
        msix_element(identity)
    )
}

fn remove_pri_intermediates(input: &Path) {
    for name in [PRI_CONFIG_FILE, PRI_FILE] {
        let path = input.join(name);
        if path.exists() {
            if let Err(e) = fs::remove_file(&path) {
                warn!("Could not clean up {}: {}", path.display(), e);
            }
        }
    }
}

fn remove_quietly(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            debug!("Could not remove {}: {}", path.display(), e);
        }
    }
}
