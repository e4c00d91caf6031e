//! Development certificates and code signing
//!
//! Certificates are created and imported through PowerShell's PKI cmdlets;
//! signing goes through `signtool.exe` from BuildTools.

use crate::build_tools::BuildToolsService;
use crate::error::{Error, Result};
use crate::manifest::{find_project_manifest, read_manifest_publisher};
use crate::powershell::{quote, PowerShell};
use crate::runner::RunOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use winsdk_core::utils::{default_publisher, normalize_publisher};
use winsdk_core::CancelToken;

/// Default password protecting generated certificates
pub const DEFAULT_CERT_PASSWORD: &str = "password";

/// Default validity of generated certificates, in days
pub const DEFAULT_VALID_DAYS: u32 = 365;

/// Default certificate file name
pub const DEFAULT_CERT_FILE: &str = "devcert.pfx";

/// Store MSIX sideloading trusts
const TRUSTED_PEOPLE_STORE: &str = r"Cert:\LocalMachine\TrustedPeople";

/// Module path giving the PKI cmdlets a clean lookup when launched from PowerShell 7
const PS_MODULE_PATH: &str = r"C:\Program Files\WindowsPowerShell\Modules;C:\WINDOWS\system32\WindowsPowerShell\v1.0\Modules";

/// A generated certificate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateResult {
    /// `.pfx` file written
    pub path: PathBuf,

    /// Password protecting the private key
    pub password: String,

    /// Publisher the certificate was issued for (`CN=...`)
    pub publisher: String,

    /// Certificate subject
    pub subject: String,
}

/// Pick the publisher for a certificate or package
///
/// In order: `explicit`, the Identity Publisher of `manifest`, the project
/// manifest found walking up from `start_dir`, then `CN={user}`.
pub fn infer_publisher(
    explicit: Option<&str>,
    manifest: Option<&Path>,
    start_dir: &Path,
) -> String {
    if let Some(publisher) = explicit.map(str::trim).filter(|p| !p.is_empty()) {
        return normalize_publisher(publisher);
    }

    let from_manifest = manifest
        .and_then(read_manifest_publisher)
        .or_else(|| find_project_manifest(start_dir).and_then(|p| read_manifest_publisher(&p)));
    match from_manifest {
        Some(publisher) if !publisher.trim().is_empty() => {
            debug!("Using publisher from manifest: {}", publisher);
            normalize_publisher(&publisher)
        }
        _ => default_publisher(),
    }
}

/// Creates, installs and uses development certificates
#[derive(Clone)]
pub struct CertificateService {
    powershell: PowerShell,
    build_tools: BuildToolsService,
}

impl CertificateService {
    /// Create a service over a PowerShell runner and BuildTools
    pub fn new(powershell: PowerShell, build_tools: BuildToolsService) -> Self {
        Self {
            powershell,
            build_tools,
        }
    }

    /// Generate a self-signed code-signing certificate and export it to `output`
    pub async fn generate_dev_certificate(
        &self,
        publisher: &str,
        output: &Path,
        password: &str,
        valid_days: u32,
        cancel: &CancelToken,
    ) -> Result<CertificateResult> {
        if valid_days == 0 {
            return Err(Error::invalid_input("Certificate validity must be at least one day"));
        }

        let publisher = normalize_publisher(publisher);
        let common_name = subject_common_name(&publisher);
        if common_name.is_empty() {
            return Err(Error::invalid_input("Publisher must not be empty"));
        }

        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let output = std::path::absolute(output)?;

        info!("Generating development certificate for {}", publisher);
        let command = generate_command(&common_name, &output, password, valid_days);
        self.powershell
            .run_command(&command, &certificate_env(), cancel)
            .await?;

        if !output.is_file() {
            return Err(Error::file_not_found(&output));
        }

        Ok(CertificateResult {
            path: output,
            password: password.to_string(),
            subject: format!("CN={}", common_name),
            publisher,
        })
    }

    /// Import a certificate into the machine's TrustedPeople store
    ///
    /// Returns `false` when a matching certificate is already installed and
    /// `force` is not set. The import runs elevated.
    pub async fn install_certificate(
        &self,
        cert_path: &Path,
        password: &str,
        force: bool,
        cancel: &CancelToken,
    ) -> Result<bool> {
        let cert_path = std::path::absolute(cert_path)?;
        if !cert_path.is_file() {
            return Err(Error::file_not_found(&cert_path));
        }

        if !force {
            let name = cert_path
                .file_stem()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let check = format!(
                "Get-ChildItem -Path {} | Where-Object {{ $_.Subject -like {} }}",
                quote(TRUSTED_PEOPLE_STORE),
                quote(&format!("*{}*", name))
            );
            match self
                .powershell
                .run_command(&check, &certificate_env(), cancel)
                .await
            {
                Ok(found) if !found.trim().is_empty() => {
                    info!("Certificate appears to already be installed");
                    return Ok(false);
                }
                Ok(_) => {}
                Err(e) if e.is_cancelled() => return Err(e),
                Err(e) => debug!("Installed certificate check failed, installing anyway: {}", e),
            }
        }

        let import = format!(
            "Import-PfxCertificate -FilePath {} -CertStoreLocation {} -Password {}",
            quote(&cert_path.display().to_string()),
            quote(TRUSTED_PEOPLE_STORE),
            secure_string(password)
        );
        self.powershell
            .run_command(&import, &RunOptions::new().elevated(true), cancel)
            .await?;
        info!("Certificate installed to the TrustedPeople store");
        Ok(true)
    }

    /// Sign `file` with the certificate at `cert_path`
    pub async fn sign_file(
        &self,
        file: &Path,
        cert_path: &Path,
        password: &str,
        timestamp_url: Option<&str>,
        cancel: &CancelToken,
    ) -> Result<()> {
        if !file.is_file() {
            return Err(Error::file_not_found(file));
        }
        if !cert_path.is_file() {
            return Err(Error::file_not_found(cert_path));
        }

        debug!("Signing {}", file.display());
        let args = sign_args(file, cert_path, password, timestamp_url);
        self.build_tools
            .run_build_tool("signtool.exe", &args, cancel)
            .await?;
        info!("Signed {}", file.display());
        Ok(())
    }
}

/// `signtool` arguments for a SHA256 signature
pub fn sign_args(
    file: &Path,
    cert_path: &Path,
    password: &str,
    timestamp_url: Option<&str>,
) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "sign".into(),
        "/f".into(),
        cert_path.display().to_string(),
        "/p".into(),
        password.to_string(),
        "/fd".into(),
        "SHA256".into(),
    ];
    if let Some(url) = timestamp_url.map(str::trim).filter(|u| !u.is_empty()) {
        args.extend(["/tr".into(), url.to_string(), "/td".into(), "SHA256".into()]);
    }
    args.push(file.display().to_string());
    args
}

/// The subject common name for a publisher: `CN=` and quotes stripped
fn subject_common_name(publisher: &str) -> String {
    let trimmed = publisher.trim();
    let without_prefix = match trimmed.get(..3) {
        Some(head) if head.eq_ignore_ascii_case("CN=") => &trimmed[3..],
        _ => trimmed,
    };
    without_prefix
        .chars()
        .filter(|c| *c != '"' && *c != '\'')
        .collect::<String>()
        .trim()
        .to_string()
}

fn secure_string(password: &str) -> String {
    format!(
        "(ConvertTo-SecureString -String {} -Force -AsPlainText)",
        quote(password)
    )
}

fn generate_command(common_name: &str, output: &Path, password: &str, valid_days: u32) -> String {
    format!(
        "$dest={dest};$cert=New-SelfSignedCertificate -Type Custom -Subject {subject} \
         -KeyUsage DigitalSignature -FriendlyName 'MSIX Dev Certificate' \
         -CertStoreLocation 'Cert:\\CurrentUser\\My' -KeyProtection None \
         -KeyExportPolicy Exportable -Provider 'Microsoft Software Key Storage Provider' \
         -TextExtension @('2.5.29.37={{text}}1.3.6.1.5.5.7.3.3', '2.5.29.19={{text}}') \
         -NotAfter (Get-Date).AddDays({valid_days}); \
         Export-PfxCertificate -Cert $cert -FilePath $dest -Password {password} -Force",
        dest = quote(&output.display().to_string()),
        subject = quote(&format!("CN={}", common_name)),
        password = secure_string(password),
    )
}

fn certificate_env() -> RunOptions {
    RunOptions::new().with_env("PSModulePath", PS_MODULE_PATH)
}
