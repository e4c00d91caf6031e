//! CLI argument parsing with clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use winsdk_tools::certificate::{DEFAULT_CERT_FILE, DEFAULT_CERT_PASSWORD, DEFAULT_VALID_DAYS};
use winsdk_tools::manifest::MANIFEST_FILE_NAME;

/// winsdk - Windows SDK workspaces and MSIX packaging
#[derive(Parser, Debug)]
#[command(name = "winsdk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, conflicts_with = "quiet")]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workspace with the latest SDK packages, a manifest and a
    /// development certificate, and write winsdk.yaml
    Init(SetupArgs),

    /// Install the SDK packages, honoring pinned versions
    Setup(SetupArgs),

    /// Install exactly the versions pinned in winsdk.yaml
    Restore(RestoreArgs),

    /// Move pinned versions to the latest releases
    Update(UpdateArgs),

    /// Development certificates
    #[command(subcommand)]
    Cert(CertCommands),

    /// Sign a file with a certificate
    Sign(SignArgs),

    /// AppX manifests
    #[command(subcommand)]
    Manifest(ManifestCommands),

    /// MSIX identity for executables
    #[command(subcommand)]
    Msix(MsixCommands),

    /// Create an MSIX package from a folder
    Package(PackageArgs),

    /// Give an executable a package identity for debugging
    CreateDebugIdentity(DebugIdentityArgs),

    /// Run a BuildTools executable
    Tool(ToolArgs),

    /// Print the workspace directory
    GetWinsdkPath(GetWinsdkPathArgs),

    /// Print the global workspace directory
    GetGlobalWinsdk,
}

// Workspace commands
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Directory receiving the .winsdk workspace (default: current directory)
    pub base_dir: Option<PathBuf>,

    /// Directory holding winsdk.yaml (default: the base directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Consider prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Ignore pinned versions and use the latest releases
    #[arg(long)]
    pub ignore_config: bool,

    /// Do not add .winsdk to .gitignore
    #[arg(long)]
    pub no_gitignore: bool,

    /// Answer yes to every question
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Only resolve versions and write winsdk.yaml
    #[arg(long)]
    pub config_only: bool,

    /// Skip development certificate generation (init only)
    #[arg(long)]
    pub no_cert: bool,
}

#[derive(Args, Debug)]
pub struct RestoreArgs {
    /// Directory receiving the .winsdk workspace (default: current directory)
    pub base_dir: Option<PathBuf>,

    /// Directory holding winsdk.yaml (default: the base directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Do not add .winsdk to .gitignore
    #[arg(long)]
    pub no_gitignore: bool,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Directory holding the .winsdk workspace (default: current directory)
    pub base_dir: Option<PathBuf>,

    /// Directory holding winsdk.yaml (default: the base directory)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Consider prerelease versions
    #[arg(long)]
    pub prerelease: bool,
}

// Certificate commands
#[derive(Subcommand, Debug)]
pub enum CertCommands {
    /// Generate a self-signed development certificate
    Generate(CertGenerateArgs),

    /// Install a certificate into the TrustedPeople store
    Install(CertInstallArgs),
}

#[derive(Args, Debug)]
pub struct CertGenerateArgs {
    /// Publisher (default: from the manifest, else CN=<user>)
    #[arg(long)]
    pub publisher: Option<String>,

    /// Manifest to read the publisher from
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Output .pfx file
    #[arg(short, long, default_value = DEFAULT_CERT_FILE)]
    pub output: PathBuf,

    /// Password protecting the .pfx
    #[arg(long, default_value = DEFAULT_CERT_PASSWORD)]
    pub password: String,

    /// Validity in days
    #[arg(long, default_value_t = DEFAULT_VALID_DAYS)]
    pub valid_days: u32,

    /// Install the certificate after generating it
    #[arg(long)]
    pub install: bool,

    /// Do not add the certificate to .gitignore
    #[arg(long)]
    pub no_gitignore: bool,
}

#[derive(Args, Debug)]
pub struct CertInstallArgs {
    /// Certificate (.pfx) to install
    pub cert_path: PathBuf,

    /// Password protecting the .pfx
    #[arg(long, default_value = DEFAULT_CERT_PASSWORD)]
    pub password: String,

    /// Install even when a matching certificate is present
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// File to sign
    pub file: PathBuf,

    /// Certificate (.pfx) to sign with
    pub cert_path: PathBuf,

    /// Password protecting the .pfx
    #[arg(long, default_value = DEFAULT_CERT_PASSWORD)]
    pub password: String,

    /// RFC 3161 timestamp server
    #[arg(long)]
    pub timestamp: Option<String>,
}

// Manifest commands
#[derive(Subcommand, Debug)]
pub enum ManifestCommands {
    /// Write a minimal appxmanifest.xml
    #[command(disable_version_flag = true)]
    Generate(ManifestGenerateArgs),
}

#[derive(Args, Debug)]
pub struct ManifestGenerateArgs {
    /// Directory receiving the manifest (default: current directory)
    pub directory: Option<PathBuf>,

    /// Package name (default: the directory name)
    #[arg(long)]
    pub package_name: Option<String>,

    /// Publisher (default: CN=<user>)
    #[arg(long)]
    pub publisher: Option<String>,

    /// Four-part package version
    #[arg(long, default_value = "1.0.0.0")]
    pub version: String,

    /// Description
    #[arg(long, default_value = "Windows Application")]
    pub description: String,

    /// Executable launched by the application (default: <name>.exe)
    #[arg(long)]
    pub executable: Option<String>,

    /// Sparse package for an unpackaged executable
    #[arg(long)]
    pub sparse: bool,

    /// Logo image copied into Assets
    #[arg(long)]
    pub logo: Option<PathBuf>,
}

// MSIX commands
#[derive(Subcommand, Debug)]
pub enum MsixCommands {
    /// Embed the manifest identity into an executable
    AddIdentity(AddIdentityArgs),
}

#[derive(Args, Debug)]
pub struct AddIdentityArgs {
    /// Executable to modify
    pub exe: PathBuf,

    /// Manifest providing the identity
    #[arg(long, default_value = MANIFEST_FILE_NAME)]
    pub manifest: PathBuf,
}

#[derive(Args, Debug)]
pub struct PackageArgs {
    /// Folder with appxmanifest.xml and the application files
    pub input_folder: PathBuf,

    /// Output .msix file or folder
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Package name (default: from the manifest)
    #[arg(long)]
    pub name: Option<String>,

    /// Do not generate resources.pri
    #[arg(long)]
    pub skip_pri: bool,

    /// Sign with this certificate
    #[arg(long)]
    pub cert: Option<PathBuf>,

    /// Password protecting the certificate
    #[arg(long, default_value = DEFAULT_CERT_PASSWORD)]
    pub cert_password: String,

    /// Generate a development certificate and sign with it
    #[arg(long, conflicts_with = "cert")]
    pub generate_cert: bool,

    /// Install the certificate before signing
    #[arg(long)]
    pub install_cert: bool,

    /// Publisher for a generated certificate
    #[arg(long)]
    pub publisher: Option<String>,

    /// RFC 3161 timestamp server
    #[arg(long)]
    pub timestamp: Option<String>,
}

#[derive(Args, Debug)]
pub struct DebugIdentityArgs {
    /// Executable receiving the identity
    pub exe: PathBuf,

    /// Manifest providing the identity
    #[arg(long, default_value = MANIFEST_FILE_NAME)]
    pub manifest: PathBuf,

    /// Only embed the identity, do not register the package
    #[arg(long)]
    pub no_install: bool,

    /// Application root registered as the external location
    #[arg(long)]
    pub location: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ToolArgs {
    /// Executable name (makeappx, makepri, mt, signtool, ...)
    pub name: String,

    /// Arguments passed through to the tool
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct GetWinsdkPathArgs {
    /// Print the global workspace instead of the local one
    #[arg(long)]
    pub global: bool,
}
