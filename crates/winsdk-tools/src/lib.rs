//! Native tool orchestration for winsdk workspaces
//!
//! This crate handles:
//! - BuildTools location (pinned or latest, host architecture with fallback)
//! - Installing BuildTools on demand and running their executables
//! - External process execution with exit-code and elevation semantics
//! - C++/WinRT projection generation
//! - Development certificates and signing
//! - MSIX packaging and executable identity injection

pub mod build_tools;
pub mod certificate;
pub mod cppwinrt;
pub mod error;
pub mod locator;
pub mod manifest;
pub mod msix;
pub mod powershell;
pub mod runner;

pub use build_tools::BuildToolsService;
pub use certificate::{infer_publisher, CertificateResult, CertificateService};
pub use cppwinrt::ProjectionGenerator;
pub use error::{Error, Result};
pub use locator::BuildToolLocator;
pub use manifest::{parse_manifest_identity, read_manifest_identity, ManifestOptions, MsixIdentity};
pub use msix::{
    CreateMsixPackageResult, DebugIdentityOptions, MsixPackageOptions, MsixPackagingService,
};
pub use powershell::PowerShell;
pub use runner::{ProcessOutput, ProcessRunner, RunOptions, SystemProcessRunner, ToolRunner};
