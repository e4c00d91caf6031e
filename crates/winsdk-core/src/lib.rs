//! Core library for winsdk
//!
//! This crate provides:
//! - Dotted version comparison for NuGet and SDK versions
//! - The pinned-version configuration (`winsdk.yaml`)
//! - Workspace directory discovery and layout
//! - Shared seams: cancellation, user confirmation, best-effort warnings

pub mod arch;
pub mod cancel;
pub mod config;
pub mod confirm;
pub mod error;
pub mod paths;
pub mod sdk;
pub mod utils;
pub mod version;
pub mod warning;

pub use arch::Arch;
pub use cancel::CancelToken;
pub use confirm::{AssumeNo, AssumeYes, ConfirmationPort};
pub use error::{Error, Result};
pub use warning::{Outcome, Warning};
