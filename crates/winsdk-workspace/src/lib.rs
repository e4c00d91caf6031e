//! Workspace flows for winsdk
//!
//! This crate provides:
//! - The setup state machine behind `init`, `setup` and `restore`
//! - The `update` flow moving pins to the latest versions
//! - `.gitignore` maintenance for the workspace and development certificates
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use winsdk_core::config::NetworkConfig;
//! use winsdk_core::paths::{global_workspace_dir, WorkspaceLayout};
//! use winsdk_core::{AssumeYes, CancelToken};
//! use winsdk_packages::{NuGetClient, PackageCache};
//! use winsdk_tools::ToolRunner;
//! use winsdk_workspace::{WorkspaceSetupOptions, WorkspaceSetupService};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let global = WorkspaceLayout::new(global_workspace_dir(None)?);
//! let service = WorkspaceSetupService::new(
//!     Arc::new(NuGetClient::new(NetworkConfig::from_env())?),
//!     PackageCache::for_workspace(&global),
//!     ToolRunner::system(),
//!     Arc::new(AssumeYes),
//! );
//!
//! let report = service
//!     .setup(&WorkspaceSetupOptions::init("/src/app"), &CancelToken::new())
//!     .await?;
//! println!("{:?}", report.requested);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod gitignore;
pub mod setup;
pub mod update;

pub use error::{Error, Result};
pub use gitignore::{add_certificate_to_gitignore, update_gitignore};
pub use setup::{SetupReport, SetupStage, WorkspaceSetupOptions, WorkspaceSetupService};
pub use update::{PinChange, UpdateOptions, UpdateReport};
