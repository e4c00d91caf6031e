//! NuGet package acquisition for winsdk workspaces
//!
//! This crate provides:
//! - A NuGet v3 feed client that downloads and extracts packages with their
//!   dependencies
//! - A persistent cache of each package's transitive dependents
//! - The acquisition service deciding pinned vs latest versions and skipping
//!   packages already on disk
//! - The layout pass copying headers, import libraries, runtime binaries and
//!   locating `.winmd` metadata
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use winsdk_core::config::NetworkConfig;
//! use winsdk_core::paths::WorkspaceLayout;
//! use winsdk_core::CancelToken;
//! use winsdk_packages::{
//!     AcquisitionOptions, NuGetClient, PackageAcquisitionService, PackageCache, PackageRequest,
//! };
//!
//! # async fn example() -> winsdk_core::Result<()> {
//! let layout = WorkspaceLayout::new("/src/app/.winsdk");
//! let feed = Arc::new(NuGetClient::new(NetworkConfig::from_env())?);
//! let service =
//!     PackageAcquisitionService::new(feed, layout.clone(), PackageCache::for_workspace(&layout));
//!
//! let report = service
//!     .install_packages(
//!         &[PackageRequest::new("Microsoft.Windows.CppWinRT")],
//!         &AcquisitionOptions::default(),
//!         &CancelToken::new(),
//!     )
//!     .await?;
//! println!("{:?}", report.packages);
//! # Ok(())
//! # }
//! ```

pub mod acquisition;
pub mod cache;
pub mod layout;
pub mod nuget;

use std::collections::BTreeMap;

/// Package id to installed version
pub type PackageSet = BTreeMap<String, String>;

pub use acquisition::{AcquisitionOptions, InstallReport, PackageAcquisitionService, PackageRequest};
pub use cache::{PackageCache, PackageCacheFile};
pub use layout::PackageLayoutService;
pub use nuget::{NuGetClient, NuGetFeed};
