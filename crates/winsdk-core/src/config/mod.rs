//! Workspace configuration: pinned package versions and network settings

mod loader;
mod network;
mod types;

pub use loader::{ConfigStore, CONFIG_FILE_NAME};
pub use network::NetworkConfig;
pub use types::{PackagePin, WinsdkConfig};
