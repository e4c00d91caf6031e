//! Error types for winsdk-workspace

use thiserror::Error;

/// Result type alias using winsdk-workspace's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Workspace flow error types
#[derive(Error, Debug)]
pub enum Error {
    /// A flow that only replays pins found no configuration
    #[error("No winsdk.yaml found at: {path}. Run 'winsdk init' to create one")]
    ConfigRequired { path: String },

    /// The configuration exists but pins nothing
    #[error("winsdk.yaml at {path} contains no packages")]
    NoPinnedPackages { path: String },

    /// BuildTools could not be installed or updated
    #[error("Failed to install or update Microsoft.Windows.SDK.BuildTools")]
    BuildToolsUnavailable,

    /// Error from package acquisition or workspace primitives
    #[error(transparent)]
    Core(#[from] winsdk_core::Error),

    /// Error from native tool orchestration
    #[error(transparent)]
    Tools(#[from] winsdk_tools::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a missing configuration error
    pub fn config_required(path: impl Into<String>) -> Self {
        Self::ConfigRequired { path: path.into() }
    }

    /// Create an empty configuration error
    pub fn no_pinned_packages(path: impl Into<String>) -> Self {
        Self::NoPinnedPackages { path: path.into() }
    }

    /// Whether this is a resolution failure (something could not be found or resolved)
    pub fn is_resolution(&self) -> bool {
        match self {
            Self::BuildToolsUnavailable => true,
            Self::Core(e) => e.is_resolution(),
            Self::Tools(e) => e.is_resolution(),
            _ => false,
        }
    }

    /// Whether the flow was cancelled
    pub fn is_cancelled(&self) -> bool {
        match self {
            Self::Core(e) => matches!(e, winsdk_core::Error::Cancelled),
            Self::Tools(e) => e.is_cancelled(),
            _ => false,
        }
    }
}
