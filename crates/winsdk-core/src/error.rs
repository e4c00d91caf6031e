//! Error types for winsdk-core

use thiserror::Error;

/// Result type alias using winsdk-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types shared by the package pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration contents
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Package does not exist on the feed
    #[error("Package not found on feed: {package}")]
    PackageNotFound { package: String },

    /// No version could be determined for a package
    #[error("Could not resolve a version for {package}: {message}")]
    VersionNotResolved { package: String, message: String },

    /// HTTP request failed
    #[error("Request to {url} failed: {message}")]
    Network { url: String, message: String },

    /// A downloaded package archive could not be read or extracted
    #[error("Invalid package archive {path}: {message}")]
    Archive { path: String, message: String },

    /// Workspace directory is missing
    #[error("Workspace directory not found: {path}")]
    WorkspaceNotFound { path: String },

    /// Operation was cancelled by the caller
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a package not found error
    pub fn package_not_found(package: impl Into<String>) -> Self {
        Self::PackageNotFound {
            package: package.into(),
        }
    }

    /// Create a version resolution error
    pub fn version_not_resolved(package: impl Into<String>, message: impl Into<String>) -> Self {
        Self::VersionNotResolved {
            package: package.into(),
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an archive error
    pub fn archive(path: impl Into<String>, message: impl ToString) -> Self {
        Self::Archive {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a workspace not found error
    pub fn workspace_not_found(path: impl Into<String>) -> Self {
        Self::WorkspaceNotFound { path: path.into() }
    }

    /// Whether this error means something required could not be located or resolved
    pub fn is_resolution(&self) -> bool {
        matches!(
            self,
            Self::PackageNotFound { .. }
                | Self::VersionNotResolved { .. }
                | Self::WorkspaceNotFound { .. }
        )
    }
}
