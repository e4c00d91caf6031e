//! Error types for winsdk-tools

use std::path::Path;
use thiserror::Error;

/// Result type alias using winsdk-tools' Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while locating or driving native tools
#[derive(Error, Debug)]
pub enum Error {
    /// A tool ran and exited with a non-zero code
    #[error("{tool} failed with exit code: {exit_code}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// A tool process could not be started
    #[error("Failed to start {tool}: {message}")]
    SpawnFailed { tool: String, message: String },

    /// A BuildTools executable is missing from the resolved bin folder
    #[error("Could not find {tool}. Make sure the Microsoft.Windows.SDK.BuildTools package is installed in a .winsdk directory")]
    ToolNotFound { tool: String },

    /// BuildTools could neither be located nor installed
    #[error("Microsoft.Windows.SDK.BuildTools could not be located or installed{}", pinned_suffix(.pinned))]
    BuildToolsNotFound { pinned: Option<String> },

    /// The C++/WinRT projection tool is not in the resolved package set
    #[error("cppwinrt.exe not found under {packages_dir}")]
    CppWinRtNotFound { packages_dir: String },

    /// No `.winmd` inputs were found for projection
    #[error("No .winmd metadata files found to generate projections from")]
    NoMetadata,

    /// An AppX manifest file is missing
    #[error("AppX manifest not found at: {path}")]
    ManifestNotFound { path: String },

    /// An AppX manifest lacks required identity elements
    #[error("Invalid AppX manifest: {message}")]
    InvalidManifest { message: String },

    /// A required input file is missing
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// A required input directory is missing
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: String },

    /// Caller-supplied options are inconsistent
    #[error("{message}")]
    InvalidInput { message: String },

    /// Error from winsdk-core
    #[error(transparent)]
    Core(#[from] winsdk_core::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn pinned_suffix(pinned: &Option<String>) -> String {
    pinned
        .as_ref()
        .map(|v| format!(" (pinned version {})", v))
        .unwrap_or_default()
}

impl Error {
    /// Create a tool failure error
    pub fn tool_failed(
        tool: impl Into<String>,
        exit_code: i32,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
    ) -> Self {
        Self::ToolFailed {
            tool: tool.into(),
            exit_code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a spawn failure error
    pub fn spawn_failed(tool: impl Into<String>, message: impl ToString) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            message: message.to_string(),
        }
    }

    /// Create a tool not found error
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create a manifest not found error
    pub fn manifest_not_found(path: &Path) -> Self {
        Self::ManifestNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an invalid manifest error
    pub fn invalid_manifest(message: impl Into<String>) -> Self {
        Self::InvalidManifest {
            message: message.into(),
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: &Path) -> Self {
        Self::FileNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create a directory not found error
    pub fn directory_not_found(path: &Path) -> Self {
        Self::DirectoryNotFound {
            path: path.display().to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether this error means something could not be resolved at all
    pub fn is_resolution(&self) -> bool {
        match self {
            Self::ToolNotFound { .. }
            | Self::BuildToolsNotFound { .. }
            | Self::CppWinRtNotFound { .. }
            | Self::NoMetadata => true,
            Self::Core(e) => e.is_resolution(),
            _ => false,
        }
    }

    /// Whether the operation was cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Core(winsdk_core::Error::Cancelled))
    }
}
