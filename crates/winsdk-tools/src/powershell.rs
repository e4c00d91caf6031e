//! PowerShell command execution

use crate::error::Result;
use crate::runner::{RunOptions, ToolRunner};
use std::path::PathBuf;
use tracing::debug;
use winsdk_core::CancelToken;

/// PowerShell executable name
pub const POWERSHELL_EXE: &str = "powershell.exe";

/// Runs PowerShell commands through a [`ToolRunner`]
#[derive(Clone)]
pub struct PowerShell {
    /// Runner enforcing exit-code semantics
    tools: ToolRunner,

    /// PowerShell executable
    exe: PathBuf,
}

impl PowerShell {
    /// Create a PowerShell runner using `powershell.exe` from `PATH`
    pub fn new(tools: ToolRunner) -> Self {
        Self {
            tools,
            exe: PathBuf::from(POWERSHELL_EXE),
        }
    }

    /// Use a specific PowerShell executable
    pub fn with_executable(mut self, exe: impl Into<PathBuf>) -> Self {
        self.exe = exe.into();
        self
    }

    /// Run `command` and return its standard output
    ///
    /// A non-zero exit code is an error. Elevated commands return an empty
    /// string since their output cannot be captured.
    pub async fn run_command(
        &self,
        command: &str,
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<String> {
        if options.elevated {
            debug!("Running elevated PowerShell: {}", command);
        } else {
            debug!("Running PowerShell: {}", command);
        }

        let args = command_args(command);
        let output = self.tools.run(&self.exe, &args, options, cancel).await?;
        Ok(output.stdout)
    }
}

/// Arguments passing `command` to PowerShell
pub fn command_args(command: &str) -> Vec<String> {
    ["-NoProfile", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-Command", command]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Quote a value as a PowerShell single-quoted string literal
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
