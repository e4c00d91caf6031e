//! External process execution
//!
//! [`ProcessRunner`] is the seam between the orchestration code and the
//! operating system. [`ToolRunner`] layers the failure contract on top: a
//! non-zero exit code is always an error carrying the captured output, except
//! for elevated runs, whose exit code cannot be observed through the UAC flow.

use crate::error::{Error, Result};
use crate::powershell::quote;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;
use winsdk_core::CancelToken;

/// How a process should be launched
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Launch through a UAC elevation prompt (output is not captured)
    pub elevated: bool,

    /// Working directory for the child
    pub working_dir: Option<PathBuf>,

    /// Extra environment variables for the child
    pub env: Vec<(String, String)>,
}

impl RunOptions {
    /// Default options: captured output, inherited working directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Request elevation
    pub fn elevated(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Set the working directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Add an environment variable
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (`-1` when terminated without one)
    pub exit_code: i32,

    /// Captured standard output
    pub stdout: String,

    /// Captured standard error
    pub stderr: String,
}

impl ProcessOutput {
    /// A successful run with the given output
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// Whether the process exited with code 0
    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns processes and waits for them
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to exit
    ///
    /// Implementations check `cancel` before spawning and stop waiting when
    /// it fires. A child that already started is not guaranteed to be killed.
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput>;
}

/// [`ProcessRunner`] backed by `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    async fn run_captured(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &options.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &options.env {
            cmd.env(key, value);
        }

        cancel.check()?;
        let child = cmd
            .spawn()
            .map_err(|e| Error::spawn_failed(tool_name(program), e))?;
        let output = cancel.run(child.wait_with_output()).await??;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Launch through `Start-Process -Verb RunAs`
    ///
    /// The elevated child owns its own console, so nothing is piped and the
    /// reported exit code is always 0 once the launch succeeded.
    async fn run_elevated(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        let mut script = format!(
            "Start-Process -FilePath {} -Verb RunAs -Wait",
            quote(&program.display().to_string())
        );
        if !args.is_empty() {
            let list: Vec<String> = args.iter().map(|a| quote(a)).collect();
            script.push_str(&format!(" -ArgumentList @({})", list.join(", ")));
        }
        if let Some(dir) = &options.working_dir {
            script.push_str(&format!(
                " -WorkingDirectory {}",
                quote(&dir.display().to_string())
            ));
        }

        debug!("Elevating {}; a UAC prompt may appear", tool_name(program));
        let mut cmd = Command::new("powershell.exe");
        cmd.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()])
            .stdin(Stdio::null());

        cancel.check()?;
        let mut child = cmd
            .spawn()
            .map_err(|e| Error::spawn_failed(tool_name(program), e))?;
        cancel.run(child.wait()).await??;

        Ok(ProcessOutput::default())
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        if options.elevated {
            self.run_elevated(program, args, options, cancel).await
        } else {
            self.run_captured(program, args, options, cancel).await
        }
    }
}

/// Runs external tools and enforces exit-code semantics
#[derive(Clone)]
pub struct ToolRunner {
    runner: Arc<dyn ProcessRunner>,
}

impl ToolRunner {
    /// Create a runner on top of a process backend
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Runner that spawns real processes
    pub fn system() -> Self {
        Self::new(Arc::new(SystemProcessRunner))
    }

    /// Run `tool` and fail unless it exits with code 0
    ///
    /// Captured output is logged at debug level. Elevated runs are treated
    /// as successful once started.
    pub async fn run(
        &self,
        tool: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> Result<ProcessOutput> {
        cancel.check()?;
        let name = tool_name(tool);
        debug!("{}: {} {}", name, tool.display(), args.join(" "));

        let output = self.runner.run(tool, args, options, cancel).await?;
        if options.elevated {
            return Ok(output);
        }

        if !output.stdout.trim().is_empty() {
            debug!("{}", output.stdout.trim_end());
        }
        if !output.stderr.trim().is_empty() {
            debug!("{}", output.stderr.trim_end());
        }

        if output.exit_code != 0 {
            return Err(Error::tool_failed(
                name,
                output.exit_code,
                output.stdout,
                output.stderr,
            ));
        }
        Ok(output)
    }
}

/// File name of a tool path, for messages
pub fn tool_name(tool: &Path) -> String {
    tool.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| tool.display().to_string())
}
