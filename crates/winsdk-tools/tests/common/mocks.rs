//! Test doubles for process execution and package feeds

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use winsdk_core::sdk::BUILD_TOOLS_PACKAGE;
use winsdk_core::{CancelToken, Error, Result};
use winsdk_packages::{NuGetFeed, PackageSet};
use winsdk_tools::runner::{ProcessOutput, ProcessRunner, RunOptions};

use super::constants::SDK_FOLDER;
use super::fixtures::install_build_tools;

/// One recorded process launch
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub elevated: bool,
    pub working_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    /// File name of the launched program
    pub fn tool(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Argument following `flag`
    pub fn arg_after(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    /// All arguments joined by spaces
    pub fn command_line(&self) -> String {
        self.args.join(" ")
    }
}

type Handler = Box<dyn Fn(&Invocation) -> ProcessOutput + Send + Sync>;

/// Process runner that records launches and answers from handlers
///
/// Programs without a handler exit with code 0 and no output.
#[derive(Default)]
pub struct FakeProcessRunner {
    handlers: Vec<(String, Handler)>,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer launches of `tool` (file name, case-insensitive) with `handler`
    pub fn on(
        mut self,
        tool: &str,
        handler: impl Fn(&Invocation) -> ProcessOutput + Send + Sync + 'static,
    ) -> Self {
        self.handlers.push((tool.to_string(), Box::new(handler)));
        self
    }

    /// Make every launch of `tool` exit with `code`
    pub fn failing(self, tool: &str, code: i32) -> Self {
        self.on(tool, move |_| ProcessOutput {
            exit_code: code,
            stdout: "simulated failure".to_string(),
            stderr: "error".to_string(),
        })
    }

    /// Every recorded launch, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
    }

    /// Recorded launches of `tool`
    pub fn calls_to(&self, tool: &str) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter(|c| c.tool().eq_ignore_ascii_case(tool))
            .collect()
    }

    /// Launch sequence as tool names
    pub fn tool_sequence(&self) -> Vec<String> {
        self.calls().iter().map(Invocation::tool).collect()
    }
}

#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn run(
        &self,
        program: &Path,
        args: &[String],
        options: &RunOptions,
        cancel: &CancelToken,
    ) -> winsdk_tools::Result<ProcessOutput> {
        cancel.check()?;
        let invocation = Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            elevated: options.elevated,
            working_dir: options.working_dir.clone(),
            env: options.env.clone(),
        };
        self.calls.lock().unwrap().push(invocation.clone());

        let tool = invocation.tool();
        let output = self
            .handlers
            .iter()
            .rev()
            .find(|(name, _)| name.eq_ignore_ascii_case(&tool))
            .map(|(_, handler)| handler(&invocation))
            .unwrap_or_else(|| ProcessOutput::success(""));
        Ok(output)
    }
}

/// Feed that only knows BuildTools and materializes x64 binaries
pub struct BuildToolsFeed {
    versions: Vec<String>,
    archs: Vec<String>,
    pub installs: AtomicUsize,
    pub installed: Mutex<Vec<String>>,
}

impl BuildToolsFeed {
    /// Feed publishing `versions`, materializing `x64` binaries
    pub fn new(versions: &[&str]) -> Self {
        Self {
            versions: versions.iter().map(|v| v.to_string()).collect(),
            archs: vec!["x64".to_string()],
            installs: AtomicUsize::new(0),
            installed: Mutex::new(Vec::new()),
        }
    }

    /// Materialize binaries for these architectures instead
    pub fn with_archs(mut self, archs: &[&str]) -> Self {
        self.archs = archs.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }

    pub fn installed_versions(&self) -> Vec<String> {
        self.installed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NuGetFeed for BuildToolsFeed {
    async fn ensure_tool_available(
        &self,
        workspace_root: &Path,
        cancel: &CancelToken,
    ) -> Result<PathBuf> {
        cancel.check()?;
        Ok(workspace_root.join("tools").join("nuget.exe"))
    }

    async fn get_latest_version(
        &self,
        package: &str,
        _include_prerelease: bool,
        cancel: &CancelToken,
    ) -> Result<String> {
        cancel.check()?;
        if !package.eq_ignore_ascii_case(BUILD_TOOLS_PACKAGE) {
            return Err(Error::package_not_found(package));
        }
        winsdk_core::version::latest(self.versions.iter().map(String::as_str))
            .map(str::to_string)
            .ok_or_else(|| Error::version_not_resolved(package, "no versions published"))
    }

    async fn install_package(
        &self,
        _workspace_root: &Path,
        package: &str,
        version: &str,
        output_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<PackageSet> {
        cancel.check()?;
        if !self.versions.iter().any(|v| v == version) {
            return Err(Error::version_not_resolved(package, format!("{} is not published", version)));
        }
        self.installs.fetch_add(1, Ordering::SeqCst);
        self.installed.lock().unwrap().push(version.to_string());

        let archs: Vec<&str> = self.archs.iter().map(String::as_str).collect();
        install_build_tools(output_dir, version, SDK_FOLDER, &archs);

        let mut set = PackageSet::new();
        set.insert(package.to_string(), version.to_string());
        Ok(set)
    }
}

/// PowerShell handler writing the `.pfx` an export command targets
pub fn export_certificate(invocation: &Invocation) -> ProcessOutput {
    if let Some(dest) = invocation.args.last().and_then(|cmd| quoted_after(cmd, "$dest=")) {
        std::fs::write(dest, b"PFX").unwrap();
    }
    ProcessOutput::success("")
}

/// makeappx/makepri handler writing the file named after `flag`
pub fn write_output_of(flag: &'static str) -> impl Fn(&Invocation) -> ProcessOutput + Send + Sync {
    move |invocation: &Invocation| {
        if let Some(path) = invocation.arg_after(flag) {
            std::fs::write(path, b"output").unwrap();
        }
        ProcessOutput::success("")
    }
}

/// The single-quoted literal following `marker` in a PowerShell command
pub fn quoted_after(command: &str, marker: &str) -> Option<String> {
    let start = command.find(marker)? + marker.len();
    let rest = command.get(start..)?.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}
