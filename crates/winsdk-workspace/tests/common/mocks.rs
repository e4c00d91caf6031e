//! Test doubles for the package feed, process execution and confirmation

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use winsdk_core::{CancelToken, ConfirmationPort, Error, Result};
use winsdk_packages::{NuGetFeed, PackageSet};
use winsdk_tools::runner::{ProcessOutput, ProcessRunner, RunOptions};

use super::constants::published;
use super::fixtures::{materialize_package, Omit};

/// Feed publishing the SDK packages and materializing their folders
pub struct SdkFeed {
    versions: Vec<(String, Vec<String>)>,
    unreachable: HashSet<String>,
    omit: Omit,
    installed: Mutex<Vec<(String, String)>>,
    lookups: Mutex<Vec<String>>,
}

impl SdkFeed {
    /// Feed publishing every version in [`published`]
    pub fn new() -> Self {
        Self {
            versions: published()
                .into_iter()
                .map(|(name, versions)| {
                    (name.to_string(), versions.into_iter().map(str::to_string).collect())
                })
                .collect(),
            unreachable: HashSet::new(),
            omit: Omit::default(),
            installed: Mutex::new(Vec::new()),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Fail latest-version lookups of `package`
    pub fn with_unreachable(mut self, package: &str) -> Self {
        self.unreachable.insert(package.to_ascii_lowercase());
        self
    }

    /// Leave files out of materialized packages
    pub fn omitting(mut self, omit: Omit) -> Self {
        self.omit = omit;
        self
    }

    /// Installs performed, as (package, version), in order
    pub fn installed(&self) -> Vec<(String, String)> {
        self.installed.lock().unwrap().clone()
    }

    /// Packages whose latest version was queried, in order
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    fn published(&self, package: &str) -> Option<&[String]> {
        self.versions
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(package))
            .map(|(_, versions)| versions.as_slice())
    }
}

#[async_trait]
impl NuGetFeed for SdkFeed {
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
        self.lookups.lock().unwrap().push(package.to_string());
        if self.unreachable.contains(&package.to_ascii_lowercase()) {
            return Err(Error::version_not_resolved(package, "feed unreachable"));
        }
        let versions = self
            .published(package)
            .ok_or_else(|| Error::package_not_found(package))?;
        winsdk_core::version::latest(versions.iter().map(String::as_str))
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
        let published = self
            .published(package)
            .ok_or_else(|| Error::package_not_found(package))?;
        if !published.iter().any(|v| v == version) {
            return Err(Error::version_not_resolved(
                package,
                format!("{} is not published", version),
            ));
        }

        materialize_package(output_dir, package, version, self.omit);
        self.installed
            .lock()
            .unwrap()
            .push((package.to_string(), version.to_string()));

        let mut set = PackageSet::new();
        set.insert(package.to_string(), version.to_string());
        Ok(set)
    }
}

/// One recorded process launch
#[derive(Debug, Clone)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

impl Invocation {
    /// Whether any argument mentions `text`
    pub fn mentions(&self, text: &str) -> bool {
        self.args.iter().any(|arg| arg.contains(text))
    }

    /// File name of the launched program
    pub fn tool(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    /// Contents of the response file passed as `@path`
    pub fn response_file(&self) -> Option<String> {
        let path = self.args.first()?.strip_prefix('@')?;
        std::fs::read_to_string(path).ok()
    }
}

/// Process runner that records launches and exits with a fixed code
///
/// A successful PowerShell certificate export writes the `.pfx` it targets.
#[derive(Default)]
pub struct FakeProcessRunner {
    exit_code: i32,
    calls: Mutex<Vec<Invocation>>,
}

impl FakeProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every launch exit with `code`
    pub fn failing(code: i32) -> Self {
        Self {
            exit_code: code,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every recorded launch, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().unwrap().clone()
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
        self.calls.lock().unwrap().push(Invocation {
            program: program.to_path_buf(),
            args: args.to_vec(),
            working_dir: options.working_dir.clone(),
        });
        if self.exit_code == 0 {
            if let Some(dest) = args.last().and_then(|cmd| quoted_after(cmd, "$dest=")) {
                std::fs::write(dest, b"PFX").unwrap();
            }
        }
        Ok(ProcessOutput {
            exit_code: self.exit_code,
            stdout: String::new(),
            stderr: if self.exit_code == 0 {
                String::new()
            } else {
                "error: simulated failure".to_string()
            },
        })
    }
}

/// The single-quoted literal following `marker` in a PowerShell command
pub fn quoted_after(command: &str, marker: &str) -> Option<String> {
    let start = command.find(marker)? + marker.len();
    let rest = command.get(start..)?.strip_prefix('\'')?;
    let end = rest.find('\'')?;
    Some(rest[..end].to_string())
}

/// Confirmation port answering with a fixed value and recording prompts
pub struct RecordingConfirm {
    answer: bool,
    prompts: Mutex<Vec<String>>,
}

impl RecordingConfirm {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts shown so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl ConfirmationPort for RecordingConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.answer
    }
}
