//! C++/WinRT projection generation
//!
//! The projection tool reads its inputs from a response file:
//!
//! ```text
//! -input sdk+
//! -input "C:\...\Microsoft.UI.winmd"
//! -optimize
//! -output "C:\...\.winsdk\include"
//! ```

use crate::error::{Error, Result};
use crate::runner::{RunOptions, ToolRunner};
use std::path::{Path, PathBuf};
use tracing::{debug, Level};
use winsdk_core::paths::package_folder_name;
use winsdk_core::sdk::CPPWINRT_PACKAGE;
use winsdk_core::CancelToken;
use winsdk_packages::PackageSet;

/// Response file written into the output directory
pub const RESPONSE_FILE: &str = ".cppwinrt.rsp";

/// Drives `cppwinrt.exe` over discovered metadata
#[derive(Clone)]
pub struct ProjectionGenerator {
    tools: ToolRunner,
}

impl ProjectionGenerator {
    /// Create a generator running the tool through `tools`
    pub fn new(tools: ToolRunner) -> Self {
        Self { tools }
    }

    /// Locate `cppwinrt.exe` in the C++/WinRT package version in use
    pub fn find_cppwinrt_exe(&self, packages_dir: &Path, used: &PackageSet) -> Option<PathBuf> {
        let (name, version) = used
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(CPPWINRT_PACKAGE))?;
        let exe = packages_dir
            .join(package_folder_name(name, version))
            .join("bin")
            .join("cppwinrt.exe");
        exe.is_file().then_some(exe)
    }

    /// Generate projection headers for `winmds` into `output_dir`
    ///
    /// Fails with [`Error::NoMetadata`] when there is nothing to project and
    /// with [`Error::ToolFailed`] when the tool exits non-zero.
    pub async fn generate(
        &self,
        cppwinrt_exe: &Path,
        winmds: &[PathBuf],
        output_dir: &Path,
        working_dir: &Path,
        cancel: &CancelToken,
    ) -> Result<()> {
        if winmds.is_empty() {
            return Err(Error::NoMetadata);
        }

        let rsp = write_response_file(winmds, output_dir, tracing::enabled!(Level::DEBUG))?;
        debug!("cppwinrt: {} @{}", cppwinrt_exe.display(), rsp.display());

        let args = vec![format!("@{}", rsp.display())];
        let options = RunOptions::new().with_working_dir(working_dir);
        self.tools.run(cppwinrt_exe, &args, &options, cancel).await?;
        Ok(())
    }
}

/// Render the response file contents
pub fn response_file_contents(winmds: &[PathBuf], output_dir: &Path, verbose: bool) -> String {
    let mut lines = vec!["-input sdk+".to_string()];
    lines.extend(winmds.iter().map(|w| format!("-input \"{}\"", w.display())));
    lines.push("-optimize".to_string());
    lines.push(format!("-output \"{}\"", output_dir.display()));
    if verbose {
        lines.push("-verbose".to_string());
    }

    let mut contents = lines.join("\n");
    contents.push('\n');
    contents
}

/// Write the response file into `output_dir`, creating it, and return its path
pub fn write_response_file(
    winmds: &[PathBuf],
    output_dir: &Path,
    verbose: bool,
) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let rsp = output_dir.join(RESPONSE_FILE);
    std::fs::write(&rsp, response_file_contents(winmds, output_dir, verbose))?;
    Ok(rsp)
}
