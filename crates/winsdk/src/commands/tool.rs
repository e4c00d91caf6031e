//! Tool command: run a BuildTools executable with pass-through arguments

use anyhow::{Context, Result};
use winsdk_core::CancelToken;

use crate::cli::ToolArgs;
use crate::context::{current_dir, ToolServices};

pub async fn run(args: ToolArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;
    let exe = executable_name(&args.name);
    let output = services
        .build_tools
        .run_build_tool(&exe, &args.args, cancel)
        .await
        .with_context(|| format!("{} failed", exe))?;

    print!("{}", output.stdout);
    eprint!("{}", output.stderr);
    Ok(())
}

/// `name` with an `.exe` extension
fn executable_name(name: &str) -> String {
    if name.to_ascii_lowercase().ends_with(".exe") {
        name.to_string()
    } else {
        format!("{}.exe", name)
    }
}
