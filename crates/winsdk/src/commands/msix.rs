//! MSIX identity commands

use anyhow::{Context, Result};
use winsdk_core::CancelToken;

use crate::cli::{AddIdentityArgs, MsixCommands};
use crate::context::{current_dir, ToolServices};
use crate::output;

pub async fn run(command: MsixCommands, cancel: &CancelToken) -> Result<()> {
    match command {
        MsixCommands::AddIdentity(args) => add_identity(args, cancel).await,
    }
}

async fn add_identity(args: AddIdentityArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;
    let identity = services
        .msix()
        .add_msix_identity_to_exe(&args.exe, &args.manifest, None, cancel)
        .await
        .with_context(|| format!("Failed to add identity to {}", args.exe.display()))?;

    output::success(&format!("Identity embedded into {}", args.exe.display()));
    output::kv("Name", &identity.package_name);
    output::kv("Publisher", &identity.publisher);
    output::kv("Application", &identity.application_id);
    Ok(())
}
