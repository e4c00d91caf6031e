//! Create-debug-identity command

use anyhow::{Context, Result};
use winsdk_core::CancelToken;
use winsdk_tools::DebugIdentityOptions;

use crate::cli::DebugIdentityArgs;
use crate::context::{current_dir, ToolServices};
use crate::output;

pub async fn run(args: DebugIdentityArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;
    let options = DebugIdentityOptions {
        no_install: args.no_install,
        location: args.location,
    };

    let identity = services
        .msix()
        .create_debug_identity(&args.exe, &args.manifest, &options, cancel)
        .await
        .with_context(|| {
            format!("Failed to create debug identity for {}", args.exe.display())
        })?;

    output::success(&format!("Debug identity {} ready", identity.package_name));
    output::kv("Publisher", &identity.publisher);
    output::kv("Application", &identity.application_id);
    if options.no_install {
        output::info("Package registration skipped");
    }
    Ok(())
}
