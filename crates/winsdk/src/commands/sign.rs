//! Sign command

use anyhow::{Context, Result};
use winsdk_core::CancelToken;

use crate::cli::SignArgs;
use crate::context::{current_dir, ToolServices};
use crate::output;

pub async fn run(args: SignArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;

    let spinner = output::spinner(&format!("Signing {}", args.file.display()));
    let result = services
        .certificates()
        .sign_file(
            &args.file,
            &args.cert_path,
            &args.password,
            args.timestamp.as_deref(),
            cancel,
        )
        .await;
    spinner.finish_and_clear();
    result.with_context(|| format!("Failed to sign {}", args.file.display()))?;

    output::success(&format!("Signed {}", args.file.display()));
    Ok(())
}
