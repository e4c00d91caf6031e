//! Update command

use anyhow::{Context, Result};
use winsdk_core::CancelToken;
use winsdk_workspace::UpdateOptions;

use crate::cli::UpdateArgs;
use crate::context::{dir_or_current, setup_service};
use crate::output;

pub async fn run(args: UpdateArgs, cancel: &CancelToken) -> Result<()> {
    let base_dir = dir_or_current(args.base_dir)?;
    let mut options = UpdateOptions::new(&base_dir);
    if let Some(config_dir) = args.config_dir {
        options.config_dir = config_dir;
    }
    options.include_prerelease = args.prerelease;

    output::header("Updating Windows SDK packages");
    let report = setup_service(true)?
        .update(&options, cancel)
        .await
        .context("Update failed")?;

    output::warnings(&report.warnings);
    for change in &report.changed {
        output::kv(&change.name, &format!("{} → {}", change.from, change.to));
    }
    if report.changed.is_empty() {
        output::info("Pinned packages are up to date");
    }
    output::kv("BuildTools", &report.build_tools_bin.display().to_string());
    output::success("Update complete");
    Ok(())
}
