//! Init, setup and restore commands

use anyhow::{Context, Result};
use winsdk_core::CancelToken;
use winsdk_workspace::{SetupReport, WorkspaceSetupOptions};

use crate::cli::{RestoreArgs, SetupArgs};
use crate::context::{dir_or_current, setup_service};
use crate::output;

pub async fn init(args: SetupArgs, cancel: &CancelToken) -> Result<()> {
    let base_dir = dir_or_current(args.base_dir.clone())?;
    let options =
        apply(WorkspaceSetupOptions::init(&base_dir), &args).with_no_cert(args.no_cert);
    output::header("Initializing Windows SDK workspace");
    execute(options, args.yes, cancel).await
}

pub async fn setup(args: SetupArgs, cancel: &CancelToken) -> Result<()> {
    let base_dir = dir_or_current(args.base_dir.clone())?;
    let options = apply(WorkspaceSetupOptions::new(&base_dir), &args);
    output::header("Setting up Windows SDK workspace");
    execute(options, args.yes, cancel).await
}

pub async fn restore(args: RestoreArgs, cancel: &CancelToken) -> Result<()> {
    let base_dir = dir_or_current(args.base_dir)?;
    let mut options =
        WorkspaceSetupOptions::restore(&base_dir).with_no_gitignore(args.no_gitignore);
    if let Some(config_dir) = args.config_dir {
        options = options.with_config_dir(config_dir);
    }
    output::header("Restoring Windows SDK workspace");
    execute(options, false, cancel).await
}

fn apply(mut options: WorkspaceSetupOptions, args: &SetupArgs) -> WorkspaceSetupOptions {
    if let Some(config_dir) = &args.config_dir {
        options = options.with_config_dir(config_dir);
    }
    options
        .with_prerelease(args.prerelease)
        .with_ignore_config(args.ignore_config)
        .with_no_gitignore(args.no_gitignore)
        .with_assume_yes(args.yes)
        .with_config_only(args.config_only)
}

async fn execute(
    options: WorkspaceSetupOptions,
    assume_yes: bool,
    cancel: &CancelToken,
) -> Result<()> {
    let service = setup_service(assume_yes)?;
    let report = service
        .setup(&options, cancel)
        .await
        .context("Workspace setup failed")?;
    print_report(&report, options.config_only);
    Ok(())
}

fn print_report(report: &SetupReport, config_only: bool) {
    output::warnings(&report.warnings);

    for (name, version) in &report.requested {
        output::kv(name, version);
    }
    output::kv("Configuration", &report.config_path.display().to_string());

    if config_only {
        output::success("Configuration written");
        return;
    }

    output::kv("Workspace", &report.workspace.display().to_string());
    if report.installed.is_empty() {
        output::info("All packages were already installed");
    } else {
        output::info(&format!("Installed {} packages", report.installed.len()));
    }
    if let Some(manifest) = &report.manifest_path {
        output::kv("Manifest", &manifest.display().to_string());
    }
    if let Some(cert) = &report.certificate_path {
        output::kv("Certificate", &cert.display().to_string());
    }
    if report.gitignore_updated {
        output::info("Updated .gitignore");
    }
    output::success("Workspace ready");
}
