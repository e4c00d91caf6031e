//! Manifest commands

use anyhow::{Context, Result};
use winsdk_core::utils::{default_package_name, default_publisher, normalize_publisher};
use winsdk_tools::manifest::generate_manifest;
use winsdk_tools::ManifestOptions;

use crate::cli::{ManifestCommands, ManifestGenerateArgs};
use crate::context::dir_or_current;
use crate::output;

pub fn run(command: ManifestCommands) -> Result<()> {
    match command {
        ManifestCommands::Generate(args) => generate(args),
    }
}

fn generate(args: ManifestGenerateArgs) -> Result<()> {
    let dir = dir_or_current(args.directory)?;
    let package_name = args
        .package_name
        .unwrap_or_else(|| default_package_name(&dir));
    let publisher = args
        .publisher
        .map(|p| normalize_publisher(&p))
        .unwrap_or_else(default_publisher);

    let mut options = ManifestOptions::new(&package_name, &publisher);
    options.version = args.version;
    options.description = args.description;
    options.sparse = args.sparse;
    options.logo_path = args.logo;
    if let Some(executable) = args.executable {
        options.executable = executable;
    }

    let path = generate_manifest(&dir, &options).context("Failed to generate manifest")?;
    output::success(&format!("Manifest written to {}", path.display()));
    output::kv("Name", &package_name);
    output::kv("Publisher", &publisher);
    Ok(())
}
