//! Package command

use anyhow::{Context, Result};
use winsdk_core::CancelToken;
use winsdk_tools::MsixPackageOptions;

use crate::cli::PackageArgs;
use crate::context::{current_dir, ToolServices};
use crate::output;

pub async fn run(args: PackageArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;
    let options = MsixPackageOptions {
        package_name: args.name,
        skip_pri: args.skip_pri,
        sign: args.cert.is_some() || args.generate_cert,
        certificate_path: args.cert,
        certificate_password: args.cert_password,
        generate_dev_cert: args.generate_cert,
        install_dev_cert: args.install_cert,
        publisher: args.publisher,
        timestamp_url: args.timestamp,
    };

    let spinner = output::spinner(&format!("Packaging {}", args.input_folder.display()));
    let result = services
        .msix()
        .create_msix_package(&args.input_folder, &args.output, &options, cancel)
        .await;
    spinner.finish_and_clear();
    let package = result.context("Failed to create MSIX package")?;

    output::success(&format!("Package created: {}", package.msix_path.display()));
    if package.signed {
        output::info("Package signed");
    }
    Ok(())
}
