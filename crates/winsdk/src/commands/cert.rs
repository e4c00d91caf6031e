//! Certificate commands

use anyhow::{Context, Result};
use winsdk_core::CancelToken;
use winsdk_tools::infer_publisher;
use winsdk_workspace::add_certificate_to_gitignore;

use crate::cli::{CertCommands, CertGenerateArgs, CertInstallArgs};
use crate::context::{current_dir, ToolServices};
use crate::output;

pub async fn run(command: CertCommands, cancel: &CancelToken) -> Result<()> {
    match command {
        CertCommands::Generate(args) => generate(args, cancel).await,
        CertCommands::Install(args) => install(args, cancel).await,
    }
}

async fn generate(args: CertGenerateArgs, cancel: &CancelToken) -> Result<()> {
    let cwd = current_dir()?;
    let publisher = infer_publisher(args.publisher.as_deref(), args.manifest.as_deref(), &cwd);
    let services = ToolServices::for_dir(&cwd)?;
    let certificates = services.certificates();

    let spinner = output::spinner(&format!("Generating certificate for {}", publisher));
    let result = certificates
        .generate_dev_certificate(
            &publisher,
            &args.output,
            &args.password,
            args.valid_days,
            cancel,
        )
        .await;
    spinner.finish_and_clear();
    let cert = result.context("Failed to generate certificate")?;

    output::success("Certificate generated");
    output::kv("Path", &cert.path.display().to_string());
    output::kv("Publisher", &cert.publisher);
    output::kv("Subject", &cert.subject);

    if !args.no_gitignore && cert.path.starts_with(&cwd) {
        if let Some(file_name) = cert.path.file_name() {
            let outcome = add_certificate_to_gitignore(&cwd, &file_name.to_string_lossy());
            output::warnings(&outcome.warnings);
            if outcome.value {
                output::info("Added the certificate to .gitignore");
            }
        }
    }

    if args.install {
        let installed = certificates
            .install_certificate(&cert.path, &cert.password, false, cancel)
            .await
            .context("Failed to install certificate")?;
        report_install(installed);
    }
    Ok(())
}

async fn install(args: CertInstallArgs, cancel: &CancelToken) -> Result<()> {
    let services = ToolServices::for_dir(&current_dir()?)?;
    let installed = services
        .certificates()
        .install_certificate(&args.cert_path, &args.password, args.force, cancel)
        .await
        .with_context(|| format!("Failed to install {}", args.cert_path.display()))?;
    report_install(installed);
    Ok(())
}

fn report_install(installed: bool) {
    if installed {
        output::success("Certificate installed to TrustedPeople");
    } else {
        output::info("Certificate already installed (use --force to reinstall)");
    }
}
