//! winsdk CLI - Windows SDK workspaces and MSIX packaging
//!
//! This is the main entry point for the winsdk command-line interface.

mod cli;
mod commands;
mod confirm;
mod context;
mod exit;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use winsdk_core::CancelToken;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    // Parse CLI args (--quiet with --verbose is rejected here)
    let cli = Cli::parse();
    let verbose = cli.verbose;

    init_tracing(cli.verbose, cli.quiet);
    output::set_quiet(cli.quiet);

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    match run(cli.command, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            exit::report_error(&e, verbose > 0);
            ExitCode::from(exit::exit_code(&e))
        }
    }
}

async fn run(command: Commands, cancel: &CancelToken) -> anyhow::Result<()> {
    match command {
        Commands::Init(args) => commands::setup::init(args, cancel).await,
        Commands::Setup(args) => commands::setup::setup(args, cancel).await,
        Commands::Restore(args) => commands::setup::restore(args, cancel).await,
        Commands::Update(args) => commands::update::run(args, cancel).await,
        Commands::Cert(args) => commands::cert::run(args, cancel).await,
        Commands::Sign(args) => commands::sign::run(args, cancel).await,
        Commands::Manifest(args) => commands::manifest::run(args),
        Commands::Msix(args) => commands::msix::run(args, cancel).await,
        Commands::Package(args) => commands::package::run(args, cancel).await,
        Commands::CreateDebugIdentity(args) => commands::debug_identity::run(args, cancel).await,
        Commands::Tool(args) => commands::tool::run(args, cancel).await,
        Commands::GetWinsdkPath(args) => commands::paths::get_winsdk_path(args),
        Commands::GetGlobalWinsdk => commands::paths::get_global_winsdk(),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
