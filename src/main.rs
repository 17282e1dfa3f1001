// src/main.rs

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing subscriber for logging
    let default_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            let code = e
                .downcast_ref::<tapster::Error>()
                .map(|err| err.exit_code())
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Some(Commands::Install {
            recipe,
            bin_dir,
            no_verify,
            platform,
        }) => commands::cmd_install(
            &recipe,
            config,
            bin_dir.as_deref(),
            no_verify,
            &platform,
            cli.quiet,
        ),
        Some(Commands::Resolve { recipe, platform }) => commands::cmd_resolve(&recipe, &platform),
        Some(Commands::Test { recipe, bin_dir }) => {
            commands::cmd_test(&recipe, config, bin_dir.as_deref())
        }
        Some(Commands::Validate { recipe }) => commands::cmd_validate(&recipe),
        Some(Commands::Info { recipe }) => commands::cmd_info(&recipe),
        None => {
            // No command provided, show help
            println!("tapster v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'tapster --help' for usage information");
            Ok(())
        }
    }
}
