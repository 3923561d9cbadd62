//! Paperboard CLI entry point.

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use paperboard_cli::cli::Cli;
use paperboard_cli::{commands, tui};

fn main() {
    // Load .env.local if it exists (for PAPERBOARD_API_KEY etc.)
    let _ = dotenvy::from_filename(".env.local");

    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string()));

    fmt().with_env_filter(filter).with_target(false).init();

    let state_dir = cli.state_dir();
    let config = match cli.gateway_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    // Handle subcommand or enter the TUI
    let result = match cli.command {
        Some(cmd) => commands::execute(cmd, config, &state_dir),
        None => tui::run(config, &state_dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
