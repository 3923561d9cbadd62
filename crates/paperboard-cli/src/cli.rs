//! Command-line interface definition using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use paperboard_gateway::GatewayConfig;

/// Build version string with git hash and build date.
fn version_string() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const BUILD_DATE: &str = env!("BUILD_DATE");

    // Format: "0.1.0 (abc1234, 2026-08-30)"
    static VERSION_STRING: std::sync::OnceLock<String> = std::sync::OnceLock::new();
    VERSION_STRING.get_or_init(|| format!("{} ({}, {})", VERSION, GIT_HASH, BUILD_DATE))
}

/// Paperboard - terminal client for a shared news board
#[derive(Parser, Debug)]
#[command(name = "paperboard")]
#[command(author, version = version_string(), about, long_about = None)]
pub struct Cli {
    /// Enable verbose output (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to state directory
    #[arg(short, long, env = "PAPERBOARD_STATE_DIR")]
    pub state_dir: Option<PathBuf>,

    /// Backend API key
    #[arg(long, env = "PAPERBOARD_API_KEY")]
    pub api_key: Option<String>,

    /// Backend project id
    #[arg(long, env = "PAPERBOARD_PROJECT")]
    pub project: Option<String>,

    /// Identity provider base URL override (emulators, tests)
    #[arg(long, env = "PAPERBOARD_IDENTITY_URL")]
    pub identity_url: Option<String>,

    /// Document store base URL override (emulators, tests)
    #[arg(long, env = "PAPERBOARD_FIRESTORE_URL")]
    pub firestore_url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and persist the session
    Login {
        /// Email address
        #[arg(required = true)]
        email: String,

        /// Password
        #[arg(required = true)]
        password: String,
    },

    /// Sign out and discard the persisted session
    Logout,

    /// List news items, newest first
    List {
        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Add a news item
    Add {
        /// The news text
        #[arg(required = true)]
        text: String,

        /// Raw importance level (0 important, 1 mild, 2 not important)
        #[arg(short, long, default_value_t = 1)]
        importance: i64,
    },

    /// Remove a news item by id
    Remove {
        /// Document id
        #[arg(required = true)]
        id: String,
    },
}

/// Output format for the list command
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Cli {
    /// Returns the state directory path, using default if not specified.
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .map(|h| h.join(".paperboard"))
                .unwrap_or_else(|| PathBuf::from(".paperboard"))
        })
    }

    /// Returns the log level based on verbosity.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    /// Builds the gateway config from flags and environment.
    pub fn gateway_config(&self) -> Result<GatewayConfig, String> {
        let api_key = self
            .api_key
            .clone()
            .ok_or("missing backend API key (--api-key or PAPERBOARD_API_KEY)")?;
        let project = self
            .project
            .clone()
            .ok_or("missing backend project id (--project or PAPERBOARD_PROJECT)")?;

        let mut config = GatewayConfig::new(api_key, project);
        if let Some(url) = &self.identity_url {
            config = config.with_identity_url(url);
        }
        if let Some(url) = &self.firestore_url {
            config = config.with_firestore_url(url);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_no_args() {
        // No subcommand should work (enters TUI mode)
        let cli = Cli::parse_from(["paperboard"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_add() {
        let cli = Cli::parse_from(["paperboard", "add", "hello world", "--importance", "0"]);
        match cli.command {
            Some(Commands::Add { text, importance }) => {
                assert_eq!(text, "hello world");
                assert_eq!(importance, 0);
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_parse_add_default_importance() {
        let cli = Cli::parse_from(["paperboard", "add", "hello"]);
        match cli.command {
            Some(Commands::Add { importance, .. }) => assert_eq!(importance, 1),
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_cli_verbose() {
        let cli = Cli::parse_from(["paperboard", "-vvv"]);
        assert_eq!(cli.verbose, 3);
        assert_eq!(cli.log_level(), tracing::Level::TRACE);
    }

    #[test]
    fn test_gateway_config_requires_key_and_project() {
        let cli = Cli::parse_from(["paperboard", "--api-key", "k"]);
        assert!(cli.gateway_config().is_err());

        let cli = Cli::parse_from(["paperboard", "--api-key", "k", "--project", "p"]);
        let config = cli.gateway_config().unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.project_id, "p");
    }

    #[test]
    fn test_gateway_config_url_overrides() {
        let cli = Cli::parse_from([
            "paperboard",
            "--api-key",
            "k",
            "--project",
            "p",
            "--firestore-url",
            "http://localhost:8080",
        ]);
        let config = cli.gateway_config().unwrap();
        assert_eq!(config.firestore_url, "http://localhost:8080");
    }

    #[test]
    fn test_cli_help() {
        // Verify help can be generated without panic
        Cli::command().debug_assert();
    }
}
