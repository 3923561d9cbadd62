//! Command handlers for CLI subcommands.
//!
//! These are the scripting surface: the same gateway calls the TUI makes,
//! run once and printed to stdout.

use std::path::Path;

use paperboard_gateway::{DocumentClient, GatewayConfig, IdentityClient};
use paperboard_models::{Importance, NewsId, Session};
use paperboard_persistence::SessionStore;
use tokio::runtime::Runtime;
use tracing::info;

use crate::cli::{Commands, OutputFormat};

/// Result type for command operations.
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Execute a CLI command.
pub fn execute(command: Commands, config: GatewayConfig, state_dir: &Path) -> Result<()> {
    let store = SessionStore::new(state_dir);
    let runtime = Runtime::new()?;

    match command {
        Commands::Login { email, password } => {
            cmd_login(&runtime, &config, &store, &email, &password)
        }
        Commands::Logout => cmd_logout(&config, &store),
        Commands::List { format } => cmd_list(&runtime, &config, &store, format),
        Commands::Add { text, importance } => {
            cmd_add(&runtime, &config, &store, &text, importance)
        }
        Commands::Remove { id } => cmd_remove(&runtime, &config, &store, &id),
    }
}

/// Loads the persisted session or explains how to get one.
fn require_session(store: &SessionStore) -> Result<Session> {
    store
        .load()?
        .ok_or_else(|| "not signed in; run `paperboard login <email> <password>` first".into())
}

fn cmd_login(
    runtime: &Runtime,
    config: &GatewayConfig,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> Result<()> {
    let identity = IdentityClient::new(config.clone());
    let session = runtime.block_on(identity.sign_in(email, password))?;

    store.save(&session)?;
    info!(email = %session.email, "session persisted");

    println!("Signed in as {}", session.email);
    Ok(())
}

fn cmd_logout(config: &GatewayConfig, store: &SessionStore) -> Result<()> {
    let identity = IdentityClient::new(config.clone());
    identity.sign_out(store)?;

    println!("Signed out");
    Ok(())
}

fn cmd_list(
    runtime: &Runtime,
    config: &GatewayConfig,
    store: &SessionStore,
    format: OutputFormat,
) -> Result<()> {
    let session = require_session(store)?;
    let client = DocumentClient::new(config.clone());
    let items = runtime.block_on(client.list_items(&session))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&items)?);
        }
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No news yet.");
            } else {
                for item in &items {
                    println!(
                        "{:<19}  {:<17}  {}  [{}]",
                        format_timestamp(item.created_at_millis),
                        item.importance.label(),
                        item.text,
                        item.id
                    );
                }
            }
        }
    }
    Ok(())
}

fn cmd_add(
    runtime: &Runtime,
    config: &GatewayConfig,
    store: &SessionStore,
    text: &str,
    importance: i64,
) -> Result<()> {
    let session = require_session(store)?;
    let client = DocumentClient::new(config.clone());
    let level = Importance::from_wire(importance);

    let id = runtime.block_on(client.add_item(&session, text, level))?;

    println!("Added '{}' ({}) as {}", text, level.label(), id);
    Ok(())
}

fn cmd_remove(
    runtime: &Runtime,
    config: &GatewayConfig,
    store: &SessionStore,
    id: &str,
) -> Result<()> {
    let session = require_session(store)?;
    let client = DocumentClient::new(config.clone());
    let id = NewsId::from_string(id);

    runtime.block_on(client.delete_item(&session, &id))?;

    println!("Removed {}", id);
    Ok(())
}

/// Formats an epoch-milliseconds timestamp for display.
pub fn format_timestamp(millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(millis)
        .map(|ts| ts.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_require_session_without_login() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let err = require_session(&store).unwrap_err();
        assert!(err.to_string().contains("not signed in"));
    }

    #[test]
    fn test_require_session_after_login() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path());
        store
            .save(&Session::new("tok", "ref", "a@b.c", "uid"))
            .unwrap();

        let session = require_session(&store).unwrap();
        assert_eq!(session.email, "a@b.c");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_600_000_000_000), "2020-09-13 12:26:40");
    }
}
