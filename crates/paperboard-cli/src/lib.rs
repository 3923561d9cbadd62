//! Paperboard CLI library.
//!
//! Hosts the clap definitions, the one-shot command handlers, and the TUI.

pub mod cli;
pub mod commands;
pub mod tui;
