//! Terminal User Interface for Paperboard.
//!
//! Provides the interactive client:
//! - Login screen while anonymous (email, password, inline error)
//! - Feed / Add / Account tabs once signed in
//! - Status bar with refresh state and footer with keybindings
//! - Blocking alert popup for remote failures
//!
//! Which screen set is visible follows the authentication state machine
//! alone; there is no separate routing logic.

mod app;
mod events;
mod ui;

pub use app::{App, LoginField, Tab};
pub use events::run;
