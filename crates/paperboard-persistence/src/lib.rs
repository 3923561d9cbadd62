//! Local persistence for Paperboard.
//!
//! The only state the client keeps on disk is the signed-in session, so a
//! restart restores it instead of asking the user to sign in again. Writes
//! go to a temp file first and are renamed into place, so the session file
//! is never left half-written.

pub mod error;
pub mod session_store;

pub use error::{PersistenceError, Result};
pub use session_store::SessionStore;
