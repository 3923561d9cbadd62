//! Client-side state for Paperboard.
//!
//! Two components live here, both pure in-memory state with no I/O: the
//! feed store (the derived read cache of the remote collection) and the
//! authentication state machine. The presentation layer owns both and
//! drives them with gateway results.

pub mod auth;
pub mod feed;

pub use auth::{AuthMachine, AuthState};
pub use feed::FeedStore;
