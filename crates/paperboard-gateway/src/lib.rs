//! Remote data gateway for Paperboard.
//!
//! Thin client around the two external collaborators: the document store
//! holding the `paper` collection (Firestore REST semantics) and the
//! email/password identity provider (Identity Toolkit REST semantics).
//! Also hosts the poll-based change watcher that stands in for a live
//! collection subscription.

pub mod config;
pub mod error;
pub mod firestore;
pub mod identity;
pub mod watch;

pub use config::GatewayConfig;
pub use error::{AuthError, GatewayError, Result};
pub use firestore::{DocumentClient, NEWS_COLLECTION};
pub use identity::IdentityClient;
pub use watch::{ChangeNotification, ChangeWatcher};
