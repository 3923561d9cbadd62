//! Core data models for Paperboard.
//!
//! This crate provides the fundamental data types shared across the
//! Paperboard client: news items, importance levels, and the signed-in
//! session.

pub mod ids;
pub mod news;
pub mod session;

// Re-export main types
pub use ids::NewsId;
pub use news::{Importance, NewsItem};
pub use session::Session;
