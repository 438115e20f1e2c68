//! Data models
//!
//! Shared between qwait-server and dashboard clients (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` snowflakes; all timestamps are Unix millis.

pub mod waitlist_config;
pub mod waitlist_entry;

// Re-exports
pub use waitlist_config::*;
pub use waitlist_entry::*;
