//! Shared types for Qwait
//!
//! Common types used by both qwait-server and qwait-client: the waitlist
//! entry model, broadcast event payloads, the position assigner and utility
//! functions (phone normalization, snowflake IDs).
//!
//! The position assigner lives here because every connected dashboard
//! client re-runs it locally on each broadcast event.

pub mod message;
pub mod models;
pub mod positions;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use message::WaitlistEvent;
pub use models::{EntryStatus, WaitlistColumn, WaitlistConfig, WaitlistEntry};
pub use positions::assign_positions;
