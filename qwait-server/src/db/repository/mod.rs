//! Repository Module
//!
//! Free-function CRUD over `&SqlitePool`, scoped by `restaurant_id`.
//! Timestamps are Unix millis; repositories never compute derived fields
//! (positions, wait times) — those stay read-time projections.

pub mod waitlist_config;
pub mod waitlist_entry;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        // 活跃号码的部分唯一索引冲突 → 业务层的重复条目错误
        if let sqlx::Error::Database(db) = &err
            && db.is_unique_violation()
        {
            return RepoError::Duplicate(
                "An active entry already exists for this phone number".to_string(),
            );
        }
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
