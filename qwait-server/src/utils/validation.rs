//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use shared::util::normalize_phone;

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 200;

/// Notes (free text shown on the dashboard)
pub const MAX_NOTE_LEN: usize = 500;

/// Raw phone input (before normalization)
pub const MAX_PHONE_LEN: usize = 100;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a raw phone number and return its normalized (digits-only) form.
pub fn validate_phone(raw: &str) -> Result<String, AppError> {
    if raw.len() > MAX_PHONE_LEN {
        return Err(AppError::validation(format!(
            "phone_number is too long ({} chars, max {MAX_PHONE_LEN})",
            raw.len()
        )));
    }
    let normalized = normalize_phone(raw);
    if normalized.is_empty() {
        return Err(AppError::validation(
            "phone_number must contain at least one digit",
        ));
    }
    Ok(normalized)
}

/// 人数必须 >= 1
pub fn validate_people_count(count: i64) -> Result<(), AppError> {
    if count < 1 {
        return Err(AppError::validation(format!(
            "people_count must be at least 1, got {count}"
        )));
    }
    Ok(())
}
