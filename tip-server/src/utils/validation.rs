//! Input validation helpers
//!
//! Centralized text length constants and validation functions.

use crate::utils::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: team name, first / last name
pub const MAX_NAME_LEN: usize = 200;

/// Upper bound for any single money amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

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

/// Validate a money amount is finite, non-negative and within bounds.
pub fn validate_amount(value: f64, field: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(AppError::validation(format!(
            "{field} must be non-negative, got {value}"
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::validation(format!(
            "{field} exceeds maximum allowed ({MAX_AMOUNT}), got {value}"
        )));
    }
    Ok(())
}

/// Trim and upper-case the first letter ("jane" → "Jane")
pub fn capitalize_name(value: &str) -> String {
    let trimmed = value.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
