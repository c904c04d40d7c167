//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! SQLite TEXT has no built-in length enforcement, so limits live here.

use crate::error::AppError;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: user, product
pub const MAX_NAME_LEN: usize = 200;

/// Product descriptions
pub const MAX_DESCRIPTION_LEN: usize = 500;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::Validation(format!(
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
        return Err(AppError::Validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate that a point amount is a positive integer.
pub fn validate_points(points: i64) -> Result<(), AppError> {
    if points < 1 {
        return Err(AppError::Validation(
            "points must be a positive integer".into(),
        ));
    }
    Ok(())
}

/// Normalize a CPF/CNPJ document to its canonical digits-only form.
///
/// Any mask characters ("123.456.789-01", "12.345.678/0001-95") are
/// stripped; the result must be exactly 11 digits (CPF) or 14 (CNPJ).
pub fn normalize_document(raw: &str) -> Result<String, AppError> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() != 11 && digits.len() != 14 {
        return Err(AppError::Validation(
            "document must have 11 (CPF) or 14 (CNPJ) digits".into(),
        ));
    }
    Ok(digits)
}
