//! Presence and parseability checks for raw text input.
//!
//! Front ends collect values as text. These helpers turn that text into the
//! typed values the client accepts, failing with `ApiError::Validation` and a
//! message fit to show the user.

use std::str::FromStr;

use serde_json::Value;

use crate::error::ApiError;
use crate::types::Fields;

/// Blank usernames mean "anonymous".
pub fn normalize_username(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

pub fn require_username(raw: Option<&str>) -> Result<String, ApiError> {
    normalize_username(raw).ok_or_else(|| ApiError::validation("Please enter a username."))
}

pub fn parse_record_id(raw: &str) -> Result<i64, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation("Please enter a record ID."));
    }
    trimmed
        .parse()
        .map_err(|_| ApiError::validation("Record ID must be a whole number."))
}

/// Parse a required numeric field. `field` names it in the error message.
pub fn parse_number<T>(field: &str, raw: &str) -> Result<T, ApiError>
where
    T: FromStr + Into<f64> + Copy,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::validation(format!("Please enter {field}.")));
    }
    let value: T = trimmed
        .parse()
        .map_err(|_| ApiError::validation(format!("{field} must be a number, got '{trimmed}'.")))?;
    if !value.into().is_finite() {
        return Err(ApiError::validation(format!("{field} must be a finite number.")));
    }
    Ok(value)
}

/// Optional free-form JSON object, as typed into an edit box.
///
/// Blank text is `None`. Anything that is not a JSON object is rejected.
pub fn parse_fields(field: &str, raw: Option<&str>) -> Result<Option<Fields>, ApiError> {
    let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(Some(map)),
        _ => Err(ApiError::validation(format!("Invalid {field} JSON."))),
    }
}
