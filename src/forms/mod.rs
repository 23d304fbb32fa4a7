//! Raw form and query structs with their conversions into typed payloads.

use chrono::{NaiveDate, NaiveTime};

use crate::domain::types::TypeConstraintError;

pub mod categories;
pub mod pages;
pub mod registrations;
pub mod resources;
pub mod trainings;

/// Trimmed text, with blank input mapped to `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_date(value: &str, field: &'static str) -> Result<NaiveDate, TypeConstraintError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| TypeConstraintError::InvalidValue(format!("{field} must be a yyyy-mm-dd date")))
}

pub(crate) fn parse_optional_date(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<NaiveDate>, TypeConstraintError> {
    optional_text(value)
        .map(|v| parse_date(&v, field))
        .transpose()
}

/// Accepts both `HH:MM` from time inputs and `HH:MM:SS`.
pub(crate) fn parse_optional_time(
    value: Option<String>,
    field: &'static str,
) -> Result<Option<NaiveTime>, TypeConstraintError> {
    optional_text(value)
        .map(|v| {
            NaiveTime::parse_from_str(&v, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&v, "%H:%M:%S"))
                .map_err(|_| TypeConstraintError::InvalidValue(format!("{field} must be a HH:MM time")))
        })
        .transpose()
}

/// Optional numeric id from a `<select>` where the empty option means "any".
pub(crate) fn optional_id(value: Option<String>) -> Option<i32> {
    optional_text(value).and_then(|v| v.parse().ok())
}
