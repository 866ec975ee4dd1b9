//! Input normalization shared by the service layer and HTTP handlers.

use chrono::{NaiveDate, NaiveTime, Timelike};

use super::DomainError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Parse a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(value: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| DomainError::Validation(format!("invalid date '{}', expected YYYY-MM-DD", value)))
}

/// Parse a time of day in `HH:MM` form. Seconds are accepted and dropped.
pub fn parse_time(value: &str) -> Result<NaiveTime, DomainError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map(|t| t.with_second(0).unwrap_or(t))
        .map_err(|_| DomainError::Validation(format!("invalid time '{}', expected HH:MM", value)))
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Empty or whitespace-only comments are stored as absent.
pub fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
