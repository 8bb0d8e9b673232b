//! Error types for slot-engine operations.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid date range: end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid duration: {0} minutes (must be positive)")]
    InvalidDuration(i64),

    #[error("Invalid granularity: {0} minutes (must be positive)")]
    InvalidGranularity(i64),

    #[error("Invalid working hours: {0}")]
    InvalidWorkingHours(String),

    #[error("Calendar source '{calendar}' failed: {message}")]
    Source { calendar: String, message: String },
}

pub type Result<T> = std::result::Result<T, SlotError>;
