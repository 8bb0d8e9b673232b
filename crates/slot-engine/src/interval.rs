//! Time slots, busy intervals, and the half-open overlap test they share.
//!
//! Adjacent intervals (where one ends exactly when another starts) do NOT overlap.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A candidate bookable window of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

impl TimeSlot {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// A time range already occupied on some calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyInterval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Whether this interval, widened by `buffer_minutes` after its end only,
    /// overlaps the slot.
    ///
    /// The effective blocking window is `[start, end + buffer)`. A slot may end
    /// exactly when the interval starts, and may start exactly when the buffer
    /// has elapsed.
    pub fn blocks(&self, slot: &TimeSlot, buffer_minutes: u32) -> bool {
        let blocked_until = self.end + Duration::minutes(i64::from(buffer_minutes));
        overlaps(slot.start, slot.end, self.start, blocked_until)
    }
}

/// Half-open interval intersection: `[a_start, a_end)` and `[b_start, b_end)`
/// overlap iff `a_start < b_end && b_start < a_end`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}
