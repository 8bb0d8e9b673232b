//! Candidate slot generation over working-hours windows.
//!
//! Every calendar day in `[start_date, end_date)` contributes the windows its
//! weekday has in the resolved [`WeeklySchedule`]. Inside a window the candidate
//! start steps forward by the granularity (15 minutes unless overridden), which
//! is independent of both the slot duration and the buffer, so consecutive
//! candidates overlap whenever the duration exceeds the stride. A candidate is
//! kept only if it fits entirely inside its window and starts strictly after
//! `now`.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SlotError};
use crate::interval::TimeSlot;
use crate::working_hours::{at_minute, WeeklySchedule, WorkingHoursSpec};

/// Stride between candidate starts, in minutes.
pub const DEFAULT_GRANULARITY_MINUTES: i64 = 15;

fn default_granularity() -> i64 {
    DEFAULT_GRANULARITY_MINUTES
}

/// What the caller is asking for: a date range and an appointment length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotQuery {
    /// First day considered (inclusive).
    pub start_date: NaiveDate,
    /// Day after the last day considered (exclusive).
    pub end_date: NaiveDate,
    pub duration_minutes: i64,
    #[serde(default = "default_granularity")]
    pub granularity_minutes: i64,
}

impl SlotQuery {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, duration_minutes: i64) -> Self {
        Self {
            start_date,
            end_date,
            duration_minutes,
            granularity_minutes: DEFAULT_GRANULARITY_MINUTES,
        }
    }

    pub fn with_granularity(mut self, granularity_minutes: i64) -> Self {
        self.granularity_minutes = granularity_minutes;
        self
    }

    /// # Errors
    /// [`SlotError::InvalidRange`] if `end_date < start_date`,
    /// [`SlotError::InvalidDuration`] / [`SlotError::InvalidGranularity`] for
    /// non-positive minute values. An empty range (`end_date == start_date`)
    /// is valid.
    pub fn validate(&self) -> Result<()> {
        if self.end_date < self.start_date {
            return Err(SlotError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.duration_minutes <= 0 {
            return Err(SlotError::InvalidDuration(self.duration_minutes));
        }
        if self.granularity_minutes <= 0 {
            return Err(SlotError::InvalidGranularity(self.granularity_minutes));
        }
        Ok(())
    }

    /// Calendar days in `[start_date, end_date)`.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |day| *day < end)
    }
}

/// Generate candidate slots, excluding any that do not start after the current
/// wall-clock time.
///
/// All returned slots are marked available; see
/// [`mark_availability`](crate::availability::mark_availability) for the busy check.
pub fn generate_candidate_slots(
    query: &SlotQuery,
    working_hours: &WorkingHoursSpec,
) -> Result<Vec<TimeSlot>> {
    generate_candidate_slots_at(query, working_hours, Utc::now())
}

/// Same as [`generate_candidate_slots`] with an explicit `now`.
///
/// # Errors
/// Fails before generating anything if the query or the working-hours spec is
/// invalid.
pub fn generate_candidate_slots_at(
    query: &SlotQuery,
    working_hours: &WorkingHoursSpec,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    query.validate()?;
    let schedule = working_hours.resolve()?;
    Ok(candidates_for_schedule(query, &schedule, now))
}

/// Slot generation proper. `query` must already be validated.
pub(crate) fn candidates_for_schedule(
    query: &SlotQuery,
    schedule: &WeeklySchedule,
    now: DateTime<Utc>,
) -> Vec<TimeSlot> {
    let duration = query.duration_minutes;
    let granularity = query.granularity_minutes;

    let mut slots = Vec::new();
    let mut days = 0usize;

    for date in query.days() {
        days += 1;
        for window in schedule.windows_for(date.weekday()) {
            let window_start = i64::from(window.start_minute);
            let window_end = i64::from(window.end_minute);

            let mut offset = if window.round_start {
                round_up(window_start, granularity)
            } else {
                window_start
            };

            while offset.saturating_add(duration) <= window_end {
                let start = at_minute(date, offset);
                if start > now {
                    slots.push(TimeSlot {
                        start,
                        end: start + Duration::minutes(duration),
                        available: true,
                    });
                }
                offset = offset.saturating_add(granularity);
            }
        }
    }

    debug!(
        days,
        candidates = slots.len(),
        duration_minutes = duration,
        granularity_minutes = granularity,
        "generated candidate slots"
    );

    slots
}

/// Round `minute` up to the next multiple of `granularity` (both positive).
fn round_up(minute: i64, granularity: i64) -> i64 {
    let remainder = minute % granularity;
    if remainder == 0 {
        minute
    } else {
        minute + (granularity - remainder)
    }
}

