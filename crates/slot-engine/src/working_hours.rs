//! Working-hours specifications and their resolution into per-weekday windows.
//!
//! Two shapes are accepted: a *simple* spec (one `[startHour, endHour)` window on
//! every listed weekday) and a *granular* spec (any number of `HH:MM` ranges per
//! named weekday). Both resolve to the same [`WeeklySchedule`], so slot
//! generation never needs to know which shape the caller stored.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SlotError};

const MINUTES_PER_HOUR: u32 = 60;
const HOURS_PER_DAY: u32 = 24;

/// Sunday-first week, matching the `0..=6` numbering of `workDays`.
const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// A working-hours configuration in either of its stored shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum WorkingHoursSpec {
    Simple(SimpleHours),
    Granular(GranularHours),
}

/// The same `[startHour:00, endHour:00)` window on every working day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimpleHours {
    pub start_hour: u32,
    /// Exclusive; 24 means the window runs to midnight.
    pub end_hour: u32,
    /// Weekday numbers, 0 = Sunday .. 6 = Saturday.
    pub work_days: BTreeSet<u8>,
    #[serde(default)]
    pub buffer_minutes: u32,
}

/// Explicit time-of-day ranges per weekday. Missing days have no ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GranularHours {
    #[serde(default)]
    pub sunday: Vec<ClockRange>,
    #[serde(default)]
    pub monday: Vec<ClockRange>,
    #[serde(default)]
    pub tuesday: Vec<ClockRange>,
    #[serde(default)]
    pub wednesday: Vec<ClockRange>,
    #[serde(default)]
    pub thursday: Vec<ClockRange>,
    #[serde(default)]
    pub friday: Vec<ClockRange>,
    #[serde(default)]
    pub saturday: Vec<ClockRange>,
}

/// A `{ "start": "HH:MM", "end": "HH:MM" }` range. Kept as text so that a bad
/// value surfaces as [`SlotError::InvalidWorkingHours`] rather than a
/// deserialization failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockRange {
    pub start: String,
    pub end: String,
}

impl ClockRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl GranularHours {
    pub fn ranges_for(&self, weekday: Weekday) -> &[ClockRange] {
        match weekday {
            Weekday::Sun => &self.sunday,
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
        }
    }

    /// Builder-style setter, replacing any ranges already configured for `weekday`.
    pub fn with_day(mut self, weekday: Weekday, ranges: Vec<ClockRange>) -> Self {
        let slot = match weekday {
            Weekday::Sun => &mut self.sunday,
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
        };
        *slot = ranges;
        self
    }
}

/// One working window within a day, in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyWindow {
    pub start_minute: u32,
    pub end_minute: u32,
    /// Round the first candidate start up to the slot granularity.
    pub round_start: bool,
}

impl DailyWindow {
    /// The window's concrete instants on `date`.
    pub fn on(&self, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        (
            at_minute(date, i64::from(self.start_minute)),
            at_minute(date, i64::from(self.end_minute)),
        )
    }
}

/// A validated working-hours spec: sorted, non-overlapping windows per weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Vec<DailyWindow>; 7],
}

impl WeeklySchedule {
    pub fn windows_for(&self, weekday: Weekday) -> &[DailyWindow] {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn windows_on(&self, date: NaiveDate) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        self.windows_for(date.weekday())
            .iter()
            .map(|w| w.on(date))
            .collect()
    }

    /// Total number of windows across the week.
    pub fn window_count(&self) -> usize {
        self.days.iter().map(Vec::len).sum()
    }
}

impl WorkingHoursSpec {
    /// Convenience constructor for the simple shape.
    pub fn simple(
        start_hour: u32,
        end_hour: u32,
        work_days: impl IntoIterator<Item = u8>,
        buffer_minutes: u32,
    ) -> Self {
        WorkingHoursSpec::Simple(SimpleHours {
            start_hour,
            end_hour,
            work_days: work_days.into_iter().collect(),
            buffer_minutes,
        })
    }

    /// The buffer carried by the spec itself. Granular specs have none; their
    /// buffer is supplied separately by the caller.
    pub fn buffer_minutes(&self) -> Option<u32> {
        match self {
            WorkingHoursSpec::Simple(hours) => Some(hours.buffer_minutes),
            WorkingHoursSpec::Granular(_) => None,
        }
    }

    /// Validate the spec and resolve it into per-weekday windows.
    ///
    /// # Errors
    /// Returns [`SlotError::InvalidWorkingHours`] when a simple spec has
    /// `startHour >= endHour`, an hour past 24 or a weekday outside `0..=6`, or
    /// when a granular range is unparsable, empty, or overlaps another range on
    /// the same weekday.
    pub fn resolve(&self) -> Result<WeeklySchedule> {
        match self {
            WorkingHoursSpec::Simple(hours) => resolve_simple(hours),
            WorkingHoursSpec::Granular(hours) => resolve_granular(hours),
        }
    }
}

fn resolve_simple(hours: &SimpleHours) -> Result<WeeklySchedule> {
    if hours.end_hour > HOURS_PER_DAY {
        return Err(SlotError::InvalidWorkingHours(format!(
            "end hour {} is past the end of the day",
            hours.end_hour
        )));
    }
    if hours.start_hour >= hours.end_hour {
        return Err(SlotError::InvalidWorkingHours(format!(
            "start hour {} must be before end hour {}",
            hours.start_hour, hours.end_hour
        )));
    }

    let window = DailyWindow {
        start_minute: hours.start_hour * MINUTES_PER_HOUR,
        end_minute: hours.end_hour * MINUTES_PER_HOUR,
        round_start: true,
    };

    let mut schedule = WeeklySchedule::default();
    for &day in &hours.work_days {
        let windows = schedule.days.get_mut(usize::from(day)).ok_or_else(|| {
            SlotError::InvalidWorkingHours(format!("weekday {} is outside 0..=6", day))
        })?;
        windows.push(window);
    }
    Ok(schedule)
}

fn resolve_granular(hours: &GranularHours) -> Result<WeeklySchedule> {
    let mut schedule = WeeklySchedule::default();

    for weekday in WEEK {
        let mut day_windows = Vec::new();
        for range in hours.ranges_for(weekday) {
            let start_minute = parse_clock(&range.start)?;
            let end_minute = parse_clock(&range.end)?;
            if start_minute >= end_minute {
                return Err(SlotError::InvalidWorkingHours(format!(
                    "{:?} range {}-{} does not end after it starts",
                    weekday, range.start, range.end
                )));
            }
            day_windows.push(DailyWindow {
                start_minute,
                end_minute,
                round_start: false,
            });
        }

        day_windows.sort_by_key(|w| w.start_minute);
        if let Some(pair) = day_windows
            .windows(2)
            .find(|pair| pair[1].start_minute < pair[0].end_minute)
        {
            return Err(SlotError::InvalidWorkingHours(format!(
                "{:?} ranges overlap at minute {}",
                weekday, pair[1].start_minute
            )));
        }

        schedule.days[weekday.num_days_from_sunday() as usize] = day_windows;
    }

    Ok(schedule)
}

/// Parse `HH:MM` (hour may be a single digit) into minutes since midnight.
/// `24:00` is accepted as the end of the day.
pub fn parse_clock(text: &str) -> Result<u32> {
    let invalid = || {
        SlotError::InvalidWorkingHours(format!(
            "unparsable time of day '{}' (expected HH:MM)",
            text
        ))
    };

    let (h, m) = text.trim().split_once(':').ok_or_else(invalid)?;
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if h.is_empty() || h.len() > 2 || m.len() != 2 || !all_digits(h) || !all_digits(m) {
        return Err(invalid());
    }

    let hour: u32 = h.parse().map_err(|_| invalid())?;
    let minute: u32 = m.parse().map_err(|_| invalid())?;
    if minute >= MINUTES_PER_HOUR || hour > HOURS_PER_DAY || (hour == HOURS_PER_DAY && minute != 0)
    {
        return Err(invalid());
    }

    Ok(hour * MINUTES_PER_HOUR + minute)
}

/// Midnight UTC of `date` plus `minute` minutes.
pub(crate) fn at_minute(date: NaiveDate, minute: i64) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc() + Duration::minutes(minute)
}
