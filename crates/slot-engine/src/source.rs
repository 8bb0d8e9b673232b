//! Calendar sources that feed busy intervals into the engine.
//!
//! A booking calendar may be backed by several calendars (an external provider
//! plus the local store, or several provider calendars). Each is tagged with a
//! [`CalendarRole`]: only *blocking* calendars occupy time. Informational
//! calendars are shown to staff but must never reach
//! [`mark_availability`](crate::availability::mark_availability).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::interval::{overlaps, BusyInterval};

/// How a calendar's events affect bookable time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarRole {
    /// Events make the time unavailable for booking.
    #[default]
    Blocking,
    /// Events are displayed only; they never block a slot.
    Informational,
}

/// Anything that can report busy intervals for a time range.
pub trait CalendarSource {
    /// Opaque identifier (e.g. "office-google", "local").
    fn id(&self) -> &str;

    fn role(&self) -> CalendarRole;

    /// Busy intervals overlapping `[from, to)`, already in UTC.
    ///
    /// # Errors
    /// Adapters report fetch failures as [`SlotError::Source`](crate::SlotError::Source).
    fn busy_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<BusyInterval>>;
}

impl<T: CalendarSource + ?Sized> CalendarSource for Box<T> {
    fn id(&self) -> &str {
        (**self).id()
    }

    fn role(&self) -> CalendarRole {
        (**self).role()
    }

    fn busy_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<BusyInterval>> {
        (**self).busy_between(from, to)
    }
}

/// An in-memory calendar, used for the locally stored fallback calendar and
/// for calendars whose busy data was fetched up front.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalCalendar {
    pub id: String,
    #[serde(default)]
    pub role: CalendarRole,
    #[serde(default)]
    pub busy: Vec<BusyInterval>,
}

impl LocalCalendar {
    pub fn new(id: impl Into<String>, role: CalendarRole, busy: Vec<BusyInterval>) -> Self {
        Self {
            id: id.into(),
            role,
            busy,
        }
    }
}

impl CalendarSource for LocalCalendar {
    fn id(&self) -> &str {
        &self.id
    }

    fn role(&self) -> CalendarRole {
        self.role
    }

    fn busy_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Vec<BusyInterval>> {
        Ok(self
            .busy
            .iter()
            .filter(|b| overlaps(b.start, b.end, from, to))
            .copied()
            .collect())
    }
}

/// Flatten the busy intervals of every blocking source into one list.
///
/// Informational sources are skipped without being queried. Intervals are
/// concatenated in source order, not merged.
///
/// # Errors
/// The first source failure aborts collection; no partial list is returned.
pub fn collect_blocking_busy<S>(
    sources: &[S],
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<BusyInterval>>
where
    S: CalendarSource,
{
    let mut busy = Vec::new();

    for source in sources {
        if source.role() != CalendarRole::Blocking {
            debug!(calendar = source.id(), "skipping informational calendar");
            continue;
        }
        let intervals = source.busy_between(from, to)?;
        debug!(calendar = source.id(), busy = intervals.len(), "collected busy intervals");
        busy.extend(intervals);
    }

    Ok(busy)
}
