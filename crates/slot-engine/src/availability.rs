//! Availability marking against busy intervals, and the single-pass query.
//!
//! A slot is unavailable when it overlaps any busy interval widened by the
//! buffer at its end. Busy intervals from every blocking calendar are checked
//! as one flat list; they are never merged first, since "overlaps any" gives
//! the same answer for duplicated or overlapping entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::interval::{BusyInterval, TimeSlot};
use crate::slots::{candidates_for_schedule, SlotQuery};
use crate::working_hours::WorkingHoursSpec;

/// The wire shape handed back to the booking page: `{ "slots": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotsResponse {
    pub slots: Vec<TimeSlot>,
}

impl From<Vec<TimeSlot>> for SlotsResponse {
    fn from(slots: Vec<TimeSlot>) -> Self {
        Self { slots }
    }
}

impl SlotsResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Mark every slot that overlaps `[busy.start, busy.end + buffer)` for any busy
/// interval as unavailable. Order and slot boundaries are unchanged, and a slot
/// already marked unavailable stays so.
pub fn mark_availability(
    mut slots: Vec<TimeSlot>,
    busy: &[BusyInterval],
    buffer_minutes: u32,
) -> Vec<TimeSlot> {
    let mut blocked = 0usize;

    for slot in &mut slots {
        if busy.iter().any(|interval| interval.blocks(slot, buffer_minutes)) {
            slot.available = false;
            blocked += 1;
        }
    }

    debug!(
        slots = slots.len(),
        busy = busy.len(),
        blocked,
        buffer_minutes,
        "marked slot availability"
    );

    slots
}

/// Generate candidates and mark them in one pass, with a single `now` shared
/// by both steps.
///
/// # Errors
/// Any validation error of the query or working-hours spec; no slots are
/// computed in that case.
pub fn compute_availability(
    query: &SlotQuery,
    working_hours: &WorkingHoursSpec,
    busy: &[BusyInterval],
    buffer_minutes: u32,
    now: DateTime<Utc>,
) -> Result<Vec<TimeSlot>> {
    query.validate()?;
    let schedule = working_hours.resolve()?;
    let candidates = candidates_for_schedule(query, &schedule, now);
    Ok(mark_availability(candidates, busy, buffer_minutes))
}

/// The earliest available slot, if any. Relies on the chronological order the
/// generator produces.
pub fn first_available(slots: &[TimeSlot]) -> Option<&TimeSlot> {
    slots.iter().find(|slot| slot.available)
}
