//! # slot-engine
//!
//! Bookable appointment slots from working hours and calendar busy time.
//!
//! Given a date range, an appointment length and the office's working hours,
//! the engine lists every start time (at 15-minute resolution by default) whose
//! slot fits inside a working window and lies in the future, then marks each
//! slot unavailable if it collides with a busy interval plus the trailing
//! buffer. The engine is pure: busy intervals are fetched by the caller,
//! typically through [`source::collect_blocking_busy`].
//!
//! ## Modules
//!
//! - [`slots`]: candidate slot generation over working-hours windows
//! - [`availability`]: busy-interval marking and the single-pass query
//! - [`working_hours`]: simple and granular working-hours specs
//! - [`interval`]: slot and busy-interval types, overlap primitive
//! - [`source`]: calendar source trait and role filtering
//! - [`error`]: Error types

pub mod availability;
pub mod error;
pub mod interval;
pub mod slots;
pub mod source;
pub mod working_hours;

pub use availability::{compute_availability, first_available, mark_availability, SlotsResponse};
pub use error::SlotError;
pub use interval::{overlaps, BusyInterval, TimeSlot};
pub use slots::{
    generate_candidate_slots, generate_candidate_slots_at, SlotQuery, DEFAULT_GRANULARITY_MINUTES,
};
pub use source::{collect_blocking_busy, CalendarRole, CalendarSource, LocalCalendar};
pub use working_hours::{ClockRange, GranularHours, SimpleHours, WeeklySchedule, WorkingHoursSpec};
