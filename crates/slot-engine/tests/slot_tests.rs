//! Tests for candidate slot generation.

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};
use slot_engine::{
    generate_candidate_slots, generate_candidate_slots_at, ClockRange, GranularHours, SlotError,
    SlotQuery, WorkingHoursSpec,
};

// ── Helpers ─────────────────────────────────────────────────────────────────

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// A "now" well before every date used below.
fn long_ago() -> DateTime<Utc> {
    at(2026, 1, 1, 0, 0)
}

/// Monday 2026-03-16 only.
fn monday_query(duration: i64) -> SlotQuery {
    SlotQuery::new(date(2026, 3, 16), date(2026, 3, 17), duration)
}

fn granular_monday(ranges: &[(&str, &str)]) -> WorkingHoursSpec {
    WorkingHoursSpec::Granular(GranularHours::default().with_day(
        Weekday::Mon,
        ranges.iter().map(|(s, e)| ClockRange::new(*s, *e)).collect(),
    ))
}

// ── Simple working hours ────────────────────────────────────────────────────

#[test]
fn simple_window_yields_quarter_hour_starts() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let slots = generate_candidate_slots_at(&monday_query(60), &hours, long_ago()).unwrap();

    // 09:00, 09:15, ..., 11:00
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[0].start, at(2026, 3, 16, 9, 0));
    assert_eq!(slots[0].end, at(2026, 3, 16, 10, 0));
    assert_eq!(slots[1].start, at(2026, 3, 16, 9, 15));
    assert_eq!(slots[8].start, at(2026, 3, 16, 11, 0));
    assert_eq!(slots[8].end, at(2026, 3, 16, 12, 0));
    assert!(slots.iter().all(|s| s.available));
}

#[test]
fn non_working_days_contribute_nothing() {
    // Mon-Fri only; query Sat 2026-03-14 and Sun 2026-03-15.
    let hours = WorkingHoursSpec::simple(9, 17, [1, 2, 3, 4, 5], 0);
    let query = SlotQuery::new(date(2026, 3, 14), date(2026, 3, 16), 30);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn multi_day_range_is_ordered_by_day_then_start() {
    let hours = WorkingHoursSpec::simple(9, 10, [1, 2, 3], 0);
    let query = SlotQuery::new(date(2026, 3, 16), date(2026, 3, 19), 30);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();

    // 3 per day: 09:00, 09:15, 09:30
    assert_eq!(slots.len(), 9);
    assert_eq!(slots[3].start, at(2026, 3, 17, 9, 0));
    assert_eq!(slots[8].start, at(2026, 3, 18, 9, 30));
    assert!(slots.windows(2).all(|w| w[0].start < w[1].start));
}

#[test]
fn end_date_is_exclusive() {
    let hours = WorkingHoursSpec::simple(9, 10, [1, 2], 0);
    // Monday to Tuesday: Tuesday is not included.
    let slots = generate_candidate_slots_at(&monday_query(60), &hours, long_ago()).unwrap();
    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].start, at(2026, 3, 16, 9, 0));
}

#[test]
fn window_ending_at_midnight() {
    let hours = WorkingHoursSpec::simple(22, 24, [1], 0);
    let slots = generate_candidate_slots_at(&monday_query(60), &hours, long_ago()).unwrap();

    assert_eq!(slots.len(), 5);
    assert_eq!(slots[4].start, at(2026, 3, 16, 23, 0));
    assert_eq!(slots[4].end, at(2026, 3, 17, 0, 0));
}

#[test]
fn partial_trailing_period_is_never_offered() {
    // 50 minutes does not divide the 09:00-10:00 window; only 09:00 fits.
    let hours = WorkingHoursSpec::simple(9, 10, [1], 0);
    let slots = generate_candidate_slots_at(&monday_query(50), &hours, long_ago()).unwrap();

    assert_eq!(slots.len(), 1);
    assert_eq!(slots[0].end, at(2026, 3, 16, 9, 50));
}

#[test]
fn duration_longer_than_window_yields_nothing() {
    let hours = WorkingHoursSpec::simple(9, 10, [1], 0);
    let slots = generate_candidate_slots_at(&monday_query(90), &hours, long_ago()).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn simple_window_start_rounds_up_to_granularity() {
    // 09:00 is minute 540; with a 25-minute stride the first boundary is 09:10.
    let hours = WorkingHoursSpec::simple(9, 10, [1], 0);
    let query = monday_query(25).with_granularity(25);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();

    assert_eq!(slots[0].start, at(2026, 3, 16, 9, 10));
    assert_eq!(slots.last().unwrap().start, at(2026, 3, 16, 9, 35));
}

#[test]
fn custom_granularity_changes_the_stride() {
    let hours = WorkingHoursSpec::simple(9, 11, [1], 0);
    let query = monday_query(60).with_granularity(30);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();
    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(
        starts,
        vec![
            at(2026, 3, 16, 9, 0),
            at(2026, 3, 16, 9, 30),
            at(2026, 3, 16, 10, 0),
        ]
    );
}

// ── Granular working hours ──────────────────────────────────────────────────

#[test]
fn lunch_gap_is_respected() {
    let hours = granular_monday(&[("09:00", "12:00"), ("13:00", "18:00")]);
    let slots = generate_candidate_slots_at(&monday_query(90), &hours, long_ago()).unwrap();

    let noon = at(2026, 3, 16, 12, 0);
    let one_pm = at(2026, 3, 16, 13, 0);
    assert!(slots.iter().all(|s| s.end <= noon || s.start >= one_pm));

    let morning = slots.iter().filter(|s| s.end <= noon).count();
    let afternoon = slots.iter().filter(|s| s.start >= one_pm).count();
    // 09:00..10:30 and 13:00..16:30 at 15-minute stride.
    assert_eq!(morning, 7);
    assert_eq!(afternoon, 15);
}

#[test]
fn granular_ranges_are_emitted_in_time_order() {
    // Configured out of order.
    let hours = granular_monday(&[("14:00", "15:00"), ("08:00", "09:00")]);
    let slots = generate_candidate_slots_at(&monday_query(60), &hours, long_ago()).unwrap();

    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0].start, at(2026, 3, 16, 8, 0));
    assert_eq!(slots[1].start, at(2026, 3, 16, 14, 0));
}

#[test]
fn granular_range_starts_exactly_where_configured() {
    let hours = granular_monday(&[("09:10", "10:00")]);
    let slots = generate_candidate_slots_at(&monday_query(30), &hours, long_ago()).unwrap();

    let starts: Vec<_> = slots.iter().map(|s| s.start).collect();
    assert_eq!(starts, vec![at(2026, 3, 16, 9, 10), at(2026, 3, 16, 9, 25)]);
}

#[test]
fn weekday_without_ranges_contributes_nothing() {
    let hours = granular_monday(&[("09:00", "12:00")]);
    // Tuesday 2026-03-17.
    let query = SlotQuery::new(date(2026, 3, 17), date(2026, 3, 18), 30);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();
    assert!(slots.is_empty());
}

// ── Past exclusion ──────────────────────────────────────────────────────────

#[test]
fn slots_not_strictly_after_now_are_dropped() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let now = at(2026, 3, 16, 10, 0);

    let slots = generate_candidate_slots_at(&monday_query(60), &hours, now).unwrap();

    // 10:00 itself is excluded; 10:15, 10:30, 10:45, 11:00 remain.
    assert_eq!(slots.len(), 4);
    assert_eq!(slots[0].start, at(2026, 3, 16, 10, 15));
}

#[test]
fn now_does_not_shift_the_window_grid() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let now = at(2026, 3, 16, 9, 7);

    let slots = generate_candidate_slots_at(&monday_query(60), &hours, now).unwrap();
    assert_eq!(slots[0].start, at(2026, 3, 16, 9, 15));
}

#[test]
fn wall_clock_variant_excludes_past_dates() {
    let hours = WorkingHoursSpec::simple(0, 24, [0, 1, 2, 3, 4, 5, 6], 0);
    let query = SlotQuery::new(date(2000, 1, 3), date(2000, 1, 5), 60);

    let slots = generate_candidate_slots(&query, &hours).unwrap();
    assert!(slots.is_empty());
}

// ── Validation ──────────────────────────────────────────────────────────────

#[test]
fn equal_start_and_end_date_is_empty_not_an_error() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let query = SlotQuery::new(date(2026, 3, 16), date(2026, 3, 16), 60);

    let slots = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap();
    assert!(slots.is_empty());
}

#[test]
fn end_before_start_is_invalid_range() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let query = SlotQuery::new(date(2026, 3, 17), date(2026, 3, 16), 60);

    let err = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap_err();
    assert_eq!(
        err,
        SlotError::InvalidRange {
            start: date(2026, 3, 17),
            end: date(2026, 3, 16),
        }
    );
}

#[test]
fn non_positive_duration_is_rejected() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    for duration in [0, -30] {
        let err = generate_candidate_slots_at(&monday_query(duration), &hours, long_ago())
            .unwrap_err();
        assert_eq!(err, SlotError::InvalidDuration(duration));
    }
}

#[test]
fn non_positive_granularity_is_rejected() {
    let hours = WorkingHoursSpec::simple(9, 12, [1], 0);
    let query = monday_query(60).with_granularity(0);

    let err = generate_candidate_slots_at(&query, &hours, long_ago()).unwrap_err();
    assert_eq!(err, SlotError::InvalidGranularity(0));
}

#[test]
fn invalid_working_hours_fail_before_generation() {
    let hours = WorkingHoursSpec::simple(12, 9, [1], 0);
    let err = generate_candidate_slots_at(&monday_query(60), &hours, long_ago()).unwrap_err();
    assert!(matches!(err, SlotError::InvalidWorkingHours(_)));
}
