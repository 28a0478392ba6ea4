//! Work-hour deadline calculation.
//!
//! The cursor is settled into working time, the partial first day is
//! consumed, whole work days are skipped arithmetically and the remainder
//! is placed inside the final day. Cost does not grow with the number of
//! days a budget spans.

use crate::calendar::WorkCalendar;
use crate::core::Timestamp;
use crate::deadline::cursor::Cursor;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Result of a deadline computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeadlineOutcome {
    /// The computed (or best-effort) deadline
    pub deadline: Timestamp,
    /// True when the search gave up and `deadline` is only best-effort
    pub exhausted: bool,
}

impl DeadlineOutcome {
    fn complete(deadline: Timestamp) -> Self {
        Self {
            deadline,
            exhausted: false,
        }
    }
}

/// Convert a work-hour budget to whole minutes, rounding once.
///
/// Negative, NaN and infinite budgets count as zero.
pub fn hours_to_minutes(hours: f64) -> i64 {
    if !hours.is_finite() {
        warn!(hours, "Non-finite SLA budget treated as zero");
        return 0;
    }
    if hours <= 0.0 {
        return 0;
    }
    (hours * 60.0).round() as i64
}

/// Add a work-hour budget to `start`.
pub fn add_work_hours(start: Timestamp, hours: f64, calendar: &WorkCalendar) -> Timestamp {
    add_work_minutes(start, hours_to_minutes(hours), calendar)
}

/// Add a budget of whole work minutes to `start`.
pub fn add_work_minutes(start: Timestamp, minutes: i64, calendar: &WorkCalendar) -> Timestamp {
    compute_minutes(start, minutes, calendar).deadline
}

/// Add a work-hour budget, reporting whether the result is only best-effort.
pub fn compute_deadline(start: Timestamp, hours: f64, calendar: &WorkCalendar) -> DeadlineOutcome {
    compute_minutes(start, hours_to_minutes(hours), calendar)
}

fn compute_minutes(start: Timestamp, minutes: i64, calendar: &WorkCalendar) -> DeadlineOutcome {
    if minutes <= 0 {
        return DeadlineOutcome::complete(start);
    }

    let tz = calendar.timezone();
    let Some(origin) = Cursor::from_instant(start, tz) else {
        return exhausted(start, minutes, None, calendar);
    };
    let Some(cursor) = origin.settle(calendar) else {
        return exhausted(start, minutes, Some(origin), calendar);
    };

    let remaining = minutes.saturating_mul(60);
    let (second, remaining) = consume_day(calendar, cursor.second, remaining);
    let first_day_end = Cursor::at(cursor.date, second);
    if remaining == 0 {
        return finish(start, minutes, first_day_end, calendar);
    }

    // Skip whole days, leaving a remainder in (0, capacity] for the last day.
    let capacity = calendar.daily_capacity_seconds();
    let full_days = (remaining - 1) / capacity;
    let remaining = remaining - full_days * capacity;

    let last_day = next_work_day(calendar, cursor.date)
        .and_then(|date| skip_work_days(calendar, date, full_days));
    let Some(last_day) = last_day else {
        return exhausted(start, minutes, Some(first_day_end), calendar);
    };

    let day_start = i64::from(calendar.work_start().seconds_from_midnight());
    let (second, _) = consume_day(calendar, day_start, remaining);
    finish(start, minutes, Cursor::at(last_day, second), calendar)
}

/// Consume up to `remaining` seconds from the working intervals of one day,
/// starting at `from`. Returns the stopping second and what is left over.
pub(crate) fn consume_day(calendar: &WorkCalendar, from: i64, remaining: i64) -> (i64, i64) {
    let mut remaining = remaining;
    for (start, end) in calendar.segments() {
        if from >= end {
            continue;
        }
        let begin = from.max(start);
        let available = end - begin;
        if remaining <= available {
            return (begin + remaining, 0);
        }
        remaining -= available;
    }
    (i64::from(calendar.work_end().seconds_from_midnight()), remaining)
}

/// First work day strictly after `date`.
pub(crate) fn next_work_day(calendar: &WorkCalendar, date: NaiveDate) -> Option<NaiveDate> {
    (1..=7)
        .filter_map(|offset| date.checked_add_days(Days::new(offset)))
        .find(|candidate| calendar.is_work_day(*candidate))
}

/// Move forward `count` work days from the work day `date`.
fn skip_work_days(calendar: &WorkCalendar, date: NaiveDate, count: i64) -> Option<NaiveDate> {
    let per_week = i64::from(calendar.work_days().len());
    if per_week == 0 {
        return None;
    }
    let weeks = u64::try_from(count / per_week).ok()?;
    let mut date = date.checked_add_days(Days::new(weeks.checked_mul(7)?))?;
    for _ in 0..count % per_week {
        date = next_work_day(calendar, date)?;
    }
    Some(date)
}

fn finish(start: Timestamp, minutes: i64, cursor: Cursor, calendar: &WorkCalendar) -> DeadlineOutcome {
    match cursor.to_instant(calendar.timezone(), start) {
        Some(deadline) => DeadlineOutcome::complete(deadline),
        None => exhausted(start, minutes, Some(cursor), calendar),
    }
}

fn exhausted(
    start: Timestamp,
    minutes: i64,
    cursor: Option<Cursor>,
    calendar: &WorkCalendar,
) -> DeadlineOutcome {
    let deadline = cursor
        .and_then(|cursor| cursor.to_instant(calendar.timezone(), start))
        .unwrap_or(start);
    error!(
        %start,
        minutes,
        %deadline,
        timezone = %calendar.timezone(),
        "SLA deadline search exhausted; calendar misconfigured or budget out of range"
    );
    DeadlineOutcome {
        deadline,
        exhausted: true,
    }
}

/// Deadline calculator bound to one calendar.
#[derive(Clone, Debug, Default)]
pub struct DeadlineCalculator {
    calendar: WorkCalendar,
}

impl DeadlineCalculator {
    /// Create a calculator for a calendar.
    pub fn new(calendar: WorkCalendar) -> Self {
        Self { calendar }
    }

    /// The calendar in use.
    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Add a work-hour budget to `start`.
    pub fn add_work_hours(&self, start: Timestamp, hours: f64) -> Timestamp {
        add_work_hours(start, hours, &self.calendar)
    }

    /// Add whole work minutes to `start`.
    pub fn add_work_minutes(&self, start: Timestamp, minutes: i64) -> Timestamp {
        add_work_minutes(start, minutes, &self.calendar)
    }

    /// Add a work-hour budget, reporting exhaustion.
    pub fn compute(&self, start: Timestamp, hours: f64) -> DeadlineOutcome {
        compute_deadline(start, hours, &self.calendar)
    }

    /// Work minutes between two instants.
    pub fn work_minutes_between(&self, from: Timestamp, to: Timestamp) -> i64 {
        crate::deadline::elapsed::work_minutes_between(from, to, &self.calendar)
    }
}
