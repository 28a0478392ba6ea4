//! Business time elapsed between two instants.

use crate::calendar::WorkCalendar;
use crate::core::Timestamp;
use crate::deadline::cursor::{Cursor, SECONDS_PER_DAY};
use chrono::{Datelike, Days, NaiveDate, Offset, TimeZone};
use tracing::error;

/// Work minutes elapsed between `from` and `to`; zero when `to <= from`.
///
/// Partial minutes are truncated.
pub fn work_minutes_between(from: Timestamp, to: Timestamp, calendar: &WorkCalendar) -> i64 {
    work_seconds_between(from, to, calendar) / 60
}

/// Work seconds elapsed between `from` and `to`; zero when `to <= from`.
pub fn work_seconds_between(from: Timestamp, to: Timestamp, calendar: &WorkCalendar) -> i64 {
    if to <= from {
        return 0;
    }
    let tz = calendar.timezone();
    let (Some(first), Some(last)) = (Cursor::from_instant(from, tz), Cursor::from_instant(to, tz))
    else {
        error!(%from, %to, timezone = %tz, "Instant out of range for SLA calendar");
        return 0;
    };
    // A repeated hour can put `to` before `from` on the wall clock.
    let last = if last < first {
        match Cursor::with_offset(to, tz.offset_from_utc_datetime(&from.naive_utc()).fix()) {
            Some(cursor) => cursor,
            None => return 0,
        }
    } else {
        last
    };

    if first.date == last.date {
        return day_overlap(calendar, first.date, first.second, last.second);
    }

    let head = day_overlap(calendar, first.date, first.second, SECONDS_PER_DAY);
    let tail = day_overlap(calendar, last.date, 0, last.second);
    let middle = first
        .date
        .checked_add_days(Days::new(1))
        .map(|start| work_days_in(calendar, start, last.date) * calendar.daily_capacity_seconds())
        .unwrap_or(0);
    head + middle + tail
}

/// Working seconds of `date` that fall inside `[from, to)`.
fn day_overlap(calendar: &WorkCalendar, date: NaiveDate, from: i64, to: i64) -> i64 {
    if !calendar.is_work_day(date) {
        return 0;
    }
    calendar
        .segments()
        .iter()
        .map(|(start, end)| (to.min(*end) - from.max(*start)).max(0))
        .sum()
}

/// Number of work days in `[start, end)`.
fn work_days_in(calendar: &WorkCalendar, start: NaiveDate, end: NaiveDate) -> i64 {
    let span = (end - start).num_days();
    if span <= 0 {
        return 0;
    }
    let weeks = span / 7;
    let mut count = weeks * i64::from(calendar.work_days().len());
    let tail_start = start.num_days_from_ce() + (weeks * 7) as i32;
    for day in tail_start..end.num_days_from_ce() {
        if NaiveDate::from_num_days_from_ce_opt(day).is_some_and(|date| calendar.is_work_day(date)) {
            count += 1;
        }
    }
    count
}
