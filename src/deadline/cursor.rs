//! Calendar cursor and its boundary transitions.
//!
//! A cursor is a local civil position (date plus second of day) in the
//! calendar's timezone. Each transition moves it to the next boundary that
//! matters to the calendar, until it rests inside a working interval.

use crate::calendar::WorkCalendar;
use crate::core::Timestamp;
use chrono::{
    Days, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::error;

/// Seconds in a civil day.
pub(crate) const SECONDS_PER_DAY: i64 = 86_400;

/// Upper bound on transitions needed to reach a working interval.
///
/// One after-work hop, at most six non-work days, then lunch.
const MAX_SETTLE_STEPS: usize = 16;

/// Where a local position sits relative to the business calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// The local weekday is not a work day; move to next day's work start.
    NonWorkDay,
    /// Before the work window; move to work start the same day.
    BeforeWork,
    /// At or after the work window end; move to next day's work start.
    AfterWork,
    /// Inside an applicable lunch; move to lunch end.
    Lunch,
    /// Inside a working interval; time can be consumed here.
    InWindow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Cursor {
    pub(crate) date: NaiveDate,
    pub(crate) second: i64,
}

impl Cursor {
    /// Convert an instant to a local cursor, dropping sub-second precision.
    ///
    /// `None` when the local time falls outside chrono's date range.
    pub(crate) fn from_instant(at: Timestamp, tz: Tz) -> Option<Self> {
        Self::with_offset(at, tz.offset_from_utc_datetime(&at.naive_utc()).fix())
    }

    /// Read an instant with a fixed UTC offset instead of the zone's rules.
    pub(crate) fn with_offset(at: Timestamp, offset: FixedOffset) -> Option<Self> {
        let local = at.naive_utc().checked_add_offset(offset)?;
        Some(Self {
            date: local.date(),
            second: i64::from(local.time().num_seconds_from_midnight()),
        })
    }

    pub(crate) fn at(date: NaiveDate, second: i64) -> Self {
        Self { date, second }
    }

    /// Convert back to an absolute instant, never earlier than `not_before`.
    ///
    /// In a repeated hour the earlier instant is used unless it precedes
    /// `not_before`. Local times inside a DST gap are shifted forward by the
    /// gap length.
    pub(crate) fn to_instant(self, tz: Tz, not_before: Timestamp) -> Option<Timestamp> {
        let (date, second) = if self.second >= SECONDS_PER_DAY {
            (self.date.checked_add_days(Days::new(1))?, self.second - SECONDS_PER_DAY)
        } else {
            (self.date, self.second)
        };
        let time = NaiveTime::from_num_seconds_from_midnight_opt(u32::try_from(second).ok()?, 0)?;
        let resolved = resolve_local(tz, date.and_time(time), not_before)?;
        Some(resolved.max(not_before))
    }

    /// Classify this position against the calendar.
    pub(crate) fn classify(&self, calendar: &WorkCalendar) -> Transition {
        let work_start = i64::from(calendar.work_start().seconds_from_midnight());
        let work_end = i64::from(calendar.work_end().seconds_from_midnight());

        if !calendar.is_work_day(self.date) {
            Transition::NonWorkDay
        } else if self.second < work_start {
            Transition::BeforeWork
        } else if self.second >= work_end {
            Transition::AfterWork
        } else if calendar.lunch_applies()
            && self.second >= i64::from(calendar.lunch_start().seconds_from_midnight())
            && self.second < i64::from(calendar.lunch_end().seconds_from_midnight())
        {
            Transition::Lunch
        } else {
            Transition::InWindow
        }
    }

    /// Apply one transition. `None` only if the date leaves chrono's range.
    pub(crate) fn apply(self, transition: Transition, calendar: &WorkCalendar) -> Option<Self> {
        let work_start = i64::from(calendar.work_start().seconds_from_midnight());
        match transition {
            Transition::NonWorkDay | Transition::AfterWork => Some(Self::at(
                self.date.checked_add_days(Days::new(1))?,
                work_start,
            )),
            Transition::BeforeWork => Some(Self::at(self.date, work_start)),
            Transition::Lunch => Some(Self::at(
                self.date,
                i64::from(calendar.lunch_end().seconds_from_midnight()),
            )),
            Transition::InWindow => Some(self),
        }
    }

    /// Advance through transitions until the cursor is inside a working interval.
    pub(crate) fn settle(self, calendar: &WorkCalendar) -> Option<Self> {
        let mut cursor = self;
        for _ in 0..MAX_SETTLE_STEPS {
            match cursor.classify(calendar) {
                Transition::InWindow => return Some(cursor),
                transition => cursor = cursor.apply(transition, calendar)?,
            }
        }
        None
    }
}

/// Classify an instant against a calendar.
///
/// `None` when the instant cannot be expressed in the calendar's local time.
pub fn classify(at: Timestamp, calendar: &WorkCalendar) -> Option<Transition> {
    let Some(cursor) = Cursor::from_instant(at, calendar.timezone()) else {
        error!(%at, timezone = %calendar.timezone(), "Instant out of range for SLA calendar");
        return None;
    };
    Some(cursor.classify(calendar))
}

/// True when the instant falls inside working time.
pub fn is_working_time(at: Timestamp, calendar: &WorkCalendar) -> bool {
    classify(at, calendar) == Some(Transition::InWindow)
}

fn resolve_local(tz: Tz, local: NaiveDateTime, not_before: Timestamp) -> Option<Timestamp> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(resolved) => Some(resolved.with_timezone(&Utc)),
        LocalResult::Ambiguous(earlier, later) => {
            let earlier = earlier.with_timezone(&Utc);
            if earlier >= not_before {
                Some(earlier)
            } else {
                Some(later.with_timezone(&Utc))
            }
        }
        LocalResult::None => {
            // Inside a gap: read the wall time with the offset in force before it.
            let offset = local
                .checked_sub_signed(chrono::Duration::hours(6))
                .and_then(|before| tz.from_local_datetime(&before).earliest())
                .map(|before| before.offset().fix())
                .unwrap_or_else(|| tz.offset_from_utc_datetime(&local).fix());
            Some(Utc.from_utc_datetime(&local.checked_sub_offset(offset)?))
        }
    }
}
