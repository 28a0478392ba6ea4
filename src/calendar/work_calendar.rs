//! Business calendar value object.

use crate::calendar::time_of_day::TimeOfDay;
use crate::calendar::work_days::WorkDays;
use crate::core::{Error, Result};
use chrono::{Datelike, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Default timezone for business time.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Lisbon;
/// Default start of the working day.
pub const DEFAULT_WORK_START: TimeOfDay = TimeOfDay::from_hm(9, 0);
/// Default end of the working day.
pub const DEFAULT_WORK_END: TimeOfDay = TimeOfDay::from_hm(18, 0);
/// Default start of lunch.
pub const DEFAULT_LUNCH_START: TimeOfDay = TimeOfDay::from_hm(12, 0);
/// Default end of lunch.
pub const DEFAULT_LUNCH_END: TimeOfDay = TimeOfDay::from_hm(13, 0);

/// A validated business calendar.
///
/// Invariants, enforced by [`WorkCalendar::new`]:
/// - `work_end > work_start`
/// - daily capacity (window minus applicable lunch) is positive
/// - at least one weekday is a work day
///
/// Lunch is kept as configured but only subtracted when it lies fully
/// inside the work window.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarRecord", into = "CalendarRecord")]
pub struct WorkCalendar {
    work_start: TimeOfDay,
    work_end: TimeOfDay,
    lunch_start: TimeOfDay,
    lunch_end: TimeOfDay,
    timezone: Tz,
    work_days: WorkDays,
}

impl WorkCalendar {
    /// Create a validated calendar.
    pub fn new(
        work_start: TimeOfDay,
        work_end: TimeOfDay,
        lunch_start: TimeOfDay,
        lunch_end: TimeOfDay,
        timezone: Tz,
        work_days: WorkDays,
    ) -> Result<Self> {
        if work_end <= work_start {
            return Err(Error::InvalidCalendar(format!(
                "work window {work_start}-{work_end} is empty"
            )));
        }
        if work_days.is_empty() {
            return Err(Error::InvalidCalendar("no work days".to_string()));
        }

        let calendar = Self {
            work_start,
            work_end,
            lunch_start,
            lunch_end,
            timezone,
            work_days,
        };
        if calendar.daily_capacity_seconds() <= 0 {
            return Err(Error::InvalidCalendar(format!(
                "lunch {lunch_start}-{lunch_end} leaves no working time in {work_start}-{work_end}"
            )));
        }
        Ok(calendar)
    }

    /// Start of the work window.
    pub fn work_start(&self) -> TimeOfDay {
        self.work_start
    }

    /// End of the work window.
    pub fn work_end(&self) -> TimeOfDay {
        self.work_end
    }

    /// Configured lunch start.
    pub fn lunch_start(&self) -> TimeOfDay {
        self.lunch_start
    }

    /// Configured lunch end.
    pub fn lunch_end(&self) -> TimeOfDay {
        self.lunch_end
    }

    /// Timezone used to read local hour, minute and weekday.
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Business weekdays.
    pub fn work_days(&self) -> WorkDays {
        self.work_days
    }

    /// True when lunch lies fully inside the work window and is non-empty.
    pub fn lunch_applies(&self) -> bool {
        self.lunch_start >= self.work_start
            && self.lunch_end <= self.work_end
            && self.lunch_end > self.lunch_start
    }

    /// Working seconds per business day.
    pub fn daily_capacity_seconds(&self) -> i64 {
        let window =
            i64::from(self.work_end.seconds_from_midnight()) - i64::from(self.work_start.seconds_from_midnight());
        let lunch = if self.lunch_applies() {
            i64::from(self.lunch_end.seconds_from_midnight())
                - i64::from(self.lunch_start.seconds_from_midnight())
        } else {
            0
        };
        window - lunch
    }

    /// Working minutes per business day.
    pub fn daily_capacity_minutes(&self) -> i64 {
        self.daily_capacity_seconds() / 60
    }

    /// Working minutes per calendar week.
    pub fn weekly_capacity_minutes(&self) -> i64 {
        self.daily_capacity_minutes() * i64::from(self.work_days.len())
    }

    /// Check whether a local date is a business day.
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days.contains(date.weekday())
    }

    /// Working intervals of a business day, as seconds from local midnight.
    ///
    /// Without lunch the second interval is empty.
    pub(crate) fn segments(&self) -> [(i64, i64); 2] {
        let start = i64::from(self.work_start.seconds_from_midnight());
        let end = i64::from(self.work_end.seconds_from_midnight());
        if self.lunch_applies() {
            [
                (start, i64::from(self.lunch_start.seconds_from_midnight())),
                (i64::from(self.lunch_end.seconds_from_midnight()), end),
            ]
        } else {
            [(start, end), (end, end)]
        }
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self {
            work_start: DEFAULT_WORK_START,
            work_end: DEFAULT_WORK_END,
            lunch_start: DEFAULT_LUNCH_START,
            lunch_end: DEFAULT_LUNCH_END,
            timezone: DEFAULT_TIMEZONE,
            work_days: WorkDays::weekdays(),
        }
    }
}

/// Serialized form of a [`WorkCalendar`]; validated when converted back.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CalendarRecord {
    /// Start of the work window
    pub work_start: TimeOfDay,
    /// End of the work window
    pub work_end: TimeOfDay,
    /// Lunch start
    pub lunch_start: TimeOfDay,
    /// Lunch end
    pub lunch_end: TimeOfDay,
    /// IANA timezone
    pub timezone: Tz,
    /// Business weekdays
    pub work_days: WorkDays,
}

impl TryFrom<CalendarRecord> for WorkCalendar {
    type Error = Error;

    fn try_from(r: CalendarRecord) -> Result<Self> {
        WorkCalendar::new(
            r.work_start,
            r.work_end,
            r.lunch_start,
            r.lunch_end,
            r.timezone,
            r.work_days,
        )
    }
}

impl From<WorkCalendar> for CalendarRecord {
    fn from(c: WorkCalendar) -> Self {
        Self {
            work_start: c.work_start,
            work_end: c.work_end,
            lunch_start: c.lunch_start,
            lunch_end: c.lunch_end,
            timezone: c.timezone,
            work_days: c.work_days,
        }
    }
}

/// Parse an IANA timezone name.
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| Error::InvalidTimezone(name.to_string()))
}
