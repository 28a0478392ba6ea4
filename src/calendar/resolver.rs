//! Resolves raw settings into a [`WorkCalendar`].
//!
//! The resolver never fails. Each field that is missing or malformed is
//! replaced by its default on its own, so one bad value does not discard
//! the rest of the configuration.

use crate::calendar::time_of_day::TimeOfDay;
use crate::calendar::work_calendar::{
    parse_timezone, WorkCalendar, DEFAULT_LUNCH_END, DEFAULT_LUNCH_START, DEFAULT_TIMEZONE,
    DEFAULT_WORK_END, DEFAULT_WORK_START,
};
use crate::calendar::work_days::WorkDays;
use crate::core::Result;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Setting keys read from the hosting system's settings store.
pub mod keys {
    /// Start of the work window (`HH:MM`).
    pub const WORK_START: &str = "sla_work_start";
    /// End of the work window (`HH:MM`).
    pub const WORK_END: &str = "sla_work_end";
    /// Start of lunch (`HH:MM`).
    pub const LUNCH_START: &str = "sla_lunch_start";
    /// End of lunch (`HH:MM`).
    pub const LUNCH_END: &str = "sla_lunch_end";
    /// IANA timezone name.
    pub const TIMEZONE: &str = "sla_timezone";
    /// Serialized list of work day indices (0=Sunday).
    pub const WORK_DAYS: &str = "sla_work_days";
    /// Hours before a deadline at which a ticket counts as at risk.
    pub const AT_RISK_HOURS: &str = "sla_at_risk_hours";
}

/// Read one setting, falling back to `default` when absent or unparseable.
pub(crate) fn setting_or_default<T, F>(
    raw: &HashMap<String, String>,
    key: &str,
    default: T,
    parse: F,
) -> T
where
    T: std::fmt::Debug,
    F: FnOnce(&str) -> Result<T>,
{
    match raw.get(key) {
        None => {
            debug!(key, ?default, "SLA setting absent, using default");
            default
        }
        Some(value) => match parse(value) {
            Ok(parsed) => parsed,
            Err(error) => {
                warn!(key, value = %value, %error, ?default, "Malformed SLA setting, using default");
                default
            }
        },
    }
}

/// Build a business calendar from raw string settings.
pub fn resolve(raw: &HashMap<String, String>) -> WorkCalendar {
    let work_start = setting_or_default(raw, keys::WORK_START, DEFAULT_WORK_START, |v| v.parse());
    let work_end = setting_or_default(raw, keys::WORK_END, DEFAULT_WORK_END, |v| v.parse());
    let lunch_start = setting_or_default(raw, keys::LUNCH_START, DEFAULT_LUNCH_START, |v| v.parse());
    let lunch_end = setting_or_default(raw, keys::LUNCH_END, DEFAULT_LUNCH_END, |v| v.parse());
    let timezone = setting_or_default(raw, keys::TIMEZONE, DEFAULT_TIMEZONE, parse_timezone);
    let work_days = setting_or_default(raw, keys::WORK_DAYS, WorkDays::weekdays(), WorkDays::parse);

    build(work_start, work_end, lunch_start, lunch_end, timezone, work_days)
}

fn build(
    work_start: TimeOfDay,
    work_end: TimeOfDay,
    lunch_start: TimeOfDay,
    lunch_end: TimeOfDay,
    timezone: chrono_tz::Tz,
    work_days: WorkDays,
) -> WorkCalendar {
    match WorkCalendar::new(work_start, work_end, lunch_start, lunch_end, timezone, work_days) {
        Ok(calendar) => calendar,
        Err(error) => {
            warn!(%error, "Invalid SLA work window, using default {}-{}", DEFAULT_WORK_START, DEFAULT_WORK_END);
            WorkCalendar::new(
                DEFAULT_WORK_START,
                DEFAULT_WORK_END,
                lunch_start,
                lunch_end,
                timezone,
                work_days,
            )
            .or_else(|_| {
                WorkCalendar::new(
                    DEFAULT_WORK_START,
                    DEFAULT_WORK_END,
                    DEFAULT_LUNCH_START,
                    DEFAULT_LUNCH_END,
                    timezone,
                    work_days,
                )
            })
            .unwrap_or_default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_settings_give_default() {
        assert_eq!(resolve(&HashMap::new()), WorkCalendar::default());
    }

    #[test]
    fn test_full_settings() {
        let calendar = resolve(&settings(&[
            (keys::WORK_START, "08:30"),
            (keys::WORK_END, "17:00"),
            (keys::LUNCH_START, "12:30"),
            (keys::LUNCH_END, "13:30"),
            (keys::TIMEZONE, "America/Sao_Paulo"),
            (keys::WORK_DAYS, "[1,2,3,4,5,6]"),
        ]));

        assert_eq!(calendar.work_start().to_string(), "08:30");
        assert_eq!(calendar.work_end().to_string(), "17:00");
        assert_eq!(calendar.timezone(), chrono_tz::America::Sao_Paulo);
        assert_eq!(calendar.work_days().len(), 6);
        assert_eq!(calendar.daily_capacity_minutes(), 7 * 60 + 30);
    }

    #[test]
    fn test_field_level_fallback() {
        let calendar = resolve(&settings(&[
            (keys::WORK_START, "eight"),
            (keys::WORK_END, "17:00"),
            (keys::TIMEZONE, "Nowhere/Special"),
            (keys::WORK_DAYS, "[1,2,oops]"),
        ]));

        assert_eq!(calendar.work_start(), DEFAULT_WORK_START);
        assert_eq!(calendar.work_end().to_string(), "17:00");
        assert_eq!(calendar.timezone(), DEFAULT_TIMEZONE);
        assert_eq!(calendar.work_days(), WorkDays::weekdays());
    }

    #[test]
    fn test_empty_work_days_fall_back() {
        let calendar = resolve(&settings(&[(keys::WORK_DAYS, "[]")]));
        assert_eq!(calendar.work_days(), WorkDays::weekdays());
    }

    #[test]
    fn test_inverted_window_falls_back_keeping_other_fields() {
        let calendar = resolve(&settings(&[
            (keys::WORK_START, "18:00"),
            (keys::WORK_END, "09:00"),
            (keys::TIMEZONE, "Europe/Madrid"),
        ]));

        assert_eq!(calendar.work_start(), DEFAULT_WORK_START);
        assert_eq!(calendar.work_end(), DEFAULT_WORK_END);
        assert_eq!(calendar.timezone(), chrono_tz::Europe::Madrid);
        assert!(calendar.lunch_applies());
    }

    #[test]
    fn test_lunch_swallowing_window_falls_back() {
        let calendar = resolve(&settings(&[
            (keys::WORK_START, "12:00"),
            (keys::WORK_END, "13:00"),
        ]));

        assert!(calendar.daily_capacity_minutes() > 0);
        assert_eq!(calendar.work_start(), DEFAULT_WORK_START);
    }

    #[test]
    fn test_uncontained_lunch_is_kept_but_ignored() {
        let calendar = resolve(&settings(&[
            (keys::LUNCH_START, "08:00"),
            (keys::LUNCH_END, "09:30"),
        ]));

        assert_eq!(calendar.lunch_start().to_string(), "08:00");
        assert!(!calendar.lunch_applies());
        assert_eq!(calendar.daily_capacity_minutes(), 9 * 60);
    }
}
