//! Calendar Module
//!
//! Business time definitions:
//! - Time of day and work day sets
//! - The validated work calendar
//! - Resolution from raw settings with per-field defaults

pub mod resolver;
pub mod time_of_day;
pub mod work_calendar;
pub mod work_days;

pub use resolver::{keys, resolve};
pub use time_of_day::TimeOfDay;
pub use work_calendar::{parse_timezone, WorkCalendar, DEFAULT_TIMEZONE};
pub use work_days::WorkDays;
