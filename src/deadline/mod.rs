//! Deadline Module
//!
//! Converts work-hour budgets into absolute deadlines:
//! - Cursor transitions over the business calendar
//! - Deadline calculation with whole-day skipping
//! - Business time elapsed between instants

pub mod calculator;
pub mod cursor;
pub mod elapsed;

pub use calculator::{
    add_work_hours, add_work_minutes, compute_deadline, hours_to_minutes, DeadlineCalculator,
    DeadlineOutcome,
};
pub use cursor::{classify, is_working_time, Transition};
pub use elapsed::{work_minutes_between, work_seconds_between};
