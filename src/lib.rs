//! # ticketsla - SLA deadline engine for ticketing
//!
//! Pure calculation components a ticket service calls:
//! - **Calendar**: business calendar resolved from raw settings
//! - **Deadline**: work-hour budgets turned into absolute deadlines
//! - **SLA**: per-ticket clock with pause/resume, breach evaluation, reporting
//!
//! Wall-clock time is always injected by the caller.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::collections::HashMap;
//! use chrono::{TimeZone, Utc};
//! use ticketsla::calendar::resolve;
//! use ticketsla::sla::{BreachEvaluator, SLABudget, SLAClock, SLAState, SLATarget};
//!
//! let calendar = resolve(&HashMap::new());
//! let created = Utc.with_ymd_and_hms(2024, 3, 15, 17, 0, 0).unwrap();
//! let mut clock = SLAClock::start(created, &SLABudget::new(8.0, 48.0), &calendar);
//!
//! clock.pause(Utc.with_ymd_and_hms(2024, 3, 15, 17, 30, 0).unwrap());
//! clock.resume(Utc.with_ymd_and_hms(2024, 3, 18, 9, 0, 0).unwrap());
//!
//! let standing = BreachEvaluator::default()
//!     .status(&clock, SLATarget::Response, Utc.with_ymd_and_hms(2024, 3, 18, 9, 0, 0).unwrap());
//! assert_eq!(standing.state, SLAState::OnTrack);
//! ```

pub mod calendar;
pub mod core;
pub mod deadline;
pub mod monitoring;
pub mod sla;

pub use calendar::{resolve, WorkCalendar};
pub use core::error::{Error, Result};
pub use deadline::add_work_hours;
pub use sla::{pause, resume, status, SLAClock};
