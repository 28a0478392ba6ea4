//! Per-ticket SLA clock with pause/resume.
//!
//! Deadlines are anchored once from the business calendar. Pausing freezes
//! them; resuming shifts both by the literal wall-clock time spent paused,
//! without consulting the calendar again.

use crate::calendar::WorkCalendar;
use crate::core::Timestamp;
use crate::deadline::add_work_hours;
use crate::sla::status::{SLATarget, TicketStatus};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Work-hour budgets for a ticket's two SLA targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SLABudget {
    /// First-response budget in work hours
    pub response_hours: Option<f64>,
    /// Resolution budget in work hours
    pub resolution_hours: Option<f64>,
}

impl SLABudget {
    /// Create a budget with both targets.
    pub fn new(response_hours: f64, resolution_hours: f64) -> Self {
        Self {
            response_hours: Some(response_hours),
            resolution_hours: Some(resolution_hours),
        }
    }
}

/// Outcome of a clock operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockTransition {
    /// The clock was running and is now paused
    Paused,
    /// Pause requested on an already paused clock
    AlreadyPaused,
    /// The clock was paused and is running again
    Resumed {
        /// Whole seconds added to the accumulated pause
        elapsed_seconds: u64,
    },
    /// Resume requested on a running clock
    NotPaused,
    /// The status change does not touch the clock
    Unchanged,
}

/// SLA clock state stored on a ticket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SLAClock {
    /// First-response deadline
    pub response_deadline: Option<Timestamp>,
    /// Resolution deadline
    pub resolution_deadline: Option<Timestamp>,
    /// When the current pause began; `None` while running
    pub paused_at: Option<Timestamp>,
    /// Total seconds of all completed pauses
    pub accumulated_pause_seconds: u64,
}

impl SLAClock {
    /// Create a running clock with the given deadlines.
    pub fn with_deadlines(
        response_deadline: Option<Timestamp>,
        resolution_deadline: Option<Timestamp>,
    ) -> Self {
        Self {
            response_deadline,
            resolution_deadline,
            ..Default::default()
        }
    }

    /// Seed both deadlines at ticket creation.
    pub fn start(created_at: Timestamp, budget: &SLABudget, calendar: &WorkCalendar) -> Self {
        let deadline = |hours: Option<f64>| hours.map(|h| add_work_hours(created_at, h, calendar));
        Self::with_deadlines(deadline(budget.response_hours), deadline(budget.resolution_hours))
    }

    /// Deadline for a target.
    pub fn deadline(&self, target: SLATarget) -> Option<Timestamp> {
        match target {
            SLATarget::Response => self.response_deadline,
            SLATarget::Resolution => self.resolution_deadline,
        }
    }

    /// True while paused.
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Pause the clock. No-op when already paused.
    pub fn pause(&mut self, now: Timestamp) -> ClockTransition {
        if self.is_paused() {
            return ClockTransition::AlreadyPaused;
        }
        self.paused_at = Some(now);
        debug!(%now, "SLA clock paused");
        ClockTransition::Paused
    }

    /// Resume the clock, shifting both deadlines by the paused time.
    /// No-op when running.
    pub fn resume(&mut self, now: Timestamp) -> ClockTransition {
        let Some(paused_at) = self.paused_at.take() else {
            return ClockTransition::NotPaused;
        };

        let elapsed = pause_length(paused_at, now);
        let elapsed_seconds = u64::try_from(elapsed.num_seconds()).unwrap_or(0);
        self.accumulated_pause_seconds = self.accumulated_pause_seconds.saturating_add(elapsed_seconds);
        self.response_deadline = self.response_deadline.map(|d| shift(d, elapsed));
        self.resolution_deadline = self.resolution_deadline.map(|d| shift(d, elapsed));

        debug!(
            %paused_at,
            %now,
            elapsed_seconds,
            accumulated = self.accumulated_pause_seconds,
            "SLA clock resumed"
        );
        ClockTransition::Resumed { elapsed_seconds }
    }

    /// Apply a ticket status change: entering waiting pauses, leaving it resumes.
    pub fn apply_transition(
        &mut self,
        from: TicketStatus,
        to: TicketStatus,
        at: Timestamp,
    ) -> ClockTransition {
        match (from.is_waiting(), to.is_waiting()) {
            (false, true) => self.pause(at),
            (true, false) => self.resume(at),
            _ => ClockTransition::Unchanged,
        }
    }

    /// Seconds spent in the current pause, zero while running.
    pub fn current_pause_seconds(&self, now: Timestamp) -> u64 {
        self.paused_at
            .map(|paused_at| u64::try_from(pause_length(paused_at, now).num_seconds()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Completed pauses plus the current one.
    pub fn total_pause_seconds(&self, now: Timestamp) -> u64 {
        self.accumulated_pause_seconds
            .saturating_add(self.current_pause_seconds(now))
    }
}

/// Pure form of [`SLAClock::pause`].
pub fn pause(clock: &SLAClock, now: Timestamp) -> SLAClock {
    let mut next = *clock;
    next.pause(now);
    next
}

/// Pure form of [`SLAClock::resume`].
pub fn resume(clock: &SLAClock, now: Timestamp) -> SLAClock {
    let mut next = *clock;
    next.resume(now);
    next
}

/// Length of a pause, clamped to zero under clock skew.
fn pause_length(paused_at: Timestamp, now: Timestamp) -> Duration {
    let elapsed = now - paused_at;
    if elapsed < Duration::zero() {
        warn!(%paused_at, %now, "Negative SLA pause clamped to zero");
        return Duration::zero();
    }
    elapsed
}

fn shift(deadline: Timestamp, elapsed: Duration) -> Timestamp {
    deadline.checked_add_signed(elapsed).unwrap_or(deadline)
}
