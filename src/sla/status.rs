//! Ticket statuses and SLA targets as seen by the engine.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ticket lifecycle status.
///
/// Only entry into and exit from [`TicketStatus::Waiting`] affect the SLA clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    /// Newly opened
    Open,
    /// Being worked on
    InProgress,
    /// Waiting on the requester; the SLA clock is paused
    Waiting,
    /// Resolved, pending closure
    Resolved,
    /// Closed
    Closed,
}

impl TicketStatus {
    /// True for the status that pauses the SLA clock.
    pub fn is_waiting(&self) -> bool {
        matches!(self, TicketStatus::Waiting)
    }

    /// True once the ticket needs no further work.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }

    /// Canonical snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::Open => "open",
            TicketStatus::InProgress => "in_progress",
            TicketStatus::Waiting => "waiting",
            TicketStatus::Resolved => "resolved",
            TicketStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "open" | "new" => Ok(TicketStatus::Open),
            "in_progress" | "inprogress" => Ok(TicketStatus::InProgress),
            "waiting" => Ok(TicketStatus::Waiting),
            "resolved" => Ok(TicketStatus::Resolved),
            "closed" => Ok(TicketStatus::Closed),
            _ => Err(Error::UnknownStatus(s.to_string())),
        }
    }
}

/// Which SLA deadline of a ticket is meant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SLATarget {
    /// First response
    Response,
    /// Resolution
    Resolution,
}

impl fmt::Display for SLATarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SLATarget::Response => write!(f, "response"),
            SLATarget::Resolution => write!(f, "resolution"),
        }
    }
}
