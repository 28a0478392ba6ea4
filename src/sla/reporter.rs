//! SLA reporting.
//!
//! Aggregates the standing of many tickets into a summary.

use crate::core::Timestamp;
use crate::sla::clock::SLAClock;
use crate::sla::evaluator::{BreachEvaluator, SLAState};
use crate::sla::status::SLATarget;
use serde::{Deserialize, Serialize};

/// A ticket past its deadline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverdueTicket {
    /// Ticket ID
    pub ticket_id: String,
    /// Hours past the deadline
    pub hours_overdue: f64,
}

/// Aggregated SLA standing for one target.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SLASummary {
    /// Target summarized
    pub target: SLATarget,
    /// Evaluation instant
    pub evaluated_at: Timestamp,
    /// Tickets considered
    pub total: usize,
    /// On track
    pub on_track: usize,
    /// At risk
    pub at_risk: usize,
    /// Breached
    pub breached: usize,
    /// Without a deadline
    pub no_sla: usize,
    /// Paused at evaluation time
    pub paused: usize,
    /// Breached tickets, most overdue first
    pub overdue: Vec<OverdueTicket>,
}

impl SLASummary {
    /// Percentage of tickets with a deadline that are not breached.
    pub fn compliance_rate(&self) -> Option<f64> {
        let measured = self.total - self.no_sla;
        if measured == 0 {
            return None;
        }
        Some((measured - self.breached) as f64 / measured as f64 * 100.0)
    }
}

/// SLA reporter.
#[derive(Clone, Debug)]
pub struct SLAReporter {
    /// Evaluator used for every ticket
    evaluator: BreachEvaluator,
}

impl SLAReporter {
    /// Create a new reporter.
    pub fn new(evaluator: BreachEvaluator) -> Self {
        Self { evaluator }
    }

    /// The evaluator in use.
    pub fn evaluator(&self) -> &BreachEvaluator {
        &self.evaluator
    }

    /// Summarize a set of tickets for one target.
    pub fn summarize<'a, I>(&self, tickets: I, target: SLATarget, now: Timestamp) -> SLASummary
    where
        I: IntoIterator<Item = (&'a str, &'a SLAClock)>,
    {
        let mut summary = SLASummary {
            target,
            evaluated_at: now,
            total: 0,
            on_track: 0,
            at_risk: 0,
            breached: 0,
            no_sla: 0,
            paused: 0,
            overdue: Vec::new(),
        };

        for (ticket_id, clock) in tickets {
            let standing = self.evaluator.status(clock, target, now);
            summary.total += 1;
            if standing.paused {
                summary.paused += 1;
            }
            match standing.state {
                SLAState::OnTrack => summary.on_track += 1,
                SLAState::AtRisk => summary.at_risk += 1,
                SLAState::NoSLA => summary.no_sla += 1,
                SLAState::Breached => {
                    summary.breached += 1;
                    summary.overdue.push(OverdueTicket {
                        ticket_id: ticket_id.to_string(),
                        hours_overdue: -standing.hours_remaining.unwrap_or(0.0),
                    });
                }
            }
        }

        summary.overdue.sort_by(|a, b| {
            b.hours_overdue
                .total_cmp(&a.hours_overdue)
                .then_with(|| a.ticket_id.cmp(&b.ticket_id))
        });

        summary
    }

    /// Render a summary as JSON.
    pub fn to_json(summary: &SLASummary) -> String {
        serde_json::to_string_pretty(summary).unwrap_or_default()
    }

    /// Render a summary as text.
    pub fn to_text(summary: &SLASummary) -> String {
        let mut output = String::new();

        output.push_str(&format!("SLA Summary: {}\n", summary.target));
        output.push_str(&format!("Evaluated: {}\n", summary.evaluated_at));
        output.push_str(&format!("Tickets: {}\n", summary.total));
        output.push_str(&format!(
            "  on track: {}  at risk: {}  breached: {}  no SLA: {}  paused: {}\n",
            summary.on_track, summary.at_risk, summary.breached, summary.no_sla, summary.paused
        ));

        if let Some(rate) = summary.compliance_rate() {
            output.push_str(&format!("Compliance: {rate:.1}%\n"));
        }

        if !summary.overdue.is_empty() {
            output.push_str("\nOverdue:\n");
            for ticket in &summary.overdue {
                output.push_str(&format!("  {} ({:.1}h)\n", ticket.ticket_id, ticket.hours_overdue));
            }
        }

        output
    }
}

impl Default for SLAReporter {
    fn default() -> Self {
        Self::new(BreachEvaluator::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sla::clock::pause;
    use crate::sla::evaluator::BreachPolicy;
    use chrono::{TimeZone, Utc};

    fn utc(d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, d, h, 0, 0).unwrap()
    }

    fn resolution_due(d: u32, h: u32) -> SLAClock {
        SLAClock::with_deadlines(None, Some(utc(d, h)))
    }

    #[test]
    fn test_reporter_creation() {
        let reporter = SLAReporter::default();
        assert_eq!(reporter.evaluator().policy(), &BreachPolicy::default());
    }

    #[test]
    fn test_summarize_counts() {
        let reporter = SLAReporter::default();
        let on_track = resolution_due(20, 12);
        let at_risk = resolution_due(18, 14);
        let late = resolution_due(18, 6);
        let later = resolution_due(17, 12);
        let frozen = pause(&resolution_due(18, 11), utc(17, 0));
        let none = SLAClock::default();

        let tickets = [
            ("T-1", &on_track),
            ("T-2", &at_risk),
            ("T-3", &late),
            ("T-4", &later),
            ("T-5", &frozen),
            ("T-6", &none),
        ];
        let summary = reporter.summarize(tickets, SLATarget::Resolution, utc(18, 10));

        assert_eq!(summary.total, 6);
        assert_eq!(summary.on_track, 2);
        assert_eq!(summary.at_risk, 1);
        assert_eq!(summary.breached, 2);
        assert_eq!(summary.no_sla, 1);
        assert_eq!(summary.paused, 1);
        assert_eq!(summary.overdue[0].ticket_id, "T-4");
        assert_eq!(summary.overdue[0].hours_overdue, 22.0);
        assert_eq!(summary.overdue[1].ticket_id, "T-3");
        assert_eq!(summary.compliance_rate(), Some(60.0));

        // Summarizing has no side effects on the reporter.
        let again = reporter.summarize(tickets, SLATarget::Resolution, utc(18, 10));
        assert_eq!(again, summary);
    }

    #[test]
    fn test_empty_summary_has_no_rate() {
        let reporter = SLAReporter::default();
        let summary = reporter.summarize(Vec::<(&str, &SLAClock)>::new(), SLATarget::Response, utc(18, 10));
        assert_eq!(summary.total, 0);
        assert_eq!(summary.compliance_rate(), None);
    }

    #[test]
    fn test_summary_formats() {
        let reporter = SLAReporter::default();
        let late = resolution_due(18, 6);
        let summary = reporter.summarize([("T-9", &late)], SLATarget::Resolution, utc(18, 10));

        let json = SLAReporter::to_json(&summary);
        assert!(json.contains("T-9"));
        assert!(json.contains("\"resolution\""));

        let text = SLAReporter::to_text(&summary);
        assert!(text.contains("SLA Summary: resolution"));
        assert!(text.contains("T-9 (4.0h)"));
        assert!(text.contains("Compliance: 0.0%"));
    }
}
