//! Breach evaluation.
//!
//! Classifies a deadline as on track, at risk or breached. While a clock is
//! paused, time is read as frozen at the moment of the pause.

use crate::calendar::keys;
use crate::calendar::resolver::setting_or_default;
use crate::core::{seconds_to_hours, Error, Result, Timestamp};
use crate::sla::clock::SLAClock;
use crate::sla::status::SLATarget;
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default at-risk window in hours.
pub const DEFAULT_AT_RISK_HOURS: f64 = 8.0;

/// Risk policy supplied by the hosting system.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BreachPolicy {
    /// Hours before a deadline at which a ticket counts as at risk
    pub at_risk_threshold_hours: f64,
}

impl BreachPolicy {
    /// Create a policy. Negative or non-finite thresholds become zero.
    pub fn new(at_risk_threshold_hours: f64) -> Self {
        let hours = if at_risk_threshold_hours.is_finite() {
            at_risk_threshold_hours.max(0.0)
        } else {
            0.0
        };
        Self {
            at_risk_threshold_hours: hours,
        }
    }

    /// Read the policy from raw settings, defaulting on bad input.
    pub fn from_settings(raw: &HashMap<String, String>) -> Self {
        let hours = setting_or_default(raw, keys::AT_RISK_HOURS, DEFAULT_AT_RISK_HOURS, parse_hours);
        Self::new(hours)
    }

    /// The at-risk window as a duration.
    pub fn threshold(&self) -> Duration {
        Duration::milliseconds((self.at_risk_threshold_hours * 3_600_000.0).round() as i64)
    }
}

impl Default for BreachPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AT_RISK_HOURS)
    }
}

fn parse_hours(raw: &str) -> Result<f64> {
    let invalid = |reason: &str| Error::InvalidSetting {
        key: keys::AT_RISK_HOURS.to_string(),
        reason: format!("{reason}: {raw}"),
    };
    let hours: f64 = raw.trim().parse().map_err(|_| invalid("not a number"))?;
    if !hours.is_finite() || hours < 0.0 {
        return Err(invalid("must be a non-negative number"));
    }
    Ok(hours)
}

/// SLA standing of one deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SLAState {
    /// More than the at-risk window remains
    OnTrack,
    /// Inside the at-risk window
    AtRisk,
    /// Deadline reached or passed
    Breached,
    /// No deadline set
    #[serde(rename = "no_sla")]
    NoSLA,
}

/// Evaluation result for one target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SLAStanding {
    /// Evaluated target
    pub target: SLATarget,
    /// Classification
    pub state: SLAState,
    /// Deadline compared against
    pub deadline: Option<Timestamp>,
    /// Hours left; negative when overdue, `None` without a deadline
    pub hours_remaining: Option<f64>,
    /// Whether the clock was paused at evaluation
    pub paused: bool,
}

impl SLAStanding {
    /// True when breached.
    pub fn is_breached(&self) -> bool {
        self.state == SLAState::Breached
    }
}

/// The instant a clock is evaluated at: the pause start while paused.
pub fn effective_now(clock: &SLAClock, now: Timestamp) -> Timestamp {
    clock.paused_at.unwrap_or(now)
}

/// Evaluate one target of a clock.
pub fn status(clock: &SLAClock, target: SLATarget, now: Timestamp, policy: &BreachPolicy) -> SLAStanding {
    let paused = clock.is_paused();
    let Some(deadline) = clock.deadline(target) else {
        return SLAStanding {
            target,
            state: SLAState::NoSLA,
            deadline: None,
            hours_remaining: None,
            paused,
        };
    };

    let remaining = deadline - effective_now(clock, now);
    let state = if remaining <= Duration::zero() {
        SLAState::Breached
    } else if remaining < policy.threshold() {
        SLAState::AtRisk
    } else {
        SLAState::OnTrack
    };

    SLAStanding {
        target,
        state,
        deadline: Some(deadline),
        hours_remaining: Some(seconds_to_hours(remaining.num_seconds())),
        paused,
    }
}

/// Evaluator bound to a risk policy.
#[derive(Clone, Debug, Default)]
pub struct BreachEvaluator {
    policy: BreachPolicy,
}

impl BreachEvaluator {
    /// Create an evaluator.
    pub fn new(policy: BreachPolicy) -> Self {
        Self { policy }
    }

    /// The policy in use.
    pub fn policy(&self) -> &BreachPolicy {
        &self.policy
    }

    /// Evaluate one target.
    pub fn status(&self, clock: &SLAClock, target: SLATarget, now: Timestamp) -> SLAStanding {
        status(clock, target, now, &self.policy)
    }

    /// Evaluate response and resolution, in that order.
    pub fn evaluate_all(&self, clock: &SLAClock, now: Timestamp) -> [SLAStanding; 2] {
        [
            self.status(clock, SLATarget::Response, now),
            self.status(clock, SLATarget::Resolution, now),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sla::clock::pause;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn clock() -> SLAClock {
        SLAClock::with_deadlines(Some(utc(2024, 3, 18, 12, 0)), Some(utc(2024, 3, 22, 12, 0)))
    }

    #[test]
    fn test_on_track_at_risk_breached() {
        let evaluator = BreachEvaluator::default();
        let c = clock();

        let standing = evaluator.status(&c, SLATarget::Response, utc(2024, 3, 18, 2, 0));
        assert_eq!(standing.state, SLAState::OnTrack);
        assert_eq!(standing.hours_remaining, Some(10.0));

        let standing = evaluator.status(&c, SLATarget::Response, utc(2024, 3, 18, 4, 30));
        assert_eq!(standing.state, SLAState::AtRisk);

        let standing = evaluator.status(&c, SLATarget::Response, utc(2024, 3, 18, 12, 0));
        assert_eq!(standing.state, SLAState::Breached);
        assert_eq!(standing.hours_remaining, Some(0.0));

        let standing = evaluator.status(&c, SLATarget::Response, utc(2024, 3, 18, 15, 0));
        assert!(standing.is_breached());
        assert_eq!(standing.hours_remaining, Some(-3.0));
    }

    #[test]
    fn test_threshold_boundary() {
        let evaluator = BreachEvaluator::default();
        let c = clock();
        // Exactly eight hours left is not yet at risk.
        let standing = evaluator.status(&c, SLATarget::Response, utc(2024, 3, 18, 4, 0));
        assert_eq!(standing.state, SLAState::OnTrack);
    }

    #[test]
    fn test_missing_deadline_is_no_sla() {
        let evaluator = BreachEvaluator::default();
        let c = SLAClock::default();
        let standing = evaluator.status(&c, SLATarget::Resolution, utc(2024, 3, 18, 4, 0));
        assert_eq!(standing.state, SLAState::NoSLA);
        assert!(standing.deadline.is_none());
        assert!(standing.hours_remaining.is_none());
    }

    #[test]
    fn test_state_serialized_names() {
        assert_eq!(serde_json::to_string(&SLAState::NoSLA).unwrap(), "\"no_sla\"");
        assert_eq!(serde_json::to_string(&SLAState::AtRisk).unwrap(), "\"at_risk\"");
        let state: SLAState = serde_json::from_str("\"no_sla\"").unwrap();
        assert_eq!(state, SLAState::NoSLA);
    }

    #[test]
    fn test_paused_clock_is_frozen() {
        let evaluator = BreachEvaluator::default();
        let paused = pause(&clock(), utc(2024, 3, 18, 1, 0));

        let standing = evaluator.status(&paused, SLATarget::Response, utc(2024, 3, 30, 0, 0));
        assert_eq!(standing.state, SLAState::OnTrack);
        assert_eq!(standing.hours_remaining, Some(11.0));
        assert!(standing.paused);
    }

    #[test]
    fn test_evaluate_all_order() {
        let evaluator = BreachEvaluator::new(BreachPolicy::new(24.0));
        let [response, resolution] = evaluator.evaluate_all(&clock(), utc(2024, 3, 18, 0, 0));
        assert_eq!(response.target, SLATarget::Response);
        assert_eq!(response.state, SLAState::AtRisk);
        assert_eq!(resolution.target, SLATarget::Resolution);
        assert_eq!(resolution.state, SLAState::OnTrack);
    }

    #[test]
    fn test_zero_threshold_never_at_risk() {
        let evaluator = BreachEvaluator::new(BreachPolicy::new(0.0));
        let standing = evaluator.status(&clock(), SLATarget::Response, utc(2024, 3, 18, 11, 59));
        assert_eq!(standing.state, SLAState::OnTrack);
    }

    #[test]
    fn test_policy_from_settings() {
        let mut raw = HashMap::new();
        assert_eq!(BreachPolicy::from_settings(&raw), BreachPolicy::default());

        raw.insert(keys::AT_RISK_HOURS.to_string(), "4.5".to_string());
        assert_eq!(BreachPolicy::from_settings(&raw).at_risk_threshold_hours, 4.5);

        raw.insert(keys::AT_RISK_HOURS.to_string(), "-2".to_string());
        assert_eq!(BreachPolicy::from_settings(&raw), BreachPolicy::default());

        raw.insert(keys::AT_RISK_HOURS.to_string(), "soon".to_string());
        assert_eq!(BreachPolicy::from_settings(&raw), BreachPolicy::default());
        assert_eq!(BreachPolicy::new(f64::INFINITY).at_risk_threshold_hours, 0.0);
    }

    proptest! {
        #[test]
        fn prop_paused_evaluation_is_frozen(
            pause_offset in 0i64..20 * 86_400,
            later in 1i64..60 * 86_400,
        ) {
            let evaluator = BreachEvaluator::default();
            let t1 = utc(2024, 3, 10, 0, 0) + Duration::seconds(pause_offset);
            let paused = pause(&clock(), t1);
            for target in [SLATarget::Response, SLATarget::Resolution] {
                prop_assert_eq!(
                    evaluator.status(&paused, target, t1 + Duration::seconds(later)),
                    evaluator.status(&paused, target, t1)
                );
            }
        }
    }
}
