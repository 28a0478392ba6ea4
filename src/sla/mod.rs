//! SLA Module
//!
//! Per-ticket SLA state and its evaluation:
//! - Clock with pause/resume and deadline shifting
//! - Breach evaluation against a risk policy
//! - Aggregated reporting

pub mod clock;
pub mod evaluator;
pub mod reporter;
pub mod status;

pub use clock::{pause, resume, ClockTransition, SLABudget, SLAClock};
pub use evaluator::{status, BreachEvaluator, BreachPolicy, SLAStanding, SLAState};
pub use reporter::{OverdueTicket, SLAReporter, SLASummary};
pub use status::{SLATarget, TicketStatus};
