//! Variable-ordering rules and rule engine for the assignment search.
//!
//! At each choice point the engine picks which pending demand to branch
//! on. Rules score pending demands; the rule engine composes them.
//!
//! # Usage
//!
//! ```
//! use u_timetable::ordering::{rules, RuleEngine, TieBreaker};
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::MostConstrained)
//!     .with_tie_breaker(rules::MostConstraining)
//!     .with_final_tie_breaker(TieBreaker::ById);
//! ```
//!
//! # References
//!
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"
//! - Brélaz (1979), "New Methods to Color the Vertices of a Graph"

mod engine;
pub mod rules;

pub use engine::{EvaluationMode, RuleEngine, TieBreaker};

use std::fmt::Debug;

/// Score returned by a selection rule.
///
/// Lower scores = higher priority (branched on first).
pub type RuleScore = f64;

/// Snapshot of a pending demand at a choice point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDemand {
    /// Demand index in the constraint model.
    pub id: usize,
    /// Candidates compatible with the current partial assignment.
    pub compatible: usize,
    /// Size of the static domain.
    pub domain: usize,
    /// Minutes still to place.
    pub remaining_minutes: u32,
    /// Neighbors in the exclusion graph that are still pending.
    pub degree: usize,
}

/// A rule that scores which demand to branch on next.
///
/// # Score Convention
/// **Lower score = higher priority.**
pub trait SelectionRule: Send + Sync + Debug {
    /// Rule name (e.g., "MRV").
    fn name(&self) -> &'static str;

    /// Scores a pending demand.
    fn evaluate(&self, demand: &PendingDemand) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
