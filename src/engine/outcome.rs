//! Search statistics and failure reports.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::constraints::DemandKey;
use crate::models::Timetable;

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Tentative assignments made.
    pub nodes: u64,
    /// Assignments undone.
    pub backtracks: u64,
    /// Deepest partial assignment reached.
    pub max_depth: usize,
    /// Wall-clock time spent searching.
    pub elapsed: Duration,
}

/// Why the search ended without a timetable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsatisfiableReason {
    /// Every branch was explored: no valid timetable exists.
    Exhausted,
    /// The deadline elapsed first. Says nothing about feasibility.
    Timeout,
}

impl fmt::Display for UnsatisfiableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnsatisfiableReason::Exhausted => f.write_str("search space exhausted"),
            UnsatisfiableReason::Timeout => f.write_str("timed out"),
        }
    }
}

/// The search ended without a complete timetable.
#[derive(Debug, Clone, Error)]
#[error("no timetable for planning {planning_id}: {reason}")]
pub struct Unsatisfiable {
    pub planning_id: String,
    pub reason: UnsatisfiableReason,
    pub stats: SearchStats,
    /// Demand that most recently ran out of candidates.
    pub blocking: Option<DemandKey>,
    /// The abandoned timetable as it stood when the search stopped.
    pub timetable: Timetable,
}

impl Unsatisfiable {
    /// Whether the search ran out of time rather than proving infeasibility.
    pub fn is_timeout(&self) -> bool {
        self.reason == UnsatisfiableReason::Timeout
    }
}
