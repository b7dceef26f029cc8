//! Error types.

use thiserror::Error;

use crate::engine::Unsatisfiable;
use crate::models::{ScheduleState, Violation};
use crate::validation::ValidationError;

/// Errors surfaced by catalog loading, solving and persistence.
///
/// Every variant is scoped to one solving run; none is fatal to the process.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("input validation failed with {} error(s)", .0.len())]
    InvalidInput(Vec<ValidationError>),

    #[error("timetable violates {} constraint(s)", .0.len())]
    ConstraintViolation(Vec<Violation>),

    #[error(transparent)]
    Unsatisfiable(#[from] Unsatisfiable),

    #[error("invalid schedule state transition: {from} -> {to}")]
    InvalidTransition {
        from: ScheduleState,
        to: ScheduleState,
    },

    #[error("candidate cannot be placed: {0}")]
    IncompatibleAssignment(String),

    #[error("invalid time range: {0:?}")]
    InvalidTimeRange(String),

    #[error("invalid solver configuration: {0}")]
    Config(#[source] serde_json::Error),

    #[error("invalid dataset: {0}")]
    Dataset(#[source] serde_json::Error),

    #[error("store error: {0}")]
    Store(String),
}

impl SchedulingError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    /// Whether retrying with a longer deadline or relaxed input may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unsatisfiable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = SchedulingError::not_found("planning", "P9");
        assert_eq!(err.to_string(), "planning not found: P9");
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transition_message() {
        let err = SchedulingError::InvalidTransition {
            from: ScheduleState::Complete,
            to: ScheduleState::Partial,
        };
        assert_eq!(
            err.to_string(),
            "invalid schedule state transition: Complete -> Partial"
        );
    }
}
