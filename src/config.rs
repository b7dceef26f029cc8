//! Solver configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SchedulingError;
use crate::ordering::EvaluationMode;

/// Tuning knobs for one solving run.
///
/// Every field has a default, so `{}` is a valid JSON configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Wall-clock budget for the search, in milliseconds.
    pub time_limit_ms: u64,
    /// Seed for shuffling candidate order. `None` keeps catalog order.
    pub shuffle_seed: Option<u64>,
    /// Try teachers whose availability covers the slot first.
    pub prefer_available_teachers: bool,
    /// How demand-selection rules are combined.
    pub selection: EvaluationMode,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 10_000,
            shuffle_seed: None,
            prefer_available_teachers: true,
            selection: EvaluationMode::Sequential,
        }
    }
}

impl SolverConfig {
    /// Parses a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, SchedulingError> {
        serde_json::from_str(json).map_err(SchedulingError::Config)
    }

    /// Sets the time limit.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Enables seeded candidate shuffling.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    /// Toggles the availability preference.
    pub fn with_prefer_available_teachers(mut self, prefer: bool) -> Self {
        self.prefer_available_teachers = prefer;
        self
    }

    /// Sets the selection mode.
    pub fn with_selection(mut self, selection: EvaluationMode) -> Self {
        self.selection = selection;
        self
    }

    /// The time limit as a `Duration`.
    pub fn time_limit(&self) -> Duration {
        Duration::from_millis(self.time_limit_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit(), Duration::from_secs(10));
        assert_eq!(config.shuffle_seed, None);
        assert!(config.prefer_available_teachers);
        assert_eq!(config.selection, EvaluationMode::Sequential);
    }

    #[test]
    fn test_from_json_partial() {
        let config = SolverConfig::from_json(r#"{"time_limit_ms": 250, "shuffle_seed": 7}"#).unwrap();
        assert_eq!(config.time_limit_ms, 250);
        assert_eq!(config.shuffle_seed, Some(7));
        assert!(config.prefer_available_teachers);

        assert_eq!(SolverConfig::from_json("{}").unwrap(), SolverConfig::default());
    }

    #[test]
    fn test_from_json_selection() {
        let config = SolverConfig::from_json(r#"{"selection": "Weighted"}"#).unwrap();
        assert_eq!(config.selection, EvaluationMode::Weighted);
    }

    #[test]
    fn test_from_json_invalid() {
        let err = SolverConfig::from_json(r#"{"time_limit_ms": "soon"}"#).unwrap_err();
        assert!(matches!(err, SchedulingError::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = SolverConfig::default()
            .with_time_limit(Duration::from_millis(1500))
            .with_shuffle_seed(42)
            .with_prefer_available_teachers(false)
            .with_selection(EvaluationMode::Weighted);
        assert_eq!(config.time_limit_ms, 1500);
        assert_eq!(config.shuffle_seed, Some(42));
        assert!(!config.prefer_available_teachers);
        assert_eq!(config.selection, EvaluationMode::Weighted);
    }
}
