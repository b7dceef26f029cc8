//! Rule engine for demand selection.
//!
//! Composes selection rules with configurable evaluation modes and
//! tie-breaking strategies.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{rules, PendingDemand, RuleScore, SelectionRule};

/// How multiple rules are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvaluationMode {
    /// Apply rules in sequence; use next rule only on ties.
    #[default]
    Sequential,
    /// Compute weighted sum of all rule scores.
    Weighted,
}

/// How ties are broken after all rules are exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TieBreaker {
    /// Keep input order.
    #[default]
    NextRule,
    /// Deterministic by demand index.
    ById,
}

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn SelectionRule>,
    weight: f64,
}

/// A composable rule engine for demand selection.
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<WeightedRule>,
    mode: EvaluationMode,
    tie_breaker: TieBreaker,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            mode: EvaluationMode::Sequential,
            tie_breaker: TieBreaker::NextRule,
            epsilon: 1e-9,
        }
    }

    /// Most-constrained-first: MRV, then degree, then largest remaining
    /// hours, then demand index.
    pub fn most_constrained_first() -> Self {
        Self::new()
            .with_rule(rules::MostConstrained)
            .with_tie_breaker(rules::MostConstraining)
            .with_tie_breaker(rules::LargestRemaining)
            .with_final_tie_breaker(TieBreaker::ById)
    }

    /// Adds a primary rule (weight 1.0).
    pub fn with_rule<R: SelectionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 1.0,
        });
        self
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: SelectionRule + 'static>(mut self, rule: R, weight: f64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Adds a tie-breaking rule (weight 0.0, used only in Sequential mode).
    pub fn with_tie_breaker<R: SelectionRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight: 0.0,
        });
        self
    }

    /// Sets the evaluation mode.
    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the final tie-breaking strategy.
    pub fn with_final_tie_breaker(mut self, tie_breaker: TieBreaker) -> Self {
        self.tie_breaker = tie_breaker;
        self
    }

    /// The evaluation mode.
    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// Returns the index of the highest-priority demand.
    pub fn select_best(&self, pending: &[PendingDemand]) -> Option<usize> {
        if pending.is_empty() {
            return None;
        }
        let mut best = 0;
        for i in 1..pending.len() {
            if self.compare(&pending[i], &pending[best]) == Ordering::Less {
                best = i;
            }
        }
        Some(best)
    }

    /// Evaluates a single demand and returns weighted scores from each rule.
    pub fn evaluate(&self, demand: &PendingDemand) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(demand) * wr.weight)
            .collect()
    }

    fn compare(&self, a: &PendingDemand, b: &PendingDemand) -> Ordering {
        match self.mode {
            EvaluationMode::Sequential => self.compare_sequential(a, b),
            EvaluationMode::Weighted => self
                .weighted_score(a)
                .partial_cmp(&self.weighted_score(b))
                .unwrap_or(Ordering::Equal)
                .then_with(|| self.break_tie(a, b)),
        }
    }

    fn compare_sequential(&self, a: &PendingDemand, b: &PendingDemand) -> Ordering {
        for wr in &self.rules {
            let score_a = wr.rule.evaluate(a);
            let score_b = wr.rule.evaluate(b);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }
        self.break_tie(a, b)
    }

    fn break_tie(&self, a: &PendingDemand, b: &PendingDemand) -> Ordering {
        match self.tie_breaker {
            TieBreaker::NextRule => Ordering::Equal,
            TieBreaker::ById => a.id.cmp(&b.id),
        }
    }

    fn weighted_score(&self, demand: &PendingDemand) -> f64 {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(demand) * wr.weight)
            .sum()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::most_constrained_first()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .field("mode", &self.mode)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(id: usize, compatible: usize, remaining: u32, degree: usize) -> PendingDemand {
        PendingDemand {
            id,
            compatible,
            domain: 10,
            remaining_minutes: remaining,
            degree,
        }
    }

    #[test]
    fn test_mrv_ordering() {
        let demands = vec![pending(0, 6, 90, 1), pending(1, 2, 90, 1), pending(2, 4, 90, 1)];
        let engine = RuleEngine::new().with_rule(rules::MostConstrained);
        assert_eq!(engine.select_best(&demands), Some(1));
    }

    #[test]
    fn test_sequential_with_tie_breaker() {
        let demands = vec![pending(0, 3, 90, 1), pending(1, 3, 90, 5)];
        let engine = RuleEngine::new()
            .with_rule(rules::MostConstrained)
            .with_tie_breaker(rules::MostConstraining);
        // MRV ties → degree breaks it
        assert_eq!(engine.select_best(&demands), Some(1));
    }

    #[test]
    fn test_weighted_mode() {
        let demands = vec![pending(0, 4, 90, 0), pending(1, 5, 300, 0)];
        let engine = RuleEngine::new()
            .with_mode(EvaluationMode::Weighted)
            .with_weighted_rule(rules::MostConstrained, 1.0)
            .with_weighted_rule(rules::LargestRemaining, 0.1);
        // 0: 4 - 9 = -5; 1: 5 - 30 = -25
        assert_eq!(engine.select_best(&demands), Some(1));
    }

    #[test]
    fn test_by_id_tie_breaker() {
        let demands = vec![pending(7, 3, 90, 1), pending(2, 3, 90, 1)];
        let engine = RuleEngine::new()
            .with_rule(rules::MostConstrained)
            .with_final_tie_breaker(TieBreaker::ById);
        assert_eq!(engine.select_best(&demands), Some(1));
    }

    #[test]
    fn test_select_best_keeps_first_on_full_tie() {
        let demands = vec![pending(7, 3, 90, 1), pending(2, 3, 90, 1)];
        let engine = RuleEngine::new().with_rule(rules::MostConstrained);
        assert_eq!(engine.select_best(&demands), Some(0));
    }

    #[test]
    fn test_default_is_most_constrained_first() {
        let demands = vec![
            pending(0, 5, 90, 3),
            pending(1, 2, 90, 1),
            pending(2, 2, 90, 4),
            pending(3, 2, 180, 4),
        ];
        let engine = RuleEngine::default();
        assert_eq!(engine.mode(), EvaluationMode::Sequential);
        // fewest candidates, then degree, then remaining hours
        assert_eq!(engine.select_best(&demands), Some(3));
        assert_eq!(engine.select_best(&demands[..3]), Some(2));
        assert_eq!(engine.select_best(&demands[..2]), Some(1));
    }

    #[test]
    fn test_empty() {
        let engine = RuleEngine::default();
        assert!(engine.select_best(&[]).is_none());
    }

    #[test]
    fn test_evaluate_scores() {
        let engine = RuleEngine::new()
            .with_rule(rules::MostConstrained)
            .with_weighted_rule(rules::LargestRemaining, 2.0);
        let scores = engine.evaluate(&pending(0, 3, 90, 1));
        assert_eq!(scores.len(), 2);
        assert!((scores[0] - 3.0).abs() < 1e-10);
        assert!((scores[1] + 180.0).abs() < 1e-10);
    }

    #[test]
    fn test_debug_lists_rules() {
        let dbg = format!("{:?}", RuleEngine::default());
        assert!(dbg.contains("MRV(w=1)"));
        assert!(dbg.contains("DEG(w=0)"));
    }
}
