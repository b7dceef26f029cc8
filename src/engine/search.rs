//! Backtracking assignment engine.
//!
//! # Algorithm
//!
//! Depth-first search over an explicit stack of choice points:
//!
//! 1. Pick the pending demand with the fewest compatible candidates
//!    (selection rules break ties). A pending demand with none is a dead
//!    end.
//! 2. Try its candidates in order. Each placement is re-checked by the
//!    validator's incremental check before descending.
//! 3. When a choice point runs out of candidates, pop it and move the
//!    parent to its next candidate.
//! 4. When no demand is pending, the full validator is the final gate.
//!
//! Sessions of one demand are placed in increasing template order, which
//! removes permutations of the same set of sessions from the tree.
//!
//! The deadline is checked before every choice point and every candidate
//! trial. With identical inputs and configuration the search is fully
//! deterministic, including seeded shuffling.
//!
//! # Reference
//! Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//! Constraint Satisfaction Problems"

use std::time::Instant;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use super::{SearchStats, Unsatisfiable, UnsatisfiableReason};
use crate::config::SolverConfig;
use crate::constraints::{Candidate, ConstraintModel, PartialSchedule};
use crate::error::SchedulingError;
use crate::models::{minutes_to_hours, Timetable};
use crate::ordering::{rules, EvaluationMode, PendingDemand, RuleEngine, TieBreaker};
use crate::validator::Validator;

/// Builds complete timetables by backtracking search.
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    config: SolverConfig,
    rules: RuleEngine,
}

struct ChoicePoint {
    demand: usize,
    candidates: Vec<Candidate>,
    next: usize,
    placed: bool,
}

enum Step {
    Complete,
    DeadEnd(usize),
    Branch(usize, Vec<Candidate>),
}

impl AssignmentEngine {
    /// Creates an engine; the selection rules follow `config.selection`.
    ///
    /// Rules only order demands tied on the fewest compatible candidates.
    pub fn new(config: SolverConfig) -> Self {
        let rules = match config.selection {
            EvaluationMode::Sequential => RuleEngine::most_constrained_first(),
            EvaluationMode::Weighted => RuleEngine::new()
                .with_mode(EvaluationMode::Weighted)
                .with_weighted_rule(rules::MostConstraining, 1.0)
                .with_weighted_rule(rules::LargestRemaining, 0.01)
                .with_weighted_rule(rules::SmallestDomain, 0.01)
                .with_final_tie_breaker(TieBreaker::ById),
        };
        Self { config, rules }
    }

    /// Replaces the tie-breaking selection rules.
    pub fn with_rules(mut self, rules: RuleEngine) -> Self {
        self.rules = rules;
        self
    }

    /// The engine's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Searches for a complete timetable before `deadline`.
    ///
    /// Fails with [`SchedulingError::Unsatisfiable`] when the search space
    /// is exhausted or the deadline elapses.
    pub fn solve(
        &self,
        model: &ConstraintModel,
        deadline: Instant,
    ) -> Result<Timetable, SchedulingError> {
        self.solve_with_stats(model, deadline).map(|(timetable, _)| timetable)
    }

    /// Like [`solve`](Self::solve), also returning search statistics.
    pub fn solve_with_stats(
        &self,
        model: &ConstraintModel,
        deadline: Instant,
    ) -> Result<(Timetable, SearchStats), SchedulingError> {
        let started = Instant::now();
        let validator = Validator::new(model.catalog());
        let mut rng = self.config.shuffle_seed.map(StdRng::seed_from_u64);
        let mut partial = PartialSchedule::new(model);
        let mut stack: Vec<ChoicePoint> = Vec::new();
        let mut stats = SearchStats::default();
        let mut blocking: Option<usize> = None;
        let mut descend = true;

        info!(
            planning_id = %model.catalog().planning.id,
            demands = model.demands().len(),
            required_hours = minutes_to_hours(model.required_minutes()),
            shuffle_seed = ?self.config.shuffle_seed,
            "search started"
        );

        loop {
            if Instant::now() >= deadline {
                return self.give_up(
                    model,
                    partial,
                    UnsatisfiableReason::Timeout,
                    stats,
                    blocking,
                    started,
                );
            }

            if descend {
                match self.next_step(model, &partial) {
                    Step::Complete => {
                        let violations = validator.validate(partial.timetable());
                        if violations.is_empty() {
                            partial.timetable_mut().complete()?;
                            stats.elapsed = started.elapsed();
                            info!(
                                planning_id = %model.catalog().planning.id,
                                sessions = partial.depth(),
                                nodes = stats.nodes,
                                backtracks = stats.backtracks,
                                elapsed_ms = stats.elapsed.as_millis() as u64,
                                "timetable complete"
                            );
                            return Ok((partial.into_timetable(), stats));
                        }
                        warn!(
                            planning_id = %model.catalog().planning.id,
                            violations = violations.len(),
                            "final validation rejected a complete assignment"
                        );
                        descend = false;
                        continue;
                    }
                    Step::DeadEnd(demand) => {
                        trace!(
                            demand = %model.demand(demand).key,
                            depth = partial.depth(),
                            "dead end"
                        );
                        blocking = Some(demand);
                        descend = false;
                        continue;
                    }
                    Step::Branch(demand, mut candidates) => {
                        self.order_candidates(model, &mut candidates, rng.as_mut());
                        stack.push(ChoicePoint {
                            demand,
                            candidates,
                            next: 0,
                            placed: false,
                        });
                    }
                }
            }

            let Some(top) = stack.last_mut() else {
                return self.give_up(
                    model,
                    partial,
                    UnsatisfiableReason::Exhausted,
                    stats,
                    blocking,
                    started,
                );
            };
            if top.placed {
                partial.undo(model)?;
                top.placed = false;
                stats.backtracks += 1;
            }

            while top.next < top.candidates.len() {
                if Instant::now() >= deadline {
                    return self.give_up(
                        model,
                        partial,
                        UnsatisfiableReason::Timeout,
                        stats,
                        blocking,
                        started,
                    );
                }
                let candidate = top.candidates[top.next];
                top.next += 1;

                partial.assign(model, candidate)?;
                stats.nodes += 1;
                if validator.check_latest(partial.timetable()).is_empty() {
                    top.placed = true;
                    break;
                }
                partial.undo(model)?;
            }

            if top.placed {
                stats.max_depth = stats.max_depth.max(partial.depth());
                descend = true;
            } else {
                trace!(
                    demand = %model.demand(top.demand).key,
                    depth = partial.depth(),
                    "choice point exhausted"
                );
                blocking = Some(top.demand);
                stack.pop();
                descend = false;
            }
        }
    }

    fn next_step(&self, model: &ConstraintModel, partial: &PartialSchedule) -> Step {
        if model.is_complete(partial) {
            return Step::Complete;
        }
        let mut pending = Vec::new();
        for demand in model.demands() {
            let remaining = partial.demand_remaining(demand.id);
            if remaining == 0 {
                continue;
            }
            let compatible = branch_candidates(model, partial, demand.id).len();
            if compatible == 0 {
                return Step::DeadEnd(demand.id);
            }
            pending.push(PendingDemand {
                id: demand.id,
                compatible,
                domain: model.candidates(demand.id).len(),
                remaining_minutes: remaining,
                degree: 0,
            });
        }

        for p in &mut pending {
            p.degree = model
                .neighbors(p.id)
                .iter()
                .filter(|&&n| partial.demand_remaining(n) > 0)
                .count();
        }

        match self.pick(&pending) {
            None => Step::Complete,
            Some(chosen) => {
                trace!(
                    demand = %model.demand(chosen.id).key,
                    compatible = chosen.compatible,
                    scores = ?self.rules.evaluate(&chosen),
                    "branching"
                );
                Step::Branch(chosen.id, branch_candidates(model, partial, chosen.id))
            }
        }
    }

    /// The demand to branch on: fewest compatible candidates first, with
    /// the selection rules deciding among demands tied on that count.
    fn pick(&self, pending: &[PendingDemand]) -> Option<PendingDemand> {
        let fewest = pending.iter().map(|p| p.compatible).min()?;
        let tied: Vec<PendingDemand> = pending
            .iter()
            .filter(|p| p.compatible == fewest)
            .copied()
            .collect();
        self.rules.select_best(&tied).map(|i| tied[i])
    }

    fn order_candidates(
        &self,
        model: &ConstraintModel,
        candidates: &mut [Candidate],
        rng: Option<&mut StdRng>,
    ) {
        if let Some(rng) = rng {
            candidates.shuffle(rng);
        }
        if self.config.prefer_available_teachers {
            let teachers = &model.catalog().teachers;
            candidates.sort_by_key(|c| {
                !teachers[c.teacher]
                    .availability
                    .allows(&model.template(c.template).period())
            });
        }
    }

    fn give_up(
        &self,
        model: &ConstraintModel,
        mut partial: PartialSchedule,
        reason: UnsatisfiableReason,
        mut stats: SearchStats,
        blocking: Option<usize>,
        started: Instant,
    ) -> Result<(Timetable, SearchStats), SchedulingError> {
        stats.elapsed = started.elapsed();
        partial.timetable_mut().abandon()?;
        let blocking = blocking.map(|d| model.demand(d).key.clone());
        info!(
            planning_id = %model.catalog().planning.id,
            %reason,
            nodes = stats.nodes,
            backtracks = stats.backtracks,
            max_depth = stats.max_depth,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search failed"
        );
        if let Some(key) = &blocking {
            debug!(blocking = %key, "last demand without candidates");
        }
        Err(Unsatisfiable {
            planning_id: model.catalog().planning.id.clone(),
            reason,
            stats,
            blocking,
            timetable: partial.into_timetable(),
        }
        .into())
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(SolverConfig::default())
    }
}

/// Compatible candidates of `demand`, restricted to templates after the
/// demand's latest session.
fn branch_candidates(
    model: &ConstraintModel,
    partial: &PartialSchedule,
    demand: usize,
) -> Vec<Candidate> {
    let floor = partial.latest_template(demand);
    model
        .candidates(demand)
        .iter()
        .filter(|c| floor.map_or(true, |f| c.template > f) && model.is_compatible(c, partial))
        .copied()
        .collect()
}
