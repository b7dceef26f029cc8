//! Built-in selection rules.
//!
//! All rules return lower scores for demands that should be branched on
//! first.

use super::{PendingDemand, RuleScore, SelectionRule};

/// Minimum Remaining Values.
///
/// Prioritizes the demand with the fewest compatible candidates. A demand
/// with zero candidates scores lowest, which makes dead ends surface
/// immediately.
///
/// # Reference
/// Haralick & Elliott (1980)
#[derive(Debug, Clone, Copy)]
pub struct MostConstrained;

impl SelectionRule for MostConstrained {
    fn name(&self) -> &'static str {
        "MRV"
    }

    fn evaluate(&self, demand: &PendingDemand) -> RuleScore {
        demand.compatible as f64
    }

    fn description(&self) -> &'static str {
        "Minimum Remaining Values"
    }
}

/// Degree heuristic.
///
/// Prioritizes the demand that competes with the most pending demands.
///
/// # Reference
/// Brélaz (1979)
#[derive(Debug, Clone, Copy)]
pub struct MostConstraining;

impl SelectionRule for MostConstraining {
    fn name(&self) -> &'static str {
        "DEG"
    }

    fn evaluate(&self, demand: &PendingDemand) -> RuleScore {
        -(demand.degree as f64)
    }

    fn description(&self) -> &'static str {
        "Most Constraining (degree)"
    }
}

/// Largest Remaining Hours.
///
/// Prioritizes demands with the most minutes left to place.
#[derive(Debug, Clone, Copy)]
pub struct LargestRemaining;

impl SelectionRule for LargestRemaining {
    fn name(&self) -> &'static str {
        "LRH"
    }

    fn evaluate(&self, demand: &PendingDemand) -> RuleScore {
        -(demand.remaining_minutes as f64)
    }

    fn description(&self) -> &'static str {
        "Largest Remaining Hours"
    }
}

/// Smallest Static Domain.
///
/// Prioritizes demands that had few placements to begin with.
#[derive(Debug, Clone, Copy)]
pub struct SmallestDomain;

impl SelectionRule for SmallestDomain {
    fn name(&self) -> &'static str {
        "SSD"
    }

    fn evaluate(&self, demand: &PendingDemand) -> RuleScore {
        demand.domain as f64
    }

    fn description(&self) -> &'static str {
        "Smallest Static Domain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(compatible: usize, domain: usize, remaining: u32, degree: usize) -> PendingDemand {
        PendingDemand {
            id: 0,
            compatible,
            domain,
            remaining_minutes: remaining,
            degree,
        }
    }

    #[test]
    fn test_mrv() {
        let few = pending(2, 10, 90, 1);
        let many = pending(8, 10, 90, 1);
        assert!(MostConstrained.evaluate(&few) < MostConstrained.evaluate(&many));
    }

    #[test]
    fn test_degree() {
        let busy = pending(5, 10, 90, 7);
        let quiet = pending(5, 10, 90, 1);
        assert!(MostConstraining.evaluate(&busy) < MostConstraining.evaluate(&quiet));
    }

    #[test]
    fn test_largest_remaining() {
        let big = pending(5, 10, 180, 1);
        let small = pending(5, 10, 90, 1);
        assert!(LargestRemaining.evaluate(&big) < LargestRemaining.evaluate(&small));
    }

    #[test]
    fn test_smallest_domain() {
        let narrow = pending(5, 6, 90, 1);
        let wide = pending(5, 60, 90, 1);
        assert!(SmallestDomain.evaluate(&narrow) < SmallestDomain.evaluate(&wide));
    }

    #[test]
    fn test_rule_names() {
        let rules: Vec<Box<dyn SelectionRule>> = vec![
            Box::new(MostConstrained),
            Box::new(MostConstraining),
            Box::new(LargestRemaining),
            Box::new(SmallestDomain),
        ];
        let names: Vec<&str> = rules.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["MRV", "DEG", "LRH", "SSD"]);
        assert_eq!(MostConstrained.description(), "Minimum Remaining Values");
    }
}
