//! Timetable construction and quality metrics.
//!
//! # Algorithm
//!
//! `AssignmentEngine` runs a deterministic depth-first backtracking search
//! with most-constrained-first variable ordering and an incremental
//! validity check after each placement. It either completes the timetable
//! or reports why it could not (search exhausted or deadline elapsed).
//!
//! # KPI
//!
//! `TimetableKpi` reports coverage, room utilization, teacher load and
//! soft-preference breaches of a timetable.
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

mod kpi;
mod outcome;
mod search;

pub use kpi::TimetableKpi;
pub use outcome::{SearchStats, Unsatisfiable, UnsatisfiableReason};
pub use search::AssignmentEngine;
