//! University timetabling engine.
//!
//! Builds conflict-free weekly timetables for the student groups of one
//! planning (grade, semester, school year): every required session of
//! every module is bound to a time slot, a classroom of the right type and
//! a qualified teacher, without double-booking anyone.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Planning`, `Group`, `Module`, `Teacher`,
//!   `Classroom`, `SlotTemplate`, `TimeSlot`, `Timetable`, `Schedule`
//! - **`catalog`**: Per-run entity sets, loaded through `CatalogSource`
//! - **`validation`**: Input integrity checks (duplicate IDs, bad hours,
//!   unplaceable demands)
//! - **`constraints`**: Demands, candidate domains, exclusion graph and the
//!   partial-assignment ledger
//! - **`ordering`**: Demand-selection rules (MRV, degree, ...)
//! - **`engine`**: Backtracking `AssignmentEngine` and `TimetableKpi`
//! - **`validator`**: Hard-constraint checks on a timetable
//! - **`planner`**: `run_planning`, the load → solve → persist flow
//!
//! # Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use u_timetable::catalog::ResourceCatalog;
//! use u_timetable::constraints::ConstraintModel;
//! use u_timetable::engine::AssignmentEngine;
//! use u_timetable::models::*;
//!
//! let catalog = ResourceCatalog::new(Planning::new("P1"))
//!     .with_group(Group::new("G1", 1).in_planning("P1"))
//!     .with_module(Module::new("ALGO").with_hours(SessionType::Lecture, 1.5))
//!     .with_teacher(Teacher::new("T1", 6.0).with_module("ALGO"))
//!     .with_classroom(Classroom::lecture_hall("A1", 1))
//!     .with_slots(SlotTemplate::standard_week());
//!
//! let model = ConstraintModel::build(catalog).unwrap();
//! let deadline = Instant::now() + Duration::from_secs(1);
//! let timetable = AssignmentEngine::default().solve(&model, deadline).unwrap();
//! assert_eq!(timetable.state(), ScheduleState::Complete);
//! assert_eq!(timetable.len(), 1);
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Haralick & Elliott (1980), "Increasing Tree Search Efficiency for
//!   Constraint Satisfaction Problems"

pub mod catalog;
pub mod config;
pub mod constraints;
pub mod engine;
pub mod error;
pub mod models;
pub mod ordering;
pub mod planner;
pub mod validation;
pub mod validator;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::SolverConfig;
pub use error::SchedulingError;
pub use planner::run_planning;
