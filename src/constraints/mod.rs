//! Constraint model of a timetabling problem.
//!
//! Translates a [`ResourceCatalog`](crate::catalog::ResourceCatalog) into
//! demands (variables), candidate placements (domains) and a mutual
//! exclusion graph, and tracks a partial assignment against it.

mod model;
mod partial;

pub use model::{CapacityEntity, Candidate, ConstraintModel, Demand, DemandKey};
pub use partial::PartialSchedule;
