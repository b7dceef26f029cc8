//! Timetabling domain models.
//!
//! Provides the entity types for one academic term and the solution
//! types the engine produces.
//!
//! # Entities
//!
//! | Type | Role |
//! |------|------|
//! | Planning | Academic term: grade, semester, school year, speciality |
//! | Group | Student cohort within a planning |
//! | Module | Course unit with hours per session type |
//! | Teacher | Disjunctive resource with an hour budget and qualifications |
//! | Classroom | Disjunctive resource with a room type |
//! | SlotTemplate | Open weekly period |
//! | TimeSlot | Placed session (module, group, classroom, teacher) |
//! | Timetable / Schedule | Planning-wide solution / per-group artifact |

mod availability;
mod module;
mod planning;
mod resource;
mod schedule;
mod time;
mod timeslot;

pub use availability::Availability;
pub use module::{Module, SessionHours, SessionType};
pub use planning::{Group, Planning};
pub use resource::{Classroom, ClassroomType, Teacher};
pub use schedule::{Schedule, ScheduleState, Timetable, Violation, ViolationType};
pub use time::{hours_to_minutes, minutes_to_hours, Day, Period, TimeRange};
pub use timeslot::{SlotTemplate, TimeSlot};
