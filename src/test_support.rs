//! Shared fixtures for unit tests.

use tracing_subscriber::{fmt, EnvFilter};

use crate::catalog::ResourceCatalog;
use crate::models::{
    Classroom, Day, Group, Module, Planning, SessionType, SlotTemplate, Teacher, TimeRange,
};

/// Routes `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}

/// One group, one 1.5 h lecture module, one teacher, one lecture hall and
/// the first `open_slots` templates of the standard week.
pub fn single_module_catalog(open_slots: usize) -> ResourceCatalog {
    ResourceCatalog::new(Planning::new("P1"))
        .with_group(Group::new("G1", 1).in_planning("P1"))
        .with_module(
            Module::new("ALGO")
                .with_name("Algorithms")
                .with_hours(SessionType::Lecture, 1.5),
        )
        .with_teacher(Teacher::new("T1", 1.5).with_module("ALGO"))
        .with_classroom(Classroom::lecture_hall("A1", 1))
        .with_slots(SlotTemplate::standard_week().into_iter().take(open_slots))
}

/// Two groups sharing two modules over four 90-minute templates.
///
/// - ALGO: 1.5 h lecture + 1.5 h tutorial, taught by T1 (6 h budget)
/// - DB: 1.5 h tutorial, taught by T2
/// - one lecture hall A1, one tutorial room S1
///
/// T1 and S1 are both booked in every template of any solution, so the
/// instance is tight but satisfiable.
pub fn two_group_catalog() -> ResourceCatalog {
    ResourceCatalog::new(Planning::new("P1"))
        .with_group(Group::new("G1", 1).in_planning("P1"))
        .with_group(Group::new("G2", 2).in_planning("P1"))
        .with_module(
            Module::new("ALGO")
                .with_hours(SessionType::Lecture, 1.5)
                .with_hours(SessionType::Tutorial, 1.5),
        )
        .with_module(Module::new("DB").with_hours(SessionType::Tutorial, 1.5))
        .with_teacher(Teacher::new("T1", 6.0).with_module("ALGO"))
        .with_teacher(Teacher::new("T2", 6.0).with_module("DB"))
        .with_classroom(Classroom::lecture_hall("A1", 1))
        .with_classroom(Classroom::tutorial("S1", 10))
        .with_slot(template("sat-0", Day::Saturday, (8, 0), (9, 30)))
        .with_slot(template("sat-1", Day::Saturday, (9, 40), (11, 10)))
        .with_slot(template("sun-0", Day::Sunday, (8, 0), (9, 30)))
        .with_slot(template("sun-1", Day::Sunday, (9, 40), (11, 10)))
}

/// A template from `(hour, minute)` bounds.
pub fn template(id: &str, day: Day, start: (u16, u16), end: (u16, u16)) -> SlotTemplate {
    SlotTemplate::new(id, day, TimeRange::hm(start, end))
}
