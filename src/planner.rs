//! End-to-end planning run: load, model, solve, persist.

use std::time::Instant;

use tracing::{info, warn};

use crate::catalog::{CatalogSource, ResourceCatalog, ScheduleSink};
use crate::config::SolverConfig;
use crate::constraints::ConstraintModel;
use crate::engine::AssignmentEngine;
use crate::error::SchedulingError;
use crate::models::{ScheduleState, Timetable};
use crate::validator::Validator;

/// Builds and stores the timetable of one planning.
///
/// Loads the catalog visible to `requester`, builds the constraint model,
/// searches within `config.time_limit_ms` and, on success, persists one
/// schedule per group. Nothing is written unless the timetable is complete
/// and valid.
pub fn run_planning<S, K>(
    source: &S,
    sink: &K,
    planning_id: &str,
    requester: Option<&str>,
    config: &SolverConfig,
) -> Result<Timetable, SchedulingError>
where
    S: CatalogSource + ?Sized,
    K: ScheduleSink + ?Sized,
{
    let deadline = Instant::now() + config.time_limit();
    let catalog = ResourceCatalog::load(source, planning_id, requester)?;
    let model = ConstraintModel::build(catalog)?;
    let timetable = AssignmentEngine::new(config.clone()).solve(&model, deadline)?;
    persist(sink, model.catalog(), &timetable)?;
    Ok(timetable)
}

/// Stores a complete timetable as per-group schedules.
///
/// Rejects timetables that are not `Complete` and re-validates before
/// writing, so the store never receives a conflicting schedule.
pub fn persist<K: ScheduleSink + ?Sized>(
    sink: &K,
    catalog: &ResourceCatalog,
    timetable: &Timetable,
) -> Result<(), SchedulingError> {
    if timetable.state() != ScheduleState::Complete {
        return Err(SchedulingError::InvalidTransition {
            from: timetable.state(),
            to: ScheduleState::Complete,
        });
    }
    let violations = Validator::new(catalog).validate(timetable);
    if !violations.is_empty() {
        warn!(
            planning_id = %timetable.planning_id,
            violations = violations.len(),
            "refusing to store an invalid timetable"
        );
        return Err(SchedulingError::ConstraintViolation(violations));
    }
    let schedules = timetable.schedules();
    sink.store_schedules(&timetable.planning_id, &schedules)?;
    info!(
        planning_id = %timetable.planning_id,
        groups = schedules.len(),
        sessions = timetable.len(),
        "schedules stored"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Dataset, Link, MemoryStore};
    use crate::engine::UnsatisfiableReason;
    use crate::models::{
        Classroom, Group, Module, Planning, SessionType, SlotTemplate, Teacher, ViolationType,
    };
    use crate::test_support::{init_tracing, single_module_catalog};
    use std::collections::BTreeMap;

    fn dataset(open_slots: usize) -> Dataset {
        Dataset {
            plannings: vec![
                Planning::new("P1").with_term(2, 1),
                Planning::new("P2").with_owner("alice"),
            ],
            groups: vec![
                Group::new("G1", 1).in_planning("P1"),
                Group::new("G2", 2).in_planning("P1"),
                Group::new("G9", 9).in_planning("P2"),
            ],
            modules: vec![Module::new("ALGO").with_hours(SessionType::Lecture, 1.5)],
            teachers: vec![Teacher::new("T1", 6.0)],
            classrooms: vec![Classroom::lecture_hall("A1", 1)],
            module_plannings: vec![Link::new("ALGO", "P1"), Link::new("ALGO", "P2")],
            teacher_plannings: vec![Link::new("T1", "P1"), Link::new("T1", "P2")],
            classroom_plannings: vec![Link::new("A1", "P1"), Link::new("A1", "P2")],
            teacher_modules: vec![Link::new("T1", "ALGO")],
            slot_templates: BTreeMap::from([
                (
                    "P1".to_string(),
                    SlotTemplate::standard_week().into_iter().take(open_slots).collect(),
                ),
                ("P2".to_string(), SlotTemplate::standard_week()),
            ]),
        }
    }

    #[test]
    fn test_run_planning_stores_group_schedules() {
        init_tracing();
        let store = MemoryStore::new(dataset(2));
        let tt = run_planning(&store, &store, "P1", None, &SolverConfig::default()).unwrap();
        assert_eq!(tt.state(), ScheduleState::Complete);
        assert_eq!(tt.len(), 2);

        let stored = store.stored_schedules("P1");
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].group_id, "G1");
        assert_eq!(stored[1].group_id, "G2");
        assert!(stored.iter().all(|s| s.time_slots.len() == 1));
    }

    #[test]
    fn test_run_planning_unsatisfiable_stores_nothing() {
        let store = MemoryStore::new(dataset(1));
        let err = run_planning(&store, &store, "P1", None, &SolverConfig::default()).unwrap_err();
        match err {
            SchedulingError::Unsatisfiable(ref u) => {
                assert_eq!(u.reason, UnsatisfiableReason::Exhausted)
            }
            ref other => panic!("unexpected error {other:?}"),
        }
        assert!(err.is_retryable());
        assert!(store.stored_schedules("P1").is_empty());
    }

    #[test]
    fn test_run_planning_respects_ownership() {
        let store = MemoryStore::new(dataset(2));
        let err = run_planning(&store, &store, "P2", Some("bob"), &SolverConfig::default())
            .unwrap_err();
        assert!(matches!(err, SchedulingError::NotFound { entity: "planning", .. }));

        let tt = run_planning(&store, &store, "P2", Some("alice"), &SolverConfig::default())
            .unwrap();
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_persist_rejects_incomplete() {
        let store = MemoryStore::default();
        let catalog = single_module_catalog(1);
        let err = persist(&store, &catalog, &Timetable::new("P1")).unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::InvalidTransition {
                from: ScheduleState::Empty,
                to: ScheduleState::Complete
            }
        ));
    }

    #[test]
    fn test_persist_rejects_invalid() {
        let store = MemoryStore::default();
        let catalog = single_module_catalog(1);
        let template = &catalog.slot_templates[0];
        let slot = crate::models::TimeSlot::new(template, SessionType::Lecture, "ALGO", "G1")
            .assign_classroom("A1")
            .assign_teacher("T1");
        let mut tt = Timetable::from_slots("P1", vec![slot.clone(), slot]);
        tt.complete().unwrap();

        let err = persist(&store, &catalog, &tt).unwrap_err();
        match err {
            SchedulingError::ConstraintViolation(violations) => {
                assert!(violations
                    .iter()
                    .any(|v| v.violation_type == ViolationType::ClassroomConflict));
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(store.stored_schedules("P1").is_empty());
    }
}
