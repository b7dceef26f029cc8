//! Timetable validation.
//!
//! Re-checks every hard constraint against a timetable, independently of
//! how it was built. The engine uses it twice: incrementally after each
//! tentative placement ([`Validator::check_latest`]) and as a final gate
//! before a timetable is reported complete ([`Validator::validate`]).
//!
//! # Checks
//! - references: module, group, classroom and teacher exist in the catalog
//! - the module declares hours for the session type
//! - the classroom type accepts the session type
//! - the teacher is qualified for the module
//! - no classroom, teacher or group is used by two overlapping sessions
//! - per (module, group, type), scheduled minutes do not exceed declared
//! - per teacher, assigned minutes do not exceed the budget
//!
//! Output order is deterministic: per-slot checks in slot order, then
//! conflicts by slot pair, then hour totals sorted by key.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::catalog::ResourceCatalog;
use crate::models::{
    minutes_to_hours, Classroom, Module, SessionType, Teacher, TimeSlot, Timetable, Violation,
    ViolationType,
};

/// Checks timetables against one catalog.
#[derive(Debug)]
pub struct Validator<'a> {
    modules: HashMap<&'a str, &'a Module>,
    teachers: HashMap<&'a str, &'a Teacher>,
    classrooms: HashMap<&'a str, &'a Classroom>,
    groups: HashSet<&'a str>,
}

impl<'a> Validator<'a> {
    /// Indexes a catalog.
    pub fn new(catalog: &'a ResourceCatalog) -> Self {
        Self {
            modules: catalog.modules.iter().map(|m| (m.id.as_str(), m)).collect(),
            teachers: catalog.teachers.iter().map(|t| (t.id.as_str(), t)).collect(),
            classrooms: catalog.classrooms.iter().map(|c| (c.id.as_str(), c)).collect(),
            groups: catalog.groups.iter().map(|g| g.id.as_str()).collect(),
        }
    }

    /// Returns every violation in `timetable`; empty means valid.
    ///
    /// Each conflicting pair of sessions is reported exactly once per
    /// shared resource.
    pub fn validate(&self, timetable: &Timetable) -> Vec<Violation> {
        let slots = &timetable.time_slots;
        let mut violations = Vec::new();

        for slot in slots {
            self.check_slot(slot, &mut violations);
        }

        for (i, a) in slots.iter().enumerate() {
            for b in &slots[i + 1..] {
                check_pair(a, b, &mut violations);
            }
        }

        let mut module_minutes: BTreeMap<(&str, &str, SessionType), u32> = BTreeMap::new();
        let mut teacher_minutes: BTreeMap<&str, u32> = BTreeMap::new();
        for slot in slots {
            *module_minutes
                .entry((slot.module_id.as_str(), slot.group_id.as_str(), slot.session_type))
                .or_default() += slot.duration_minutes();
            *teacher_minutes.entry(slot.teacher_id.as_str()).or_default() += slot.duration_minutes();
        }
        for ((module_id, group_id, session_type), minutes) in module_minutes {
            self.check_module_hours(module_id, group_id, session_type, minutes, &mut violations);
        }
        for (teacher_id, minutes) in teacher_minutes {
            self.check_teacher_hours(teacher_id, minutes, &mut violations);
        }

        violations
    }

    /// Checks only the constraints touched by the most recently placed
    /// slot, assuming the rest of the timetable was already valid.
    pub fn check_latest(&self, timetable: &Timetable) -> Vec<Violation> {
        let mut violations = Vec::new();
        let Some((latest, earlier)) = timetable.time_slots.split_last() else {
            return violations;
        };

        self.check_slot(latest, &mut violations);
        for other in earlier {
            check_pair(other, latest, &mut violations);
        }

        let module_minutes: u32 = timetable
            .time_slots
            .iter()
            .filter(|s| {
                s.module_id == latest.module_id
                    && s.group_id == latest.group_id
                    && s.session_type == latest.session_type
            })
            .map(|s| s.duration_minutes())
            .sum();
        self.check_module_hours(
            &latest.module_id,
            &latest.group_id,
            latest.session_type,
            module_minutes,
            &mut violations,
        );
        self.check_teacher_hours(
            &latest.teacher_id,
            timetable.teacher_minutes(&latest.teacher_id),
            &mut violations,
        );

        violations
    }

    fn check_slot(&self, slot: &TimeSlot, out: &mut Vec<Violation>) {
        let references = [
            ("group", slot.group_id.as_str(), self.groups.contains(slot.group_id.as_str())),
            ("module", slot.module_id.as_str(), self.modules.contains_key(slot.module_id.as_str())),
            (
                "teacher",
                slot.teacher_id.as_str(),
                self.teachers.contains_key(slot.teacher_id.as_str()),
            ),
            (
                "classroom",
                slot.classroom_id.as_str(),
                self.classrooms.contains_key(slot.classroom_id.as_str()),
            ),
        ];
        for (entity, id, known) in references {
            if !known {
                out.push(Violation::new(
                    ViolationType::UnknownReference,
                    vec![id.to_string()],
                    format!("Session at {} references unknown {entity} '{id}'", slot.period()),
                ));
            }
        }

        if let Some(module) = self.modules.get(slot.module_id.as_str()) {
            if module.minutes_for(slot.session_type) == 0 {
                out.push(Violation::new(
                    ViolationType::SessionTypeMismatch,
                    vec![slot.module_id.clone(), slot.group_id.clone()],
                    format!(
                        "Module '{}' has no {} hours (session at {})",
                        slot.module_id,
                        slot.session_type,
                        slot.period()
                    ),
                ));
            }
        }

        if let Some(classroom) = self.classrooms.get(slot.classroom_id.as_str()) {
            if !classroom.accepts(slot.session_type) {
                out.push(Violation::new(
                    ViolationType::ClassroomTypeMismatch,
                    vec![slot.classroom_id.clone()],
                    format!(
                        "Classroom '{}' ({}) cannot host a {} session",
                        slot.classroom_id,
                        classroom.classroom_type.code(),
                        slot.session_type
                    ),
                ));
            }
        }

        if let Some(teacher) = self.teachers.get(slot.teacher_id.as_str()) {
            if self.modules.contains_key(slot.module_id.as_str())
                && !teacher.can_teach(&slot.module_id)
            {
                out.push(Violation::new(
                    ViolationType::TeacherNotQualified,
                    vec![slot.teacher_id.clone(), slot.module_id.clone()],
                    format!(
                        "Teacher '{}' is not qualified for module '{}'",
                        slot.teacher_id, slot.module_id
                    ),
                ));
            }
        }
    }

    fn check_module_hours(
        &self,
        module_id: &str,
        group_id: &str,
        session_type: SessionType,
        minutes: u32,
        out: &mut Vec<Violation>,
    ) {
        let Some(module) = self.modules.get(module_id) else {
            return;
        };
        let declared = module.minutes_for(session_type);
        // A zero declaration is already reported as a type mismatch.
        if declared > 0 && minutes > declared {
            out.push(Violation::new(
                ViolationType::ModuleHoursExceeded,
                vec![module_id.to_string(), group_id.to_string()],
                format!(
                    "Module '{module_id}' {session_type} for group '{group_id}': {:.2}h scheduled, {:.2}h declared",
                    minutes_to_hours(minutes),
                    minutes_to_hours(declared)
                ),
            ));
        }
    }

    fn check_teacher_hours(&self, teacher_id: &str, minutes: u32, out: &mut Vec<Violation>) {
        let Some(teacher) = self.teachers.get(teacher_id) else {
            return;
        };
        let budget = teacher.available_minutes();
        if minutes > budget {
            out.push(Violation::new(
                ViolationType::TeacherHoursExceeded,
                vec![teacher_id.to_string()],
                format!(
                    "Teacher '{teacher_id}': {:.2}h assigned, {:.2}h available",
                    minutes_to_hours(minutes),
                    minutes_to_hours(budget)
                ),
            ));
        }
    }
}

fn check_pair(a: &TimeSlot, b: &TimeSlot, out: &mut Vec<Violation>) {
    if !a.overlaps(b) {
        return;
    }
    let shared = [
        (ViolationType::ClassroomConflict, "Classroom", &a.classroom_id, &b.classroom_id),
        (ViolationType::TeacherConflict, "Teacher", &a.teacher_id, &b.teacher_id),
        (ViolationType::GroupConflict, "Group", &a.group_id, &b.group_id),
    ];
    for (violation_type, label, x, y) in shared {
        if x == y {
            out.push(Violation::new(
                violation_type,
                vec![x.clone()],
                format!(
                    "{label} '{x}' double-booked: {} {} at {} and {} {} at {}",
                    a.module_id,
                    a.session_type,
                    a.period(),
                    b.module_id,
                    b.session_type,
                    b.period()
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SlotTemplate};
    use crate::test_support::{template, two_group_catalog};

    fn slot(
        template: &SlotTemplate,
        session_type: SessionType,
        module: &str,
        group: &str,
        classroom: &str,
        teacher: &str,
    ) -> TimeSlot {
        TimeSlot::new(template, session_type, module, group)
            .assign_classroom(classroom)
            .assign_teacher(teacher)
    }

    fn sat0() -> SlotTemplate {
        template("sat-0", Day::Saturday, (8, 0), (9, 30))
    }

    fn sun0() -> SlotTemplate {
        template("sun-0", Day::Sunday, (8, 0), (9, 30))
    }

    #[test]
    fn test_valid_timetable() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Lecture, "ALGO", "G1", "A1", "T1"),
                slot(&sat0(), SessionType::Tutorial, "DB", "G2", "S1", "T2"),
            ],
        );
        assert!(v.validate(&tt).is_empty());
        assert!(v.check_latest(&tt).is_empty());
    }

    #[test]
    fn test_double_booked_classroom_reported_once() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Tutorial, "ALGO", "G1", "S1", "T1"),
                slot(&sat0(), SessionType::Tutorial, "DB", "G2", "S1", "T2"),
            ],
        );
        let violations = v.validate(&tt);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::ClassroomConflict);
        assert_eq!(violations[0].entity_ids, vec!["S1".to_string()]);
    }

    #[test]
    fn test_partial_overlap_is_conflict() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let late = template("x", Day::Saturday, (9, 0), (10, 30));
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Lecture, "ALGO", "G1", "A1", "T1"),
                slot(&late, SessionType::Tutorial, "ALGO", "G2", "S1", "T1"),
            ],
        );
        let violations = v.validate(&tt);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::TeacherConflict);
    }

    #[test]
    fn test_same_slot_same_everything() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let s = slot(&sat0(), SessionType::Tutorial, "DB", "G1", "S1", "T2");
        let tt = Timetable::from_slots("P1", vec![s.clone(), s]);
        let types: Vec<ViolationType> = v.validate(&tt).iter().map(|x| x.violation_type).collect();
        assert_eq!(
            types,
            vec![
                ViolationType::ClassroomConflict,
                ViolationType::TeacherConflict,
                ViolationType::GroupConflict,
                ViolationType::ModuleHoursExceeded,
            ]
        );
    }

    #[test]
    fn test_type_and_qualification_mismatches() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                // DB has no lecture hours; S1 is not a lecture hall; T1 does not teach DB.
                slot(&sat0(), SessionType::Lecture, "DB", "G1", "S1", "T1"),
            ],
        );
        let types: Vec<ViolationType> = v.validate(&tt).iter().map(|x| x.violation_type).collect();
        assert_eq!(
            types,
            vec![
                ViolationType::SessionTypeMismatch,
                ViolationType::ClassroomTypeMismatch,
                ViolationType::TeacherNotQualified,
            ]
        );
    }

    #[test]
    fn test_unknown_references() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![slot(&sat0(), SessionType::Lecture, "GHOST", "G9", "A1", "T1")],
        );
        let violations = v.validate(&tt);
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|x| x.violation_type == ViolationType::UnknownReference));
        assert_eq!(violations[0].entity_ids, vec!["G9".to_string()]);
        assert_eq!(violations[1].entity_ids, vec!["GHOST".to_string()]);
    }

    #[test]
    fn test_hours_exceeded() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Lecture, "ALGO", "G1", "A1", "T1"),
                slot(&sun0(), SessionType::Lecture, "ALGO", "G1", "A1", "T1"),
            ],
        );
        let violations = v.validate(&tt);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::ModuleHoursExceeded);
        assert_eq!(
            violations[0].entity_ids,
            vec!["ALGO".to_string(), "G1".to_string()]
        );

        let incremental = v.check_latest(&tt);
        assert_eq!(incremental.len(), 1);
        assert_eq!(incremental[0].violation_type, ViolationType::ModuleHoursExceeded);
    }

    #[test]
    fn test_teacher_budget() {
        let catalog = two_group_catalog().with_teacher(
            crate::models::Teacher::new("T3", 1.0).with_module("ALGO"),
        );
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![slot(&sat0(), SessionType::Lecture, "ALGO", "G1", "A1", "T3")],
        );
        let violations = v.validate(&tt);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::TeacherHoursExceeded);
        assert_eq!(v.check_latest(&tt), violations);
    }

    #[test]
    fn test_check_latest_only_looks_at_last_slot() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Tutorial, "ALGO", "G1", "S1", "T1"),
                slot(&sat0(), SessionType::Tutorial, "DB", "G2", "S1", "T2"),
                slot(&sun0(), SessionType::Lecture, "ALGO", "G2", "A1", "T1"),
            ],
        );
        assert_eq!(v.validate(&tt).len(), 1);
        assert!(v.check_latest(&tt).is_empty());
        assert!(v.check_latest(&Timetable::new("P1")).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let catalog = two_group_catalog();
        let v = Validator::new(&catalog);
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot(&sat0(), SessionType::Tutorial, "ALGO", "G1", "S1", "T1"),
                slot(&sat0(), SessionType::Tutorial, "DB", "G1", "S1", "T1"),
                slot(&sun0(), SessionType::Lab, "OS", "G1", "L1", "T9"),
            ],
        );
        let first = v.validate(&tt);
        assert!(!first.is_empty());
        assert_eq!(first, v.validate(&tt));
    }
}
