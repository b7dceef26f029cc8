//! Timetable (solution) model.
//!
//! A `Timetable` holds every session placed for one planning, across all
//! groups. It is what the engine builds and the validator checks. Once
//! complete, it is split into per-group `Schedule`s for storage.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::TimeSlot;
use crate::error::SchedulingError;

/// Lifecycle of a timetable under construction.
///
/// ```text
/// Empty -> Partial -> { Complete, Abandoned }
///            ^  |
///            +--+   (assign / undo)
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleState {
    #[default]
    Empty,
    Partial,
    Complete,
    Abandoned,
}

impl ScheduleState {
    /// Whether moving to `next` is a legal transition.
    pub fn can_transition_to(self, next: ScheduleState) -> bool {
        use ScheduleState::*;
        matches!(
            (self, next),
            (Empty, Partial)
                | (Empty, Complete)
                | (Empty, Abandoned)
                | (Partial, Partial)
                | (Partial, Complete)
                | (Partial, Abandoned)
        )
    }

    /// Terminal states accept no further changes.
    pub fn is_terminal(self) -> bool {
        matches!(self, ScheduleState::Complete | ScheduleState::Abandoned)
    }
}

impl fmt::Display for ScheduleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// All sessions placed for one planning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// Planning the timetable belongs to.
    pub planning_id: String,
    /// Placed sessions, in placement order.
    pub time_slots: Vec<TimeSlot>,
    state: ScheduleState,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new(planning_id: impl Into<String>) -> Self {
        Self {
            planning_id: planning_id.into(),
            time_slots: Vec::new(),
            state: ScheduleState::Empty,
        }
    }

    /// Builds a timetable directly from slots (state `Partial`, or `Empty`
    /// when no slots are given). Mainly for checking externally built
    /// timetables.
    pub fn from_slots(planning_id: impl Into<String>, time_slots: Vec<TimeSlot>) -> Self {
        let state = if time_slots.is_empty() {
            ScheduleState::Empty
        } else {
            ScheduleState::Partial
        };
        Self {
            planning_id: planning_id.into(),
            time_slots,
            state,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ScheduleState {
        self.state
    }

    /// Moves to a new state, rejecting illegal transitions.
    pub fn transition(&mut self, next: ScheduleState) -> Result<(), SchedulingError> {
        if !self.state.can_transition_to(next) {
            return Err(SchedulingError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        Ok(())
    }

    /// Appends a slot (`Empty`/`Partial` -> `Partial`).
    pub fn push(&mut self, slot: TimeSlot) -> Result<(), SchedulingError> {
        self.transition(ScheduleState::Partial)?;
        self.time_slots.push(slot);
        Ok(())
    }

    /// Removes the most recently placed slot.
    pub fn pop(&mut self) -> Result<Option<TimeSlot>, SchedulingError> {
        self.transition(ScheduleState::Partial)?;
        Ok(self.time_slots.pop())
    }

    /// Marks the timetable complete.
    pub fn complete(&mut self) -> Result<(), SchedulingError> {
        self.transition(ScheduleState::Complete)
    }

    /// Marks the timetable abandoned.
    pub fn abandon(&mut self) -> Result<(), SchedulingError> {
        self.transition(ScheduleState::Abandoned)
    }

    /// Number of placed sessions.
    pub fn len(&self) -> usize {
        self.time_slots.len()
    }

    /// Whether no session is placed.
    pub fn is_empty(&self) -> bool {
        self.time_slots.is_empty()
    }

    /// Most recently placed slot.
    pub fn last(&self) -> Option<&TimeSlot> {
        self.time_slots.last()
    }

    /// Slots of one group.
    pub fn slots_for_group(&self, group_id: &str) -> Vec<&TimeSlot> {
        self.time_slots
            .iter()
            .filter(|s| s.group_id == group_id)
            .collect()
    }

    /// Slots taught by one teacher.
    pub fn slots_for_teacher(&self, teacher_id: &str) -> Vec<&TimeSlot> {
        self.time_slots
            .iter()
            .filter(|s| s.teacher_id == teacher_id)
            .collect()
    }

    /// Slots held in one classroom.
    pub fn slots_for_classroom(&self, classroom_id: &str) -> Vec<&TimeSlot> {
        self.time_slots
            .iter()
            .filter(|s| s.classroom_id == classroom_id)
            .collect()
    }

    /// Total minutes assigned to a teacher.
    pub fn teacher_minutes(&self, teacher_id: &str) -> u32 {
        self.slots_for_teacher(teacher_id)
            .iter()
            .map(|s| s.duration_minutes())
            .sum()
    }

    /// Splits into one chronologically sorted `Schedule` per group.
    pub fn schedules(&self) -> Vec<Schedule> {
        let mut by_group: BTreeMap<&str, Vec<TimeSlot>> = BTreeMap::new();
        for slot in &self.time_slots {
            by_group
                .entry(slot.group_id.as_str())
                .or_default()
                .push(slot.clone());
        }
        by_group
            .into_iter()
            .map(|(group_id, mut time_slots)| {
                time_slots.sort();
                Schedule {
                    planning_id: self.planning_id.clone(),
                    group_id: group_id.to_string(),
                    time_slots,
                }
            })
            .collect()
    }
}

/// A group's weekly schedule; the artifact handed to storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub planning_id: String,
    pub group_id: String,
    pub time_slots: Vec<TimeSlot>,
}

impl Schedule {
    /// Total scheduled minutes.
    pub fn total_minutes(&self) -> u32 {
        self.time_slots.iter().map(|s| s.duration_minutes()).sum()
    }
}

/// A hard-constraint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending entity ids (classroom, teacher, group, module, ...).
    pub entity_ids: Vec<String>,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Two overlapping sessions share a classroom.
    ClassroomConflict,
    /// Two overlapping sessions share a teacher.
    TeacherConflict,
    /// Two overlapping sessions share a group.
    GroupConflict,
    /// The module declares no hours for the session's type.
    SessionTypeMismatch,
    /// The classroom type does not accept the session type.
    ClassroomTypeMismatch,
    /// A module's scheduled hours for a group exceed its declared hours.
    ModuleHoursExceeded,
    /// A teacher's assigned hours exceed their declared hours.
    TeacherHoursExceeded,
    /// The teacher is not qualified for the module.
    TeacherNotQualified,
    /// A slot references an entity missing from the catalog.
    UnknownReference,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        entity_ids: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        let severity = match violation_type {
            ViolationType::ClassroomConflict
            | ViolationType::TeacherConflict
            | ViolationType::GroupConflict => 95,
            ViolationType::UnknownReference => 90,
            ViolationType::SessionTypeMismatch
            | ViolationType::ClassroomTypeMismatch
            | ViolationType::TeacherNotQualified => 85,
            ViolationType::ModuleHoursExceeded | ViolationType::TeacherHoursExceeded => 80,
        };
        Self {
            violation_type,
            entity_ids,
            message: message.into(),
            severity,
        }
    }

    /// Whether the violation concerns an overlap of two sessions.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self.violation_type,
            ViolationType::ClassroomConflict
                | ViolationType::TeacherConflict
                | ViolationType::GroupConflict
        )
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.violation_type, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, SessionType, SlotTemplate, TimeRange};

    fn slot(group: &str, teacher: &str, day: Day, start_h: u16) -> TimeSlot {
        let t = SlotTemplate::new(
            format!("{day}-{start_h}"),
            day,
            TimeRange::hm((start_h, 0), (start_h + 1, 30)),
        );
        TimeSlot::new(&t, SessionType::Tutorial, "M1", group)
            .assign_classroom("S1")
            .assign_teacher(teacher)
    }

    #[test]
    fn test_state_machine() {
        let mut tt = Timetable::new("P1");
        assert_eq!(tt.state(), ScheduleState::Empty);

        tt.push(slot("G1", "T1", Day::Monday, 8)).unwrap();
        assert_eq!(tt.state(), ScheduleState::Partial);

        tt.pop().unwrap();
        assert_eq!(tt.state(), ScheduleState::Partial);

        tt.complete().unwrap();
        assert_eq!(tt.state(), ScheduleState::Complete);

        let err = tt.push(slot("G1", "T1", Day::Monday, 8)).unwrap_err();
        assert!(matches!(
            err,
            SchedulingError::InvalidTransition {
                from: ScheduleState::Complete,
                to: ScheduleState::Partial
            }
        ));
    }

    #[test]
    fn test_abandoned_is_terminal() {
        let mut tt = Timetable::new("P1");
        tt.abandon().unwrap();
        assert!(tt.state().is_terminal());
        assert!(tt.complete().is_err());
        assert!(tt.abandon().is_err());
    }

    #[test]
    fn test_schedules_split_by_group_and_sorted() {
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot("G2", "T1", Day::Monday, 8),
                slot("G1", "T1", Day::Monday, 11),
                slot("G1", "T2", Day::Saturday, 8),
            ],
        );
        let schedules = tt.schedules();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].group_id, "G1");
        assert_eq!(schedules[0].time_slots[0].day, Day::Saturday);
        assert_eq!(schedules[0].total_minutes(), 180);
        assert_eq!(schedules[1].group_id, "G2");
        assert!(schedules.iter().all(|s| s.planning_id == "P1"));
    }

    #[test]
    fn test_queries() {
        let tt = Timetable::from_slots(
            "P1",
            vec![
                slot("G1", "T1", Day::Monday, 8),
                slot("G2", "T1", Day::Monday, 11),
                slot("G1", "T2", Day::Sunday, 8),
            ],
        );
        assert_eq!(tt.slots_for_group("G1").len(), 2);
        assert_eq!(tt.slots_for_teacher("T1").len(), 2);
        assert_eq!(tt.slots_for_classroom("S1").len(), 3);
        assert_eq!(tt.teacher_minutes("T1"), 180);
        assert_eq!(tt.teacher_minutes("T9"), 0);
    }

    #[test]
    fn test_violation_severity() {
        let v = Violation::new(ViolationType::ClassroomConflict, vec!["S1".into()], "clash");
        assert_eq!(v.severity, 95);
        assert!(v.is_conflict());
        let h = Violation::new(ViolationType::TeacherHoursExceeded, vec!["T1".into()], "over");
        assert!(!h.is_conflict());
        assert!(h.to_string().contains("TeacherHoursExceeded"));
    }
}
