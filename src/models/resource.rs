//! Teaching resources: teachers and classrooms.
//!
//! Both are disjunctive resources: each can serve at most one session
//! per period. Teachers additionally carry an hour budget, a set of
//! modules they are qualified for, and soft availability preferences.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::time::hours_to_minutes;
use super::{Availability, SessionType};

/// A teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    /// Unique teacher identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Account that created the record.
    #[serde(default)]
    pub owner: Option<String>,
    /// Total hours the teacher can give over the week.
    pub hours: f64,
    /// Modules the teacher may teach.
    #[serde(default)]
    pub modules: BTreeSet<String>,
    /// Soft availability preferences.
    #[serde(default)]
    pub availability: Availability,
}

impl Teacher {
    /// Creates a teacher with an hour budget.
    pub fn new(id: impl Into<String>, hours: f64) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            owner: None,
            hours,
            modules: BTreeSet::new(),
            availability: Availability::default(),
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the owner.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Adds a module the teacher is qualified for.
    pub fn with_module(mut self, module_id: impl Into<String>) -> Self {
        self.modules.insert(module_id.into());
        self
    }

    /// Sets the availability preferences.
    pub fn with_availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Whether the teacher may teach a module.
    pub fn can_teach(&self, module_id: &str) -> bool {
        self.modules.contains(module_id)
    }

    /// Hour budget in minutes.
    pub fn available_minutes(&self) -> u32 {
        hours_to_minutes(self.hours)
    }
}

/// Classroom classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClassroomType {
    /// Tutorial room ("TD").
    Tutorial,
    /// Lab ("TP").
    Lab,
    /// Lecture hall ("AMPHI").
    LectureHall,
}

impl ClassroomType {
    /// Whether sessions of `session_type` may be held in this room type.
    pub fn accepts(&self, session_type: SessionType) -> bool {
        matches!(
            (self, session_type),
            (ClassroomType::LectureHall, SessionType::Lecture)
                | (ClassroomType::Tutorial, SessionType::Tutorial)
                | (ClassroomType::Lab, SessionType::Lab)
        )
    }

    /// Short code used in exported timetables.
    pub fn code(&self) -> &'static str {
        match self {
            ClassroomType::Tutorial => "TD",
            ClassroomType::Lab => "TP",
            ClassroomType::LectureHall => "AMPHI",
        }
    }
}

impl fmt::Display for ClassroomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A classroom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classroom {
    /// Unique classroom identifier.
    pub id: String,
    /// Room number.
    pub number: i32,
    /// Room type.
    pub classroom_type: ClassroomType,
}

impl Classroom {
    /// Creates a classroom.
    pub fn new(id: impl Into<String>, number: i32, classroom_type: ClassroomType) -> Self {
        Self {
            id: id.into(),
            number,
            classroom_type,
        }
    }

    /// Creates a lecture hall.
    pub fn lecture_hall(id: impl Into<String>, number: i32) -> Self {
        Self::new(id, number, ClassroomType::LectureHall)
    }

    /// Creates a tutorial room.
    pub fn tutorial(id: impl Into<String>, number: i32) -> Self {
        Self::new(id, number, ClassroomType::Tutorial)
    }

    /// Creates a lab.
    pub fn lab(id: impl Into<String>, number: i32) -> Self {
        Self::new(id, number, ClassroomType::Lab)
    }

    /// Whether a session type may use this room.
    pub fn accepts(&self, session_type: SessionType) -> bool {
        self.classroom_type.accepts(session_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teacher_builder() {
        let t = Teacher::new("T1", 12.0)
            .with_name("Dr. Benali")
            .with_module("ALGO")
            .with_module("DB");

        assert!(t.can_teach("ALGO"));
        assert!(t.can_teach("DB"));
        assert!(!t.can_teach("OS"));
        assert_eq!(t.available_minutes(), 720);
        assert!(t.availability.is_unconstrained());
    }

    #[test]
    fn test_classroom_compatibility() {
        assert!(Classroom::lecture_hall("A1", 1).accepts(SessionType::Lecture));
        assert!(!Classroom::lecture_hall("A1", 1).accepts(SessionType::Lab));
        assert!(Classroom::tutorial("S1", 10).accepts(SessionType::Tutorial));
        assert!(!Classroom::tutorial("S1", 10).accepts(SessionType::Lecture));
        assert!(Classroom::lab("L1", 20).accepts(SessionType::Lab));
        assert!(!Classroom::lab("L1", 20).accepts(SessionType::Tutorial));
    }

    #[test]
    fn test_classroom_codes() {
        assert_eq!(ClassroomType::LectureHall.to_string(), "AMPHI");
        assert_eq!(ClassroomType::Lab.code(), "TP");
    }
}
