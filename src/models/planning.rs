//! Planning (academic term) and student groups.

use serde::{Deserialize, Serialize};

/// One academic term's scheduling context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planning {
    /// Unique planning identifier.
    pub id: String,
    /// User who authored the planning, if any.
    #[serde(default)]
    pub owner: Option<String>,
    /// Study year (1, 2, 3, ...).
    #[serde(default)]
    pub grade: Option<i32>,
    /// Semester within the school year.
    #[serde(default)]
    pub semester: Option<i32>,
    /// School year label, e.g. "2024/2025".
    #[serde(default)]
    pub school_year: String,
    /// Speciality (programme) name.
    #[serde(default)]
    pub speciality: Option<String>,
}

impl Planning {
    /// Creates a planning with only an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            grade: None,
            semester: None,
            school_year: String::new(),
            speciality: None,
        }
    }

    /// Sets the owning user.
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    /// Sets grade and semester.
    pub fn with_term(mut self, grade: i32, semester: i32) -> Self {
        self.grade = Some(grade);
        self.semester = Some(semester);
        self
    }

    /// Sets the school year label.
    pub fn with_school_year(mut self, school_year: impl Into<String>) -> Self {
        self.school_year = school_year.into();
        self
    }

    /// Sets the speciality.
    pub fn with_speciality(mut self, speciality: impl Into<String>) -> Self {
        self.speciality = Some(speciality.into());
        self
    }

    /// Whether `user` may load this planning.
    ///
    /// Unowned plannings are visible to everyone.
    pub fn is_visible_to(&self, user: Option<&str>) -> bool {
        match (&self.owner, user) {
            (None, _) => true,
            (Some(owner), Some(user)) => owner == user,
            (Some(_), None) => false,
        }
    }
}

/// A cohort of students under a planning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: String,
    /// Group number within the planning.
    pub number: i32,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Owning planning. `None` = orphaned.
    #[serde(default)]
    pub planning_id: Option<String>,
}

impl Group {
    /// Creates a group.
    pub fn new(id: impl Into<String>, number: i32) -> Self {
        Self {
            id: id.into(),
            number,
            name: None,
            planning_id: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches the group to a planning.
    pub fn in_planning(mut self, planning_id: impl Into<String>) -> Self {
        self.planning_id = Some(planning_id.into());
        self
    }

    /// Display label: the name if set, otherwise "G<number>".
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("G{}", self.number))
    }
}
