//! Open slot templates and assigned time slots.

use serde::{Deserialize, Serialize};

use super::{Day, Period, SessionType, TimeRange};

/// An open weekly period in which sessions may be placed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotTemplate {
    /// Unique template identifier.
    pub id: String,
    /// Day of the week.
    pub day: Day,
    /// Time range.
    pub range: TimeRange,
    /// Restricts the template to one session type. `None` = any type.
    #[serde(default)]
    pub session_type: Option<SessionType>,
}

impl SlotTemplate {
    /// Creates an unrestricted template.
    pub fn new(id: impl Into<String>, day: Day, range: TimeRange) -> Self {
        Self {
            id: id.into(),
            day,
            range,
            session_type: None,
        }
    }

    /// Restricts the template to a session type.
    pub fn only(mut self, session_type: SessionType) -> Self {
        self.session_type = Some(session_type);
        self
    }

    /// The template's period.
    pub fn period(&self) -> Period {
        Period::new(self.day, self.range)
    }

    /// Duration in minutes.
    pub fn duration_minutes(&self) -> u32 {
        self.range.duration_minutes()
    }

    /// Whether a session of `session_type` may use this template.
    pub fn admits(&self, session_type: SessionType) -> bool {
        self.session_type.map_or(true, |t| t == session_type)
    }

    /// The standard teaching grid: six 90-minute periods, Saturday to Thursday.
    ///
    /// Template ids are `"<day>-<period index>"`, e.g. `"Monday-0"`.
    pub fn standard_week() -> Vec<SlotTemplate> {
        Day::TEACHING_WEEK
            .iter()
            .flat_map(|&day| {
                TimeRange::standard_periods()
                    .into_iter()
                    .enumerate()
                    .map(move |(i, range)| SlotTemplate::new(format!("{day}-{i}"), day, range))
            })
            .collect()
    }
}

/// A session placed in the timetable.
///
/// Binds one (day, time range, session type) to exactly one module,
/// classroom, teacher and group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub day: Day,
    pub range: TimeRange,
    pub session_type: SessionType,
    pub module_id: String,
    pub group_id: String,
    pub classroom_id: String,
    pub teacher_id: String,
    /// Template the slot was placed in.
    pub template_id: String,
}

impl TimeSlot {
    /// Creates a time slot in a template.
    pub fn new(
        template: &SlotTemplate,
        session_type: SessionType,
        module_id: impl Into<String>,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            day: template.day,
            range: template.range,
            session_type,
            module_id: module_id.into(),
            group_id: group_id.into(),
            classroom_id: String::new(),
            teacher_id: String::new(),
            template_id: template.id.clone(),
        }
    }

    /// Assigns the classroom.
    pub fn assign_classroom(mut self, classroom_id: impl Into<String>) -> Self {
        self.classroom_id = classroom_id.into();
        self
    }

    /// Assigns the teacher.
    pub fn assign_teacher(mut self, teacher_id: impl Into<String>) -> Self {
        self.teacher_id = teacher_id.into();
        self
    }

    /// The slot's period.
    pub fn period(&self) -> Period {
        Period::new(self.day, self.range)
    }

    /// Duration in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        self.range.duration_minutes()
    }

    /// Whether two slots occupy overlapping periods.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.range.overlaps(&other.range)
    }
}
