//! Module (course unit) model.
//!
//! A module declares how many hours of each session type it needs per
//! group. Missing hours mean the module has no sessions of that type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::time::hours_to_minutes;

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionType {
    /// Lecture ("COURS"), held in a lecture hall.
    Lecture,
    /// Tutorial ("TD"), held in a tutorial room.
    Tutorial,
    /// Practical lab ("TP"), held in a lab.
    Lab,
}

impl SessionType {
    /// All session types in canonical order.
    pub const ALL: [SessionType; 3] = [SessionType::Lecture, SessionType::Tutorial, SessionType::Lab];

    /// Short code used in exported timetables.
    pub fn code(&self) -> &'static str {
        match self {
            SessionType::Lecture => "COURS",
            SessionType::Tutorial => "TD",
            SessionType::Lab => "TP",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Declared hours per session type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionHours {
    #[serde(default)]
    pub lecture: Option<f64>,
    #[serde(default)]
    pub tutorial: Option<f64>,
    #[serde(default)]
    pub lab: Option<f64>,
}

impl SessionHours {
    /// Hours declared for a session type (0.0 if unset).
    pub fn get(&self, session_type: SessionType) -> f64 {
        match session_type {
            SessionType::Lecture => self.lecture,
            SessionType::Tutorial => self.tutorial,
            SessionType::Lab => self.lab,
        }
        .unwrap_or(0.0)
    }

    /// Sets the hours for a session type.
    pub fn set(&mut self, session_type: SessionType, hours: f64) {
        let slot = match session_type {
            SessionType::Lecture => &mut self.lecture,
            SessionType::Tutorial => &mut self.tutorial,
            SessionType::Lab => &mut self.lab,
        };
        *slot = Some(hours);
    }
}

/// A course unit taught to every group of the plannings it is offered in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    /// Unique module identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Curriculum author.
    #[serde(default)]
    pub owner: Option<String>,
    /// Required hours per group, by session type.
    #[serde(default)]
    pub hours: SessionHours,
}

impl Module {
    /// Creates a module with no hours.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            owner: None,
            hours: SessionHours::default(),
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

    /// Declares hours for a session type.
    pub fn with_hours(mut self, session_type: SessionType, hours: f64) -> Self {
        self.hours.set(session_type, hours);
        self
    }

    /// Declared hours for a session type.
    pub fn hours_for(&self, session_type: SessionType) -> f64 {
        self.hours.get(session_type)
    }

    /// Declared minutes for a session type.
    pub fn minutes_for(&self, session_type: SessionType) -> u32 {
        hours_to_minutes(self.hours_for(session_type))
    }

    /// Session types this module actually needs (declared minutes > 0).
    pub fn required_session_types(&self) -> Vec<SessionType> {
        SessionType::ALL
            .into_iter()
            .filter(|&t| self.minutes_for(t) > 0)
            .collect()
    }
}
