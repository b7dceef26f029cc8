//! Teacher availability windows.
//!
//! Availability is a soft preference: the engine tries to honor it when
//! ordering candidates, and the KPI report counts sessions that break it,
//! but it never makes a timetable invalid.
//!
//! # Precedence
//! Blocked periods override windows. A period is preferred iff:
//! - It lies inside at least one `windows` entry (or no windows are set), AND
//! - It does NOT overlap any `blocked` entry.

use serde::{Deserialize, Serialize};

use super::Period;

/// Weekly availability preferences.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    /// Periods the teacher prefers to teach in. Empty = any time.
    #[serde(default)]
    pub windows: Vec<Period>,
    /// Periods the teacher would rather not teach in.
    #[serde(default)]
    pub blocked: Vec<Period>,
}

impl Availability {
    /// No preferences (always available).
    pub fn always() -> Self {
        Self::default()
    }

    /// Adds a preferred window.
    pub fn with_window(mut self, period: Period) -> Self {
        self.windows.push(period);
        self
    }

    /// Adds a blocked period.
    pub fn with_blocked(mut self, period: Period) -> Self {
        self.blocked.push(period);
        self
    }

    /// Whether a session in `period` respects these preferences.
    pub fn allows(&self, period: &Period) -> bool {
        if self.blocked.iter().any(|b| b.overlaps(period)) {
            return false;
        }
        if self.windows.is_empty() {
            return true;
        }
        self.windows
            .iter()
            .any(|w| w.day == period.day && w.range.covers(&period.range))
    }

    /// Whether any preference is set at all.
    pub fn is_unconstrained(&self) -> bool {
        self.windows.is_empty() && self.blocked.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, TimeRange};

    fn morning(day: Day) -> Period {
        Period::new(day, TimeRange::hm((8, 0), (12, 30)))
    }

    fn first_period(day: Day) -> Period {
        Period::new(day, TimeRange::hm((8, 0), (9, 30)))
    }

    #[test]
    fn test_unconstrained_allows_everything() {
        let a = Availability::always();
        assert!(a.is_unconstrained());
        assert!(a.allows(&first_period(Day::Monday)));
    }

    #[test]
    fn test_window_must_cover_period() {
        let a = Availability::always().with_window(morning(Day::Monday));
        assert!(a.allows(&first_period(Day::Monday)));
        assert!(!a.allows(&first_period(Day::Sunday)));
        let afternoon = Period::new(Day::Monday, TimeRange::hm((12, 0), (13, 30)));
        assert!(!a.allows(&afternoon));
    }

    #[test]
    fn test_blocked_overrides_window() {
        let a = Availability::always()
            .with_window(morning(Day::Monday))
            .with_blocked(Period::new(Day::Monday, TimeRange::hm((9, 0), (10, 0))));
        assert!(!a.allows(&first_period(Day::Monday)));
        let later = Period::new(Day::Monday, TimeRange::hm((11, 0), (12, 30)));
        assert!(a.allows(&later));
    }
}
