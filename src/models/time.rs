//! Weekly time model.
//!
//! Timetables repeat every week, so time is a `(Day, TimeRange)` pair
//! rather than an absolute timestamp. Ranges are minutes since midnight,
//! half-open `[start, end)`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchedulingError;

/// Teaching day.
///
/// Variant order is the academic week order (Saturday first), which is
/// also the `Ord` used to sort timetables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Day {
    Saturday,
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// The six teaching days of the standard week (Saturday to Thursday).
    pub const TEACHING_WEEK: [Day; 6] = [
        Day::Saturday,
        Day::Sunday,
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
    ];
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A time-of-day interval `[start_minute, end_minute)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start, minutes since midnight (inclusive).
    pub start_minute: u16,
    /// End, minutes since midnight (exclusive).
    pub end_minute: u16,
}

impl TimeRange {
    /// Creates a range from minute offsets.
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    /// Creates a range from `(hour, minute)` pairs.
    pub fn hm(start: (u16, u16), end: (u16, u16)) -> Self {
        Self::new(start.0 * 60 + start.1, end.0 * 60 + end.1)
    }

    /// Duration in minutes (0 for inverted ranges).
    #[inline]
    pub fn duration_minutes(&self) -> u32 {
        u32::from(self.end_minute.saturating_sub(self.start_minute))
    }

    /// Whether the range is non-empty and ends before midnight.
    pub fn is_well_formed(&self) -> bool {
        self.start_minute < self.end_minute && self.end_minute <= 24 * 60
    }

    /// Whether two ranges share at least one minute.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }

    /// Whether `other` lies entirely inside this range.
    #[inline]
    pub fn covers(&self, other: &Self) -> bool {
        self.start_minute <= other.start_minute && other.end_minute <= self.end_minute
    }

    /// The six 90-minute teaching periods between 08:00 and 17:00.
    pub fn standard_periods() -> [TimeRange; 6] {
        [
            TimeRange::hm((8, 0), (9, 30)),
            TimeRange::hm((9, 30), (11, 0)),
            TimeRange::hm((11, 0), (12, 30)),
            TimeRange::hm((12, 30), (14, 0)),
            TimeRange::hm((14, 0), (15, 30)),
            TimeRange::hm((15, 30), (17, 0)),
        ]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start_minute / 60,
            self.start_minute % 60,
            self.end_minute / 60,
            self.end_minute % 60
        )
    }
}

/// Parses `"08:00-09:30"` as well as the legacy `"8h:00-9h:30"` form.
impl FromStr for TimeRange {
    type Err = SchedulingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SchedulingError::InvalidTimeRange(s.to_string());
        let (start, end) = s.split_once('-').ok_or_else(invalid)?;
        let start = parse_clock(start).ok_or_else(invalid)?;
        let end = parse_clock(end).ok_or_else(invalid)?;
        let range = TimeRange::new(start, end);
        if !range.is_well_formed() {
            return Err(invalid());
        }
        Ok(range)
    }
}

fn parse_clock(s: &str) -> Option<u16> {
    let cleaned: String = s.trim().chars().filter(|c| *c != 'h').collect();
    let (h, m) = cleaned.split_once(':')?;
    let h: u16 = h.parse().ok()?;
    let m: u16 = m.parse().ok()?;
    (h < 24 && m < 60).then_some(h * 60 + m)
}

/// A weekly period: a day plus a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub day: Day,
    pub range: TimeRange,
}

impl Period {
    /// Creates a period.
    pub fn new(day: Day, range: TimeRange) -> Self {
        Self { day, range }
    }

    /// Same day and overlapping ranges.
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day && self.range.overlaps(&other.range)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.day, self.range)
    }
}

/// Converts stored hours to whole minutes.
#[inline]
pub fn hours_to_minutes(hours: f64) -> u32 {
    if hours.is_finite() && hours > 0.0 {
        (hours * 60.0).round() as u32
    } else {
        0
    }
}

/// Converts minutes back to hours.
#[inline]
pub fn minutes_to_hours(minutes: u32) -> f64 {
    f64::from(minutes) / 60.0
}
