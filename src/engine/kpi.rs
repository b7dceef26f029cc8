//! Timetable quality metrics (KPIs).
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Scheduled minutes / required minutes |
//! | Classroom utilization | Occupied templates / open templates, per room |
//! | Teacher load | Assigned minutes / declared minutes, per teacher |
//! | Preference breaches | Sessions outside the teacher's availability |

use std::collections::{HashMap, HashSet};

use crate::constraints::ConstraintModel;
use crate::models::Timetable;

/// Timetable performance indicators.
#[derive(Debug, Clone)]
pub struct TimetableKpi {
    /// Number of placed sessions.
    pub sessions: usize,
    /// Fraction of required minutes that are scheduled (0.0..1.0).
    pub coverage_rate: f64,
    /// Per-classroom utilization (0.0..1.0).
    pub utilization_by_classroom: HashMap<String, f64>,
    /// Mean classroom utilization.
    pub avg_utilization: f64,
    /// Per-teacher load (0.0..1.0 when within budget).
    pub load_by_teacher: HashMap<String, f64>,
    /// Mean teacher load.
    pub avg_teacher_load: f64,
    /// Sessions placed outside the teacher's availability windows.
    pub preference_breaches: usize,
}

impl TimetableKpi {
    /// Computes KPIs of a timetable against the model it was built for.
    pub fn calculate(timetable: &Timetable, model: &ConstraintModel) -> Self {
        let catalog = model.catalog();

        let scheduled: u32 = timetable.time_slots.iter().map(|s| s.duration_minutes()).sum();
        let required = model.required_minutes();
        let coverage_rate = if required == 0 {
            1.0
        } else {
            f64::from(scheduled) / f64::from(required)
        };

        let open = model.template_count();
        let utilization_by_classroom: HashMap<String, f64> = catalog
            .classrooms
            .iter()
            .map(|c| {
                let used: HashSet<&str> = timetable
                    .slots_for_classroom(&c.id)
                    .iter()
                    .map(|s| s.template_id.as_str())
                    .collect();
                let rate = if open == 0 {
                    0.0
                } else {
                    used.len() as f64 / open as f64
                };
                (c.id.clone(), rate)
            })
            .collect();

        let load_by_teacher: HashMap<String, f64> = catalog
            .teachers
            .iter()
            .map(|t| {
                let budget = t.available_minutes();
                let load = if budget == 0 {
                    0.0
                } else {
                    f64::from(timetable.teacher_minutes(&t.id)) / f64::from(budget)
                };
                (t.id.clone(), load)
            })
            .collect();

        let preference_breaches = timetable
            .time_slots
            .iter()
            .filter(|s| {
                catalog
                    .teacher(&s.teacher_id)
                    .is_some_and(|t| !t.availability.allows(&s.period()))
            })
            .count();

        Self {
            sessions: timetable.len(),
            coverage_rate,
            avg_utilization: mean(utilization_by_classroom.values()),
            utilization_by_classroom,
            avg_teacher_load: mean(load_by_teacher.values()),
            load_by_teacher,
            preference_breaches,
        }
    }

    /// Whether the timetable meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_coverage: f64, max_breaches: usize) -> bool {
        self.coverage_rate >= min_coverage && self.preference_breaches <= max_breaches
    }
}

fn mean<'a>(values: impl ExactSizeIterator<Item = &'a f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        0.0
    } else {
        values.sum::<f64>() / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Availability, Day, Period, SessionType, TimeRange, TimeSlot};
    use crate::test_support::two_group_catalog;

    fn placed(model: &ConstraintModel, template: usize, module: &str, group: &str) -> TimeSlot {
        TimeSlot::new(model.template(template), SessionType::Tutorial, module, group)
            .assign_classroom("S1")
            .assign_teacher("T2")
    }

    #[test]
    fn test_kpi_partial_coverage() {
        let model = ConstraintModel::build(two_group_catalog()).unwrap();
        let tt = Timetable::from_slots(
            "P1",
            vec![placed(&model, 0, "DB", "G1"), placed(&model, 1, "DB", "G2")],
        );
        let kpi = TimetableKpi::calculate(&tt, &model);
        assert_eq!(kpi.sessions, 2);
        // 180 of 540 minutes
        assert!((kpi.coverage_rate - 1.0 / 3.0).abs() < 1e-10);
        // S1: 2 of 4 templates; A1: none
        assert!((kpi.utilization_by_classroom["S1"] - 0.5).abs() < 1e-10);
        assert!((kpi.utilization_by_classroom["A1"] - 0.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.25).abs() < 1e-10);
        // T2: 180 of 360 minutes; T1: none
        assert!((kpi.load_by_teacher["T2"] - 0.5).abs() < 1e-10);
        assert!((kpi.avg_teacher_load - 0.25).abs() < 1e-10);
        assert_eq!(kpi.preference_breaches, 0);
        assert!(!kpi.meets_thresholds(0.9, 0));
        assert!(kpi.meets_thresholds(0.3, 0));
    }

    #[test]
    fn test_kpi_preference_breaches() {
        let mut catalog = two_group_catalog();
        catalog.teachers[1].availability = Availability::always()
            .with_blocked(Period::new(Day::Saturday, TimeRange::hm((8, 0), (12, 0))));
        let model = ConstraintModel::build(catalog).unwrap();
        let tt = Timetable::from_slots(
            "P1",
            vec![placed(&model, 0, "DB", "G1"), placed(&model, 2, "DB", "G2")],
        );
        let kpi = TimetableKpi::calculate(&tt, &model);
        assert_eq!(kpi.preference_breaches, 1);
        assert!(!kpi.meets_thresholds(0.0, 0));
        assert!(kpi.meets_thresholds(0.0, 1));
    }

    #[test]
    fn test_kpi_empty() {
        let model = ConstraintModel::build(two_group_catalog()).unwrap();
        let kpi = TimetableKpi::calculate(&Timetable::new("P1"), &model);
        assert_eq!(kpi.sessions, 0);
        assert!((kpi.coverage_rate - 0.0).abs() < 1e-10);
        assert!((kpi.avg_utilization - 0.0).abs() < 1e-10);
    }
}
