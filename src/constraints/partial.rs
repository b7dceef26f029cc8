//! Partial assignment with an occupancy ledger.

use super::{Candidate, ConstraintModel};
use crate::error::SchedulingError;
use crate::models::Timetable;

/// A timetable under construction plus the bookkeeping needed to answer
/// compatibility queries in constant time.
///
/// Busy counters are indexed by `resource * templates + template`. Placing
/// a session in template `t` increments the counter of every template that
/// overlaps `t`, so a resource is free in `t` exactly when its counter for
/// `t` is zero. Assignments are undone in LIFO order.
#[derive(Debug, Clone)]
pub struct PartialSchedule {
    timetable: Timetable,
    trail: Vec<Candidate>,
    templates: usize,
    classroom_busy: Vec<u32>,
    teacher_busy: Vec<u32>,
    group_busy: Vec<u32>,
    teacher_used: Vec<u32>,
    demand_remaining: Vec<u32>,
    demand_templates: Vec<Vec<usize>>,
}

impl PartialSchedule {
    /// An empty assignment for `model`.
    pub fn new(model: &ConstraintModel) -> Self {
        let catalog = model.catalog();
        let templates = model.template_count();
        Self {
            timetable: Timetable::new(catalog.planning.id.clone()),
            trail: Vec::new(),
            templates,
            classroom_busy: vec![0; catalog.classrooms.len() * templates],
            teacher_busy: vec![0; catalog.teachers.len() * templates],
            group_busy: vec![0; catalog.groups.len() * templates],
            teacher_used: vec![0; catalog.teachers.len()],
            demand_remaining: model.demands().iter().map(|d| d.required_minutes).collect(),
            demand_templates: vec![Vec::new(); model.demands().len()],
        }
    }

    /// Places a candidate.
    ///
    /// Fails with `IncompatibleAssignment` when the candidate is not in its
    /// demand's domain or clashes with what is already placed.
    pub fn assign(
        &mut self,
        model: &ConstraintModel,
        candidate: Candidate,
    ) -> Result<(), SchedulingError> {
        let in_domain = candidate.demand < model.demands().len()
            && model.candidates(candidate.demand).contains(&candidate);
        if !in_domain {
            return Err(SchedulingError::IncompatibleAssignment(format!(
                "{candidate:?} is outside the demand's domain"
            )));
        }
        if !model.is_compatible(&candidate, self) {
            return Err(SchedulingError::IncompatibleAssignment(format!(
                "{} in template {}",
                model.demand(candidate.demand).key,
                model.template(candidate.template).id
            )));
        }
        self.timetable.push(model.to_time_slot(&candidate))?;
        self.apply(model, &candidate, true);
        self.trail.push(candidate);
        Ok(())
    }

    /// Removes the most recent assignment.
    pub fn undo(&mut self, model: &ConstraintModel) -> Result<Option<Candidate>, SchedulingError> {
        let Some(candidate) = self.trail.pop() else {
            return Ok(None);
        };
        self.timetable.pop()?;
        self.apply(model, &candidate, false);
        Ok(Some(candidate))
    }

    fn apply(&mut self, model: &ConstraintModel, candidate: &Candidate, place: bool) {
        let duration = model.template(candidate.template).duration_minutes();
        let group = model.demand(candidate.demand).group;
        for &t in model.overlapping_templates(candidate.template) {
            let cells = [
                (&mut self.classroom_busy, candidate.classroom),
                (&mut self.teacher_busy, candidate.teacher),
                (&mut self.group_busy, group),
            ];
            for (busy, resource) in cells {
                let cell = &mut busy[resource * self.templates + t];
                *cell = if place { *cell + 1 } else { *cell - 1 };
            }
        }
        if place {
            self.teacher_used[candidate.teacher] += duration;
            self.demand_remaining[candidate.demand] -= duration;
            self.demand_templates[candidate.demand].push(candidate.template);
        } else {
            self.teacher_used[candidate.teacher] -= duration;
            self.demand_remaining[candidate.demand] += duration;
            self.demand_templates[candidate.demand].pop();
        }
    }

    /// The timetable built so far.
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Mutable access for lifecycle transitions.
    pub(crate) fn timetable_mut(&mut self) -> &mut Timetable {
        &mut self.timetable
    }

    /// Consumes the assignment, returning its timetable.
    pub fn into_timetable(self) -> Timetable {
        self.timetable
    }

    /// Assignments in placement order.
    pub fn assignments(&self) -> &[Candidate] {
        &self.trail
    }

    /// Number of placed sessions.
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    #[inline]
    pub fn is_classroom_free(&self, classroom: usize, template: usize) -> bool {
        self.classroom_busy[classroom * self.templates + template] == 0
    }

    #[inline]
    pub fn is_teacher_free(&self, teacher: usize, template: usize) -> bool {
        self.teacher_busy[teacher * self.templates + template] == 0
    }

    #[inline]
    pub fn is_group_free(&self, group: usize, template: usize) -> bool {
        self.group_busy[group * self.templates + template] == 0
    }

    /// Minutes assigned to a teacher.
    #[inline]
    pub fn teacher_used(&self, teacher: usize) -> u32 {
        self.teacher_used[teacher]
    }

    /// Minutes still to place for a demand.
    #[inline]
    pub fn demand_remaining(&self, demand: usize) -> u32 {
        self.demand_remaining[demand]
    }

    /// Template of the demand's most recent session, if any.
    #[inline]
    pub fn latest_template(&self, demand: usize) -> Option<usize> {
        self.demand_templates[demand].last().copied()
    }
}
