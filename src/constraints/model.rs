//! Constraint model: demands, candidate domains and the exclusion graph.
//!
//! # Formulation
//!
//! - **Variables**: one demand per (module, group, session type) with
//!   declared hours > 0. A demand is satisfied by placing sessions until
//!   its required minutes are used up.
//! - **Domains**: every (slot template, classroom, teacher) tuple that
//!   passes the static checks. The template must admit the session type,
//!   the classroom must accept it, the teacher must be qualified, and the
//!   slot must fit both the demand and the teacher's total budget.
//! - **Constraints**: classroom, teacher and group are disjunctive per
//!   period; demand minutes and teacher minutes are capacities.
//!
//! # Reference
//! Schaerf (1999), "A Survey of Automated Timetabling"

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use super::PartialSchedule;
use crate::catalog::ResourceCatalog;
use crate::error::SchedulingError;
use crate::models::{minutes_to_hours, SessionType, SlotTemplate, TimeSlot};
use crate::validation::validate_input;

/// Identity of a demand: which module, for which group, of which type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DemandKey {
    pub module_id: String,
    pub group_id: String,
    pub session_type: SessionType,
}

impl fmt::Display for DemandKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} for group {}",
            self.module_id, self.session_type, self.group_id
        )
    }
}

/// A node of the constraint graph.
#[derive(Debug, Clone)]
pub struct Demand {
    /// Index into [`ConstraintModel::demands`].
    pub id: usize,
    pub key: DemandKey,
    /// Minutes that must be scheduled.
    pub required_minutes: u32,
    pub(crate) group: usize,
}

/// One value of a demand's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Candidate {
    pub demand: usize,
    pub template: usize,
    pub classroom: usize,
    pub teacher: usize,
}

/// An entity whose remaining capacity can be queried.
#[derive(Debug, Clone, Copy)]
pub enum CapacityEntity<'a> {
    /// A teacher's remaining hour budget.
    Teacher(&'a str),
    /// Hours still to place for a demand.
    Demand(usize),
}

/// The constraint model of one planning.
#[derive(Debug, Clone)]
pub struct ConstraintModel {
    catalog: ResourceCatalog,
    demands: Vec<Demand>,
    domains: Vec<Vec<Candidate>>,
    neighbors: Vec<Vec<usize>>,
    overlapping: Vec<Vec<usize>>,
    teacher_budgets: Vec<u32>,
}

impl ConstraintModel {
    /// Builds the model from a catalog.
    ///
    /// Runs input validation first and fails with `InvalidInput` if the
    /// catalog is structurally broken.
    pub fn build(catalog: ResourceCatalog) -> Result<Self, SchedulingError> {
        validate_input(&catalog).map_err(SchedulingError::InvalidInput)?;

        let mut demands = Vec::new();
        for (g, group) in catalog.groups.iter().enumerate() {
            for module in &catalog.modules {
                for session_type in module.required_session_types() {
                    demands.push(Demand {
                        id: demands.len(),
                        key: DemandKey {
                            module_id: module.id.clone(),
                            group_id: group.id.clone(),
                            session_type,
                        },
                        required_minutes: module.minutes_for(session_type),
                        group: g,
                    });
                }
            }
        }

        let teacher_budgets: Vec<u32> = catalog
            .teachers
            .iter()
            .map(|t| t.available_minutes())
            .collect();

        let domains: Vec<Vec<Candidate>> = demands
            .iter()
            .map(|d| static_domain(&catalog, &teacher_budgets, d))
            .collect();

        let overlapping: Vec<Vec<usize>> = catalog
            .slot_templates
            .iter()
            .map(|a| {
                catalog
                    .slot_templates
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| a.period().overlaps(&b.period()))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        let neighbors = exclusion_graph(&demands, &domains);

        debug!(
            planning_id = %catalog.planning.id,
            demands = demands.len(),
            candidates = domains.iter().map(Vec::len).sum::<usize>(),
            edges = neighbors.iter().map(Vec::len).sum::<usize>() / 2,
            "constraint model built"
        );

        Ok(Self {
            catalog,
            demands,
            domains,
            neighbors,
            overlapping,
            teacher_budgets,
        })
    }

    /// The catalog the model was built from.
    pub fn catalog(&self) -> &ResourceCatalog {
        &self.catalog
    }

    /// All demands.
    pub fn demands(&self) -> &[Demand] {
        &self.demands
    }

    /// One demand.
    pub fn demand(&self, id: usize) -> &Demand {
        &self.demands[id]
    }

    /// Static domain of a demand, in catalog order.
    pub fn candidates(&self, demand: usize) -> &[Candidate] {
        &self.domains[demand]
    }

    /// Demands that compete with `demand` for a group, teacher or classroom.
    pub fn neighbors(&self, demand: usize) -> &[usize] {
        &self.neighbors[demand]
    }

    /// Templates overlapping `template` (including itself).
    pub fn overlapping_templates(&self, template: usize) -> &[usize] {
        &self.overlapping[template]
    }

    /// Number of slot templates.
    pub fn template_count(&self) -> usize {
        self.catalog.slot_templates.len()
    }

    /// A slot template by index.
    pub fn template(&self, template: usize) -> &SlotTemplate {
        &self.catalog.slot_templates[template]
    }

    /// Teacher budget in minutes, by teacher index.
    pub fn teacher_budget(&self, teacher: usize) -> u32 {
        self.teacher_budgets[teacher]
    }

    /// Total minutes to schedule across all demands.
    pub fn required_minutes(&self) -> u32 {
        self.demands.iter().map(|d| d.required_minutes).sum()
    }

    /// Whether `candidate` can be placed on top of `partial`.
    ///
    /// The classroom, teacher and group must be free in every template
    /// overlapping the candidate's, and both the demand and the teacher
    /// must have room for the slot's duration.
    pub fn is_compatible(&self, candidate: &Candidate, partial: &PartialSchedule) -> bool {
        let duration = self.template(candidate.template).duration_minutes();
        let group = self.demands[candidate.demand].group;
        partial.demand_remaining(candidate.demand) >= duration
            && partial.teacher_used(candidate.teacher) + duration
                <= self.teacher_budgets[candidate.teacher]
            && partial.is_classroom_free(candidate.classroom, candidate.template)
            && partial.is_teacher_free(candidate.teacher, candidate.template)
            && partial.is_group_free(group, candidate.template)
    }

    /// Candidates of `demand` compatible with `partial`, in domain order.
    pub fn compatible_candidates(
        &self,
        demand: usize,
        partial: &PartialSchedule,
    ) -> Vec<Candidate> {
        self.domains[demand]
            .iter()
            .filter(|c| self.is_compatible(c, partial))
            .copied()
            .collect()
    }

    /// Number of candidates of `demand` compatible with `partial`.
    pub fn count_compatible(&self, demand: usize, partial: &PartialSchedule) -> usize {
        self.domains[demand]
            .iter()
            .filter(|c| self.is_compatible(c, partial))
            .count()
    }

    /// Remaining capacity of an entity, in hours.
    ///
    /// Unknown teachers have no capacity.
    pub fn remaining_capacity(&self, entity: CapacityEntity<'_>, partial: &PartialSchedule) -> f64 {
        match entity {
            CapacityEntity::Teacher(id) => self
                .catalog
                .teachers
                .iter()
                .position(|t| t.id == id)
                .map(|t| {
                    minutes_to_hours(
                        self.teacher_budgets[t].saturating_sub(partial.teacher_used(t)),
                    )
                })
                .unwrap_or(0.0),
            CapacityEntity::Demand(d) => minutes_to_hours(partial.demand_remaining(d)),
        }
    }

    /// Whether every demand is fully placed.
    pub fn is_complete(&self, partial: &PartialSchedule) -> bool {
        (0..self.demands.len()).all(|d| partial.demand_remaining(d) == 0)
    }

    /// Materializes a candidate as a time slot.
    pub fn to_time_slot(&self, candidate: &Candidate) -> TimeSlot {
        let demand = &self.demands[candidate.demand];
        TimeSlot::new(
            self.template(candidate.template),
            demand.key.session_type,
            demand.key.module_id.clone(),
            demand.key.group_id.clone(),
        )
        .assign_classroom(self.catalog.classrooms[candidate.classroom].id.clone())
        .assign_teacher(self.catalog.teachers[candidate.teacher].id.clone())
    }
}

fn static_domain(catalog: &ResourceCatalog, budgets: &[u32], demand: &Demand) -> Vec<Candidate> {
    let session_type = demand.key.session_type;
    let teachers: Vec<usize> = catalog
        .teachers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.can_teach(&demand.key.module_id))
        .map(|(i, _)| i)
        .collect();
    let classrooms: Vec<usize> = catalog
        .classrooms
        .iter()
        .enumerate()
        .filter(|(_, c)| c.accepts(session_type))
        .map(|(i, _)| i)
        .collect();

    let mut domain = Vec::new();
    for (t, template) in catalog.slot_templates.iter().enumerate() {
        let duration = template.duration_minutes();
        if !template.admits(session_type) || duration == 0 || duration > demand.required_minutes {
            continue;
        }
        for &classroom in &classrooms {
            for &teacher in &teachers {
                if duration <= budgets[teacher] {
                    domain.push(Candidate {
                        demand: demand.id,
                        template: t,
                        classroom,
                        teacher,
                    });
                }
            }
        }
    }
    domain
}

fn exclusion_graph(demands: &[Demand], domains: &[Vec<Candidate>]) -> Vec<Vec<usize>> {
    let resources: Vec<(BTreeSet<usize>, BTreeSet<usize>)> = domains
        .iter()
        .map(|domain| {
            (
                domain.iter().map(|c| c.teacher).collect(),
                domain.iter().map(|c| c.classroom).collect(),
            )
        })
        .collect();

    let mut neighbors = vec![Vec::new(); demands.len()];
    for a in 0..demands.len() {
        for b in (a + 1)..demands.len() {
            let shares_group = demands[a].group == demands[b].group;
            let shares_teacher = !resources[a].0.is_disjoint(&resources[b].0);
            let shares_classroom = !resources[a].1.is_disjoint(&resources[b].1);
            if shares_group || shares_teacher || shares_classroom {
                neighbors[a].push(b);
                neighbors[b].push(a);
            }
        }
    }
    neighbors
}
