//! Resource catalog.
//!
//! Holds the per-run entity sets of one planning: groups, modules,
//! teachers, classrooms and open slot templates. The catalog is loaded
//! once, in full, before search begins and is read-only afterwards.
//!
//! Loading resolves the association tables and drops orphans:
//! - groups attached to another planning (or none),
//! - association rows pointing at entities that do not exist,
//! - teacher qualifications for modules not offered in the planning,
//! - duplicate association rows and repeated template ids (the first
//!   row of each id wins).
//!
//! Every entity set is sorted (by id; templates chronologically) so that
//! everything derived from the catalog is deterministic.

mod store;

pub use store::{CatalogSource, Dataset, Link, MemoryStore, PlanningData, ScheduleSink};

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::error::SchedulingError;
use crate::models::{Classroom, Group, Module, Planning, SlotTemplate, Teacher};

/// Immutable entity sets for one planning.
#[derive(Debug, Clone)]
pub struct ResourceCatalog {
    pub planning: Planning,
    pub groups: Vec<Group>,
    pub modules: Vec<Module>,
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    pub slot_templates: Vec<SlotTemplate>,
}

impl ResourceCatalog {
    /// Creates an empty catalog for a planning.
    pub fn new(planning: Planning) -> Self {
        Self {
            planning,
            groups: Vec::new(),
            modules: Vec::new(),
            teachers: Vec::new(),
            classrooms: Vec::new(),
            slot_templates: Vec::new(),
        }
    }

    /// Adds a group.
    pub fn with_group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    /// Adds a module.
    pub fn with_module(mut self, module: Module) -> Self {
        self.modules.push(module);
        self
    }

    /// Adds a teacher.
    pub fn with_teacher(mut self, teacher: Teacher) -> Self {
        self.teachers.push(teacher);
        self
    }

    /// Adds a classroom.
    pub fn with_classroom(mut self, classroom: Classroom) -> Self {
        self.classrooms.push(classroom);
        self
    }

    /// Adds an open slot template.
    pub fn with_slot(mut self, template: SlotTemplate) -> Self {
        self.slot_templates.push(template);
        self
    }

    /// Adds several open slot templates.
    pub fn with_slots(mut self, templates: impl IntoIterator<Item = SlotTemplate>) -> Self {
        self.slot_templates.extend(templates);
        self
    }

    /// Loads the catalog of a planning from an external source.
    ///
    /// `requester` is the calling user. An owned planning is reported as
    /// `NotFound` to anyone but its owner.
    pub fn load<S: CatalogSource + ?Sized>(
        source: &S,
        planning_id: &str,
        requester: Option<&str>,
    ) -> Result<Self, SchedulingError> {
        let data = source.load_planning_data(planning_id)?;
        if !data.planning.is_visible_to(requester) {
            debug!(planning_id, ?requester, "planning hidden from requester");
            return Err(SchedulingError::not_found("planning", planning_id));
        }
        let catalog = Self::resolve(data);
        info!(
            planning_id,
            groups = catalog.groups.len(),
            modules = catalog.modules.len(),
            teachers = catalog.teachers.len(),
            classrooms = catalog.classrooms.len(),
            slot_templates = catalog.slot_templates.len(),
            "resource catalog loaded"
        );
        Ok(catalog)
    }

    /// Resolves association rows into entity sets, dropping orphans.
    fn resolve(data: PlanningData) -> Self {
        let planning_id = data.planning.id.clone();

        let linked = |links: &[Link]| -> BTreeSet<String> {
            links
                .iter()
                .filter(|l| l.1 == planning_id)
                .map(|l| l.0.clone())
                .collect()
        };
        let module_ids = linked(&data.module_links);
        let teacher_ids = linked(&data.teacher_links);
        let classroom_ids = linked(&data.classroom_links);

        let groups: Vec<Group> = dedup_by_id(
            data.groups
                .into_iter()
                .filter(|g| g.planning_id.as_deref() == Some(planning_id.as_str())),
            |g| &g.id,
        );
        let modules: Vec<Module> = dedup_by_id(
            data.modules
                .into_iter()
                .filter(|m| module_ids.contains(&m.id)),
            |m| &m.id,
        );
        let offered: BTreeSet<&str> = modules.iter().map(|m| m.id.as_str()).collect();

        let mut qualifications: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for Link(teacher_id, module_id) in &data.qualification_links {
            if offered.contains(module_id.as_str()) {
                qualifications
                    .entry(teacher_id.as_str())
                    .or_default()
                    .insert(module_id.clone());
            }
        }

        let teachers: Vec<Teacher> = dedup_by_id(
            data.teachers
                .into_iter()
                .filter(|t| teacher_ids.contains(&t.id))
                .map(|mut t| {
                    if let Some(extra) = qualifications.get(t.id.as_str()) {
                        t.modules.extend(extra.iter().cloned());
                    }
                    t.modules.retain(|m| offered.contains(m.as_str()));
                    t
                }),
            |t| &t.id,
        );
        let classrooms: Vec<Classroom> = dedup_by_id(
            data.classrooms
                .into_iter()
                .filter(|c| classroom_ids.contains(&c.id)),
            |c| &c.id,
        );

        let dangling = (module_ids.len() - modules.len())
            + (teacher_ids.len() - teachers.len())
            + (classroom_ids.len() - classrooms.len());
        if dangling > 0 {
            debug!(planning_id = %planning_id, dangling, "dropped dangling association rows");
        }

        let mut slot_templates = dedup_by_id(data.slot_templates.into_iter(), |t| &t.id);
        slot_templates.sort_by(|a, b| (a.day, a.range, &a.id).cmp(&(b.day, b.range, &b.id)));

        Self {
            planning: data.planning,
            groups,
            modules,
            teachers,
            classrooms,
            slot_templates,
        }
    }

    /// Looks up a group.
    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Looks up a module.
    pub fn module(&self, id: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == id)
    }

    /// Looks up a teacher.
    pub fn teacher(&self, id: &str) -> Option<&Teacher> {
        self.teachers.iter().find(|t| t.id == id)
    }

    /// Looks up a classroom.
    pub fn classroom(&self, id: &str) -> Option<&Classroom> {
        self.classrooms.iter().find(|c| c.id == id)
    }

    /// Looks up a slot template.
    pub fn slot_template(&self, id: &str) -> Option<&SlotTemplate> {
        self.slot_templates.iter().find(|t| t.id == id)
    }
}

/// Sorts by id and keeps the first row of each id.
fn dedup_by_id<T, F>(items: impl Iterator<Item = T>, id: F) -> Vec<T>
where
    F: Fn(&T) -> &String,
{
    let mut items: Vec<T> = items.collect();
    items.sort_by(|a, b| id(a).cmp(id(b)));
    items.dedup_by(|a, b| id(a) == id(b));
    items
}
