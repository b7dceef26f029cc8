//! Storage boundary.
//!
//! The solver core never talks to a database. It reads one planning's rows
//! through `CatalogSource` and hands finished schedules to `ScheduleSink`.
//! `MemoryStore` implements both over an in-memory `Dataset`, which can be
//! loaded from JSON.
//!
//! Many-to-many relations are explicit association tables (`Link` rows),
//! not nullable foreign keys, so dangling references can be detected and
//! filtered by the catalog instead of leaking into the solver.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::error::SchedulingError;
use crate::models::{Classroom, Group, Module, Planning, Schedule, SlotTemplate, Teacher};

/// A row of an association table: `(left id, right id)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Link(pub String, pub String);

impl Link {
    /// Creates a link.
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self(left.into(), right.into())
    }
}

/// Raw rows for one planning, as returned by a bulk read.
///
/// Links are returned as stored; they may point at entities that no longer
/// exist. Resolution and filtering happen in [`ResourceCatalog::load`].
///
/// [`ResourceCatalog::load`]: super::ResourceCatalog::load
#[derive(Debug, Clone)]
pub struct PlanningData {
    pub planning: Planning,
    /// Groups whose `planning_id` is this planning.
    pub groups: Vec<Group>,
    pub modules: Vec<Module>,
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    /// `(module_id, planning_id)` rows for this planning.
    pub module_links: Vec<Link>,
    /// `(teacher_id, planning_id)` rows for this planning.
    pub teacher_links: Vec<Link>,
    /// `(classroom_id, planning_id)` rows for this planning.
    pub classroom_links: Vec<Link>,
    /// `(teacher_id, module_id)` qualification rows.
    pub qualification_links: Vec<Link>,
    /// Open slot templates for this planning.
    pub slot_templates: Vec<SlotTemplate>,
}

/// Read side of the external store.
pub trait CatalogSource {
    /// Loads every row the catalog needs for one planning in one read.
    ///
    /// Fails with `NotFound` if the planning does not exist.
    fn load_planning_data(&self, planning_id: &str) -> Result<PlanningData, SchedulingError>;
}

/// Write side of the external store.
pub trait ScheduleSink {
    /// Replaces the stored schedules of a planning.
    fn store_schedules(
        &self,
        planning_id: &str,
        schedules: &[Schedule],
    ) -> Result<(), SchedulingError>;
}

/// Serializable snapshot of the whole store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub plannings: Vec<Planning>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub modules: Vec<Module>,
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    /// `(module_id, planning_id)`
    #[serde(default)]
    pub module_plannings: Vec<Link>,
    /// `(teacher_id, planning_id)`
    #[serde(default)]
    pub teacher_plannings: Vec<Link>,
    /// `(classroom_id, planning_id)`
    #[serde(default)]
    pub classroom_plannings: Vec<Link>,
    /// `(teacher_id, module_id)`
    #[serde(default)]
    pub teacher_modules: Vec<Link>,
    /// Open slot templates per planning id.
    #[serde(default)]
    pub slot_templates: BTreeMap<String, Vec<SlotTemplate>>,
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    dataset: Dataset,
    schedules: Mutex<BTreeMap<String, Vec<Schedule>>>,
}

impl MemoryStore {
    /// Creates a store over a dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            schedules: Mutex::new(BTreeMap::new()),
        }
    }

    /// Parses a JSON dataset.
    pub fn from_json(json: &str) -> Result<Self, SchedulingError> {
        let dataset: Dataset = serde_json::from_str(json).map_err(SchedulingError::Dataset)?;
        Ok(Self::new(dataset))
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Schedules stored for a planning (empty if none).
    pub fn stored_schedules(&self, planning_id: &str) -> Vec<Schedule> {
        self.schedules
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(planning_id)
            .cloned()
            .unwrap_or_default()
    }
}

fn links_for(links: &[Link], planning_id: &str) -> Vec<Link> {
    links
        .iter()
        .filter(|l| l.1 == planning_id)
        .cloned()
        .collect()
}

impl CatalogSource for MemoryStore {
    fn load_planning_data(&self, planning_id: &str) -> Result<PlanningData, SchedulingError> {
        let ds = &self.dataset;
        let planning = ds
            .plannings
            .iter()
            .find(|p| p.id == planning_id)
            .cloned()
            .ok_or_else(|| SchedulingError::not_found("planning", planning_id))?;

        let module_links = links_for(&ds.module_plannings, planning_id);
        let teacher_links = links_for(&ds.teacher_plannings, planning_id);
        let classroom_links = links_for(&ds.classroom_plannings, planning_id);

        let module_ids: BTreeSet<&str> = module_links.iter().map(|l| l.0.as_str()).collect();
        let teacher_ids: BTreeSet<&str> = teacher_links.iter().map(|l| l.0.as_str()).collect();
        let classroom_ids: BTreeSet<&str> =
            classroom_links.iter().map(|l| l.0.as_str()).collect();

        let data = PlanningData {
            groups: ds
                .groups
                .iter()
                .filter(|g| g.planning_id.as_deref() == Some(planning_id))
                .cloned()
                .collect(),
            modules: ds
                .modules
                .iter()
                .filter(|m| module_ids.contains(m.id.as_str()))
                .cloned()
                .collect(),
            teachers: ds
                .teachers
                .iter()
                .filter(|t| teacher_ids.contains(t.id.as_str()))
                .cloned()
                .collect(),
            classrooms: ds
                .classrooms
                .iter()
                .filter(|c| classroom_ids.contains(c.id.as_str()))
                .cloned()
                .collect(),
            qualification_links: ds
                .teacher_modules
                .iter()
                .filter(|l| teacher_ids.contains(l.0.as_str()))
                .cloned()
                .collect(),
            slot_templates: ds
                .slot_templates
                .get(planning_id)
                .cloned()
                .unwrap_or_default(),
            module_links,
            teacher_links,
            classroom_links,
            planning,
        };

        debug!(
            planning_id,
            groups = data.groups.len(),
            modules = data.modules.len(),
            teachers = data.teachers.len(),
            classrooms = data.classrooms.len(),
            slot_templates = data.slot_templates.len(),
            "loaded planning rows"
        );
        Ok(data)
    }
}

impl ScheduleSink for MemoryStore {
    fn store_schedules(
        &self,
        planning_id: &str,
        schedules: &[Schedule],
    ) -> Result<(), SchedulingError> {
        let mut stored = self
            .schedules
            .lock()
            .map_err(|e| SchedulingError::Store(e.to_string()))?;
        stored.insert(planning_id.to_string(), schedules.to_vec());
        debug!(planning_id, groups = schedules.len(), "stored schedules");
        Ok(())
    }
}
