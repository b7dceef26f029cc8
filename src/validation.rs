//! Input validation for timetabling problems.
//!
//! Checks structural integrity of a resource catalog before the
//! constraint model is built. Detects:
//! - Duplicate IDs
//! - Malformed slot templates
//! - Negative or non-finite hours
//! - Qualifications for modules missing from the catalog
//! - Demands that can never be placed (no qualified teacher, no
//!   compatible classroom, or no admitting slot template)
//!
//! Everything is reported at once; no check short-circuits another.

use std::collections::HashSet;

use crate::catalog::ResourceCatalog;
use crate::models::SessionType;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A slot template has an empty or inverted time range.
    InvalidTimeRange,
    /// Hours are negative, NaN or infinite.
    InvalidHours,
    /// A teacher is qualified for a module that is not in the catalog.
    InvalidModuleReference,
    /// No teacher is qualified for a module that needs sessions.
    NoQualifiedTeacher,
    /// No classroom accepts a session type a module needs.
    NoCompatibleClassroom,
    /// No slot template admits a session type a module needs.
    NoAdmittingSlot,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates a catalog.
///
/// Checks:
/// 1. No duplicate IDs per entity kind
/// 2. All slot templates have well-formed ranges
/// 3. All hours are finite and non-negative
/// 4. Teacher qualifications reference catalog modules
/// 5. Every needed (module, session type) has a qualified teacher,
///    a compatible classroom and an admitting slot template
///
/// Feasibility is only checked when the catalog has at least one group,
/// since a module without groups produces no demand.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(catalog: &ResourceCatalog) -> ValidationResult {
    let mut errors = Vec::new();

    check_duplicates(
        "group",
        catalog.groups.iter().map(|g| g.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "module",
        catalog.modules.iter().map(|m| m.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "teacher",
        catalog.teachers.iter().map(|t| t.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "classroom",
        catalog.classrooms.iter().map(|c| c.id.as_str()),
        &mut errors,
    );
    check_duplicates(
        "slot template",
        catalog.slot_templates.iter().map(|t| t.id.as_str()),
        &mut errors,
    );

    // Slot templates
    for template in &catalog.slot_templates {
        if !template.range.is_well_formed() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidTimeRange,
                format!(
                    "Slot template '{}' has invalid range {}",
                    template.id, template.range
                ),
            ));
        }
    }

    // Hours
    for module in &catalog.modules {
        for session_type in SessionType::ALL {
            let hours = module.hours_for(session_type);
            if !hours.is_finite() || hours < 0.0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidHours,
                    format!(
                        "Module '{}' declares invalid {} hours: {hours}",
                        module.id, session_type
                    ),
                ));
            }
        }
    }
    for teacher in &catalog.teachers {
        if !teacher.hours.is_finite() || teacher.hours < 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidHours,
                format!(
                    "Teacher '{}' declares invalid hours: {}",
                    teacher.id, teacher.hours
                ),
            ));
        }
    }

    // Qualification references
    let module_ids: HashSet<&str> = catalog.modules.iter().map(|m| m.id.as_str()).collect();
    for teacher in &catalog.teachers {
        for module_id in &teacher.modules {
            if !module_ids.contains(module_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidModuleReference,
                    format!(
                        "Teacher '{}' references unknown module '{}'",
                        teacher.id, module_id
                    ),
                ));
            }
        }
    }

    // Feasibility of each needed session type
    if !catalog.groups.is_empty() {
        for module in &catalog.modules {
            for session_type in module.required_session_types() {
                if !catalog.teachers.iter().any(|t| t.can_teach(&module.id)) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NoQualifiedTeacher,
                        format!("No teacher is qualified for module '{}'", module.id),
                    ));
                }
                if !catalog.classrooms.iter().any(|c| c.accepts(session_type)) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NoCompatibleClassroom,
                        format!(
                            "No classroom accepts {} sessions of module '{}'",
                            session_type, module.id
                        ),
                    ));
                }
                let has_restricted = catalog
                    .slot_templates
                    .iter()
                    .any(|t| t.session_type.is_some());
                if has_restricted && !catalog.slot_templates.iter().any(|t| t.admits(session_type))
                {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::NoAdmittingSlot,
                        format!(
                            "No slot template admits {} sessions of module '{}'",
                            session_type, module.id
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_duplicates<'a>(
    entity: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {entity} ID: {id}"),
            ));
        }
    }
}
