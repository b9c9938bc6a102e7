//! Input and solution integrity checks.
//!
//! Input checks catch malformed section data before a run (duplicate
//! subject codes, empty sections, blank faculty). Solution checks verify
//! the structural invariants every finished grid must hold: lab atomicity
//! and exact period multiplicities. The engine repairs rather than
//! rejects, so these checks are a guard for callers and tests, not a step
//! the driver depends on.

use std::collections::{HashMap, HashSet};

use crate::ga::{SectionProblem, Timetable};
use crate::models::Section;

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
    /// Two assignments in one section share a subject code.
    DuplicateSubject,
    /// A section has no assignments.
    EmptySection,
    /// An assignment names no faculty.
    BlankFaculty,
    /// A lab cell is not part of a complete block on a declared pair.
    BrokenLabBlock,
    /// A subject's occupied cell count differs from its requirement.
    CountMismatch,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates input sections.
///
/// Checks:
/// 1. Every section has at least one assignment
/// 2. No duplicate subject codes within a section
/// 3. No blank faculty identifiers
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_sections(sections: &[Section]) -> ValidationResult {
    let mut errors = Vec::new();

    for section in sections {
        if section.assignments.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptySection,
                format!("Section '{}' has no assignments", section.name),
            ));
        }

        let mut codes = HashSet::new();
        for assignment in &section.assignments {
            if !codes.insert(assignment.code.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateSubject,
                    format!(
                        "Section '{}' lists subject '{}' more than once",
                        section.name, assignment.code
                    ),
                ));
            }
            if assignment.faculty.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::BlankFaculty,
                    format!(
                        "Subject '{}' in section '{}' has no faculty",
                        assignment.code, section.name
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates the structural invariants of one grid.
///
/// Checks:
/// 1. Every lab cell belongs to a complete block: its paired cell exists
///    within a declared lab pair and holds the same session
/// 2. Every lab session occupies exactly two cells
/// 3. Every theory subject occupies exactly its required cell count
pub fn validate_individual(problem: &SectionProblem, grid: &Timetable) -> ValidationResult {
    let mut errors = Vec::new();

    for (day, slot, id) in grid.occupied() {
        let period = problem.period(id);
        if !period.is_lab() {
            continue;
        }
        let complete = problem.week.pair_containing(slot).is_some_and(|(s, e)| {
            grid.get(day, s) == Some(id) && grid.get(day, e) == Some(id)
        });
        if !complete {
            errors.push(ValidationError::new(
                ValidationErrorKind::BrokenLabBlock,
                format!(
                    "Lab '{}' cell at day {day}, slot {slot} has no complete block",
                    period.subject_code
                ),
            ));
        }
    }

    for &lab_id in &problem.lab_period_ids() {
        let cells = grid.cells_holding(lab_id);
        if cells.len() != 2 {
            let period = problem.period(lab_id);
            let block = period.block.as_ref().map(ToString::to_string).unwrap_or_default();
            errors.push(ValidationError::new(
                ValidationErrorKind::CountMismatch,
                format!("Lab session '{block}' occupies {} cells, expected 2", cells.len()),
            ));
        }
    }

    let mut theory_cells: HashMap<&str, usize> = HashMap::new();
    for (_, _, id) in grid.occupied() {
        let period = problem.period(id);
        if !period.is_lab() {
            *theory_cells.entry(period.subject_code.as_str()).or_insert(0) += 1;
        }
    }
    for (subject, &need) in &problem.theory_requirements() {
        let have = theory_cells.get(subject).copied().unwrap_or(0);
        if have != need {
            errors.push(ValidationError::new(
                ValidationErrorKind::CountMismatch,
                format!("Subject '{subject}' occupies {have} cells, expected {need}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
