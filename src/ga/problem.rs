//! Section problem definition.
//!
//! Bridges the domain models to the GA: owns the period arena, the week
//! layout, and the requirement lookups that fitness and repair share.

use std::collections::HashMap;

use crate::ga::period::{decompose, Period};
use crate::models::{Section, SubjectAssignment, WeekConfig};

/// Everything the genetic operators need to know about one section.
///
/// Built once per section; immutable for the whole evolutionary run.
/// Grids refer to [`periods`](Self::periods) by index.
#[derive(Debug, Clone)]
pub struct SectionProblem {
    /// Section name.
    pub section: String,
    /// The section's assignments, in input order.
    pub assignments: Vec<SubjectAssignment>,
    /// Period arena produced by decomposition.
    pub periods: Vec<Period>,
    /// Week layout.
    pub week: WeekConfig,
}

impl SectionProblem {
    /// Decomposes a section against a week layout.
    pub fn new(section: &Section, week: WeekConfig) -> Self {
        Self {
            section: section.name.clone(),
            assignments: section.assignments.clone(),
            periods: decompose(&section.assignments),
            week,
        }
    }

    /// Indices of lab periods in the arena.
    pub fn lab_period_ids(&self) -> Vec<usize> {
        self.periods
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_lab())
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices of theory periods in the arena.
    pub fn theory_period_ids(&self) -> Vec<usize> {
        self.periods
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.is_lab())
            .map(|(i, _)| i)
            .collect()
    }

    /// Required theory cell count per subject code.
    pub fn theory_requirements(&self) -> HashMap<&str, usize> {
        let mut required: HashMap<&str, usize> = HashMap::new();
        for period in self.periods.iter().filter(|p| !p.is_lab()) {
            *required.entry(period.subject_code.as_str()).or_insert(0) += 1;
        }
        required
    }

    /// The period at an arena index.
    #[inline]
    pub fn period(&self, id: usize) -> &Period {
        &self.periods[id]
    }
}
