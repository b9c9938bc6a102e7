//! Subject/faculty assignment and section models.
//!
//! An assignment binds one subject to one faculty member for one section,
//! with a weekly hour requirement. A section is an ordered list of
//! assignments; ordering is preserved so that decomposition and reporting
//! are deterministic.

use serde::{Deserialize, Serialize};

/// Fallback weekly hours when neither `weekly_hours` nor `credits` is usable.
pub const DEFAULT_WEEKLY_HOURS: u32 = 3;

/// Kind of teaching session a subject requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    /// One-slot classroom sessions.
    Theory,
    /// Two-slot laboratory sessions, placed only on declared lab slot pairs.
    Lab,
}

/// A subject-faculty-type-hours tuple owned by a section.
///
/// Immutable input. Hour requirements may arrive as weekly hours, as a
/// credit count, or not at all; [`effective_hours`](Self::effective_hours)
/// resolves that once so downstream code never repeats the fallback chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectAssignment {
    /// Subject code (e.g. "CS301").
    pub code: String,
    /// Display name. Falls back to the code when blank.
    #[serde(default)]
    pub name: String,
    /// Faculty identifier (name or staff ID, opaque to the engine).
    pub faculty: String,
    /// Theory or lab.
    pub session_type: SessionType,
    /// Required weekly hours. `None` or zero defers to `credits`.
    #[serde(default)]
    pub weekly_hours: Option<u32>,
    /// Credit count, used as the hour requirement when `weekly_hours` is absent.
    #[serde(default)]
    pub credits: Option<u32>,
}

impl SubjectAssignment {
    /// Creates a theory assignment.
    pub fn theory(code: impl Into<String>, faculty: impl Into<String>, hours: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            faculty: faculty.into(),
            session_type: SessionType::Theory,
            weekly_hours: Some(hours),
            credits: None,
        }
    }

    /// Creates a lab assignment.
    pub fn lab(code: impl Into<String>, faculty: impl Into<String>, hours: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            faculty: faculty.into(),
            session_type: SessionType::Lab,
            weekly_hours: Some(hours),
            credits: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the credit count.
    pub fn with_credits(mut self, credits: u32) -> Self {
        self.credits = Some(credits);
        self
    }

    /// Whether this assignment requires lab sessions.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.session_type == SessionType::Lab
    }

    /// Required weekly hours: first positive of `weekly_hours`, `credits`,
    /// else [`DEFAULT_WEEKLY_HOURS`].
    pub fn effective_hours(&self) -> u32 {
        self.weekly_hours
            .filter(|&h| h > 0)
            .or(self.credits.filter(|&c| c > 0))
            .unwrap_or(DEFAULT_WEEKLY_HOURS)
    }

    /// Display name, falling back to the subject code.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.code
        } else {
            &self.name
        }
    }
}

/// One class/cohort requiring its own weekly schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section name (e.g. "A", "5B").
    pub name: String,
    /// Subject/faculty assignments, in input order.
    pub assignments: Vec<SubjectAssignment>,
}

impl Section {
    /// Creates an empty section.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            assignments: Vec::new(),
        }
    }

    /// Adds an assignment.
    pub fn with_assignment(mut self, assignment: SubjectAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }

    /// Total weekly slots this section's assignments demand.
    ///
    /// Labs with odd hour counts round up to whole two-slot sessions.
    pub fn required_slots(&self) -> u32 {
        self.assignments
            .iter()
            .map(|a| {
                let h = a.effective_hours();
                if a.is_lab() {
                    h.div_ceil(2) * 2
                } else {
                    h
                }
            })
            .sum()
    }
}
