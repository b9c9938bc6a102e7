//! Period decomposition.
//!
//! Turns a section's assignment list into a flat arena of atomic
//! schedulable units: one 1-slot period per required theory hour, and
//! `ceil(hours / 2)` 2-slot sessions per lab. Every lab session carries a
//! [`BlockId`] so its two cells can always be located, moved, and removed
//! together.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::SubjectAssignment;

/// Identity of one lab session: subject code plus session index.
///
/// Both cells of the session carry the same block id; two sessions of the
/// same lab subject differ only in `session`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockId {
    /// Subject code of the lab.
    pub subject: String,
    /// Session index within the week (0-based).
    pub session: usize,
}

impl BlockId {
    /// Creates a block id.
    pub fn new(subject: impl Into<String>, session: usize) -> Self {
        Self {
            subject: subject.into(),
            session,
        }
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_lab_{}", self.subject, self.session)
    }
}

/// An atomic schedulable unit derived from one assignment.
///
/// Created once per section and never mutated afterwards; the grids refer
/// to periods by arena index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Period {
    /// Subject code.
    pub subject_code: String,
    /// Subject display name.
    pub subject_name: String,
    /// Faculty identifier.
    pub faculty: String,
    /// Slots this period occupies: 1 for theory, 2 for a lab session.
    pub duration: usize,
    /// Lab block identity; `None` for theory.
    pub block: Option<BlockId>,
}

impl Period {
    /// Whether this period is a lab session.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.block.is_some()
    }
}

/// Decomposes assignments into the period arena.
///
/// A lab assignment with *h* weekly hours yields `ceil(h / 2)` sessions;
/// a theory assignment yields *h* single-slot periods. Malformed hour
/// counts have already been defaulted by
/// [`SubjectAssignment::effective_hours`], so there is no error path.
pub fn decompose(assignments: &[SubjectAssignment]) -> Vec<Period> {
    let mut periods = Vec::new();
    for assignment in assignments {
        let hours = assignment.effective_hours() as usize;
        if assignment.is_lab() {
            let sessions = hours.div_ceil(2);
            for session in 0..sessions {
                periods.push(Period {
                    subject_code: assignment.code.clone(),
                    subject_name: assignment.display_name().to_string(),
                    faculty: assignment.faculty.clone(),
                    duration: 2,
                    block: Some(BlockId::new(&assignment.code, session)),
                });
            }
        } else {
            for _ in 0..hours {
                periods.push(Period {
                    subject_code: assignment.code.clone(),
                    subject_name: assignment.display_name().to_string(),
                    faculty: assignment.faculty.clone(),
                    duration: 1,
                    block: None,
                });
            }
        }
    }
    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theory_one_period_per_hour() {
        let assignments = vec![SubjectAssignment::theory("TOC", "Dr. Smith", 4)];
        let periods = decompose(&assignments);
        assert_eq!(periods.len(), 4);
        assert!(periods.iter().all(|p| p.duration == 1 && p.block.is_none()));
    }

    #[test]
    fn test_lab_sessions_round_up() {
        let assignments = vec![SubjectAssignment::lab("DBMS_LAB", "Dr. Davis", 4)];
        let periods = decompose(&assignments);
        assert_eq!(periods.len(), 2);
        assert!(periods.iter().all(|p| p.duration == 2));
        assert_eq!(periods[0].block, Some(BlockId::new("DBMS_LAB", 0)));
        assert_eq!(periods[1].block, Some(BlockId::new("DBMS_LAB", 1)));

        // Odd hour counts still produce whole sessions.
        let odd = decompose(&[SubjectAssignment::lab("ML_LAB", "Dr. Brown", 3)]);
        assert_eq!(odd.len(), 2);
    }

    #[test]
    fn test_missing_hours_default() {
        let mut a = SubjectAssignment::theory("CNS", "Dr. Jones", 0);
        a.weekly_hours = None;
        let periods = decompose(&[a]);
        assert_eq!(periods.len(), 3);
    }

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId::new("ML_LAB", 1).to_string(), "ML_LAB_lab_1");
    }

    #[test]
    fn test_mixed_assignments_keep_input_order() {
        let assignments = vec![
            SubjectAssignment::theory("TOC", "Dr. Smith", 2),
            SubjectAssignment::lab("ML_LAB", "Dr. Brown", 2),
        ];
        let periods = decompose(&assignments);
        assert_eq!(periods.len(), 3);
        assert_eq!(periods[0].subject_code, "TOC");
        assert_eq!(periods[2].subject_code, "ML_LAB");
        assert!(periods[2].is_lab());
    }
}
