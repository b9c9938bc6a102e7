//! Cross-section occupancy ledgers and the prior-schedule interface.
//!
//! The ledgers record which section owns each (faculty, day, slot) cell
//! and each (day, lab pair) block across the whole run. They are seeded
//! once from previously committed schedules, extended after each section
//! converges, and never pruned. Fitness reads them to penalize clashes
//! with already-finalized placements.

use std::collections::HashMap;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::models::WeekConfig;

/// Academic scope for a prior-schedule read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermScope {
    /// Academic year label (e.g. "2024-25").
    pub academic_year: String,
    /// Program year.
    pub year: u32,
    /// Semester number.
    pub semester: u32,
}

impl TermScope {
    /// Creates a scope.
    pub fn new(academic_year: impl Into<String>, year: u32, semester: u32) -> Self {
        Self {
            academic_year: academic_year.into(),
            year,
            semester,
        }
    }
}

/// One previously committed schedule cell, as supplied by a store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorEntry {
    /// Faculty identifier.
    pub faculty_name: String,
    /// Day name; entries naming unknown days are skipped at seeding.
    pub day: String,
    /// Slot index within the day.
    pub time_slot: usize,
    /// Owning section name.
    pub section: String,
    /// Whether the cell belongs to a lab session.
    #[serde(default)]
    pub is_lab: bool,
    /// Lab block identifier, when a lab.
    #[serde(default)]
    pub block_id: Option<String>,
}

/// Failure to read prior schedules.
///
/// Callers of the driver never see this error: the driver logs it and
/// proceeds with empty ledgers.
#[derive(Debug, Clone)]
pub struct PriorLoadError {
    /// Human-readable cause.
    pub message: String,
}

impl PriorLoadError {
    /// Creates an error from a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for PriorLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "prior schedule read failed: {}", self.message)
    }
}

impl std::error::Error for PriorLoadError {}

/// Read access to previously committed schedules.
///
/// Implemented by the external data-access collaborator. The engine calls
/// [`load_prior`](Self::load_prior) exactly once, before the first section
/// is processed.
pub trait PriorScheduleStore {
    /// Returns all committed schedule cells within a scope.
    fn load_prior(&self, scope: &TermScope) -> Result<Vec<PriorEntry>, PriorLoadError>;
}

/// (faculty, day, slot) → owning section.
#[derive(Debug, Clone, Default)]
pub struct FacultyLedger {
    slots: HashMap<String, HashMap<(usize, usize), String>>,
}

impl FacultyLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records ownership of a cell. The first writer keeps it.
    pub fn record(
        &mut self,
        faculty: impl Into<String>,
        day: usize,
        slot: usize,
        section: impl Into<String>,
    ) {
        self.slots
            .entry(faculty.into())
            .or_default()
            .entry((day, slot))
            .or_insert_with(|| section.into());
    }

    /// Section owning a cell, if any.
    pub fn owner(&self, faculty: &str, day: usize, slot: usize) -> Option<&str> {
        self.slots
            .get(faculty)
            .and_then(|cells| cells.get(&(day, slot)))
            .map(String::as_str)
    }

    /// Whether a different section already owns this (faculty, day, slot).
    pub fn is_clash(&self, faculty: &str, day: usize, slot: usize, section: &str) -> bool {
        self.owner(faculty, day, slot)
            .is_some_and(|owner| owner != section)
    }

    /// Number of recorded cells.
    pub fn len(&self) -> usize {
        self.slots.values().map(HashMap::len).sum()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// (day, lab pair start) → owning section.
#[derive(Debug, Clone, Default)]
pub struct LabSlotLedger {
    pairs: HashMap<(usize, usize), String>,
}

impl LabSlotLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records ownership of a lab pair. The first writer keeps it.
    pub fn record(&mut self, day: usize, pair_start: usize, section: impl Into<String>) {
        self.pairs
            .entry((day, pair_start))
            .or_insert_with(|| section.into());
    }

    /// Section owning a pair, if any.
    pub fn owner(&self, day: usize, pair_start: usize) -> Option<&str> {
        self.pairs.get(&(day, pair_start)).map(String::as_str)
    }

    /// Whether a different section already owns this pair.
    pub fn is_clash(&self, day: usize, pair_start: usize, section: &str) -> bool {
        self.owner(day, pair_start)
            .is_some_and(|owner| owner != section)
    }

    /// Number of recorded pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Both global ledgers, threaded through a run as one value.
#[derive(Debug, Clone, Default)]
pub struct Ledgers {
    /// Per-cell faculty occupancy.
    pub faculty: FacultyLedger,
    /// Per-pair lab occupancy.
    pub labs: LabSlotLedger,
}

impl Ledgers {
    /// Creates empty ledgers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges previously committed schedule cells.
    ///
    /// Entries naming days outside the configured week are skipped. Lab
    /// cells are folded onto the pair containing their slot, so both cells
    /// of a stored session resolve to one pair record.
    pub fn seed_from_prior(&mut self, entries: &[PriorEntry], week: &WeekConfig) {
        for entry in entries {
            let Some(day) = week.day_index(&entry.day) else {
                debug!(
                    "skipping prior entry for unknown day {:?} (faculty {})",
                    entry.day, entry.faculty_name
                );
                continue;
            };
            if entry.time_slot >= week.slots_per_day {
                debug!(
                    "skipping prior entry with out-of-range slot {} on {}",
                    entry.time_slot, entry.day
                );
                continue;
            }
            self.faculty
                .record(&entry.faculty_name, day, entry.time_slot, &entry.section);
            if entry.is_lab {
                if let Some((start, _)) = week.pair_containing(entry.time_slot) {
                    self.labs.record(day, start, &entry.section);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_ledger_first_writer_wins() {
        let mut ledger = FacultyLedger::new();
        ledger.record("Dr. Smith", 1, 0, "A");
        ledger.record("Dr. Smith", 1, 0, "B");
        assert_eq!(ledger.owner("Dr. Smith", 1, 0), Some("A"));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_faculty_clash_is_cross_section_only() {
        let mut ledger = FacultyLedger::new();
        ledger.record("Dr. Smith", 1, 0, "A");
        assert!(ledger.is_clash("Dr. Smith", 1, 0, "B"));
        assert!(!ledger.is_clash("Dr. Smith", 1, 0, "A"));
        assert!(!ledger.is_clash("Dr. Smith", 1, 1, "B"));
        assert!(!ledger.is_clash("Dr. Jones", 1, 0, "B"));
    }

    #[test]
    fn test_lab_ledger() {
        let mut ledger = LabSlotLedger::new();
        ledger.record(2, 4, "A");
        assert!(ledger.is_clash(2, 4, "B"));
        assert!(!ledger.is_clash(2, 2, "B"));
        assert_eq!(ledger.owner(2, 4), Some("A"));
    }

    #[test]
    fn test_seed_from_prior() {
        let week = WeekConfig::default();
        let entries = vec![
            PriorEntry {
                faculty_name: "Dr. Smith".into(),
                day: "Wednesday".into(),
                time_slot: 0,
                section: "A".into(),
                is_lab: false,
                block_id: None,
            },
            // Second cell of a lab session: folds onto pair (2, 3).
            PriorEntry {
                faculty_name: "Dr. Brown".into(),
                day: "Thursday".into(),
                time_slot: 3,
                section: "A".into(),
                is_lab: true,
                block_id: Some("ML_LAB_lab_0".into()),
            },
            // Unknown day: skipped.
            PriorEntry {
                faculty_name: "Dr. Lee".into(),
                day: "Sunday".into(),
                time_slot: 0,
                section: "A".into(),
                is_lab: false,
                block_id: None,
            },
        ];

        let mut ledgers = Ledgers::new();
        ledgers.seed_from_prior(&entries, &week);

        assert!(ledgers.faculty.is_clash("Dr. Smith", 1, 0, "B"));
        assert!(ledgers.labs.is_clash(2, 2, "B"));
        assert_eq!(ledgers.faculty.len(), 2);
        assert_eq!(ledgers.labs.len(), 1);
    }

    #[test]
    fn test_prior_entry_serde_defaults() {
        let json = r#"{"faculty_name":"Dr. Smith","day":"Tuesday","time_slot":2,"section":"A"}"#;
        let entry: PriorEntry = serde_json::from_str(json).unwrap();
        assert!(!entry.is_lab);
        assert!(entry.block_id.is_none());
    }
}
