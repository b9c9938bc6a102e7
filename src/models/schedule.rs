//! Finalized schedule output for one section.
//!
//! This is the sole output contract of the engine: day → slot index →
//! entry record. How it is stored, rendered, or transmitted is up to the
//! caller.

use serde::{Deserialize, Serialize};

/// One occupied cell of a finalized timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledEntry {
    /// Subject code.
    pub subject_code: String,
    /// Subject display name.
    pub subject_name: String,
    /// Faculty identifier.
    pub faculty_name: String,
    /// Lab block identifier; set on both cells of a lab session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_id: Option<String>,
    /// Whether this cell belongs to a lab session.
    pub is_lab: bool,
}

/// One working day of a finalized timetable.
///
/// `slots[i]` is `None` for a free slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Day name.
    pub day: String,
    /// Per-slot entries, index 0 first.
    pub slots: Vec<Option<ScheduledEntry>>,
}

/// The committed weekly schedule of one section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionSchedule {
    /// Section name.
    pub section: String,
    /// Days in week order.
    pub days: Vec<DaySchedule>,
}

impl SectionSchedule {
    /// Creates an all-free schedule for the given days and slot count.
    pub fn empty(section: impl Into<String>, days: &[String], slots_per_day: usize) -> Self {
        Self {
            section: section.into(),
            days: days
                .iter()
                .map(|d| DaySchedule {
                    day: d.clone(),
                    slots: vec![None; slots_per_day],
                })
                .collect(),
        }
    }

    /// Entry at a (day name, slot) cell, if occupied.
    pub fn entry(&self, day: &str, slot: usize) -> Option<&ScheduledEntry> {
        self.days
            .iter()
            .find(|d| d.day == day)
            .and_then(|d| d.slots.get(slot))
            .and_then(|s| s.as_ref())
    }

    /// Iterates occupied cells as (day name, slot, entry).
    pub fn entries(&self) -> impl Iterator<Item = (&str, usize, &ScheduledEntry)> {
        self.days.iter().flat_map(|d| {
            d.slots
                .iter()
                .enumerate()
                .filter_map(move |(i, s)| s.as_ref().map(|e| (d.day.as_str(), i, e)))
        })
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.entries().count()
    }

    /// Occupied cell count per subject code.
    pub fn hours_for(&self, subject_code: &str) -> usize {
        self.entries()
            .filter(|(_, _, e)| e.subject_code == subject_code)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SectionSchedule {
        let days: Vec<String> = ["Tuesday", "Wednesday"].iter().map(|s| s.to_string()).collect();
        let mut schedule = SectionSchedule::empty("A", &days, 3);
        schedule.days[0].slots[0] = Some(ScheduledEntry {
            subject_code: "TOC".into(),
            subject_name: "Theory of Computation".into(),
            faculty_name: "Dr. Smith".into(),
            block_id: None,
            is_lab: false,
        });
        schedule.days[1].slots[1] = Some(ScheduledEntry {
            subject_code: "ML_LAB".into(),
            subject_name: "ML Lab".into(),
            faculty_name: "Dr. Brown".into(),
            block_id: Some("ML_LAB_lab_0".into()),
            is_lab: true,
        });
        schedule
    }

    #[test]
    fn test_entry_lookup() {
        let s = sample();
        assert_eq!(s.entry("Tuesday", 0).unwrap().subject_code, "TOC");
        assert!(s.entry("Tuesday", 1).is_none());
        assert!(s.entry("Monday", 0).is_none());
    }

    #[test]
    fn test_entries_and_counts() {
        let s = sample();
        assert_eq!(s.occupied_count(), 2);
        assert_eq!(s.hours_for("TOC"), 1);
        assert_eq!(s.hours_for("OS"), 0);

        let collected: Vec<_> = s.entries().collect();
        assert_eq!(collected[0].0, "Tuesday");
        assert_eq!(collected[1].2.block_id.as_deref(), Some("ML_LAB_lab_0"));
    }

    #[test]
    fn test_serde_omits_absent_block_id() {
        let s = sample();
        let json = serde_json::to_string(&s).unwrap();
        // Theory entries serialize without a block_id key at all.
        assert!(!json.contains("\"block_id\":null"));
        let back: SectionSchedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back.occupied_count(), 2);
    }
}
