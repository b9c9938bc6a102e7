//! Week structure: working days, slot counts, lab slot pairs.
//!
//! The engine works on day indices; day names appear only at the
//! boundaries (seeding ledgers from prior schedules, formatting results).
//!
//! Lab sessions may start only at the declared slot pairs; every pair is
//! two adjacent slots. Reserved cells are never used by placement or
//! repair and are penalized by fitness when occupied anyway.

use serde::{Deserialize, Serialize};

/// Fixed week layout for one scheduling run.
///
/// # Examples
///
/// ```
/// use timetable_ga::models::WeekConfig;
///
/// let week = WeekConfig::default();
/// assert_eq!(week.day_count(), 5);
/// assert_eq!(week.slots_per_day, 6);
/// assert_eq!(week.lab_pairs, vec![(0, 1), (2, 3), (4, 5)]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekConfig {
    /// Working day names, in week order.
    pub days: Vec<String>,
    /// Slots per working day.
    pub slots_per_day: usize,
    /// (start, end) slot pairs that may host a lab session. `end = start + 1`.
    pub lab_pairs: Vec<(usize, usize)>,
    /// (day index, slot) cells kept free by institutional rule.
    pub reserved: Vec<(usize, usize)>,
}

impl Default for WeekConfig {
    fn default() -> Self {
        Self {
            days: ["Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            slots_per_day: 6,
            lab_pairs: vec![(0, 1), (2, 3), (4, 5)],
            reserved: Vec::new(),
        }
    }
}

impl WeekConfig {
    /// Sets the working days.
    pub fn with_days(mut self, days: Vec<String>) -> Self {
        self.days = days;
        self
    }

    /// Sets the number of slots per day.
    pub fn with_slots_per_day(mut self, slots: usize) -> Self {
        self.slots_per_day = slots;
        self
    }

    /// Sets the lab slot pairs.
    pub fn with_lab_pairs(mut self, pairs: Vec<(usize, usize)>) -> Self {
        self.lab_pairs = pairs;
        self
    }

    /// Marks a cell as reserved (never scheduled).
    pub fn with_reserved(mut self, day: usize, slot: usize) -> Self {
        self.reserved.push((day, slot));
        self
    }

    /// Number of working days.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Index of a day name, if it is a working day.
    pub fn day_index(&self, name: &str) -> Option<usize> {
        self.days.iter().position(|d| d == name)
    }

    /// Whether a cell is reserved.
    pub fn is_reserved(&self, day: usize, slot: usize) -> bool {
        self.reserved.contains(&(day, slot))
    }

    /// The lab pair starting at `slot`, if any.
    pub fn pair_starting_at(&self, slot: usize) -> Option<(usize, usize)> {
        self.lab_pairs.iter().copied().find(|&(s, _)| s == slot)
    }

    /// The lab pair containing `slot` (as either half), if any.
    pub fn pair_containing(&self, slot: usize) -> Option<(usize, usize)> {
        self.lab_pairs
            .iter()
            .copied()
            .find(|&(s, e)| s == slot || e == slot)
    }

    /// Validates the week layout.
    pub fn validate(&self) -> Result<(), String> {
        if self.days.is_empty() {
            return Err("at least one working day is required".into());
        }
        if self.slots_per_day == 0 {
            return Err("slots_per_day must be at least 1".into());
        }
        for &(start, end) in &self.lab_pairs {
            if end != start + 1 {
                return Err(format!("lab pair ({start}, {end}) is not adjacent"));
            }
            if end >= self.slots_per_day {
                return Err(format!("lab pair ({start}, {end}) exceeds slots_per_day"));
            }
        }
        for &(day, slot) in &self.reserved {
            if day >= self.days.len() || slot >= self.slots_per_day {
                return Err(format!("reserved cell ({day}, {slot}) out of range"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_week() {
        let week = WeekConfig::default();
        assert_eq!(week.day_count(), 5);
        assert_eq!(week.day_index("Tuesday"), Some(0));
        assert_eq!(week.day_index("Saturday"), Some(4));
        assert_eq!(week.day_index("Monday"), None);
        assert!(week.validate().is_ok());
    }

    #[test]
    fn test_pair_lookups() {
        let week = WeekConfig::default();
        assert_eq!(week.pair_starting_at(2), Some((2, 3)));
        assert_eq!(week.pair_starting_at(3), None);
        assert_eq!(week.pair_containing(3), Some((2, 3)));
        assert_eq!(week.pair_containing(5), Some((4, 5)));
    }

    #[test]
    fn test_reserved_cells() {
        // Friday (index 3) last period kept free.
        let week = WeekConfig::default().with_reserved(3, 5);
        assert!(week.is_reserved(3, 5));
        assert!(!week.is_reserved(3, 4));
        assert!(week.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_pairs() {
        let week = WeekConfig::default().with_lab_pairs(vec![(0, 2)]);
        assert!(week.validate().is_err());

        let week = WeekConfig::default().with_lab_pairs(vec![(5, 6)]);
        assert!(week.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_range_reserved() {
        let week = WeekConfig::default().with_reserved(9, 0);
        assert!(week.validate().is_err());
    }
}
