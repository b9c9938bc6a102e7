//! The timetable grid individual and candidate generation.
//!
//! A grid cell holds `Option<usize>`: an index into the section's period
//! arena, or empty. Lab sessions occupy the two cells of a declared lab
//! slot pair with the same index; that pairing is the unit every operator
//! must preserve or restore.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::ga::SectionProblem;
use crate::models::WeekConfig;

/// One candidate weekly timetable for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timetable {
    /// `cells[day][slot]` → period arena index, or empty.
    cells: Vec<Vec<Option<usize>>>,
}

impl Timetable {
    /// Creates an all-empty grid for the given week layout.
    pub fn empty(week: &WeekConfig) -> Self {
        Self {
            cells: vec![vec![None; week.slots_per_day]; week.day_count()],
        }
    }

    /// Number of days in the grid.
    #[inline]
    pub fn day_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of slots per day.
    #[inline]
    pub fn slots_per_day(&self) -> usize {
        self.cells.first().map(Vec::len).unwrap_or(0)
    }

    /// The period index at a cell.
    #[inline]
    pub fn get(&self, day: usize, slot: usize) -> Option<usize> {
        self.cells[day][slot]
    }

    /// Occupies a cell.
    #[inline]
    pub fn set(&mut self, day: usize, slot: usize, period_id: usize) {
        self.cells[day][slot] = Some(period_id);
    }

    /// Empties a cell.
    #[inline]
    pub fn clear(&mut self, day: usize, slot: usize) {
        self.cells[day][slot] = None;
    }

    /// Swaps the contents of two cells (possibly across days).
    pub fn swap_cells(&mut self, a: (usize, usize), b: (usize, usize)) {
        if a == b {
            return;
        }
        let tmp = self.cells[a.0][a.1];
        self.cells[a.0][a.1] = self.cells[b.0][b.1];
        self.cells[b.0][b.1] = tmp;
    }

    /// Iterates occupied cells as (day, slot, period index).
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.cells.iter().enumerate().flat_map(|(day, slots)| {
            slots
                .iter()
                .enumerate()
                .filter_map(move |(slot, cell)| cell.map(|id| (day, slot, id)))
        })
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// All cells currently holding a period index, in day/slot order.
    pub fn cells_holding(&self, period_id: usize) -> Vec<(usize, usize)> {
        self.occupied()
            .filter(|&(_, _, id)| id == period_id)
            .map(|(day, slot, _)| (day, slot))
            .collect()
    }

    /// Whether a complete lab block sits at a pair start: the slot opens a
    /// declared pair and both cells hold the same lab period.
    pub fn has_block_at(&self, problem: &SectionProblem, day: usize, start: usize) -> bool {
        let Some((s, e)) = problem.week.pair_starting_at(start) else {
            return false;
        };
        match (self.get(day, s), self.get(day, e)) {
            (Some(a), Some(b)) => a == b && problem.period(a).is_lab(),
            _ => false,
        }
    }

    /// Locates the complete block of a lab period, scanning days then
    /// pairs in declared order.
    pub fn find_block(&self, problem: &SectionProblem, period_id: usize) -> Option<(usize, usize)> {
        for day in 0..self.day_count() {
            for &(start, end) in &problem.week.lab_pairs {
                if self.get(day, start) == Some(period_id) && self.get(day, end) == Some(period_id)
                {
                    return Some((day, start));
                }
            }
        }
        None
    }

    /// First lab pair whose two cells are both empty and unreserved,
    /// scanning days then pairs in declared order.
    pub fn first_free_pair(&self, week: &WeekConfig) -> Option<(usize, usize, usize)> {
        for day in 0..self.day_count() {
            for &(start, end) in &week.lab_pairs {
                if self.get(day, start).is_none()
                    && self.get(day, end).is_none()
                    && !week.is_reserved(day, start)
                    && !week.is_reserved(day, end)
                {
                    return Some((day, start, end));
                }
            }
        }
        None
    }

    /// Generates one random but structurally valid candidate.
    ///
    /// Labs are placed first: each session tries all (day, pair)
    /// combinations in freshly shuffled order and takes the first fully
    /// empty one; an exhausted search leaves the session unplaced for this
    /// individual. Theory periods then draw from a single shuffled list of
    /// the remaining free cells.
    ///
    /// By construction no two periods share a cell and every placed lab is
    /// a complete block.
    pub fn random<R: Rng>(problem: &SectionProblem, rng: &mut R) -> Self {
        let week = &problem.week;
        let mut grid = Self::empty(week);

        let mut pair_slots: Vec<(usize, usize, usize)> = Vec::new();
        for day in 0..week.day_count() {
            for &(start, end) in &week.lab_pairs {
                if !week.is_reserved(day, start) && !week.is_reserved(day, end) {
                    pair_slots.push((day, start, end));
                }
            }
        }

        for lab_id in problem.lab_period_ids() {
            pair_slots.shuffle(rng);
            for &(day, start, end) in &pair_slots {
                if grid.get(day, start).is_none() && grid.get(day, end).is_none() {
                    grid.set(day, start, lab_id);
                    grid.set(day, end, lab_id);
                    break;
                }
            }
        }

        let mut free: Vec<(usize, usize)> = Vec::new();
        for day in 0..week.day_count() {
            for slot in 0..week.slots_per_day {
                if grid.get(day, slot).is_none() && !week.is_reserved(day, slot) {
                    free.push((day, slot));
                }
            }
        }
        free.shuffle(rng);

        for theory_id in problem.theory_period_ids() {
            if let Some((day, slot)) = free.pop() {
                grid.set(day, slot, theory_id);
            }
        }

        grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, SubjectAssignment};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> SectionProblem {
        let section = Section::new("A")
            .with_assignment(SubjectAssignment::theory("TOC", "Dr. Smith", 3))
            .with_assignment(SubjectAssignment::lab("ML_LAB", "Dr. Brown", 4));
        SectionProblem::new(&section, WeekConfig::default())
    }

    #[test]
    fn test_random_places_everything_once() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..50 {
            let grid = Timetable::random(&problem, &mut rng);
            // 3 theory cells + 2 sessions × 2 cells.
            assert_eq!(grid.occupied_count(), 7);
            for &lab_id in &problem.lab_period_ids() {
                assert!(grid.find_block(&problem, lab_id).is_some());
                assert_eq!(grid.cells_holding(lab_id).len(), 2);
            }
            for &theory_id in &problem.theory_period_ids() {
                assert_eq!(grid.cells_holding(theory_id).len(), 1);
            }
        }
    }

    #[test]
    fn test_random_respects_reserved_cells() {
        let section = Section::new("A")
            .with_assignment(SubjectAssignment::theory("TOC", "Dr. Smith", 5));
        let week = WeekConfig::default().with_reserved(3, 5);
        let problem = SectionProblem::new(&section, week);
        let mut rng = SmallRng::seed_from_u64(7);

        for _ in 0..50 {
            let grid = Timetable::random(&problem, &mut rng);
            assert!(grid.get(3, 5).is_none());
        }
    }

    #[test]
    fn test_block_detection() {
        let problem = sample_problem();
        let lab_id = problem.lab_period_ids()[0];
        let mut grid = Timetable::empty(&problem.week);
        grid.set(0, 2, lab_id);
        grid.set(0, 3, lab_id);

        assert!(grid.has_block_at(&problem, 0, 2));
        assert!(!grid.has_block_at(&problem, 0, 3)); // not a pair start
        assert_eq!(grid.find_block(&problem, lab_id), Some((0, 2)));

        // Half a block is not a block.
        grid.clear(0, 3);
        assert!(!grid.has_block_at(&problem, 0, 2));
        assert_eq!(grid.find_block(&problem, lab_id), None);
    }

    #[test]
    fn test_first_free_pair_scan_order() {
        let problem = sample_problem();
        let mut grid = Timetable::empty(&problem.week);
        assert_eq!(grid.first_free_pair(&problem.week), Some((0, 0, 1)));

        grid.set(0, 0, 99);
        assert_eq!(grid.first_free_pair(&problem.week), Some((0, 2, 3)));
    }

    #[test]
    fn test_swap_cells_self_noop() {
        let problem = sample_problem();
        let mut grid = Timetable::empty(&problem.week);
        grid.set(1, 1, 0);
        grid.swap_cells((1, 1), (1, 1));
        assert_eq!(grid.get(1, 1), Some(0));

        grid.swap_cells((1, 1), (2, 0));
        assert_eq!(grid.get(1, 1), None);
        assert_eq!(grid.get(2, 0), Some(0));
    }

    #[test]
    fn test_more_theory_than_cells_leaves_excess_unplaced() {
        // 2 days × 2 slots = 4 cells but 6 theory hours.
        let week = WeekConfig::default()
            .with_days(vec!["Monday".into(), "Tuesday".into()])
            .with_slots_per_day(2)
            .with_lab_pairs(vec![(0, 1)]);
        let section =
            Section::new("A").with_assignment(SubjectAssignment::theory("TOC", "Dr. Smith", 6));
        let problem = SectionProblem::new(&section, week);
        let mut rng = SmallRng::seed_from_u64(3);

        let grid = Timetable::random(&problem, &mut rng);
        assert_eq!(grid.occupied_count(), 4);
    }
}
