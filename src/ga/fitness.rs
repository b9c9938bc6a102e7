//! Rule-based fitness evaluation.
//!
//! Scores one grid against the owning section's requirements and the
//! global ledgers. The score starts at [`FitnessWeights::base`] and each
//! rule category adds or subtracts independently; categories are additive,
//! so evaluation order is irrelevant. No normalization — the raw sum is
//! the sole comparison key, ties broken by population order.
//!
//! Hard rules (clashes, broken lab blocks, hour mismatches) carry weights
//! an order of magnitude above the soft shaping rules (spread, gaps,
//! front-loading), so selection fixes feasibility before aesthetics.

use std::collections::{HashMap, HashSet};

use crate::ga::config::FitnessWeights;
use crate::ga::{SectionProblem, Timetable};
use crate::ledger::Ledgers;

/// Evaluates one grid. Higher is better.
pub fn evaluate(
    problem: &SectionProblem,
    grid: &Timetable,
    ledgers: &Ledgers,
    weights: &FitnessWeights,
) -> i64 {
    let week = &problem.week;
    let mut score = weights.base;

    // Faculty clashes: duplicates within the grid, plus cells the ledger
    // already assigns to a different section.
    let mut seen_cells: HashSet<(&str, usize, usize)> = HashSet::new();
    for (day, slot, id) in grid.occupied() {
        let faculty = problem.period(id).faculty.as_str();
        if !seen_cells.insert((faculty, day, slot)) {
            score -= weights.faculty_clash;
        }
        if ledgers.faculty.is_clash(faculty, day, slot, &problem.section) {
            score -= weights.faculty_clash;
        }
    }

    // Weekly-hour conformance, per assignment.
    let mut subject_cells: HashMap<&str, i64> = HashMap::new();
    for (_, _, id) in grid.occupied() {
        *subject_cells
            .entry(problem.period(id).subject_code.as_str())
            .or_insert(0) += 1;
    }
    for assignment in &problem.assignments {
        let expected = assignment.effective_hours() as i64;
        let actual = subject_cells
            .get(assignment.code.as_str())
            .copied()
            .unwrap_or(0);
        score -= (expected - actual).abs() * weights.hour_mismatch;
    }

    // Lab continuity: every lab cell must sit inside a declared pair whose
    // two cells carry the same block.
    for (day, slot, id) in grid.occupied() {
        if !problem.period(id).is_lab() {
            continue;
        }
        let complete = week.pair_containing(slot).is_some_and(|(start, end)| {
            grid.get(day, start) == Some(id) && grid.get(day, end) == Some(id)
        });
        if !complete {
            score -= weights.lab_break;
        }
    }

    // Lab day spread and the lab-slot ledger, over complete blocks only.
    let mut session_days: HashMap<&str, Vec<usize>> = HashMap::new();
    for day in 0..grid.day_count() {
        for &(start, _) in &week.lab_pairs {
            if !grid.has_block_at(problem, day, start) {
                continue;
            }
            let Some(id) = grid.get(day, start) else {
                continue;
            };
            session_days
                .entry(problem.period(id).subject_code.as_str())
                .or_default()
                .push(day);
            if ledgers.labs.is_clash(day, start, &problem.section) {
                score -= weights.faculty_clash;
            }
        }
    }
    for days in session_days.values() {
        if days.len() < 2 {
            continue;
        }
        let distinct: HashSet<usize> = days.iter().copied().collect();
        score -= (days.len() - distinct.len()) as i64 * weights.lab_day_collapse;
        if days.len() == 2 && distinct.len() == 1 {
            score -= weights.lab_pair_same_day;
        }
    }

    // Faculty weekly load ceiling.
    let mut load: HashMap<&str, usize> = HashMap::new();
    for (_, _, id) in grid.occupied() {
        *load.entry(problem.period(id).faculty.as_str()).or_insert(0) += 1;
    }
    for &cells in load.values() {
        if cells > weights.load_threshold {
            score -= (cells - weights.load_threshold) as i64 * weights.load_excess;
        }
    }

    // Theory subject repeated within one day.
    for day in 0..grid.day_count() {
        let mut daily: HashMap<&str, i64> = HashMap::new();
        for slot in 0..grid.slots_per_day() {
            if let Some(id) = grid.get(day, slot) {
                let period = problem.period(id);
                if !period.is_lab() {
                    *daily.entry(period.subject_code.as_str()).or_insert(0) += 1;
                }
            }
        }
        for &count in daily.values() {
            if count > 1 {
                score -= (count - 1) * weights.theory_repeat;
            }
        }
    }

    // Same subject in the same slot on adjacent days.
    for day in 0..grid.day_count().saturating_sub(1) {
        for slot in 0..grid.slots_per_day() {
            if let (Some(a), Some(b)) = (grid.get(day, slot), grid.get(day + 1, slot)) {
                if problem.period(a).subject_code == problem.period(b).subject_code {
                    score -= weights.consecutive_repeat;
                }
            }
        }
    }

    // Same subject pinned to one slot index across the week.
    for slot in 0..grid.slots_per_day() {
        let mut seen: HashSet<&str> = HashSet::new();
        for day in 0..grid.day_count() {
            if let Some(id) = grid.get(day, slot) {
                if !seen.insert(problem.period(id).subject_code.as_str()) {
                    score -= weights.slot_repeat;
                }
            }
        }
    }

    // Gaps within each day's span, and the trailing-free bonus.
    for day in 0..grid.day_count() {
        let occupied: Vec<usize> = (0..grid.slots_per_day())
            .filter(|&slot| grid.get(day, slot).is_some())
            .collect();
        if let (Some(&first), Some(&last)) = (occupied.first(), occupied.last()) {
            let gaps = (last - first + 1 - occupied.len()) as i64;
            score -= gaps * weights.gap;
            if last < grid.slots_per_day() - 1 {
                score += (grid.slots_per_day() - 1 - last) as i64 * weights.trailing_free_bonus;
            }
        }
    }

    // Reserved cells occupied anyway (operators can drift periods there).
    for &(day, slot) in &week.reserved {
        if grid.get(day, slot).is_some() {
            score -= weights.reserved_cell;
        }
    }

    score
}
