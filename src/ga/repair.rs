//! Post-operator feasibility repair.
//!
//! Crossover and mutation recombine cells freely, so an offspring can hold
//! a period twice, hold half of a lab session, or miss a period entirely.
//! This pass restores exact multiplicities: surplus occurrences are removed
//! first (lab fragments and duplicate blocks atomically, theory cells
//! individually), then deficits are reinserted into the first compatible
//! free cells — lab pairs for labs, any unreserved cell for theory. All
//! scans run in day/slot order, so the outcome is deterministic for a given
//! input grid.
//!
//! Repair restores counts only; qualitative placement (clashes, spread,
//! gaps) stays the fitness evaluator's job.

use std::collections::{HashMap, HashSet};

use crate::ga::{SectionProblem, Timetable};

/// Restores exact period multiplicities in place.
pub fn repair(grid: &mut Timetable, problem: &SectionProblem) {
    let missing_labs = trim_labs(grid, problem);
    trim_theory(grid, problem);
    insert_labs(grid, problem, &missing_labs);
    insert_theory(grid, problem);
}

/// Reduces every lab session to at most one complete block, clearing
/// fragments and duplicate blocks. Returns the sessions left without any
/// block.
fn trim_labs(grid: &mut Timetable, problem: &SectionProblem) -> Vec<usize> {
    let mut missing = Vec::new();

    for lab_id in problem.lab_period_ids() {
        let kept = grid.find_block(problem, lab_id).and_then(|(day, start)| {
            problem
                .week
                .pair_starting_at(start)
                .map(|(s, e)| [(day, s), (day, e)])
        });

        for (day, slot) in grid.cells_holding(lab_id) {
            if !kept.is_some_and(|cells| cells.contains(&(day, slot))) {
                grid.clear(day, slot);
            }
        }
        if kept.is_none() {
            missing.push(lab_id);
        }
    }

    missing
}

/// Clears surplus theory cells per subject, keeping the earliest in scan
/// order.
fn trim_theory(grid: &mut Timetable, problem: &SectionProblem) {
    let required = problem.theory_requirements();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for day in 0..grid.day_count() {
        for slot in 0..grid.slots_per_day() {
            let Some(id) = grid.get(day, slot) else {
                continue;
            };
            let period = problem.period(id);
            if period.is_lab() {
                continue;
            }
            let subject = period.subject_code.as_str();
            let count = counts.entry(subject).or_insert(0);
            if *count >= required.get(subject).copied().unwrap_or(0) {
                grid.clear(day, slot);
            } else {
                *count += 1;
            }
        }
    }
}

/// Places blockless lab sessions at the first free pair, days in order.
fn insert_labs(grid: &mut Timetable, problem: &SectionProblem, missing: &[usize]) {
    for &lab_id in missing {
        if let Some((day, start, end)) = grid.first_free_pair(&problem.week) {
            grid.set(day, start, lab_id);
            grid.set(day, end, lab_id);
        }
        // No free pair: the session stays unplaced and fitness keeps
        // penalizing the shortfall.
    }
}

/// Fills theory deficits into the first free unreserved cells, subjects in
/// assignment order. Unused period handles go in first so a fully repaired
/// grid references every period exactly once.
fn insert_theory(grid: &mut Timetable, problem: &SectionProblem) {
    let required = problem.theory_requirements();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut placed: HashSet<usize> = HashSet::new();
    for (_, _, id) in grid.occupied() {
        let period = problem.period(id);
        if !period.is_lab() {
            *counts.entry(period.subject_code.as_str()).or_insert(0) += 1;
        }
        placed.insert(id);
    }

    let mut spares: HashMap<&str, Vec<usize>> = HashMap::new();
    for id in problem.theory_period_ids() {
        if !placed.contains(&id) {
            spares
                .entry(problem.period(id).subject_code.as_str())
                .or_default()
                .push(id);
        }
    }

    let week = &problem.week;
    let days = grid.day_count();
    let slots = grid.slots_per_day();
    let mut free = (0..days).flat_map(move |day| (0..slots).map(move |slot| (day, slot)));

    for assignment in problem.assignments.iter().filter(|a| !a.is_lab()) {
        let subject = assignment.code.as_str();
        let need = required.get(subject).copied().unwrap_or(0);
        loop {
            let have = counts.get(subject).copied().unwrap_or(0);
            if have >= need {
                break;
            }
            let id = match spares.get_mut(subject).and_then(Vec::pop) {
                Some(id) => id,
                None => match first_theory_id(problem, subject) {
                    Some(id) => id,
                    None => break,
                },
            };
            let Some((day, slot)) = free
                .find(|&(day, slot)| grid.get(day, slot).is_none() && !week.is_reserved(day, slot))
            else {
                break;
            };
            grid.set(day, slot, id);
            *counts.entry(subject).or_insert(0) += 1;
        }
    }
}

fn first_theory_id(problem: &SectionProblem, subject: &str) -> Option<usize> {
    problem
        .periods
        .iter()
        .position(|p| !p.is_lab() && p.subject_code == subject)
}
