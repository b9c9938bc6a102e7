//! Genetic operators: tournament selection, positional crossover, and
//! swap/relocate mutation.
//!
//! Crossover and mutation treat a complete lab block as one token: a block
//! is exchanged or moved as a whole wherever the operator can see it.
//! Cells holding lab fragments (a block already split by an earlier
//! operator) are handled like ordinary cells; the repair pass restores
//! their multiplicities afterwards.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::ga::{SectionProblem, Timetable};

/// Tournament parent selection.
///
/// Samples `tournament_size` candidates uniformly with replacement and
/// keeps the fittest, once per population slot. Returns indices into the
/// scored population.
pub fn select_parents<R: Rng>(fitness: &[i64], tournament_size: usize, rng: &mut R) -> Vec<usize> {
    let n = fitness.len();
    let mut parents = Vec::with_capacity(n);
    for _ in 0..n {
        let mut winner = rng.random_range(0..n);
        for _ in 1..tournament_size {
            let challenger = rng.random_range(0..n);
            if fitness[challenger] > fitness[winner] {
                winner = challenger;
            }
        }
        parents.push(winner);
    }
    parents
}

/// Positional crossover over the day-then-slot cell ordering.
///
/// With probability `rate`, picks a uniform (day, slot) cut point and
/// exchanges every cell at or after it between the two offspring. A cell
/// that opens a lab slot pair where either parent holds a complete block
/// is exchanged together with its paired cell, which is then skipped, so
/// a whole block never splits across offspring at the pair boundary.
pub fn crossover<R: Rng>(
    parent1: &Timetable,
    parent2: &Timetable,
    problem: &SectionProblem,
    rate: f64,
    rng: &mut R,
) -> (Timetable, Timetable) {
    let days = parent1.day_count();
    let slots = parent1.slots_per_day();
    if days == 0 || slots == 0 || rng.random::<f64>() > rate {
        return (parent1.clone(), parent2.clone());
    }

    let cut_day = rng.random_range(0..days);
    let cut_slot = rng.random_range(0..slots);
    crossover_at(parent1, parent2, problem, cut_day, cut_slot)
}

/// Crossover with a fixed cut point; see [`crossover`].
pub fn crossover_at(
    parent1: &Timetable,
    parent2: &Timetable,
    problem: &SectionProblem,
    cut_day: usize,
    cut_slot: usize,
) -> (Timetable, Timetable) {
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();

    let days = child1.day_count();
    let slots = child1.slots_per_day();
    let mut day = cut_day;
    let mut slot = cut_slot;

    while day < days {
        let block_end = problem.week.pair_starting_at(slot).and_then(|(start, end)| {
            let whole = child1.has_block_at(problem, day, start)
                || child2.has_block_at(problem, day, start);
            whole.then_some(end)
        });

        exchange(&mut child1, &mut child2, day, slot);
        if let Some(end) = block_end {
            exchange(&mut child1, &mut child2, day, end);
            slot = end + 1;
        } else {
            slot += 1;
        }

        if slot >= slots {
            slot = 0;
            day += 1;
        }
    }

    (child1, child2)
}

/// Swaps one cell's contents between two grids.
fn exchange(a: &mut Timetable, b: &mut Timetable, day: usize, slot: usize) {
    let from_a = a.get(day, slot);
    let from_b = b.get(day, slot);
    match from_b {
        Some(id) => a.set(day, slot, id),
        None => a.clear(day, slot),
    }
    match from_a {
        Some(id) => b.set(day, slot, id),
        None => b.clear(day, slot),
    }
}

/// Swap/relocate mutation.
///
/// With probability `rate`, picks two random cells. Lab periods are never
/// moved by the cell: two labs swap their whole blocks, a lab paired with
/// a theory-or-empty cell relocates wholly to an empty lab slot pair
/// chosen in randomized order, and two theory-or-empty cells swap
/// directly. A cell swapped with itself is a no-op.
pub fn mutate<R: Rng>(grid: &mut Timetable, problem: &SectionProblem, rate: f64, rng: &mut R) {
    if rng.random::<f64>() > rate {
        return;
    }

    let days = grid.day_count();
    let slots = grid.slots_per_day();
    if days == 0 || slots == 0 {
        return;
    }

    let a = (rng.random_range(0..days), rng.random_range(0..slots));
    let b = (rng.random_range(0..days), rng.random_range(0..slots));

    let pa = grid.get(a.0, a.1);
    let pb = grid.get(b.0, b.1);
    let is_lab = |id: Option<usize>| id.is_some_and(|id| problem.period(id).is_lab());

    match (pa, pb) {
        (Some(x), Some(y)) if is_lab(pa) && is_lab(pb) => swap_blocks(grid, problem, x, y),
        (Some(x), _) if is_lab(pa) => relocate_block(grid, problem, x, rng),
        (_, Some(y)) if is_lab(pb) => relocate_block(grid, problem, y, rng),
        _ => grid.swap_cells(a, b),
    }
}

/// Exchanges the complete blocks of two lab periods.
///
/// Fragmented blocks are left alone; repair reassembles them.
fn swap_blocks(grid: &mut Timetable, problem: &SectionProblem, x: usize, y: usize) {
    if x == y {
        return;
    }
    let (Some((dx, sx)), Some((dy, sy))) = (
        grid.find_block(problem, x),
        grid.find_block(problem, y),
    ) else {
        return;
    };
    let (Some((sx, ex)), Some((sy, ey))) = (
        problem.week.pair_starting_at(sx),
        problem.week.pair_starting_at(sy),
    ) else {
        return;
    };

    grid.set(dx, sx, y);
    grid.set(dx, ex, y);
    grid.set(dy, sy, x);
    grid.set(dy, ey, x);
}

/// Moves a lab period's complete block to an empty lab pair, trying
/// (day, pair) combinations in randomized order.
fn relocate_block<R: Rng>(grid: &mut Timetable, problem: &SectionProblem, id: usize, rng: &mut R) {
    let Some((from_day, from_start)) = grid.find_block(problem, id) else {
        return;
    };
    let Some((from_start, from_end)) = problem.week.pair_starting_at(from_start) else {
        return;
    };

    let week = &problem.week;
    let mut candidates: Vec<(usize, usize, usize)> = Vec::new();
    for day in 0..grid.day_count() {
        for &(start, end) in &week.lab_pairs {
            if grid.get(day, start).is_none()
                && grid.get(day, end).is_none()
                && !week.is_reserved(day, start)
                && !week.is_reserved(day, end)
            {
                candidates.push((day, start, end));
            }
        }
    }
    let Some(&(day, start, end)) = candidates.choose(rng) else {
        return;
    };

    grid.clear(from_day, from_start);
    grid.clear(from_day, from_end);
    grid.set(day, start, id);
    grid.set(day, end, id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Section, SubjectAssignment, WeekConfig};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn sample_problem() -> SectionProblem {
        let section = Section::new("A")
            .with_assignment(SubjectAssignment::theory("TOC", "Dr. Smith", 3))
            .with_assignment(SubjectAssignment::theory("CNS", "Dr. Jones", 4))
            .with_assignment(SubjectAssignment::lab("ML_LAB", "Dr. Brown", 4));
        SectionProblem::new(&section, WeekConfig::default())
    }

    #[test]
    fn test_tournament_prefers_fit_individuals() {
        let fitness = vec![10, 900, 50, 40, 800];
        let mut rng = SmallRng::seed_from_u64(42);
        let parents = select_parents(&fitness, 3, &mut rng);
        assert_eq!(parents.len(), 5);

        // Over many rounds the best individual wins far more often than
        // uniform sampling would give it.
        let mut wins = 0;
        for _ in 0..200 {
            wins += select_parents(&fitness, 3, &mut rng)
                .iter()
                .filter(|&&i| i == 1)
                .count();
        }
        assert!(wins > 300, "index 1 won only {wins} of 1000 slots");
    }

    #[test]
    fn test_crossover_rate_zero_copies_parents() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Timetable::random(&problem, &mut rng);
        let p2 = Timetable::random(&problem, &mut rng);

        let (c1, c2) = crossover(&p1, &p2, &problem, 0.0, &mut rng);
        assert_eq!(c1, p1);
        assert_eq!(c2, p2);
    }

    #[test]
    fn test_crossover_exchanges_suffix() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let p1 = Timetable::random(&problem, &mut rng);
        let p2 = Timetable::random(&problem, &mut rng);

        let (c1, c2) = crossover(&p1, &p2, &problem, 1.0, &mut rng);

        // Cell-content multiset is conserved across the pair of offspring.
        let mut combined_parents: Vec<Option<usize>> = Vec::new();
        let mut combined_children: Vec<Option<usize>> = Vec::new();
        for day in 0..p1.day_count() {
            for slot in 0..p1.slots_per_day() {
                combined_parents.push(p1.get(day, slot));
                combined_parents.push(p2.get(day, slot));
                combined_children.push(c1.get(day, slot));
                combined_children.push(c2.get(day, slot));
            }
        }
        combined_parents.sort();
        combined_children.sort();
        assert_eq!(combined_parents, combined_children);
    }

    #[test]
    fn test_crossover_exchanges_block_atomically_at_pair_start() {
        // Parents hold different labs on the same pair; any cut at or
        // before the pair start must move each block whole.
        let problem = sample_problem();
        let labs = problem.lab_period_ids();

        let mut p1 = Timetable::empty(&problem.week);
        p1.set(4, 2, labs[0]);
        p1.set(4, 3, labs[0]);
        let mut p2 = Timetable::empty(&problem.week);
        p2.set(4, 2, labs[1]);
        p2.set(4, 3, labs[1]);

        for cut in [(0, 0), (2, 5), (4, 0), (4, 2)] {
            let (c1, c2) = crossover_at(&p1, &p2, &problem, cut.0, cut.1);
            assert_eq!(c1.cells_holding(labs[1]), vec![(4, 2), (4, 3)]);
            assert_eq!(c2.cells_holding(labs[0]), vec![(4, 2), (4, 3)]);
            assert!(c1.cells_holding(labs[0]).is_empty());
            assert!(c2.cells_holding(labs[1]).is_empty());
        }
    }

    #[test]
    fn test_crossover_cut_inside_pair_may_split_blocks() {
        // A cut landing on the second cell of a pair exchanges that cell
        // alone; the resulting fragments are what the repair pass exists
        // to mend.
        let problem = sample_problem();
        let labs = problem.lab_period_ids();

        let mut p1 = Timetable::empty(&problem.week);
        p1.set(4, 2, labs[0]);
        p1.set(4, 3, labs[0]);
        let mut p2 = Timetable::empty(&problem.week);
        p2.set(4, 2, labs[1]);
        p2.set(4, 3, labs[1]);

        let (c1, c2) = crossover_at(&p1, &p2, &problem, 4, 3);
        assert_eq!(c1.cells_holding(labs[0]), vec![(4, 2)]);
        assert_eq!(c1.cells_holding(labs[1]), vec![(4, 3)]);
        assert_eq!(c2.cells_holding(labs[0]), vec![(4, 3)]);
        assert_eq!(c2.cells_holding(labs[1]), vec![(4, 2)]);
    }

    #[test]
    fn test_mutation_rate_zero_is_noop() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(42);
        let grid = Timetable::random(&problem, &mut rng);
        let mut mutated = grid.clone();
        mutate(&mut mutated, &problem, 0.0, &mut rng);
        assert_eq!(mutated, grid);
    }

    #[test]
    fn test_mutation_preserves_lab_blocks() {
        let problem = sample_problem();
        let labs = problem.lab_period_ids();
        let mut rng = SmallRng::seed_from_u64(11);

        for _ in 0..300 {
            let mut grid = Timetable::random(&problem, &mut rng);
            mutate(&mut grid, &problem, 1.0, &mut rng);

            for &lab in &labs {
                let cells = grid.cells_holding(lab);
                assert_eq!(cells.len(), 2, "lab lost cells: {cells:?}");
                let (day, start) = cells[0];
                assert!(
                    grid.has_block_at(&problem, day, start),
                    "lab no longer a whole block: {cells:?}"
                );
            }
        }
    }

    #[test]
    fn test_mutation_conserves_theory_cells() {
        let problem = sample_problem();
        let mut rng = SmallRng::seed_from_u64(23);

        for _ in 0..300 {
            let mut grid = Timetable::random(&problem, &mut rng);
            let before = grid.occupied_count();
            mutate(&mut grid, &problem, 1.0, &mut rng);
            assert_eq!(grid.occupied_count(), before);
        }
    }

    #[test]
    fn test_swap_blocks_moves_whole_sessions() {
        let problem = sample_problem();
        let labs = problem.lab_period_ids();
        let mut grid = Timetable::empty(&problem.week);
        grid.set(0, 0, labs[0]);
        grid.set(0, 1, labs[0]);
        grid.set(3, 4, labs[1]);
        grid.set(3, 5, labs[1]);

        swap_blocks(&mut grid, &problem, labs[0], labs[1]);

        assert_eq!(grid.find_block(&problem, labs[0]), Some((3, 4)));
        assert_eq!(grid.find_block(&problem, labs[1]), Some((0, 0)));
    }
}
