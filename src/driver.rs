//! Per-section evolution loop and the sequential multi-section run.
//!
//! Each section moves through three phases: initializing (random
//! candidates passed through repair), evolving (evaluate → select →
//! crossover → mutate → repair, with elitism), and converged (fitness
//! threshold reached or generation budget spent). The best-ever individual
//! is then committed to the global ledgers before the next section starts,
//! so earlier sections' placements become hard constraints for later ones.
//!
//! Sections run strictly sequentially and in input order; within a
//! generation only fitness evaluation is parallelizable, and only when
//! [`GaConfig::parallel`] asks for it.

use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ga::repair::repair;
use crate::ga::{fitness, operators, GaConfig, SectionProblem, Timetable};
use crate::ledger::{Ledgers, PriorScheduleStore, TermScope};
use crate::models::{ScheduledEntry, Section, SectionSchedule, WeekConfig};
use crate::validation;

/// Why a section's evolution loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Convergence {
    /// Best-ever fitness reached the configured threshold.
    FitnessThreshold,
    /// The generation budget ran out first.
    GenerationBudget,
}

/// Summary of one section's evolutionary run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionReport {
    /// Best fitness ever observed.
    pub best_fitness: i64,
    /// Generations actually run.
    pub generations: usize,
    /// What stopped the loop.
    pub convergence: Convergence,
    /// Best-ever fitness after each generation. Non-decreasing.
    pub best_history: Vec<i64>,
}

/// One section's committed schedule plus its run summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionResult {
    /// The finalized schedule.
    pub schedule: SectionSchedule,
    /// Run summary.
    pub report: EvolutionReport,
}

/// Outcome of a whole run: one result per section, in input order, and
/// the ledgers extended with every committed placement.
#[derive(Debug)]
pub struct RunResult {
    /// Per-section results.
    pub sections: Vec<SectionResult>,
    /// Final occupancy ledgers, reusable as the seed of a later run.
    pub ledgers: Ledgers,
}

/// Runs the genetic search for a set of sections.
///
/// # Examples
///
/// ```
/// use timetable_ga::driver::EvolutionDriver;
/// use timetable_ga::ga::GaConfig;
/// use timetable_ga::models::{Section, SubjectAssignment, WeekConfig};
///
/// let sections = vec![Section::new("A")
///     .with_assignment(SubjectAssignment::theory("TOC", "Dr. Smith", 3))
///     .with_assignment(SubjectAssignment::lab("ML_LAB", "Dr. Brown", 4))];
///
/// let driver = EvolutionDriver::new(WeekConfig::default())
///     .with_config(GaConfig::default().with_seed(42));
/// let result = driver.run_isolated(&sections);
/// assert_eq!(result.sections.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct EvolutionDriver {
    config: GaConfig,
    week: WeekConfig,
}

impl EvolutionDriver {
    /// Creates a driver with default GA parameters.
    pub fn new(week: WeekConfig) -> Self {
        Self {
            config: GaConfig::default(),
            week,
        }
    }

    /// Sets the GA configuration.
    pub fn with_config(mut self, config: GaConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs with ledgers seeded from a prior-schedule store.
    ///
    /// A failed read is absorbed: the run proceeds on empty ledgers.
    pub fn run(
        &self,
        sections: &[Section],
        store: &dyn PriorScheduleStore,
        scope: &TermScope,
    ) -> RunResult {
        let mut ledgers = Ledgers::new();
        match store.load_prior(scope) {
            Ok(entries) => {
                info!("seeding ledgers from {} prior schedule entries", entries.len());
                ledgers.seed_from_prior(&entries, &self.week);
            }
            Err(err) => warn!("{err}; continuing with empty ledgers"),
        }
        self.run_seeded(sections, ledgers)
    }

    /// Runs with no prior schedules.
    pub fn run_isolated(&self, sections: &[Section]) -> RunResult {
        self.run_seeded(sections, Ledgers::new())
    }

    /// Runs with explicitly provided ledgers.
    ///
    /// Sections are processed strictly sequentially in input order; each
    /// section's committed cells are visible to every later section.
    pub fn run_seeded(&self, sections: &[Section], mut ledgers: Ledgers) -> RunResult {
        let mut config = self.config.clone();
        if let Err(err) = config.validate() {
            warn!("invalid GA configuration ({err}); falling back to defaults");
            let seed = config.seed;
            config = GaConfig::default();
            config.seed = seed;
        }

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let mut results = Vec::with_capacity(sections.len());
        for section in sections {
            let problem = SectionProblem::new(section, self.week.clone());
            debug!(
                "section {}: {} periods from {} assignments",
                problem.section,
                problem.periods.len(),
                problem.assignments.len()
            );

            let (best, report) = evolve(&problem, &config, &ledgers, &mut rng);
            info!(
                "section {}: fitness {} after {} generations ({:?})",
                problem.section, report.best_fitness, report.generations, report.convergence
            );
            if let Err(errors) = validation::validate_individual(&problem, &best) {
                warn!(
                    "section {}: committed schedule has {} structural violations",
                    problem.section,
                    errors.len()
                );
            }

            commit(&problem, &best, &mut ledgers);
            results.push(SectionResult {
                schedule: format_schedule(&problem, &best),
                report,
            });
        }

        RunResult {
            sections: results,
            ledgers,
        }
    }
}

/// Evolves one section and returns its best-ever individual.
fn evolve(
    problem: &SectionProblem,
    config: &GaConfig,
    ledgers: &Ledgers,
    rng: &mut SmallRng,
) -> (Timetable, EvolutionReport) {
    let mut population: Vec<Timetable> = (0..config.population_size)
        .map(|_| {
            let mut grid = Timetable::random(problem, rng);
            repair(&mut grid, problem);
            grid
        })
        .collect();

    let mut best: Option<(Timetable, i64)> = None;
    let mut history = Vec::new();
    let mut generations = 0;
    let mut convergence = Convergence::GenerationBudget;

    for generation in 0..config.max_generations {
        let scores = evaluate_population(problem, config, &population, ledgers);
        generations = generation + 1;

        if let Some((leader, &score)) = scores.iter().enumerate().max_by_key(|&(_, &s)| s) {
            if best.as_ref().is_none_or(|&(_, b)| score > b) {
                best = Some((population[leader].clone(), score));
            }
        }
        let best_score = best.as_ref().map(|&(_, s)| s).unwrap_or(i64::MIN);
        history.push(best_score);

        if best_score >= config.fitness_threshold {
            convergence = Convergence::FitnessThreshold;
            debug!(
                "section {}: threshold reached at generation {}",
                problem.section, generations
            );
            break;
        }
        if generations % 25 == 0 {
            debug!(
                "section {}: generation {}/{}, best fitness {}",
                problem.section, generations, config.max_generations, best_score
            );
        }

        let parents = operators::select_parents(&scores, config.tournament_size, rng);

        let mut order: Vec<usize> = (0..population.len()).collect();
        order.sort_by_key(|&i| std::cmp::Reverse(scores[i]));

        let mut next: Vec<Timetable> = order
            .iter()
            .take(config.elitism_count)
            .map(|&i| population[i].clone())
            .collect();

        while next.len() < config.population_size {
            let p1 = parents[rng.random_range(0..parents.len())];
            let p2 = parents[rng.random_range(0..parents.len())];
            let (mut c1, mut c2) = operators::crossover(
                &population[p1],
                &population[p2],
                problem,
                config.crossover_rate,
                rng,
            );

            operators::mutate(&mut c1, problem, config.mutation_rate, rng);
            repair(&mut c1, problem);
            next.push(c1);

            if next.len() < config.population_size {
                operators::mutate(&mut c2, problem, config.mutation_rate, rng);
                repair(&mut c2, problem);
                next.push(c2);
            }
        }

        population = next;
    }

    let (best_grid, best_fitness) = best.unwrap_or_else(|| {
        // Only reachable with a zero generation budget: fall back to a
        // fresh repaired candidate.
        let mut grid = Timetable::random(problem, rng);
        repair(&mut grid, problem);
        let score = fitness::evaluate(problem, &grid, ledgers, &config.weights);
        (grid, score)
    });

    (
        best_grid,
        EvolutionReport {
            best_fitness,
            generations,
            convergence,
            best_history: history,
        },
    )
}

/// Scores every individual of one generation.
fn evaluate_population(
    problem: &SectionProblem,
    config: &GaConfig,
    population: &[Timetable],
    ledgers: &Ledgers,
) -> Vec<i64> {
    let weights = &config.weights;
    if config.parallel {
        population
            .par_iter()
            .map(|grid| fitness::evaluate(problem, grid, ledgers, weights))
            .collect()
    } else {
        population
            .iter()
            .map(|grid| fitness::evaluate(problem, grid, ledgers, weights))
            .collect()
    }
}

/// Extends the ledgers with the committed grid: every occupied cell into
/// the faculty ledger, every complete block (once, keyed by its start
/// slot) into the lab ledger.
fn commit(problem: &SectionProblem, grid: &Timetable, ledgers: &mut Ledgers) {
    for (day, slot, id) in grid.occupied() {
        ledgers
            .faculty
            .record(&problem.period(id).faculty, day, slot, &problem.section);
    }
    for day in 0..grid.day_count() {
        for &(start, _) in &problem.week.lab_pairs {
            if grid.has_block_at(problem, day, start) {
                ledgers.labs.record(day, start, &problem.section);
            }
        }
    }
}

/// Renders a grid into the output contract.
fn format_schedule(problem: &SectionProblem, grid: &Timetable) -> SectionSchedule {
    let mut schedule = SectionSchedule::empty(
        &problem.section,
        &problem.week.days,
        problem.week.slots_per_day,
    );
    for (day, slot, id) in grid.occupied() {
        let period = problem.period(id);
        schedule.days[day].slots[slot] = Some(ScheduledEntry {
            subject_code: period.subject_code.clone(),
            subject_name: period.subject_name.clone(),
            faculty_name: period.faculty.clone(),
            block_id: period.block.as_ref().map(ToString::to_string),
            is_lab: period.is_lab(),
        });
    }
    schedule
}
