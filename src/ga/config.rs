//! GA run parameters and fitness weights.

/// Penalty and bonus magnitudes applied by the fitness evaluator.
///
/// The magnitudes are inherited operational constants with no documented
/// derivation; they are kept configurable rather than re-derived.
#[derive(Debug, Clone)]
pub struct FitnessWeights {
    /// Starting score before any adjustment.
    pub base: i64,
    /// Per faculty double-booking, internal or against the ledger.
    pub faculty_clash: i64,
    /// Per hour of shortfall/excess against an assignment's weekly hours.
    pub hour_mismatch: i64,
    /// Per lab cell not forming a complete, correctly positioned pair.
    pub lab_break: i64,
    /// Per lab-subject session sharing a day with another of its sessions.
    pub lab_day_collapse: i64,
    /// Extra penalty when a two-session lab lands entirely on one day.
    pub lab_pair_same_day: i64,
    /// Weekly cells per faculty member above which overload applies.
    pub load_threshold: usize,
    /// Per cell above the load threshold.
    pub load_excess: i64,
    /// Per repeat of a theory subject within one day.
    pub theory_repeat: i64,
    /// Per subject occupying the same slot on two adjacent days.
    pub consecutive_repeat: i64,
    /// Per repeat of a subject in one slot index across the week.
    pub slot_repeat: i64,
    /// Per unused slot between a day's first and last class.
    pub gap: i64,
    /// Bonus per trailing free slot on a day with classes.
    pub trailing_free_bonus: i64,
    /// Per occupied reserved cell.
    pub reserved_cell: i64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            base: 1000,
            faculty_clash: 100,
            hour_mismatch: 20,
            lab_break: 100,
            lab_day_collapse: 100,
            lab_pair_same_day: 150,
            load_threshold: 25,
            load_excess: 10,
            theory_repeat: 50,
            consecutive_repeat: 5,
            slot_repeat: 10,
            gap: 5,
            trailing_free_bonus: 2,
            reserved_cell: 100,
        }
    }
}

/// Configuration for one evolutionary run.
///
/// # Examples
///
/// ```
/// use timetable_ga::ga::GaConfig;
///
/// let config = GaConfig::default()
///     .with_population_size(30)
///     .with_max_generations(100)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct GaConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Generation budget per section.
    pub max_generations: usize,
    /// Probability a parent pair is recombined rather than copied.
    pub crossover_rate: f64,
    /// Probability an offspring is mutated.
    pub mutation_rate: f64,
    /// Top individuals carried into the next generation unchanged.
    pub elitism_count: usize,
    /// Tournament size for parent selection.
    pub tournament_size: usize,
    /// Best-ever fitness at which a section stops early.
    pub fitness_threshold: i64,
    /// Whether to evaluate population fitness on the rayon thread pool.
    pub parallel: bool,
    /// Random seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Fitness weights.
    pub weights: FitnessWeights,
}

impl Default for GaConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 150,
            crossover_rate: 0.8,
            mutation_rate: 0.15,
            elitism_count: 5,
            tournament_size: 3,
            fitness_threshold: 950,
            parallel: false,
            seed: None,
            weights: FitnessWeights::default(),
        }
    }
}

impl GaConfig {
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    pub fn with_elitism_count(mut self, n: usize) -> Self {
        self.elitism_count = n;
        self
    }

    pub fn with_tournament_size(mut self, n: usize) -> Self {
        self.tournament_size = n;
        self
    }

    pub fn with_fitness_threshold(mut self, threshold: i64) -> Self {
        self.fitness_threshold = threshold;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_weights(mut self, weights: FitnessWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.population_size < 2 {
            return Err("population_size must be at least 2".into());
        }
        if self.max_generations == 0 {
            return Err("max_generations must be at least 1".into());
        }
        if self.elitism_count >= self.population_size {
            return Err(format!(
                "elitism_count ({}) must be below population_size ({})",
                self.elitism_count, self.population_size
            ));
        }
        if self.tournament_size == 0 {
            return Err("tournament_size must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        Ok(())
    }
}
