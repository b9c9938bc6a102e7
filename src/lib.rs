//! Weekly timetable generation for multi-section academic programs.
//!
//! Decomposes each section's subject/faculty assignments into atomic
//! schedulable periods (1-slot theory, 2-slot lab sessions), then evolves
//! a population of candidate week grids with a genetic algorithm: tournament
//! selection, positional crossover with lab-block atomicity, swap/relocate
//! mutation, and a deterministic repair pass that restores exact period
//! multiplicities after the genetic operators.
//!
//! Sections are processed sequentially; each finalized section extends a
//! pair of global occupancy ledgers (faculty × day × slot, and lab slot
//! pairs) so that later sections are penalized for clashing with earlier
//! ones.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `SubjectAssignment`, `Section`,
//!   `WeekConfig`, `SectionSchedule`
//! - **`ga`**: The search engine — period decomposition, candidate grids,
//!   fitness, genetic operators, repair, configuration
//! - **`ledger`**: Cross-section occupancy ledgers and the prior-schedule
//!   read interface
//! - **`driver`**: Per-section evolution loop and the sequential
//!   multi-section run
//! - **`validation`**: Input integrity and solution invariant checks
//!
//! # References
//!
//! - Goldberg (1989), "Genetic Algorithms in Search, Optimization and
//!   Machine Learning"
//! - Burke & Petrovic (2002), "Recent research directions in automated
//!   timetabling"

pub mod driver;
pub mod ga;
pub mod ledger;
pub mod models;
pub mod validation;
