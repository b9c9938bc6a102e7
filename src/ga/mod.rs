//! Genetic search over weekly timetable grids.
//!
//! # Encoding
//!
//! An individual is a day × slot grid of `Option<usize>` period handles
//! pointing into the section's period arena ([`SectionProblem::periods`]).
//! Both cells of a lab session hold the same handle, so a lab block is
//! identified by handle equality across a declared lab slot pair.
//!
//! # Pipeline
//!
//! Decompose → generate → (evaluate → select → crossover → mutate →
//! repair)* — the repair pass after every operator application restores
//! exact period multiplicities, so selection pressure only has to handle
//! placement quality, never count feasibility.
//!
//! # Submodules
//!
//! - [`config`]: Run parameters and penalty weights
//! - [`period`]: Assignment decomposition into schedulable periods
//! - [`timetable`]: The grid individual and candidate generation
//! - [`fitness`]: Rule-based scoring
//! - [`operators`]: Selection, crossover, mutation
//! - [`repair`]: Post-operator multiplicity restoration

pub mod config;
pub mod fitness;
pub mod operators;
pub mod period;
pub mod repair;
pub mod timetable;

mod problem;

pub use config::{FitnessWeights, GaConfig};
pub use period::{decompose, BlockId, Period};
pub use problem::SectionProblem;
pub use timetable::Timetable;
