//! Timetabling domain models.
//!
//! Input types (`SubjectAssignment`, `Section`), the week structure
//! (`WeekConfig`), and the output contract (`SectionSchedule`).
//!
//! Inputs are immutable for the duration of a run: the engine copies what
//! it needs at decomposition time and never writes back.

mod assignment;
mod schedule;
mod week;

pub use assignment::{Section, SessionType, SubjectAssignment};
pub use schedule::{DaySchedule, ScheduledEntry, SectionSchedule};
pub use week::WeekConfig;
