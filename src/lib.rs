//! schedscraper normalizes semi-structured weekly lesson-schedule grids into
//! a time-indexed schedule model.
//!
//! The spreadsheet reader is an external collaborator: it merges the
//! calculated-values and raw-formatting views of a sheet into a [`grid::GridDump`]
//! (cell value + fill-color token per address). From there the pipeline runs
//! strictly downward:
//!
//! grid → `structure` (header rows, day-studio columns) → `schedule::build`
//! (using `parse` for cell text and `teachers` for fill-color identities) →
//! [`schedule::Schedule`].

pub mod config;
pub mod error;
pub mod extract;
pub mod grid;
pub mod parse;
pub mod schedule;
pub mod structure;
pub mod teachers;

pub use config::ExtractConfig;
pub use error::{ExtractError, ExtractWarning};
pub use extract::{extract_dump, extract_sheet, RunContext};
pub use grid::{Grid, GridDump};
pub use schedule::{Schedule, TabularSchedule};
