//! Per-sheet extraction run. All derived state for one sheet — header index,
//! column list, week dates, resolved teacher colors — lives on one context
//! object, so repeated or parallel runs over different sheets never share
//! mutable state.

use crate::config::ExtractConfig;
use crate::error::{ExtractError, ExtractWarning};
use crate::grid::{Grid, GridDump};
use crate::schedule::{build_schedule, Schedule};
use crate::structure::{extract_week_dates, locate_headers, map_columns, DayStudioColumn, HeaderIndex};
use crate::teachers::ColorResolver;
use tracing::{info, instrument};

/// Everything one extraction run owns. Built front-to-back: headers, then
/// columns and week dates, then the color → teacher map. Read-only once
/// constructed.
pub struct RunContext<'a> {
    pub sheet_name: &'a str,
    pub grid: &'a Grid,
    pub config: &'a ExtractConfig,
    pub headers: HeaderIndex,
    pub week_dates: Vec<String>,
    pub columns: Vec<DayStudioColumn>,
    pub resolver: ColorResolver,
    warnings: Vec<ExtractWarning>,
}

impl<'a> RunContext<'a> {
    pub fn new(
        sheet_name: &'a str,
        grid: &'a Grid,
        config: &'a ExtractConfig,
    ) -> Result<Self, ExtractError> {
        let headers = locate_headers(grid, sheet_name, &config.scan)?;
        let week_dates = extract_week_dates(grid, &headers)?;
        let mut warnings = Vec::new();
        let columns = map_columns(grid, &headers, &week_dates, &mut warnings)?;
        let resolver =
            ColorResolver::build(grid, &headers, &config.teacher_overrides, &mut warnings)?;
        Ok(RunContext {
            sheet_name,
            grid,
            config,
            headers,
            week_dates,
            columns,
            resolver,
            warnings,
        })
    }

    /// Assemble the schedule, consuming the accumulated warnings.
    pub fn build(self) -> Result<Schedule, ExtractError> {
        build_schedule(
            self.grid,
            &self.headers,
            &self.config.scan,
            &self.columns,
            &self.week_dates,
            &self.resolver,
            self.sheet_name,
            self.warnings,
        )
    }
}

/// Extract one sheet's schedule from its grid.
#[instrument(level = "info", skip(grid, config))]
pub fn extract_sheet(
    sheet_name: &str,
    grid: &Grid,
    config: &ExtractConfig,
) -> Result<Schedule, ExtractError> {
    let ctx = RunContext::new(sheet_name, grid, config)?;
    let schedule = ctx.build()?;
    info!(
        sheet = sheet_name,
        slots = schedule.summary.total_time_slots,
        lessons = schedule.summary.total_lessons,
        warnings = schedule.warnings.len(),
        "extracted schedule"
    );
    Ok(schedule)
}

/// Extract straight from the reader's exchange format.
pub fn extract_dump(dump: &GridDump, config: &ExtractConfig) -> Result<Schedule, ExtractError> {
    let grid = Grid::from_dump(dump)?;
    extract_sheet(&dump.sheet_name, &grid, config)
}
