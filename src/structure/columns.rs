//! Column mapping: join the weekday, studio, and date header rows per column
//! into an ordered day-studio-date column list.

use crate::error::{ExtractError, ExtractWarning};
use crate::grid::Grid;
use crate::structure::header::{HeaderIndex, DATE_RE};
use crate::structure::Weekday;
use tracing::{debug, warn};

/// Radius for the nearest-column date search. Merged date cells land a
/// column or two away from the weekday cell on the source sheets.
const DATE_SEARCH_RADIUS: usize = 2;

/// One grid column bound to a weekday and studio for the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayStudioColumn {
    pub col: usize,
    pub day: Weekday,
    pub studio: String,
    /// `None` when no date could be resolved (column is still usable).
    pub date: Option<String>,
}

/// All distinct dates on the date row, in column order. Used for the
/// positional fallback and for the output week info. When the sheet has no
/// date row, the whole header window is scanned instead.
pub fn extract_week_dates(grid: &Grid, headers: &HeaderIndex) -> Result<Vec<String>, ExtractError> {
    let rows: Vec<usize> = match headers.date_row {
        Some(r) => vec![r],
        None => (0..headers.first_data_row).collect(),
    };
    let mut dates = Vec::new();
    for row in rows {
        for col in 0..grid.cols() {
            if let Some(val) = grid.value(row, col)? {
                if let Some(m) = DATE_RE.find(val) {
                    let date = m.as_str().to_string();
                    if !dates.contains(&date) {
                        dates.push(date);
                    }
                }
            }
        }
    }
    Ok(dates)
}

/// Build the day-studio column list. Columns whose weekday cell is missing or
/// non-canonical are dropped, as are columns missing a studio label when a
/// studio row exists. Dates resolve in order: exact column, nearest column
/// within the radius (left wins ties), then weekday ordinal into the week
/// date list — a Monday-first heuristic, not a guarantee.
pub fn map_columns(
    grid: &Grid,
    headers: &HeaderIndex,
    week_dates: &[String],
    warnings: &mut Vec<ExtractWarning>,
) -> Result<Vec<DayStudioColumn>, ExtractError> {
    let day_row = headers
        .day_row
        .expect("HeaderIndex is only constructed with a day row");

    let mut columns = Vec::new();
    for col in 0..grid.cols() {
        let Some(day_val) = grid.value(day_row, col)? else {
            continue;
        };
        let Some(day) = Weekday::parse(day_val) else {
            continue;
        };
        let studio = match headers.studio_row {
            Some(studio_row) => match grid.value(studio_row, col)? {
                Some(s) => s.to_string(),
                None => continue,
            },
            None => String::new(),
        };

        let date = resolve_date(grid, headers, week_dates, col, day)?;
        if date.is_none() {
            warn!(col, day = %day, "weekday column without a resolvable date");
            warnings.push(ExtractWarning::AmbiguousColumnMapping {
                col,
                day: day.name().to_string(),
            });
        }

        columns.push(DayStudioColumn {
            col,
            day,
            studio,
            date,
        });
    }

    debug!(count = columns.len(), "mapped day-studio columns");
    Ok(columns)
}

fn resolve_date(
    grid: &Grid,
    headers: &HeaderIndex,
    week_dates: &[String],
    col: usize,
    day: Weekday,
) -> Result<Option<String>, ExtractError> {
    if let Some(date_row) = headers.date_row {
        // exact column, then increasing distance within the radius, left
        // before right so the result is deterministic
        if let Some(d) = date_at(grid, date_row, col)? {
            return Ok(Some(d));
        }
        for dist in 1..=DATE_SEARCH_RADIUS {
            if col >= dist {
                if let Some(d) = date_at(grid, date_row, col - dist)? {
                    return Ok(Some(d));
                }
            }
            if col + dist < grid.cols() {
                if let Some(d) = date_at(grid, date_row, col + dist)? {
                    return Ok(Some(d));
                }
            }
        }
    }
    // positional fallback: assumes Monday-first column ordering
    Ok(week_dates.get(day.ordinal()).cloned())
}

fn date_at(grid: &Grid, row: usize, col: usize) -> Result<Option<String>, ExtractError> {
    Ok(grid
        .value(row, col)?
        .and_then(|v| DATE_RE.find(v))
        .map(|m| m.as_str().to_string()))
}
