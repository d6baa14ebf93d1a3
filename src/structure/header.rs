//! Header-row location inside an otherwise unlabeled grid.

use crate::error::{ExtractError, FoundRoles};
use crate::grid::Grid;
use crate::parse::time::find_time;
use crate::structure::{ScanParams, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// Year-date pattern; matches the date part of both bare dates and
/// `YYYY-MM-DD HH:MM:SS` cell renderings.
pub static DATE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").unwrap());

const STUDIO_MARKER: &str = "STUDIO";

/// Row roles located within the scan window. `first_data_row` is always set;
/// the optional rows are best-effort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderIndex {
    pub date_row: Option<usize>,
    pub day_row: Option<usize>,
    pub studio_row: Option<usize>,
    pub first_data_row: usize,
}

/// Scan the top of the grid and classify rows into roles by absolute
/// pattern-match counts. The weekday row is the one hard requirement: without
/// it no column mapping is possible, so its absence fails the sheet.
pub fn locate_headers(
    grid: &Grid,
    sheet: &str,
    params: &ScanParams,
) -> Result<HeaderIndex, ExtractError> {
    let window = params.window_rows.min(grid.rows());

    let mut date_row = None;
    let mut day_row = None;
    let mut studio_row = None;

    for row in 0..window {
        let mut dates = 0usize;
        let mut days = 0usize;
        let mut studios = 0usize;
        for col in 0..grid.cols() {
            let Some(val) = grid.value(row, col)? else {
                continue;
            };
            if DATE_RE.is_match(val) {
                dates += 1;
            }
            if Weekday::parse(val).is_some() {
                days += 1;
            }
            if val.to_uppercase().contains(STUDIO_MARKER) {
                studios += 1;
            }
        }
        if date_row.is_none() && dates >= params.date_min {
            date_row = Some(row);
        }
        if day_row.is_none() && days >= params.day_min {
            day_row = Some(row);
        }
        if studio_row.is_none() && studios >= params.studio_min {
            studio_row = Some(row);
        }
    }

    let Some(day) = day_row else {
        return Err(ExtractError::StructureNotFound {
            sheet: sheet.to_string(),
            found: FoundRoles {
                date_row,
                day_row,
                studio_row,
            },
        });
    };

    // First row below the headers whose time column holds a time pattern.
    // The date row is excluded: `2025-06-09 00:00:00` reads as a time too.
    let header_end = [Some(day), date_row, studio_row]
        .into_iter()
        .flatten()
        .max()
        .unwrap()
        + 1;
    let mut first_data_row = None;
    for row in header_end..grid.rows() {
        if Some(row) == date_row {
            continue;
        }
        if let Some(val) = grid.value(row, params.time_col)? {
            if find_time(val).is_some() {
                first_data_row = Some(row);
                break;
            }
        }
    }
    let first_data_row = match first_data_row {
        Some(r) => r,
        None => {
            warn!(sheet, "no time row found below headers; sheet may be empty");
            header_end
        }
    };

    debug!(
        sheet,
        ?date_row,
        day_row = day,
        ?studio_row,
        first_data_row,
        "located header rows"
    );

    Ok(HeaderIndex {
        date_row,
        day_row: Some(day),
        studio_row,
        first_data_row,
    })
}
