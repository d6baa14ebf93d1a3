//! In-memory sheet grid as handed over by the external spreadsheet reader.
//!
//! The reader merges two views of the same coordinates — calculated values
//! and raw formatting (fill colors live only on the latter) — into one flat
//! cell list, the [`GridDump`]. We rebuild that into a dense, bounds-checked
//! value table plus a sparse address → color side-map.

use crate::error::ExtractError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One populated cell in the exchange format. `color` is the normalized fill
/// token (e.g. `FFAABBCC`), absent when the cell carries no fill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellDump {
    pub row: usize,
    pub col: usize,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Serde exchange format produced by the external reader, one per sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridDump {
    pub sheet_name: String,
    pub rows: usize,
    pub cols: usize,
    pub cells: Vec<CellDump>,
}

/// Rectangular, read-only value table with a sparse color side-map.
#[derive(Debug, Clone)]
pub struct Grid {
    rows: usize,
    cols: usize,
    values: Vec<Option<String>>,
    colors: HashMap<(usize, usize), String>,
}

impl Grid {
    /// Build a grid from a dump. Cells outside the declared dimensions fail
    /// fast; a reader that emits them is broken and we want to know.
    pub fn from_dump(dump: &GridDump) -> Result<Self, ExtractError> {
        let mut grid = Grid {
            rows: dump.rows,
            cols: dump.cols,
            values: vec![None; dump.rows * dump.cols],
            colors: HashMap::new(),
        };
        for cell in &dump.cells {
            if cell.row >= dump.rows || cell.col >= dump.cols {
                return Err(ExtractError::OutOfBounds {
                    row: cell.row,
                    col: cell.col,
                    rows: dump.rows,
                    cols: dump.cols,
                });
            }
            let trimmed = cell.value.trim();
            if !trimmed.is_empty() {
                grid.values[cell.row * dump.cols + cell.col] = Some(trimmed.to_string());
            }
            if let Some(color) = &cell.color {
                grid.colors.insert((cell.row, cell.col), color.clone());
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Cell value, `None` when blank. Out-of-range coordinates are an error,
    /// not a silent blank.
    pub fn value(&self, row: usize, col: usize) -> Result<Option<&str>, ExtractError> {
        self.check(row, col)?;
        Ok(self.values[row * self.cols + col].as_deref())
    }

    /// Fill-color token at the address, if any.
    pub fn color(&self, row: usize, col: usize) -> Result<Option<&str>, ExtractError> {
        self.check(row, col)?;
        Ok(self.colors.get(&(row, col)).map(String::as_str))
    }

    fn check(&self, row: usize, col: usize) -> Result<(), ExtractError> {
        if row >= self.rows || col >= self.cols {
            return Err(ExtractError::OutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
impl Grid {
    /// Test helper: dense rows of plain values, no colors.
    pub(crate) fn from_rows(rows: Vec<Vec<&str>>) -> Grid {
        Grid::from_rows_colored(
            rows.into_iter()
                .map(|r| r.into_iter().map(|v| (v, None)).collect())
                .collect(),
        )
    }

    /// Test helper: dense rows of (value, color) pairs.
    pub(crate) fn from_rows_colored(rows: Vec<Vec<(&str, Option<&str>)>>) -> Grid {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells = rows
            .iter()
            .enumerate()
            .flat_map(|(r, vals)| {
                vals.iter().enumerate().map(move |(c, (v, color))| CellDump {
                    row: r,
                    col: c,
                    value: v.to_string(),
                    color: color.map(Into::into),
                })
            })
            .collect();
        Grid::from_dump(&GridDump {
            sheet_name: "test".into(),
            rows: rows.len(),
            cols,
            cells,
        })
        .unwrap()
    }
}
