use thiserror::Error;

/// Which header roles were located before a sheet was rejected.
/// Carried inside [`ExtractError::StructureNotFound`] so callers can see how
/// close the sheet came to being usable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FoundRoles {
    pub date_row: Option<usize>,
    pub day_row: Option<usize>,
    pub studio_row: Option<usize>,
}

impl std::fmt::Display for FoundRoles {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut found = Vec::new();
        if let Some(r) = self.date_row {
            found.push(format!("date row {}", r));
        }
        if let Some(r) = self.day_row {
            found.push(format!("day row {}", r));
        }
        if let Some(r) = self.studio_row {
            found.push(format!("studio row {}", r));
        }
        if found.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", found.join(", "))
        }
    }
}

/// Hard failures. Anything here aborts the current sheet only; the batch
/// driver logs and moves on to the next sheet.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("sheet `{sheet}`: no weekday header row within the scan window (found: {found})")]
    StructureNotFound { sheet: String, found: FoundRoles },

    #[error("cell ({row},{col}) out of bounds for {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
}

/// Non-fatal issues recovered during extraction. They are accumulated on the
/// resulting `Schedule` rather than aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExtractWarning {
    /// Weekday and studio matched but no date could be resolved for the
    /// column; the column is kept with an empty date.
    AmbiguousColumnMapping { col: usize, day: String },
    /// Cell text matched no time or name pattern; kept verbatim with an
    /// unknown teacher.
    CellParse { row: usize, col: usize, raw: String },
    /// A color token implied more than one teacher name.
    ColorResolutionAmbiguous { color: String, names: usize },
}
