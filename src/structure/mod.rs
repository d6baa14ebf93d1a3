//! Grid structure inference: which rows are headers, which columns are
//! day-studio columns.

pub mod columns;
pub mod header;

use serde::{Deserialize, Serialize};

pub use columns::{extract_week_dates, map_columns, DayStudioColumn};
pub use header::{locate_headers, HeaderIndex};

/// The seven canonical weekday names, Monday-first to match the positional
/// date fallback in `columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Case-insensitive match against the canonical names.
    pub fn parse(s: &str) -> Option<Weekday> {
        let upper = s.trim().to_uppercase();
        Weekday::ALL.into_iter().find(|d| d.name() == upper)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "MONDAY",
            Weekday::Tuesday => "TUESDAY",
            Weekday::Wednesday => "WEDNESDAY",
            Weekday::Thursday => "THURSDAY",
            Weekday::Friday => "FRIDAY",
            Weekday::Saturday => "SATURDAY",
            Weekday::Sunday => "SUNDAY",
        }
    }

    /// Monday=0 … Sunday=6.
    pub fn ordinal(&self) -> usize {
        Weekday::ALL.iter().position(|d| d == self).unwrap()
    }
}

impl std::fmt::Display for Weekday {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Tunables for header-row detection. Thresholds are absolute match counts,
/// not ratios, because column counts vary wildly between sheets. Defaults
/// follow the source calendars (seven weekday columns, five-plus dated days,
/// three-plus studios).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// How many top rows to scan for header roles.
    pub window_rows: usize,
    /// Minimum cells matching the year-date pattern for a date row.
    pub date_min: usize,
    /// Minimum cells equal to a canonical weekday for a weekday row.
    pub day_min: usize,
    /// Minimum cells containing the studio marker for a studio row.
    pub studio_min: usize,
    /// Column holding the canonical row time.
    pub time_col: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        ScanParams {
            window_rows: 10,
            date_min: 5,
            day_min: 5,
            studio_min: 3,
            time_col: 1,
        }
    }
}
