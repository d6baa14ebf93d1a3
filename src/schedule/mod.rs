//! The normalized schedule model: time-indexed lesson records plus the
//! per-sheet aggregates downstream storage wants.

pub mod build;
pub mod export;

use crate::error::ExtractWarning;
use crate::structure::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use build::build_schedule;
pub use export::TabularSchedule;

/// One lesson cell, fully resolved. Immutable once created; belongs to
/// exactly one time slot and one day-studio column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    pub day: Weekday,
    /// Empty when the column's date could not be resolved.
    pub date: String,
    pub studio: String,
    /// The row's canonical time, not any time embedded in the cell text.
    pub time: String,
    pub student_info: String,
    pub rehearsal: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teacher_color: Option<String>,
    /// Resolved display name, `MULTIPLE_TEACHERS_n`, or `Unknown`.
    pub teacher: String,
}

/// A row-level time with every lesson found across the day-studio columns.
/// Never constructed with an empty lesson list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: String,
    pub lessons: Vec<LessonRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekInfo {
    pub sheet_name: String,
    pub week_dates: Vec<String>,
    /// ISO8601 extraction timestamp.
    pub extracted_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_time_slots: usize,
    pub total_lessons: usize,
    pub unique_teachers: usize,
    pub date_range: String,
}

/// Terminal output of one sheet extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub week_info: WeekInfo,
    /// color token → resolved teacher name, ambiguity label, or null.
    pub teachers: BTreeMap<String, Option<String>>,
    pub studios: Vec<String>,
    pub schedule: Vec<TimeSlot>,
    pub summary: Summary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ExtractWarning>,
}

impl Schedule {
    /// `min to max` over the week dates, `Unknown` when there are none.
    pub(crate) fn date_range(week_dates: &[String]) -> String {
        match (week_dates.iter().min(), week_dates.iter().max()) {
            (Some(min), Some(max)) => format!("{} to {}", min, max),
            _ => "Unknown".to_string(),
        }
    }
}
