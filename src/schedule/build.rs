//! Schedule assembly: walk the data rows, parse each day-studio cell, and
//! collect non-empty time slots.

use crate::error::{ExtractError, ExtractWarning};
use crate::grid::Grid;
use crate::parse::{find_time, parse_cell};
use crate::schedule::{LessonRecord, Schedule, Summary, TimeSlot, WeekInfo};
use crate::structure::{DayStudioColumn, HeaderIndex, ScanParams};
use crate::teachers::{ColorResolver, TeacherIdentity};
use chrono::Utc;
use tracing::debug;

/// Build the terminal schedule for one sheet. `warnings` carries everything
/// accumulated during column mapping and color resolution; per-cell issues
/// found here are appended to it.
#[allow(clippy::too_many_arguments)]
pub fn build_schedule(
    grid: &Grid,
    headers: &HeaderIndex,
    params: &ScanParams,
    columns: &[DayStudioColumn],
    week_dates: &[String],
    resolver: &ColorResolver,
    sheet_name: &str,
    mut warnings: Vec<ExtractWarning>,
) -> Result<Schedule, ExtractError> {
    let mut slots: Vec<TimeSlot> = Vec::new();

    for row in headers.first_data_row..grid.rows() {
        // a row is a time slot only if its time column parses; blank
        // separator rows are skipped, not errors
        let Some(time) = grid
            .value(row, params.time_col)?
            .and_then(|v| find_time(v).map(|m| m.text))
        else {
            continue;
        };

        let mut lessons = Vec::new();
        for column in columns {
            let Some(raw) = grid.value(row, column.col)? else {
                continue;
            };
            let parsed = parse_cell(raw);
            let student_info = if parsed.is_empty() {
                if parsed.time.is_some() {
                    // time-only cell, no lesson
                    continue;
                }
                // separator junk the parser could not classify: keep the raw
                // text verbatim, teacher stays unknown via missing evidence
                warnings.push(ExtractWarning::CellParse {
                    row,
                    col: column.col,
                    raw: raw.to_string(),
                });
                raw.to_string()
            } else {
                parsed.text
            };

            let teacher_color = grid.color(row, column.col)?.map(str::to_string);
            let teacher = match &teacher_color {
                Some(color) => resolver.resolve(color),
                None => TeacherIdentity::Unknown,
            };

            lessons.push(LessonRecord {
                day: column.day,
                date: column.date.clone().unwrap_or_default(),
                studio: column.studio.clone(),
                time: time.clone(),
                student_info,
                rehearsal: parsed.is_rehearsal,
                teacher_color,
                teacher: teacher.label(),
            });
        }

        // a slot with no lessons is never emitted
        if !lessons.is_empty() {
            slots.push(TimeSlot { time, lessons });
        }
    }

    let mut studios: Vec<String> = Vec::new();
    for column in columns {
        if !column.studio.is_empty() && !studios.contains(&column.studio) {
            studios.push(column.studio.clone());
        }
    }

    let teachers: std::collections::BTreeMap<String, Option<String>> = resolver
        .iter()
        .map(|(color, id)| (color.to_string(), id.json_value()))
        .collect();
    let unique_teachers = teachers
        .values()
        .collect::<std::collections::BTreeSet<_>>()
        .len();
    let total_lessons = slots.iter().map(|s| s.lessons.len()).sum();

    debug!(
        sheet = sheet_name,
        slots = slots.len(),
        lessons = total_lessons,
        "assembled schedule"
    );

    Ok(Schedule {
        week_info: WeekInfo {
            sheet_name: sheet_name.to_string(),
            week_dates: week_dates.to_vec(),
            extracted_date: Utc::now().to_rfc3339(),
        },
        teachers,
        studios,
        summary: Summary {
            total_time_slots: slots.len(),
            total_lessons,
            unique_teachers,
            date_range: Schedule::date_range(week_dates),
        },
        schedule: slots,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractConfig;
    use crate::extract::extract_sheet;

    fn test_config() -> ExtractConfig {
        ExtractConfig {
            teacher_overrides: Default::default(),
            scan: ScanParams {
                window_rows: 6,
                date_min: 2,
                day_min: 2,
                studio_min: 2,
                time_col: 1,
            },
        }
    }

    /// Full scenario: override table, embedded cell time, lesson-type suffix.
    #[test]
    fn lesson_with_override_teacher() {
        let grid = Grid::from_rows_colored(vec![
            vec![
                ("", None),
                ("", None),
                ("2025-06-09 00:00:00", None),
                ("2025-06-10 00:00:00", None),
            ],
            vec![("", None), ("", None), ("MONDAY", None), ("TUESDAY", None)],
            vec![
                ("", None),
                ("", None),
                ("STUDIO A", None),
                ("STUDIO A", None),
            ],
            vec![
                ("", None),
                ("3:45:00", None),
                ("3:45 PM: Ava - Solo", Some("FFAABBCC")),
                ("", None),
            ],
        ]);
        let mut cfg = test_config();
        cfg.teacher_overrides
            .insert("FFAABBCC".to_string(), "PAIGE".to_string());

        let schedule = extract_sheet("69 -615", &grid, &cfg).unwrap();
        assert_eq!(schedule.schedule.len(), 1);
        let slot = &schedule.schedule[0];
        assert_eq!(slot.time, "3:45:00");
        assert_eq!(slot.lessons.len(), 1);
        let lesson = &slot.lessons[0];
        assert_eq!(lesson.day.name(), "MONDAY");
        assert_eq!(lesson.studio, "STUDIO A");
        assert_eq!(lesson.date, "2025-06-09");
        assert_eq!(lesson.student_info, "Ava - Solo");
        assert_eq!(lesson.teacher, "PAIGE");
        assert!(!lesson.rehearsal);
        assert_eq!(
            schedule.teachers.get("FFAABBCC").unwrap().as_deref(),
            Some("PAIGE")
        );
    }

    /// A valid time row with only empty day-studio cells emits no slot.
    #[test]
    fn time_row_without_lessons_emits_no_slot() {
        let grid = Grid::from_rows(vec![
            vec!["", "", "MONDAY", "TUESDAY"],
            vec!["", "", "STUDIO A", "STUDIO B"],
            vec!["", "9:00:00", "", ""],
            vec!["", "10:00:00", "Ava", ""],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        assert_eq!(schedule.schedule.len(), 1);
        assert_eq!(schedule.schedule[0].time, "10:00:00");
        // no empty slot is ever emitted
        assert!(schedule.schedule.iter().all(|s| !s.lessons.is_empty()));
    }

    /// Time-only cells produce no record either.
    #[test]
    fn time_only_cell_produces_no_record() {
        let grid = Grid::from_rows(vec![
            vec!["", "", "MONDAY", "TUESDAY"],
            vec!["", "", "STUDIO A", "STUDIO B"],
            vec!["", "9:00:00", "9:15 AM", "Mia"],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        assert_eq!(schedule.schedule.len(), 1);
        let lessons = &schedule.schedule[0].lessons;
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0].student_info, "Mia");
        assert_eq!(lessons[0].day.name(), "TUESDAY");
    }

    /// Rehearsal cells keep the rehearsal flag and take the teacher only
    /// from color resolution.
    #[test]
    fn rehearsal_cell() {
        let grid = Grid::from_rows_colored(vec![
            vec![("", None), ("", None), ("MONDAY", None), ("TUESDAY", None)],
            vec![
                ("", None),
                ("", None),
                ("STUDIO A", None),
                ("STUDIO B", None),
            ],
            vec![
                ("", None),
                ("9:00:00", None),
                ("REHEARSAL", Some("FFC9DAF8")),
                ("", None),
            ],
        ]);
        let mut cfg = test_config();
        cfg.teacher_overrides
            .insert("FFC9DAF8".to_string(), "RYANN".to_string());
        let schedule = extract_sheet("s", &grid, &cfg).unwrap();
        let lesson = &schedule.schedule[0].lessons[0];
        assert!(lesson.rehearsal);
        assert_eq!(lesson.student_info, "REHEARSAL");
        assert_eq!(lesson.teacher, "RYANN");
    }

    /// Uncolored cells resolve to Unknown.
    #[test]
    fn missing_color_means_unknown_teacher() {
        let grid = Grid::from_rows(vec![
            vec!["", "", "MONDAY", "TUESDAY"],
            vec!["", "", "STUDIO A", "STUDIO B"],
            vec!["", "9:00:00", "Ava", ""],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        let lesson = &schedule.schedule[0].lessons[0];
        assert_eq!(lesson.teacher_color, None);
        assert_eq!(lesson.teacher, "Unknown");
    }

    /// Blank separator rows are skipped without error and scanning
    /// continues to the end of the grid.
    #[test]
    fn blank_rows_are_skipped_mid_sheet() {
        let grid = Grid::from_rows(vec![
            vec!["", "", "MONDAY", "TUESDAY"],
            vec!["", "", "STUDIO A", "STUDIO B"],
            vec!["", "9:00:00", "Ava", ""],
            vec!["", "", "", ""],
            vec!["", "11:00:00", "", "Mia"],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        assert_eq!(schedule.schedule.len(), 2);
        assert_eq!(schedule.summary.total_lessons, 2);
    }

    /// Separator junk keeps its raw text and records a parse warning.
    #[test]
    fn unparseable_cell_kept_verbatim_with_warning() {
        let grid = Grid::from_rows(vec![
            vec!["", "", "MONDAY", "TUESDAY"],
            vec!["", "", "STUDIO A", "STUDIO B"],
            vec!["", "9:00:00", "---", ""],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        let lesson = &schedule.schedule[0].lessons[0];
        assert_eq!(lesson.student_info, "---");
        assert_eq!(lesson.teacher, "Unknown");
        assert!(schedule
            .warnings
            .iter()
            .any(|w| matches!(w, ExtractWarning::CellParse { .. })));
    }

    #[test]
    fn summary_counts_and_studio_set() {
        let grid = Grid::from_rows_colored(vec![
            vec![
                ("", None),
                ("", None),
                ("2025-06-09", None),
                ("2025-06-10", None),
            ],
            vec![("", None), ("", None), ("MONDAY", None), ("TUESDAY", None)],
            vec![
                ("", None),
                ("", None),
                ("STUDIO A", None),
                ("STUDIO B", None),
            ],
            vec![
                ("", None),
                ("9:00:00", None),
                ("Ava", Some("FF0000FF")),
                ("Mia", Some("FF00FF00")),
            ],
        ]);
        let schedule = extract_sheet("s", &grid, &test_config()).unwrap();
        assert_eq!(schedule.studios, vec!["STUDIO A", "STUDIO B"]);
        assert_eq!(schedule.summary.total_time_slots, 1);
        assert_eq!(schedule.summary.total_lessons, 2);
        assert_eq!(schedule.summary.date_range, "2025-06-09 to 2025-06-10");
        assert_eq!(schedule.week_info.week_dates.len(), 2);
        // two colors, two distinct resolved names
        assert_eq!(schedule.summary.unique_teachers, 2);
    }
}
