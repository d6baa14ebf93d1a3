//! Tabular output: the wide `Time × day-studio-column` form, its paired
//! teacher-color table, and the conversion back to the nested model.

use crate::schedule::{LessonRecord, Schedule, Summary, TimeSlot, WeekInfo};
use crate::structure::Weekday;
use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::io::{Read, Write};

/// `MONDAY STUDIO A (2025-06-09)`, studio and date both optional.
static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+?)(?:\s+(.*?))?\s*\(([^)]*)\)$").unwrap());

/// Wide form of a schedule: header row, one data row per time slot, one
/// column per day-studio column. `colors` mirrors the cell shape with each
/// cell's fill token, so tabular output loses no teacher information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabularSchedule {
    /// `["Time", "<DAY> <Studio> (<date>)", …]`
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Same shape as `rows`; empty string where a cell has no color.
    pub colors: Vec<Vec<String>>,
}

impl Schedule {
    /// Flatten to the wide form. Column order is first appearance across the
    /// slots, which follows grid column order for schedules built here.
    pub fn to_tabular(&self) -> TabularSchedule {
        let mut columns: Vec<(Weekday, String, String)> = Vec::new();
        for slot in &self.schedule {
            for lesson in &slot.lessons {
                let key = (lesson.day, lesson.studio.clone(), lesson.date.clone());
                if !columns.contains(&key) {
                    columns.push(key);
                }
            }
        }

        let mut headers = vec!["Time".to_string()];
        for (day, studio, date) in &columns {
            headers.push(if studio.is_empty() {
                format!("{} ({})", day, date)
            } else {
                format!("{} {} ({})", day, studio, date)
            });
        }

        let mut rows = Vec::with_capacity(self.schedule.len());
        let mut colors = Vec::with_capacity(self.schedule.len());
        for slot in &self.schedule {
            let mut row = vec![slot.time.clone()];
            let mut color_row = vec![slot.time.clone()];
            row.resize(headers.len(), String::new());
            color_row.resize(headers.len(), String::new());
            for lesson in &slot.lessons {
                let key = (lesson.day, lesson.studio.clone(), lesson.date.clone());
                let idx = columns.iter().position(|c| *c == key).unwrap() + 1;
                row[idx] = lesson.student_info.clone();
                color_row[idx] = lesson.teacher_color.clone().unwrap_or_default();
            }
            rows.push(row);
            colors.push(color_row);
        }

        TabularSchedule {
            headers,
            rows,
            colors,
        }
    }
}

impl TabularSchedule {
    /// Rebuild the nested model. `teachers` restores identities from the
    /// color table when supplied; otherwise every record is Unknown.
    pub fn to_schedule(
        &self,
        sheet_name: &str,
        teachers: Option<&BTreeMap<String, Option<String>>>,
    ) -> Result<Schedule> {
        let mut columns = Vec::new();
        for header in self.headers.iter().skip(1) {
            let caps = HEADER_RE
                .captures(header)
                .ok_or_else(|| anyhow!("malformed column header `{}`", header))?;
            let day = Weekday::parse(&caps[1])
                .ok_or_else(|| anyhow!("non-weekday column header `{}`", header))?;
            let studio = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
            let date = caps[3].to_string();
            columns.push((day, studio, date));
        }

        let mut week_dates: Vec<String> = Vec::new();
        for (_, _, date) in &columns {
            if !date.is_empty() && !week_dates.contains(date) {
                week_dates.push(date.clone());
            }
        }

        let mut slots = Vec::new();
        for (row_idx, row) in self.rows.iter().enumerate() {
            if row.len() != self.headers.len() {
                return Err(anyhow!(
                    "row {} has {} cells, expected {}",
                    row_idx,
                    row.len(),
                    self.headers.len()
                ));
            }
            let time = row[0].clone();
            let mut lessons = Vec::new();
            for (i, (day, studio, date)) in columns.iter().enumerate() {
                let text = row[i + 1].trim();
                if text.is_empty() {
                    continue;
                }
                let color = self
                    .colors
                    .get(row_idx)
                    .and_then(|r| r.get(i + 1))
                    .filter(|c| !c.is_empty())
                    .cloned();
                let teacher = color
                    .as_deref()
                    .and_then(|c| teachers.and_then(|map| map.get(c)).cloned().flatten())
                    .unwrap_or_else(|| "Unknown".to_string());
                lessons.push(LessonRecord {
                    day: *day,
                    date: date.clone(),
                    studio: studio.clone(),
                    time: time.clone(),
                    student_info: text.to_string(),
                    rehearsal: text.to_lowercase().contains("rehearsal"),
                    teacher_color: color,
                    teacher,
                });
            }
            if !lessons.is_empty() {
                slots.push(TimeSlot { time, lessons });
            }
        }

        let mut studios = Vec::new();
        for (_, studio, _) in &columns {
            if !studio.is_empty() && !studios.contains(studio) {
                studios.push(studio.clone());
            }
        }

        let teachers_map = teachers.cloned().unwrap_or_default();
        let unique_teachers = teachers_map
            .values()
            .collect::<std::collections::BTreeSet<_>>()
            .len();
        let total_lessons = slots.iter().map(|s| s.lessons.len()).sum();
        Ok(Schedule {
            week_info: WeekInfo {
                sheet_name: sheet_name.to_string(),
                week_dates: week_dates.clone(),
                extracted_date: Utc::now().to_rfc3339(),
            },
            teachers: teachers_map,
            studios,
            summary: Summary {
                total_time_slots: slots.len(),
                total_lessons,
                unique_teachers,
                date_range: Schedule::date_range(&week_dates),
            },
            schedule: slots,
            warnings: Vec::new(),
        })
    }

    /// Write the lesson table as CSV.
    pub fn write_csv<W: Write>(&self, w: W) -> Result<()> {
        Self::write_table(w, &self.headers, &self.rows).context("writing lesson CSV")
    }

    /// Write the paired teacher-color table as CSV.
    pub fn write_teacher_csv<W: Write>(&self, w: W) -> Result<()> {
        Self::write_table(w, &self.headers, &self.colors).context("writing teacher-color CSV")
    }

    fn write_table<W: Write>(w: W, headers: &[String], rows: &[Vec<String>]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(w);
        wtr.write_record(headers)?;
        for row in rows {
            wtr.write_record(row)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// Read a lesson table (and optionally its paired color table) back.
    pub fn read_csv<R: Read>(lessons: R, colors: Option<R>) -> Result<Self> {
        let (headers, rows) = Self::read_table(lessons).context("reading lesson CSV")?;
        let color_rows = match colors {
            Some(r) => {
                let (_, rows) = Self::read_table(r).context("reading teacher-color CSV")?;
                rows
            }
            None => Vec::new(),
        };
        Ok(TabularSchedule {
            headers,
            rows,
            colors: color_rows,
        })
    }

    fn read_table<R: Read>(r: R) -> Result<(Vec<String>, Vec<Vec<String>>)> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(false).from_reader(r);
        let mut records = rdr.records();
        let headers = records
            .next()
            .transpose()?
            .ok_or_else(|| anyhow!("empty CSV"))?
            .iter()
            .map(str::to_string)
            .collect();
        let mut rows = Vec::new();
        for record in records {
            rows.push(record?.iter().map(str::to_string).collect());
        }
        Ok((headers, rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(
        day: Weekday,
        date: &str,
        studio: &str,
        time: &str,
        info: &str,
        color: Option<&str>,
        teacher: &str,
    ) -> LessonRecord {
        LessonRecord {
            day,
            date: date.into(),
            studio: studio.into(),
            time: time.into(),
            student_info: info.into(),
            rehearsal: false,
            teacher_color: color.map(Into::into),
            teacher: teacher.into(),
        }
    }

    fn sample_schedule() -> Schedule {
        let slots = vec![
            TimeSlot {
                time: "3:45:00".into(),
                lessons: vec![
                    lesson(
                        Weekday::Monday,
                        "2025-06-09",
                        "STUDIO A",
                        "3:45:00",
                        "Ava - Solo",
                        Some("FFFFF2CC"),
                        "PAIGE",
                    ),
                    lesson(
                        Weekday::Tuesday,
                        "2025-06-10",
                        "STUDIO B",
                        "3:45:00",
                        "Mia",
                        None,
                        "Unknown",
                    ),
                ],
            },
            TimeSlot {
                time: "4:30:00".into(),
                lessons: vec![lesson(
                    Weekday::Tuesday,
                    "2025-06-10",
                    "STUDIO B",
                    "4:30:00",
                    "Kinley - technique",
                    Some("FFB4A7D6"),
                    "Kinley",
                )],
            },
        ];
        let teachers: BTreeMap<String, Option<String>> = [
            ("FFFFF2CC".to_string(), Some("PAIGE".to_string())),
            ("FFB4A7D6".to_string(), Some("Kinley".to_string())),
        ]
        .into();
        let week_dates = vec!["2025-06-09".to_string(), "2025-06-10".to_string()];
        Schedule {
            week_info: WeekInfo {
                sheet_name: "69 -615".into(),
                week_dates: week_dates.clone(),
                extracted_date: Utc::now().to_rfc3339(),
            },
            teachers,
            studios: vec!["STUDIO A".into(), "STUDIO B".into()],
            summary: Summary {
                total_time_slots: 2,
                total_lessons: 3,
                unique_teachers: 2,
                date_range: Schedule::date_range(&week_dates),
            },
            schedule: slots,
            warnings: Vec::new(),
        }
    }

    fn tuples(s: &Schedule) -> std::collections::BTreeSet<(String, String, String, String, String)> {
        s.schedule
            .iter()
            .flat_map(|slot| {
                slot.lessons.iter().map(|l| {
                    (
                        l.day.name().to_string(),
                        l.studio.clone(),
                        l.date.clone(),
                        l.time.clone(),
                        l.student_info.clone(),
                    )
                })
            })
            .collect()
    }

    #[test]
    fn tabular_headers_and_cells() {
        let tab = sample_schedule().to_tabular();
        assert_eq!(
            tab.headers,
            vec![
                "Time",
                "MONDAY STUDIO A (2025-06-09)",
                "TUESDAY STUDIO B (2025-06-10)"
            ]
        );
        assert_eq!(tab.rows[0], vec!["3:45:00", "Ava - Solo", "Mia"]);
        assert_eq!(tab.rows[1], vec!["4:30:00", "", "Kinley - technique"]);
        assert_eq!(tab.colors[0], vec!["3:45:00", "FFFFF2CC", ""]);
    }

    #[test]
    fn round_trip_preserves_lesson_tuples() {
        let original = sample_schedule();
        let tab = original.to_tabular();
        let back = tab.to_schedule("69 -615", Some(&original.teachers)).unwrap();
        assert_eq!(tuples(&original), tuples(&back));
        // teacher identities survive via the color table + teacher map
        assert_eq!(back.schedule[0].lessons[0].teacher, "PAIGE");
        assert_eq!(back.schedule[1].lessons[0].teacher, "Kinley");
    }

    #[test]
    fn round_trip_through_csv() {
        let original = sample_schedule();
        let tab = original.to_tabular();

        let mut lesson_buf = Vec::new();
        let mut color_buf = Vec::new();
        tab.write_csv(&mut lesson_buf).unwrap();
        tab.write_teacher_csv(&mut color_buf).unwrap();

        let read = TabularSchedule::read_csv(
            std::io::Cursor::new(lesson_buf),
            Some(std::io::Cursor::new(color_buf)),
        )
        .unwrap();
        let back = read.to_schedule("69 -615", Some(&original.teachers)).unwrap();
        assert_eq!(tuples(&original), tuples(&back));
    }

    #[test]
    fn header_without_studio_or_date_parses() {
        let tab = TabularSchedule {
            headers: vec!["Time".into(), "MONDAY ()".into()],
            rows: vec![vec!["9:00:00".into(), "Ava".into()]],
            colors: Vec::new(),
        };
        let s = tab.to_schedule("s", None).unwrap();
        let l = &s.schedule[0].lessons[0];
        assert_eq!(l.day, Weekday::Monday);
        assert_eq!(l.studio, "");
        assert_eq!(l.date, "");
        assert_eq!(l.teacher, "Unknown");
    }

    #[test]
    fn malformed_header_is_an_error() {
        let tab = TabularSchedule {
            headers: vec!["Time".into(), "garbage".into()],
            rows: Vec::new(),
            colors: Vec::new(),
        };
        assert!(tab.to_schedule("s", None).is_err());
    }

    #[test]
    fn nested_json_shape() {
        let s = sample_schedule();
        let v: serde_json::Value = serde_json::to_value(&s).unwrap();
        assert_eq!(v["week_info"]["sheet_name"], "69 -615");
        assert_eq!(v["teachers"]["FFFFF2CC"], "PAIGE");
        assert_eq!(v["summary"]["total_lessons"], 3);
        assert_eq!(v["schedule"][0]["lessons"][0]["day"], "MONDAY");
        assert_eq!(v["summary"]["date_range"], "2025-06-09 to 2025-06-10");
    }
}
