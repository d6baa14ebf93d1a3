//! Embedded-time extraction.
//!
//! Cell text mixes times with student names ("3:45 PM: Ava - Solo"), and the
//! same sheet uses several time spellings. Matchers are tried in priority
//! order; the first hit wins and is cut out of the string by the caller.

use once_cell::sync::Lazy;
use regex::Regex;

/// Which spelling matched, most specific first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeFormat {
    /// `3:45 PM`, `4:30pm`
    HourMinuteMeridiem,
    /// `15:30:00`
    HourMinuteSecond,
    /// `4:15`
    HourMinute,
}

/// A located time plus the byte span it occupies in the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeMatch {
    pub format: TimeFormat,
    /// Normalized spelling: single space before an uppercased AM/PM.
    pub text: String,
    pub start: usize,
    pub end: usize,
}

static MERIDIEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,2}:\d{2})\s*(AM|PM)").unwrap());
static HMS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}:\d{2}").unwrap());
static HM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d{1,2}:\d{2}").unwrap());

/// Find the first embedded time, trying formats from most to least specific.
pub fn find_time(s: &str) -> Option<TimeMatch> {
    if let Some(caps) = MERIDIEM_RE.captures(s) {
        let whole = caps.get(0).unwrap();
        return Some(TimeMatch {
            format: TimeFormat::HourMinuteMeridiem,
            text: format!("{} {}", &caps[1], caps[2].to_uppercase()),
            start: whole.start(),
            end: whole.end(),
        });
    }
    if let Some(m) = HMS_RE.find(s) {
        return Some(TimeMatch {
            format: TimeFormat::HourMinuteSecond,
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        });
    }
    if let Some(m) = HM_RE.find(s) {
        return Some(TimeMatch {
            format: TimeFormat::HourMinute,
            text: m.as_str().to_string(),
            start: m.start(),
            end: m.end(),
        });
    }
    None
}

/// True when the string is nothing but a single time value.
pub fn is_time_only(s: &str) -> bool {
    static WHOLE_RE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^\d{1,2}:\d{2}(?::\d{2})?(?:\s*(?:AM|PM))?$").unwrap()
    });
    WHOLE_RE.is_match(s.trim())
}
