//! Free-text cell parsing.
//!
//! A schedule cell can hold any mix of time, student name, and lesson type
//! ("3:45 PM: Ava - Solo", "REHEARSAL", "4:15"). The parser pulls out an
//! embedded time, cleans the remainder, classifies it, and proposes the name
//! tokens a teacher could be inferred from. It never resolves teachers
//! itself; that happens in `teachers`.

pub mod time;

use once_cell::sync::Lazy;
use std::collections::HashSet;

pub use time::{find_time, is_time_only, TimeFormat, TimeMatch};

/// Calendar and markup words that look like names but never are. Uppercased
/// for case-insensitive lookup. Lesson-type words are included because cells
/// like "Ava - Solo" carry them in name position.
static EXCLUDED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "MONDAY",
        "TUESDAY",
        "WEDNESDAY",
        "THURSDAY",
        "FRIDAY",
        "SATURDAY",
        "SUNDAY",
        "STUDIO",
        "DAILY",
        "SCHEDULE",
        "WEEK",
        "AM",
        "PM",
        "SOLO",
        "DUO",
        "TECHNIQUE",
        "CHOREOGRAPHY",
        "JAZZ",
        "TAP",
        "REHEARSAL",
        "THE",
        "AND",
        "OR",
        "IS",
        "AT",
    ]
    .into_iter()
    .collect()
});

/// Structured view of one raw cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCell {
    /// Embedded time, removed from `text`. Normalized spelling.
    pub time: Option<String>,
    /// Cleaned remainder: trimmed, whitespace collapsed, leading `:`/`-`
    /// stripped. Empty for blank or time-only cells.
    pub text: String,
    pub is_rehearsal: bool,
    /// Distinct candidate personal-name tokens, in order of appearance.
    pub candidate_names: Vec<String>,
}

impl ParsedCell {
    /// Blank and time-only cells produce no lesson record.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Parse one raw cell string. Total: any input yields a ParsedCell.
pub fn parse_cell(raw: &str) -> ParsedCell {
    let mut remainder = raw.trim().to_string();

    let time = find_time(&remainder).map(|m| {
        remainder.replace_range(m.start..m.end, "");
        m.text
    });

    // collapse internal whitespace, then strip leading separators left over
    // from "TIME: NAME" layouts
    let collapsed = remainder.split_whitespace().collect::<Vec<_>>().join(" ");
    let text = collapsed
        .trim_start_matches([':', '-', ' '])
        .trim()
        .to_string();

    let is_rehearsal = text.to_lowercase().contains("rehearsal");
    let candidate_names = if is_rehearsal || text.is_empty() {
        Vec::new()
    } else {
        candidate_names(&text)
    };

    ParsedCell {
        time,
        text,
        is_rehearsal,
        candidate_names,
    }
}

/// Extract distinct candidate personal-name tokens from cleaned lesson text.
/// Split on the separators the sheets actually use, then keep tokens that
/// start with a capital letter, are longer than one character, carry no
/// digits, and are not calendar/markup vocabulary.
pub fn candidate_names(text: &str) -> Vec<String> {
    let mut names = Vec::new();
    for part in text.split([',', '/', '&', '-']) {
        let token = part.trim();
        if token.len() <= 1 {
            continue;
        }
        if !token.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            continue;
        }
        if token.chars().any(|c| c.is_ascii_digit()) {
            continue;
        }
        if EXCLUDED_WORDS.contains(token.to_uppercase().as_str()) {
            continue;
        }
        if !names.iter().any(|n| n == token) {
            names.push(token.to_string());
        }
    }
    names
}
