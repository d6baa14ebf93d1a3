//! Teacher identity resolution from fill colors.
//!
//! The sheets encode the assigned teacher informally, as the cell fill color.
//! For each distinct color token we collect every cell value seen under it in
//! the data region, then resolve: a manual override wins unconditionally; one
//! distinct candidate name in the evidence names the teacher; several mean
//! the token is ambiguous and stays ambiguous; none means unknown.

use crate::error::{ExtractError, ExtractWarning};
use crate::grid::Grid;
use crate::parse::candidate_names;
use crate::structure::HeaderIndex;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What a color token resolved to. Fixed once computed, so every cell
/// sharing a token gets the same identity within a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TeacherIdentity {
    Named(String),
    /// The token implied this many distinct names; never silently pick one.
    Ambiguous(usize),
    Unknown,
}

impl TeacherIdentity {
    /// Display label as it appears in output records.
    pub fn label(&self) -> String {
        match self {
            TeacherIdentity::Named(name) => name.clone(),
            TeacherIdentity::Ambiguous(n) => format!("MULTIPLE_TEACHERS_{}", n),
            TeacherIdentity::Unknown => "Unknown".to_string(),
        }
    }

    /// Value for the nested-output teacher map: a name, an ambiguity label,
    /// or null for unknown.
    pub fn json_value(&self) -> Option<String> {
        match self {
            TeacherIdentity::Unknown => None,
            other => Some(other.label()),
        }
    }
}

/// Per-sheet color → teacher mapping. Built once, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct ColorResolver {
    identities: BTreeMap<String, TeacherIdentity>,
}

impl ColorResolver {
    /// Scan the data region (rows at or below `first_data_row`, row-major
    /// then column-major so first-seen name ordering is reproducible),
    /// gather evidence per color token, and resolve each token.
    pub fn build(
        grid: &Grid,
        headers: &HeaderIndex,
        overrides: &BTreeMap<String, String>,
        warnings: &mut Vec<ExtractWarning>,
    ) -> Result<Self, ExtractError> {
        // color -> distinct candidate names, first-seen order
        let mut evidence: BTreeMap<String, Vec<String>> = BTreeMap::new();

        for row in headers.first_data_row..grid.rows() {
            for col in 0..grid.cols() {
                let Some(color) = grid.color(row, col)? else {
                    continue;
                };
                let names = evidence.entry(color.to_string()).or_default();
                if let Some(val) = grid.value(row, col)? {
                    for name in candidate_names(val) {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
            }
        }

        let mut identities = BTreeMap::new();
        for (color, names) in evidence {
            let identity = if let Some(confirmed) = overrides.get(&color) {
                TeacherIdentity::Named(confirmed.clone())
            } else {
                match names.len() {
                    0 => TeacherIdentity::Unknown,
                    1 => TeacherIdentity::Named(names[0].clone()),
                    n => {
                        warn!(color = %color, names = n, "color implies multiple teachers");
                        warnings.push(ExtractWarning::ColorResolutionAmbiguous {
                            color: color.clone(),
                            names: n,
                        });
                        TeacherIdentity::Ambiguous(n)
                    }
                }
            };
            identities.insert(color, identity);
        }

        debug!(colors = identities.len(), "resolved teacher colors");
        Ok(ColorResolver { identities })
    }

    /// Identity for a color token; tokens never seen in the data region
    /// resolve to unknown.
    pub fn resolve(&self, color: &str) -> TeacherIdentity {
        self.identities
            .get(color)
            .cloned()
            .unwrap_or(TeacherIdentity::Unknown)
    }

    /// All resolved tokens with their identities, in token order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TeacherIdentity)> {
        self.identities.iter().map(|(k, v)| (k.as_str(), v))
    }
}
