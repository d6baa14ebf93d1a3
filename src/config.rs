//! Run configuration: the manual teacher override table plus header-scan
//! tunables, loaded from one YAML file.

use crate::structure::ScanParams;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Static extraction configuration. `teacher_overrides` maps a color token
/// directly to a confirmed teacher display name and takes precedence over
/// heuristic inference; absent tokens fall through to the heuristics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub teacher_overrides: BTreeMap<String, String>,
    pub scan: ScanParams,
}

impl ExtractConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config `{}`", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config `{}`", path.display()))
    }
}
