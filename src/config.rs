//! Pipeline configuration.
//!
//! Every knob has a default that reproduces the scouting spreadsheet's
//! long-standing behavior, so an empty config (or none at all) is the normal
//! case. A config can be stored as a JSON object on disk:
//! ```json
//! {
//!   "duplicates": "keep_last",
//!   "missing_values": "excluded",
//!   "formula": "corrected",
//!   "top_n": 8
//! }
//! ```

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::analysis::scoring::ScoringFormula;

/// What to do when a team has two entries for the same qualification match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The first submitted entry wins; later ones are discarded.
    #[default]
    KeepFirst,
    /// A later entry replaces the earlier one.
    KeepLast,
    /// Every entry is kept.
    KeepAll,
}

/// How blank taxi, cargo, hangar and defense cells enter the averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MissingValues {
    /// The `-1` sentinel is summed like any other value.
    #[default]
    Counted,
    /// Sentinels are skipped and each average uses only recorded matches.
    Excluded,
}

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub duplicates: DuplicatePolicy,
    pub missing_values: MissingValues,
    pub formula: ScoringFormula,
    /// Number of leaders per ranking table that get a highlight color.
    pub top_n: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            duplicates: DuplicatePolicy::default(),
            missing_values: MissingValues::default(),
            formula: ScoringFormula::default(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl PipelineConfig {
    /// Loads the config from a JSON file at `path`. Missing keys keep their
    /// defaults.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file '{path}'"))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config file '{path}'"))?;
        Ok(config)
    }

    /// Applies command-line overrides on top of this config.
    pub fn with_overrides(
        mut self,
        duplicates: Option<DuplicatePolicy>,
        missing_values: Option<MissingValues>,
        formula: Option<ScoringFormula>,
        top_n: Option<usize>,
    ) -> Self {
        if let Some(d) = duplicates {
            self.duplicates = d;
        }
        if let Some(m) = missing_values {
            self.missing_values = m;
        }
        if let Some(f) = formula {
            self.formula = f;
        }
        if let Some(n) = top_n {
            self.top_n = n;
        }
        self
    }
}
