use serde::Serialize;

use crate::analysis::scoring::{DerivedScores, ScoringFormula};
use crate::analysis::types::{MatchEntry, SENTINEL};
use crate::analysis::utility::mean;
use crate::config::MissingValues;
use crate::error::ScoutError;

/// Simple per-category averages over a team's accepted matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Averages {
    pub taxi_rate: f64,
    pub avg_auto_upper: f64,
    pub avg_auto_lower: f64,
    pub avg_tele_upper: f64,
    pub avg_tele_lower: f64,
    pub avg_defense_fraction: f64,
    pub avg_climb_points: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamStats {
    pub match_count: usize,
    pub averages: Averages,
    pub scores: DerivedScores,
}

impl TeamStats {
    /// Computes averages and composite scores for one team.
    ///
    /// Pure: the same matches always give the same result.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::EmptyTeam`] if `matches` is empty.
    pub fn from_matches(
        team_num: i64,
        matches: &[MatchEntry],
        missing: MissingValues,
        formula: ScoringFormula,
    ) -> Result<Self, ScoutError> {
        if matches.is_empty() {
            return Err(ScoutError::EmptyTeam { team_num });
        }

        let avg = |value: fn(&MatchEntry) -> f64| -> f64 {
            let series: Vec<f64> = matches
                .iter()
                .map(value)
                .filter(|&v| missing == MissingValues::Counted || v != SENTINEL as f64)
                .collect();
            mean(&series)
        };

        let averages = Averages {
            taxi_rate: avg(|m| m.taxi.value()),
            avg_auto_upper: avg(|m| m.auto_cargo_upper as f64),
            avg_auto_lower: avg(|m| m.auto_cargo_lower as f64),
            avg_tele_upper: avg(|m| m.tele_cargo_upper as f64),
            avg_tele_lower: avg(|m| m.tele_cargo_lower as f64),
            avg_defense_fraction: avg(MatchEntry::defense_fraction),
            avg_climb_points: avg(MatchEntry::hangar_points),
        };

        Ok(TeamStats {
            match_count: matches.len(),
            averages,
            scores: formula.score(&averages),
        })
    }

    pub fn pct(fraction: f64) -> f64 {
        fraction * 100.0
    }

    pub fn taxi_pct(&self) -> f64 {
        Self::pct(self.averages.taxi_rate)
    }

    pub fn defense_pct(&self) -> f64 {
        Self::pct(self.averages.avg_defense_fraction)
    }
}
