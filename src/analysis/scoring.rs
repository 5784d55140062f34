use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::stats::Averages;

/// Point weights of the scoring actions.
const TAXI_POINTS: f64 = 2.0;
const AUTO_LOWER_POINTS: f64 = 2.0;
const AUTO_UPPER_POINTS: f64 = 4.0;
const TELE_UPPER_POINTS: f64 = 2.0;

/// Composite scores derived from a team's averages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DerivedScores {
    pub avg_auto_points: f64,
    pub avg_tele_points: f64,
    pub avg_match_contribution: f64,
}

/// Formula used to turn averages into composite scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFormula {
    /// Teleop points use the auto upper-hub average for the upper-hub term,
    /// matching the reports teams have been reading all season.
    #[default]
    Legacy,
    /// Teleop points use the teleop upper-hub average.
    Corrected,
}

impl ScoringFormula {
    pub fn auto_points(self, avg: &Averages) -> f64 {
        TAXI_POINTS * avg.taxi_rate
            + AUTO_LOWER_POINTS * avg.avg_auto_lower
            + AUTO_UPPER_POINTS * avg.avg_auto_upper
    }

    pub fn tele_points(self, avg: &Averages) -> f64 {
        let upper = match self {
            ScoringFormula::Legacy => avg.avg_auto_upper,
            ScoringFormula::Corrected => avg.avg_tele_upper,
        };
        avg.avg_tele_lower + TELE_UPPER_POINTS * upper
    }

    pub fn score(self, avg: &Averages) -> DerivedScores {
        let avg_auto_points = self.auto_points(avg);
        let avg_tele_points = self.tele_points(avg);

        DerivedScores {
            avg_auto_points,
            avg_tele_points,
            avg_match_contribution: avg_auto_points + 2.0 * avg_tele_points,
        }
    }
}
