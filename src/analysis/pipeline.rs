use std::io::Read;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::analysis::aggregate::{Aggregation, aggregate_entries};
use crate::analysis::rank::{Rankings, TeamRanks};
use crate::analysis::types::TeamRecord;
use crate::config::PipelineConfig;
use crate::error::ScoutError;
use crate::record::read_entries;
use crate::stats::TeamStats;

/// A team's matches together with the statistics derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    pub record: TeamRecord,
    pub stats: TeamStats,
}

impl TeamSummary {
    pub fn team_num(&self) -> i64 {
        self.record.team_num
    }
}

/// Everything the report writer needs, computed in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScoutingReport {
    pub generated_at: DateTime<Utc>,
    pub config: PipelineConfig,
    /// Sorted ascending by team number.
    pub teams: Vec<TeamSummary>,
    pub rankings: Rankings,
    pub skipped_entries: usize,
    pub duplicate_entries: usize,
}

impl ScoutingReport {
    pub fn team(&self, team_num: i64) -> Option<&TeamSummary> {
        self.teams.iter().find(|t| t.team_num() == team_num)
    }

    pub fn ranks_for(&self, team_num: i64) -> TeamRanks {
        self.rankings
            .ranks_for(team_num)
            .cloned()
            .unwrap_or_default()
    }
}

/// Computes statistics for every aggregated team, keeping discovery order.
///
/// # Errors
///
/// Fails if any team reached this stage without a match.
#[tracing::instrument(skip_all, fields(teams = aggregation.teams.len()))]
pub fn finalize(
    aggregation: &Aggregation,
    config: &PipelineConfig,
) -> Result<Vec<TeamSummary>, ScoutError> {
    aggregation
        .teams
        .iter()
        .map(|record| {
            let stats = TeamStats::from_matches(
                record.team_num,
                &record.matches,
                config.missing_values,
                config.formula,
            )?;
            Ok(TeamSummary {
                record: record.clone(),
                stats,
            })
        })
        .collect()
}

/// Runs parse, aggregate, finalize and rank over CSV input.
///
/// # Errors
///
/// Any fatal input fault aborts the whole run.
#[tracing::instrument(skip_all)]
pub fn run<R: Read>(input: R, config: &PipelineConfig) -> Result<ScoutingReport, ScoutError> {
    let entries = read_entries(input)?;
    let row_count = entries.len();

    let aggregation = aggregate_entries(entries, config.duplicates);
    let summaries = finalize(&aggregation, config)?;

    let ranked: Vec<(i64, TeamStats)> = summaries
        .iter()
        .map(|s| (s.team_num(), s.stats))
        .collect();
    let rankings = Rankings::compute(&ranked, config.top_n);

    let mut teams = summaries;
    teams.sort_by_key(TeamSummary::team_num);

    info!(
        rows = row_count,
        teams = teams.len(),
        skipped = aggregation.skipped_entries,
        duplicates = aggregation.duplicate_entries,
        highlighted = rankings.highlights.len(),
        "Scouting data processed"
    );

    Ok(ScoutingReport {
        generated_at: Utc::now(),
        config: config.clone(),
        teams,
        rankings,
        skipped_entries: aggregation.skipped_entries,
        duplicate_entries: aggregation.duplicate_entries,
    })
}
