//! Cross-team rankings and leader highlighting.

use std::collections::HashMap;

use serde::Serialize;

use crate::stats::TeamStats;

/// A ranked statistic. [`Metric::ALL`] is also the order in which highlight
/// ordinals are handed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    MatchContribution,
    AutoPoints,
    TeleopPoints,
    ClimbPoints,
    DefenseFraction,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::MatchContribution,
        Metric::AutoPoints,
        Metric::TeleopPoints,
        Metric::ClimbPoints,
        Metric::DefenseFraction,
    ];

    pub fn value(self, stats: &TeamStats) -> f64 {
        match self {
            Metric::MatchContribution => stats.scores.avg_match_contribution,
            Metric::AutoPoints => stats.scores.avg_auto_points,
            Metric::TeleopPoints => stats.scores.avg_tele_points,
            Metric::ClimbPoints => stats.averages.avg_climb_points,
            Metric::DefenseFraction => stats.averages.avg_defense_fraction,
        }
    }

    /// Column heading on the ranking sheet.
    pub fn heading(self) -> &'static str {
        match self {
            Metric::MatchContribution => "Avg. Match Contribution (Pts.)",
            Metric::AutoPoints => "Avg. Auto Pts.",
            Metric::TeleopPoints => "Avg. Teleop Pts.",
            Metric::ClimbPoints => "Avg. Climb Pts.",
            Metric::DefenseFraction => "Defense %",
        }
    }

    /// Row label on a team's own sheet.
    pub fn rank_label(self) -> &'static str {
        match self {
            Metric::MatchContribution => "Avg. Match Points",
            Metric::AutoPoints => "Avg. Auto Points",
            Metric::TeleopPoints => "Avg. Teleop Points",
            Metric::ClimbPoints => "Avg. Climb Points",
            Metric::DefenseFraction => "Matches on Defense",
        }
    }
}

/// Teams ordered best-first by one metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingTable {
    pub metric: Metric,
    pub entries: Vec<(i64, f64)>,
}

impl RankingTable {
    /// Sorts descending by value. The sort is stable, so teams with equal
    /// values stay in the order they were given.
    pub fn build<'a>(metric: Metric, teams: impl IntoIterator<Item = (i64, &'a TeamStats)>) -> Self {
        let mut entries: Vec<(i64, f64)> = teams
            .into_iter()
            .map(|(team_num, stats)| (team_num, metric.value(stats)))
            .collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        Self { metric, entries }
    }

    /// 1-based position of a team in this table.
    pub fn position(&self, team_num: i64) -> Option<usize> {
        self.entries
            .iter()
            .position(|(t, _)| *t == team_num)
            .map(|i| i + 1)
    }

    pub fn top(&self, n: usize) -> impl Iterator<Item = i64> + '_ {
        self.entries.iter().take(n).map(|(t, _)| *t)
    }
}

/// Teams that lead at least one ranking table, each with a distinct ordinal
/// used to pick its highlight color.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightSet {
    ordered: Vec<i64>,
}

impl HighlightSet {
    pub fn from_tables(tables: &[RankingTable], top_n: usize) -> Self {
        let mut ordered = Vec::new();
        for table in tables {
            for team_num in table.top(top_n) {
                if !ordered.contains(&team_num) {
                    ordered.push(team_num);
                }
            }
        }
        Self { ordered }
    }

    /// 1-based ordinal of a highlighted team.
    pub fn ordinal(&self, team_num: i64) -> Option<usize> {
        self.ordered
            .iter()
            .position(|&t| t == team_num)
            .map(|i| i + 1)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.ordered.iter().enumerate().map(|(i, &t)| (t, i + 1))
    }
}

/// A team's 1-based position in every ranking table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamRanks {
    pub positions: Vec<(Metric, usize)>,
}

impl TeamRanks {
    pub fn get(&self, metric: Metric) -> Option<usize> {
        self.positions
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, p)| *p)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Rankings {
    pub tables: Vec<RankingTable>,
    pub highlights: HighlightSet,
    pub ranks: HashMap<i64, TeamRanks>,
}

impl Rankings {
    /// Ranks every team by every metric. `teams` must be in discovery order;
    /// that order breaks ties.
    pub fn compute(teams: &[(i64, TeamStats)], top_n: usize) -> Self {
        let tables: Vec<RankingTable> = Metric::ALL
            .iter()
            .map(|&metric| RankingTable::build(metric, teams.iter().map(|(t, s)| (*t, s))))
            .collect();

        let highlights = HighlightSet::from_tables(&tables, top_n);

        let ranks = teams
            .iter()
            .map(|(team_num, _)| {
                let positions = tables
                    .iter()
                    .filter_map(|table| table.position(*team_num).map(|p| (table.metric, p)))
                    .collect();
                (*team_num, TeamRanks { positions })
            })
            .collect();

        Self {
            tables,
            highlights,
            ranks,
        }
    }

    pub fn table(&self, metric: Metric) -> Option<&RankingTable> {
        self.tables.iter().find(|t| t.metric == metric)
    }

    pub fn ranks_for(&self, team_num: i64) -> Option<&TeamRanks> {
        self.ranks.get(&team_num)
    }
}
