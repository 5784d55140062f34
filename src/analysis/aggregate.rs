//! Groups match entries by team.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, warn};

use crate::analysis::types::{MatchEntry, SENTINEL, TeamRecord};
use crate::config::DuplicatePolicy;

/// Output of the aggregation stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    /// Teams in first-seen order; each has at least one match.
    pub teams: Vec<TeamRecord>,
    /// Entries dropped because the team number was blank.
    pub skipped_entries: usize,
    /// Entries discarded or superseded as duplicates of an earlier match.
    pub duplicate_entries: usize,
}

/// Running aggregation state for one pass over the input.
pub struct TeamAggregator {
    policy: DuplicatePolicy,
    teams: Vec<TeamRecord>,
    index: HashMap<i64, usize>,
    skipped_entries: usize,
    duplicate_entries: usize,
}

impl TeamAggregator {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            teams: Vec::new(),
            index: HashMap::new(),
            skipped_entries: 0,
            duplicate_entries: 0,
        }
    }

    pub fn add(&mut self, entry: MatchEntry) {
        if entry.team_num == SENTINEL {
            warn!(row = entry.row, "Skipping entry without a team number");
            self.skipped_entries += 1;
            return;
        }

        let slot = *self.index.entry(entry.team_num).or_insert_with(|| {
            self.teams.push(TeamRecord::new(entry.team_num));
            self.teams.len() - 1
        });
        let team = &mut self.teams[slot];

        let existing = team
            .matches
            .iter()
            .position(|m| m.qual_match_num == entry.qual_match_num);

        match (existing, self.policy) {
            (Some(_), DuplicatePolicy::KeepFirst) => {
                debug!(
                    team = entry.team_num,
                    qual_match = entry.qual_match_num,
                    row = entry.row,
                    "Discarding duplicate match entry"
                );
                self.duplicate_entries += 1;
            }
            (Some(i), DuplicatePolicy::KeepLast) => {
                debug!(
                    team = entry.team_num,
                    qual_match = entry.qual_match_num,
                    row = entry.row,
                    "Replacing earlier match entry"
                );
                self.duplicate_entries += 1;
                let old = std::mem::replace(&mut team.matches[i], entry);
                forget_tiers(team, &old);
                let new = team.matches[i].clone();
                count_tiers(team, &new);
            }
            (Some(_), DuplicatePolicy::KeepAll) | (None, _) => {
                if existing.is_some() {
                    self.duplicate_entries += 1;
                }
                count_tiers(team, &entry);
                team.matches.push(entry);
            }
        }
    }

    /// Sorts every team's matches by match number and hands the teams over.
    pub fn finish(self) -> Aggregation {
        let mut teams = self.teams;
        for team in &mut teams {
            team.matches.sort_by_key(|m| m.qual_match_num);
        }

        Aggregation {
            teams,
            skipped_entries: self.skipped_entries,
            duplicate_entries: self.duplicate_entries,
        }
    }
}

/// Aggregates a complete list of entries in input order.
#[tracing::instrument(skip(entries), fields(entries = entries.len()))]
pub fn aggregate_entries(entries: Vec<MatchEntry>, policy: DuplicatePolicy) -> Aggregation {
    let mut aggregator = TeamAggregator::new(policy);
    for entry in entries {
        aggregator.add(entry);
    }
    aggregator.finish()
}

fn count_tiers(team: &mut TeamRecord, entry: &MatchEntry) {
    match entry.hangar {
        Some(tier) => team.hangar_counts.record(tier),
        None => warn!(
            team = team.team_num,
            qual_match = entry.qual_match_num,
            "No hangar tier recorded; left out of the breakdown"
        ),
    }
    match entry.defense {
        Some(tier) => team.defense_counts.record(tier),
        None => warn!(
            team = team.team_num,
            qual_match = entry.qual_match_num,
            "No defense tier recorded; left out of the breakdown"
        ),
    }
}

fn forget_tiers(team: &mut TeamRecord, entry: &MatchEntry) {
    if let Some(tier) = entry.hangar {
        team.hangar_counts.forget(tier);
    }
    if let Some(tier) = entry.defense {
        team.defense_counts.forget(tier);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{DefenseTier, HangarTier, Taxi};

    fn entry(team: i64, qual: i64, auto_upper: i64, hangar: HangarTier) -> MatchEntry {
        MatchEntry {
            row: 0,
            team_num: team,
            qual_match_num: qual,
            taxi: Taxi::Yes,
            auto_cargo_upper: auto_upper,
            auto_cargo_lower: 0,
            tele_cargo_upper: 0,
            tele_cargo_lower: 0,
            hangar: Some(hangar),
            defense: Some(DefenseTier::No),
            other_info: String::new(),
        }
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let agg = aggregate_entries(
            vec![
                entry(300, 1, 0, HangarTier::NoHang),
                entry(100, 1, 0, HangarTier::NoHang),
                entry(300, 2, 0, HangarTier::NoHang),
            ],
            DuplicatePolicy::KeepFirst,
        );

        let order: Vec<_> = agg.teams.iter().map(|t| t.team_num).collect();
        assert_eq!(order, vec![300, 100]);
        assert_eq!(agg.teams[0].matches.len(), 2);
    }

    #[test]
    fn test_keep_first_discards_later_duplicate() {
        let agg = aggregate_entries(
            vec![
                entry(100, 4, 2, HangarTier::Low),
                entry(100, 4, 9, HangarTier::High),
            ],
            DuplicatePolicy::KeepFirst,
        );

        let team = &agg.teams[0];
        assert_eq!(team.matches.len(), 1);
        assert_eq!(team.matches[0].auto_cargo_upper, 2);
        assert_eq!(team.hangar_counts.get(HangarTier::Low), 1);
        assert_eq!(team.hangar_counts.get(HangarTier::High), 0);
        assert_eq!(agg.duplicate_entries, 1);
    }

    #[test]
    fn test_keep_last_replaces_and_moves_counts() {
        let agg = aggregate_entries(
            vec![
                entry(100, 4, 2, HangarTier::Low),
                entry(100, 5, 1, HangarTier::Low),
                entry(100, 4, 9, HangarTier::High),
            ],
            DuplicatePolicy::KeepLast,
        );

        let team = &agg.teams[0];
        assert_eq!(team.matches.len(), 2);
        assert_eq!(team.matches[0].qual_match_num, 4);
        assert_eq!(team.matches[0].auto_cargo_upper, 9);
        assert_eq!(team.hangar_counts.get(HangarTier::Low), 1);
        assert_eq!(team.hangar_counts.get(HangarTier::High), 1);
        assert_eq!(team.hangar_counts.total(), 2);
    }

    #[test]
    fn test_keep_all_keeps_every_entry() {
        let agg = aggregate_entries(
            vec![
                entry(100, 4, 2, HangarTier::Low),
                entry(100, 4, 9, HangarTier::High),
            ],
            DuplicatePolicy::KeepAll,
        );

        assert_eq!(agg.teams[0].matches.len(), 2);
        assert_eq!(agg.teams[0].hangar_counts.total(), 2);
        assert_eq!(agg.duplicate_entries, 1);
    }

    #[test]
    fn test_sentinel_team_is_skipped() {
        let agg = aggregate_entries(
            vec![
                entry(-1, 1, 5, HangarTier::High),
                entry(100, 1, 0, HangarTier::NoHang),
            ],
            DuplicatePolicy::KeepFirst,
        );

        assert_eq!(agg.skipped_entries, 1);
        assert_eq!(agg.teams.len(), 1);
        assert!(agg.teams.iter().all(|t| t.team_num != -1));
    }

    #[test]
    fn test_matches_sorted_by_number() {
        let agg = aggregate_entries(
            vec![
                entry(100, 9, 0, HangarTier::NoHang),
                entry(100, 2, 0, HangarTier::NoHang),
                entry(100, 5, 0, HangarTier::NoHang),
            ],
            DuplicatePolicy::KeepFirst,
        );

        let order: Vec<_> = agg.teams[0]
            .matches
            .iter()
            .map(|m| m.qual_match_num)
            .collect();
        assert_eq!(order, vec![2, 5, 9]);
    }

    #[test]
    fn test_unrecorded_tier_is_not_counted() {
        let mut e = entry(100, 1, 0, HangarTier::NoHang);
        e.hangar = None;
        e.defense = None;

        let agg = aggregate_entries(vec![e], DuplicatePolicy::KeepFirst);
        assert_eq!(agg.teams[0].matches.len(), 1);
        assert_eq!(agg.teams[0].hangar_counts.total(), 0);
        assert_eq!(agg.teams[0].defense_counts.total(), 0);
    }
}
