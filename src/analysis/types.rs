//! Data types shared by the aggregation pipeline.

use serde::Serialize;

/// Numeric stand-in for a field the scout left blank.
pub const SENTINEL: i64 = -1;

/// An enumerated scouting field whose vocabulary term and numeric value travel
/// together.
pub trait Tier: Copy + Eq + Sized + 'static {
    /// Every term, in vocabulary order.
    const ALL: &'static [Self];

    /// The exact string the scouting form writes for this term.
    fn label(self) -> &'static str;

    /// Points (or fraction) this term is worth.
    fn value(self) -> f64;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.label() == label)
    }
}

/// Taxi result for one match. `Unknown` is what a blank cell becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Taxi {
    Yes,
    No,
    Unknown,
}

impl Taxi {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Yes" => Some(Taxi::Yes),
            "No" => Some(Taxi::No),
            "" => Some(Taxi::Unknown),
            _ => None,
        }
    }

    pub fn value(self) -> f64 {
        match self {
            Taxi::Yes => 1.0,
            Taxi::No => 0.0,
            Taxi::Unknown => SENTINEL as f64,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Taxi::Yes => "Yes",
            Taxi::No => "No",
            Taxi::Unknown => "",
        }
    }
}

/// End-of-match climb achievement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HangarTier {
    #[serde(rename = "No Hang")]
    NoHang,
    #[serde(rename = "Low Rung (1)")]
    Low,
    #[serde(rename = "Mid Rung (2)")]
    Mid,
    #[serde(rename = "High Rung (3)")]
    High,
    #[serde(rename = "Traversal Rung (4)")]
    Traversal,
}

impl Tier for HangarTier {
    const ALL: &'static [Self] = &[
        HangarTier::NoHang,
        HangarTier::Low,
        HangarTier::Mid,
        HangarTier::High,
        HangarTier::Traversal,
    ];

    fn label(self) -> &'static str {
        match self {
            HangarTier::NoHang => "No Hang",
            HangarTier::Low => "Low Rung (1)",
            HangarTier::Mid => "Mid Rung (2)",
            HangarTier::High => "High Rung (3)",
            HangarTier::Traversal => "Traversal Rung (4)",
        }
    }

    fn value(self) -> f64 {
        match self {
            HangarTier::NoHang => 0.0,
            HangarTier::Low => 4.0,
            HangarTier::Mid => 6.0,
            HangarTier::High => 10.0,
            HangarTier::Traversal => 15.0,
        }
    }
}

/// Whether the scout saw the team playing mostly defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DefenseTier {
    No,
    Unsure,
    Yes,
}

impl Tier for DefenseTier {
    const ALL: &'static [Self] = &[DefenseTier::No, DefenseTier::Unsure, DefenseTier::Yes];

    fn label(self) -> &'static str {
        match self {
            DefenseTier::No => "No",
            DefenseTier::Unsure => "Unsure",
            DefenseTier::Yes => "Yes",
        }
    }

    fn value(self) -> f64 {
        match self {
            DefenseTier::No => 0.0,
            DefenseTier::Unsure => 0.5,
            DefenseTier::Yes => 1.0,
        }
    }
}

/// Numeric value of an optional tier, with blanks mapped to the sentinel.
pub fn tier_value<T: Tier>(tier: Option<T>) -> f64 {
    tier.map_or(SENTINEL as f64, T::value)
}

/// One team's performance in one qualification match (one input row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchEntry {
    pub row: usize,
    pub team_num: i64,
    pub qual_match_num: i64,
    pub taxi: Taxi,
    pub auto_cargo_upper: i64,
    pub auto_cargo_lower: i64,
    pub tele_cargo_upper: i64,
    pub tele_cargo_lower: i64,
    pub hangar: Option<HangarTier>,
    pub defense: Option<DefenseTier>,
    pub other_info: String,
}

impl MatchEntry {
    pub fn hangar_points(&self) -> f64 {
        tier_value(self.hangar)
    }

    pub fn defense_fraction(&self) -> f64 {
        tier_value(self.defense)
    }
}

/// Occurrence count per vocabulary term, kept in vocabulary order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierCounts<T: Tier> {
    counts: Vec<(T, usize)>,
}

impl<T: Tier> Default for TierCounts<T> {
    fn default() -> Self {
        Self {
            counts: T::ALL.iter().map(|&t| (t, 0)).collect(),
        }
    }
}

impl<T: Tier> TierCounts<T> {
    pub fn record(&mut self, tier: T) {
        if let Some((_, n)) = self.counts.iter_mut().find(|(t, _)| *t == tier) {
            *n += 1;
        }
    }

    pub fn forget(&mut self, tier: T) {
        if let Some((_, n)) = self.counts.iter_mut().find(|(t, _)| *t == tier) {
            *n = n.saturating_sub(1);
        }
    }

    pub fn get(&self, tier: T) -> usize {
        self.counts
            .iter()
            .find(|(t, _)| *t == tier)
            .map_or(0, |(_, n)| *n)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (T, usize)> + '_ {
        self.counts.iter().copied()
    }
}

/// All accepted matches for one team, plus category frequencies for charting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team_num: i64,
    pub matches: Vec<MatchEntry>,
    pub hangar_counts: TierCounts<HangarTier>,
    pub defense_counts: TierCounts<DefenseTier>,
}

impl TeamRecord {
    pub fn new(team_num: i64) -> Self {
        Self {
            team_num,
            matches: Vec::new(),
            hangar_counts: TierCounts::default(),
            defense_counts: TierCounts::default(),
        }
    }

    pub fn has_match(&self, qual_match_num: i64) -> bool {
        self.matches
            .iter()
            .any(|m| m.qual_match_num == qual_match_num)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_labels_round_trip_through_vocabulary() {
        for &tier in HangarTier::ALL {
            assert_eq!(HangarTier::from_label(tier.label()), Some(tier));
        }
        for &tier in DefenseTier::ALL {
            assert_eq!(DefenseTier::from_label(tier.label()), Some(tier));
        }
    }

    #[test]
    fn test_hangar_points_table() {
        assert_eq!(HangarTier::NoHang.value(), 0.0);
        assert_eq!(HangarTier::Low.value(), 4.0);
        assert_eq!(HangarTier::Mid.value(), 6.0);
        assert_eq!(HangarTier::High.value(), 10.0);
        assert_eq!(HangarTier::Traversal.value(), 15.0);
    }

    #[test]
    fn test_from_label_is_exact() {
        assert_eq!(HangarTier::from_label("low rung (1)"), None);
        assert_eq!(DefenseTier::from_label(" Yes"), None);
        assert_eq!(DefenseTier::from_label(""), None);
        assert_eq!(Taxi::from_label(""), Some(Taxi::Unknown));
        assert_eq!(Taxi::from_label("yes"), None);
    }

    #[test]
    fn test_blank_tier_maps_to_sentinel() {
        assert_eq!(tier_value::<HangarTier>(None), -1.0);
        assert_eq!(tier_value(Some(DefenseTier::Unsure)), 0.5);
        assert_eq!(Taxi::Unknown.value(), -1.0);
    }

    #[test]
    fn test_tier_counts() {
        let mut counts = TierCounts::<DefenseTier>::default();
        counts.record(DefenseTier::Yes);
        counts.record(DefenseTier::Yes);
        counts.record(DefenseTier::No);
        counts.forget(DefenseTier::Yes);
        counts.forget(DefenseTier::Unsure);

        assert_eq!(counts.get(DefenseTier::Yes), 1);
        assert_eq!(counts.get(DefenseTier::No), 1);
        assert_eq!(counts.get(DefenseTier::Unsure), 0);
        assert_eq!(counts.total(), 2);

        let order: Vec<_> = counts.iter().map(|(t, _)| t).collect();
        assert_eq!(order, DefenseTier::ALL.to_vec());
    }
}
