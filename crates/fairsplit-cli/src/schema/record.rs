use chrono::{DateTime, Utc};
use fairsplit_core::{BalanceSeed, PlayerId};
use fairsplit_evaluator::star_distribution::StarDistributionBreakdown;
use fairsplit_optimizer::{
    BalanceResult,
    star_split::{RankedStarSplit, StarSplitStats},
};
use serde::Serialize;

/// Result of a `balance` run as written to the output file.
#[derive(Debug, Clone, Serialize)]
pub struct BalanceRecord<'a> {
    /// Timestamp when the record was created (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Path of the players file the teams were drawn from
    pub players_file: String,
    #[serde(flatten)]
    pub result: &'a BalanceResult,
}

/// Output of `rank-splits`.
#[derive(Debug, Clone, Serialize)]
pub struct SplitRankingRecord {
    pub generated_at: DateTime<Utc>,
    pub seed: Option<BalanceSeed>,
    pub stats: StarSplitStats,
    /// Best first
    pub splits: Vec<SplitEntry>,
}

/// One ranked star split with player ids instead of pool indices.
#[derive(Debug, Clone, Serialize)]
pub struct SplitEntry {
    pub rank: usize,
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub breakdown: StarDistributionBreakdown,
}

impl SplitEntry {
    pub fn new(split: &RankedStarSplit, ids: &[PlayerId]) -> Self {
        let to_ids = |members: &[usize]| -> Vec<PlayerId> {
            members.iter().map(|i| ids[*i].clone()).collect()
        };
        Self {
            rank: split.rank,
            team_a: to_ids(&split.team_a),
            team_b: to_ids(&split.team_b),
            breakdown: split.breakdown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_entry_uses_player_ids() {
        let ids = ["a", "b", "c", "d"].map(PlayerId::from);
        let split = RankedStarSplit {
            rank: 1,
            team_a: vec![0, 3],
            team_b: vec![1, 2],
            breakdown: StarDistributionBreakdown::PERFECT,
        };
        let entry = SplitEntry::new(&split, &ids);
        assert_eq!(entry.team_a, [PlayerId::from("a"), PlayerId::from("d")]);
        assert_eq!(entry.team_b, [PlayerId::from("b"), PlayerId::from("c")]);

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["team_a"], serde_json::json!(["a", "d"]));
        assert_eq!(json["breakdown"]["score"], serde_json::json!(1.0));
    }
}
