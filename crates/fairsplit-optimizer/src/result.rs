//! Externally facing result of a balancing run.

use fairsplit_core::{
    BalanceSeed, Formation, PitchPoint, PlayerId, Position, Side, position_coordinates,
};
use fairsplit_evaluator::{
    balance_metrics::BalanceMetrics,
    player_analytics::{AnalyzedPool, StarTier},
    star_distribution::StarDistributionBreakdown,
    team::Team,
};
use serde::Serialize;

use crate::star_split::StarSplitStats;

/// A player placed in a slot, with everything a lineup view needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub position: Position,
    /// Rating at the assigned position.
    pub rating: f32,
    pub best_position: Position,
    pub best_score: f32,
    pub is_star: bool,
    pub tier: StarTier,
    pub coordinates: PitchPoint,
}

/// Totals of one side of the result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamSummary {
    pub side: Side,
    pub player_count: usize,
    /// Sum of assigned ratings.
    pub total_rating: f32,
    pub star_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub iterations: usize,
    /// Iterations that produced a complete assignment.
    pub successful_iterations: usize,
    /// Iteration (0-based) that produced the winning assignment.
    pub best_iteration: usize,
    pub refinement_swaps: usize,
    pub seed: BalanceSeed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BalanceResult {
    pub team_a: Vec<PositionedPlayer>,
    pub team_b: Vec<PositionedPlayer>,
    pub formation_a: Formation,
    pub formation_b: Formation,
    pub summary_a: TeamSummary,
    pub summary_b: TeamSummary,
    pub metrics: BalanceMetrics,
    pub star_distribution: StarDistributionBreakdown,
    pub star_multiplier: f32,
    /// Weighted metric score times the star multiplier.
    pub score: f32,
    pub star_split_stats: StarSplitStats,
    pub stats: RunStats,
    pub diagnostic_text: String,
}

impl BalanceResult {
    #[must_use]
    pub fn team(&self, side: Side) -> &[PositionedPlayer] {
        match side {
            Side::A => &self.team_a,
            Side::B => &self.team_b,
        }
    }

    #[must_use]
    pub fn summary(&self, side: Side) -> &TeamSummary {
        match side {
            Side::A => &self.summary_a,
            Side::B => &self.summary_b,
        }
    }
}

/// Converts a team's slots into a lineup, strongest first within each position.
pub(crate) fn positioned_players(team: &Team, pool: &AnalyzedPool) -> Vec<PositionedPlayer> {
    let mut players = Vec::with_capacity(team.player_count());
    for (position, group) in team.slots.iter() {
        let mut group = group.clone();
        group.sort_by(|x, y| {
            let rx = pool.player(*x).rating(position);
            let ry = pool.player(*y).rating(position);
            ry.total_cmp(&rx).then_with(|| x.cmp(y))
        });
        for (slot, index) in group.iter().enumerate() {
            let player = pool.player(*index);
            let analytics = pool.analytics(*index);
            players.push(PositionedPlayer {
                id: player.id.clone(),
                name: player.name.clone(),
                position,
                rating: player.rating(position),
                best_position: analytics.profile.best_position,
                best_score: analytics.profile.best_score,
                is_star: analytics.is_star,
                tier: analytics.tier,
                coordinates: position_coordinates(
                    position,
                    slot,
                    group.len(),
                    Some(&team.formation),
                ),
            });
        }
    }
    players
}

pub(crate) fn summarize(side: Side, players: &[PositionedPlayer]) -> TeamSummary {
    TeamSummary {
        side,
        player_count: players.len(),
        total_rating: players.iter().map(|p| p.rating).sum(),
        star_count: players.iter().filter(|p| p.is_star).count(),
    }
}

#[cfg(test)]
mod tests {
    use fairsplit_core::BalanceConfig;

    use super::*;
    use crate::test_util::player;

    #[test]
    fn test_positioned_players_sorted_within_position() {
        let players = vec![
            player("gk", &[(Position::Gk, 60.0)]),
            player("cb1", &[(Position::Cb, 70.0)]),
            player("cb2", &[(Position::Cb, 90.0)]),
        ];
        let pool = AnalyzedPool::analyze(players, &BalanceConfig::default());
        let formation = Formation::new("1-2", &[(Position::Gk, 1), (Position::Cb, 2)]);
        let mut team = Team::new(Side::A, formation);
        team.slots[Position::Gk].push(0);
        team.slots[Position::Cb].extend([1, 2]);

        let lineup = positioned_players(&team, &pool);
        let ids = lineup.iter().map(|p| p.id.as_str()).collect::<Vec<_>>();
        assert_eq!(ids, ["gk", "cb2", "cb1"]);
        assert!(lineup[1].is_star);
        assert!(lineup[1].coordinates.x < lineup[2].coordinates.x);

        let summary = summarize(Side::A, &lineup);
        assert_eq!(summary.player_count, 3);
        assert_eq!(summary.star_count, 1);
        assert!((summary.total_rating - 220.0).abs() < 1e-3);
    }
}
