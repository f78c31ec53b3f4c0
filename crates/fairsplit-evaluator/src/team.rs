use fairsplit_core::{Formation, MetricParams, Position, PositionMap, Side, Zone, ZoneMap};
use serde::Serialize;

use crate::player_analytics::AnalyzedPool;

/// One side of an assignment: pool indices per position slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Team {
    pub side: Side,
    pub formation: Formation,
    pub slots: PositionMap<Vec<usize>>,
}

impl Team {
    #[must_use]
    pub fn new(side: Side, formation: Formation) -> Self {
        Self {
            side,
            formation,
            slots: PositionMap::default(),
        }
    }

    /// `(position, pool index)` for every assigned player, in position order.
    pub fn players(&self) -> impl Iterator<Item = (Position, usize)> + '_ {
        self.slots
            .iter()
            .flat_map(|(position, players)| players.iter().map(move |i| (position, *i)))
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn open_slots(&self, position: Position) -> usize {
        self.formation
            .slot_count(position)
            .saturating_sub(self.slots[position].len())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        Position::ALL.iter().all(|p| self.open_slots(*p) == 0)
    }
}

/// Sums over a completed team, computed in one pass.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TeamAggregates {
    pub player_count: usize,
    /// Assigned ratings; goalkeepers count with their best score.
    pub total_score: f32,
    /// Best scores of every player.
    pub total_peak: f32,
    pub zone_scores: ZoneMap<f32>,
    /// Players' best ratings within the zone they were assigned to.
    pub zone_peaks: ZoneMap<f32>,
    pub zone_counts: ZoneMap<usize>,
    pub stamina: f32,
    pub creativity: f32,
    pub finishing: f32,
    pub attack_work_rate: f32,
    pub defense_work_rate: f32,
    pub all_stats: f32,
    /// Outfield players rated at the finishing position within tolerance of their best.
    pub finisher_specialists: usize,
    /// Outfield players rated at least the viable minimum at the finishing position.
    pub viable_finishers: usize,
    /// Players at or above the solid share of the pool's best.
    pub solid_players: usize,
    /// Per-player assigned contribution.
    pub assigned_scores: Vec<f32>,
    /// Per outfield player, best score minus assigned rating.
    pub gaps: Vec<f32>,
}

impl TeamAggregates {
    #[must_use]
    pub fn compute(team: &Team, pool: &AnalyzedPool, params: &MetricParams) -> Self {
        let solid_min = params.solid_balance_floor * pool.max_best_score();
        let mut agg = Self {
            assigned_scores: Vec::with_capacity(team.player_count()),
            ..Self::default()
        };

        for (position, index) in team.players() {
            let player = pool.player(index);
            let analytics = pool.analytics(index);
            let best = analytics.profile.best_score;
            let zone = position.zone();
            let rating = player.rating(position);
            let contribution = if zone == Zone::Goalkeeper { best } else { rating };

            agg.player_count += 1;
            agg.total_score += contribution;
            agg.total_peak += best;
            agg.zone_scores[zone] += contribution;
            agg.zone_peaks[zone] += analytics.zone_best[zone].max(contribution);
            agg.zone_counts[zone] += 1;

            let c = &analytics.composites;
            agg.stamina += c.stamina;
            agg.creativity += c.creativity;
            agg.finishing += c.finishing;
            agg.attack_work_rate += c.attack_work_rate;
            agg.defense_work_rate += c.defense_work_rate;
            agg.all_stats += c.all_stats;

            if best >= solid_min {
                agg.solid_players += 1;
            }
            agg.assigned_scores.push(contribution);

            if zone != Zone::Goalkeeper {
                agg.gaps.push(analytics.profile.gap(rating));
                let finishing_rating = player.rating(Position::FINISHING);
                if finishing_rating >= best - params.finisher_specialist_tolerance {
                    agg.finisher_specialists += 1;
                }
                if finishing_rating >= params.viable_finisher_min {
                    agg.viable_finishers += 1;
                }
            }
        }
        agg
    }

    /// Mean assigned score of a zone, 0 when the zone is empty.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn zone_mean(&self, zone: Zone) -> f32 {
        match self.zone_counts[zone] {
            0 => 0.0,
            n => self.zone_scores[zone] / n as f32,
        }
    }
}

#[cfg(test)]
mod tests {
    use fairsplit_core::{BalanceConfig, CandidatePlayer};

    use super::*;

    fn player(id: &str, entries: &[(Position, f32)]) -> CandidatePlayer {
        let mut ratings = PositionMap::default();
        for (p, r) in entries {
            ratings[*p] = *r;
        }
        CandidatePlayer::new(id, id, ratings)
    }

    fn team_with(assignments: &[(Position, usize)]) -> Team {
        let formation = Formation::new(
            "test",
            &[(Position::Gk, 1), (Position::Cb, 1), (Position::St, 1)],
        );
        let mut team = Team::new(Side::A, formation);
        for (position, index) in assignments {
            team.slots[*position].push(*index);
        }
        team
    }

    #[test]
    fn test_aggregates() {
        let pool = AnalyzedPool::analyze(
            vec![
                player("keeper", &[(Position::Cb, 60.0), (Position::Gk, 20.0)]),
                player("back", &[(Position::Cb, 80.0)]),
                player("nine", &[(Position::St, 90.0), (Position::Cm, 70.0)]),
            ],
            &BalanceConfig::default(),
        );
        let team = team_with(&[(Position::Gk, 0), (Position::Cb, 1), (Position::St, 2)]);
        assert!(team.is_complete());

        let agg = TeamAggregates::compute(&team, &pool, &MetricParams::default());
        assert_eq!(agg.player_count, 3);
        assert_eq!(agg.zone_scores[Zone::Goalkeeper], 60.0);
        assert_eq!(agg.total_score, 230.0);
        assert_eq!(agg.total_peak, 230.0);
        assert_eq!(agg.gaps, vec![0.0, 0.0]);
        assert_eq!(agg.finisher_specialists, 1);
        assert_eq!(agg.viable_finishers, 1);
        assert_eq!(agg.solid_players, 2);
        assert_eq!(agg.zone_mean(Zone::Midfield), 0.0);
    }

    #[test]
    fn test_gap_for_out_of_position_player() {
        let pool = AnalyzedPool::analyze(
            vec![player("nine", &[(Position::St, 90.0), (Position::Cb, 65.0)])],
            &BalanceConfig::default(),
        );
        let team = team_with(&[(Position::Cb, 0)]);
        assert!(!team.is_complete());
        assert_eq!(team.open_slots(Position::Gk), 1);
        let agg = TeamAggregates::compute(&team, &pool, &MetricParams::default());
        assert_eq!(agg.gaps, vec![25.0]);
        assert_eq!(agg.zone_peaks[Zone::Defense], 65.0);
    }
}
