//! Per-player analytics computed once at the start of a run.
//!
//! [`AnalyzedPool::analyze`] derives, for every player, the rating profile, zone-best
//! scores, composite scores and star status. The results are never mutated afterwards:
//! per-iteration assignment state lives in the optimizer, indexed by player position in
//! the pool.

use fairsplit_core::{
    Attribute, AttributeMap, BalanceConfig, CandidatePlayer, CompositeWeights, Position,
    RatingProfile, StarParams, Zone, ZoneMap,
};
use fairsplit_stats::percentiles::percentile;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "snake_case")]
pub enum StarTier {
    #[display("superstar")]
    Superstar,
    #[display("star")]
    Star,
    #[display("solid")]
    Solid,
    #[display("regular")]
    Regular,
}

/// Weighted attribute composites of one player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Composites {
    pub creativity: f32,
    pub finishing: f32,
    pub stamina: f32,
    pub attack_work_rate: f32,
    pub defense_work_rate: f32,
    /// Sum of every attribute.
    pub all_stats: f32,
}

impl Composites {
    #[must_use]
    pub fn compute(attributes: &AttributeMap<f32>, weights: &CompositeWeights) -> Self {
        Self {
            creativity: weighted_mean(attributes, &weights.creativity),
            finishing: weighted_mean(attributes, &weights.finishing),
            stamina: weighted_mean(attributes, &weights.stamina),
            attack_work_rate: attributes[Attribute::AttackWorkRate],
            defense_work_rate: attributes[Attribute::DefenseWorkRate],
            all_stats: attributes.values().sum(),
        }
    }
}

fn weighted_mean(attributes: &AttributeMap<f32>, coefficients: &AttributeMap<f32>) -> f32 {
    let total = coefficients.values().sum::<f32>();
    if total <= 0.0 {
        return 0.0;
    }
    Attribute::ALL
        .iter()
        .map(|a| attributes[*a] * coefficients[*a])
        .sum::<f32>()
        / total
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAnalytics {
    pub profile: RatingProfile,
    /// Best rating over each zone's positions, regardless of formation.
    pub zone_best: ZoneMap<f32>,
    pub composites: Composites,
    pub is_star: bool,
    pub tier: StarTier,
}

/// A validated player pool together with its per-player analytics.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzedPool {
    players: Vec<CandidatePlayer>,
    analytics: Vec<PlayerAnalytics>,
    star_threshold: f32,
    max_best_score: f32,
}

impl AnalyzedPool {
    #[must_use]
    pub fn analyze(players: Vec<CandidatePlayer>, config: &BalanceConfig) -> Self {
        let profiles = players
            .iter()
            .map(|p| RatingProfile::from_ratings(&p.ratings))
            .collect::<Vec<_>>();
        let best_scores = profiles.iter().map(|p| p.best_score).collect::<Vec<_>>();
        let star_threshold = star_threshold(&best_scores, &config.stars);
        let max_best_score = best_scores.iter().copied().fold(0.0, f32::max);

        let analytics = players
            .iter()
            .zip(profiles)
            .map(|(player, profile)| {
                let zone_best = ZoneMap::from_fn(|zone| {
                    Position::in_zone(zone)
                        .map(|p| player.rating(p))
                        .fold(0.0, f32::max)
                });
                let is_star = profile.best_score >= star_threshold;
                let tier = tier(profile.best_score, is_star, &config.stars);
                PlayerAnalytics {
                    profile,
                    zone_best,
                    composites: Composites::compute(&player.attributes, &config.composites),
                    is_star,
                    tier,
                }
            })
            .collect();

        Self {
            players,
            analytics,
            star_threshold,
            max_best_score,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    #[must_use]
    pub fn player(&self, index: usize) -> &CandidatePlayer {
        &self.players[index]
    }

    #[must_use]
    pub fn analytics(&self, index: usize) -> &PlayerAnalytics {
        &self.analytics[index]
    }

    #[must_use]
    pub fn players(&self) -> &[CandidatePlayer] {
        &self.players
    }

    /// Pool indices of star players, in pool order.
    #[must_use]
    pub fn star_indices(&self) -> Vec<usize> {
        self.analytics
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_star)
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn star_threshold(&self) -> f32 {
        self.star_threshold
    }

    /// Highest best score in the pool.
    #[must_use]
    pub fn max_best_score(&self) -> f32 {
        self.max_best_score
    }

    /// Number of players whose best position falls in `zone`.
    #[must_use]
    pub fn preferred_zone_count(&self, zone: Zone) -> usize {
        self.analytics
            .iter()
            .filter(|a| a.profile.best_position.zone() == zone)
            .count()
    }
}

fn star_threshold(best_scores: &[f32], params: &StarParams) -> f32 {
    if params.use_quartile {
        percentile(best_scores, params.quartile)
            .map_or(params.absolute_min, |q| q.max(params.absolute_min))
    } else {
        params.absolute_min
    }
}

fn tier(best_score: f32, is_star: bool, params: &StarParams) -> StarTier {
    if is_star && best_score >= params.superstar_min {
        StarTier::Superstar
    } else if is_star {
        StarTier::Star
    } else if best_score >= params.solid_min {
        StarTier::Solid
    } else {
        StarTier::Regular
    }
}

#[cfg(test)]
mod tests {
    use fairsplit_core::PositionMap;

    use super::*;

    fn player(id: &str, entries: &[(Position, f32)]) -> CandidatePlayer {
        let mut ratings = PositionMap::default();
        for (p, r) in entries {
            ratings[*p] = *r;
        }
        CandidatePlayer::new(id, id, ratings)
    }

    fn pool() -> Vec<CandidatePlayer> {
        vec![
            player("a", &[(Position::St, 93.0), (Position::W, 85.0)]),
            player("b", &[(Position::Cb, 88.0), (Position::Fb, 80.0)]),
            player("c", &[(Position::Cm, 82.0), (Position::Dm, 79.0)]),
            player("d", &[(Position::Gk, 70.0), (Position::Cb, 55.0)]),
        ]
    }

    #[test]
    fn test_star_detection_and_tiers() {
        let pool = AnalyzedPool::analyze(pool(), &BalanceConfig::default());
        assert_eq!(pool.star_indices(), vec![0, 1]);
        assert_eq!(pool.analytics(0).tier, StarTier::Superstar);
        assert_eq!(pool.analytics(1).tier, StarTier::Star);
        assert_eq!(pool.analytics(2).tier, StarTier::Solid);
        assert_eq!(pool.analytics(3).tier, StarTier::Regular);
        assert_eq!(pool.max_best_score(), 93.0);
    }

    #[test]
    fn test_quartile_threshold_raises_bar() {
        let mut config = BalanceConfig::default();
        config.stars.use_quartile = true;
        config.stars.absolute_min = 60.0;
        config.stars.solid_min = 50.0;
        let pool = AnalyzedPool::analyze(pool(), &config);
        assert_eq!(pool.star_threshold(), 93.0);
        assert_eq!(pool.star_indices(), vec![0]);
    }

    #[test]
    fn test_zone_best() {
        let pool = AnalyzedPool::analyze(pool(), &BalanceConfig::default());
        let zone_best = pool.analytics(2).zone_best;
        assert_eq!(zone_best[Zone::Midfield], 82.0);
        assert_eq!(zone_best[Zone::Attack], 0.0);
        assert_eq!(pool.preferred_zone_count(Zone::Defense), 1);
    }

    #[test]
    fn test_composites_are_normalized_weighted_sums() {
        let mut attributes = AttributeMap::default();
        attributes[Attribute::Vision] = 80.0;
        attributes[Attribute::Passing] = 60.0;
        attributes[Attribute::Dribbling] = 40.0;
        attributes[Attribute::AttackWorkRate] = 75.0;
        let composites = Composites::compute(&attributes, &CompositeWeights::default());
        assert!((composites.creativity - (0.4 * 80.0 + 0.35 * 60.0 + 0.25 * 40.0)).abs() < 1e-4);
        assert_eq!(composites.attack_work_rate, 75.0);
        assert_eq!(composites.all_stats, 255.0);
        assert_eq!(composites.finishing, 0.0);
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let config = BalanceConfig::default();
        let first = AnalyzedPool::analyze(pool(), &config);
        let second = AnalyzedPool::analyze(first.players().to_vec(), &config);
        assert_eq!(first, second);
    }
}
