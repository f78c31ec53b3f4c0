//! Guided Monte Carlo driver: the top-level balancing entry point.
//!
//! A run proceeds as follows:
//!
//! 1. Validate the pool and look up formations for both team sizes
//! 2. Analyze every player once ([`AnalyzedPool`])
//! 3. Rank the star splits once ([`StarSplitRanking`]) and derive its strictness
//! 4. For up to `max_iterations`:
//!    - draw formations (the same one for both teams when sizes match)
//!    - optionally sample a target star split as a soft guidance signal
//!    - assign both teams, skipping the iteration on failure
//!    - score the assignment: weighted metric score times the star multiplier
//!    - keep it when it beats the best so far
//! 5. Optionally hill-climb the winner with cross-team swaps
//! 6. Convert the winner into lineups with pitch coordinates
//!
//! # Star multiplier
//!
//! The realized star penalty `p` is shaped against the best, mean and worst split
//! quality of the ranking so that only near-best splits keep most of their score:
//! `p ≥ best` maps to 1, `p = mean` to a small breakpoint, and anything in between
//! follows the ranking's penalty exponent. Any split where the star counts differ by
//! more than one is worth nothing.

use std::collections::HashSet;

use fairsplit_core::{
    BalanceConfig, BalanceError, BalanceRng, BalanceSeed, CandidatePlayer, Formation,
    FormationCatalog, PositionSet, Side, team_sizes,
};
use fairsplit_evaluator::{
    balance_metrics::BalanceMetrics,
    player_analytics::AnalyzedPool,
    star_distribution::{StarDistributionBreakdown, StarGroup, star_distribution_penalty},
    team::TeamAggregates,
};
use log::{debug, info, trace, warn};
use rand::Rng as _;

use crate::{
    assignment::{TeamPair, assign_teams},
    refinement::refine,
    report::format_diagnostics,
    result::{BalanceResult, RunStats, positioned_players, summarize},
    star_split::{StarSplitRanking, StarSplitStats},
};

/// Shapes a realized star-split quality against the ranking's best/mean/worst.
///
/// `breakpoint` is the value returned at the mean quality.
#[must_use]
pub fn shape_star_quality(quality: f32, stats: &StarSplitStats, breakpoint: f32) -> f32 {
    let (best, mean, worst) = (stats.best, stats.mean, stats.worst);
    let exponent = stats.penalty_exponent;
    if quality >= best {
        return 1.0;
    }
    if quality >= mean {
        let t = if best > mean {
            (quality - mean) / (best - mean)
        } else {
            1.0
        };
        breakpoint + (1.0 - breakpoint) * t.clamp(0.0, 1.0).powf(exponent)
    } else {
        let t = if mean > worst {
            (quality - worst) / (mean - worst)
        } else {
            0.0
        };
        breakpoint * t.clamp(0.0, 1.0).powf(exponent)
    }
}

/// Multiplier applied to the weighted metric score for a realized star split.
#[must_use]
pub fn star_multiplier(
    quality: f32,
    star_counts: [usize; 2],
    stats: &StarSplitStats,
    config: &BalanceConfig,
) -> f32 {
    if star_counts[0].abs_diff(star_counts[1]) > 1 {
        return 0.0;
    }
    if stats.is_degenerate() {
        return 1.0;
    }
    let shaped = shape_star_quality(quality, stats, config.star_split.mean_breakpoint);
    let influence = config.weights.star_distribution_influence;
    (1.0 - influence * (1.0 - shaped)).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
struct Evaluation {
    metrics: BalanceMetrics,
    star_distribution: StarDistributionBreakdown,
    star_multiplier: f32,
    score: f32,
}

#[derive(Debug)]
struct Best {
    pair: TeamPair,
    evaluation: Evaluation,
    iteration: usize,
}

/// Validated pool plus the formations it can be played in.
#[derive(Debug)]
struct Prepared<'a> {
    pool: AnalyzedPool,
    /// Candidate formations for team A and team B.
    formations: [Vec<&'a Formation>; 2],
    /// Union of positions over every candidate formation.
    available: PositionSet,
}

/// Scores assignments for one run.
///
/// Realized star splits are classified against the same positions as the ranking, so
/// their quality lands on the ranking's best/mean/worst scale.
struct Evaluator<'a> {
    pool: &'a AnalyzedPool,
    config: &'a BalanceConfig,
    ranking: &'a StarSplitRanking,
}

impl Evaluator<'_> {
    fn evaluate(&self, pair: &TeamPair) -> Evaluation {
        let a = TeamAggregates::compute(&pair.a, self.pool, &self.config.metrics);
        let b = TeamAggregates::compute(&pair.b, self.pool, &self.config.metrics);
        let metrics = BalanceMetrics::compute(&a, &b, self.config);

        let members = Side::ALL.map(|side| {
            self.ranking
                .star_indices
                .iter()
                .enumerate()
                .filter(|(_, index)| pair.state.side(**index) == Some(side))
                .map(|(j, _)| j)
                .collect::<Vec<_>>()
        });
        let stars = &self.ranking.classifications;
        let star_distribution = star_distribution_penalty(
            StarGroup::new(stars, &members[0]),
            StarGroup::new(stars, &members[1]),
            &self.config.star_split,
        );
        let star_multiplier = star_multiplier(
            star_distribution.score,
            members.each_ref().map(Vec::len),
            &self.ranking.stats,
            self.config,
        );

        Evaluation {
            score: metrics.weighted_score * star_multiplier,
            metrics,
            star_distribution,
            star_multiplier,
        }
    }
}

/// Splits player pools into two balanced teams.
///
/// Holds a validated configuration and the formation catalog; each call to
/// [`TeamBalancer::balance`] is an independent run.
#[derive(Debug, Clone)]
pub struct TeamBalancer {
    config: BalanceConfig,
    catalog: FormationCatalog,
}

impl TeamBalancer {
    /// Validates `config` and uses the built-in formation catalog.
    pub fn new(config: BalanceConfig) -> Result<Self, BalanceError> {
        config.validate()?;
        Ok(Self {
            config,
            catalog: FormationCatalog::builtin(),
        })
    }

    #[must_use]
    pub fn with_catalog(self, catalog: FormationCatalog) -> Self {
        Self { catalog, ..self }
    }

    #[must_use]
    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &FormationCatalog {
        &self.catalog
    }

    /// Balances `players` with a fresh random seed, recorded in the result.
    pub fn balance(&self, players: Vec<CandidatePlayer>) -> Result<BalanceResult, BalanceError> {
        let (rng, seed) = BalanceRng::random();
        self.run(players, seed, rng)
    }

    /// Balances `players` reproducibly from `seed`.
    pub fn balance_with_seed(
        &self,
        players: Vec<CandidatePlayer>,
        seed: BalanceSeed,
    ) -> Result<BalanceResult, BalanceError> {
        self.run(players, seed, BalanceRng::from_seed(seed))
    }

    /// Runs only the star-split ranking step for `players`.
    ///
    /// The seed matters only when the pool has too many stars to enumerate every split.
    pub fn rank_star_splits(
        &self,
        players: Vec<CandidatePlayer>,
        seed: Option<BalanceSeed>,
    ) -> Result<StarSplitRanking, BalanceError> {
        let prepared = self.prepare(players)?;
        let mut rng = seed.map_or_else(|| BalanceRng::random().0, BalanceRng::from_seed);
        Ok(StarSplitRanking::compute(
            &prepared.pool,
            &prepared.available,
            &self.config.stars,
            &self.config.star_split,
            &mut rng.sampling,
        ))
    }

    fn prepare(&self, players: Vec<CandidatePlayer>) -> Result<Prepared<'_>, BalanceError> {
        let limits = &self.config.limits;
        let count = players.len();
        if !(limits.min_players..=limits.max_players).contains(&count) {
            return Err(BalanceError::PlayerCountOutOfRange {
                count,
                min: limits.min_players,
                max: limits.max_players,
            });
        }
        let mut seen = HashSet::with_capacity(count);
        for player in &players {
            player.validate()?;
            if !seen.insert(&player.id) {
                return Err(BalanceError::DuplicatePlayer {
                    player_id: player.id.clone(),
                });
            }
        }

        let (size_a, size_b) = team_sizes(count);
        let formations_for = |team_size| {
            let formations = self.catalog.for_team_size(team_size);
            if formations.is_empty() {
                Err(BalanceError::NoFormation { team_size })
            } else {
                Ok(formations)
            }
        };
        let formations = [formations_for(size_a)?, formations_for(size_b)?];
        let available = formations
            .iter()
            .flatten()
            .fold(PositionSet::default(), |set, f| {
                set.union(&f.available_positions())
            });

        Ok(Prepared {
            pool: AnalyzedPool::analyze(players, &self.config),
            formations,
            available,
        })
    }

    fn run(
        &self,
        players: Vec<CandidatePlayer>,
        seed: BalanceSeed,
        mut rng: BalanceRng,
    ) -> Result<BalanceResult, BalanceError> {
        let config = &self.config;
        let prepared = self.prepare(players)?;
        let pool = &prepared.pool;
        let [formations_a, formations_b] = &prepared.formations;
        let same_size = formations_a[0].team_size() == formations_b[0].team_size();

        let ranking = StarSplitRanking::compute(
            pool,
            &prepared.available,
            &config.stars,
            &config.star_split,
            &mut rng.sampling,
        );
        info!(
            "balancing {} players ({} stars, {} splits ranked, seed {seed})",
            pool.len(),
            ranking.stats.star_count,
            ranking.splits.len(),
        );

        let sampler = if config.monte_carlo.split_guidance {
            ranking.sampler()
        } else {
            None
        };
        let evaluator = Evaluator {
            pool,
            config,
            ranking: &ranking,
        };

        let iterations = config.monte_carlo.max_iterations;
        let mut successful = 0;
        let mut best: Option<Best> = None;
        for iteration in 0..iterations {
            let fa = rng.sampling.random_range(0..formations_a.len());
            let fb = if same_size {
                fa
            } else {
                rng.sampling.random_range(0..formations_b.len())
            };
            let guidance = sampler
                .as_ref()
                .map(|s| s.sample(&mut rng.sampling).target_sides(pool.len()));

            let Some(pair) = assign_teams(
                pool,
                formations_a[fa],
                formations_b[fb],
                &config.algorithm,
                guidance.as_deref(),
                &mut rng,
            ) else {
                trace!("iteration {iteration}: no complete assignment");
                continue;
            };
            successful += 1;

            let evaluation = evaluator.evaluate(&pair);
            if best
                .as_ref()
                .is_none_or(|b| evaluation.score > b.evaluation.score)
            {
                debug!(
                    "iteration {iteration}: score {:.4} (weighted {:.4}, star multiplier {:.3})",
                    evaluation.score, evaluation.metrics.weighted_score, evaluation.star_multiplier,
                );
                best = Some(Best {
                    pair,
                    evaluation,
                    iteration,
                });
            }
        }

        let Some(mut best) = best else {
            warn!("no complete assignment in {iterations} iterations");
            return Err(BalanceError::NoValidAssignment { iterations });
        };

        let mut refinement_swaps = 0;
        if config.monte_carlo.refinement {
            let outcome = refine(
                &mut best.pair,
                best.evaluation.score,
                config.monte_carlo.refinement_rounds,
                |pair| evaluator.evaluate(pair).score,
            );
            if outcome.swaps > 0 {
                best.evaluation = evaluator.evaluate(&best.pair);
            }
            refinement_swaps = outcome.swaps;
        }

        let team_a = positioned_players(&best.pair.a, pool);
        let team_b = positioned_players(&best.pair.b, pool);
        let mut result = BalanceResult {
            summary_a: summarize(Side::A, &team_a),
            summary_b: summarize(Side::B, &team_b),
            team_a,
            team_b,
            formation_a: best.pair.a.formation.clone(),
            formation_b: best.pair.b.formation.clone(),
            metrics: best.evaluation.metrics,
            star_distribution: best.evaluation.star_distribution,
            star_multiplier: best.evaluation.star_multiplier,
            score: best.evaluation.score,
            star_split_stats: ranking.stats,
            stats: RunStats {
                iterations,
                successful_iterations: successful,
                best_iteration: best.iteration,
                refinement_swaps,
                seed,
            },
            diagnostic_text: String::new(),
        };
        result.diagnostic_text = format_diagnostics(&result);

        info!(
            "balanced {} vs {} players: score {:.4} (best at iteration {}, {} refinement swaps)",
            result.summary_a.player_count,
            result.summary_b.player_count,
            result.score,
            best.iteration,
            refinement_swaps,
        );
        Ok(result)
    }
}

/// Balances `players` under `config` with the built-in formation catalog.
pub fn balance(
    players: Vec<CandidatePlayer>,
    config: &BalanceConfig,
) -> Result<BalanceResult, BalanceError> {
    TeamBalancer::new(config.clone())?.balance(players)
}

#[cfg(test)]
mod tests {
    use fairsplit_core::Position;

    use super::*;
    use crate::test_util::{player, squad};

    fn balancer(iterations: usize) -> TeamBalancer {
        let mut config = BalanceConfig::default();
        config.monte_carlo.max_iterations = iterations;
        TeamBalancer::new(config).unwrap()
    }

    fn stats(best: f32, mean: f32, worst: f32) -> StarSplitStats {
        StarSplitStats {
            star_count: 4,
            best,
            worst,
            mean,
            rating_variance: 0.0,
            specialist_entropy: 0.0,
            differentiation: best / mean,
            penalty_exponent: 2.0,
            sampling_concentration: 2.0,
            evaluated: 6,
            exhaustive: true,
        }
    }

    #[test]
    fn test_shape_anchors() {
        let s = stats(0.9, 0.5, 0.1);
        assert!((shape_star_quality(0.95, &s, 0.05) - 1.0).abs() < 1e-6);
        assert!((shape_star_quality(0.9, &s, 0.05) - 1.0).abs() < 1e-6);
        assert!((shape_star_quality(0.5, &s, 0.05) - 0.05).abs() < 1e-6);
        assert!(shape_star_quality(0.1, &s, 0.05).abs() < 1e-6);
        assert!(shape_star_quality(0.0, &s, 0.05).abs() < 1e-6);
        // halfway from mean to best with exponent 2
        assert!((shape_star_quality(0.7, &s, 0.05) - (0.05 + 0.95 * 0.25)).abs() < 1e-5);
    }

    #[test]
    fn test_star_multiplier() {
        let config = BalanceConfig::default();
        let s = stats(0.9, 0.5, 0.1);
        assert!(star_multiplier(0.9, [3, 1], &s, &config).abs() < f32::EPSILON);
        assert!((star_multiplier(0.9, [2, 2], &s, &config) - 1.0).abs() < 1e-6);
        let degenerate = StarSplitStats {
            star_count: 1,
            ..s
        };
        assert!((star_multiplier(0.0, [1, 0], &degenerate, &config) - 1.0).abs() < 1e-6);

        let mut half = config.clone();
        half.weights.star_distribution_influence = 0.5;
        assert!((star_multiplier(0.5, [2, 2], &s, &half) - 0.525).abs() < 1e-5);
    }

    #[test]
    fn test_rejects_out_of_range_counts() {
        let balancer = balancer(10);
        let err = balancer
            .balance_with_seed(squad(0)[..8].to_vec(), BalanceSeed::from_u128(0))
            .unwrap_err();
        assert_eq!(
            err,
            BalanceError::PlayerCountOutOfRange {
                count: 8,
                min: 10,
                max: 26
            }
        );
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut players = squad(0);
        players[5].id = players[4].id.clone();
        let err = balancer(10)
            .balance_with_seed(players, BalanceSeed::from_u128(0))
            .unwrap_err();
        assert!(err.is_duplicate_player());
    }

    #[test]
    fn test_rejects_invalid_rating() {
        let mut players = squad(0);
        players[3].ratings[Position::Cm] = f32::NAN;
        let err = balancer(10)
            .balance_with_seed(players, BalanceSeed::from_u128(0))
            .unwrap_err();
        assert!(err.is_invalid_player());
    }

    #[test]
    fn test_missing_formation() {
        let catalog = FormationCatalog::from_formations(vec![Formation::new(
            "tiny",
            &[(Position::Gk, 1), (Position::Cb, 4)],
        )])
        .unwrap();
        let err = balancer(10)
            .with_catalog(catalog)
            .balance_with_seed(squad(0), BalanceSeed::from_u128(0))
            .unwrap_err();
        assert_eq!(err, BalanceError::NoFormation { team_size: 8 });
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = BalanceConfig::default();
        config.monte_carlo.max_iterations = 0;
        assert!(TeamBalancer::new(config).unwrap_err().is_invalid_config());
    }

    #[test]
    fn test_end_to_end_two_stars() {
        let players = squad(2);
        let result = balancer(400)
            .balance_with_seed(players, BalanceSeed::from_u128(2024))
            .unwrap();

        assert_eq!(result.team_a.len(), 8);
        assert_eq!(result.team_b.len(), 8);
        assert_eq!(result.summary_a.star_count, 1);
        assert_eq!(result.summary_b.star_count, 1);
        assert_eq!(result.formation_a, result.formation_b);
        assert!(result.score > 0.0 && result.score <= 1.0);
        assert!(result.star_multiplier > 0.0);
        assert!((0.0..=1.0).contains(&result.metrics.weighted_score));
        assert_eq!(result.stats.iterations, 400);
        assert!(result.stats.successful_iterations > 0);
        assert!(!result.diagnostic_text.is_empty());

        let mut ids = result
            .team_a
            .iter()
            .chain(&result.team_b)
            .map(|p| p.id.as_str())
            .collect::<Vec<_>>();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 16);

        for team in [&result.team_a, &result.team_b] {
            let keepers = team.iter().filter(|p| p.position == Position::Gk).count();
            assert_eq!(keepers, 1);
        }
    }

    #[test]
    fn test_star_count_sensitivity() {
        let players = squad(4);
        let balancer = balancer(300);
        let balanced = (0..50)
            .filter(|seed| {
                let result = balancer
                    .balance_with_seed(players.clone(), BalanceSeed::from_u128(*seed))
                    .unwrap();
                result.summary_a.star_count.abs_diff(result.summary_b.star_count) <= 1
            })
            .count();
        assert!(balanced >= 48, "{balanced} of 50 runs kept stars even");
    }

    #[test]
    fn test_seeded_runs_reproduce() {
        let balancer = balancer(100);
        let run = || {
            balancer
                .balance_with_seed(squad(3), BalanceSeed::from_u128(77))
                .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_odd_pool_sizes() {
        let mut players = squad(2);
        players.push(player("extra", &[(Position::Cm, 75.0), (Position::Am, 74.0)]));
        let result = balancer(200)
            .balance_with_seed(players, BalanceSeed::from_u128(5))
            .unwrap();
        assert_eq!(result.team_a.len(), 8);
        assert_eq!(result.team_b.len(), 9);
        assert_eq!(result.formation_a.team_size(), 8);
        assert_eq!(result.formation_b.team_size(), 9);
    }

    #[test]
    fn test_rank_star_splits() {
        let ranking = balancer(10).rank_star_splits(squad(4), None).unwrap();
        assert_eq!(ranking.stats.star_count, 4);
        assert_eq!(ranking.splits.len(), 6);
        assert!(ranking.stats.exhaustive);
    }

    #[test]
    fn test_free_balance_fn() {
        let mut config = BalanceConfig::default();
        config.monte_carlo.max_iterations = 50;
        let result = balance(squad(0), &config).unwrap();
        assert_eq!(result.team_a.len() + result.team_b.len(), 16);
    }
}
