//! Star-split optimizer: ranks every way of dividing the pool's stars between the teams.
//!
//! Runs once per balancing run, before the Monte Carlo loop:
//!
//! 1. Classify each star against the positions available in the run's formations
//! 2. With one star or none there is nothing to balance: a single perfect split
//! 3. Otherwise enumerate every choice of `floor(n/2)` stars for team A with
//!    [`Combinations`], or draw `sample_count` random choices when there are more than
//!    `max_enumerated_splits`
//! 4. Score each split with the star distribution penalty and rank best to worst
//! 5. Summarize the pool (rating variance, specialist entropy, best-to-mean ratio) into
//!    the strictness the driver shapes realized splits with
//!
//! The ranking is never mutated afterwards; the driver samples target splits from it
//! through a [`SplitSampler`].

use std::collections::BTreeSet;

use fairsplit_core::{PositionSet, Side, StarParams, StarSplitParams};
use fairsplit_evaluator::{
    player_analytics::AnalyzedPool,
    star_distribution::{StarDistributionBreakdown, StarGroup, star_distribution_penalty},
    zone_classifier::{SpecialistKind, StarClassification, classify},
};
use fairsplit_stats::{descriptive::DescriptiveStats, entropy::normalized_entropy};
use rand::{Rng, distr::Distribution as _};
use rand_distr::weighted::WeightedAliasIndex;
use serde::Serialize;

/// `C(n, k)`, saturating at `u64::MAX`.
#[must_use]
pub fn binomial(n: u64, k: u64) -> u64 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u64 = 1;
    for i in 0..k {
        // exact at every step: result * (n - i) is divisible by (i + 1)
        result = match result.checked_mul(n - i) {
            Some(v) => v / (i + 1),
            None => return u64::MAX,
        };
    }
    result
}

/// Iterates over every `k`-element subset of `0..n` in lexicographic order.
///
/// ```
/// use fairsplit_optimizer::star_split::Combinations;
///
/// let all = Combinations::new(4, 2).collect::<Vec<_>>();
/// assert_eq!(all.len(), 6);
/// assert_eq!(all[0], vec![0, 1]);
/// assert_eq!(all[5], vec![2, 3]);
/// ```
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    done: bool,
}

impl Combinations {
    #[must_use]
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            done: k > n,
        }
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.indices.clone();

        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }
        Some(current)
    }
}

/// One way to divide the stars, with its penalty breakdown.
///
/// `team_a`/`team_b` hold pool indices; `rank` 1 is the best split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedStarSplit {
    pub rank: usize,
    pub team_a: Vec<usize>,
    pub team_b: Vec<usize>,
    pub breakdown: StarDistributionBreakdown,
}

impl RankedStarSplit {
    #[must_use]
    pub fn quality(&self) -> f32 {
        self.breakdown.score
    }

    /// Side each star is placed on, indexed by pool index.
    #[must_use]
    pub fn target_sides(&self, pool_len: usize) -> Vec<Option<Side>> {
        let mut sides = vec![None; pool_len];
        for (members, side) in [(&self.team_a, Side::A), (&self.team_b, Side::B)] {
            for i in members {
                sides[*i] = Some(side);
            }
        }
        sides
    }
}

/// Pool-level summary of the split ranking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarSplitStats {
    pub star_count: usize,
    pub best: f32,
    pub worst: f32,
    pub mean: f32,
    /// Variance of the stars' best scores.
    pub rating_variance: f32,
    /// Normalized entropy of the specialist-type histogram.
    pub specialist_entropy: f32,
    /// `best / mean`; how much better the best split is than a typical one.
    pub differentiation: f32,
    pub penalty_exponent: f32,
    pub sampling_concentration: f32,
    pub evaluated: usize,
    pub exhaustive: bool,
}

impl StarSplitStats {
    fn degenerate(star_count: usize, params: &StarSplitParams) -> Self {
        Self {
            star_count,
            best: 1.0,
            worst: 1.0,
            mean: 1.0,
            rating_variance: 0.0,
            specialist_entropy: 0.0,
            differentiation: 1.0,
            penalty_exponent: params.base_exponent.clamp(1.0, 8.0),
            sampling_concentration: params.base_concentration.clamp(0.5, 12.0),
            evaluated: usize::from(star_count == 1),
            exhaustive: true,
        }
    }

    /// Fewer than two stars: every split is trivially perfect.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.star_count < 2
    }
}

/// Exponent the driver shapes realized star quality with.
///
/// Grows with `best / mean`, and grows further when the stars' ratings are close
/// together: near-equal stars make a mirrored split achievable, so deviations from it
/// are punished harder.
#[must_use]
pub fn penalty_exponent(
    differentiation: f32,
    rating_variance: f32,
    params: &StarSplitParams,
) -> f32 {
    let spread = (rating_variance / params.variance_reference).clamp(0.0, 1.0);
    let uniformity = 1.0 + params.variance_strictness * (1.0 - spread);
    (params.base_exponent * differentiation * uniformity).clamp(1.0, 8.0)
}

#[derive(Debug, Clone)]
pub struct StarSplitRanking {
    /// Pool indices of the stars.
    pub star_indices: Vec<usize>,
    /// Classification of each star, parallel to `star_indices`.
    pub classifications: Vec<StarClassification>,
    /// Best first, at most `max_ranked_splits` entries.
    pub splits: Vec<RankedStarSplit>,
    pub stats: StarSplitStats,
}

impl StarSplitRanking {
    /// Ranks the star splits of `pool`, classifying stars against `available` positions.
    pub fn compute<R>(
        pool: &AnalyzedPool,
        available: &PositionSet,
        star_params: &StarParams,
        params: &StarSplitParams,
        rng: &mut R,
    ) -> Self
    where
        R: Rng + ?Sized,
    {
        let star_indices = pool.star_indices();
        let classifications = star_indices
            .iter()
            .map(|i| classify(&pool.player(*i).ratings, available, star_params))
            .collect::<Vec<_>>();
        let n = star_indices.len();

        if n < 2 {
            let splits = (n == 1)
                .then(|| RankedStarSplit {
                    rank: 1,
                    team_a: vec![],
                    team_b: star_indices.clone(),
                    breakdown: StarDistributionBreakdown::PERFECT,
                })
                .into_iter()
                .collect();
            return Self {
                star_indices,
                classifications,
                splits,
                stats: StarSplitStats::degenerate(n, params),
            };
        }

        let k = n / 2;
        let total = binomial(n as u64, k as u64);
        let exhaustive = total <= params.max_enumerated_splits;
        let choices: Vec<Vec<usize>> = if exhaustive {
            Combinations::new(n, k).collect()
        } else {
            let mut seen = BTreeSet::new();
            for _ in 0..params.sample_count {
                let mut choice = rand::seq::index::sample(rng, n, k).into_vec();
                choice.sort_unstable();
                seen.insert(choice);
            }
            seen.into_iter().collect()
        };

        let mut evaluated = choices
            .into_iter()
            .map(|team_a| {
                let team_b = (0..n).filter(|i| !team_a.contains(i)).collect::<Vec<_>>();
                let breakdown = star_distribution_penalty(
                    StarGroup::new(&classifications, &team_a),
                    StarGroup::new(&classifications, &team_b),
                    params,
                );
                (team_a, team_b, breakdown)
            })
            .collect::<Vec<_>>();

        let scores = DescriptiveStats::new(evaluated.iter().map(|(_, _, b)| b.score));
        let (best, worst, mean) = scores.map_or((1.0, 1.0, 1.0), |s| (s.max, s.min, s.mean));
        let evaluated_count = evaluated.len();

        evaluated.sort_by(|x, y| y.2.score.total_cmp(&x.2.score).then_with(|| x.0.cmp(&y.0)));
        evaluated.truncate(params.max_ranked_splits);
        let to_pool = |members: &[usize]| -> Vec<usize> {
            members.iter().map(|i| star_indices[*i]).collect()
        };
        let splits = evaluated
            .iter()
            .enumerate()
            .map(|(rank, (team_a, team_b, breakdown))| RankedStarSplit {
                rank: rank + 1,
                team_a: to_pool(team_a),
                team_b: to_pool(team_b),
                breakdown: *breakdown,
            })
            .collect();

        let rating_variance =
            DescriptiveStats::new(classifications.iter().map(|c| c.best_score)).map_or(0.0, |s| s.variance);
        let mut kinds = [0_usize; SpecialistKind::LEN];
        for c in &classifications {
            kinds[c.kind.index()] += 1;
        }
        let specialist_entropy = normalized_entropy(&kinds);
        let differentiation = if mean > 0.0 { best / mean } else { 1.0 };

        let stats = StarSplitStats {
            star_count: n,
            best,
            worst,
            mean,
            rating_variance,
            specialist_entropy,
            differentiation,
            penalty_exponent: penalty_exponent(differentiation, rating_variance, params),
            sampling_concentration: (params.base_concentration
                * (1.0 + specialist_entropy)
                * differentiation)
                .clamp(0.5, 12.0),
            evaluated: evaluated_count,
            exhaustive,
        };

        Self {
            star_indices,
            classifications,
            splits,
            stats,
        }
    }

    /// Sampler over the ranked splits, or `None` when there is nothing to guide.
    #[must_use]
    pub fn sampler(&self) -> Option<SplitSampler<'_>> {
        SplitSampler::new(self)
    }
}

/// Draws ranked splits with probability `quality^concentration`, favoring the top ranks.
#[derive(Debug)]
pub struct SplitSampler<'a> {
    splits: &'a [RankedStarSplit],
    index: WeightedAliasIndex<f32>,
}

impl<'a> SplitSampler<'a> {
    fn new(ranking: &'a StarSplitRanking) -> Option<Self> {
        if ranking.stats.is_degenerate() {
            return None;
        }
        let concentration = ranking.stats.sampling_concentration;
        let weights = ranking
            .splits
            .iter()
            .map(|s| s.quality().max(f32::MIN_POSITIVE).powf(concentration))
            .collect::<Vec<_>>();
        let index = WeightedAliasIndex::new(weights).ok()?;
        Some(Self {
            splits: &ranking.splits,
            index,
        })
    }

    pub fn sample<R>(&self, rng: &mut R) -> &'a RankedStarSplit
    where
        R: Rng + ?Sized,
    {
        &self.splits[self.index.sample(rng)]
    }
}

#[cfg(test)]
mod tests {
    use fairsplit_core::{BalanceConfig, CandidatePlayer, Position};
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::test_util::player;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 2), 6);
        assert_eq!(binomial(10, 5), 252);
        assert_eq!(binomial(5, 0), 1);
        assert_eq!(binomial(3, 4), 0);
        assert_eq!(binomial(200, 100), u64::MAX);
    }

    #[test]
    fn test_combinations_are_complete() {
        for (n, k) in [(4, 2), (5, 2), (7, 3), (8, 4)] {
            let all = Combinations::new(n, k).collect::<Vec<_>>();
            assert_eq!(all.len() as u64, binomial(n as u64, k as u64));
            let unique = all.iter().collect::<BTreeSet<_>>();
            assert_eq!(unique.len(), all.len());
            for index in 0..n {
                let containing = all.iter().filter(|c| c.contains(&index)).count();
                assert_eq!(containing as u64, binomial(n as u64 - 1, k as u64 - 1));
            }
        }
    }

    #[test]
    fn test_combinations_edge_cases() {
        assert_eq!(Combinations::new(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Combinations::new(2, 3).count(), 0);
        assert_eq!(Combinations::new(3, 3).count(), 1);
    }

    fn ranking(players: Vec<CandidatePlayer>, config: &BalanceConfig) -> StarSplitRanking {
        let pool = AnalyzedPool::analyze(players, config);
        let mut rng = Pcg32::seed_from_u64(3);
        StarSplitRanking::compute(
            &pool,
            &PositionSet::from_fn(|_| true),
            &config.stars,
            &config.star_split,
            &mut rng,
        )
    }

    fn four_star_pool() -> Vec<CandidatePlayer> {
        vec![
            player("d1", &[(Position::Cb, 91.0), (Position::Cm, 75.0)]),
            player("d2", &[(Position::Cb, 90.0), (Position::Cm, 74.0)]),
            player("a1", &[(Position::St, 92.0), (Position::Cm, 76.0)]),
            player("a2", &[(Position::St, 90.0), (Position::Cm, 77.0)]),
            player("r1", &[(Position::Cm, 70.0)]),
        ]
    }

    #[test]
    fn test_ranking_prefers_mirrored_split() {
        let ranking = ranking(four_star_pool(), &BalanceConfig::default());
        assert_eq!(ranking.star_indices, vec![0, 1, 2, 3]);
        assert_eq!(ranking.stats.evaluated, 6);
        assert!(ranking.stats.exhaustive);

        let best = &ranking.splits[0];
        assert_eq!(best.rank, 1);
        let defenders_on_a = best.team_a.iter().filter(|i| **i < 2).count();
        assert_eq!(defenders_on_a, 1, "{best:?}");
        assert!(ranking.stats.best >= ranking.stats.mean);
        assert!(ranking.stats.mean >= ranking.stats.worst);
        assert!(ranking.stats.penalty_exponent >= 2.0);
    }

    #[test]
    fn test_sampling_mode_when_over_limit() {
        let mut config = BalanceConfig::default();
        config.star_split.max_enumerated_splits = 2;
        config.star_split.sample_count = 50;
        let ranking = ranking(four_star_pool(), &config);
        assert!(!ranking.stats.exhaustive);
        assert!(ranking.stats.evaluated <= 6);
        assert!(ranking.splits.iter().all(|s| s.team_a.len() == 2));
    }

    #[test]
    fn test_degenerate_pool() {
        let players = vec![
            player("s", &[(Position::St, 95.0)]),
            player("r", &[(Position::Cm, 70.0)]),
        ];
        let ranking = ranking(players, &BalanceConfig::default());
        assert!(ranking.stats.is_degenerate());
        assert_eq!(ranking.splits.len(), 1);
        assert_eq!(ranking.stats.best, 1.0);
        assert!(ranking.sampler().is_none());
    }

    #[test]
    fn test_sampler_favors_top_ranks() {
        let ranking = ranking(four_star_pool(), &BalanceConfig::default());
        let sampler = ranking.sampler().unwrap();
        let mut rng = Pcg32::seed_from_u64(5);
        // four mirrored splits rank above the two stacked ones
        let mirrored = (0..500)
            .filter(|_| sampler.sample(&mut rng).rank <= 4)
            .count();
        assert!(mirrored > 450, "{mirrored}");
    }

    #[test]
    fn test_close_star_ratings_raise_strictness() {
        let params = BalanceConfig::default().star_split;
        let close = penalty_exponent(1.2, 1.0, &params);
        let spread = penalty_exponent(1.2, 40.0, &params);
        assert!(close > spread, "{close} <= {spread}");
        assert!((spread - params.base_exponent * 1.2).abs() < 1e-5);
        assert!(penalty_exponent(100.0, 0.0, &params) <= 8.0);

        let ranking = ranking(four_star_pool(), &BalanceConfig::default());
        let stats = ranking.stats;
        assert!(stats.rating_variance > 0.0);
        assert_eq!(
            stats.penalty_exponent,
            penalty_exponent(stats.differentiation, stats.rating_variance, &params)
        );
    }

    #[test]
    fn test_target_sides() {
        let ranking = ranking(four_star_pool(), &BalanceConfig::default());
        let sides = ranking.splits[0].target_sides(5);
        assert_eq!(sides.iter().filter(|s| **s == Some(Side::A)).count(), 2);
        assert_eq!(sides[4], None);
    }
}
