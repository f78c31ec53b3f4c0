//! Balance metrics: eight sub-scores comparing two completed teams.
//!
//! Every metric follows the same two-step pipeline:
//!
//! 1. **Raw** - [`BalanceMetric::raw()`] reduces the two teams' aggregates to a ratio or
//!    statistic in \[0.0, 1.0\] (1.0 is perfectly balanced)
//! 2. **Calibrate** - [`calibrated_score`] maps the raw value through the metric's
//!    threshold curve
//!
//! The combined [`BalanceMetrics::weighted_score`] is the weight-normalized sum of the
//! eight calibrated scores. Star distribution is deliberately not part of it: the driver
//! scores the realized star split separately and multiplies it in.
//!
//! | metric | raw value |
//! |---|---|
//! | [`Positional`] | assigned-score balance, gap spread, gap sum and worst gap |
//! | [`Strength`] | total peak potential ratio |
//! | [`Zonal`] | per-zone peak ratios, internal zone balance, clustering penalty |
//! | [`Energy`] | stamina and cancellation-aware work-rate ratios |
//! | [`Creativity`] | creativity composite ratio |
//! | [`Finishing`] | finishing specialists, viable finishers, finishing quality |
//! | [`AllStat`] | summed attribute ratio |
//! | [`TalentDistribution`] | spread of assigned scores, solid players, midfield preference |

use std::fmt;

use fairsplit_core::{BalanceConfig, MetricCurve, MetricParams, MetricThresholds, MetricWeights, Zone};
use fairsplit_stats::descriptive::{DescriptiveStats, std_dev};
use serde::Serialize;

use crate::{
    scoring::{calibrated_score, difference_ratio},
    team::TeamAggregates,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricValue {
    pub raw: f32,
    pub score: f32,
}

pub trait BalanceMetric: fmt::Debug + Send + Sync {
    fn id(&self) -> &'static str;
    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve;
    fn weight(&self, weights: &MetricWeights) -> f32;

    #[must_use]
    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32;

    #[must_use]
    fn compute(&self, a: &TeamAggregates, b: &TeamAggregates, config: &BalanceConfig) -> MetricValue {
        let raw = self.raw(a, b, &config.metrics);
        let curve = self.curve(&config.thresholds);
        let score = calibrated_score(raw, &curve.thresholds(), curve.steepness);
        MetricValue { raw, score }
    }
}

pub const ALL_BALANCE_METRICS: [&dyn BalanceMetric; 8] = [
    &Positional,
    &Strength,
    &Zonal,
    &Energy,
    &Creativity,
    &Finishing,
    &AllStat,
    &TalentDistribution,
];

/// Calibrated balance scores of one assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BalanceMetrics {
    pub positional: f32,
    pub strength: f32,
    pub zonal: f32,
    pub energy: f32,
    pub creativity: f32,
    pub finishing: f32,
    pub all_stat: f32,
    pub talent_distribution: f32,
    pub weighted_score: f32,
}

impl BalanceMetrics {
    #[must_use]
    pub fn compute(a: &TeamAggregates, b: &TeamAggregates, config: &BalanceConfig) -> Self {
        let scores = ALL_BALANCE_METRICS.map(|m| m.compute(a, b, config).score);
        let weights = ALL_BALANCE_METRICS.map(|m| m.weight(&config.weights));
        let weight_sum = weights.iter().sum::<f32>();
        let weighted_score = if weight_sum > 0.0 {
            scores.iter().zip(weights).map(|(s, w)| s * w).sum::<f32>() / weight_sum
        } else {
            0.0
        };
        let [
            positional,
            strength,
            zonal,
            energy,
            creativity,
            finishing,
            all_stat,
            talent_distribution,
        ] = scores;
        Self {
            positional,
            strength,
            zonal,
            energy,
            creativity,
            finishing,
            all_stat,
            talent_distribution,
            weighted_score,
        }
    }

    /// `(id, score)` pairs in metric order.
    #[must_use]
    pub fn named_scores(&self) -> [(&'static str, f32); 8] {
        [
            ("positional", self.positional),
            ("strength", self.strength),
            ("zonal", self.zonal),
            ("energy", self.energy),
            ("creativity", self.creativity),
            ("finishing", self.finishing),
            ("all_stat", self.all_stat),
            ("talent_distribution", self.talent_distribution),
        ]
    }
}

fn efficiency(agg: &TeamAggregates) -> f32 {
    if agg.total_peak > 0.0 {
        agg.total_score / agg.total_peak
    } else {
        1.0
    }
}

/// A team total for both teams, as per-player means when the teams differ in size.
#[expect(clippy::cast_precision_loss)]
fn comparable(
    a: &TeamAggregates,
    b: &TeamAggregates,
    total: impl Fn(&TeamAggregates) -> f32,
) -> (f32, f32) {
    let (x, y) = (total(a), total(b));
    if a.player_count == b.player_count || a.player_count == 0 || b.player_count == 0 {
        (x, y)
    } else {
        (x / a.player_count as f32, y / b.player_count as f32)
    }
}

fn total_ratio(
    a: &TeamAggregates,
    b: &TeamAggregates,
    total: impl Fn(&TeamAggregates) -> f32,
) -> f32 {
    let (x, y) = comparable(a, b, total);
    difference_ratio(x, y)
}

fn variance(values: &[f32]) -> f32 {
    DescriptiveStats::new(values.iter().copied()).map_or(0.0, |s| s.variance)
}

fn falloff(value: f32, scale: f32) -> f32 {
    1.0 - (value / scale).clamp(0.0, 1.0)
}

#[derive(Debug)]
pub struct Positional;

impl BalanceMetric for Positional {
    fn id(&self) -> &'static str {
        "positional"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.positional
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.positional
    }

    #[expect(clippy::cast_precision_loss)]
    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let efficiency = total_ratio(a, b, |t| t.total_score)
            * f32::midpoint(efficiency(a), efficiency(b));

        let gap_variance = falloff(
            (variance(&a.gaps) - variance(&b.gaps)).abs(),
            params.gap_variance_scale,
        );

        let all_gaps = || a.gaps.iter().chain(&b.gaps).copied();
        let gap_count = a.gaps.len() + b.gaps.len();
        let gap_sum = if gap_count == 0 {
            1.0
        } else {
            let progressive = all_gaps()
                .map(|g| g.powf(params.gap_progressive_exponent))
                .sum::<f32>();
            falloff(progressive / gap_count as f32, params.gap_sum_scale)
        };

        let worst_gap = falloff(all_gaps().fold(0.0, f32::max), params.worst_gap_cap);

        let parts = [
            (params.efficiency_weight, efficiency),
            (params.gap_variance_weight, gap_variance),
            (params.gap_sum_weight, gap_sum),
            (params.worst_gap_weight, worst_gap),
        ];
        let total_weight = parts.iter().map(|(w, _)| w).sum::<f32>();
        if total_weight <= 0.0 {
            return efficiency;
        }
        parts.iter().map(|(w, v)| w * v).sum::<f32>() / total_weight
    }
}

#[derive(Debug)]
pub struct Strength;

impl BalanceMetric for Strength {
    fn id(&self) -> &'static str {
        "strength"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.strength
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.strength
    }

    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, _params: &MetricParams) -> f32 {
        total_ratio(a, b, |t| t.total_peak)
    }
}

#[derive(Debug)]
pub struct Zonal;

impl Zonal {
    fn internal_cv(agg: &TeamAggregates) -> f32 {
        let means = Zone::OUTFIELD
            .iter()
            .filter(|z| agg.zone_counts[**z] > 0)
            .map(|z| agg.zone_mean(*z));
        DescriptiveStats::new(means).map_or(0.0, |s| s.coefficient_of_variation())
    }

    /// Penalty when one team is stronger across the pitch rather than zone by zone.
    fn clustering_penalty(a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let mut stronger = [0_usize; 2];
        let mut decisive = [0_usize; 2];
        for zone in Zone::OUTFIELD {
            let (za, zb) = (a.zone_peaks[zone], b.zone_peaks[zone]);
            let max = za.max(zb);
            let rel = if max > 0.0 { (za - zb) / max } else { 0.0 };
            if rel.abs() <= params.neutral_zone_epsilon {
                continue;
            }
            let side = usize::from(rel < 0.0);
            stronger[side] += 1;
            if rel.abs() > params.decisive_zone_margin {
                decisive[side] += 1;
            }
        }
        if stronger.contains(&Zone::OUTFIELD.len()) {
            params.zone_sweep_penalty
        } else if decisive.contains(&0) && decisive.iter().any(|d| *d >= 2) {
            params.zone_two_of_three_penalty
        } else {
            1.0
        }
    }
}

impl BalanceMetric for Zonal {
    fn id(&self) -> &'static str {
        "zonal"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.zonal
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.zonal
    }

    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let cross = Zone::OUTFIELD
            .iter()
            .map(|z| difference_ratio(a.zone_peaks[*z], b.zone_peaks[*z]))
            .product::<f32>();
        let internal = falloff(
            (Self::internal_cv(a) - Self::internal_cv(b)).abs(),
            params.internal_cv_cap,
        );
        let blended = params.zone_cross_weight * cross + (1.0 - params.zone_cross_weight) * internal;
        blended * Self::clustering_penalty(a, b, params)
    }
}

#[derive(Debug)]
pub struct Energy;

impl Energy {
    /// Work-rate balance, crediting teams whose attacking and defensive work-rate
    /// differences point in opposite directions and so cancel out.
    #[must_use]
    pub fn work_rate_balance(a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let (attack_a, attack_b) = comparable(a, b, |t| t.attack_work_rate);
        let (defense_a, defense_b) = comparable(a, b, |t| t.defense_work_rate);
        let raw = f32::midpoint(
            difference_ratio(attack_a, attack_b),
            difference_ratio(defense_a, defense_b),
        );

        if (attack_a - attack_b) * (defense_a - defense_b) >= 0.0 {
            return raw;
        }
        let cancel = difference_ratio(attack_a + defense_a, attack_b + defense_b);
        let w = (params.cancellation_weight * raw).min(1.0 - params.raw_weight_floor);
        w * cancel + (1.0 - w) * raw
    }
}

impl BalanceMetric for Energy {
    fn id(&self) -> &'static str {
        "energy"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.energy
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.energy
    }

    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let stamina = total_ratio(a, b, |t| t.stamina);
        params.stamina_share * stamina
            + (1.0 - params.stamina_share) * Self::work_rate_balance(a, b, params)
    }
}

#[derive(Debug)]
pub struct Creativity;

impl BalanceMetric for Creativity {
    fn id(&self) -> &'static str {
        "creativity"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.creativity
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.creativity
    }

    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, _params: &MetricParams) -> f32 {
        total_ratio(a, b, |t| t.creativity)
    }
}

#[derive(Debug)]
pub struct Finishing;

impl BalanceMetric for Finishing {
    fn id(&self) -> &'static str {
        "finishing"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.finishing
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.finishing
    }

    #[expect(clippy::cast_precision_loss)]
    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let specialists =
            difference_ratio(a.finisher_specialists as f32, b.finisher_specialists as f32);
        let viable = difference_ratio(a.viable_finishers as f32, b.viable_finishers as f32);
        let quality = total_ratio(a, b, |t| t.finishing);
        let total_weight = params.striker_specialist_weight
            + params.striker_viable_weight
            + params.striker_quality_weight;
        if total_weight <= 0.0 {
            return 1.0;
        }
        (params.striker_specialist_weight * specialists
            + params.striker_viable_weight * viable
            + params.striker_quality_weight * quality)
            / total_weight
    }
}

#[derive(Debug)]
pub struct AllStat;

impl BalanceMetric for AllStat {
    fn id(&self) -> &'static str {
        "all_stat"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.all_stat
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.all_stat
    }

    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, _params: &MetricParams) -> f32 {
        total_ratio(a, b, |t| t.all_stats)
    }
}

#[derive(Debug)]
pub struct TalentDistribution;

impl TalentDistribution {
    /// Midfield mean over the stronger of defense and attack, capped at 1.
    ///
    /// A team without midfielders is not penalized.
    #[must_use]
    pub fn midfield_preference(agg: &TeamAggregates) -> f32 {
        if agg.zone_counts[Zone::Midfield] == 0 {
            return 1.0;
        }
        let strongest = agg.zone_mean(Zone::Defense).max(agg.zone_mean(Zone::Attack));
        if strongest <= 0.0 {
            return 1.0;
        }
        (agg.zone_mean(Zone::Midfield) / strongest).min(1.0)
    }
}

impl BalanceMetric for TalentDistribution {
    fn id(&self) -> &'static str {
        "talent_distribution"
    }

    fn curve(&self, thresholds: &MetricThresholds) -> MetricCurve {
        thresholds.talent_distribution
    }

    fn weight(&self, weights: &MetricWeights) -> f32 {
        weights.talent_distribution
    }

    #[expect(clippy::cast_precision_loss)]
    fn raw(&self, a: &TeamAggregates, b: &TeamAggregates, params: &MetricParams) -> f32 {
        let spread = difference_ratio(
            std_dev(a.assigned_scores.iter().copied()),
            std_dev(b.assigned_scores.iter().copied()),
        );
        let solid = difference_ratio(a.solid_players as f32, b.solid_players as f32);

        let total_players = (a.player_count + b.player_count) as f32;
        let power = params.midfield_power_base * total_players / params.midfield_reference_players;
        let midfield = (Self::midfield_preference(a) * Self::midfield_preference(b))
            .sqrt()
            .powf(power);

        spread * solid * midfield
    }
}
