//! Tunable parameters of a balancing run.
//!
//! [`BalanceConfig`] is a plain value built once per invocation and passed by reference.
//! Every group deserializes with defaults for missing fields, and
//! [`BalanceConfig::with_overrides`] deep-merges a partial JSON document over the full
//! default document, so callers only spell out what they want to change:
//!
//! ```
//! use fairsplit_core::BalanceConfig;
//!
//! let config = BalanceConfig::with_overrides(&serde_json::json!({
//!     "monte_carlo": { "max_iterations": 500 },
//!     "stars": { "absolute_min": 85.0 },
//! }))
//! .unwrap();
//! assert_eq!(config.monte_carlo.max_iterations, 500);
//! assert!(config.monte_carlo.refinement);
//! ```
//!
//! The defaults are reasonable starting points, not canonical values; `fairsplit
//! default-config` prints the whole document for tuning.

use serde::{Deserialize, Serialize};

use crate::{
    ConfigError,
    player::{Attribute, AttributeMap},
    position::PositionMap,
};

/// Upper bound on the number of candidates considered for one slot.
pub const CANDIDATE_POOL_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BalanceConfig {
    pub limits: PlayerLimits,
    pub weights: MetricWeights,
    pub thresholds: MetricThresholds,
    pub metrics: MetricParams,
    pub algorithm: AlgorithmParams,
    pub monte_carlo: MonteCarloParams,
    pub stars: StarParams,
    pub star_split: StarSplitParams,
    pub composites: CompositeWeights,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerLimits {
    pub min_players: usize,
    pub max_players: usize,
}

impl Default for PlayerLimits {
    fn default() -> Self {
        Self {
            min_players: 10,
            max_players: 26,
        }
    }
}

/// Weight of each balance metric in the combined score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricWeights {
    /// Assigned-score balance and positional efficiency.
    pub positional: f32,
    /// Total peak potential.
    pub strength: f32,
    pub zonal: f32,
    pub energy: f32,
    pub creativity: f32,
    pub finishing: f32,
    pub all_stat: f32,
    pub talent_distribution: f32,
    /// How strongly the star multiplier pulls the weighted score down; 0 disables it.
    pub star_distribution_influence: f32,
}

impl Default for MetricWeights {
    fn default() -> Self {
        Self {
            positional: 0.22,
            strength: 0.20,
            zonal: 0.15,
            energy: 0.10,
            creativity: 0.08,
            finishing: 0.12,
            all_stat: 0.05,
            talent_distribution: 0.08,
            star_distribution_influence: 1.0,
        }
    }
}

impl MetricWeights {
    /// The eight metric weights in the order of [`MetricWeights::NAMES`].
    #[must_use]
    pub fn as_array(&self) -> [f32; 8] {
        [
            self.positional,
            self.strength,
            self.zonal,
            self.energy,
            self.creativity,
            self.finishing,
            self.all_stat,
            self.talent_distribution,
        ]
    }

    pub const NAMES: [&str; 8] = [
        "positional",
        "strength",
        "zonal",
        "energy",
        "creativity",
        "finishing",
        "all_stat",
        "talent_distribution",
    ];
}

/// How sharply a calibrated score falls off between its anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum Steepness {
    #[display("very-gentle")]
    VeryGentle,
    #[display("gentle")]
    Gentle,
    #[display("moderate")]
    Moderate,
    #[display("steep")]
    Steep,
    #[display("very-steep")]
    VerySteep,
}

impl Steepness {
    #[must_use]
    pub const fn exponent(self) -> f32 {
        match self {
            Self::VeryGentle => 0.5,
            Self::Gentle => 0.75,
            Self::Moderate => 1.0,
            Self::Steep => 1.5,
            Self::VerySteep => 2.0,
        }
    }
}

/// Ratio anchors mapped to 1.0, 0.8 and 0.2 by `calibrated_score`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub perfect: f32,
    pub acceptable: f32,
    pub poor: f32,
}

/// A threshold triple plus the steepness it is applied with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricCurve {
    pub perfect: f32,
    pub acceptable: f32,
    pub poor: f32,
    pub steepness: Steepness,
}

impl MetricCurve {
    const fn new(perfect: f32, acceptable: f32, poor: f32, steepness: Steepness) -> Self {
        Self {
            perfect,
            acceptable,
            poor,
            steepness,
        }
    }

    #[must_use]
    pub const fn thresholds(&self) -> Thresholds {
        Thresholds {
            perfect: self.perfect,
            acceptable: self.acceptable,
            poor: self.poor,
        }
    }

    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        let ordered = self.poor >= 0.0
            && self.acceptable >= self.poor
            && self.perfect >= self.acceptable
            && self.perfect <= 1.0;
        if !ordered {
            return Err(ConfigError::new(
                field,
                format!(
                    "expected 0 <= poor <= acceptable <= perfect <= 1, got {}/{}/{}",
                    self.perfect, self.acceptable, self.poor
                ),
            ));
        }
        if self.perfect <= self.poor {
            return Err(ConfigError::new(field, "perfect must exceed poor"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricThresholds {
    pub positional: MetricCurve,
    pub strength: MetricCurve,
    pub zonal: MetricCurve,
    pub energy: MetricCurve,
    pub creativity: MetricCurve,
    pub finishing: MetricCurve,
    pub all_stat: MetricCurve,
    pub talent_distribution: MetricCurve,
}

impl Default for MetricThresholds {
    fn default() -> Self {
        use Steepness::{Gentle, Moderate, Steep, VerySteep};
        Self {
            positional: MetricCurve::new(0.97, 0.92, 0.80, Steep),
            strength: MetricCurve::new(0.98, 0.95, 0.88, VerySteep),
            zonal: MetricCurve::new(0.95, 0.88, 0.75, Moderate),
            energy: MetricCurve::new(0.95, 0.85, 0.70, Gentle),
            creativity: MetricCurve::new(0.95, 0.88, 0.75, Moderate),
            finishing: MetricCurve::new(0.95, 0.85, 0.65, Moderate),
            all_stat: MetricCurve::new(0.98, 0.95, 0.90, Steep),
            talent_distribution: MetricCurve::new(0.92, 0.80, 0.60, Gentle),
        }
    }
}

impl MetricThresholds {
    fn curves(&self) -> [(&'static str, &MetricCurve); 8] {
        [
            ("positional", &self.positional),
            ("strength", &self.strength),
            ("zonal", &self.zonal),
            ("energy", &self.energy),
            ("creativity", &self.creativity),
            ("finishing", &self.finishing),
            ("all_stat", &self.all_stat),
            ("talent_distribution", &self.talent_distribution),
        ]
    }
}

/// Cutoffs used inside the individual metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetricParams {
    /// Share of the positional metric taken by team efficiency.
    pub efficiency_weight: f32,
    /// Share taken by the balance of per-player gap variance.
    pub gap_variance_weight: f32,
    /// Share taken by the progressive gap sum.
    pub gap_sum_weight: f32,
    /// Share taken by the worst single gap.
    pub worst_gap_weight: f32,
    /// Difference in gap variance between the teams at which the variance component
    /// reaches zero.
    pub gap_variance_scale: f32,
    /// Exponent applied to each gap before summing.
    pub gap_progressive_exponent: f32,
    /// Mean progressive gap per player at which the sum component reaches zero.
    pub gap_sum_scale: f32,
    /// Single-player gap at which the worst-gap component reaches zero.
    pub worst_gap_cap: f32,
    /// Share of the zonal metric taken by cross-team zone ratios.
    pub zone_cross_weight: f32,
    /// Difference in the teams' zone-mean coefficients of variation at which the internal
    /// balance component reaches zero.
    pub internal_cv_cap: f32,
    /// Relative zone difference under which a zone counts as even.
    pub neutral_zone_epsilon: f32,
    /// Relative zone difference above which a zone counts as decisively won.
    pub decisive_zone_margin: f32,
    /// Multiplier when one team is stronger in every outfield zone.
    pub zone_sweep_penalty: f32,
    /// Multiplier when one team decisively wins two zones and the third is even.
    pub zone_two_of_three_penalty: f32,
    /// Share of the energy metric taken by stamina.
    pub stamina_share: f32,
    /// Weight given to cancelling work-rate differences.
    pub cancellation_weight: f32,
    /// Minimum weight the raw work-rate ratio always keeps.
    pub raw_weight_floor: f32,
    /// Finishing metric share for finishing specialists.
    pub striker_specialist_weight: f32,
    /// Finishing metric share for viable finishers.
    pub striker_viable_weight: f32,
    /// Finishing metric share for finishing quality.
    pub striker_quality_weight: f32,
    /// A finishing specialist rates within this of their best at the finishing position.
    pub finisher_specialist_tolerance: f32,
    /// Minimum finishing-position rating of a viable finisher.
    pub viable_finisher_min: f32,
    /// Midfield-preference penalty exponent per `midfield_reference_players` players.
    pub midfield_power_base: f32,
    pub midfield_reference_players: f32,
    /// Players at or above this share of the pool maximum count as solid.
    pub solid_balance_floor: f32,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            efficiency_weight: 0.35,
            gap_variance_weight: 0.30,
            gap_sum_weight: 0.20,
            worst_gap_weight: 0.15,
            gap_variance_scale: 25.0,
            gap_progressive_exponent: 1.5,
            gap_sum_scale: 20.0,
            worst_gap_cap: 30.0,
            zone_cross_weight: 0.7,
            internal_cv_cap: 0.3,
            neutral_zone_epsilon: 0.02,
            decisive_zone_margin: 0.05,
            zone_sweep_penalty: 0.6,
            zone_two_of_three_penalty: 0.8,
            stamina_share: 0.4,
            cancellation_weight: 0.7,
            raw_weight_floor: 0.3,
            striker_specialist_weight: 0.3,
            striker_viable_weight: 0.4,
            striker_quality_weight: 0.3,
            finisher_specialist_tolerance: 2.0,
            viable_finisher_min: 70.0,
            midfield_power_base: 1.0,
            midfield_reference_players: 16.0,
            solid_balance_floor: 0.85,
        }
    }
}

/// Parameters of the slot-filling assignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlgorithmParams {
    /// Candidates rated more than this below the top candidate are not considered.
    pub proximity_threshold: f32,
    pub top_n_base: usize,
    /// The candidate pool grows by one per this many players per team.
    pub top_n_scale_divisor: usize,
    pub top_n_max: usize,
    /// Selection weight per candidate rank, L1-normalized before use.
    pub selection_weights: Vec<f32>,
    /// Starting priority counter per position; lower fills first.
    pub base_priorities: PositionMap<u32>,
    pub priority_step: u32,
    /// Fraction by which a star's selection weight drops when the sampled split puts
    /// them on the other team.
    pub guidance_strength: f32,
}

impl Default for AlgorithmParams {
    fn default() -> Self {
        Self {
            proximity_threshold: 4.0,
            top_n_base: 3,
            top_n_scale_divisor: 4,
            top_n_max: 6,
            selection_weights: vec![0.45, 0.25, 0.15, 0.08, 0.05, 0.02],
            base_priorities: PositionMap::default(),
            priority_step: 1,
            guidance_strength: 0.5,
        }
    }
}

impl AlgorithmParams {
    /// Candidate pool size for a team of `team_size` players.
    #[must_use]
    pub fn top_n(&self, team_size: usize) -> usize {
        let scaled = self.top_n_base + team_size / self.top_n_scale_divisor.max(1);
        scaled
            .min(self.top_n_max)
            .min(self.selection_weights.len())
            .clamp(1, CANDIDATE_POOL_CAPACITY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonteCarloParams {
    pub max_iterations: usize,
    /// Hill-climb the best assignment with cross-team swaps after the main loop.
    pub refinement: bool,
    pub refinement_rounds: usize,
    /// Bias each iteration toward a sampled high-ranked star split.
    pub split_guidance: bool,
}

impl Default for MonteCarloParams {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            refinement: true,
            refinement_rounds: 2,
            split_guidance: true,
        }
    }
}

/// Star detection and classification cutoffs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarParams {
    /// Best score at or above which a player is a star.
    pub absolute_min: f32,
    /// Raise the star threshold to the pool's `quartile` percentile when higher.
    pub use_quartile: bool,
    pub quartile: f32,
    pub superstar_min: f32,
    pub solid_min: f32,
    /// Lead of the best outfield zone over the runner-up that makes a specialist.
    pub specialist_margin: f32,
    /// Positions rated within this of the best count toward flexibility.
    pub flexibility_margin: f32,
}

impl Default for StarParams {
    fn default() -> Self {
        Self {
            absolute_min: 87.0,
            use_quartile: false,
            quartile: 75.0,
            superstar_min: 92.0,
            solid_min: 80.0,
            specialist_margin: 5.0,
            flexibility_margin: 5.0,
        }
    }
}

/// Star-split enumeration limits and penalty shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StarSplitParams {
    /// Enumerate exhaustively up to this many splits, sample otherwise.
    pub max_enumerated_splits: u64,
    pub sample_count: usize,
    pub max_ranked_splits: usize,
    pub even_zone_power: f32,
    pub odd_zone_power: f32,
    pub quality_power: f32,
    pub flexibility_power: f32,
    pub peak_power: f32,
    pub even_specialist_penalty: f32,
    pub odd_specialist_penalty: f32,
    /// Multiplier when one team holds more defensive and more attacking specialists.
    pub pairing_penalty: f32,
    /// Multiplier per zone where the smaller side of an odd split is also weaker.
    pub compensation_penalty: f32,
    /// Multiplier per star of count difference beyond one.
    pub count_penalty: f32,
    pub base_exponent: f32,
    pub base_concentration: f32,
    /// Extra exponent share for a pool of near-equal stars.
    pub variance_strictness: f32,
    /// Star rating variance at and above which no extra strictness applies.
    pub variance_reference: f32,
    /// Shaped star multiplier at the mean split quality.
    pub mean_breakpoint: f32,
}

impl Default for StarSplitParams {
    fn default() -> Self {
        Self {
            max_enumerated_splits: 50_000,
            sample_count: 5_000,
            max_ranked_splits: 256,
            even_zone_power: 4.0,
            odd_zone_power: 1.5,
            quality_power: 2.0,
            flexibility_power: 0.5,
            peak_power: 2.0,
            even_specialist_penalty: 0.1,
            odd_specialist_penalty: 0.35,
            pairing_penalty: 0.5,
            compensation_penalty: 0.8,
            count_penalty: 0.05,
            base_exponent: 2.0,
            base_concentration: 2.0,
            variance_strictness: 0.5,
            variance_reference: 25.0,
            mean_breakpoint: 0.05,
        }
    }
}

/// Attribute coefficients of each composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompositeWeights {
    pub creativity: AttributeMap<f32>,
    pub finishing: AttributeMap<f32>,
    pub stamina: AttributeMap<f32>,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        let weights = |entries: &[(Attribute, f32)]| {
            let mut map = AttributeMap::default();
            for (attribute, weight) in entries {
                map[*attribute] = *weight;
            }
            map
        };
        Self {
            creativity: weights(&[
                (Attribute::Vision, 0.40),
                (Attribute::Passing, 0.35),
                (Attribute::Dribbling, 0.25),
            ]),
            finishing: weights(&[
                (Attribute::Shooting, 0.50),
                (Attribute::Composure, 0.25),
                (Attribute::Positioning, 0.25),
            ]),
            stamina: weights(&[(Attribute::Stamina, 0.70), (Attribute::Physical, 0.30)]),
        }
    }
}

impl BalanceConfig {
    /// Deep-merges `overrides` over the default configuration and validates the result.
    pub fn with_overrides(overrides: &serde_json::Value) -> Result<Self, ConfigError> {
        let mut document = serde_json::to_value(Self::default())
            .map_err(|e| ConfigError::new("<root>", e.to_string()))?;
        merge_json(&mut document, overrides);
        let config: Self =
            serde_json::from_value(document).map_err(|e| ConfigError::new("<root>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Self {
            limits,
            weights,
            thresholds,
            metrics,
            algorithm,
            monte_carlo,
            stars,
            star_split,
            composites,
        } = self;

        if limits.min_players < 4 {
            return Err(ConfigError::new("limits.min_players", "must be at least 4"));
        }
        if limits.min_players > limits.max_players {
            return Err(ConfigError::new(
                "limits.max_players",
                "must not be less than min_players",
            ));
        }

        let metric_weights = weights.as_array();
        for (name, weight) in MetricWeights::NAMES.iter().zip(metric_weights) {
            non_negative(&format!("weights.{name}"), weight)?;
        }
        if metric_weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::new("weights", "metric weights must sum to a positive value"));
        }
        non_negative("weights.star_distribution_influence", weights.star_distribution_influence)?;
        if weights.star_distribution_influence > 1.0 {
            return Err(ConfigError::new(
                "weights.star_distribution_influence",
                "must not exceed 1",
            ));
        }

        for (name, curve) in thresholds.curves() {
            curve.validate(&format!("thresholds.{name}"))?;
        }

        for (name, share) in [
            ("metrics.stamina_share", metrics.stamina_share),
            ("metrics.raw_weight_floor", metrics.raw_weight_floor),
            ("metrics.zone_cross_weight", metrics.zone_cross_weight),
            ("metrics.zone_sweep_penalty", metrics.zone_sweep_penalty),
            ("metrics.zone_two_of_three_penalty", metrics.zone_two_of_three_penalty),
            ("metrics.solid_balance_floor", metrics.solid_balance_floor),
        ] {
            unit_interval(name, share)?;
        }
        for (name, scale) in [
            ("metrics.gap_variance_scale", metrics.gap_variance_scale),
            ("metrics.gap_sum_scale", metrics.gap_sum_scale),
            ("metrics.worst_gap_cap", metrics.worst_gap_cap),
            ("metrics.internal_cv_cap", metrics.internal_cv_cap),
            ("metrics.midfield_reference_players", metrics.midfield_reference_players),
        ] {
            positive(name, scale)?;
        }

        if algorithm.selection_weights.is_empty()
            || algorithm.selection_weights.len() > CANDIDATE_POOL_CAPACITY
        {
            return Err(ConfigError::new(
                "algorithm.selection_weights",
                format!("must hold between 1 and {CANDIDATE_POOL_CAPACITY} weights"),
            ));
        }
        for w in &algorithm.selection_weights {
            non_negative("algorithm.selection_weights", *w)?;
        }
        if algorithm.selection_weights.iter().sum::<f32>() <= 0.0 {
            return Err(ConfigError::new(
                "algorithm.selection_weights",
                "must sum to a positive value",
            ));
        }
        if algorithm.top_n_scale_divisor == 0 {
            return Err(ConfigError::new("algorithm.top_n_scale_divisor", "must be positive"));
        }
        non_negative("algorithm.proximity_threshold", algorithm.proximity_threshold)?;
        unit_interval("algorithm.guidance_strength", algorithm.guidance_strength)?;

        if monte_carlo.max_iterations == 0 {
            return Err(ConfigError::new("monte_carlo.max_iterations", "must be positive"));
        }

        if !(stars.solid_min <= stars.absolute_min && stars.absolute_min <= stars.superstar_min) {
            return Err(ConfigError::new(
                "stars",
                "expected solid_min <= absolute_min <= superstar_min",
            ));
        }
        if !(0.0..=100.0).contains(&stars.quartile) {
            return Err(ConfigError::new("stars.quartile", "must be within 0..=100"));
        }

        if star_split.sample_count == 0 || star_split.max_ranked_splits == 0 {
            return Err(ConfigError::new(
                "star_split",
                "sample_count and max_ranked_splits must be positive",
            ));
        }
        for (name, penalty) in [
            ("star_split.even_specialist_penalty", star_split.even_specialist_penalty),
            ("star_split.odd_specialist_penalty", star_split.odd_specialist_penalty),
            ("star_split.pairing_penalty", star_split.pairing_penalty),
            ("star_split.compensation_penalty", star_split.compensation_penalty),
            ("star_split.count_penalty", star_split.count_penalty),
            ("star_split.mean_breakpoint", star_split.mean_breakpoint),
        ] {
            unit_interval(name, penalty)?;
        }
        non_negative("star_split.variance_strictness", star_split.variance_strictness)?;
        positive("star_split.variance_reference", star_split.variance_reference)?;

        for (name, map) in [
            ("composites.creativity", &composites.creativity),
            ("composites.finishing", &composites.finishing),
            ("composites.stamina", &composites.stamina),
        ] {
            for w in map.values() {
                non_negative(name, *w)?;
            }
        }

        Ok(())
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::new(field, format!("must be a non-negative number, got {value}")))
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::new(field, format!("must be positive, got {value}")))
    }
}

fn unit_interval(field: &str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::new(field, format!("must be within 0..=1, got {value}")))
    }
}

/// Recursively merges `overrides` into `base`; objects merge key by key, anything else
/// replaces the base value.
pub fn merge_json(base: &mut serde_json::Value, overrides: &serde_json::Value) {
    match (base, overrides) {
        (serde_json::Value::Object(base), serde_json::Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overrides) => *base = overrides.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::position::Position;

    #[test]
    fn test_default_config_is_valid() {
        BalanceConfig::default().validate().unwrap();
    }

    #[test]
    fn test_overrides_merge_deeply() {
        let config = BalanceConfig::with_overrides(&json!({
            "thresholds": { "energy": { "poor": 0.5 } },
            "algorithm": { "base_priorities": { "GK": 3 } },
        }))
        .unwrap();
        assert_eq!(config.thresholds.energy.poor, 0.5);
        assert_eq!(config.thresholds.energy.perfect, 0.95);
        assert_eq!(config.thresholds.energy.steepness, Steepness::Gentle);
        assert_eq!(config.algorithm.base_priorities[Position::Gk], 3);
        assert_eq!(config.algorithm.top_n_max, 6);
        assert_eq!(config.weights, MetricWeights::default());
    }

    #[test]
    fn test_overrides_replace_arrays() {
        let config = BalanceConfig::with_overrides(&json!({
            "algorithm": { "selection_weights": [2.0, 1.0] },
        }))
        .unwrap();
        assert_eq!(config.algorithm.selection_weights, vec![2.0, 1.0]);
        assert_eq!(config.algorithm.top_n(11), 2);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = BalanceConfig::with_overrides(&json!({ "monte_carlo": { "iterations": 5 } }))
            .unwrap_err();
        assert!(err.reason.contains("iterations"));
    }

    #[test]
    fn test_partial_document_deserializes_with_defaults() {
        let config: BalanceConfig =
            serde_json::from_str(r#"{ "limits": { "max_players": 30 } }"#).unwrap();
        assert_eq!(config.limits.max_players, 30);
        assert_eq!(config.limits.min_players, 10);
    }

    #[test]
    fn test_validate_rejects_misordered_thresholds() {
        let mut config = BalanceConfig::default();
        config.thresholds.zonal.acceptable = 0.99;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field, "thresholds.zonal");
    }

    #[test]
    fn test_validate_rejects_bad_limits_and_bands() {
        let mut config = BalanceConfig::default();
        config.limits.min_players = 30;
        assert_eq!(config.validate().unwrap_err().field, "limits.max_players");

        let mut config = BalanceConfig::default();
        config.stars.superstar_min = 85.0;
        assert_eq!(config.validate().unwrap_err().field, "stars");

        let mut config = BalanceConfig::default();
        config.algorithm.selection_weights = vec![0.1; CANDIDATE_POOL_CAPACITY + 1];
        assert_eq!(config.validate().unwrap_err().field, "algorithm.selection_weights");
    }

    #[test]
    fn test_top_n_scales_with_team_size() {
        let params = AlgorithmParams::default();
        assert_eq!(params.top_n(5), 4);
        assert_eq!(params.top_n(8), 5);
        assert_eq!(params.top_n(13), 6);
    }

    #[test]
    fn test_steepness_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_value(Steepness::VeryGentle).unwrap(),
            json!("very-gentle")
        );
    }
}
