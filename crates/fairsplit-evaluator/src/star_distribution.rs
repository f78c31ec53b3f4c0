//! The star distribution penalty.
//!
//! Scores how fairly a set of classified stars is divided between two teams, on
//! `[0.0, 1.0]` with 1.0 meaning no imbalance. The same function ranks candidate splits
//! before the search and judges the realized split of every assignment afterwards.
//!
//! Five factors are multiplied:
//!
//! | factor | compares |
//! |---|---|
//! | affinity | per-zone quality of the stars, zone by zone |
//! | quality | overall star quality, plus a penalty when counts differ by 2+ |
//! | flexibility | how many positions the stars can cover |
//! | specialist | per-type specialist counts and specialist pairing |
//! | peak talent | the single best star on each side |
//!
//! With an even number of stars both sides can be matched exactly, so sums are compared
//! with steep powers. With an odd number one side necessarily has an extra star, so
//! per-star means are compared with gentler powers instead.

use fairsplit_core::{StarSplitParams, Zone, ZoneMap};
use serde::Serialize;

use crate::{
    scoring::difference_ratio,
    zone_classifier::{SpecialistKind, StarClassification},
};

/// The stars of one side: `members` index into `stars`.
#[derive(Debug, Clone, Copy)]
pub struct StarGroup<'a> {
    pub stars: &'a [StarClassification],
    pub members: &'a [usize],
}

impl<'a> StarGroup<'a> {
    #[must_use]
    pub fn new(stars: &'a [StarClassification], members: &'a [usize]) -> Self {
        Self { stars, members }
    }

    fn iter(self) -> impl Iterator<Item = &'a StarClassification> {
        let stars = self.stars;
        self.members.iter().map(move |i| &stars[*i])
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StarDistributionBreakdown {
    pub score: f32,
    pub affinity_balance: f32,
    pub quality_balance: f32,
    pub flexibility_balance: f32,
    pub specialist_balance: f32,
    pub peak_talent_balance: f32,
}

impl StarDistributionBreakdown {
    pub const PERFECT: Self = Self {
        score: 1.0,
        affinity_balance: 1.0,
        quality_balance: 1.0,
        flexibility_balance: 1.0,
        specialist_balance: 1.0,
        peak_talent_balance: 1.0,
    };
}

#[derive(Debug, Default)]
struct SideSummary {
    count: usize,
    zone_sums: ZoneMap<f32>,
    zone_peaks: ZoneMap<f32>,
    quality: f32,
    flexibility: f32,
    peak: f32,
    kinds: [usize; SpecialistKind::LEN],
}

impl SideSummary {
    fn new(group: StarGroup<'_>) -> Self {
        let mut summary = Self::default();
        for star in group.iter() {
            summary.count += 1;
            for zone in Zone::OUTFIELD {
                summary.zone_sums[zone] += star.zone_best[zone];
                summary.zone_peaks[zone] = summary.zone_peaks[zone].max(star.zone_best[zone]);
            }
            summary.quality += star.best_score;
            summary.flexibility += star.flexibility;
            summary.peak = summary.peak.max(star.best_score);
            summary.kinds[star.kind.index()] += 1;
        }
        summary
    }

    /// Per-star mean of `value`, or the value itself when comparing sums.
    #[expect(clippy::cast_precision_loss)]
    fn scaled(&self, value: f32, use_means: bool) -> f32 {
        if use_means && self.count > 0 {
            value / self.count as f32
        } else {
            value
        }
    }
}

#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn star_distribution_penalty(
    a: StarGroup<'_>,
    b: StarGroup<'_>,
    params: &StarSplitParams,
) -> StarDistributionBreakdown {
    let a = SideSummary::new(a);
    let b = SideSummary::new(b);
    let total = a.count + b.count;
    if total == 0 {
        return StarDistributionBreakdown::PERFECT;
    }
    let odd = total % 2 == 1;
    let count_diff = a.count.abs_diff(b.count);

    let zone_power = if odd {
        params.odd_zone_power
    } else {
        params.even_zone_power
    };
    let affinity_balance = Zone::OUTFIELD
        .iter()
        .map(|z| {
            difference_ratio(a.scaled(a.zone_sums[*z], odd), b.scaled(b.zone_sums[*z], odd))
                .powf(zone_power)
        })
        .product::<f32>();

    let mut quality_balance =
        difference_ratio(a.scaled(a.quality, odd), b.scaled(b.quality, odd)).powf(params.quality_power);
    if count_diff > 1 {
        quality_balance *= params.count_penalty.powf((count_diff - 1) as f32);
    }

    let flexibility_balance = difference_ratio(
        a.scaled(a.flexibility, odd),
        b.scaled(b.flexibility, odd),
    )
    .powf(params.flexibility_power);

    let specialist_balance = specialist_balance(&a, &b, params);

    let mut peak_talent_balance = difference_ratio(a.peak, b.peak).powf(params.peak_power);
    if odd {
        let (smaller, larger) = if a.count < b.count { (&a, &b) } else { (&b, &a) };
        for zone in Zone::OUTFIELD {
            if smaller.zone_peaks[zone] < larger.zone_peaks[zone] {
                peak_talent_balance *= params.compensation_penalty;
            }
        }
    }

    let score = (affinity_balance
        * quality_balance
        * flexibility_balance
        * specialist_balance
        * peak_talent_balance)
        .clamp(0.0, 1.0);

    StarDistributionBreakdown {
        score,
        affinity_balance,
        quality_balance,
        flexibility_balance,
        specialist_balance,
        peak_talent_balance,
    }
}

#[expect(clippy::cast_precision_loss)]
fn specialist_balance(a: &SideSummary, b: &SideSummary, params: &StarSplitParams) -> f32 {
    let mut balance = 1.0;
    for kind in [
        SpecialistKind::DefensiveSpecialist,
        SpecialistKind::Midfielder,
        SpecialistKind::AttackingSpecialist,
    ] {
        let (ca, cb) = (a.kinds[kind.index()], b.kinds[kind.index()]);
        let diff = ca.abs_diff(cb);
        if (ca + cb) % 2 == 0 {
            if diff > 0 {
                balance *= params.even_specialist_penalty.powf(diff as f32 / 2.0);
            }
        } else if diff >= 2 {
            balance *= params.odd_specialist_penalty.powf((diff - 1) as f32 / 2.0);
        }
    }

    let def = SpecialistKind::DefensiveSpecialist.index();
    let att = SpecialistKind::AttackingSpecialist.index();
    let a_dominates = a.kinds[def] > b.kinds[def] && a.kinds[att] > b.kinds[att];
    let b_dominates = b.kinds[def] > a.kinds[def] && b.kinds[att] > a.kinds[att];
    if a_dominates || b_dominates {
        balance *= params.pairing_penalty;
    }
    balance
}
