//! Scoring primitives shared by every balance metric.
//!
//! - [`difference_ratio`] turns two team totals into a similarity in \[0.0, 1.0\]
//! - [`calibrated_score`] maps such a ratio onto a score through three anchors
//!
//! # Calibration Curve
//!
//! ```text
//! score
//!  1.0 ┤                         ●━━━━  ratio ≥ perfect
//!  0.8 ┤                   ●╱╱╱╱
//!      │               ╱╱╱
//!  0.2 ┤        ●╱╱╱╱╱
//!      │   ╱╱╱╱
//!  0.0 ┼━━━━━━━┬────────┬──────┬──── ratio
//!             poor  acceptable perfect
//! ```
//!
//! Each segment interpolates with `t^k`, where `t` is the position inside the segment
//! and `k` comes from the [`Steepness`]; below `poor` the score decays as
//! `0.2 · (ratio / poor)^(2k)`. The curve is continuous and non-decreasing.

use fairsplit_core::{Steepness, Thresholds};

/// Similarity of two non-negative quantities.
///
/// 1.0 when both are zero, 0.0 when exactly one is zero, otherwise
/// `1 - |a - b| / max(a, b)`.
///
/// ```
/// use fairsplit_evaluator::scoring::difference_ratio;
///
/// assert_eq!(difference_ratio(80.0, 100.0), 0.8);
/// assert_eq!(difference_ratio(0.0, 0.0), 1.0);
/// assert_eq!(difference_ratio(0.0, 5.0), 0.0);
/// ```
#[must_use]
pub fn difference_ratio(a: f32, b: f32) -> f32 {
    let a = a.max(0.0);
    let b = b.max(0.0);
    if a == 0.0 && b == 0.0 {
        return 1.0;
    }
    if a == 0.0 || b == 0.0 {
        return 0.0;
    }
    (1.0 - (a - b).abs() / a.max(b)).clamp(0.0, 1.0)
}

/// Maps a similarity ratio onto \[0.0, 1.0\] through the `perfect`, `acceptable` and
/// `poor` anchors (scored 1.0, 0.8 and 0.2).
#[must_use]
pub fn calibrated_score(ratio: f32, thresholds: &Thresholds, steepness: Steepness) -> f32 {
    let Thresholds {
        perfect,
        acceptable,
        poor,
    } = *thresholds;
    let k = steepness.exponent();
    let r = if ratio.is_nan() { 0.0 } else { ratio.clamp(0.0, 1.0) };

    if r >= perfect {
        1.0
    } else if r >= acceptable {
        let t = (r - acceptable) / (perfect - acceptable);
        0.8 + 0.2 * t.powf(k)
    } else if r >= poor {
        let t = (r - poor) / (acceptable - poor);
        0.2 + 0.6 * t.powf(k)
    } else {
        0.2 * (r / poor).powf(2.0 * k)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const THRESHOLDS: Thresholds = Thresholds {
        perfect: 0.95,
        acceptable: 0.85,
        poor: 0.70,
    };

    const ALL_STEEPNESS: [Steepness; 5] = [
        Steepness::VeryGentle,
        Steepness::Gentle,
        Steepness::Moderate,
        Steepness::Steep,
        Steepness::VerySteep,
    ];

    #[test]
    fn test_difference_ratio_boundaries() {
        assert_eq!(difference_ratio(0.0, 0.0), 1.0);
        assert_eq!(difference_ratio(7.0, 0.0), 0.0);
        assert_eq!(difference_ratio(50.0, 50.0), 1.0);
        assert!((difference_ratio(60.0, 80.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_calibrated_score_anchors() {
        for steepness in ALL_STEEPNESS {
            assert_eq!(calibrated_score(0.95, &THRESHOLDS, steepness), 1.0);
            assert!((calibrated_score(0.85, &THRESHOLDS, steepness) - 0.8).abs() < 1e-6);
            assert!((calibrated_score(0.70, &THRESHOLDS, steepness) - 0.2).abs() < 1e-6);
            assert_eq!(calibrated_score(0.0, &THRESHOLDS, steepness), 0.0);
        }
    }

    #[test]
    fn test_steeper_curves_score_lower_between_anchors() {
        let gentle = calibrated_score(0.78, &THRESHOLDS, Steepness::Gentle);
        let steep = calibrated_score(0.78, &THRESHOLDS, Steepness::Steep);
        assert!(gentle > steep);
    }

    #[test]
    fn test_calibrated_score_handles_out_of_range_input() {
        assert_eq!(calibrated_score(1.7, &THRESHOLDS, Steepness::Moderate), 1.0);
        assert_eq!(calibrated_score(-3.0, &THRESHOLDS, Steepness::Moderate), 0.0);
        assert_eq!(calibrated_score(f32::NAN, &THRESHOLDS, Steepness::Moderate), 0.0);
    }

    proptest! {
        #[test]
        fn test_difference_ratio_is_symmetric_and_bounded(a in 0.0f32..1000.0, b in 0.0f32..1000.0) {
            let ab = difference_ratio(a, b);
            prop_assert_eq!(ab, difference_ratio(b, a));
            prop_assert!((0.0..=1.0).contains(&ab));
        }

        #[test]
        fn test_difference_ratio_is_one_only_for_equal_values(a in 0.001f32..1000.0, b in 0.001f32..1000.0) {
            prop_assert_eq!(difference_ratio(a, a), 1.0);
            if difference_ratio(a, b) == 1.0 {
                prop_assert_eq!(a, b);
            }
        }

        #[test]
        fn test_calibrated_score_is_monotonic(
            x in 0.0f32..=1.0,
            y in 0.0f32..=1.0,
            steepness in proptest::sample::select(ALL_STEEPNESS.to_vec()),
        ) {
            let (lo, hi) = if x <= y { (x, y) } else { (y, x) };
            let s_lo = calibrated_score(lo, &THRESHOLDS, steepness);
            let s_hi = calibrated_score(hi, &THRESHOLDS, steepness);
            prop_assert!(s_lo <= s_hi + 1e-6);
            prop_assert!((0.0..=1.0).contains(&s_lo));
        }
    }
}
