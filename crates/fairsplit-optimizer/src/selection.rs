//! Weighted random selection helpers.

use rand::Rng;

/// Scales `weights` in place so they sum to 1.0. All-zero input is left untouched.
///
/// ```
/// use fairsplit_optimizer::selection::normalize_l1;
///
/// let mut weights = [2.0, 1.0, 1.0];
/// normalize_l1(&mut weights);
/// assert_eq!(weights, [0.5, 0.25, 0.25]);
/// ```
pub fn normalize_l1(weights: &mut [f32]) {
    let sum: f32 = weights.iter().copied().sum();
    if sum > 0.0 {
        for w in weights {
            *w /= sum;
        }
    }
}

/// Picks an index with probability proportional to its weight.
///
/// Returns `None` when there are no weights or they sum to zero.
pub fn weighted_choice<R>(weights: &[f32], rng: &mut R) -> Option<usize>
where
    R: Rng + ?Sized,
{
    let total = weights.iter().map(|w| w.max(0.0)).sum::<f32>();
    if total <= 0.0 || !total.is_finite() {
        return None;
    }
    let mut target = rng.random::<f32>() * total;
    let mut last_positive = None;
    for (i, w) in weights.iter().enumerate() {
        let w = w.max(0.0);
        if w <= 0.0 {
            continue;
        }
        if target < w {
            return Some(i);
        }
        target -= w;
        last_positive = Some(i);
    }
    // rounding can leave a sliver past the last bucket
    last_positive
}
