/// Shannon entropy of a histogram, normalized by `ln(k)` where `k` is the number of bins.
///
/// The result lies in `[0.0, 1.0]`: 0.0 when every observation falls in one bin (or
/// there are no observations), 1.0 when observations are spread evenly over all bins.
/// Histograms with fewer than two bins have no diversity to measure and return 0.0.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn normalized_entropy(counts: &[usize]) -> f32 {
    if counts.len() < 2 {
        return 0.0;
    }
    let total = counts.iter().sum::<usize>();
    if total == 0 {
        return 0.0;
    }
    let total = total as f32;
    let entropy = counts
        .iter()
        .filter(|c| **c > 0)
        .map(|c| {
            let p = *c as f32 / total;
            -p * p.ln()
        })
        .sum::<f32>();
    (entropy / (counts.len() as f32).ln()).clamp(0.0, 1.0)
}
