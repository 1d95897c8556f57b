//! Small deterministic statistics helpers.
//!
//! Every function is total: empty or degenerate input returns a guarded value
//! instead of NaN.

pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / (xs.len() as f64)
}

/// Sample standard deviation (n-1), deterministic.
pub fn stddev_sample(xs: &[f64], mean: f64) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let var = xs
        .iter()
        .map(|x| {
            let d = x - mean;
            d * d
        })
        .sum::<f64>()
        / ((xs.len() - 1) as f64);
    var.sqrt()
}

/// Median; the mean of the two middle values for even lengths.
pub fn median(xs: &[f64]) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Coefficient of variation as a percentage (sample stddev / mean * 100).
///
/// Zero for fewer than two values or a non-positive mean.
pub fn coefficient_of_variation_pct(xs: &[f64]) -> f64 {
    let m = mean(xs);
    if xs.len() < 2 || m <= 0.0 {
        return 0.0;
    }
    stddev_sample(xs, m) / m * 100.0
}
