//! Evenly spaced contour threshold generation.

/// Generate `count` thresholds spread linearly over `[z_min, z_max]`,
/// including both ends.
///
/// A single threshold is `z_min`. Equal bounds give a constant sequence.
/// `count == 0` yields nothing; callers validate the count beforehand.
pub fn generate_thresholds(count: usize, z_min: f64, z_max: f64) -> Vec<f64> {
    match count {
        0 => vec![],
        1 => vec![z_min],
        _ if z_min == z_max => vec![z_min; count],
        _ => {
            let last = (count - 1) as f64;
            (0..count)
                .map(|i| {
                    let f = i as f64 / last;
                    // Written as a weighted sum so both ends are exact.
                    z_min * (1.0 - f) + z_max * f
                })
                .collect()
        }
    }
}

/// Linear position of `threshold` inside `[z_min, z_max]`, used to pick a
/// colour band downstream. A zero-width range maps everything to `0.0`.
pub fn normalize_threshold(threshold: f64, z_min: f64, z_max: f64) -> f64 {
    let span = z_max - z_min;
    if span == 0.0 {
        return 0.0;
    }
    (threshold - z_min) / span
}
