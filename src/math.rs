pub fn arithmetic_mean(x: &[f64]) -> f64 {
    x.iter().sum::<f64>() / x.len() as f64
}

/// Population standard deviation
pub fn std_dev(x: &[f64]) -> f64 {
    let mean = arithmetic_mean(x);
    (x.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / x.len() as f64).sqrt()
}

/// Returns the entry with the largest absolute value, keeping its sign
///
/// The first such entry wins on ties. Returns `NaN` for an empty slice.
pub fn max_deviation(x: &[f64]) -> f64 {
    x.iter()
        .copied()
        .reduce(|best, v| if v.abs() > best.abs() { v } else { best })
        .unwrap_or(f64::NAN)
}

/// Two-sided empirical p-value of an observed score against its null distribution
///
/// Counts the null values at least as extreme (in absolute value) as the observation.
/// Without a null distribution nothing can be rejected, so the p-value is 1.0.
pub fn twosided_pvalue(observed: f64, null: &[f64]) -> f64 {
    if null.is_empty() {
        return 1.0;
    }
    let extreme = null.iter().filter(|x| x.abs() >= observed.abs()).count();
    extreme as f64 / null.len() as f64
}

/// Standardizes the observed score against the null distribution
///
/// `NaN` when the null is empty or constant. A constant null is detected on
/// its values, since the rounded mean can leave a tiny non-zero deviation.
pub fn zscore(observed: f64, null: &[f64]) -> f64 {
    let Some(&first) = null.first() else {
        return f64::NAN;
    };
    if null.iter().all(|&x| x == first) {
        return f64::NAN;
    }
    let sd = std_dev(null);
    if sd == 0.0 {
        return f64::NAN;
    }
    (observed - arithmetic_mean(null)) / sd
}
