//! Small descriptive-statistics helpers shared by the mining pass.

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divide by n, not n-1); pattern groups are
/// treated as the whole population, not a sample.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mu = mean(values);
    let variance = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Coefficient-of-variation consistency: 100 minus the CV percentage,
/// floored at 0. A zero mean yields 0 rather than a division error.
pub fn consistency(values: &[f64]) -> f64 {
    let mu = mean(values);
    if mu <= 0.0 {
        return 0.0;
    }
    (100.0 - std_dev(values) / mu * 100.0).max(0.0)
}
