//! Descriptive statistics used by the estimators and the report

/// Logistic function, mapping a linear predictor onto (0, 1)
#[inline]
#[must_use]
pub fn expit(eta: f64) -> f64 {
    if eta >= 0.0 {
        1.0 / (1.0 + (-eta).exp())
    } else {
        let e = eta.exp();
        e / (1.0 + e)
    }
}

/// Arithmetic mean; zero for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sum: f64 = values.iter().sum();
    sum / values.len() as f64
}

/// Sample variance with Bessel's correction (divides by n - 1)
///
/// Returns zero when fewer than two values are available.
#[must_use]
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }

    let m = mean(values);
    values.iter().map(|&x| (x - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation with Bessel's correction
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// `num` evenly spaced points over `[start, end]`, both endpoints included
#[must_use]
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            (0..num)
                .map(|i| if i == num - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
