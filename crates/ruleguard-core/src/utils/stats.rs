use num_traits::Float;

/// Absolute tolerance used by the aggregate comparison rules.
pub const AGGREGATE_TOLERANCE: f64 = 0.01;

pub fn is_close<F: Float>(actual: F, expected: F, tolerance: F) -> bool {
    (actual - expected).abs() <= tolerance
}

/// Smallest non-NaN value.
pub fn minimum<F: Float>(values: &[F]) -> Option<F> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(F::min)
}

/// Largest non-NaN value.
pub fn maximum<F: Float>(values: &[F]) -> Option<F> {
    values
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .reduce(F::max)
}

pub fn mean<F: Float>(values: &[F]) -> Option<F> {
    if values.is_empty() {
        return None;
    }
    let n = F::from(values.len())?;
    let sum = values.iter().fold(F::zero(), |acc, v| acc + *v);
    Some(sum / n)
}

/// Sample standard deviation (n - 1 denominator). Needs at least two values.
pub fn sample_std<F: Float>(values: &[F]) -> Option<F> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let denominator = F::from(values.len() - 1)?;
    let squares = values
        .iter()
        .fold(F::zero(), |acc, v| acc + (*v - avg) * (*v - avg));
    Some((squares / denominator).sqrt())
}
