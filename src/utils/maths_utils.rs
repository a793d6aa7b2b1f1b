use argminmax::ArgMinMax;

/// A series value counts as defined only when it is a finite number.
#[inline]
pub fn is_defined(x: f64) -> bool {
    x.is_finite()
}

/// A fresh all-undefined series of length `n`.
pub fn undefined_series(n: usize) -> Vec<f64> {
    vec![f64::NAN; n]
}

/// Index of the first defined value, if any.
pub fn first_defined(values: &[f64]) -> Option<usize> {
    values.iter().position(|&x| is_defined(x))
}

/// Replaces undefined entries with 0.0 so a smoother can keep running.
/// Only for feeding a smoother; never hand this back to a caller as output.
pub fn zero_filled(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|&x| if is_defined(x) { x } else { 0.0 })
        .collect()
}

/// Copies `values` but keeps the undefined positions of `mask`.
pub fn masked_by(values: &[f64], mask: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(mask)
        .map(|(&v, &m)| if is_defined(m) { v } else { f64::NAN })
        .collect()
}

#[inline]
pub fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

/// Value or a fallback when the value is undefined.
#[inline]
pub fn or_fallback(x: f64, fallback: f64) -> f64 {
    if is_defined(x) { x } else { fallback }
}

pub fn get_max(vec: &[f64]) -> f64 {
    if vec.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    if vec.iter().any(|x| x.is_nan()) {
        return f64::NAN;
    }
    let min_index: usize = vec.argmin();
    vec[min_index]
}
