//! Statistical helper functions for the wvar workspace.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Φ⁻¹(3/4): divides a MAD to make it consistent for the Gaussian standard deviation.
pub fn mad_normal_consistency() -> f64 {
    Normal::standard().inverse_cdf(0.75)
}

/// Mean of squared values. Returns NaN if empty.
pub fn mean_square(data: &[f64]) -> f64 {
    if data.is_empty() {
        return f64::NAN;
    }
    data.iter().map(|&x| x * x).sum::<f64>() / data.len() as f64
}

/// Median of pre-sorted data. For even length, averages the middle two values.
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn median(sorted: &[f64]) -> f64 {
    assert!(!sorted.is_empty(), "median: input must not be empty");
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Median absolute deviation about a fixed `center`, rescaled to be
/// consistent for the standard deviation of Gaussian data.
///
/// Returns 0.0 if `data` is empty.
pub fn normalized_mad(data: &[f64], center: f64) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let mut abs_devs: Vec<f64> = data.iter().map(|&x| (x - center).abs()).collect();
    abs_devs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    median(&abs_devs) / mad_normal_consistency()
}

/// Composite Simpson rule for `f` over `[a, b]` with `intervals` panels
/// (rounded up to an even count).
pub fn simpson<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, intervals: usize) -> f64 {
    let n = intervals.max(2).next_multiple_of(2);
    let h = (b - a) / n as f64;
    let mut sum = f(a) + f(b);
    for i in 1..n {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += weight * f(a + i as f64 * h);
    }
    sum * h / 3.0
}

/// `E[g(Z)]` for a standard normal `Z` when `g` is even and vanishes
/// outside `[-support, support]`.
pub fn even_gaussian_expectation<F: Fn(f64) -> f64>(g: F, support: f64) -> f64 {
    let normal = Normal::standard();
    2.0 * simpson(|x| g(x) * normal.pdf(x), 0.0, support, 2000)
}
