//! Tukey-biweight M-estimator of scale for wavelet coefficients.
//!
//! Coefficients are treated as zero-mean. The scale solves
//! `(1/n) Σ χ(x_i/σ) = β(c)` with `χ(r) = r² w(r)` and the biweight
//! weights `w(r) = (1 - (r/c)²)²` for `|r| < c`, 0 otherwise. The
//! tuning constant `c` is chosen so that the Gaussian asymptotic
//! efficiency relative to the mean of squares equals the requested value:
//!
//! `eff(c) = (E[χ'(Z) Z])² / (2 Var χ(Z))`.

use tracing::debug;
use wvar_stats::{even_gaussian_expectation, mean_square, normalized_mad};

use crate::error::VarianceError;

/// Largest efficiency the robust estimator accepts.
pub const MAX_EFFICIENCY: f64 = 0.99;

/// Iteration cap for the reweighting loop.
pub const MAX_ITERATIONS: usize = 100;

/// Relative change in `σ²` below which the loop stops.
pub const TOLERANCE: f64 = 1e-8;

/// Upper bracket for the tuning constant; `eff(60)` is within 1e-6 of 1.
const TUNING_UPPER: f64 = 60.0;

const BISECTION_STEPS: usize = 200;

/// Step limit of the bracket search.
const SCAN_STEPS: usize = 1024;

/// `2^(-1/4)`: one quarter-octave step down in `σ²`.
const SCAN_RATIO: f64 = 0.840_896_415_253_714_5;

/// Tuning constants of the biweight estimator for one target efficiency.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BiweightCalibration {
    efficiency: f64,
    tuning: f64,
    consistency: f64,
    achieved_efficiency: f64,
}

impl BiweightCalibration {
    /// Returns the requested efficiency.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Returns the tuning constant `c`.
    pub fn tuning(&self) -> f64 {
        self.tuning
    }

    /// Returns `β(c) = E[Z² w(Z)]`, the Gaussian consistency constant.
    pub fn consistency(&self) -> f64 {
        self.consistency
    }

    /// Returns the Gaussian efficiency attained by the calibrated `c`.
    pub fn achieved_efficiency(&self) -> f64 {
        self.achieved_efficiency
    }

    /// Biweight weight of a standardized residual.
    pub fn weight(&self, r: f64) -> f64 {
        biweight(r, self.tuning)
    }
}

fn biweight(r: f64, c: f64) -> f64 {
    if r.abs() >= c {
        return 0.0;
    }
    let u = (r / c) * (r / c);
    (1.0 - u) * (1.0 - u)
}

/// Gaussian moments `(β, Var χ, E[χ'(Z) Z])` for tuning constant `c`.
fn gaussian_moments(c: f64) -> (f64, f64, f64) {
    let chi = |r: f64| r * r * biweight(r, c);
    let slope = |r: f64| {
        let u = (r / c) * (r / c);
        2.0 * r * r * (1.0 - u) * (1.0 - 3.0 * u)
    };
    let beta = even_gaussian_expectation(chi, c);
    let second = even_gaussian_expectation(|r| chi(r) * chi(r), c);
    let d = even_gaussian_expectation(slope, c);
    (beta, second - beta * beta, d)
}

/// Gaussian efficiency of the biweight scale estimator relative to the
/// mean of squares.
pub fn efficiency_at(c: f64) -> f64 {
    let (_, var, d) = gaussian_moments(c);
    d * d / (2.0 * var)
}

fn bisect<F: Fn(f64) -> f64>(f: F, mut lo: f64, mut hi: f64) -> f64 {
    let f_lo_negative = f(lo) < 0.0;
    for _ in 0..BISECTION_STEPS {
        let mid = 0.5 * (lo + hi);
        if (f(mid) < 0.0) == f_lo_negative {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo < 1e-12 {
            break;
        }
    }
    0.5 * (lo + hi)
}

/// Finds the tuning constant reaching `efficiency`.
///
/// The search runs on the branch above the root of `E[χ'(Z) Z]`, where
/// `eff(c)` rises monotonically from 0 towards 1.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`VarianceError::InvalidInput`] | `efficiency` not finite or `<= 0` |
/// | [`VarianceError::EfficiencyTooHigh`] | `efficiency > 0.99` |
pub fn calibrate(efficiency: f64) -> Result<BiweightCalibration, VarianceError> {
    if !efficiency.is_finite() || efficiency <= 0.0 {
        return Err(VarianceError::InvalidInput(format!(
            "efficiency must be in (0, {MAX_EFFICIENCY}], got {efficiency}"
        )));
    }
    if efficiency > MAX_EFFICIENCY {
        return Err(VarianceError::EfficiencyTooHigh(efficiency));
    }

    let slope_root = bisect(|c| gaussian_moments(c).2, 1.5, 3.0);
    let tuning = bisect(|c| efficiency_at(c) - efficiency, slope_root, TUNING_UPPER);
    let (consistency, _, _) = gaussian_moments(tuning);
    let achieved_efficiency = efficiency_at(tuning);
    debug!(efficiency, tuning, consistency, "biweight calibrated");

    Ok(BiweightCalibration {
        efficiency,
        tuning,
        consistency,
        achieved_efficiency,
    })
}

/// Outcome of the reweighting loop on one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct RobustFit {
    /// Robust estimate of the coefficients' second moment.
    pub(crate) variance: f64,
    /// Coefficients with non-zero weight at the final scale.
    pub(crate) kept: usize,
    pub(crate) converged: bool,
    /// Reweighting steps taken; 0 when the scale equation has no root.
    pub(crate) iterations: usize,
}

/// Iteratively reweighted biweight scale of zero-mean coefficients.
///
/// See [`biweight_variance_capped`]; the loop runs at most
/// [`MAX_ITERATIONS`] times.
pub(crate) fn biweight_variance(x: &[f64], calibration: &BiweightCalibration) -> RobustFit {
    biweight_variance_capped(x, calibration, MAX_ITERATIONS)
}

/// Iteratively reweighted biweight scale, stopping after `max_iterations`.
///
/// `χ` redescends, so `mean χ(x/σ)` vanishes at both ends of `σ` and the
/// scale equation has either no root or several. The largest root is
/// bracketed first; the reweighting step `σ² ← Σ w x² / (n β)` then runs
/// inside the bracket, replaced by a geometric bisection step whenever it
/// would leave the bracket or two steps in a row fail to halve it.
///
/// | Situation | `variance` | `converged` |
/// |-----------|------------|-------------|
/// | no coefficients | NaN | yes |
/// | all coefficients zero | 0 | yes |
/// | no root | starting scale squared | no |
/// | cap reached | last iterate | no |
///
/// The starting scale is the normalized MAD about zero, or the root mean
/// square when the MAD vanishes.
pub(crate) fn biweight_variance_capped(
    x: &[f64],
    calibration: &BiweightCalibration,
    max_iterations: usize,
) -> RobustFit {
    let n = x.len();
    if n == 0 {
        return RobustFit {
            variance: f64::NAN,
            kept: 0,
            converged: true,
            iterations: 0,
        };
    }

    let mut scale = normalized_mad(x, 0.0);
    if scale <= 0.0 {
        scale = mean_square(x).sqrt();
    }
    if scale <= 0.0 {
        return RobustFit {
            variance: 0.0,
            kept: n,
            converged: true,
            iterations: 0,
        };
    }

    let c = calibration.tuning();
    let beta = calibration.consistency();
    let start = scale * scale;
    let Some((mut lo, mut hi)) = bracket_root(x, c, beta) else {
        debug!(n, start, "biweight scale equation has no root");
        return RobustFit {
            variance: start,
            kept: kept_at(x, start, c),
            converged: false,
            iterations: 0,
        };
    };

    let mut s2 = if (lo..=hi).contains(&start) {
        start
    } else {
        (lo * hi).sqrt()
    };
    let mut converged = false;
    let mut iterations = 0;
    let mut width = (hi / lo).ln();
    let mut stalled = 0;
    while iterations < max_iterations {
        iterations += 1;
        let mean_chi = chi_mean(x, s2, c);
        if mean_chi >= beta {
            lo = s2;
        } else {
            hi = s2;
        }

        let current = (hi / lo).ln();
        if current > 0.5 * width {
            stalled += 1;
        } else {
            stalled = 0;
            width = current;
        }
        let mut next = s2 * mean_chi / beta;
        // Near the peak of mean χ the reweighting step crawls.
        if stalled >= 2 || !(lo..=hi).contains(&next) {
            next = (lo * hi).sqrt();
            stalled = 0;
            width = current;
        }
        let change = (next - s2).abs() / s2;
        s2 = next;
        if change < TOLERANCE {
            converged = true;
            break;
        }
    }

    RobustFit {
        variance: s2,
        kept: kept_at(x, s2, c),
        converged,
        iterations,
    }
}

/// `(1/n) Σ χ(x_i/σ)` at `σ² = s2`.
fn chi_mean(x: &[f64], s2: f64, c: f64) -> f64 {
    let s = s2.sqrt();
    let weighted: f64 = x.iter().map(|&v| biweight(v / s, c) * v * v).sum();
    weighted / (x.len() as f64 * s2)
}

fn kept_at(x: &[f64], s2: f64, c: f64) -> usize {
    let s = s2.sqrt();
    x.iter().filter(|&&v| (v / s).abs() < c).count()
}

/// Brackets the largest root of `mean χ(x/σ) = β` in `σ²`.
///
/// Above `σ² = 5 max|x|² / c²` every term decreases with `σ`, so the
/// search starts there and walks down in quarter-octave steps until the
/// mean reaches `β`. Below `min|x|² / c²` every coefficient is rejected.
fn bracket_root(x: &[f64], c: f64, beta: f64) -> Option<(f64, f64)> {
    let max_abs = x.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let min_abs = x
        .iter()
        .filter(|v| **v != 0.0)
        .fold(f64::INFINITY, |m, v| m.min(v.abs()));
    let top = 5.0 * max_abs * max_abs / (c * c);

    if chi_mean(x, top, c) >= beta {
        let mut lo = top;
        for _ in 0..SCAN_STEPS {
            let hi = 4.0 * lo;
            if chi_mean(x, hi, c) < beta {
                return Some((lo, hi));
            }
            lo = hi;
        }
        return None;
    }

    let floor = min_abs * min_abs / (c * c);
    let mut hi = top;
    for _ in 0..SCAN_STEPS {
        let lo = hi * SCAN_RATIO;
        if lo < floor {
            break;
        }
        if chi_mean(x, lo, c) >= beta {
            return Some((lo, hi));
        }
        hi = lo;
    }
    None
}
