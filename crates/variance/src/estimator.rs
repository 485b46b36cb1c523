//! Per-level wavelet variance estimators.

use tracing::debug;
use wvar_stats::mean_square;
use wvar_wavelet::LevelCoefficients;

use crate::error::VarianceError;
use crate::robust::{BiweightCalibration, biweight_variance, calibrate};

/// Variance estimator applied to each level's valid coefficients.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum Estimator {
    /// Mean of squared coefficients.
    #[default]
    Classical,
    /// Tukey-biweight M-estimator calibrated to a Gaussian efficiency.
    Robust(BiweightCalibration),
}

impl Estimator {
    /// Builds a robust estimator for the requested efficiency.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`VarianceError::InvalidInput`] | `efficiency` not finite or `<= 0` |
    /// | [`VarianceError::EfficiencyTooHigh`] | `efficiency > 0.99` |
    pub fn robust(efficiency: f64) -> Result<Self, VarianceError> {
        Ok(Self::Robust(calibrate(efficiency)?))
    }

    /// Returns `true` for the robust estimator.
    pub fn is_robust(&self) -> bool {
        matches!(self, Self::Robust(_))
    }

    /// Returns the requested efficiency of the robust estimator.
    pub fn efficiency(&self) -> Option<f64> {
        match self {
            Self::Classical => None,
            Self::Robust(cal) => Some(cal.efficiency()),
        }
    }
}

/// Point estimate for one level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelEstimate {
    variance: f64,
    valid_count: usize,
    effective_count: f64,
    converged: bool,
    iterations: usize,
}

impl LevelEstimate {
    /// Returns the wavelet variance estimate (NaN when degenerate).
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Returns the number of valid coefficients.
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Returns the information-equivalent number of coefficients.
    ///
    /// Equal to the valid count for the classical estimator; the robust
    /// estimator discounts it by the achieved efficiency and drops
    /// rejected coefficients.
    pub fn effective_count(&self) -> f64 {
        self.effective_count
    }

    /// Returns `false` if the robust loop hit its iteration cap, or the
    /// robust scale equation had no root and the starting scale was kept.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns the number of reweighting iterations (0 for classical and
    /// for a robust level without a root).
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if the level had no valid coefficients or the
    /// estimate is not finite.
    pub fn is_degenerate(&self) -> bool {
        self.valid_count < 1 || !self.variance.is_finite()
    }
}

/// Reduces one level's valid coefficients to a wavelet variance estimate.
///
/// The mean of squares (or its robust counterpart) is multiplied by the
/// level's [`variance_factor`](LevelCoefficients::variance_factor) so DWT
/// and MODWT estimates are on the same scale.
pub fn estimate(level: &LevelCoefficients, estimator: &Estimator) -> LevelEstimate {
    let valid = level.valid();
    let valid_count = valid.len();
    let factor = level.variance_factor();

    let estimate = match estimator {
        Estimator::Classical => LevelEstimate {
            variance: mean_square(valid) * factor,
            valid_count,
            effective_count: valid_count as f64,
            converged: true,
            iterations: 0,
        },
        Estimator::Robust(cal) => {
            let fit = biweight_variance(valid, cal);
            LevelEstimate {
                variance: fit.variance * factor,
                valid_count,
                effective_count: cal.achieved_efficiency() * fit.kept as f64,
                converged: fit.converged,
                iterations: fit.iterations,
            }
        }
    };

    debug!(
        level = level.level(),
        variance = estimate.variance,
        valid_count,
        effective_count = estimate.effective_count,
        iterations = estimate.iterations,
        "level estimated"
    );
    estimate
}
