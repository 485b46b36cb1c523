//! Chi-squared confidence intervals for wavelet variance estimates.

use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::VarianceError;

const QUANTILE_BISECTION_STEPS: usize = 200;

/// Confidence bounds for one level's wavelet variance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ConfidenceInterval {
    lower: f64,
    upper: f64,
    degenerate: bool,
}

impl ConfidenceInterval {
    /// Returns the lower bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns `true` if fewer than one equivalent degree of freedom
    /// backed the interval, or the bounds could not be computed.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

/// Rejects `alpha` outside the open unit interval.
pub fn check_alpha(alpha: f64) -> Result<(), VarianceError> {
    if alpha.is_finite() && alpha > 0.0 && alpha < 1.0 {
        Ok(())
    } else {
        Err(VarianceError::InvalidConfidenceLevel(alpha))
    }
}

/// Equivalent degrees of freedom from an effective coefficient count and
/// the level's overlap factor (`2^j` for MODWT, 1 for DWT).
pub fn equivalent_dof(effective_count: f64, overlap_factor: f64) -> f64 {
    if overlap_factor > 0.0 {
        effective_count / overlap_factor
    } else {
        0.0
    }
}

/// Computes the `1 - alpha` interval of a wavelet variance estimate.
///
/// Uses `ν σ̂² / σ² ~ χ²_ν`:
/// `[ν σ̂² / χ²_{1-α/2}(ν), ν σ̂² / χ²_{α/2}(ν)]`. The bounds are widened
/// to include the point estimate when the two quantiles do not bracket `ν`
/// (large `alpha`).
///
/// | Condition | Bounds | Degenerate |
/// |-----------|--------|------------|
/// | point not finite | `(NaN, NaN)` | yes |
/// | `dof <= 0` | `(0, ∞)` | yes |
/// | `0 < dof < 1` | chi-squared | yes |
/// | `dof >= 1` | chi-squared | no |
///
/// # Errors
///
/// Returns [`VarianceError::InvalidConfidenceLevel`] unless `0 < alpha < 1`.
pub fn interval(point: f64, dof: f64, alpha: f64) -> Result<ConfidenceInterval, VarianceError> {
    check_alpha(alpha)?;

    if !point.is_finite() {
        return Ok(ConfidenceInterval {
            lower: f64::NAN,
            upper: f64::NAN,
            degenerate: true,
        });
    }
    let unbounded = ConfidenceInterval {
        lower: 0.0,
        upper: f64::INFINITY,
        degenerate: true,
    };
    if !dof.is_finite() || dof <= 0.0 {
        return Ok(unbounded);
    }
    let Ok(chi2) = ChiSquared::new(dof) else {
        return Ok(unbounded);
    };

    let q_hi = quantile(&chi2, 1.0 - alpha / 2.0);
    let q_lo = quantile(&chi2, alpha / 2.0);
    let scaled = dof * point;
    let lower = if q_hi > 0.0 { scaled / q_hi } else { 0.0 };
    let upper = if q_lo > 0.0 { scaled / q_lo } else { f64::INFINITY };

    Ok(ConfidenceInterval {
        lower: lower.min(point),
        upper: upper.max(point),
        degenerate: dof < 1.0,
    })
}

/// Chi-squared quantile at probability `p` in `(0, 1)`.
///
/// `statrs` returns NaN from `inverse_cdf` for `ν <= 1`. Whenever its
/// result does not reproduce `p` through `cdf`, the quantile is found by
/// bisection on `cdf` in log space instead.
fn quantile(chi2: &ChiSquared, p: f64) -> f64 {
    let q = chi2.inverse_cdf(p);
    if q.is_finite() && q > 0.0 && (chi2.cdf(q) / p - 1.0).abs() < 1e-6 {
        return q;
    }

    let mut hi = chi2.freedom().max(1.0);
    while chi2.cdf(hi) < p {
        hi *= 2.0;
        if !hi.is_finite() {
            return f64::INFINITY;
        }
    }
    let mut lo = f64::MIN_POSITIVE;
    if chi2.cdf(lo) >= p {
        return 0.0;
    }
    for _ in 0..QUANTILE_BISECTION_STEPS {
        let mid = (lo.ln() + 0.5 * (hi.ln() - lo.ln())).exp();
        if chi2.cdf(mid) < p {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi / lo - 1.0 < 1e-12 {
            break;
        }
    }
    0.5 * (lo + hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matches_chi_squared_quantiles() {
        // chi2_{0.975}(10) = 20.483, chi2_{0.025}(10) = 3.247
        let ci = interval(2.0, 10.0, 0.05).unwrap();
        assert_relative_eq!(ci.lower(), 20.0 / 20.483_177, max_relative = 1e-3);
        assert_relative_eq!(ci.upper(), 20.0 / 3.246_973, max_relative = 1e-3);
        assert!(!ci.is_degenerate());
    }

    #[test]
    fn brackets_point_for_every_alpha() {
        for dof in [0.5, 1.0, 3.0, 30.0, 500.0] {
            for alpha in [0.001, 0.01, 0.05, 0.2, 0.5, 0.7, 0.9, 0.99] {
                let ci = interval(1.3, dof, alpha).unwrap();
                assert!(ci.lower() <= 1.3, "dof {dof} alpha {alpha}: {ci:?}");
                assert!(ci.upper() >= 1.3, "dof {dof} alpha {alpha}: {ci:?}");
                assert!(ci.lower() >= 0.0);
            }
        }
    }

    #[test]
    fn narrows_as_dof_grows() {
        let mut prev = f64::INFINITY;
        for dof in [2.0, 5.0, 20.0, 100.0, 1000.0] {
            let ci = interval(1.0, dof, 0.05).unwrap();
            let width = ci.upper() - ci.lower();
            assert!(width < prev);
            prev = width;
        }
    }

    #[test]
    fn quantiles_at_and_below_one_dof() {
        // (dof, chi2_{0.025}, chi2_{0.975})
        for (dof, q_lo, q_hi) in [
            (0.5, 5.273_202_6e-7, 3.433_235_3),
            (0.8, 1.465_664_9e-4, 4.449_432_3),
            (1.0, 9.820_691_2e-4, 5.023_886_2),
            (1.05, 1.415_040_1e-3, 5.159_193_7),
        ] {
            let chi2 = ChiSquared::new(dof).unwrap();
            assert_relative_eq!(quantile(&chi2, 0.025), q_lo, max_relative = 1e-3);
            assert_relative_eq!(quantile(&chi2, 0.975), q_hi, max_relative = 1e-3);
        }
    }

    #[test]
    fn one_dof_interval_is_finite_and_not_flagged() {
        let ci = interval(2.0, 1.0, 0.05).unwrap();
        assert!(!ci.is_degenerate());
        assert_relative_eq!(ci.upper(), 2.0 / 9.820_691_2e-4, max_relative = 1e-5);
        assert_relative_eq!(ci.lower(), 2.0 / 5.023_886_2, max_relative = 1e-3);

        let ci = interval(2.0, 0.5, 0.05).unwrap();
        assert!(ci.is_degenerate());
        assert_relative_eq!(ci.upper(), 1.0 / 5.273_202_6e-7, max_relative = 1e-5);
    }

    #[test]
    fn low_dof_is_flagged() {
        let ci = interval(1.0, 0.8, 0.05).unwrap();
        assert!(ci.is_degenerate());
        assert!(ci.upper().is_finite());

        let ci = interval(1.0, 0.0, 0.05).unwrap();
        assert!(ci.is_degenerate());
        assert_eq!(ci.lower(), 0.0);
        assert_eq!(ci.upper(), f64::INFINITY);
    }

    #[test]
    fn non_finite_point_gives_nan_bounds() {
        let ci = interval(f64::NAN, 10.0, 0.05).unwrap();
        assert!(ci.lower().is_nan());
        assert!(ci.upper().is_nan());
        assert!(ci.is_degenerate());
    }

    #[test]
    fn alpha_must_be_in_open_unit_interval() {
        for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            assert!(matches!(
                interval(1.0, 10.0, alpha),
                Err(VarianceError::InvalidConfidenceLevel(_))
            ));
        }
    }

    #[test]
    fn equivalent_dof_divides_by_overlap() {
        assert_eq!(equivalent_dof(64.0, 4.0), 16.0);
        assert_eq!(equivalent_dof(10.0, 1.0), 10.0);
        assert_eq!(equivalent_dof(10.0, 0.0), 0.0);
    }
}
