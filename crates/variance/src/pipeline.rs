//! End-to-end wavelet variance estimation.

use rayon::prelude::*;
use tracing::{debug, warn};
use wvar_wavelet::{FilterBank, TimeSeries, TransformWarning, decompose};

use crate::config::WaveletVarianceConfig;
use crate::error::VarianceError;
use crate::estimator::estimate;
use crate::interval::{equivalent_dof, interval};
use crate::result::{LevelFlags, LevelVariance, WaveletVarianceResult, Warning};
use crate::units::{convert, scales};

/// Estimates the wavelet variance of `samples` with the built-in filters.
///
/// See [`wavelet_variance_with_bank`].
pub fn wavelet_variance(
    samples: &[f64],
    config: &WaveletVarianceConfig,
) -> Result<WaveletVarianceResult, VarianceError> {
    wavelet_variance_with_bank(samples, config, &FilterBank::default())
}

/// Estimates the wavelet variance of `samples`, looking the filter up in
/// `bank`.
///
/// Levels are estimated in parallel. Degenerate levels, non-converged
/// robust fits, low-dof intervals, DWT truncation and skipped unit
/// conversions are attached to the result as [`Warning`]s.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`VarianceError::Wavelet`] | invalid series, unknown filter, too many levels |
/// | [`VarianceError::InvalidConfidenceLevel`] | `alpha` outside `(0, 1)` |
/// | [`VarianceError::InvalidInput`] | non-positive frequency or efficiency |
/// | [`VarianceError::EfficiencyTooHigh`] | robust with efficiency above 0.99 |
/// | [`VarianceError::UnsupportedUnit`] | unknown unit string |
#[tracing::instrument(
    skip_all,
    fields(
        n = samples.len(),
        decomposition = %config.decomposition(),
        filter = config.filter(),
        robust = config.robust()
    )
)]
pub fn wavelet_variance_with_bank(
    samples: &[f64],
    config: &WaveletVarianceConfig,
    bank: &FilterBank,
) -> Result<WaveletVarianceResult, VarianceError> {
    let estimator = config.validate()?;
    let series = TimeSeries::new(samples.to_vec())?;
    let filter = bank.filter_for(config.filter())?;
    let coefficients = decompose(&series, &filter, &config.transform())?;

    let alpha = config.alpha();
    let per_level = coefficients
        .levels()
        .par_iter()
        .map(|level| -> Result<_, VarianceError> {
            let est = estimate(level, &estimator);
            let dof = equivalent_dof(est.effective_count(), level.overlap_factor());
            let ci = interval(est.variance(), dof, alpha)?;
            Ok((est, dof, ci))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let conversion = convert(
        &scales(coefficients.n_levels(), config.sampling_frequency())?,
        config.from_unit(),
        config.to_unit(),
    )?;

    let mut warnings: Vec<Warning> = coefficients
        .warnings()
        .iter()
        .map(|w| match *w {
            TransformWarning::Truncated { original, used } => Warning::Truncated { original, used },
        })
        .collect();
    if let (true, Some(to)) = (conversion.skipped(), config.to_unit()) {
        warnings.push(Warning::UnitConversionSkipped { to: to.to_string() });
    }

    let mut levels = Vec::with_capacity(per_level.len());
    for ((j, (est, dof, ci)), &scale) in (1..).zip(per_level).zip(conversion.scales()) {
        let flags = LevelFlags {
            degenerate: est.is_degenerate(),
            not_converged: !est.converged(),
            degenerate_interval: ci.is_degenerate(),
        };

        let mut level_warnings = Vec::new();
        if flags.degenerate {
            level_warnings.push(Warning::DegenerateLevel { level: j });
        } else if flags.degenerate_interval {
            level_warnings.push(Warning::DegenerateInterval { level: j, dof });
        }
        if flags.not_converged {
            level_warnings.push(Warning::NotConverged {
                level: j,
                iterations: est.iterations(),
            });
        }
        for w in &level_warnings {
            warn!(level = j, "{w}");
        }
        warnings.extend(level_warnings);

        levels.push(LevelVariance::new(
            j,
            scale,
            est.variance(),
            ci.lower(),
            ci.upper(),
            est.valid_count(),
            dof,
            flags,
        ));
    }

    debug!(
        levels = levels.len(),
        samples_used = coefficients.used_len(),
        warnings = warnings.len(),
        "wavelet variance estimated"
    );

    Ok(WaveletVarianceResult::new(
        coefficients.kind(),
        coefficients.filter_name().to_string(),
        estimator.efficiency(),
        alpha,
        conversion.unit().map(|u| u.label().to_string()),
        coefficients.used_len(),
        coefficients.original_len(),
        levels,
        warnings,
    ))
}
