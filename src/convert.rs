//! Pure conversion functions: TOML config structs and text input -> crate API types.

use anyhow::{Context, Result, bail};

use wvar_variance::WaveletVarianceConfig;
use wvar_wavelet::{BoundaryRule, Decomposition};

use crate::config::EstimateToml;

/// Parses a decomposition name into the corresponding enum variant.
pub fn parse_decomposition(s: &str) -> Result<Decomposition> {
    Ok(s.parse::<Decomposition>()?)
}

/// Parses a boundary rule name into the corresponding enum variant.
pub fn parse_boundary(s: &str) -> Result<BoundaryRule> {
    match s.to_lowercase().as_str() {
        "exclude" => Ok(BoundaryRule::Exclude),
        "include" => Ok(BoundaryRule::Include),
        other => bail!("unknown boundary rule: {other:?}, expected \"exclude\" or \"include\""),
    }
}

/// Builds a [`WaveletVarianceConfig`] from the TOML estimate table.
pub fn build_variance_config(t: &EstimateToml) -> Result<WaveletVarianceConfig> {
    let config = WaveletVarianceConfig::new()
        .with_decomposition(parse_decomposition(&t.decomposition)?)
        .with_filter(&t.filter)
        .with_levels(t.levels)
        .with_robust(t.robust)
        .with_efficiency(t.efficiency)
        .with_alpha(t.alpha)
        .with_sampling_frequency(t.sampling_frequency)
        .with_boundary(parse_boundary(&t.boundary)?)
        .with_units(t.from_unit.as_deref(), t.to_unit.as_deref());
    config.validate().context("invalid [estimate] settings")?;
    Ok(config)
}

/// Parses a series written one value per line.
///
/// Blank lines and everything after a `#` are ignored.
pub fn parse_series(text: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let content = line.split('#').next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let value: f64 = content
            .parse()
            .with_context(|| format!("line {}: not a number: {content:?}", lineno + 1))?;
        values.push(value);
    }
    Ok(values)
}
