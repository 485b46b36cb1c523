//! Estimate command: wavelet variance of a single series.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use wvar_variance::wavelet_variance;

use crate::cli::EstimateArgs;
use crate::config::{EstimateToml, WvarConfig};
use crate::convert;

/// Run the estimation pipeline.
pub fn run(args: EstimateArgs) -> Result<()> {
    let _cmd = info_span!("estimate").entered();

    // 1. Load TOML, if any, and apply CLI overrides
    let mut config = match &args.config {
        Some(path) => {
            let toml_str = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            toml::from_str::<WvarConfig>(&toml_str).context("failed to parse TOML config")?
        }
        None => WvarConfig::default(),
    };
    apply_overrides(&mut config.estimate, &args);
    let variance_cfg = convert::build_variance_config(&config.estimate)?;

    // 2. Read the series
    info!(path = %args.input.display(), "reading series");
    let text = std::fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read input: {}", args.input.display()))?;
    let samples = convert::parse_series(&text)
        .with_context(|| format!("failed to parse input: {}", args.input.display()))?;
    info!(n = samples.len(), "series loaded");

    // 3. Estimate
    let result = wavelet_variance(&samples, &variance_cfg).context("estimation failed")?;
    info!(
        levels = result.n_levels(),
        warnings = result.warnings().len(),
        "wavelet variance estimated"
    );

    // 4. Write JSON
    let json = result.to_json()?;
    write_output(args.output.as_deref(), &json)
}

fn apply_overrides(t: &mut EstimateToml, args: &EstimateArgs) {
    if args.robust {
        t.robust = true;
    }
    if let Some(efficiency) = args.efficiency {
        t.efficiency = efficiency;
    }
    if let Some(levels) = args.levels {
        t.levels = Some(levels);
    }
    if let Some(ref decomp) = args.decomp {
        t.decomposition = decomp.clone();
    }
    if let Some(ref filter) = args.filter {
        t.filter = filter.clone();
    }
    if let Some(alpha) = args.alpha {
        t.alpha = alpha;
    }
}

/// Writes `json` to `path`, or to stdout when no path is given.
pub fn write_output(path: Option<&Path>, json: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write output: {}", path.display()))?;
            info!(path = %path.display(), "output written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
