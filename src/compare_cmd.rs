//! Compare command: joint range over saved wavelet variance results.

use anyhow::{Context, Result};
use tracing::{info, info_span};

use wvar_variance::{joint_range, parse_result};

use crate::cli::CompareArgs;
use crate::estimate_cmd::write_output;

/// Run the comparison.
pub fn run(args: CompareArgs) -> Result<()> {
    let _cmd = info_span!("compare").entered();

    let results = args
        .results
        .iter()
        .map(|path| {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read result: {}", path.display()))?;
            parse_result(&json)
                .with_context(|| format!("not a wavelet variance result: {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    info!(n = results.len(), "results loaded");

    let refs: Vec<_> = results.iter().collect();
    let range = joint_range(&refs)?;
    let json = serde_json::to_string_pretty(&range).context("failed to serialize range")?;
    write_output(args.output.as_deref(), &json)
}
