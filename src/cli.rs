use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Wavelet variance estimation.
#[derive(Parser)]
#[command(
    name = "wvar",
    version,
    about = "Classical and robust wavelet variance of a time series"
)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Estimate the wavelet variance of a series.
    Estimate(EstimateArgs),
    /// Compute the joint plotting range of saved results.
    Compare(CompareArgs),
}

/// Arguments for the `estimate` subcommand.
#[derive(clap::Args)]
pub struct EstimateArgs {
    /// Path to the input series: one number per line, `#` starts a comment.
    #[arg(short, long)]
    pub input: PathBuf,

    /// Path to TOML configuration file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Path for the result JSON (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use the robust estimator.
    #[arg(long)]
    pub robust: bool,

    /// Gaussian efficiency of the robust estimator.
    #[arg(long)]
    pub efficiency: Option<f64>,

    /// Number of decomposition levels.
    #[arg(short = 'J', long)]
    pub levels: Option<usize>,

    /// Decomposition kind: `dwt` or `modwt`.
    #[arg(long)]
    pub decomp: Option<String>,

    /// Wavelet filter name.
    #[arg(long)]
    pub filter: Option<String>,

    /// Interval significance level.
    #[arg(long)]
    pub alpha: Option<f64>,
}

/// Arguments for the `compare` subcommand.
#[derive(clap::Args)]
pub struct CompareArgs {
    /// Result JSON files written by `wvar estimate`.
    #[arg(required = true)]
    pub results: Vec<PathBuf>,

    /// Path for the range JSON (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
