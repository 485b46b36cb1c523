//! # wvar-variance
//!
//! Classical and robust wavelet variance estimation with chi-squared
//! confidence intervals, scale-axis units, and result comparison.
//!
//! ## Pipeline
//!
//! ```mermaid
//! graph LR
//!     S["samples"] -->|"TimeSeries::new"| T["TimeSeries"]
//!     T -->|"decompose"| C["CoefficientSet"]
//!     C -->|"estimate (par_iter)"| E["LevelEstimate"]
//!     E -->|"interval"| I["ConfidenceInterval"]
//!     C -->|"scales + convert"| U["scale axis"]
//!     E & I & U --> R["WaveletVarianceResult"]
//!     R -->|"joint_range"| J["JointRange"]
//! ```
//!
//! ## Estimators
//!
//! | Estimator | Point estimate | Effective count |
//! |-----------|----------------|-----------------|
//! | [`Estimator::Classical`] | mean of squared valid coefficients | valid count |
//! | [`Estimator::Robust`] | Tukey-biweight M-scale | efficiency × retained coefficients |
//!
//! Interval degrees of freedom are the effective count divided by the
//! level's overlap factor (`2^j` for MODWT, 1 for DWT).
//!
//! ## Quick Start
//!
//! ```ignore
//! use wvar_variance::{WaveletVarianceConfig, wavelet_variance};
//!
//! let config = WaveletVarianceConfig::new().with_robust(true);
//! let result = wavelet_variance(&samples, &config)?;
//! for level in result.levels() {
//!     println!("{}: {} [{}, {}]", level.scale(), level.variance(), level.lower(), level.upper());
//! }
//! ```

mod compare;
mod config;
mod error;
mod estimator;
mod interval;
mod pipeline;
mod result;
mod robust;
mod units;

pub use compare::{JointRange, joint_range, parse_result};
pub use config::{DEFAULT_ALPHA, DEFAULT_EFFICIENCY, DEFAULT_FILTER, WaveletVarianceConfig};
pub use error::VarianceError;
pub use estimator::{Estimator, LevelEstimate, estimate};
pub use interval::{ConfidenceInterval, check_alpha, equivalent_dof, interval};
pub use pipeline::{wavelet_variance, wavelet_variance_with_bank};
pub use result::{LevelFlags, LevelVariance, WaveletVarianceResult, Warning};
pub use robust::{BiweightCalibration, MAX_EFFICIENCY, calibrate, efficiency_at};
pub use units::{Conversion, TimeUnit, convert, scales};
