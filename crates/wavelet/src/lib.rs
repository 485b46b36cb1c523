//! # wvar-wavelet
//!
//! Wavelet filter bank and DWT / MODWT decompositions feeding the
//! wavelet variance estimators.
//!
//! ## Decomposition Pipeline
//!
//! ```mermaid
//! graph LR
//!     A["TimeSeries::new(data)?"] -->|"validate"| B["TimeSeries"]
//!     F["filter_for(name)?"] --> T["FilterTaps"]
//!     B -->|"decompose(&ts, &taps, &config)?"| C["CoefficientSet"]
//!     T --> C
//!     C --> D[".level(j).valid()"]
//!     C --> E[".warnings()"]
//! ```
//!
//! ## Built-in Filters
//!
//! | Name | Length | Family |
//! |------|--------|--------|
//! | `haar` | 2 | Haar |
//! | `d4` | 4 | Daubechies |
//! | `la8` | 8 | Least Asymmetric |
//!
//! Further orthonormal families are added with [`FilterBank::register`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use wvar_wavelet::{Decomposition, TimeSeries, TransformConfig, decompose, filter_for};
//!
//! let ts = TimeSeries::new(data)?;
//! let haar = filter_for("haar")?;
//! let set = decompose(&ts, &haar, &TransformConfig::new(Decomposition::Modwt))?;
//!
//! for level in set.levels() {
//!     println!("level {} has {} valid coefficients", level.level(), level.valid_count());
//! }
//! ```

mod dwt;
mod error;
mod filter;
mod modwt;
mod series;
mod transform;

pub use error::WaveletError;
pub use filter::{FilterBank, FilterTaps, filter_for};
pub use modwt::max_filter_level;
pub use series::{MIN_SERIES_LEN, TimeSeries};
pub use transform::{
    BoundaryRule, CoefficientSet, Decomposition, LevelCoefficients, TransformConfig,
    TransformWarning, decompose, max_level,
};
