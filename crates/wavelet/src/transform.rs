//! Wavelet decomposition entry point and the coefficient set it produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dwt::{dwt_boundary_count, dwt_pyramid, dwt_usable_len};
use crate::error::WaveletError;
use crate::filter::FilterTaps;
use crate::modwt::{max_filter_level, modwt_boundary_count, modwt_pyramid};
use crate::series::TimeSeries;

/// Decomposition kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decomposition {
    /// Non-overlapping pyramid; halves the length at every level.
    Dwt,
    /// Maximal overlap; full-length, shift-invariant coefficients.
    #[default]
    Modwt,
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dwt => f.write_str("dwt"),
            Self::Modwt => f.write_str("modwt"),
        }
    }
}

impl FromStr for Decomposition {
    type Err = WaveletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dwt" => Ok(Self::Dwt),
            "modwt" => Ok(Self::Modwt),
            other => Err(WaveletError::InvalidInput(format!(
                "unknown decomposition {other:?}, expected \"dwt\" or \"modwt\""
            ))),
        }
    }
}

/// Whether boundary-affected coefficients count as valid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum BoundaryRule {
    /// Drop coefficients whose filter window wrapped around the series start.
    #[default]
    Exclude,
    /// Keep every coefficient.
    Include,
}

/// Non-fatal events raised while decomposing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformWarning {
    /// The series was cut to a prefix whose length is divisible by `2^J`.
    Truncated {
        /// Length of the input series.
        original: usize,
        /// Length actually decomposed.
        used: usize,
    },
}

/// Configuration for [`decompose`].
///
/// # Example
///
/// ```ignore
/// use wvar_wavelet::{Decomposition, TransformConfig};
///
/// let config = TransformConfig::new(Decomposition::Dwt).with_levels(4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TransformConfig {
    kind: Decomposition,
    levels: Option<usize>,
    boundary: BoundaryRule,
}

impl TransformConfig {
    /// Creates a configuration with automatic level selection and
    /// boundary coefficients excluded.
    pub fn new(kind: Decomposition) -> Self {
        Self {
            kind,
            levels: None,
            boundary: BoundaryRule::Exclude,
        }
    }

    /// Sets the number of levels explicitly.
    pub fn with_levels(mut self, levels: usize) -> Self {
        self.levels = Some(levels);
        self
    }

    /// Sets the boundary rule.
    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    /// Returns the decomposition kind.
    pub fn kind(&self) -> Decomposition {
        self.kind
    }

    /// Returns the explicit number of levels, if set.
    pub fn levels(&self) -> Option<usize> {
        self.levels
    }

    /// Returns the boundary rule.
    pub fn boundary(&self) -> BoundaryRule {
        self.boundary
    }
}

/// Wavelet coefficients of one decomposition level.
#[derive(Clone, Debug)]
pub struct LevelCoefficients {
    level: usize,
    values: Vec<f64>,
    boundary_count: usize,
    valid_count: usize,
    variance_factor: f64,
    overlap_factor: f64,
}

impl LevelCoefficients {
    /// Returns the 1-based level index `j`.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns every coefficient, boundary-affected ones included.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Returns the number of leading boundary-affected coefficients.
    pub fn boundary_count(&self) -> usize {
        self.boundary_count
    }

    /// Returns the number of coefficients that feed the estimators.
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Returns the coefficients that feed the estimators.
    pub fn valid(&self) -> &[f64] {
        &self.values[self.values.len() - self.valid_count..]
    }

    /// Returns the factor mapping a mean of squared coefficients onto the
    /// wavelet variance of this level (1 for MODWT, `2^-j` for DWT).
    pub fn variance_factor(&self) -> f64 {
        self.variance_factor
    }

    /// Returns the number of neighbouring coefficients that share
    /// information (`2^j` for MODWT, 1 for DWT).
    pub fn overlap_factor(&self) -> f64 {
        self.overlap_factor
    }
}

/// Output of one [`decompose`] call.
#[derive(Clone, Debug)]
pub struct CoefficientSet {
    kind: Decomposition,
    filter_name: String,
    levels: Vec<LevelCoefficients>,
    smooth: Vec<f64>,
    original_len: usize,
    used_len: usize,
    warnings: Vec<TransformWarning>,
}

impl CoefficientSet {
    /// Returns the decomposition kind.
    pub fn kind(&self) -> Decomposition {
        self.kind
    }

    /// Returns the wavelet family name.
    pub fn filter_name(&self) -> &str {
        &self.filter_name
    }

    /// Returns the number of levels `J`.
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns the coefficients of every level, finest first.
    pub fn levels(&self) -> &[LevelCoefficients] {
        &self.levels
    }

    /// Returns the coefficients of level `j` (1-based).
    pub fn level(&self, j: usize) -> Option<&LevelCoefficients> {
        j.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Returns the level-`J` scaling coefficients.
    pub fn smooth(&self) -> &[f64] {
        &self.smooth
    }

    /// Returns the length of the input series.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Returns the number of samples actually decomposed.
    pub fn used_len(&self) -> usize {
        self.used_len
    }

    /// Returns the non-fatal events raised while decomposing.
    pub fn warnings(&self) -> &[TransformWarning] {
        &self.warnings
    }
}

/// Default level count: `floor(log2(n))`.
pub fn max_level(n: usize) -> usize {
    if n < 2 { 0 } else { n.ilog2() as usize }
}

/// Decomposes a series into per-level wavelet coefficients.
///
/// Without an explicit level count the decomposition runs to
/// [`max_filter_level`], which is `floor(log2(N))` for Haar.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`WaveletError::InvalidInput`] | zero levels requested |
/// | [`WaveletError::InsufficientLength`] | levels exceed `floor(log2(N))`, or `L_J > N` at the coarsest level |
pub fn decompose(
    series: &TimeSeries,
    filter: &FilterTaps,
    config: &TransformConfig,
) -> Result<CoefficientSet, WaveletError> {
    let data = series.as_slice();
    let n = data.len();
    let filter_len = filter.length();
    let deepest = max_filter_level(n, filter);
    let levels = config.levels().unwrap_or(deepest);

    if levels == 0 && config.levels().is_some() {
        return Err(WaveletError::InvalidInput(
            "number of levels must be at least 1".into(),
        ));
    }
    if levels == 0 || levels > max_level(n) || levels > deepest {
        return Err(WaveletError::InsufficientLength {
            len: n,
            levels: levels.max(1),
            filter_len,
        });
    }
    debug!(levels, deepest, width = ?filter.width(levels), "decomposing");

    let mut warnings = Vec::new();
    let (details, smooth, used_len) = match config.kind() {
        Decomposition::Modwt => {
            let (details, smooth) = modwt_pyramid(data, filter, levels);
            (details, smooth, n)
        }
        Decomposition::Dwt => {
            let used = dwt_usable_len(n, levels);
            if used < n {
                warn!(
                    original = n,
                    used, levels, "DWT input truncated to a multiple of 2^levels"
                );
                warnings.push(TransformWarning::Truncated { original: n, used });
            }
            let (details, smooth) = dwt_pyramid(&data[..used], filter, levels);
            (details, smooth, used)
        }
    };

    let levels = details
        .into_iter()
        .enumerate()
        .map(|(i, values)| {
            let j = i + 1;
            let len = values.len();
            let (boundary_count, variance_factor, overlap_factor) = match config.kind() {
                Decomposition::Modwt => (
                    modwt_boundary_count(filter_len, j, len),
                    1.0,
                    2.0_f64.powi(j as i32),
                ),
                Decomposition::Dwt => (
                    dwt_boundary_count(filter_len, j, len),
                    0.5_f64.powi(j as i32),
                    1.0,
                ),
            };
            let valid_count = match config.boundary() {
                BoundaryRule::Exclude => len - boundary_count,
                BoundaryRule::Include => len,
            };
            LevelCoefficients {
                level: j,
                values,
                boundary_count,
                valid_count,
                variance_factor,
                overlap_factor,
            }
        })
        .collect();

    Ok(CoefficientSet {
        kind: config.kind(),
        filter_name: filter.name().to_string(),
        levels,
        smooth,
        original_len: n,
        used_len,
        warnings,
    })
}
