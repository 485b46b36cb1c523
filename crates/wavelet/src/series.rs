//! Validated time-series wrapper.

use crate::error::WaveletError;

/// Minimum number of observations accepted by [`TimeSeries::new`].
pub const MIN_SERIES_LEN: usize = 4;

/// A validated time series of finite `f64` values.
///
/// Wraps a `Vec<f64>` and guarantees:
/// - length >= [`MIN_SERIES_LEN`]
/// - all values are finite (no NaN or infinity)
///
/// # Example
///
/// ```ignore
/// use wvar_wavelet::TimeSeries;
///
/// let ts = TimeSeries::new(vec![1.0, 2.0, 3.0, 4.0])?;
/// assert_eq!(ts.len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct TimeSeries {
    data: Vec<f64>,
}

impl TimeSeries {
    /// Creates a new `TimeSeries` after validating the data.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::InvalidInput`] if `data` holds fewer than
    /// [`MIN_SERIES_LEN`] values or any value is NaN or infinite.
    pub fn new(data: Vec<f64>) -> Result<Self, WaveletError> {
        if data.len() < MIN_SERIES_LEN {
            return Err(WaveletError::InvalidInput(format!(
                "series has {} observations, need at least {MIN_SERIES_LEN}",
                data.len()
            )));
        }
        if let Some(pos) = data.iter().position(|v| !v.is_finite()) {
            return Err(WaveletError::InvalidInput(format!(
                "series contains a non-finite value at index {pos}"
            )));
        }
        Ok(Self { data })
    }

    /// Returns the time series as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the series is empty.
    ///
    /// Note: a valid `TimeSeries` is never empty.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl AsRef<[f64]> for TimeSeries {
    fn as_ref(&self) -> &[f64] {
        &self.data
    }
}

impl TryFrom<&[f64]> for TimeSeries {
    type Error = WaveletError;

    fn try_from(data: &[f64]) -> Result<Self, Self::Error> {
        Self::new(data.to_vec())
    }
}
