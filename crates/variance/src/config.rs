//! Configuration for the wavelet variance pipeline.

use wvar_wavelet::{BoundaryRule, Decomposition, TransformConfig};

use crate::error::VarianceError;
use crate::estimator::Estimator;
use crate::interval::check_alpha;
use crate::units::TimeUnit;

/// Default wavelet filter.
pub const DEFAULT_FILTER: &str = "haar";

/// Default robust efficiency.
pub const DEFAULT_EFFICIENCY: f64 = 0.6;

/// Default significance level of the intervals.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Configuration for [`wavelet_variance`](crate::wavelet_variance).
///
/// # Example
///
/// ```ignore
/// use wvar_variance::WaveletVarianceConfig;
///
/// let config = WaveletVarianceConfig::new()
///     .with_robust(true)
///     .with_efficiency(0.8)
///     .with_units(Some("sec"), Some("min"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WaveletVarianceConfig {
    decomposition: Decomposition,
    filter: String,
    levels: Option<usize>,
    robust: bool,
    efficiency: f64,
    alpha: f64,
    sampling_frequency: f64,
    boundary: BoundaryRule,
    from_unit: Option<String>,
    to_unit: Option<String>,
}

impl Default for WaveletVarianceConfig {
    fn default() -> Self {
        Self {
            decomposition: Decomposition::Modwt,
            filter: DEFAULT_FILTER.to_string(),
            levels: None,
            robust: false,
            efficiency: DEFAULT_EFFICIENCY,
            alpha: DEFAULT_ALPHA,
            sampling_frequency: 1.0,
            boundary: BoundaryRule::Exclude,
            from_unit: None,
            to_unit: None,
        }
    }
}

impl WaveletVarianceConfig {
    /// Creates a configuration with every default: classical MODWT with
    /// the Haar filter, all levels, 95% intervals and unit frequency.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the decomposition kind.
    pub fn with_decomposition(mut self, decomposition: Decomposition) -> Self {
        self.decomposition = decomposition;
        self
    }

    /// Sets the wavelet filter name.
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Sets the number of levels; `None` selects `floor(log2(N))`.
    pub fn with_levels(mut self, levels: Option<usize>) -> Self {
        self.levels = levels;
        self
    }

    /// Switches between the classical and robust estimators.
    pub fn with_robust(mut self, robust: bool) -> Self {
        self.robust = robust;
        self
    }

    /// Sets the robust estimator's Gaussian efficiency.
    pub fn with_efficiency(mut self, efficiency: f64) -> Self {
        self.efficiency = efficiency;
        self
    }

    /// Sets the interval significance level.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Sets the sampling frequency (samples per unit of time).
    pub fn with_sampling_frequency(mut self, sampling_frequency: f64) -> Self {
        self.sampling_frequency = sampling_frequency;
        self
    }

    /// Sets the boundary rule.
    pub fn with_boundary(mut self, boundary: BoundaryRule) -> Self {
        self.boundary = boundary;
        self
    }

    /// Sets the source and target units of the scale axis.
    pub fn with_units(mut self, from: Option<&str>, to: Option<&str>) -> Self {
        self.from_unit = from.map(str::to_string);
        self.to_unit = to.map(str::to_string);
        self
    }

    /// Returns the decomposition kind.
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Returns the wavelet filter name.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns the explicit number of levels, if set.
    pub fn levels(&self) -> Option<usize> {
        self.levels
    }

    /// Returns `true` if the robust estimator is selected.
    pub fn robust(&self) -> bool {
        self.robust
    }

    /// Returns the robust estimator's efficiency.
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Returns the interval significance level.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the sampling frequency.
    pub fn sampling_frequency(&self) -> f64 {
        self.sampling_frequency
    }

    /// Returns the boundary rule.
    pub fn boundary(&self) -> BoundaryRule {
        self.boundary
    }

    /// Returns the source unit, if set.
    pub fn from_unit(&self) -> Option<&str> {
        self.from_unit.as_deref()
    }

    /// Returns the target unit, if set.
    pub fn to_unit(&self) -> Option<&str> {
        self.to_unit.as_deref()
    }

    /// Checks every parameter that does not depend on the series and
    /// returns the calibrated estimator.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`VarianceError::InvalidConfidenceLevel`] | `alpha` outside `(0, 1)` |
    /// | [`VarianceError::InvalidInput`] | non-positive frequency or efficiency |
    /// | [`VarianceError::EfficiencyTooHigh`] | robust with efficiency above 0.99 |
    /// | [`VarianceError::UnsupportedUnit`] | unknown unit string |
    pub fn validate(&self) -> Result<Estimator, VarianceError> {
        check_alpha(self.alpha)?;
        if !self.sampling_frequency.is_finite() || self.sampling_frequency <= 0.0 {
            return Err(VarianceError::InvalidInput(format!(
                "sampling frequency must be finite and positive, got {}",
                self.sampling_frequency
            )));
        }
        for unit in [&self.from_unit, &self.to_unit].into_iter().flatten() {
            unit.parse::<TimeUnit>()?;
        }
        self.estimator()
    }

    /// Builds the estimator this configuration selects, without checking
    /// the other parameters.
    pub fn estimator(&self) -> Result<Estimator, VarianceError> {
        if self.robust {
            Estimator::robust(self.efficiency)
        } else {
            Ok(Estimator::Classical)
        }
    }

    /// Returns the decomposition settings.
    pub fn transform(&self) -> TransformConfig {
        let config = TransformConfig::new(self.decomposition).with_boundary(self.boundary);
        match self.levels {
            Some(levels) => config.with_levels(levels),
            None => config,
        }
    }
}
