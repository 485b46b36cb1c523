//! Wavelet variance result and its JSON form.

use std::fmt;

use serde::{Deserialize, Serialize};
use wvar_wavelet::Decomposition;

use crate::error::VarianceError;

/// Non-fatal events attached to a result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// DWT input was cut to a multiple of `2^J` samples.
    Truncated { original: usize, used: usize },
    /// A target unit was given without a source unit.
    UnitConversionSkipped { to: String },
    /// The level had no valid coefficients or a non-finite estimate.
    DegenerateLevel { level: usize },
    /// The robust loop hit its iteration cap.
    NotConverged { level: usize, iterations: usize },
    /// The interval rests on fewer than one degree of freedom.
    DegenerateInterval {
        level: usize,
        #[serde(with = "nonfinite")]
        dof: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { original, used } => {
                write!(f, "series truncated from {original} to {used} samples")
            }
            Self::UnitConversionSkipped { to } => {
                write!(f, "no source unit given; conversion to {to} skipped")
            }
            Self::DegenerateLevel { level } => {
                write!(f, "level {level} has no usable estimate")
            }
            Self::NotConverged { level, iterations } => write!(
                f,
                "robust estimate at level {level} did not converge after {iterations} iterations"
            ),
            Self::DegenerateInterval { level, dof } => write!(
                f,
                "interval at level {level} rests on {dof:.3} degrees of freedom"
            ),
        }
    }
}

/// Per-level anomaly flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelFlags {
    /// No valid coefficients; the estimate is NaN.
    pub degenerate: bool,
    /// The robust loop stopped at the iteration cap.
    pub not_converged: bool,
    /// Fewer than one equivalent degree of freedom behind the interval.
    pub degenerate_interval: bool,
}

impl LevelFlags {
    /// Returns `true` if any flag is set.
    pub fn any(&self) -> bool {
        self.degenerate || self.not_converged || self.degenerate_interval
    }
}

/// Estimate, interval and bookkeeping for one level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelVariance {
    level: usize,
    #[serde(with = "nonfinite")]
    scale: f64,
    #[serde(with = "nonfinite")]
    variance: f64,
    #[serde(with = "nonfinite")]
    lower: f64,
    #[serde(with = "nonfinite")]
    upper: f64,
    valid_count: usize,
    #[serde(with = "nonfinite")]
    effective_dof: f64,
    #[serde(default)]
    flags: LevelFlags,
}

impl LevelVariance {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        level: usize,
        scale: f64,
        variance: f64,
        lower: f64,
        upper: f64,
        valid_count: usize,
        effective_dof: f64,
        flags: LevelFlags,
    ) -> Self {
        Self {
            level,
            scale,
            variance,
            lower,
            upper,
            valid_count,
            effective_dof,
            flags,
        }
    }

    /// Returns the 1-based level index.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Returns the scale in the result's unit.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Returns the wavelet variance estimate.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    /// Returns the lower confidence bound.
    pub fn lower(&self) -> f64 {
        self.lower
    }

    /// Returns the upper confidence bound.
    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// Returns the number of coefficients that fed the estimator.
    pub fn valid_count(&self) -> usize {
        self.valid_count
    }

    /// Returns the equivalent degrees of freedom of the interval.
    pub fn effective_dof(&self) -> f64 {
        self.effective_dof
    }

    /// Returns the anomaly flags.
    pub fn flags(&self) -> LevelFlags {
        self.flags
    }
}

/// Wavelet variance of one series across `J` dyadic scales.
///
/// Read-only once produced; serializes to JSON with non-finite numbers
/// written as `null` (NaN) or `"inf"`/`"-inf"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WaveletVarianceResult {
    decomposition: Decomposition,
    filter: String,
    robust: bool,
    efficiency: Option<f64>,
    alpha: f64,
    unit: Option<String>,
    samples_used: usize,
    original_len: usize,
    levels: Vec<LevelVariance>,
    #[serde(default)]
    warnings: Vec<Warning>,
}

impl WaveletVarianceResult {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        decomposition: Decomposition,
        filter: String,
        efficiency: Option<f64>,
        alpha: f64,
        unit: Option<String>,
        samples_used: usize,
        original_len: usize,
        levels: Vec<LevelVariance>,
        warnings: Vec<Warning>,
    ) -> Self {
        Self {
            decomposition,
            filter,
            robust: efficiency.is_some(),
            efficiency,
            alpha,
            unit,
            samples_used,
            original_len,
            levels,
            warnings,
        }
    }

    /// Returns the decomposition kind.
    pub fn decomposition(&self) -> Decomposition {
        self.decomposition
    }

    /// Returns the wavelet filter name.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    /// Returns `true` if the robust estimator was used.
    pub fn is_robust(&self) -> bool {
        self.robust
    }

    /// Returns the requested efficiency of the robust estimator.
    pub fn efficiency(&self) -> Option<f64> {
        self.efficiency
    }

    /// Returns the interval significance level.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Returns the unit label of the scales, if any.
    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Returns the number of samples decomposed.
    pub fn samples_used(&self) -> usize {
        self.samples_used
    }

    /// Returns the length of the input series.
    pub fn original_len(&self) -> usize {
        self.original_len
    }

    /// Returns the number of levels `J`.
    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Returns every level, finest first.
    pub fn levels(&self) -> &[LevelVariance] {
        &self.levels
    }

    /// Returns level `j` (1-based).
    pub fn level(&self, j: usize) -> Option<&LevelVariance> {
        j.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Returns the scales, finest first.
    pub fn scales(&self) -> Vec<f64> {
        self.levels.iter().map(LevelVariance::scale).collect()
    }

    /// Returns the point estimates, finest first.
    pub fn variances(&self) -> Vec<f64> {
        self.levels.iter().map(LevelVariance::variance).collect()
    }

    /// Returns the lower bounds, finest first.
    pub fn lower(&self) -> Vec<f64> {
        self.levels.iter().map(LevelVariance::lower).collect()
    }

    /// Returns the upper bounds, finest first.
    pub fn upper(&self) -> Vec<f64> {
        self.levels.iter().map(LevelVariance::upper).collect()
    }

    /// Returns the warnings raised while estimating.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Serializes the result to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, VarianceError> {
        serde_json::to_string_pretty(self).map_err(|e| VarianceError::Serialization {
            reason: e.to_string(),
        })
    }

    /// Checks the internal consistency of a deserialized result.
    pub(crate) fn check(&self) -> Result<(), String> {
        if self.levels.is_empty() {
            return Err("result has no levels".into());
        }
        for (i, level) in self.levels.iter().enumerate() {
            if level.level != i + 1 {
                return Err(format!(
                    "level {} found at position {}, expected {}",
                    level.level,
                    i,
                    i + 1
                ));
            }
        }
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(format!("alpha {} outside (0, 1)", self.alpha));
        }
        if self.robust != self.efficiency.is_some() {
            return Err("robust flag and efficiency disagree".into());
        }
        if self.samples_used > self.original_len {
            return Err(format!(
                "{} samples used out of {}",
                self.samples_used, self.original_len
            ));
        }
        Ok(())
    }
}

/// Serde adapter for `f64` fields that may be NaN or infinite.
mod nonfinite {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub(crate) fn serialize<S: Serializer>(value: &f64, s: S) -> Result<S::Ok, S::Error> {
        if value.is_finite() {
            s.serialize_f64(*value)
        } else if value.is_nan() {
            s.serialize_none()
        } else if *value > 0.0 {
            s.serialize_str("inf")
        } else {
            s.serialize_str("-inf")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Number(f64),
        Text(String),
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match Option::<Repr>::deserialize(d)? {
            None => Ok(f64::NAN),
            Some(Repr::Number(v)) => Ok(v),
            Some(Repr::Text(t)) => match t.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                other => Err(de::Error::custom(format!("expected a number, got {other:?}"))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WaveletVarianceResult {
        let levels = vec![
            LevelVariance::new(1, 2.0, 0.5, 0.4, 0.6, 99, 49.5, LevelFlags::default()),
            LevelVariance::new(
                2,
                4.0,
                0.25,
                0.0,
                f64::INFINITY,
                1,
                0.25,
                LevelFlags {
                    degenerate_interval: true,
                    ..LevelFlags::default()
                },
            ),
            LevelVariance::new(
                3,
                8.0,
                f64::NAN,
                f64::NAN,
                f64::NAN,
                0,
                0.0,
                LevelFlags {
                    degenerate: true,
                    ..LevelFlags::default()
                },
            ),
        ];
        WaveletVarianceResult::new(
            Decomposition::Modwt,
            "haar".into(),
            Some(0.6),
            0.05,
            Some("min".into()),
            100,
            100,
            levels,
            vec![
                Warning::DegenerateInterval { level: 2, dof: 0.25 },
                Warning::DegenerateLevel { level: 3 },
            ],
        )
    }

    #[test]
    fn accessors() {
        let result = sample();
        assert_eq!(result.n_levels(), 3);
        assert_eq!(result.scales(), vec![2.0, 4.0, 8.0]);
        assert!(result.is_robust());
        assert_eq!(result.efficiency(), Some(0.6));
        assert_eq!(result.unit(), Some("min"));
        assert_eq!(result.level(2).unwrap().valid_count(), 1);
        assert!(result.level(0).is_none());
        assert!(result.level(3).unwrap().flags().degenerate);
        assert!(!result.level(1).unwrap().flags().any());
        assert!(result.check().is_ok());
    }

    #[test]
    fn non_finite_values_survive_json() {
        let result = sample();
        let json = result.to_json().unwrap();
        assert!(json.contains("\"upper\": \"inf\""));
        assert!(json.contains("\"variance\": null"));
        assert!(json.contains("\"kind\": \"degenerate_level\""));

        let back: WaveletVarianceResult = serde_json::from_str(&json).unwrap();
        let level2 = back.level(2).unwrap();
        assert_eq!(level2.upper(), f64::INFINITY);
        assert!(back.level(3).unwrap().variance().is_nan());
        assert_eq!(back.level(1).unwrap(), result.level(1).unwrap());
        assert_eq!(back.warnings(), result.warnings());
    }

    #[test]
    fn warning_display() {
        let w = Warning::Truncated {
            original: 1000,
            used: 992,
        };
        assert_eq!(w.to_string(), "series truncated from 1000 to 992 samples");
        let w = Warning::NotConverged {
            level: 2,
            iterations: 100,
        };
        assert_eq!(
            w.to_string(),
            "robust estimate at level 2 did not converge after 100 iterations"
        );
    }

    #[test]
    fn check_rejects_gaps() {
        let mut result = sample();
        result.levels.remove(1);
        assert!(result.check().unwrap_err().contains("level 3"));
    }

    #[test]
    fn check_rejects_flag_mismatch() {
        let mut result = sample();
        result.robust = false;
        assert!(result.check().is_err());
    }
}
