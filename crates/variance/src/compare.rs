//! Joint plotting range over several wavelet variance results.

use serde::{Deserialize, Serialize};

use crate::error::VarianceError;
use crate::result::WaveletVarianceResult;

/// Shared scale and variance range of a set of results.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointRange {
    pub scale_min: f64,
    pub scale_max: f64,
    pub variance_min: f64,
    pub variance_max: f64,
}

#[derive(Clone, Copy)]
struct Span {
    min: f64,
    max: f64,
}

impl Span {
    fn empty() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    fn push(&mut self, value: f64) {
        if value.is_finite() {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
    }

    fn or_nan(self) -> (f64, f64) {
        if self.min <= self.max {
            (self.min, self.max)
        } else {
            (f64::NAN, f64::NAN)
        }
    }
}

/// Computes the range covering every scale and every finite interval
/// bound of `results`.
///
/// Where a bound is not finite the point estimate stands in for it. Levels
/// without any finite value are skipped; if nothing finite remains the
/// variance range is NaN.
///
/// # Errors
///
/// Returns [`VarianceError::NoResultsGiven`] for an empty slice.
pub fn joint_range(results: &[&WaveletVarianceResult]) -> Result<JointRange, VarianceError> {
    if results.is_empty() {
        return Err(VarianceError::NoResultsGiven);
    }

    let mut scales = Span::empty();
    let mut variances = Span::empty();
    for result in results {
        for level in result.levels() {
            scales.push(level.scale());
            let point = level.variance();
            let lower = if level.lower().is_finite() { level.lower() } else { point };
            let upper = if level.upper().is_finite() { level.upper() } else { point };
            variances.push(lower);
            variances.push(upper);
        }
    }

    let (scale_min, scale_max) = scales.or_nan();
    let (variance_min, variance_max) = variances.or_nan();
    Ok(JointRange {
        scale_min,
        scale_max,
        variance_min,
        variance_max,
    })
}

/// Parses a JSON document as a completed [`WaveletVarianceResult`].
///
/// # Errors
///
/// Returns [`VarianceError::TypeMismatch`] if the document is not a
/// wavelet variance result or its levels are inconsistent.
pub fn parse_result(json: &str) -> Result<WaveletVarianceResult, VarianceError> {
    let result: WaveletVarianceResult =
        serde_json::from_str(json).map_err(|e| VarianceError::TypeMismatch(e.to_string()))?;
    result.check().map_err(VarianceError::TypeMismatch)?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{LevelFlags, LevelVariance};
    use wvar_wavelet::Decomposition;

    fn result(scale0: f64, rows: &[(f64, f64, f64)]) -> WaveletVarianceResult {
        let levels = rows
            .iter()
            .enumerate()
            .map(|(i, &(v, lo, hi))| {
                LevelVariance::new(
                    i + 1,
                    scale0 * 2.0_f64.powi(i as i32),
                    v,
                    lo,
                    hi,
                    10,
                    5.0,
                    LevelFlags::default(),
                )
            })
            .collect();
        WaveletVarianceResult::new(
            Decomposition::Modwt,
            "haar".into(),
            None,
            0.05,
            None,
            64,
            64,
            levels,
            vec![],
        )
    }

    #[test]
    fn empty_input_fails() {
        assert!(matches!(joint_range(&[]), Err(VarianceError::NoResultsGiven)));
    }

    #[test]
    fn single_result_passes_through() {
        let r = result(2.0, &[(1.0, 0.5, 2.0), (0.5, 0.2, 0.9)]);
        let range = joint_range(&[&r]).unwrap();
        assert_eq!(
            range,
            JointRange {
                scale_min: 2.0,
                scale_max: 4.0,
                variance_min: 0.2,
                variance_max: 2.0,
            }
        );
    }

    #[test]
    fn union_over_results() {
        let a = result(2.0, &[(1.0, 0.5, 2.0)]);
        let b = result(1.0, &[(3.0, 2.0, 4.0), (0.1, 0.05, 0.2), (0.1, 0.01, 0.3)]);
        let range = joint_range(&[&a, &b]).unwrap();
        assert_eq!(range.scale_min, 1.0);
        assert_eq!(range.scale_max, 4.0);
        assert_eq!(range.variance_min, 0.01);
        assert_eq!(range.variance_max, 4.0);
    }

    #[test]
    fn non_finite_bounds_fall_back_to_point() {
        let r = result(2.0, &[(1.0, 0.0, f64::INFINITY), (f64::NAN, f64::NAN, f64::NAN)]);
        let range = joint_range(&[&r]).unwrap();
        assert_eq!(range.variance_min, 0.0);
        assert_eq!(range.variance_max, 1.0);
        assert_eq!(range.scale_max, 4.0);
    }

    #[test]
    fn parse_result_round_trip() {
        let r = result(2.0, &[(1.0, 0.5, 2.0)]);
        let parsed = parse_result(&r.to_json().unwrap()).unwrap();
        assert_eq!(parsed, r);
    }

    #[test]
    fn parse_result_rejects_other_documents() {
        for json in [
            "[1, 2, 3]",
            "{\"levels\": []}",
            "{\"scale_min\": 1.0, \"scale_max\": 2.0, \"variance_min\": 0.0, \"variance_max\": 1.0}",
            "not json",
        ] {
            assert!(matches!(parse_result(json), Err(VarianceError::TypeMismatch(_))));
        }
    }

    #[test]
    fn parse_result_rejects_inconsistent_levels() {
        let r = result(2.0, &[(1.0, 0.5, 2.0), (0.5, 0.2, 0.9)]);
        let json = r.to_json().unwrap().replace("\"level\": 2", "\"level\": 5");
        let err = parse_result(&json).unwrap_err();
        assert!(matches!(err, VarianceError::TypeMismatch(m) if m.contains("level 5")));
    }
}
