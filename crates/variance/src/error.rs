//! Error types for the wvar-variance crate.

use wvar_wavelet::WaveletError;

/// Error type for all fallible operations in the wvar-variance crate.
///
/// Covers decomposition errors, estimator and interval configuration,
/// unit handling, and result aggregation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum VarianceError {
    /// Wavelet decomposition error.
    #[error(transparent)]
    Wavelet(#[from] WaveletError),

    /// Returned when a numeric parameter is out of its domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Returned when the robust estimator is asked for more than 0.99 efficiency.
    #[error("efficiency {0} is too high for the robust estimator; use the classical estimator instead")]
    EfficiencyTooHigh(f64),

    /// Returned when `alpha` is not strictly between 0 and 1.
    #[error("invalid confidence level: alpha = {0}, expected 0 < alpha < 1")]
    InvalidConfidenceLevel(f64),

    /// Returned when a time unit string is not recognized.
    #[error("unsupported time unit: {0}")]
    UnsupportedUnit(String),

    /// Returned when a comparison is requested over zero results.
    #[error("no results given to compare")]
    NoResultsGiven,

    /// Returned when a comparison input is not a completed wavelet variance result.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_wavelet_transparent() {
        let inner = WaveletError::UnknownFilter("coif4".into());
        let err = VarianceError::from(inner);
        assert_eq!(err.to_string(), "unknown wavelet filter: coif4");
    }

    #[test]
    fn error_invalid_input() {
        let err = VarianceError::InvalidInput("sampling frequency must be positive".into());
        assert_eq!(
            err.to_string(),
            "invalid input: sampling frequency must be positive"
        );
    }

    #[test]
    fn error_efficiency_too_high() {
        let err = VarianceError::EfficiencyTooHigh(0.995);
        assert_eq!(
            err.to_string(),
            "efficiency 0.995 is too high for the robust estimator; use the classical estimator instead"
        );
    }

    #[test]
    fn error_invalid_confidence_level() {
        let err = VarianceError::InvalidConfidenceLevel(1.5);
        assert_eq!(
            err.to_string(),
            "invalid confidence level: alpha = 1.5, expected 0 < alpha < 1"
        );
    }

    #[test]
    fn error_unsupported_unit() {
        let err = VarianceError::UnsupportedUnit("fortnight".into());
        assert_eq!(err.to_string(), "unsupported time unit: fortnight");
    }

    #[test]
    fn error_no_results() {
        assert_eq!(
            VarianceError::NoResultsGiven.to_string(),
            "no results given to compare"
        );
    }

    #[test]
    fn error_type_mismatch() {
        let err = VarianceError::TypeMismatch("missing field `levels`".into());
        assert_eq!(err.to_string(), "type mismatch: missing field `levels`");
    }

    #[test]
    fn error_serialization() {
        let err = VarianceError::Serialization {
            reason: "key must be a string".into(),
        };
        assert_eq!(err.to_string(), "serialization error: key must be a string");
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<VarianceError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<VarianceError>();
    }
}
