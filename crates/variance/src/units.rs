//! Scale axis construction and time-unit conversion.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::VarianceError;

/// Physical time unit of a scale axis.
///
/// Months are 30 days and years 365 days.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Nanosecond,
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl TimeUnit {
    /// Length of one unit in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            Self::Nanosecond => 1e-9,
            Self::Millisecond => 1e-3,
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3_600.0,
            Self::Day => 86_400.0,
            Self::Month => 30.0 * 86_400.0,
            Self::Year => 365.0 * 86_400.0,
        }
    }

    /// Short label used in results.
    pub fn label(self) -> &'static str {
        match self {
            Self::Nanosecond => "ns",
            Self::Millisecond => "ms",
            Self::Second => "sec",
            Self::Minute => "min",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeUnit {
    type Err = VarianceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ns" | "nanosecond" | "nanoseconds" => Ok(Self::Nanosecond),
            "ms" | "millisecond" | "milliseconds" => Ok(Self::Millisecond),
            "s" | "sec" | "second" | "seconds" => Ok(Self::Second),
            "min" | "minute" | "minutes" => Ok(Self::Minute),
            "h" | "hour" | "hours" => Ok(Self::Hour),
            "d" | "day" | "days" => Ok(Self::Day),
            "month" | "months" => Ok(Self::Month),
            "y" | "year" | "years" => Ok(Self::Year),
            _ => Err(VarianceError::UnsupportedUnit(s.to_string())),
        }
    }
}

/// Dyadic scales `2^j / f` for `j = 1..=levels`.
///
/// # Errors
///
/// Returns [`VarianceError::InvalidInput`] if `sampling_frequency` is not
/// finite and positive.
pub fn scales(levels: usize, sampling_frequency: f64) -> Result<Vec<f64>, VarianceError> {
    if !sampling_frequency.is_finite() || sampling_frequency <= 0.0 {
        return Err(VarianceError::InvalidInput(format!(
            "sampling frequency must be finite and positive, got {sampling_frequency}"
        )));
    }
    Ok((1..=levels)
        .map(|j| 2.0_f64.powi(j as i32) / sampling_frequency)
        .collect())
}

/// Scale axis after an optional unit conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct Conversion {
    scales: Vec<f64>,
    unit: Option<TimeUnit>,
    skipped: bool,
}

impl Conversion {
    /// Returns the (possibly rescaled) scales.
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }

    /// Returns the unit the scales are expressed in, if known.
    pub fn unit(&self) -> Option<TimeUnit> {
        self.unit
    }

    /// Returns `true` if a target unit was given without a source unit.
    pub fn skipped(&self) -> bool {
        self.skipped
    }

    /// Consumes the conversion, returning the scales.
    pub fn into_scales(self) -> Vec<f64> {
        self.scales
    }
}

/// Rescales `scales` from unit `from` to unit `to`.
///
/// | `from` | `to` | Result |
/// |--------|------|--------|
/// | some | some | rescaled by `seconds(from) / seconds(to)`, labelled `to` |
/// | some | none | unchanged, labelled `from` |
/// | none | some | unchanged, unlabelled, `skipped` set |
/// | none | none | unchanged, unlabelled |
///
/// # Errors
///
/// Returns [`VarianceError::UnsupportedUnit`] for an unknown unit string.
pub fn convert(
    scales: &[f64],
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Conversion, VarianceError> {
    let from = from.map(str::parse::<TimeUnit>).transpose()?;
    let to = to.map(str::parse::<TimeUnit>).transpose()?;

    match (from, to) {
        (Some(from), Some(to)) => Ok(Conversion {
            scales: scales
                .iter()
                .map(|s| s * from.seconds() / to.seconds())
                .collect(),
            unit: Some(to),
            skipped: false,
        }),
        (None, Some(to)) => {
            warn!(to = %to, "target unit given without a source unit; scales left unconverted");
            Ok(Conversion {
                scales: scales.to_vec(),
                unit: None,
                skipped: true,
            })
        }
        (from, None) => Ok(Conversion {
            scales: scales.to_vec(),
            unit: from,
            skipped: false,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dyadic_scales() {
        assert_eq!(scales(4, 1.0).unwrap(), vec![2.0, 4.0, 8.0, 16.0]);
        assert_eq!(scales(3, 4.0).unwrap(), vec![0.5, 1.0, 2.0]);
        assert!(scales(0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn bad_frequency_rejected() {
        for f in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(scales(3, f), Err(VarianceError::InvalidInput(_))));
        }
    }

    #[test]
    fn seconds_to_minutes() {
        let conv = convert(&[60.0, 120.0, 90.0], Some("sec"), Some("min")).unwrap();
        assert_eq!(conv.scales(), &[1.0, 2.0, 1.5]);
        assert_eq!(conv.unit(), Some(TimeUnit::Minute));
        assert!(!conv.skipped());
    }

    #[test]
    fn days_to_years() {
        let conv = convert(&[365.0], Some("day"), Some("year")).unwrap();
        assert_relative_eq!(conv.scales()[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn target_without_source_is_skipped() {
        let conv = convert(&[2.0, 4.0], None, Some("hour")).unwrap();
        assert_eq!(conv.scales(), &[2.0, 4.0]);
        assert_eq!(conv.unit(), None);
        assert!(conv.skipped());
    }

    #[test]
    fn source_only_labels() {
        let conv = convert(&[2.0], Some("ms"), None).unwrap();
        assert_eq!(conv.scales(), &[2.0]);
        assert_eq!(conv.unit(), Some(TimeUnit::Millisecond));
        assert!(!conv.skipped());
    }

    #[test]
    fn unknown_unit_rejected() {
        let err = convert(&[2.0], Some("fortnight"), Some("day")).unwrap_err();
        assert!(matches!(err, VarianceError::UnsupportedUnit(u) if u == "fortnight"));
        assert!(convert(&[2.0], Some("sec"), Some("eon")).is_err());
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("MIN".parse::<TimeUnit>().unwrap(), TimeUnit::Minute);
        assert_eq!("Second".parse::<TimeUnit>().unwrap(), TimeUnit::Second);
        assert_eq!(TimeUnit::Month.seconds(), 2_592_000.0);
        assert_eq!(TimeUnit::Hour.to_string(), "hour");
    }
}
