//! Wavelet filter taps and the filter bank that names them.

use std::collections::BTreeMap;
use std::f64::consts::{FRAC_1_SQRT_2, SQRT_2};

use crate::error::WaveletError;

const TAP_TOLERANCE: f64 = 1e-10;

/// Daubechies extremal-phase scaling filter of length 4.
const D4_SCALING: [f64; 4] = [
    0.482_962_913_144_534_1,
    0.836_516_303_737_807_9,
    0.224_143_868_042_013_4,
    -0.129_409_522_551_260_4,
];

/// Least Asymmetric LA(8) scaling filter.
const LA8_SCALING: [f64; 8] = [
    -0.075_765_714_789_273_33,
    -0.029_635_527_645_998_51,
    0.497_618_667_632_015_45,
    0.803_738_751_805_916_1,
    0.297_857_795_605_277_36,
    -0.099_219_543_576_847_22,
    -0.012_603_967_262_037_833,
    0.032_223_100_604_042_7,
];

/// Wavelet and scaling filter taps for one orthonormal wavelet family.
///
/// The wavelet (high-pass) filter is derived from the scaling (low-pass)
/// filter by the quadrature mirror relation `h_l = (-1)^l g_{L-1-l}`.
///
/// # Example
///
/// ```ignore
/// use wvar_wavelet::FilterTaps;
///
/// let haar = FilterTaps::haar();
/// assert_eq!(haar.length(), 2);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct FilterTaps {
    name: String,
    wavelet: Vec<f64>,
    scaling: Vec<f64>,
}

impl FilterTaps {
    /// Builds taps from a scaling filter, deriving the wavelet filter.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`WaveletError::InvalidFilter`] | odd or short length, taps not summing to √2, not orthonormal to even shifts |
    pub fn from_scaling(name: impl Into<String>, scaling: Vec<f64>) -> Result<Self, WaveletError> {
        let name = name.into();
        let l = scaling.len();
        if l < 2 || l % 2 != 0 {
            return Err(WaveletError::InvalidFilter(format!(
                "{name}: length must be even and at least 2, got {l}"
            )));
        }
        if scaling.iter().any(|v| !v.is_finite()) {
            return Err(WaveletError::InvalidFilter(format!(
                "{name}: taps must be finite"
            )));
        }
        let sum: f64 = scaling.iter().sum();
        if (sum - SQRT_2).abs() > TAP_TOLERANCE {
            return Err(WaveletError::InvalidFilter(format!(
                "{name}: scaling taps sum to {sum}, expected sqrt(2)"
            )));
        }
        for shift in (0..l).step_by(2) {
            let dot: f64 = (0..l - shift).map(|i| scaling[i] * scaling[i + shift]).sum();
            let expected = if shift == 0 { 1.0 } else { 0.0 };
            if (dot - expected).abs() > TAP_TOLERANCE {
                return Err(WaveletError::InvalidFilter(format!(
                    "{name}: not orthonormal at shift {shift} (inner product {dot})"
                )));
            }
        }

        let wavelet = (0..l)
            .map(|i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                sign * scaling[l - 1 - i]
            })
            .collect();

        Ok(Self {
            name,
            wavelet,
            scaling,
        })
    }

    /// The Haar filter: wavelet `[1/√2, -1/√2]`, scaling `[1/√2, 1/√2]`.
    pub fn haar() -> Self {
        Self {
            name: "haar".to_string(),
            wavelet: vec![FRAC_1_SQRT_2, -FRAC_1_SQRT_2],
            scaling: vec![FRAC_1_SQRT_2, FRAC_1_SQRT_2],
        }
    }

    /// Returns the family name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the filter length `L`.
    pub fn length(&self) -> usize {
        self.scaling.len()
    }

    /// Width of the level-`level` equivalent filter,
    /// `L_j = (2^j - 1)(L - 1) + 1`, or `None` on overflow.
    pub fn width(&self, level: usize) -> Option<usize> {
        let dilation = 1usize.checked_shl(u32::try_from(level).ok()?)?;
        (dilation - 1)
            .checked_mul(self.length().saturating_sub(1))?
            .checked_add(1)
    }

    /// Returns the wavelet (high-pass) taps.
    pub fn wavelet(&self) -> &[f64] {
        &self.wavelet
    }

    /// Returns the scaling (low-pass) taps.
    pub fn scaling(&self) -> &[f64] {
        &self.scaling
    }
}

/// Named collection of wavelet families.
///
/// [`FilterBank::default`] holds the built-in `haar`, `d4` and `la8`
/// families; further orthonormal families can be added with
/// [`FilterBank::register`]. Names are case-insensitive.
#[derive(Clone, Debug)]
pub struct FilterBank {
    families: BTreeMap<String, FilterTaps>,
}

impl FilterBank {
    /// Creates an empty filter bank.
    pub fn empty() -> Self {
        Self {
            families: BTreeMap::new(),
        }
    }

    /// Registers a family by its scaling taps, replacing any family of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::InvalidFilter`] if the taps are not orthonormal.
    pub fn register(&mut self, name: &str, scaling: Vec<f64>) -> Result<(), WaveletError> {
        let key = name.to_lowercase();
        let taps = FilterTaps::from_scaling(key.clone(), scaling)?;
        self.families.insert(key, taps);
        Ok(())
    }

    /// Looks up the taps for a named family.
    ///
    /// # Errors
    ///
    /// Returns [`WaveletError::UnknownFilter`] if the name is not registered.
    pub fn filter_for(&self, name: &str) -> Result<FilterTaps, WaveletError> {
        self.families
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| WaveletError::UnknownFilter(name.to_string()))
    }

    /// Returns the registered family names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(|k| k.as_str())
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        let mut families = BTreeMap::new();
        families.insert("haar".to_string(), FilterTaps::haar());
        for (name, taps) in [("d4", &D4_SCALING[..]), ("la8", &LA8_SCALING[..])] {
            // Built-in tables satisfy the orthonormality checks.
            if let Ok(filter) = FilterTaps::from_scaling(name, taps.to_vec()) {
                families.insert(name.to_string(), filter);
            }
        }
        Self { families }
    }
}

/// Looks up a built-in wavelet family by name.
///
/// # Errors
///
/// Returns [`WaveletError::UnknownFilter`] if the name is not built in.
pub fn filter_for(name: &str) -> Result<FilterTaps, WaveletError> {
    FilterBank::default().filter_for(name)
}
