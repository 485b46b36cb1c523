//! Maximal Overlap Discrete Wavelet Transform (MODWT) pyramid.

use std::f64::consts::SQRT_2;

use crate::filter::FilterTaps;

/// Deepest level whose equivalent filter fits in a length-`n` series.
///
/// The level-`J` equivalent filter has width `L_J = (2^J - 1)(L - 1) + 1`,
/// which must not exceed `n`. For Haar this is `floor(log2(n))`; every
/// such level keeps at least one boundary-free coefficient in both the
/// DWT and the MODWT.
///
/// # Example
///
/// ```ignore
/// use wvar_wavelet::{filter_for, max_filter_level};
///
/// let la8 = filter_for("la8")?;
/// assert_eq!(max_filter_level(256, &la8), 5);
/// ```
pub fn max_filter_level(n: usize, filter: &FilterTaps) -> usize {
    if filter.length() < 2 {
        return 0;
    }
    let mut level = 0;
    while filter.width(level + 1).is_some_and(|w| w <= n) {
        level += 1;
    }
    level
}

/// Number of leading level-`level` MODWT coefficients whose filter window
/// wraps past the start of a length-`n` series: `L_j - 1`, capped at `n`.
pub(crate) fn modwt_boundary_count(filter_len: usize, level: usize, n: usize) -> usize {
    let width_minus_one = ((1usize << level) - 1).saturating_mul(filter_len - 1);
    width_minus_one.min(n)
}

/// Runs the MODWT pyramid for `levels` levels.
///
/// Returns the wavelet coefficients per level (each of length `N`) and
/// the final scaling coefficients.
pub(crate) fn modwt_pyramid(
    data: &[f64],
    filter: &FilterTaps,
    levels: usize,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let n = data.len();
    let h: Vec<f64> = filter.wavelet().iter().map(|v| v / SQRT_2).collect();
    let g: Vec<f64> = filter.scaling().iter().map(|v| v / SQRT_2).collect();

    let mut current = data.to_vec();
    let mut details = Vec::with_capacity(levels);
    for j in 1..=levels {
        let dilation = (1usize << (j - 1)) % n;
        let mut w = vec![0.0; n];
        let mut v = vec![0.0; n];
        for t in 0..n {
            let mut k = t;
            let mut wt = 0.0;
            let mut vt = 0.0;
            for (hl, gl) in h.iter().zip(g.iter()) {
                wt += hl * current[k];
                vt += gl * current[k];
                k = (k + n - dilation) % n;
            }
            w[t] = wt;
            v[t] = vt;
        }
        details.push(w);
        current = v;
    }
    (details, current)
}
