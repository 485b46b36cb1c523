//! Discrete Wavelet Transform (DWT) pyramid with periodic boundaries.

use crate::filter::FilterTaps;

/// Length of the largest prefix of `n` samples divisible by `2^levels`.
pub(crate) fn dwt_usable_len(n: usize, levels: usize) -> usize {
    let block = 1usize << levels;
    n - n % block
}

/// Number of leading level-`level` DWT coefficients affected by the
/// periodic boundary: `ceil((L - 2)(1 - 2^-j))`, capped at `len`.
pub(crate) fn dwt_boundary_count(filter_len: usize, level: usize, len: usize) -> usize {
    let l = filter_len as f64;
    let affected = ((l - 2.0) * (1.0 - 0.5_f64.powi(level as i32))).ceil();
    (affected.max(0.0) as usize).min(len)
}

/// One analysis step: filter `v` periodically and keep every second output.
fn dwt_step(v: &[f64], h: &[f64], g: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = v.len();
    let half = n / 2;
    let mut w = Vec::with_capacity(half);
    let mut s = Vec::with_capacity(half);
    for t in 0..half {
        let mut k = 2 * t + 1;
        let mut wt = 0.0;
        let mut st = 0.0;
        for (hl, gl) in h.iter().zip(g.iter()) {
            wt += hl * v[k];
            st += gl * v[k];
            k = if k == 0 { n - 1 } else { k - 1 };
        }
        w.push(wt);
        s.push(st);
    }
    (w, s)
}

/// Runs the DWT pyramid for `levels` levels on data whose length is a
/// multiple of `2^levels`.
///
/// Returns the wavelet coefficients per level (level `j` has `N / 2^j`
/// values) and the final scaling coefficients.
pub(crate) fn dwt_pyramid(
    data: &[f64],
    filter: &FilterTaps,
    levels: usize,
) -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut current = data.to_vec();
    let mut details = Vec::with_capacity(levels);
    for _ in 0..levels {
        let (w, v) = dwt_step(&current, filter.wavelet(), filter.scaling());
        details.push(w);
        current = v;
    }
    (details, current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterBank;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn usable_len_truncates_to_block() {
        assert_eq!(dwt_usable_len(100, 3), 96);
        assert_eq!(dwt_usable_len(64, 6), 64);
        assert_eq!(dwt_usable_len(10, 1), 10);
    }

    #[test]
    fn boundary_counts() {
        assert_eq!(dwt_boundary_count(2, 1, 32), 0);
        assert_eq!(dwt_boundary_count(2, 5, 2), 0);
        // D4: ceil(2 * 0.5) = 1, ceil(2 * 0.75) = 2
        assert_eq!(dwt_boundary_count(4, 1, 32), 1);
        assert_eq!(dwt_boundary_count(4, 2, 16), 2);
        // LA8 level 3: ceil(6 * 0.875) = 6, capped at the level length
        assert_eq!(dwt_boundary_count(8, 3, 4), 4);
    }

    #[test]
    fn haar_level_one_pairs() {
        let data = [1.0, 3.0, 6.0, 10.0];
        let (details, smooth) = dwt_pyramid(&data, &FilterTaps::haar(), 1);
        // W_t = (X_{2t+1} - X_{2t}) / sqrt(2)
        assert_relative_eq!(details[0][0], 2.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(details[0][1], 4.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(smooth[0], 4.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(smooth[1], 16.0 * FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn pyramid_halves_length_and_keeps_energy() {
        let data: Vec<f64> = (0..64)
            .map(|i| (i as f64 * 0.21).cos() * (1.0 + i as f64 / 64.0))
            .collect();
        let la8 = FilterBank::default().filter_for("la8").unwrap();
        let (details, smooth) = dwt_pyramid(&data, &la8, 4);
        let mut energy: f64 = smooth.iter().map(|x| x * x).sum();
        for (j, w) in details.iter().enumerate() {
            assert_eq!(w.len(), 64 >> (j + 1));
            energy += w.iter().map(|x| x * x).sum::<f64>();
        }
        assert_eq!(smooth.len(), 4);
        let expected: f64 = data.iter().map(|x| x * x).sum();
        assert_relative_eq!(energy, expected, max_relative = 1e-10);
    }
}
