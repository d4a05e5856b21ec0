//! Rolling dispersion of a series: mean, sample standard deviation, z-score.
//!
//! Z[i] = (X[i] - MEAN(n)[i]) / STD(n)[i]
//! A zero deviation (constant window) makes Z[i] undefined or infinite; the
//! value is propagated, not rejected.
//! Warmup: first (n-1) values are undefined.

use crate::domain::indicator_helpers::{rolling_mean, rolling_std, standardize};

#[derive(Debug, Clone, PartialEq)]
pub struct Dispersion {
    pub window: usize,
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
    pub z_score: Vec<f64>,
}

pub fn calculate_dispersion(values: &[f64], window: usize) -> Dispersion {
    let mean = rolling_mean(values, window);
    let std = rolling_std(values, window);
    let z_score = standardize(values, &mean, &std);

    Dispersion {
        window,
        mean,
        std,
        z_score,
    }
}

/// Rolling sample standard deviation, published as volatility.
pub fn calculate_volatility(values: &[f64], window: usize) -> Vec<f64> {
    rolling_std(values, window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn dispersion_warmup() {
        let d = calculate_dispersion(&[10.0, 20.0, 30.0, 40.0, 50.0], 3);
        for i in 0..2 {
            assert!(d.mean[i].is_nan());
            assert!(d.std[i].is_nan());
            assert!(d.z_score[i].is_nan());
        }
        for i in 2..5 {
            assert!(d.mean[i].is_finite());
            assert!(d.std[i].is_finite());
            assert!(d.z_score[i].is_finite());
        }
    }

    #[test]
    fn dispersion_basic_calculation() {
        let d = calculate_dispersion(&[10.0, 20.0, 30.0], 3);
        // mean 20, sample std 10
        assert_relative_eq!(d.mean[2], 20.0);
        assert_relative_eq!(d.std[2], 10.0);
        assert_relative_eq!(d.z_score[2], 1.0);
    }

    #[test]
    fn dispersion_constant_series_is_degenerate() {
        let d = calculate_dispersion(&[100.0; 5], 3);
        for i in 2..5 {
            assert_eq!(d.std[i], 0.0);
            assert!(d.z_score[i].is_nan());
        }
    }

    #[test]
    fn volatility_matches_dispersion_std() {
        let values = [1.0, 3.0, 2.0, 5.0, 4.0, 8.0];
        let d = calculate_dispersion(&values, 4);
        let vol = calculate_volatility(&values, 4);
        for (a, b) in d.std.iter().zip(&vol) {
            assert!(a.to_bits() == b.to_bits());
        }
    }
}
