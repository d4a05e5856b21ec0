//! Bollinger Bands.
//!
//! - Middle: SMA over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//! - Width: Upper - Lower
//!
//! StdDev is the rolling sample standard deviation (divides by N-1), the same
//! statistic the dispersion columns use.
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) values are undefined.

use crate::domain::indicator_helpers::{rolling_mean, rolling_std};

pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub period: usize,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub lower: Vec<f64>,
    pub width: Vec<f64>,
}

pub fn calculate_bollinger(closes: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let middle = rolling_mean(closes, period);
    let std = rolling_std(closes, period);

    let upper: Vec<f64> = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m + multiplier * s)
        .collect();
    let lower: Vec<f64> = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m - multiplier * s)
        .collect();
    let width = upper.iter().zip(&lower).map(|(u, l)| u - l).collect();

    BollingerBands {
        period,
        middle,
        upper,
        lower,
        width,
    }
}
