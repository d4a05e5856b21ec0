//! RSI (Relative Strength Index) with a globally normalized companion.
//!
//! Average gain/loss are simple rolling means over n price changes:
//! - gain[i] = max(C[i] - C[i-1], 0), loss[i] = max(C[i-1] - C[i], 0)
//! - the first bar has no prior close and counts as neither gain nor loss
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! Warmup: first (n-1) values are undefined.
//!
//! The normalized variant is a population z-score over every defined RSI
//! value of the whole series, not a rolling one. Unlike the rolling close
//! z-score in `dispersion`, where a zero deviation leaves the value
//! undefined, a zero global deviation maps every defined position to 0.0.

use crate::domain::indicator::{UNDEFINED, is_undefined};
use crate::domain::indicator_helpers::{diff, rolling_mean};

/// RSI when the window has gains but no losses.
pub const RSI_MAX: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RsiSeries {
    pub period: usize,
    pub rsi: Vec<f64>,
    pub normalized: Vec<f64>,
}

pub fn calculate_rsi(closes: &[f64], period: usize) -> RsiSeries {
    // The first bar has no prior close; its change counts as zero.
    let changes: Vec<f64> = diff(closes)
        .into_iter()
        .enumerate()
        .map(|(i, change)| if i == 0 { 0.0 } else { change })
        .collect();
    let gains: Vec<f64> = changes.iter().map(|c| c.max(0.0)).collect();
    let losses: Vec<f64> = changes.iter().map(|c| (-c).max(0.0)).collect();

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    let rsi: Vec<f64> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| rsi_from_averages(g, l))
        .collect();
    let normalized = normalize_global(&rsi);

    RsiSeries {
        period,
        rsi,
        normalized,
    }
}

/// RSI from one pair of averages.
///
/// avg_loss == 0 yields `RSI_MAX` when there were gains and `UNDEFINED` when
/// the window was flat.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if is_undefined(avg_gain) || is_undefined(avg_loss) {
        return UNDEFINED;
    }
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { RSI_MAX } else { UNDEFINED };
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}

/// Population z-score over the defined values of `values`.
///
/// Undefined positions are excluded from the mean and deviation and stay
/// undefined in the output. A series with zero deviation maps every defined
/// position to 0.0.
pub fn normalize_global(values: &[f64]) -> Vec<f64> {
    let defined: Vec<f64> = values.iter().copied().filter(|v| !is_undefined(*v)).collect();
    if defined.is_empty() {
        return vec![UNDEFINED; values.len()];
    }

    let n = defined.len() as f64;
    let mean = defined.iter().sum::<f64>() / n;
    let variance = defined
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let std = variance.sqrt();

    values
        .iter()
        .map(|&v| {
            if is_undefined(v) {
                UNDEFINED
            } else if std == 0.0 {
                0.0
            } else {
                (v - mean) / std
            }
        })
        .collect()
}
