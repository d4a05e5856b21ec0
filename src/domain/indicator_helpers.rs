//! Shared rolling-window helpers for the feature computers.
//!
//! Every window is trailing and inclusive of the current row: the value at
//! index `i` is computed from `values[i + 1 - window..=i]`. The first
//! `window - 1` positions are undefined. A window that contains an undefined
//! value produces an undefined result.

use crate::domain::indicator::UNDEFINED;

/// Apply `f` to each full trailing window of `values`.
pub fn rolling_apply<F>(values: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if window == 0 {
        return vec![UNDEFINED; values.len()];
    }

    let warmup = window - 1;
    (0..values.len())
        .map(|i| {
            if i < warmup {
                UNDEFINED
            } else {
                f(&values[i + 1 - window..=i])
            }
        })
        .collect()
}

pub fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Sample standard deviation (divisor n - 1). A single value yields NaN.
pub fn sample_std(window: &[f64]) -> f64 {
    let m = mean(window);
    let sum_sq: f64 = window
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum();
    (sum_sq / (window.len() as f64 - 1.0)).sqrt()
}

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, mean)
}

pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(values, window, sample_std)
}

/// Element-wise `(x - centre) / scale`.
pub fn standardize(values: &[f64], centre: &[f64], scale: &[f64]) -> Vec<f64> {
    values
        .iter()
        .zip(centre)
        .zip(scale)
        .map(|((x, c), s)| (x - c) / s)
        .collect()
}

/// First difference; index 0 is undefined.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(values.len());
    if values.is_empty() {
        return out;
    }
    out.push(UNDEFINED);
    out.extend(values.windows(2).map(|pair| pair[1] - pair[0]));
    out
}
