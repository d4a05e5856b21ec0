//! Simple and exponential moving averages.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]); warmup: first (n-1) values undefined.
//!
//! EMA: k = 2/(n+1), seeded with the first observation rather than an
//! n-period SMA, then EMA[i] = C[i]*k + EMA[i-1]*(1-k). No warmup.

use crate::domain::indicator_helpers::rolling_mean;

pub fn calculate_sma(values: &[f64], period: usize) -> Vec<f64> {
    rolling_mean(values, period)
}

pub fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

pub fn calculate_ema(values: &[f64], period: usize) -> Vec<f64> {
    let k = smoothing_factor(period);
    let mut out = Vec::with_capacity(values.len());

    let mut iter = values.iter();
    let Some(&first) = iter.next() else {
        return out;
    };

    let mut ema = first;
    out.push(ema);
    for &value in iter {
        ema = value * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}
