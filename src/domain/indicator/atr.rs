//! Average True Range.
//!
//! TR[i] = max(H[i] - L[i], |H[i] - C[i-1]|, |L[i] - C[i-1]|), with TR[0] = H[0] - L[0].
//! ATR(n)[i] = mean(TR[i-n+1..=i]).
//! Warmup: first (n-1) values are undefined. The true range itself is not
//! published as a feature.

use crate::domain::candle::Candle;
use crate::domain::indicator_helpers::rolling_mean;

pub fn true_ranges(candles: &[Candle]) -> Vec<f64> {
    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let prev_close = i.checked_sub(1).map(|p| candles[p].close);
            candle.true_range(prev_close)
        })
        .collect()
}

pub fn calculate_atr(candles: &[Candle], period: usize) -> Vec<f64> {
    rolling_mean(&true_ranges(candles), period)
}
