//! Window sets and parameters for one feature-derivation run.

use crate::domain::indicator::bollinger::DEFAULT_MULTIPLIER;
use std::collections::BTreeSet;

/// Smallest window a sample standard deviation is defined over.
pub const MIN_DEVIATION_WINDOW: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    pub sma_windows: BTreeSet<usize>,
    pub ema_windows: BTreeSet<usize>,
    pub bollinger_windows: BTreeSet<usize>,
    pub rsi_windows: BTreeSet<usize>,
    pub atr_windows: BTreeSet<usize>,
    pub zscore_window: usize,
    pub volatility_window: usize,
    pub bollinger_multiplier: f64,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            sma_windows: BTreeSet::from([20, 50, 100]),
            ema_windows: BTreeSet::from([20, 50]),
            bollinger_windows: BTreeSet::from([20]),
            rsi_windows: BTreeSet::from([14]),
            atr_windows: BTreeSet::from([14]),
            zscore_window: 20,
            volatility_window: 20,
            bollinger_multiplier: DEFAULT_MULTIPLIER,
        }
    }
}

impl FeatureConfig {
    /// Largest rolling window requested. EMA windows are excluded since EMA
    /// has no warm-up.
    pub fn max_rolling_window(&self) -> usize {
        self.sma_windows
            .iter()
            .chain(&self.bollinger_windows)
            .chain(&self.rsi_windows)
            .chain(&self.atr_windows)
            .copied()
            .chain([self.zscore_window, self.volatility_window])
            .max()
            .unwrap_or(0)
    }

    /// Windows feeding a rolling sample deviation: the dispersion and
    /// volatility windows and every Bollinger window.
    pub fn deviation_windows(&self) -> impl Iterator<Item = usize> + '_ {
        self.bollinger_windows
            .iter()
            .copied()
            .chain([self.zscore_window, self.volatility_window])
    }

    /// Leading rows every run loses to warm-up: the largest rolling warm-up,
    /// and at least the single row log returns need.
    ///
    /// `None` when a deviation window is below `MIN_DEVIATION_WINDOW`; its
    /// column is undefined everywhere and the trim removes every row.
    pub fn warmup_rows(&self) -> Option<usize> {
        if self.deviation_windows().any(|w| w < MIN_DEVIATION_WINDOW) {
            return None;
        }
        Some(self.max_rolling_window().saturating_sub(1).max(1))
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WindowError {
    #[error("empty token in window list")]
    EmptyToken,

    #[error("window {0:?} is not an integer")]
    NotAnInteger(String),

    #[error("window must be positive")]
    Zero,
}

/// Parse a comma-separated list of window sizes. Duplicates collapse; an
/// empty list yields an empty set, which disables the family.
pub fn parse_windows(input: &str) -> Result<BTreeSet<usize>, WindowError> {
    if input.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    let mut windows = BTreeSet::new();
    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(WindowError::EmptyToken);
        }
        let window: usize = trimmed
            .parse()
            .map_err(|_| WindowError::NotAnInteger(trimmed.to_string()))?;
        if window == 0 {
            return Err(WindowError::Zero);
        }
        windows.insert(window);
    }

    Ok(windows)
}
