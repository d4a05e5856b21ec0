//! Configuration validation.
//!
//! Every key in `[features]` is optional and falls back to its default; a key
//! that is present must hold a usable value.

use crate::domain::error::FeatureError;
use crate::domain::feature_config::{MIN_DEVIATION_WINDOW, parse_windows};
use crate::ports::config_port::ConfigPort;
use std::collections::BTreeSet;

pub const FEATURES_SECTION: &str = "features";

pub const WINDOW_SET_KEYS: [&str; 5] = [
    "sma_windows",
    "ema_windows",
    "bollinger_windows",
    "rsi_windows",
    "atr_windows",
];

pub fn validate_feature_config(config: &dyn ConfigPort) -> Result<(), FeatureError> {
    for key in WINDOW_SET_KEYS {
        window_set(config, key, &BTreeSet::new())?;
    }
    single_window(config, "zscore_window", 20)?;
    single_window(config, "volatility_window", 20)?;
    bollinger_multiplier(config, 2.0)?;
    Ok(())
}

fn invalid(key: &str, reason: String) -> FeatureError {
    FeatureError::ConfigInvalid {
        section: FEATURES_SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}

/// Keys whose windows feed a rolling sample deviation.
const DEVIATION_KEYS: [&str; 3] = ["bollinger_windows", "zscore_window", "volatility_window"];

fn min_window(key: &str) -> usize {
    if DEVIATION_KEYS.contains(&key) {
        MIN_DEVIATION_WINDOW
    } else {
        1
    }
}

fn too_small(key: &str) -> FeatureError {
    invalid(
        key,
        format!(
            "sample deviation needs at least {} observations",
            MIN_DEVIATION_WINDOW
        ),
    )
}

/// Window set under `key`, or `default` when the key is absent. An empty
/// value yields an empty set.
pub fn window_set(
    config: &dyn ConfigPort,
    key: &str,
    default: &BTreeSet<usize>,
) -> Result<BTreeSet<usize>, FeatureError> {
    match config.get_string(FEATURES_SECTION, key) {
        None => Ok(default.clone()),
        Some(s) => {
            let windows = parse_windows(&s).map_err(|e| invalid(key, e.to_string()))?;
            if windows.iter().any(|&w| w < min_window(key)) {
                return Err(too_small(key));
            }
            Ok(windows)
        }
    }
}

/// Single positive window under `key`, or `default` when the key is absent.
pub fn single_window(
    config: &dyn ConfigPort,
    key: &str,
    default: usize,
) -> Result<usize, FeatureError> {
    match config.get_string(FEATURES_SECTION, key) {
        None => Ok(default),
        Some(s) => match s.trim().parse::<usize>() {
            Ok(0) => Err(invalid(key, "window must be positive".to_string())),
            Ok(w) if w < min_window(key) => Err(too_small(key)),
            Ok(w) => Ok(w),
            Err(_) => Err(invalid(key, format!("window {:?} is not an integer", s.trim()))),
        },
    }
}

pub fn bollinger_multiplier(config: &dyn ConfigPort, default: f64) -> Result<f64, FeatureError> {
    let key = "bollinger_multiplier";
    match config.get_string(FEATURES_SECTION, key) {
        None => Ok(default),
        Some(s) => match s.trim().parse::<f64>() {
            Ok(k) if k.is_finite() && k > 0.0 => Ok(k),
            Ok(_) => Err(invalid(key, "multiplier must be positive and finite".to_string())),
            Err(_) => Err(invalid(key, format!("multiplier {:?} is not a number", s.trim()))),
        },
    }
}
