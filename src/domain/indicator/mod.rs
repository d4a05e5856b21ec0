//! Feature column identities and the windowed computers that fill them.
//!
//! - `FeatureKind`: typed identity of a derived column; its `Display` is the
//!   output column name
//! - `FeatureColumn`: one derived column, aligned row-for-row with the candles
//! - `UNDEFINED`: the value stored wherever a feature has no result

pub mod atr;
pub mod bollinger;
pub mod dispersion;
pub mod flow;
pub mod returns;
pub mod rsi;
pub mod trend;

use std::fmt;

/// Marker for a warm-up position or a degenerate (0/0) result.
///
/// Division of a non-zero value by zero yields ±infinity instead; such values
/// are kept as-is and are not treated as undefined by the row trim.
pub const UNDEFINED: f64 = f64::NAN;

/// True when `value` carries no result.
pub fn is_undefined(value: f64) -> bool {
    value.is_nan()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureKind {
    LogReturns,
    CloseMean,
    CloseStd,
    ZScoreClose,
    Volatility(usize),
    Sma(usize),
    Ema(usize),
    BollingerMiddle(usize),
    BollingerUpper(usize),
    BollingerLower(usize),
    BollingerWidth(usize),
    Rsi(usize),
    ZRsi(usize),
    Atr(usize),
    Ofi,
    VolumeDelta,
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureKind::LogReturns => write!(f, "Log_Returns"),
            FeatureKind::CloseMean => write!(f, "Close_Mean"),
            FeatureKind::CloseStd => write!(f, "Close_Std"),
            FeatureKind::ZScoreClose => write!(f, "Z_Score_Close"),
            FeatureKind::Volatility(w) => write!(f, "Volatility_Close_{}", w),
            FeatureKind::Sma(w) => write!(f, "SMA_{}", w),
            FeatureKind::Ema(w) => write!(f, "EMA_{}", w),
            FeatureKind::BollingerMiddle(w) => write!(f, "Bollinger_MA_{}", w),
            FeatureKind::BollingerUpper(w) => write!(f, "Bollinger_Upper_{}", w),
            FeatureKind::BollingerLower(w) => write!(f, "Bollinger_Lower_{}", w),
            FeatureKind::BollingerWidth(w) => write!(f, "Bollinger_Width_{}", w),
            FeatureKind::Rsi(w) => write!(f, "RSI_{}", w),
            FeatureKind::ZRsi(w) => write!(f, "Z_RSI_{}", w),
            FeatureKind::Atr(w) => write!(f, "ATR_{}", w),
            FeatureKind::Ofi => write!(f, "OFI"),
            FeatureKind::VolumeDelta => write!(f, "Volume_Delta"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub kind: FeatureKind,
    pub values: Vec<f64>,
}

impl FeatureColumn {
    pub fn new(kind: FeatureKind, values: Vec<f64>) -> Self {
        Self { kind, values }
    }

    /// Number of leading undefined values.
    pub fn warmup_len(&self) -> usize {
        self.values.iter().take_while(|v| is_undefined(**v)).count()
    }

    /// Count of undefined values after the warm-up span.
    pub fn degenerate_count(&self) -> usize {
        self.values
            .iter()
            .skip(self.warmup_len())
            .filter(|v| is_undefined(**v))
            .count()
    }
}
