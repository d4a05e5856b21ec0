//! Feature-derivation pipeline for one symbol.
//!
//! Stage order is fixed: log returns, close dispersion, volatility, SMA set,
//! EMA set, Bollinger set, RSI set (each with its normalized variant), ATR
//! set, order-flow imbalance, volume delta. Each computer borrows its inputs
//! and returns owned columns; the table is assembled here and trimmed once at
//! the end.

use crate::domain::candle::{Candle, closes};
use crate::domain::error::FeatureError;
use crate::domain::feature_config::FeatureConfig;
use crate::domain::feature_table::FeatureTable;
use crate::domain::indicator::atr::calculate_atr;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::dispersion::{calculate_dispersion, calculate_volatility};
use crate::domain::indicator::flow::calculate_order_flow;
use crate::domain::indicator::returns::calculate_log_returns;
use crate::domain::indicator::rsi::calculate_rsi;
use crate::domain::indicator::trend::{calculate_ema, calculate_sma};
use crate::domain::indicator::{FeatureColumn, FeatureKind};
use tracing::{debug, info, warn};

/// Compute every configured column over `candles`, untrimmed.
pub fn derive_columns(candles: &[Candle], config: &FeatureConfig) -> Vec<FeatureColumn> {
    let close = closes(candles);
    let mut columns = Vec::new();

    debug!(stage = "returns");
    columns.push(FeatureColumn::new(
        FeatureKind::LogReturns,
        calculate_log_returns(&close),
    ));

    debug!(stage = "dispersion", window = config.zscore_window);
    let dispersion = calculate_dispersion(&close, config.zscore_window);
    columns.push(FeatureColumn::new(FeatureKind::CloseMean, dispersion.mean));
    columns.push(FeatureColumn::new(FeatureKind::CloseStd, dispersion.std));
    columns.push(FeatureColumn::new(
        FeatureKind::ZScoreClose,
        dispersion.z_score,
    ));
    columns.push(FeatureColumn::new(
        FeatureKind::Volatility(config.volatility_window),
        calculate_volatility(&close, config.volatility_window),
    ));

    for &w in &config.sma_windows {
        debug!(stage = "sma", window = w);
        columns.push(FeatureColumn::new(FeatureKind::Sma(w), calculate_sma(&close, w)));
    }

    for &w in &config.ema_windows {
        debug!(stage = "ema", window = w);
        columns.push(FeatureColumn::new(FeatureKind::Ema(w), calculate_ema(&close, w)));
    }

    for &w in &config.bollinger_windows {
        debug!(stage = "bollinger", window = w);
        let bands = calculate_bollinger(&close, w, config.bollinger_multiplier);
        columns.push(FeatureColumn::new(FeatureKind::BollingerMiddle(w), bands.middle));
        columns.push(FeatureColumn::new(FeatureKind::BollingerUpper(w), bands.upper));
        columns.push(FeatureColumn::new(FeatureKind::BollingerLower(w), bands.lower));
        columns.push(FeatureColumn::new(FeatureKind::BollingerWidth(w), bands.width));
    }

    for &w in &config.rsi_windows {
        debug!(stage = "rsi", window = w);
        let series = calculate_rsi(&close, w);
        columns.push(FeatureColumn::new(FeatureKind::Rsi(w), series.rsi));
        columns.push(FeatureColumn::new(FeatureKind::ZRsi(w), series.normalized));
    }

    for &w in &config.atr_windows {
        debug!(stage = "atr", window = w);
        columns.push(FeatureColumn::new(FeatureKind::Atr(w), calculate_atr(candles, w)));
    }

    debug!(stage = "order_flow");
    let flow = calculate_order_flow(candles);
    columns.push(FeatureColumn::new(FeatureKind::Ofi, flow.ofi));
    columns.push(FeatureColumn::new(FeatureKind::VolumeDelta, flow.volume_delta));

    columns
}

/// Derive the configured features for `symbol` and drop warm-up rows.
///
/// Fails only when `candles` is empty. Degenerate values inside the retained
/// range are logged and removed by the same row trim as warm-up rows.
pub fn run_pipeline(
    symbol: &str,
    candles: Vec<Candle>,
    config: &FeatureConfig,
) -> Result<FeatureTable, FeatureError> {
    if candles.is_empty() {
        return Err(FeatureError::EmptyTable {
            symbol: symbol.to_string(),
        });
    }

    let input_rows = candles.len();
    info!(symbol, rows = input_rows, "deriving features");

    let columns = derive_columns(&candles, config);
    let mut table = FeatureTable::new(symbol.to_string(), candles);
    for column in columns {
        let degenerate = column.degenerate_count();
        if degenerate > 0 {
            warn!(
                symbol,
                column = %column.kind,
                rows = degenerate,
                "degenerate values past warm-up"
            );
        }
        table.push(column);
    }

    let removed = table.trim_undefined_rows();
    info!(
        symbol,
        input_rows,
        removed,
        output_rows = table.row_count(),
        columns = table.columns().len(),
        "feature table ready"
    );
    if table.is_empty() {
        warn!(
            symbol,
            warmup = ?config.warmup_rows(),
            "every row was trimmed; input is shorter than the warm-up or fully degenerate"
        );
    }

    Ok(table)
}
