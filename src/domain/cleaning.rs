//! Missing-value examination and cleaning of raw candle rows.
//!
//! Raw rows come straight from storage with every cell optional. Cleaning
//! drops incomplete rows, orders the rest by timestamp and keeps the first
//! row of any repeated timestamp, so the pipeline sees a strictly increasing
//! series.

use crate::domain::candle::{CANDLE_COLUMNS, Candle};
use std::collections::HashSet;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandle {
    pub timestamp: Option<chrono::NaiveDateTime>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub quote_volume: Option<f64>,
    pub trade_count: Option<f64>,
    pub taker_buy_base_volume: Option<f64>,
    pub taker_buy_quote_volume: Option<f64>,
}

impl RawCandle {
    /// Which cells are present, in `CANDLE_COLUMNS` order. NaN counts as missing.
    fn presence(&self) -> [bool; 10] {
        let num = |v: Option<f64>| v.is_some_and(|x| !x.is_nan());
        [
            self.timestamp.is_some(),
            num(self.open),
            num(self.high),
            num(self.low),
            num(self.close),
            num(self.volume),
            num(self.quote_volume),
            num(self.trade_count),
            num(self.taker_buy_base_volume),
            num(self.taker_buy_quote_volume),
        ]
    }

    pub fn into_candle(self) -> Option<Candle> {
        if self.presence().contains(&false) {
            return None;
        }
        Some(Candle {
            timestamp: self.timestamp?,
            open: self.open?,
            high: self.high?,
            low: self.low?,
            close: self.close?,
            volume: self.volume?,
            quote_volume: self.quote_volume?,
            trade_count: self.trade_count?,
            taker_buy_base_volume: self.taker_buy_base_volume?,
            taker_buy_quote_volume: self.taker_buy_quote_volume?,
        })
    }
}

/// Missing cells per input column.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingValueReport {
    pub rows: usize,
    pub counts: [usize; 10],
}

impl MissingValueReport {
    pub fn examine(rows: &[RawCandle]) -> Self {
        let mut counts = [0usize; 10];
        for row in rows {
            for (count, present) in counts.iter_mut().zip(row.presence()) {
                if !present {
                    *count += 1;
                }
            }
        }
        Self {
            rows: rows.len(),
            counts,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// (column, count) for each column with at least one missing cell.
    pub fn columns_with_missing(&self) -> Vec<(&'static str, usize)> {
        CANDLE_COLUMNS
            .iter()
            .zip(self.counts)
            .filter(|(_, n)| *n > 0)
            .map(|(name, n)| (*name, n))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct CleanOutcome {
    pub candles: Vec<Candle>,
    pub report: MissingValueReport,
    pub dropped_incomplete: usize,
    pub dropped_duplicates: usize,
}

pub fn clean(rows: Vec<RawCandle>) -> CleanOutcome {
    let report = MissingValueReport::examine(&rows);
    for (column, count) in report.columns_with_missing() {
        warn!(column, count, "missing values");
    }

    let total = rows.len();
    let mut candles: Vec<Candle> = rows.into_iter().filter_map(RawCandle::into_candle).collect();
    let dropped_incomplete = total - candles.len();

    // Stable sort keeps the first occurrence of a repeated timestamp in front.
    candles.sort_by_key(|c| c.timestamp);
    let mut seen = HashSet::new();
    candles.retain(|c| seen.insert(c.timestamp));
    let dropped_duplicates = total - dropped_incomplete - candles.len();

    info!(
        rows = total,
        kept = candles.len(),
        dropped_incomplete,
        dropped_duplicates,
        "cleaned candle rows"
    );

    CleanOutcome {
        candles,
        report,
        dropped_incomplete,
        dropped_duplicates,
    }
}
