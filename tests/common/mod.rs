#![allow(dead_code)]

use candlefeat::domain::error::FeatureError;
use candlefeat::domain::feature_table::FeatureTable;
use candlefeat::ports::table_port::TablePort;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use std::cell::RefCell;
use std::collections::HashMap;

pub use candlefeat::domain::candle::Candle;

pub struct MockTablePort {
    pub data: HashMap<String, Vec<Candle>>,
    pub stored: RefCell<Vec<FeatureTable>>,
}

impl MockTablePort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            stored: RefCell::new(Vec::new()),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }
}

impl TablePort for MockTablePort {
    fn load_candles(&self, symbol: &str) -> Result<Vec<Candle>, FeatureError> {
        self.data
            .get(symbol)
            .cloned()
            .ok_or_else(|| FeatureError::Storage {
                reason: format!("no table for {}", symbol),
            })
    }

    fn store_features(&self, table: &FeatureTable) -> Result<(), FeatureError> {
        self.stored.borrow_mut().push(table.clone());
        Ok(())
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Hourly candles with the given closes; high/low sit one unit around close.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: start_time() + Duration::hours(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 100.0,
            quote_volume: 100.0 * close,
            trade_count: 50.0,
            taker_buy_base_volume: 60.0,
            taker_buy_quote_volume: 60.0 * close,
        })
        .collect()
}

/// `count` hourly candles with close = 100 + t.
pub fn linear_candles(count: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..count).map(|t| 100.0 + t as f64).collect();
    candles_from_closes(&closes)
}

/// A deterministic zig-zag series with both gains and losses in every window.
pub fn wavy_candles(count: usize) -> Vec<Candle> {
    let closes: Vec<f64> = (0..count)
        .map(|t| 100.0 + (t as f64 * 0.9).sin() * 4.0 + t as f64 * 0.05)
        .collect();
    candles_from_closes(&closes)
}

pub fn csv_header() -> &'static str {
    "Timestamp,Open,High,Low,Close,Volume,QuoteAssetVolume,NumberOfTrades,TakerBuyBaseVolume,TakerBuyQuoteVolume"
}

/// Render candles as a processed CSV body.
pub fn candles_csv(candles: &[Candle]) -> String {
    let mut out = String::from(csv_header());
    out.push('\n');
    for c in candles {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            c.timestamp.format("%Y-%m-%d %H:%M:%S"),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume,
            c.quote_volume,
            c.trade_count,
            c.taker_buy_base_volume,
            c.taker_buy_quote_volume
        ));
    }
    out
}
