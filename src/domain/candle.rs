//! Exchange candle (kline) representation.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Input column names, in order.
pub const CANDLE_COLUMNS: [&str; 10] = [
    "Timestamp",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "QuoteAssetVolume",
    "NumberOfTrades",
    "TakerBuyBaseVolume",
    "TakerBuyQuoteVolume",
];

/// Format used when writing timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const ACCEPTED_FORMATS: [&str; 3] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
];

/// Parse a timestamp cell: a datetime string, a bare date (midnight), or
/// integer epoch milliseconds as exchanges emit for klines.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(millis) = value.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    }
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// One cleaned candle interval. Every numeric field is already coerced to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub quote_volume: f64,
    pub trade_count: f64,
    pub taker_buy_base_volume: f64,
    pub taker_buy_quote_volume: f64,
}

impl Candle {
    /// max(high - low, |high - prev_close|, |low - prev_close|)
    ///
    /// Without a previous close only `high - low` is considered.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let hl = self.high - self.low;
        match prev_close {
            Some(prev) => {
                let hc = (self.high - prev).abs();
                let lc = (self.low - prev).abs();
                hl.max(hc).max(lc)
            }
            None => hl,
        }
    }

    /// Base volume bought by takers subtracted from total volume.
    pub fn sell_volume(&self) -> f64 {
        self.volume - self.taker_buy_base_volume
    }

    /// The numeric fields in input column order.
    pub fn numeric_fields(&self) -> [f64; 9] {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.volume,
            self.quote_volume,
            self.trade_count,
            self.taker_buy_base_volume,
            self.taker_buy_quote_volume,
        ]
    }
}

/// Close prices of `candles`, in order.
pub fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}
