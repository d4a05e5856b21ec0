//! CSV file table adapter.
//!
//! Reads `{symbol}_processed.csv` and writes `{symbol}_features.csv`. Column
//! names follow the exchange kline export; extra input columns are ignored.

use crate::domain::candle::{CANDLE_COLUMNS, Candle, TIMESTAMP_FORMAT, parse_timestamp};
use crate::domain::cleaning::{RawCandle, clean};
use crate::domain::error::FeatureError;
use crate::domain::feature_table::FeatureTable;
use crate::ports::table_port::TablePort;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct CsvAdapter {
    input_dir: PathBuf,
    output_dir: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            input_dir: base_path.clone(),
            output_dir: base_path,
        }
    }

    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn input_path(&self, symbol: &str) -> PathBuf {
        self.input_dir.join(format!("{}_processed.csv", symbol))
    }

    pub fn output_path(&self, symbol: &str) -> PathBuf {
        self.output_dir.join(format!("{}_features.csv", symbol))
    }
}

impl TablePort for CsvAdapter {
    fn load_candles(&self, symbol: &str) -> Result<Vec<Candle>, FeatureError> {
        let path = self.input_path(symbol);
        let raw = read_raw_candles(&path)?;
        info!(symbol, rows = raw.len(), path = %path.display(), "loaded candle rows");
        Ok(clean(raw).candles)
    }

    fn store_features(&self, table: &FeatureTable) -> Result<(), FeatureError> {
        let path = self.output_path(&table.symbol);
        write_feature_table(&path, table)?;
        info!(
            symbol = %table.symbol,
            rows = table.row_count(),
            path = %path.display(),
            "feature table written"
        );
        Ok(())
    }
}

fn storage_error(context: &str, e: impl std::fmt::Display) -> FeatureError {
    FeatureError::Storage {
        reason: format!("{}: {}", context, e),
    }
}

/// Read every row of a candle CSV, leaving empty cells as `None`.
pub fn read_raw_candles(path: &Path) -> Result<Vec<RawCandle>, FeatureError> {
    let mut rdr = csv::Reader::from_path(path)
        .map_err(|e| storage_error(&format!("failed to read {}", path.display()), e))?;

    let headers = rdr
        .headers()
        .map_err(|e| storage_error("CSV header error", e))?
        .clone();
    let mut index = [0usize; 10];
    for (slot, name) in index.iter_mut().zip(CANDLE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| FeatureError::MissingColumn {
                column: name.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    for (line, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| storage_error("CSV parse error", e))?;
        let cell = |col: usize| record.get(index[col]).map(str::trim).unwrap_or("");
        let number = |col: usize| -> Result<Option<f64>, FeatureError> {
            let value = cell(col);
            if value.is_empty() {
                return Ok(None);
            }
            value.parse().map(Some).map_err(|e| {
                storage_error(
                    &format!("row {}: invalid {} value {:?}", line + 1, CANDLE_COLUMNS[col], value),
                    e,
                )
            })
        };

        let timestamp = match cell(0) {
            "" => None,
            value => Some(parse_timestamp(value).ok_or_else(|| FeatureError::Storage {
                reason: format!("row {}: invalid Timestamp value {:?}", line + 1, value),
            })?),
        };

        rows.push(RawCandle {
            timestamp,
            open: number(1)?,
            high: number(2)?,
            low: number(3)?,
            close: number(4)?,
            volume: number(5)?,
            quote_volume: number(6)?,
            trade_count: number(7)?,
            taker_buy_base_volume: number(8)?,
            taker_buy_quote_volume: number(9)?,
        });
    }

    Ok(rows)
}

fn candle_cells(candle: &Candle) -> Vec<String> {
    let mut cells = Vec::with_capacity(CANDLE_COLUMNS.len());
    cells.push(candle.timestamp.format(TIMESTAMP_FORMAT).to_string());
    cells.extend(candle.numeric_fields().iter().map(|v| v.to_string()));
    cells
}

/// Write cleaned candles with the input column layout.
pub fn write_candles(path: &Path, candles: &[Candle]) -> Result<(), FeatureError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| storage_error(&format!("failed to create {}", path.display()), e))?;
    wtr.write_record(CANDLE_COLUMNS)
        .map_err(|e| storage_error("CSV write error", e))?;
    for candle in candles {
        wtr.write_record(candle_cells(candle))
            .map_err(|e| storage_error("CSV write error", e))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the candles followed by every derived column.
pub fn write_feature_table(path: &Path, table: &FeatureTable) -> Result<(), FeatureError> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|e| storage_error(&format!("failed to create {}", path.display()), e))?;

    let mut header: Vec<String> = CANDLE_COLUMNS.iter().map(|c| c.to_string()).collect();
    header.extend(table.column_names());
    wtr.write_record(&header)
        .map_err(|e| storage_error("CSV write error", e))?;

    for (row, candle) in table.candles().iter().enumerate() {
        let mut cells = candle_cells(candle);
        cells.extend(table.columns().iter().map(|c| c.values[row].to_string()));
        wtr.write_record(&cells)
            .map_err(|e| storage_error("CSV write error", e))?;
    }
    wtr.flush()?;
    Ok(())
}
