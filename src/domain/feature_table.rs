//! The enriched candle table produced by one pipeline run.

use crate::domain::candle::Candle;
use crate::domain::indicator::{FeatureColumn, FeatureKind, is_undefined};

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    pub symbol: String,
    candles: Vec<Candle>,
    columns: Vec<FeatureColumn>,
}

impl FeatureTable {
    pub fn new(symbol: String, candles: Vec<Candle>) -> Self {
        Self {
            symbol,
            candles,
            columns: Vec::new(),
        }
    }

    /// Append a derived column. Columns keep insertion order.
    pub fn push(&mut self, column: FeatureColumn) {
        debug_assert_eq!(column.values.len(), self.candles.len());
        debug_assert!(self.column(&column.kind).is_none());
        self.columns.push(column);
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn column(&self, kind: &FeatureKind) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.kind == *kind)
            .map(|c| c.values.as_slice())
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.kind.to_string()).collect()
    }

    pub fn row_count(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// True when neither the candle nor any derived column is undefined at `row`.
    pub fn row_is_complete(&self, row: usize) -> bool {
        let candle_ok = !self.candles[row]
            .numeric_fields()
            .iter()
            .any(|v| is_undefined(*v));
        candle_ok && self.columns.iter().all(|c| !is_undefined(c.values[row]))
    }

    /// Drop every row holding an undefined value in any column.
    ///
    /// Returns the number of rows removed.
    pub fn trim_undefined_rows(&mut self) -> usize {
        let keep: Vec<bool> = (0..self.row_count())
            .map(|row| self.row_is_complete(row))
            .collect();
        let removed = keep.iter().filter(|k| !**k).count();
        if removed == 0 {
            return 0;
        }

        self.candles = retain_by_mask(std::mem::take(&mut self.candles), &keep);
        for column in &mut self.columns {
            column.values = retain_by_mask(std::mem::take(&mut column.values), &keep);
        }
        removed
    }
}

fn retain_by_mask<T>(values: Vec<T>, keep: &[bool]) -> Vec<T> {
    values
        .into_iter()
        .zip(keep)
        .filter_map(|(v, k)| k.then_some(v))
        .collect()
}
