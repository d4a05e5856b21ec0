//! Storage boundary for candle input and feature output.

use crate::domain::candle::Candle;
use crate::domain::error::FeatureError;
use crate::domain::feature_table::FeatureTable;

pub trait TablePort {
    /// Load the cleaned, time-ordered candles for `symbol`.
    fn load_candles(&self, symbol: &str) -> Result<Vec<Candle>, FeatureError>;

    /// Persist a finished feature table.
    fn store_features(&self, table: &FeatureTable) -> Result<(), FeatureError>;
}
