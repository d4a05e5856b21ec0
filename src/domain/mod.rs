//! Core domain types and the feature-derivation pipeline.

pub mod candle;
pub mod cleaning;
pub mod config_validation;
pub mod error;
pub mod feature_config;
pub mod feature_table;
pub mod indicator;
pub mod indicator_helpers;
pub mod pipeline;
