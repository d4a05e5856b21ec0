//! candlefeat: technical-analysis feature derivation for exchange candles.
//!
//! Hexagonal architecture: the pure feature pipeline in [`domain`], port
//! traits in [`ports`], CSV and INI implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod ports;
