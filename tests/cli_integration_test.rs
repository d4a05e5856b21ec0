//! CLI and storage integration tests.
//!
//! Tests cover:
//! - Feature config parsing (build_feature_config, validate_feature_config)
//! - Argument parsing for each subcommand
//! - CSV round trip through CsvAdapter and process_symbol
//! - Header validation and row cleaning on load
//! - The `features` and `clean` commands against real files

mod common;

use candlefeat::adapters::csv_adapter::{CsvAdapter, read_raw_candles};
use candlefeat::adapters::file_config_adapter::FileConfigAdapter;
use candlefeat::cli::{self, Cli, Command};
use candlefeat::domain::config_validation::validate_feature_config;
use candlefeat::domain::error::FeatureError;
use candlefeat::domain::feature_config::FeatureConfig;
use candlefeat::ports::table_port::TablePort;
use clap::Parser;
use common::*;
use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const SCENARIO_INI: &str = r#"
[features]
sma_windows = 20
ema_windows = 20
bollinger_windows = 20
rsi_windows = 14
atr_windows = 14
zscore_window = 20
volatility_window = 20
bollinger_multiplier = 2.0
"#;

fn read_output(path: &Path) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_path(path).unwrap();
    let header = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

mod config_loading {
    use super::*;

    #[test]
    fn build_feature_config_from_ini() {
        let adapter = FileConfigAdapter::from_string(SCENARIO_INI).unwrap();
        let config = cli::build_feature_config(&adapter).unwrap();

        assert_eq!(config.sma_windows, BTreeSet::from([20]));
        assert_eq!(config.ema_windows, BTreeSet::from([20]));
        assert_eq!(config.rsi_windows, BTreeSet::from([14]));
        assert_eq!(config.zscore_window, 20);
        assert!((config.bollinger_multiplier - 2.0).abs() < f64::EPSILON);
        assert!(validate_feature_config(&adapter).is_ok());
    }

    #[test]
    fn missing_keys_use_defaults() {
        let adapter = FileConfigAdapter::from_string("[features]\nrsi_windows = 7, 21\n").unwrap();
        let config = cli::build_feature_config(&adapter).unwrap();

        let defaults = FeatureConfig::default();
        assert_eq!(config.rsi_windows, BTreeSet::from([7, 21]));
        assert_eq!(config.sma_windows, defaults.sma_windows);
        assert_eq!(config.volatility_window, defaults.volatility_window);
    }

    #[test]
    fn duplicate_windows_collapse() {
        let adapter = FileConfigAdapter::from_string("[features]\nsma_windows = 50,20,50\n").unwrap();
        let config = cli::build_feature_config(&adapter).unwrap();
        assert_eq!(config.sma_windows.into_iter().collect::<Vec<_>>(), vec![20, 50]);
    }

    #[test]
    fn zero_window_is_rejected() {
        let adapter = FileConfigAdapter::from_string("[features]\natr_windows = 14,0\n").unwrap();
        let err = cli::build_feature_config(&adapter).unwrap_err();
        match err {
            FeatureError::ConfigInvalid { section, key, .. } => {
                assert_eq!(section, "features");
                assert_eq!(key, "atr_windows");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_window_list_drops_family_columns() {
        let adapter = FileConfigAdapter::from_string(
            "[features]\nsma_windows = 10\nema_windows = 10\nbollinger_windows =\n",
        )
        .unwrap();
        let config = cli::build_feature_config(&adapter).unwrap();
        assert!(config.bollinger_windows.is_empty());

        let port = MockTablePort::new().with_candles("BTCUSDT", wavy_candles(80));
        let table = cli::process_symbol(&port, "BTCUSDT", &config).unwrap();

        let names = table.column_names();
        assert!(names.iter().all(|n| !n.starts_with("Bollinger_")));
        assert!(names.contains(&"SMA_10".to_string()));
        assert_eq!(names.len(), 12);
        assert!(!table.is_empty());
    }

    #[test]
    fn single_observation_zscore_window_is_rejected() {
        let adapter = FileConfigAdapter::from_string("[features]\nzscore_window = 1\n").unwrap();
        let err = cli::build_feature_config(&adapter).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::ConfigInvalid { ref key, .. } if key == "zscore_window"
        ));
    }

    #[test]
    fn bad_multiplier_is_rejected() {
        let adapter =
            FileConfigAdapter::from_string("[features]\nbollinger_multiplier = -1\n").unwrap();
        assert!(matches!(
            validate_feature_config(&adapter),
            Err(FeatureError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn load_config_from_file() {
        let file = write_temp_ini(SCENARIO_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let config = cli::build_feature_config(&adapter).unwrap();
        assert_eq!(config.warmup_rows(), Some(19));
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn features_accepts_symbol_list() {
        let cli = Cli::try_parse_from([
            "candlefeat",
            "features",
            "--symbol",
            "BTCUSDT,ETHUSDT",
            "--data-dir",
            "data",
        ])
        .unwrap();
        match cli.command {
            Command::Features {
                symbol,
                config,
                output_dir,
                ..
            } => {
                assert_eq!(symbol, vec!["BTCUSDT", "ETHUSDT"]);
                assert!(config.is_none());
                assert!(output_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn features_requires_symbol() {
        assert!(Cli::try_parse_from(["candlefeat", "features", "--data-dir", "data"]).is_err());
    }

    #[test]
    fn clean_requires_both_paths() {
        assert!(Cli::try_parse_from(["candlefeat", "clean", "--input", "raw.csv"]).is_err());
    }
}

mod csv_storage {
    use super::*;

    fn setup(symbol: &str, body: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{}_processed.csv", symbol)), body).unwrap();
        dir
    }

    #[test]
    fn process_symbol_writes_feature_csv() {
        let dir = setup("BTCUSDT", &candles_csv(&linear_candles(150)));
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let config = FeatureConfig {
            sma_windows: BTreeSet::from([20]),
            ema_windows: BTreeSet::from([20]),
            bollinger_windows: BTreeSet::from([20]),
            ..FeatureConfig::default()
        };

        let table = cli::process_symbol(&adapter, "BTCUSDT", &config).unwrap();
        assert_eq!(table.row_count(), 131);

        let (header, rows) = read_output(&adapter.output_path("BTCUSDT"));
        assert_eq!(&header[..10], csv_header().split(',').collect::<Vec<_>>().as_slice());
        assert_eq!(header[10], "Log_Returns");
        assert_eq!(header.last().unwrap(), "Volume_Delta");
        assert_eq!(header.len(), 10 + 16);
        assert_eq!(rows.len(), 131);

        let rsi = header.iter().position(|h| h == "RSI_14").unwrap();
        assert!(rows.iter().all(|r| r[rsi].parse::<f64>().unwrap() == 100.0));
        assert_eq!(rows[0][0], "2024-01-01 19:00:00");
    }

    #[test]
    fn output_dir_is_separate_from_input() {
        let input = setup("ETHUSDT", &candles_csv(&wavy_candles(40)));
        let output = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(input.path().to_path_buf())
            .with_output_dir(output.path().to_path_buf());

        let config = FeatureConfig {
            sma_windows: BTreeSet::from([10]),
            ema_windows: BTreeSet::from([10]),
            bollinger_windows: BTreeSet::from([10]),
            ..FeatureConfig::default()
        };
        cli::process_symbol(&adapter, "ETHUSDT", &config).unwrap();

        assert!(output.path().join("ETHUSDT_features.csv").exists());
        assert!(!input.path().join("ETHUSDT_features.csv").exists());
    }

    #[test]
    fn missing_column_is_precondition_error() {
        let body = "Timestamp,Open,High,Low,Close,Volume,QuoteAssetVolume,NumberOfTrades,TakerBuyBaseVolume\n\
                    2024-01-01 00:00:00,1,2,0.5,1.5,10,15,3,6\n";
        let dir = setup("BTCUSDT", body);
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = adapter.load_candles("BTCUSDT").unwrap_err();
        match &err {
            FeatureError::MissingColumn { column } => assert_eq!(column, "TakerBuyQuoteVolume"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_precondition());
        assert!(!adapter.output_path("BTCUSDT").exists());
    }

    #[test]
    fn load_cleans_unsorted_and_incomplete_rows() {
        let body = format!(
            "{}\n\
             2024-01-01 02:00:00,1,2,0.5,1.5,10,15,3,6,9\n\
             2024-01-01 00:00:00,1,2,0.5,1.2,10,15,3,6,9\n\
             2024-01-01 01:00:00,1,2,0.5,,10,15,3,6,9\n\
             2024-01-01 00:00:00,1,2,0.5,9.9,10,15,3,6,9\n",
            csv_header()
        );
        let dir = setup("BTCUSDT", &body);
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let candles = adapter.load_candles("BTCUSDT").unwrap();

        assert_eq!(candles.len(), 2);
        assert!(candles[0].timestamp < candles[1].timestamp);
        assert_eq!(candles[0].close, 1.2);
        assert_eq!(candles[1].close, 1.5);
    }

    #[test]
    fn header_only_file_is_empty_table() {
        let dir = setup("BTCUSDT", &format!("{}\n", csv_header()));
        let adapter = CsvAdapter::new(dir.path().to_path_buf());

        let err = cli::process_symbol(&adapter, "BTCUSDT", &FeatureConfig::default()).unwrap_err();
        assert!(matches!(err, FeatureError::EmptyTable { .. }));
    }

    #[test]
    fn missing_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvAdapter::new(dir.path().to_path_buf());
        let err = adapter.load_candles("NOPE").unwrap_err();
        assert!(matches!(err, FeatureError::Storage { .. }));
    }
}

mod commands {
    use super::*;

    #[test]
    fn features_command_writes_every_symbol() {
        let dir = TempDir::new().unwrap();
        for symbol in ["BTCUSDT", "ETHUSDT"] {
            fs::write(
                dir.path().join(format!("{}_processed.csv", symbol)),
                candles_csv(&wavy_candles(60)),
            )
            .unwrap();
        }
        let ini = write_temp_ini(SCENARIO_INI);

        let args = Cli::try_parse_from([
            "candlefeat",
            "features",
            "--symbol",
            "BTCUSDT,ETHUSDT",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--config",
            ini.path().to_str().unwrap(),
        ])
        .unwrap();
        cli::run(args);

        for symbol in ["BTCUSDT", "ETHUSDT"] {
            let (_, rows) = read_output(&dir.path().join(format!("{}_features.csv", symbol)));
            assert_eq!(rows.len(), 41);
        }
    }

    #[test]
    fn features_command_continues_past_failed_symbol() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("ETHUSDT_processed.csv"),
            candles_csv(&wavy_candles(60)),
        )
        .unwrap();
        let ini = write_temp_ini(SCENARIO_INI);

        let args = Cli::try_parse_from([
            "candlefeat",
            "features",
            "--symbol",
            "MISSING,ETHUSDT",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "--config",
            ini.path().to_str().unwrap(),
        ])
        .unwrap();
        cli::run(args);

        assert!(dir.path().join("ETHUSDT_features.csv").exists());
        assert!(!dir.path().join("MISSING_features.csv").exists());
    }

    #[test]
    fn clean_command_writes_processed_file() {
        let dir = TempDir::new().unwrap();
        let raw = dir.path().join("BTCUSDT_raw.csv");
        let processed = dir.path().join("BTCUSDT_processed.csv");
        fs::write(
            &raw,
            format!(
                "{}\n\
                 1704070800000,1,2,0.5,1.6,10,15,3,6,9\n\
                 1704067200000,1,2,0.5,1.5,10,15,3,6,9\n\
                 1704074400000,1,2,,1.7,10,15,3,6,9\n",
                csv_header()
            ),
        )
        .unwrap();

        let args = Cli::try_parse_from([
            "candlefeat",
            "clean",
            "--input",
            raw.to_str().unwrap(),
            "--output",
            processed.to_str().unwrap(),
        ])
        .unwrap();
        cli::run(args);

        let rows = read_raw_candles(&processed).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].timestamp.unwrap().format("%Y-%m-%d %H:%M:%S").to_string(),
            "2024-01-01 00:00:00"
        );
        assert_eq!(rows[1].close, Some(1.6));
    }
}
