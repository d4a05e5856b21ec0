//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::{CsvAdapter, read_raw_candles, write_candles};
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::cleaning::clean;
use crate::domain::config_validation::{
    bollinger_multiplier, single_window, validate_feature_config, window_set,
};
use crate::domain::error::FeatureError;
use crate::domain::feature_config::FeatureConfig;
use crate::domain::feature_table::FeatureTable;
use crate::domain::pipeline::run_pipeline;
use crate::ports::config_port::ConfigPort;
use crate::ports::table_port::TablePort;

#[derive(Parser, Debug)]
#[command(
    name = "candlefeat",
    about = "Technical-analysis feature derivation for exchange candles"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the feature table for one or more symbols
    Features {
        #[arg(long, value_delimiter = ',', required = true)]
        symbol: Vec<String>,
        #[arg(short, long)]
        data_dir: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },
    /// Examine and clean a raw candle export
    Clean {
        #[arg(short, long)]
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Validate a feature configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Features {
            symbol,
            data_dir,
            config,
            output_dir,
        } => run_features(&symbol, &data_dir, config.as_deref(), output_dir.as_deref()),
        Command::Clean { input, output } => run_clean(&input, &output),
        Command::Validate { config } => run_validate(&config),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

pub fn build_feature_config(adapter: &dyn ConfigPort) -> Result<FeatureConfig, FeatureError> {
    let defaults = FeatureConfig::default();
    Ok(FeatureConfig {
        sma_windows: window_set(adapter, "sma_windows", &defaults.sma_windows)?,
        ema_windows: window_set(adapter, "ema_windows", &defaults.ema_windows)?,
        bollinger_windows: window_set(adapter, "bollinger_windows", &defaults.bollinger_windows)?,
        rsi_windows: window_set(adapter, "rsi_windows", &defaults.rsi_windows)?,
        atr_windows: window_set(adapter, "atr_windows", &defaults.atr_windows)?,
        zscore_window: single_window(adapter, "zscore_window", defaults.zscore_window)?,
        volatility_window: single_window(
            adapter,
            "volatility_window",
            defaults.volatility_window,
        )?,
        bollinger_multiplier: bollinger_multiplier(adapter, defaults.bollinger_multiplier)?,
    })
}

fn resolve_config(config_path: Option<&Path>) -> Result<FeatureConfig, ExitCode> {
    let Some(path) = config_path else {
        info!("no config given, using default windows");
        return Ok(FeatureConfig::default());
    };

    info!(path = %path.display(), "loading config");
    let adapter = load_config(path)?;
    build_feature_config(&adapter).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

/// Load, derive and store the feature table for one symbol.
pub fn process_symbol(
    port: &dyn TablePort,
    symbol: &str,
    config: &FeatureConfig,
) -> Result<FeatureTable, FeatureError> {
    let candles = port.load_candles(symbol)?;
    let table = run_pipeline(symbol, candles, config)?;
    port.store_features(&table)?;
    Ok(table)
}

fn run_features(
    symbols: &[String],
    data_dir: &Path,
    config_path: Option<&Path>,
    output_dir: Option<&Path>,
) -> ExitCode {
    let config = match resolve_config(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let adapter = CsvAdapter::new(data_dir.to_path_buf())
        .with_output_dir(output_dir.unwrap_or(data_dir).to_path_buf());

    let mut exit = ExitCode::SUCCESS;
    let mut failed = 0usize;
    for symbol in symbols {
        match process_symbol(&adapter, symbol, &config) {
            Ok(table) => eprintln!(
                "{}: {} rows, {} feature columns -> {}",
                symbol,
                table.row_count(),
                table.columns().len(),
                adapter.output_path(symbol).display()
            ),
            Err(e) => {
                eprintln!("error: {}: {e}", symbol);
                if failed == 0 {
                    exit = ExitCode::from(&e);
                }
                failed += 1;
            }
        }
    }

    if failed > 0 {
        eprintln!("{} of {} symbols failed", failed, symbols.len());
    }
    exit
}

fn run_clean(input: &Path, output: &Path) -> ExitCode {
    let raw = match read_raw_candles(input) {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let outcome = clean(raw);

    eprintln!(
        "Missing values per column ({} cells in {} rows):",
        outcome.report.total(),
        outcome.report.rows
    );
    let missing = outcome.report.columns_with_missing();
    if missing.is_empty() {
        eprintln!("  none");
    }
    for (column, count) in missing {
        eprintln!("  {:<20} {}", column, count);
    }
    eprintln!(
        "Dropped {} incomplete and {} duplicate rows",
        outcome.dropped_incomplete, outcome.dropped_duplicates
    );

    if let Err(e) = write_candles(output, &outcome.candles) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!(
        "Processed data saved to {} ({} rows)",
        output.display(),
        outcome.candles.len()
    );
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_feature_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    let config = match build_feature_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let list = |set: &std::collections::BTreeSet<usize>| {
        set.iter()
            .map(|w| w.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };
    eprintln!("\nWindows:");
    eprintln!("  sma:        {}", list(&config.sma_windows));
    eprintln!("  ema:        {}", list(&config.ema_windows));
    eprintln!("  bollinger:  {}", list(&config.bollinger_windows));
    eprintln!("  rsi:        {}", list(&config.rsi_windows));
    eprintln!("  atr:        {}", list(&config.atr_windows));
    eprintln!("  zscore:     {}", config.zscore_window);
    eprintln!("  volatility: {}", config.volatility_window);
    eprintln!("Bollinger multiplier: {}", config.bollinger_multiplier);
    match config.warmup_rows() {
        Some(rows) => eprintln!("Warm-up rows trimmed: {}", rows),
        None => eprintln!("Warm-up rows trimmed: all (deviation window below 2)"),
    }

    eprintln!("\nFeature configuration is valid.");
    ExitCode::SUCCESS
}
