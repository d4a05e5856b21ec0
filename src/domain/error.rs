//! Domain error types.
//!
//! Degenerate numeric results (division by zero on real market data) are not
//! errors; they travel through the feature columns as undefined values and are
//! resolved by the final row trim. Only broken preconditions and boundary
//! failures end up here.

/// Top-level error type for candlefeat.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("missing required column {column}")]
    MissingColumn { column: String },

    #[error("input table for {symbol} has no rows")]
    EmptyTable { symbol: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("storage error: {reason}")]
    Storage { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl FeatureError {
    /// True for errors raised because the input table violated the pipeline's
    /// preconditions, as opposed to configuration or storage failures.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            FeatureError::MissingColumn { .. } | FeatureError::EmptyTable { .. }
        )
    }
}

impl From<&FeatureError> for std::process::ExitCode {
    fn from(err: &FeatureError) -> Self {
        let code: u8 = match err {
            FeatureError::Io(_) => 1,
            FeatureError::ConfigParse { .. } | FeatureError::ConfigInvalid { .. } => 2,
            FeatureError::Storage { .. } => 3,
            FeatureError::MissingColumn { .. } | FeatureError::EmptyTable { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
