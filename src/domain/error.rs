//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for stockscope.
#[derive(Debug, thiserror::Error)]
pub enum StockscopeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    InvalidSymbols(#[from] crate::domain::universe::UniverseError),

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("no price data for {symbols}")]
    NoData { symbols: String },

    #[error("invalid price record for {symbol} on {date}: {reason}")]
    InvalidRecord {
        symbol: String,
        date: NaiveDate,
        reason: String,
    },

    #[error("duplicate price record for {symbol} on {date}")]
    DuplicateRecord { symbol: String, date: NaiveDate },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl StockscopeError {
    /// True when the error stems from input the caller handed us.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            StockscopeError::ConfigMissing { .. }
                | StockscopeError::ConfigInvalid { .. }
                | StockscopeError::InvalidSymbols(_)
                | StockscopeError::InvalidRecord { .. }
                | StockscopeError::DuplicateRecord { .. }
        )
    }
}

impl From<&StockscopeError> for std::process::ExitCode {
    fn from(err: &StockscopeError) -> Self {
        let code: u8 = match err {
            StockscopeError::Io(_) | StockscopeError::Json(_) => 1,
            StockscopeError::ConfigParse { .. }
            | StockscopeError::ConfigMissing { .. }
            | StockscopeError::ConfigInvalid { .. }
            | StockscopeError::InvalidSymbols(_) => 2,
            StockscopeError::DataSource { .. } => 3,
            StockscopeError::InvalidRecord { .. } | StockscopeError::DuplicateRecord { .. } => 4,
            StockscopeError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
