//! Symbol lists and multi-symbol loading.
//!
//! Parses symbol lists from configuration or the command line and fetches
//! each one through a [`DataPort`], skipping symbols the source cannot serve.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::domain::error::StockscopeError;
use crate::domain::price::PriceRecord;
use crate::ports::data_port::DataPort;

/// Exchange suffixes stripped from user-supplied symbols.
const EXCHANGE_SUFFIXES: [&str; 2] = [".NS", ".BO"];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let symbol = normalize_symbol(token);
        if symbol.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

/// Trim, uppercase and drop a trailing exchange suffix.
pub fn normalize_symbol(raw: &str) -> String {
    let upper = raw.trim().to_uppercase();
    for suffix in EXCHANGE_SUFFIXES {
        if let Some(stripped) = upper.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    upper
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NoData,
    SourceError(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSymbol {
    pub symbol: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone)]
pub struct LoadedUniverse {
    pub records: Vec<PriceRecord>,
    pub loaded: Vec<String>,
    pub skipped: Vec<SkippedSymbol>,
}

pub fn load_universe(
    data_port: &dyn DataPort,
    symbols: &[String],
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<LoadedUniverse, StockscopeError> {
    let mut records = Vec::new();
    let mut loaded = Vec::new();
    let mut skipped = Vec::new();

    for symbol in symbols {
        match data_port.fetch_prices(symbol, start_date, end_date) {
            Ok(rows) if rows.is_empty() => {
                warn!(symbol = %symbol, "skipping symbol: no rows in range");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::NoData,
                });
            }
            Ok(rows) => {
                info!(symbol = %symbol, rows = rows.len(), "loaded prices");
                records.extend(rows);
                loaded.push(symbol.clone());
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "skipping symbol");
                skipped.push(SkippedSymbol {
                    symbol: symbol.clone(),
                    reason: SkipReason::SourceError(e.to_string()),
                });
            }
        }
    }

    if loaded.is_empty() {
        return Err(StockscopeError::NoData {
            symbols: symbols.join(","),
        });
    }

    Ok(LoadedUniverse {
        records,
        loaded,
        skipped,
    })
}
