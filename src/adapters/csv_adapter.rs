//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with header
//! `date,open,high,low,close,adj_close,volume`. `adj_close` may be omitted
//! and then mirrors `close`.

use crate::domain::error::StockscopeError;
use crate::domain::price::PriceRecord;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open")]
    open: f64,
    #[serde(alias = "High")]
    high: f64,
    #[serde(alias = "Low")]
    low: f64,
    #[serde(alias = "Close")]
    close: f64,
    #[serde(alias = "Adj Close", default)]
    adj_close: Option<f64>,
    #[serde(alias = "Volume")]
    volume: u64,
}

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_all(&self, symbol: &str) -> Result<Vec<PriceRecord>, StockscopeError> {
        let path = self.csv_path(symbol);
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| StockscopeError::DataSource {
                reason: format!("failed to read {}: {}", path.display(), e),
            })?;

        let mut records = Vec::new();
        for (line, result) in rdr.deserialize::<CsvRow>().enumerate() {
            let row = result.map_err(|e| StockscopeError::DataSource {
                reason: format!("{}: CSV parse error: {}", path.display(), e),
            })?;

            let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
                StockscopeError::DataSource {
                    reason: format!(
                        "{}: invalid date {:?} on data row {}: {}",
                        path.display(),
                        row.date,
                        line + 1,
                        e
                    ),
                }
            })?;

            records.push(PriceRecord {
                symbol: symbol.to_string(),
                date,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                adj_close: row.adj_close.unwrap_or(row.close),
                volume: row.volume,
            });
        }

        records.sort_by_key(|r| r.date);
        debug!(symbol, rows = records.len(), path = %path.display(), "read csv");
        Ok(records)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, StockscopeError> {
        let mut records = self.read_all(symbol)?;
        records.retain(|r| r.date >= start_date && r.date <= end_date);
        Ok(records)
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockscopeError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| StockscopeError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StockscopeError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("csv") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                symbols.push(stem.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockscopeError> {
        if !self.csv_path(symbol).exists() {
            return Ok(None);
        }
        let records = self.read_all(symbol)?;
        Ok(match (records.first(), records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, records.len())),
            _ => None,
        })
    }
}
