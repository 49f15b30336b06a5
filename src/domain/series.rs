//! Per-symbol grouping of flat price records.
//!
//! [`normalize`] is the single entry point into the computation layer: it
//! groups records by symbol, sorts each group by date and rejects input that
//! breaks the one-record-per-symbol-per-day contract. Every indicator borrows
//! the resulting [`PriceSeries`]; nothing downstream re-sorts or re-groups.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::error::StockscopeError;
use crate::domain::price::PriceRecord;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    by_symbol: BTreeMap<String, Vec<PriceRecord>>,
}

impl PriceSeries {
    pub fn get(&self, symbol: &str) -> Option<&[PriceRecord]> {
        self.by_symbol.get(symbol).map(Vec::as_slice)
    }

    /// Symbols in ascending order.
    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.by_symbol.keys().map(String::as_str)
    }

    /// (symbol, date-ordered records) pairs in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PriceRecord])> {
        self.by_symbol
            .iter()
            .map(|(symbol, records)| (symbol.as_str(), records.as_slice()))
    }

    pub fn symbol_count(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn record_count(&self) -> usize {
        self.by_symbol.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }

    /// Flatten back into records ordered by (symbol, date).
    pub fn into_records(self) -> Vec<PriceRecord> {
        self.by_symbol.into_values().flatten().collect()
    }
}

pub fn normalize(records: Vec<PriceRecord>) -> Result<PriceSeries, StockscopeError> {
    let mut by_symbol: BTreeMap<String, Vec<PriceRecord>> = BTreeMap::new();

    for record in records {
        check_record(&record)?;
        by_symbol
            .entry(record.symbol.clone())
            .or_default()
            .push(record);
    }

    for (symbol, records) in by_symbol.iter_mut() {
        records.sort_by_key(|r| r.date);
        if let Some(pair) = records.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(StockscopeError::DuplicateRecord {
                symbol: symbol.clone(),
                date: pair[1].date,
            });
        }
        debug!(symbol = %symbol, records = records.len(), "normalized series");
    }

    Ok(PriceSeries { by_symbol })
}

fn check_record(record: &PriceRecord) -> Result<(), StockscopeError> {
    let invalid = |reason: &str| StockscopeError::InvalidRecord {
        symbol: record.symbol.clone(),
        date: record.date,
        reason: reason.to_string(),
    };

    if record.symbol.trim().is_empty() {
        return Err(invalid("empty symbol"));
    }

    let fields = [
        ("open", record.open),
        ("high", record.high),
        ("low", record.low),
        ("close", record.close),
        ("adj_close", record.adj_close),
    ];
    if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
        return Err(invalid(&format!("{} is not a finite number", name)));
    }

    if record.close <= 0.0 {
        return Err(invalid("close must be positive"));
    }
    if record.low <= 0.0 {
        return Err(invalid("low must be positive"));
    }
    if record.high <= 0.0 {
        return Err(invalid("high must be positive"));
    }
    // Typical price and true range assume a well-formed bar.
    if record.high < record.low {
        return Err(invalid("high is below low"));
    }

    Ok(())
}
