#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use stockscope::domain::error::StockscopeError;
pub use stockscope::domain::price::PriceRecord;
use stockscope::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceRecord>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_records(mut self, symbol: &str, records: Vec<PriceRecord>) -> Self {
        self.data.insert(symbol.to_string(), records);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }

    fn check(&self, symbol: &str) -> Result<(), StockscopeError> {
        match self.errors.get(symbol) {
            Some(reason) => Err(StockscopeError::DataSource {
                reason: reason.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, StockscopeError> {
        self.check(symbol)?;
        Ok(self
            .data
            .get(symbol)
            .map(|rows| {
                rows.iter()
                    .filter(|r| r.date >= start_date && r.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, StockscopeError> {
        let mut symbols: Vec<String> = self
            .data
            .keys()
            .chain(self.errors.keys())
            .cloned()
            .collect();
        symbols.sort();
        symbols.dedup();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockscopeError> {
        self.check(symbol)?;
        match self.data.get(symbol) {
            Some(rows) if !rows.is_empty() => {
                let min = rows.iter().map(|r| r.date).min().unwrap();
                let max = rows.iter().map(|r| r.date).max().unwrap();
                Ok(Some((min, max, rows.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_record(symbol: &str, date_str: &str, close: f64) -> PriceRecord {
    PriceRecord {
        symbol: symbol.to_string(),
        date: date(date_str),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        adj_close: close,
        volume: 1000,
    }
}

/// One record per calendar day starting at `start`, one per close.
pub fn records_from_closes(symbol: &str, start: &str, closes: &[f64]) -> Vec<PriceRecord> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let mut r = make_record(symbol, "2000-01-01", close);
            r.date = start + Duration::days(i as i64);
            r
        })
        .collect()
}

/// `count` records oscillating gently around `base_price`.
pub fn generate_records(symbol: &str, start: &str, count: usize, base_price: f64) -> Vec<PriceRecord> {
    let closes: Vec<f64> = (0..count)
        .map(|i| base_price + (i as f64 * 0.1).sin() * 5.0 + i as f64 * 0.05)
        .collect();
    records_from_closes(symbol, start, &closes)
}

/// Falls for `down` days, rises for `up` days, then falls again for `down`
/// days. Produces at least one SMA golden cross and one death cross.
pub fn v_then_peak(symbol: &str, start: &str, down: usize, up: usize) -> Vec<PriceRecord> {
    let mut closes = Vec::new();
    let mut price = 100.0;
    for _ in 0..down {
        price -= 1.0;
        closes.push(price);
    }
    for _ in 0..up {
        price += 1.0;
        closes.push(price);
    }
    for _ in 0..down {
        price -= 1.0;
        closes.push(price);
    }
    records_from_closes(symbol, start, &closes)
}
