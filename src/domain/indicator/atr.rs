//! ATR (Average True Range).
//!
//! tr[k] is the true range at bar k + 1, so the true-range array starts at
//! the second bar. ATR at bar i >= n is the plain mean of tr[i-n .. i];
//! atr_percent = 100 * atr / close[i].

use std::collections::BTreeMap;

use crate::domain::indicator::VolatilityRecord;
use crate::domain::price::PriceRecord;
use crate::domain::series::PriceSeries;

pub fn compute_atr(series: &PriceSeries, period: usize) -> BTreeMap<String, Vec<VolatilityRecord>> {
    series
        .iter()
        .map(|(symbol, records)| (symbol.to_string(), symbol_atr(symbol, records, period)))
        .collect()
}

fn symbol_atr(symbol: &str, records: &[PriceRecord], period: usize) -> Vec<VolatilityRecord> {
    if period == 0 || records.len() <= period {
        return vec![];
    }

    let tr_values: Vec<f64> = records
        .windows(2)
        .map(|pair| pair[1].true_range(pair[0].close))
        .collect();

    (period..records.len())
        .map(|i| {
            let atr = tr_values[i - period..i].iter().sum::<f64>() / period as f64;
            let close = records[i].close;
            VolatilityRecord {
                symbol: symbol.to_string(),
                date: records[i].date,
                atr,
                atr_percent: atr / close * 100.0,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::normalize;
    use chrono::NaiveDate;

    fn make_record(day: u32, high: f64, low: f64, close: f64) -> PriceRecord {
        PriceRecord {
            symbol: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, day).unwrap(),
            open: close,
            high,
            low,
            close,
            adj_close: close,
            volume: 1000,
        }
    }

    #[test]
    fn constant_range_gives_constant_atr() {
        let records: Vec<PriceRecord> = (1..=6).map(|d| make_record(d, 110.0, 90.0, 100.0)).collect();
        let series = normalize(records).unwrap();
        let atr = compute_atr(&series, 3);

        let rows = &atr["TEST"];
        assert_eq!(rows.len(), 3);
        for row in rows {
            assert!((row.atr - 20.0).abs() < 1e-12);
            assert!((row.atr_percent - 20.0).abs() < 1e-12);
        }
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }

    #[test]
    fn window_ends_on_true_range_of_current_bar() {
        // tr: [10, 10, 40]
        // index 2 → mean(tr[0..2]) = 10, index 3 → mean(tr[1..3]) = 25
        let records = vec![
            make_record(1, 110.0, 100.0, 105.0),
            make_record(2, 115.0, 105.0, 110.0),
            make_record(3, 120.0, 110.0, 115.0),
            make_record(4, 155.0, 150.0, 150.0),
        ];
        let series = normalize(records).unwrap();
        let rows = &compute_atr(&series, 2)["TEST"];

        assert_eq!(rows.len(), 2);
        assert!((rows[0].atr - 10.0).abs() < 1e-12);
        assert!((rows[1].atr - 25.0).abs() < 1e-12);
        assert!((rows[1].atr_percent - 25.0 / 150.0 * 100.0).abs() < 1e-12);
    }

    #[test]
    fn short_series_has_empty_entry() {
        let records = vec![
            make_record(1, 110.0, 90.0, 100.0),
            make_record(2, 110.0, 90.0, 100.0),
        ];
        let series = normalize(records).unwrap();
        let atr = compute_atr(&series, 14);
        assert!(atr.contains_key("TEST"));
        assert!(atr["TEST"].is_empty());
    }

    #[test]
    fn zero_period_is_empty() {
        let records = vec![
            make_record(1, 110.0, 90.0, 100.0),
            make_record(2, 110.0, 90.0, 100.0),
        ];
        let series = normalize(records).unwrap();
        assert!(compute_atr(&series, 0)["TEST"].is_empty());
    }

    #[test]
    fn atr_non_negative() {
        let records: Vec<PriceRecord> = (1..=20)
            .map(|d| {
                let base = 100.0 + (d as f64 % 5.0) * 3.0;
                make_record(d, base + 2.0, base - 2.0, base)
            })
            .collect();
        let series = normalize(records).unwrap();
        for row in &compute_atr(&series, 5)["TEST"] {
            assert!(row.atr >= 0.0);
            assert!(row.atr_percent >= 0.0);
        }
    }
}
