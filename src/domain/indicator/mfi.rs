//! MFI (Money Flow Index).
//!
//! Volume-weighted RSI analogue over typical price:
//! - typical_price = (high + low + close) / 3
//! - money_flow = typical_price * volume
//!
//! For bar i >= n, walk the window [i-n, i) pairwise: a rise in typical
//! price adds that bar's money flow to the positive side, anything else to
//! the negative side. MFI = 100 - 100 / (1 + positive / negative), or 100
//! when the negative side is empty.

use std::collections::BTreeMap;

use crate::domain::indicator::{MoneyFlowRecord, oscillator};
use crate::domain::price::PriceRecord;
use crate::domain::series::PriceSeries;

pub fn compute_mfi(series: &PriceSeries, period: usize) -> BTreeMap<String, Vec<MoneyFlowRecord>> {
    series
        .iter()
        .map(|(symbol, records)| (symbol.to_string(), symbol_mfi(symbol, records, period)))
        .collect()
}

fn symbol_mfi(symbol: &str, records: &[PriceRecord], period: usize) -> Vec<MoneyFlowRecord> {
    if period == 0 || records.len() <= period {
        return vec![];
    }

    let typical: Vec<f64> = records.iter().map(PriceRecord::typical_price).collect();
    let flows: Vec<f64> = records.iter().map(PriceRecord::money_flow).collect();

    (period..records.len())
        .map(|i| {
            let window_tp = &typical[i - period..i];
            let window_mf = &flows[i - period..i];

            let mut positive = 0.0;
            let mut negative = 0.0;
            for j in 1..window_tp.len() {
                if window_tp[j] > window_tp[j - 1] {
                    positive += window_mf[j];
                } else {
                    negative += window_mf[j];
                }
            }

            MoneyFlowRecord {
                symbol: symbol.to_string(),
                date: records[i].date,
                mfi: oscillator(positive, negative),
                typical_price: typical[i],
                money_flow: flows[i],
            }
        })
        .collect()
}
