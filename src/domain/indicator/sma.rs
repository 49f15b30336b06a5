//! SMA crossover signals.
//!
//! SMA(n)[i] = mean(close[i+1-n ..= i]), defined once i + 1 >= n.
//! BUY when short > long, SELL when short < long, HOLD otherwise
//! (including while either average is still undefined).

use crate::domain::indicator::{IndicatorReading, Signal, SignalRecord, sort_signals};
use crate::domain::price::PriceRecord;
use crate::domain::series::PriceSeries;

pub fn compute_sma_signals(
    series: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Vec<SignalRecord> {
    let mut signals = Vec::new();
    for (symbol, records) in series.iter() {
        signals.extend(symbol_signals(symbol, records, short_window, long_window));
    }
    sort_signals(&mut signals);
    signals
}

fn symbol_signals(
    symbol: &str,
    records: &[PriceRecord],
    short_window: usize,
    long_window: usize,
) -> Vec<SignalRecord> {
    let len = records.len();
    if short_window == 0 || long_window == 0 || short_window > len || long_window > len {
        return vec![];
    }

    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let short = trailing_means(&closes, short_window);
    let long = trailing_means(&closes, long_window);

    records
        .iter()
        .zip(short.into_iter().zip(long))
        .map(|(record, (short_sma, long_sma))| SignalRecord {
            symbol: symbol.to_string(),
            date: record.date,
            reading: IndicatorReading::Sma {
                short_sma,
                long_sma,
            },
            signal: crossover(short_sma, long_sma),
        })
        .collect()
}

/// Trailing mean per index; `None` before the window fills.
fn trailing_means(values: &[f64], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| {
            if i + 1 >= window {
                let slice = &values[i + 1 - window..=i];
                Some(slice.iter().sum::<f64>() / window as f64)
            } else {
                None
            }
        })
        .collect()
}

fn crossover(short_sma: Option<f64>, long_sma: Option<f64>) -> Signal {
    match (short_sma, long_sma) {
        (Some(s), Some(l)) if s > l => Signal::Buy,
        (Some(s), Some(l)) if s < l => Signal::Sell,
        _ => Signal::Hold,
    }
}
