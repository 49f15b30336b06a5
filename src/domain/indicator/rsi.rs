//! RSI (Relative Strength Index) signals.
//!
//! Simple (unweighted) averages, not Wilder smoothing:
//! - delta[k] = close[k+1] - close[k]
//! - avg_gain(i) = mean(gain[i-n .. i]), avg_loss(i) likewise
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: no rows for the first n bars.

use crate::domain::indicator::{IndicatorReading, Signal, SignalRecord, oscillator, sort_signals};
use crate::domain::price::PriceRecord;
use crate::domain::series::PriceSeries;

pub fn compute_rsi_signals(
    series: &PriceSeries,
    period: usize,
    overbought: f64,
    oversold: f64,
) -> Vec<SignalRecord> {
    let mut signals = Vec::new();
    for (symbol, records) in series.iter() {
        for (i, rsi) in rsi_values(records, period) {
            signals.push(SignalRecord {
                symbol: symbol.to_string(),
                date: records[i].date,
                reading: IndicatorReading::Rsi { rsi },
                signal: classify(rsi, overbought, oversold),
            });
        }
    }
    sort_signals(&mut signals);
    signals
}

/// (index, rsi) for every index >= period.
pub(crate) fn rsi_values(records: &[PriceRecord], period: usize) -> Vec<(usize, f64)> {
    if period == 0 || records.len() <= period {
        return vec![];
    }

    let mut gains = Vec::with_capacity(records.len() - 1);
    let mut losses = Vec::with_capacity(records.len() - 1);
    for pair in records.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(if change > 0.0 { change } else { 0.0 });
        losses.push(if change < 0.0 { -change } else { 0.0 });
    }

    (period..records.len())
        .map(|i| {
            let avg_gain = gains[i - period..i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[i - period..i].iter().sum::<f64>() / period as f64;
            (i, oscillator(avg_gain, avg_loss))
        })
        .collect()
}

fn classify(rsi: f64, overbought: f64, oversold: f64) -> Signal {
    if rsi <= oversold {
        Signal::Buy
    } else if rsi >= overbought {
        Signal::Sell
    } else {
        Signal::Hold
    }
}
