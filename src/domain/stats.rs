//! Per-symbol summary statistics over daily closes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::series::PriceSeries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Mean simple daily return.
    pub avg_return: f64,
    /// Sample standard deviation of daily returns; `None` with a single return.
    pub volatility: Option<f64>,
    /// Largest peak-to-trough decline as a fraction of the peak.
    pub max_drawdown: f64,
}

/// Symbols with fewer than two records are left out.
pub fn compute_summary_stats(series: &PriceSeries) -> BTreeMap<String, SummaryStats> {
    series
        .iter()
        .filter(|(_, records)| records.len() >= 2)
        .map(|(symbol, records)| {
            let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
            (symbol.to_string(), summarize(&closes))
        })
        .collect()
}

fn summarize(closes: &[f64]) -> SummaryStats {
    let returns = daily_returns(closes);
    let avg_return = mean(&returns);
    SummaryStats {
        avg_return,
        volatility: sample_stddev(&returns, avg_return),
        max_drawdown: max_drawdown(closes),
    }
}

fn daily_returns(closes: &[f64]) -> Vec<f64> {
    closes.windows(2).map(|w| w[1] / w[0] - 1.0).collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn max_drawdown(closes: &[f64]) -> f64 {
    let Some(&first) = closes.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &close in closes {
        if close > peak {
            peak = close;
        } else if peak > 0.0 {
            let dd = (peak - close) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}
