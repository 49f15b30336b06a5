//! Bundled market analysis: summary stats, RSI signals, ATR and MFI in one pass.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::indicator::{
    MoneyFlowRecord, SignalRecord, VolatilityRecord, compute_atr, compute_mfi,
    compute_rsi_signals,
};
use crate::domain::params::IndicatorParams;
use crate::domain::series::PriceSeries;
use crate::domain::stats::{SummaryStats, compute_summary_stats};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub summary_statistics: BTreeMap<String, SummaryStats>,
    pub rsi_signals: Vec<SignalRecord>,
    pub atr: BTreeMap<String, Vec<VolatilityRecord>>,
    pub mfi: BTreeMap<String, Vec<MoneyFlowRecord>>,
}

pub fn analyze(series: &PriceSeries, params: &IndicatorParams) -> MarketAnalysis {
    MarketAnalysis {
        summary_statistics: compute_summary_stats(series),
        rsi_signals: compute_rsi_signals(
            series,
            params.rsi_period,
            params.rsi_overbought,
            params.rsi_oversold,
        ),
        atr: compute_atr(series, params.atr_period),
        mfi: compute_mfi(series, params.mfi_period),
    }
}
