//! stockscope: technical indicators and signal backtests over daily OHLCV series.
//!
//! Hexagonal architecture: pure computations in [`domain`], port traits in
//! [`ports`], concrete data/config/transport implementations in [`adapters`].
//!
//! The usual pipeline:
//! [`normalize`] → indicators / [`compute_summary_stats`] → [`evaluate`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
pub mod logging;

pub use domain::analysis::{MarketAnalysis, analyze};
pub use domain::error::StockscopeError;
pub use domain::evaluate::{EvaluationResult, Trade, evaluate};
pub use domain::indicator::{
    MoneyFlowRecord, Signal, SignalRecord, VolatilityRecord, compute_atr, compute_mfi,
    compute_rsi_signals, compute_sma_signals,
};
pub use domain::params::IndicatorParams;
pub use domain::price::PriceRecord;
pub use domain::series::{PriceSeries, normalize};
pub use domain::stats::{SummaryStats, compute_summary_stats};
