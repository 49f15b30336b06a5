//! HTTP request handlers for the tool server.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use crate::domain::analysis::{MarketAnalysis, analyze};
use crate::domain::evaluate::{EvaluationResult, evaluate as run_evaluation};
use crate::domain::indicator::{
    MoneyFlowRecord, SignalRecord, VolatilityRecord, compute_atr, compute_mfi,
    compute_rsi_signals, compute_sma_signals,
};
use crate::domain::params::IndicatorParams;
use crate::domain::price::PriceRecord;
use crate::domain::series::{PriceSeries, normalize};
use crate::domain::stats::{SummaryStats, compute_summary_stats};
use crate::domain::universe::{load_universe, parse_symbols};

use super::{AppState, WebError};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub const TOOLS: &[ToolInfo] = &[
    ToolInfo {
        name: "basic-data",
        description: "Load symbols from the data source and return summary statistics, RSI signals, ATR and MFI",
    },
    ToolInfo {
        name: "sma-signals",
        description: "Short/long SMA crossover signals",
    },
    ToolInfo {
        name: "rsi-signals",
        description: "RSI overbought/oversold signals",
    },
    ToolInfo {
        name: "atr",
        description: "Average true range per symbol",
    },
    ToolInfo {
        name: "mfi",
        description: "Money flow index per symbol",
    },
    ToolInfo {
        name: "summary-stats",
        description: "Average daily return, volatility and max drawdown per symbol",
    },
    ToolInfo {
        name: "evaluate",
        description: "Long-only backtest of a signal list against closing prices",
    },
];

#[derive(Debug, Deserialize)]
pub struct BasicDataRequest {
    /// Comma-separated, e.g. `"RELIANCE,TCS.NS"`.
    pub symbols: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    pub records: Vec<PriceRecord>,
    #[serde(default)]
    pub params: Option<IndicatorParams>,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub records: Vec<PriceRecord>,
    pub signals: Vec<SignalRecord>,
}

impl SeriesRequest {
    fn into_parts(
        self,
        state: &AppState,
    ) -> Result<(PriceSeries, IndicatorParams), WebError> {
        let params = match self.params {
            Some(params) => {
                params.validate()?;
                params
            }
            None => state.params.clone(),
        };
        Ok((normalize(self.records)?, params))
    }
}

pub async fn list_tools() -> Json<&'static [ToolInfo]> {
    Json(TOOLS)
}

pub async fn basic_data(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BasicDataRequest>, JsonRejection>,
) -> Result<Json<MarketAnalysis>, WebError> {
    let Json(req) = payload?;
    if req.start_date > req.end_date {
        return Err(WebError::bad_request(format!(
            "start_date {} is after end_date {}",
            req.start_date, req.end_date
        )));
    }

    let symbols = parse_symbols(&req.symbols).map_err(|e| WebError::bad_request(e.to_string()))?;
    let universe = load_universe(&*state.data_port, &symbols, req.start_date, req.end_date)?;
    let series = normalize(universe.records)?;
    info!(
        symbols = universe.loaded.len(),
        skipped = universe.skipped.len(),
        "basic-data"
    );
    Ok(Json(analyze(&series, &state.params)))
}

pub async fn sma_signals(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<Vec<SignalRecord>>, WebError> {
    let Json(req) = payload?;
    let (series, params) = req.into_parts(&state)?;
    Ok(Json(compute_sma_signals(
        &series,
        params.sma_short,
        params.sma_long,
    )))
}

pub async fn rsi_signals(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<Vec<SignalRecord>>, WebError> {
    let Json(req) = payload?;
    let (series, params) = req.into_parts(&state)?;
    Ok(Json(compute_rsi_signals(
        &series,
        params.rsi_period,
        params.rsi_overbought,
        params.rsi_oversold,
    )))
}

pub async fn atr(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<BTreeMap<String, Vec<VolatilityRecord>>>, WebError> {
    let Json(req) = payload?;
    let (series, params) = req.into_parts(&state)?;
    Ok(Json(compute_atr(&series, params.atr_period)))
}

pub async fn mfi(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<BTreeMap<String, Vec<MoneyFlowRecord>>>, WebError> {
    let Json(req) = payload?;
    let (series, params) = req.into_parts(&state)?;
    Ok(Json(compute_mfi(&series, params.mfi_period)))
}

pub async fn summary_stats(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<BTreeMap<String, SummaryStats>>, WebError> {
    let Json(req) = payload?;
    let (series, _) = req.into_parts(&state)?;
    Ok(Json(compute_summary_stats(&series)))
}

pub async fn evaluate(
    payload: Result<Json<EvaluateRequest>, JsonRejection>,
) -> Result<Json<EvaluationResult>, WebError> {
    let Json(req) = payload?;
    Ok(Json(run_evaluation(&req.records, &req.signals)))
}

pub async fn not_found() -> WebError {
    WebError::not_found("no such tool")
}
