//! Signal replay against realized closes.
//!
//! Each symbol is either flat or long one unit. A BUY with a known close
//! opens a position, a later SELL with a known close closes it and records a
//! [`Trade`]. Signals without a matching close are skipped, and positions
//! still open at the end of the stream are dropped.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::indicator::{Signal, SignalRecord};
use crate::domain::price::PriceRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub symbol: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }

    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub trades: Vec<Trade>,
    pub total_pnl: f64,
    pub win_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    pub trades: usize,
    pub total_pnl: f64,
    pub win_rate: f64,
}

impl EvaluationResult {
    fn from_trades(trades: Vec<Trade>) -> Self {
        let total_pnl = trades.iter().map(|t| t.pnl).sum();
        let win_rate = win_rate(&trades.iter().collect::<Vec<_>>());
        Self {
            trades,
            total_pnl,
            win_rate,
        }
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    pub fn winning_trades(&self) -> usize {
        self.trades.iter().filter(|t| t.is_win()).count()
    }

    pub fn per_symbol(&self) -> BTreeMap<String, SymbolPerformance> {
        let mut grouped: BTreeMap<String, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.trades {
            grouped.entry(trade.symbol.clone()).or_default().push(trade);
        }

        grouped
            .into_iter()
            .map(|(symbol, trades)| {
                let perf = SymbolPerformance {
                    trades: trades.len(),
                    total_pnl: trades.iter().map(|t| t.pnl).sum(),
                    win_rate: win_rate(&trades),
                };
                (symbol, perf)
            })
            .collect()
    }
}

fn win_rate(trades: &[&Trade]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let wins = trades.iter().filter(|t| t.is_win()).count();
    wins as f64 / trades.len() as f64
}

#[derive(Debug, Clone, Copy)]
enum PositionState {
    Flat,
    Long { entry_date: NaiveDate, entry_price: f64 },
}

pub fn evaluate(records: &[PriceRecord], signals: &[SignalRecord]) -> EvaluationResult {
    let closes: HashMap<(&str, NaiveDate), f64> = records
        .iter()
        .map(|r| ((r.symbol.as_str(), r.date), r.close))
        .collect();

    let mut ordered: Vec<&SignalRecord> = signals.iter().collect();
    ordered.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));

    let mut positions: HashMap<&str, PositionState> = HashMap::new();
    let mut trades = Vec::new();

    for sig in ordered {
        let Some(&price) = closes.get(&(sig.symbol.as_str(), sig.date)) else {
            continue;
        };

        let state = positions
            .entry(sig.symbol.as_str())
            .or_insert(PositionState::Flat);

        match (*state, sig.signal) {
            (PositionState::Flat, Signal::Buy) => {
                *state = PositionState::Long {
                    entry_date: sig.date,
                    entry_price: price,
                };
            }
            (
                PositionState::Long {
                    entry_date,
                    entry_price,
                },
                Signal::Sell,
            ) if sig.date > entry_date => {
                trades.push(Trade {
                    symbol: sig.symbol.clone(),
                    entry_date,
                    exit_date: sig.date,
                    entry_price,
                    exit_price: price,
                    pnl: price - entry_price,
                });
                *state = PositionState::Flat;
            }
            _ => {}
        }
    }

    let dropped = positions
        .values()
        .filter(|s| matches!(s, PositionState::Long { .. }))
        .count();
    debug!(trades = trades.len(), open_dropped = dropped, "evaluated signals");

    EvaluationResult::from_trades(trades)
}
