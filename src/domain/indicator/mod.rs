//! Technical indicator implementations.
//!
//! Output shapes shared by the indicator modules:
//! - `Signal`: BUY / HOLD / SELL, serialised as +1 / 0 / -1
//! - `SignalRecord`: one signal row with the readings that produced it
//! - `VolatilityRecord`: one ATR row
//! - `MoneyFlowRecord`: one MFI row
//!
//! RSI and ATR at index `i` average the `period` closing changes (true ranges)
//! ending with the move into bar `i`. MFI walks typical prices over
//! `[i - period, i)` and leaves bar `i` itself out.

pub mod atr;
pub mod mfi;
pub mod rsi;
pub mod sma;

pub use atr::compute_atr;
pub use mfi::compute_mfi;
pub use rsi::compute_rsi_signals;
pub use sma::compute_sma_signals;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const DEFAULT_SHORT_WINDOW: usize = 20;
pub const DEFAULT_LONG_WINDOW: usize = 50;
pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_OVERSOLD: f64 = 30.0;
pub const DEFAULT_ATR_PERIOD: usize = 14;
pub const DEFAULT_MFI_PERIOD: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Hold,
    Sell,
}

impl Signal {
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Buy => 1,
            Signal::Hold => 0,
            Signal::Sell => -1,
        }
    }
}

impl TryFrom<i64> for Signal {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Signal::Buy),
            0 => Ok(Signal::Hold),
            -1 => Ok(Signal::Sell),
            other => Err(format!("signal must be 1, 0 or -1, got {}", other)),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Hold => write!(f, "HOLD"),
            Signal::Sell => write!(f, "SELL"),
        }
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

impl<'de> Deserialize<'de> for Signal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        Signal::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Indicator readings carried alongside a signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndicatorReading {
    Rsi {
        rsi: f64,
    },
    /// `None` until the trailing window has filled.
    Sma {
        short_sma: Option<f64>,
        long_sma: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub symbol: String,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: IndicatorReading,
    pub signal: Signal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub atr: f64,
    pub atr_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoneyFlowRecord {
    pub symbol: String,
    pub date: NaiveDate,
    pub mfi: f64,
    pub typical_price: f64,
    pub money_flow: f64,
}

/// Order signal rows by (symbol, date).
pub(crate) fn sort_signals(signals: &mut [SignalRecord]) {
    signals.sort_by(|a, b| a.symbol.cmp(&b.symbol).then(a.date.cmp(&b.date)));
}

/// 100 - 100 / (1 + up / down), pinned to 100 when `down` is zero.
pub(crate) fn oscillator(up: f64, down: f64) -> f64 {
    if down == 0.0 {
        100.0
    } else {
        100.0 - (100.0 / (1.0 + up / down))
    }
}
