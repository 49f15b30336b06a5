//! Indicator parameter set and its validation.

use serde::{Deserialize, Serialize};

use crate::domain::error::StockscopeError;
use crate::domain::indicator::{
    DEFAULT_ATR_PERIOD, DEFAULT_LONG_WINDOW, DEFAULT_MFI_PERIOD, DEFAULT_OVERBOUGHT,
    DEFAULT_OVERSOLD, DEFAULT_RSI_PERIOD, DEFAULT_SHORT_WINDOW,
};
use crate::ports::config_port::ConfigPort;

const SECTION: &str = "indicators";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorParams {
    pub sma_short: usize,
    pub sma_long: usize,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    pub atr_period: usize,
    pub mfi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            sma_short: DEFAULT_SHORT_WINDOW,
            sma_long: DEFAULT_LONG_WINDOW,
            rsi_period: DEFAULT_RSI_PERIOD,
            rsi_overbought: DEFAULT_OVERBOUGHT,
            rsi_oversold: DEFAULT_OVERSOLD,
            atr_period: DEFAULT_ATR_PERIOD,
            mfi_period: DEFAULT_MFI_PERIOD,
        }
    }
}

impl IndicatorParams {
    /// Read `[indicators]`, falling back to defaults key by key.
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, StockscopeError> {
        let defaults = Self::default();
        Ok(Self {
            sma_short: read_window(config, "sma_short", defaults.sma_short)?,
            sma_long: read_window(config, "sma_long", defaults.sma_long)?,
            rsi_period: read_window(config, "rsi_period", defaults.rsi_period)?,
            rsi_overbought: config.get_double(SECTION, "rsi_overbought", defaults.rsi_overbought),
            rsi_oversold: config.get_double(SECTION, "rsi_oversold", defaults.rsi_oversold),
            atr_period: read_window(config, "atr_period", defaults.atr_period)?,
            mfi_period: read_window(config, "mfi_period", defaults.mfi_period)?,
        })
    }

    pub fn validate(&self) -> Result<(), StockscopeError> {
        let windows = [
            ("sma_short", self.sma_short),
            ("sma_long", self.sma_long),
            ("rsi_period", self.rsi_period),
            ("atr_period", self.atr_period),
            ("mfi_period", self.mfi_period),
        ];
        for (key, value) in windows {
            if value == 0 {
                return Err(invalid(key, format!("{} must be greater than 0", key)));
            }
        }

        if self.sma_short >= self.sma_long {
            return Err(invalid(
                "sma_short",
                "sma_short must be less than sma_long".to_string(),
            ));
        }

        for (key, value) in [
            ("rsi_overbought", self.rsi_overbought),
            ("rsi_oversold", self.rsi_oversold),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(invalid(key, format!("{} must be between 0 and 100", key)));
            }
        }

        if self.rsi_oversold >= self.rsi_overbought {
            return Err(invalid(
                "rsi_oversold",
                "rsi_oversold must be below rsi_overbought".to_string(),
            ));
        }

        Ok(())
    }
}

fn read_window(config: &dyn ConfigPort, key: &str, default: usize) -> Result<usize, StockscopeError> {
    let value = config.get_int(SECTION, key, default as i64);
    usize::try_from(value).map_err(|_| invalid(key, format!("{} must not be negative", key)))
}

fn invalid(key: &str, reason: String) -> StockscopeError {
    StockscopeError::ConfigInvalid {
        section: SECTION.to_string(),
        key: key.to_string(),
        reason,
    }
}
