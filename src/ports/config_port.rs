//! Configuration access port trait.

use chrono::NaiveDate;

use crate::domain::error::StockscopeError;

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;

    /// Non-blank string value, or `ConfigMissing`.
    fn require_string(&self, section: &str, key: &str) -> Result<String, StockscopeError> {
        self.get_string(section, key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| StockscopeError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }

    /// `YYYY-MM-DD` value; `Ok(None)` when the key is absent.
    fn get_date(&self, section: &str, key: &str) -> Result<Option<NaiveDate>, StockscopeError> {
        match self.get_string(section, key) {
            None => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
                .map(Some)
                .map_err(|_| StockscopeError::ConfigInvalid {
                    section: section.to_string(),
                    key: key.to_string(),
                    reason: "invalid date format (expected YYYY-MM-DD)".to_string(),
                }),
        }
    }
}
