//! Data access port trait.

use crate::domain::error::StockscopeError;
use crate::domain::price::PriceRecord;
use chrono::NaiveDate;

/// Source of historical daily prices. Retries and backoff against the
/// upstream provider belong to the implementation.
pub trait DataPort {
    /// Records for `symbol` with `start_date <= date <= end_date`, date-ordered.
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<PriceRecord>, StockscopeError>;

    fn list_symbols(&self) -> Result<Vec<String>, StockscopeError>;

    /// (first date, last date, record count), or `None` when the symbol is unknown.
    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, StockscopeError>;
}
