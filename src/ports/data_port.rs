//! Market data access port trait.

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `ticker` with `start_date <= date < end_date`.
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, SmacrossError>;

    fn list_tickers(&self) -> Result<Vec<String>, SmacrossError>;
}
