//! Report generation port trait.

use std::path::Path;

use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::PriceSeries;

/// Port for rendering backtest results.
pub trait ReportPort {
    fn write(
        &self,
        prices: &PriceSeries,
        result: &BacktestResult,
        params: &BacktestParams,
        output_path: &Path,
    ) -> Result<(), SmacrossError>;
}
