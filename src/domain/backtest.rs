//! SMA crossover backtest against buy-and-hold.
//!
//! BacktestParams carries the per-run inputs; `run_backtest` is the pure
//! pipeline: SMA → signal → position change → returns → cumulative returns.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::error::SmacrossError;
use crate::domain::indicator::SmaSeries;
use crate::domain::indicator::sma::compute_sma;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::returns::{compute_returns, compute_strategy_returns, cumulative_return};
use crate::domain::series::{ReturnSeries, SignalSeries};
use crate::domain::signal::{
    PositionChange, PositionChangeSeries, compute_position_change, compute_signal,
};

pub const DEFAULT_TICKER: &str = "AAPL";
pub const DEFAULT_SHORT_WINDOW: usize = 50;
pub const DEFAULT_LONG_WINDOW: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestParams {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub short_window: usize,
    pub long_window: usize,
}

impl BacktestParams {
    /// Checks the run parameters before any data is loaded.
    ///
    /// Tickers are limited to exchange symbol characters (letters, digits,
    /// `.`, `-`, `^`, `=`); the ticker names a data file and appears in
    /// report text.
    pub fn validate(&self) -> Result<(), SmacrossError> {
        if self.ticker.is_empty() {
            return Err(invalid_param("ticker", "ticker must not be empty"));
        }
        if !self
            .ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='))
        {
            return Err(invalid_param(
                "ticker",
                &format!("'{}' is not a valid ticker symbol", self.ticker),
            ));
        }
        if self.start_date >= self.end_date {
            return Err(invalid_param(
                "start_date",
                &format!(
                    "start date {} must be before end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        check_windows(self.short_window, self.long_window)
    }
}

fn invalid_param(name: &str, reason: &str) -> SmacrossError {
    SmacrossError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn check_windows(short_window: usize, long_window: usize) -> Result<(), SmacrossError> {
    for (name, window) in [("short_window", short_window), ("long_window", long_window)] {
        if window == 0 {
            return Err(invalid_param(name, "window must be a positive integer"));
        }
    }
    Ok(())
}

impl Default for BacktestParams {
    fn default() -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_string(),
            start_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            short_window: DEFAULT_SHORT_WINDOW,
            long_window: DEFAULT_LONG_WINDOW,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub short_sma: SmaSeries,
    pub long_sma: SmaSeries,
    pub signal: SignalSeries,
    pub position_change: PositionChangeSeries,
    pub market_returns: ReturnSeries,
    pub strategy_returns: ReturnSeries,
    pub cumulative_market: ReturnSeries,
    pub cumulative_strategy: ReturnSeries,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSummary {
    pub bars: usize,
    pub market_growth: f64,
    pub strategy_growth: f64,
    pub buys: usize,
    pub sells: usize,
    pub open_at_end: bool,
}

impl BacktestSummary {
    pub fn market_return(&self) -> f64 {
        self.market_growth - 1.0
    }

    pub fn strategy_return(&self) -> f64 {
        self.strategy_growth - 1.0
    }
}

impl BacktestResult {
    pub fn len(&self) -> usize {
        self.signal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signal.is_empty()
    }

    pub fn summary(&self) -> BacktestSummary {
        let count = |kind: PositionChange| {
            self.position_change
                .iter()
                .filter(|p| p.value == kind)
                .count()
        };
        BacktestSummary {
            bars: self.len(),
            market_growth: self.cumulative_market.last().map_or(1.0, |p| p.value),
            strategy_growth: self.cumulative_strategy.last().map_or(1.0, |p| p.value),
            buys: count(PositionChange::Buy),
            sells: count(PositionChange::Sell),
            open_at_end: self.signal.last().is_some_and(|p| p.value),
        }
    }
}

pub fn run_backtest(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<BacktestResult, SmacrossError> {
    check_windows(short_window, long_window)?;

    if prices.len() < long_window {
        return Err(SmacrossError::InsufficientData {
            bars: prices.len(),
            minimum: long_window,
        });
    }

    prices.validate()?;

    let short_sma = compute_sma(prices, short_window);
    let long_sma = compute_sma(prices, long_window);
    let signal = compute_signal(&short_sma, &long_sma)?;
    let position_change = compute_position_change(&signal);

    let market_returns = compute_returns(prices)?;
    let strategy_returns = compute_strategy_returns(&market_returns, &signal)?;
    let cumulative_market = cumulative_return(&market_returns);
    let cumulative_strategy = cumulative_return(&strategy_returns);

    debug!(
        bars = prices.len(),
        short_window, long_window, "backtest computed"
    );

    Ok(BacktestResult {
        short_sma,
        long_sma,
        signal,
        position_change,
        market_returns,
        strategy_returns,
        cumulative_market,
        cumulative_strategy,
    })
}
