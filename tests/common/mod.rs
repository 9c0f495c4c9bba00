#![allow(dead_code)]

use chrono::NaiveDate;
use smacross::domain::backtest::{BacktestParams, BacktestResult};
use smacross::domain::error::SmacrossError;
pub use smacross::domain::ohlcv::{PriceBar, PriceSeries};
use smacross::ports::data_port::DataPort;
use smacross::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, SmacrossError> {
        if let Some(reason) = self.errors.get(ticker) {
            return Err(SmacrossError::DataSource {
                reason: reason.clone(),
            });
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(ticker)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|b| b.date >= start_date && b.date < end_date)
            .collect();
        if bars.is_empty() {
            return Err(SmacrossError::NoData {
                ticker: ticker.to_string(),
            });
        }
        PriceSeries::new(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, SmacrossError> {
        let mut tickers: Vec<String> = self.data.keys().cloned().collect();
        tickers.sort();
        Ok(tickers)
    }
}

/// Records every write instead of touching the filesystem.
#[derive(Default)]
pub struct RecordingReportPort {
    pub writes: RefCell<Vec<(PathBuf, usize, String)>>,
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        prices: &PriceSeries,
        _result: &BacktestResult,
        params: &BacktestParams,
        output_path: &Path,
    ) -> Result<(), SmacrossError> {
        self.writes.borrow_mut().push((
            output_path.to_path_buf(),
            prices.len(),
            params.ticker.clone(),
        ));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: NaiveDate, close: f64) -> PriceBar {
    PriceBar {
        date,
        open: close,
        high: close + 1.0,
        low: close - 1.0,
        close,
        volume: 1000.0,
    }
}

/// One bar per calendar day starting at `start`.
pub fn bars_from_closes(start: NaiveDate, closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| make_bar(start + chrono::Duration::days(i as i64), close))
        .collect()
}

pub fn series_from_closes(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(bars_from_closes(date(2024, 1, 1), closes)).unwrap()
}

pub fn sample_params(ticker: &str, short_window: usize, long_window: usize) -> BacktestParams {
    BacktestParams {
        ticker: ticker.to_string(),
        start_date: date(2024, 1, 1),
        end_date: date(2025, 1, 1),
        short_window,
        long_window,
    }
}

/// Up, down, up again: produces at least one buy and one sell for short
/// windows.
pub fn zigzag_closes() -> Vec<f64> {
    let mut closes = Vec::new();
    for i in 0..20 {
        closes.push(100.0 + i as f64);
    }
    for i in 0..20 {
        closes.push(119.0 - i as f64);
    }
    for i in 0..20 {
        closes.push(100.0 + 2.0 * i as f64);
    }
    closes
}
