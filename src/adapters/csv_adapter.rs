//! CSV file market data adapter.
//!
//! One file per ticker, `<base>/<TICKER>.csv`, with the header
//! `date,open,high,low,close,volume`.

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};

const FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

/// Empty, NaN and non-numeric cells all read as missing.
fn parse_number(record: &StringRecord, index: usize) -> Option<f64> {
    record
        .get(index)
        .map(str::trim)
        .and_then(|raw| raw.parse::<f64>().ok())
        .filter(|v| !v.is_nan())
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, SmacrossError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| SmacrossError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();
        let mut dropped = 0usize;

        for result in rdr.records() {
            let record = result.map_err(|e| SmacrossError::DataSource {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(0).ok_or_else(|| SmacrossError::DataSource {
                reason: "missing date column".into(),
            })?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d").map_err(|e| {
                SmacrossError::DataSource {
                    reason: format!("invalid date format {:?}: {}", date_str, e),
                }
            })?;

            if date < start_date || date >= end_date {
                continue;
            }

            let values: Option<Vec<f64>> = (1..=FIELDS.len())
                .map(|i| parse_number(&record, i))
                .collect();
            let Some(values) = values else {
                warn!(%ticker, %date, "dropping row with missing or non-numeric values");
                dropped += 1;
                continue;
            };

            bars.push(PriceBar {
                date,
                open: values[0],
                high: values[1],
                low: values[2],
                close: values[3],
                volume: values[4],
            });
        }

        if bars.is_empty() {
            return Err(SmacrossError::NoData {
                ticker: ticker.to_string(),
            });
        }

        bars.sort_by_key(|b| b.date);
        info!(%ticker, rows = bars.len(), dropped, "data loaded");
        PriceSeries::new(bars)
    }

    fn list_tickers(&self) -> Result<Vec<String>, SmacrossError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| SmacrossError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut tickers = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| SmacrossError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(ticker) = name_str.strip_suffix(".csv") {
                tickers.push(ticker.to_string());
            }
        }

        tickers.sort();
        Ok(tickers)
    }
}
