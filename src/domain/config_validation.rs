//! Configuration validation.
//!
//! Validates the `[backtest]` section before any data is loaded. Every key is
//! optional; a present key must hold a well-formed value.

use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    validate_ticker(config)?;
    validate_dates(config)?;
    validate_windows(config)?;
    Ok(())
}

fn validate_ticker(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    match config.get_string("backtest", "ticker") {
        Some(s) if s.trim().is_empty() => Err(invalid("ticker", "ticker must not be empty")),
        _ => Ok(()),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start >= end {
            return Err(invalid("start_date", "start_date must be before end_date"));
        }
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), SmacrossError> {
    parse_optional_window(config, "short_window")?;
    parse_optional_window(config, "long_window")?;
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, SmacrossError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) => parse_date(&s, key).map(Some),
    }
}

pub fn parse_date(value: &str, key: &str) -> Result<NaiveDate, SmacrossError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(key, &format!("invalid {} format, expected YYYY-MM-DD", key)))
}

pub fn parse_optional_window(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<usize>, SmacrossError> {
    match config.get_string("backtest", key) {
        None => Ok(None),
        Some(s) => match s.trim().parse::<usize>() {
            Ok(0) | Err(_) => Err(invalid(key, &format!("{} must be a positive integer", key))),
            Ok(n) => Ok(Some(n)),
        },
    }
}

fn invalid(key: &str, reason: &str) -> SmacrossError {
    SmacrossError::ConfigInvalid {
        section: "backtest".to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}
