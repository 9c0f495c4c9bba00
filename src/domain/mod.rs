//! Core domain types and the backtest engine.

pub mod ohlcv;
pub mod series;
pub mod indicator;
pub mod signal;
pub mod returns;
pub mod backtest;
pub mod config_validation;
pub mod error;
