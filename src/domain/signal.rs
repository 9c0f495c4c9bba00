//! Crossover signal and position-change derivation.
//!
//! The signal is long (`true`) only where the short SMA is strictly above the
//! long SMA. Dates where either SMA has no value compare as `false`.

use std::fmt;

use crate::domain::error::SmacrossError;
use crate::domain::indicator::SmaSeries;
use crate::domain::series::{self, DatedValue, SignalSeries};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
    /// Flat to long (+1).
    Buy,
    Hold,
    /// Long to flat (-1).
    Sell,
}

impl PositionChange {
    pub fn as_i8(self) -> i8 {
        match self {
            PositionChange::Buy => 1,
            PositionChange::Hold => 0,
            PositionChange::Sell => -1,
        }
    }

    fn between(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (false, true) => PositionChange::Buy,
            (true, false) => PositionChange::Sell,
            _ => PositionChange::Hold,
        }
    }
}

impl fmt::Display for PositionChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionChange::Buy => write!(f, "BUY"),
            PositionChange::Hold => write!(f, "HOLD"),
            PositionChange::Sell => write!(f, "SELL"),
        }
    }
}

pub type PositionChangeSeries = Vec<DatedValue<PositionChange>>;

pub fn compute_signal(short: &SmaSeries, long: &SmaSeries) -> Result<SignalSeries, SmacrossError> {
    if !series::aligned(&short.values, &long.values) {
        return Err(SmacrossError::malformed(format!(
            "{} and {} are not aligned ({} vs {} points)",
            short,
            long,
            short.len(),
            long.len()
        )));
    }

    Ok(short
        .values
        .iter()
        .zip(&long.values)
        .map(|(s, l)| {
            let holding = matches!((s.value, l.value), (Some(s), Some(l)) if s > l);
            DatedValue::new(s.date, holding)
        })
        .collect())
}

/// `signal[i] - signal[i-1]` with the position before the first date taken
/// as flat.
pub fn compute_position_change(signal: &[DatedValue<bool>]) -> PositionChangeSeries {
    let mut previous = false;
    signal
        .iter()
        .map(|point| {
            let change = PositionChange::between(previous, point.value);
            previous = point.value;
            DatedValue::new(point.date, change)
        })
        .collect()
}
