//! Date-aligned series shared by the engine's derived quantities.

use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatedValue<T> {
    pub date: NaiveDate,
    pub value: T,
}

impl<T> DatedValue<T> {
    pub fn new(date: NaiveDate, value: T) -> Self {
        Self { date, value }
    }
}

/// Per-date "hold long" flag.
pub type SignalSeries = Vec<DatedValue<bool>>;

/// Per-date simple or compounded returns.
pub type ReturnSeries = Vec<DatedValue<f64>>;

/// Returns the values of a series, dropping dates.
pub fn values<T: Copy>(series: &[DatedValue<T>]) -> Vec<T> {
    series.iter().map(|p| p.value).collect()
}

/// True when both series cover exactly the same dates in the same order.
pub fn aligned<A, B>(a: &[DatedValue<A>], b: &[DatedValue<B>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.date == y.date)
}
