//! Moving-average indicator types.
//!
//! - `SmaSeries`: a trailing simple moving average aligned 1:1 with the
//!   price series it was computed from. Dates without enough history carry
//!   `None` rather than a sentinel value.

pub mod sma;

use std::fmt;

use crate::domain::series::DatedValue;

#[derive(Debug, Clone, PartialEq)]
pub struct SmaSeries {
    pub window: usize,
    pub values: Vec<DatedValue<Option<f64>>>,
}

impl SmaSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `index`, or `None` when out of range or still warming up.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    /// Number of leading dates without a value.
    pub fn warmup(&self) -> usize {
        self.values.iter().take_while(|p| p.value.is_none()).count()
    }
}

impl fmt::Display for SmaSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SMA({})", self.window)
    }
}
