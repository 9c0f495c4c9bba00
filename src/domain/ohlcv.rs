//! Daily price bars and the date-ordered series the engine consumes.

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl PriceBar {
    /// Checks that every price is finite and positive and that volume is
    /// finite and non-negative.
    pub fn validate(&self) -> Result<(), SmacrossError> {
        for (name, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SmacrossError::malformed(format!(
                    "{} on {} is {} (must be finite and positive)",
                    name, self.date, value
                )));
            }
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(SmacrossError::malformed(format!(
                "volume on {} is {} (must be finite and non-negative)",
                self.date, self.volume
            )));
        }
        Ok(())
    }
}

/// Bars with strictly increasing dates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self, SmacrossError> {
        if let Some(w) = bars.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SmacrossError::malformed(format!(
                "dates must be strictly increasing: {} followed by {}",
                w[0].date, w[1].date
            )));
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.bars.iter().map(|b| b.date)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// Validates every bar, failing on the first malformed one.
    pub fn validate(&self) -> Result<(), SmacrossError> {
        self.bars.iter().try_for_each(PriceBar::validate)
    }
}
