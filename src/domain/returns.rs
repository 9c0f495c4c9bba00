//! Market, strategy and cumulative return series.

use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::series::{self, DatedValue, ReturnSeries};

/// Close-to-close relative change; the first date has no prior bar and
/// returns 0.
pub fn compute_returns(prices: &PriceSeries) -> Result<ReturnSeries, SmacrossError> {
    let bars = prices.bars();
    let mut returns = Vec::with_capacity(bars.len());

    for (i, bar) in bars.iter().enumerate() {
        if !bar.close.is_finite() || bar.close <= 0.0 {
            return Err(SmacrossError::malformed(format!(
                "close on {} is {}",
                bar.date, bar.close
            )));
        }
        let r = if i == 0 {
            0.0
        } else {
            let prev = bars[i - 1].close;
            (bar.close - prev) / prev
        };
        returns.push(DatedValue::new(bar.date, r));
    }

    Ok(returns)
}

/// `strategy[i] = market[i] * signal[i-1]`, flat before the first date.
///
/// The signal decided on a given close is only acted on from the next bar.
pub fn compute_strategy_returns(
    market: &[DatedValue<f64>],
    signal: &[DatedValue<bool>],
) -> Result<ReturnSeries, SmacrossError> {
    if !series::aligned(market, signal) {
        return Err(SmacrossError::malformed(format!(
            "market returns and signal are not aligned ({} vs {} points)",
            market.len(),
            signal.len()
        )));
    }

    let mut held_yesterday = false;
    Ok(market
        .iter()
        .zip(signal)
        .map(|(r, s)| {
            let exposure = if held_yesterday { 1.0 } else { 0.0 };
            held_yesterday = s.value;
            DatedValue::new(r.date, r.value * exposure)
        })
        .collect())
}

/// Running product of `(1 + r)` seeded at 1.0 before the first date.
pub fn cumulative_return(returns: &[DatedValue<f64>]) -> ReturnSeries {
    returns
        .iter()
        .scan(1.0_f64, |growth, r| {
            *growth *= 1.0 + r.value;
            Some(DatedValue::new(r.date, *growth))
        })
        .collect()
}
