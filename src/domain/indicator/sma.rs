//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = (C[i-n+1] + ... + C[i]) / n, trailing window, no centering.
//! Warmup: first (n-1) bars have no value.

use crate::domain::indicator::SmaSeries;
use crate::domain::ohlcv::PriceSeries;
use crate::domain::series::DatedValue;

/// Single pass over the closes with a running window sum.
pub fn compute_sma(series: &PriceSeries, window: usize) -> SmaSeries {
    let bars = series.bars();
    if window == 0 {
        return SmaSeries {
            window,
            values: bars.iter().map(|b| DatedValue::new(b.date, None)).collect(),
        };
    }

    let mut values = Vec::with_capacity(bars.len());
    let mut sum = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        sum += bar.close;
        if i >= window {
            sum -= bars[i - window].close;
        }
        let value = (i + 1 >= window).then(|| sum / window as f64);
        values.push(DatedValue::new(bar.date, value));
    }

    SmaSeries { window, values }
}
