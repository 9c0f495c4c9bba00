//! SVG chart rendering for reports.
//!
//! Two charts: cumulative returns (buy & hold against the SMA strategy) and a
//! candlestick chart with both SMAs and buy/sell markers overlaid.

use chrono::NaiveDate;

use crate::domain::backtest::{BacktestParams, BacktestResult};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::signal::PositionChange;

const CHART_WIDTH: f64 = 900.0;
const CHART_HEIGHT: f64 = 360.0;
const MARGIN_LEFT: f64 = 60.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 40.0;

const BUY_OFFSET: f64 = 0.99;
const SELL_OFFSET: f64 = 1.01;

const MARKET_COLOR: &str = "#2563eb";
const STRATEGY_COLOR: &str = "#f97316";
const SHORT_SMA_COLOR: &str = "blue";
const LONG_SMA_COLOR: &str = "orange";
const UP_COLOR: &str = "#16a34a";
const DOWN_COLOR: &str = "#dc2626";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeMarker {
    pub index: usize,
    pub date: NaiveDate,
    pub change: PositionChange,
    pub price: f64,
}

/// Buy markers sit just under the bar's low, sell markers just above its high.
pub fn trade_markers(prices: &PriceSeries, result: &BacktestResult) -> Vec<TradeMarker> {
    prices
        .bars()
        .iter()
        .zip(&result.position_change)
        .enumerate()
        .filter_map(|(index, (bar, change))| {
            let price = match change.value {
                PositionChange::Buy => bar.low * BUY_OFFSET,
                PositionChange::Sell => bar.high * SELL_OFFSET,
                PositionChange::Hold => return None,
            };
            Some(TradeMarker {
                index,
                date: bar.date,
                change: change.value,
                price,
            })
        })
        .collect()
}

/// Maps series index and value to SVG coordinates.
struct Frame {
    points: usize,
    min: f64,
    max: f64,
}

impl Frame {
    fn new(points: usize, values: impl Iterator<Item = f64>) -> Self {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        let (min, max) = if min.is_finite() && max.is_finite() {
            (min, max)
        } else {
            (0.0, 1.0)
        };
        // Flat series still need a visible band.
        let (min, max) = if max - min < f64::EPSILON {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        Self { points, min, max }
    }

    fn plot_width() -> f64 {
        CHART_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn plot_height() -> f64 {
        CHART_HEIGHT - MARGIN_TOP - MARGIN_BOTTOM
    }

    fn slot_width(&self) -> f64 {
        Self::plot_width() / self.points.max(1) as f64
    }

    /// Centre of the slot for `index`.
    fn x(&self, index: usize) -> f64 {
        MARGIN_LEFT + (index as f64 + 0.5) * self.slot_width()
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + Self::plot_height() - ((value - self.min) / (self.max - self.min)) * Self::plot_height()
    }
}

/// Builds path data, lifting the pen over indices without a value.
fn path_data(frame: &Frame, values: impl Iterator<Item = Option<f64>>) -> String {
    let mut path = String::new();
    let mut pen_down = false;
    for (i, value) in values.enumerate() {
        match value {
            Some(v) => {
                let cmd = if pen_down { " L" } else if path.is_empty() { "M" } else { " M" };
                path.push_str(&format!("{} {:.1} {:.1}", cmd, frame.x(i), frame.y(v)));
                pen_down = true;
            }
            None => pen_down = false,
        }
    }
    path
}

/// Text is written as markup: labels are fixed strings or validated tickers.
fn open_svg(title: &str, y_label: &str) -> String {
    let mut svg = String::new();
    svg.push_str(&format!(
        r##"<svg width="{}" height="{}" viewBox="0 0 {} {}" xmlns="http://www.w3.org/2000/svg">"##,
        CHART_WIDTH, CHART_HEIGHT, CHART_WIDTH, CHART_HEIGHT
    ));
    svg.push_str("\n  <rect width=\"100%\" height=\"100%\" fill=\"white\"/>\n");
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"20\" text-anchor=\"middle\" font-size=\"14\" fill=\"#111\">{}</text>\n",
        CHART_WIDTH / 2.0,
        title
    ));
    svg.push_str(&format!(
        "  <text x=\"12\" y=\"{}\" transform=\"rotate(-90 12 {})\" text-anchor=\"middle\" font-size=\"11\" fill=\"#666\">{}</text>\n",
        CHART_HEIGHT / 2.0,
        CHART_HEIGHT / 2.0,
        y_label
    ));
    svg
}

fn push_axes(svg: &mut String, frame: &Frame, dates: &[NaiveDate]) {
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        MARGIN_TOP,
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));
    svg.push_str(&format!(
        "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"#ccc\" stroke-width=\"1\"/>\n",
        MARGIN_LEFT,
        CHART_HEIGHT - MARGIN_BOTTOM,
        CHART_WIDTH - MARGIN_RIGHT,
        CHART_HEIGHT - MARGIN_BOTTOM
    ));

    let mid = (frame.min + frame.max) / 2.0;
    for value in [frame.max, mid, frame.min] {
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" text-anchor=\"end\" font-size=\"10\" fill=\"#666\">{:.2}</text>\n",
            MARGIN_LEFT - 5.0,
            frame.y(value) + 3.0,
            value
        ));
    }

    if let (Some(first), Some(last)) = (dates.first(), dates.last()) {
        let mid_index = dates.len() / 2;
        for (index, date) in [(0, *first), (mid_index, dates[mid_index]), (dates.len() - 1, *last)] {
            svg.push_str(&format!(
                "  <text x=\"{:.1}\" y=\"{}\" text-anchor=\"middle\" font-size=\"10\" fill=\"#666\">{}</text>\n",
                frame.x(index),
                CHART_HEIGHT - MARGIN_BOTTOM + 15.0,
                date
            ));
        }
    }
    svg.push_str(&format!(
        "  <text x=\"{}\" y=\"{}\" text-anchor=\"middle\" font-size=\"11\" fill=\"#666\">Date</text>\n",
        MARGIN_LEFT + Frame::plot_width() / 2.0,
        CHART_HEIGHT - 5.0
    ));
}

fn push_legend(svg: &mut String, entries: &[(&str, &str)]) {
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = MARGIN_TOP + 10.0 + i as f64 * 16.0;
        svg.push_str(&format!(
            "  <line x1=\"{}\" y1=\"{:.1}\" x2=\"{}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            MARGIN_LEFT + 10.0,
            y,
            MARGIN_LEFT + 30.0,
            y,
            color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{:.1}\" font-size=\"11\" fill=\"#111\">{}</text>\n",
            MARGIN_LEFT + 35.0,
            y + 4.0,
            label
        ));
    }
}

pub fn generate_cumulative_returns_svg(result: &BacktestResult) -> String {
    if result.is_empty() {
        return String::new();
    }

    let frame = Frame::new(
        result.len(),
        result
            .cumulative_market
            .iter()
            .chain(&result.cumulative_strategy)
            .map(|p| p.value),
    );
    let dates: Vec<NaiveDate> = result.cumulative_market.iter().map(|p| p.date).collect();

    let mut svg = open_svg("Strategy Backtest Results", "Cumulative Returns");
    push_axes(&mut svg, &frame, &dates);

    for (series, color) in [
        (&result.cumulative_market, MARKET_COLOR),
        (&result.cumulative_strategy, STRATEGY_COLOR),
    ] {
        svg.push_str(&format!(
            "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>\n",
            path_data(&frame, series.iter().map(|p| Some(p.value))),
            color
        ));
    }

    push_legend(
        &mut svg,
        &[("Buy &amp; Hold", MARKET_COLOR), ("SMA Strategy", STRATEGY_COLOR)],
    );
    svg.push_str("</svg>");
    svg
}

pub fn generate_candlestick_svg(
    prices: &PriceSeries,
    result: &BacktestResult,
    params: &BacktestParams,
) -> String {
    if prices.is_empty() {
        return String::new();
    }

    let markers = trade_markers(prices, result);
    let frame = Frame::new(
        prices.len(),
        prices
            .bars()
            .iter()
            .flat_map(|b| [b.low, b.high])
            .chain(markers.iter().map(|m| m.price)),
    );
    let dates: Vec<NaiveDate> = prices.dates().collect();

    let title = format!(
        "{} Price with {}/{} SMA Strategy",
        params.ticker, params.short_window, params.long_window
    );
    let mut svg = open_svg(&title, "Price ($)");
    push_axes(&mut svg, &frame, &dates);

    let body_width = (frame.slot_width() * 0.6).max(1.0);
    for (i, bar) in prices.bars().iter().enumerate() {
        let color = if bar.close >= bar.open { UP_COLOR } else { DOWN_COLOR };
        let x = frame.x(i);
        let top = frame.y(bar.open.max(bar.close));
        let bottom = frame.y(bar.open.min(bar.close));
        svg.push_str(&format!(
            "  <line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"1\"/>\n",
            x,
            frame.y(bar.high),
            x,
            frame.y(bar.low),
            color
        ));
        svg.push_str(&format!(
            "  <rect class=\"candle\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"/>\n",
            x - body_width / 2.0,
            top,
            body_width,
            (bottom - top).max(1.0),
            color
        ));
    }

    for (sma, color) in [
        (&result.short_sma, SHORT_SMA_COLOR),
        (&result.long_sma, LONG_SMA_COLOR),
    ] {
        let path = path_data(&frame, sma.values.iter().map(|p| p.value));
        if !path.is_empty() {
            svg.push_str(&format!(
                "  <path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>\n",
                path, color
            ));
        }
    }

    for marker in &markers {
        let x = frame.x(marker.index);
        let y = frame.y(marker.price);
        let (points, color, class) = match marker.change {
            PositionChange::Buy => (
                format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", x, y, x - 5.0, y + 9.0, x + 5.0, y + 9.0),
                UP_COLOR,
                "buy",
            ),
            _ => (
                format!("{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}", x, y, x - 5.0, y - 9.0, x + 5.0, y - 9.0),
                DOWN_COLOR,
                "sell",
            ),
        };
        svg.push_str(&format!(
            "  <polygon class=\"{}\" points=\"{}\" fill=\"{}\"/>\n",
            class, points, color
        ));
    }

    let short_label = result.short_sma.to_string();
    let long_label = result.long_sma.to_string();
    push_legend(
        &mut svg,
        &[
            (short_label.as_str(), SHORT_SMA_COLOR),
            (long_label.as_str(), LONG_SMA_COLOR),
        ],
    );
    svg.push_str("</svg>");
    svg
}
