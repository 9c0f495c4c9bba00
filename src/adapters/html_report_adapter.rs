//! HTML report adapter implementing ReportPort.
//!
//! Renders `templates/report.html` with Askama: run heading, summary table,
//! the cumulative-return chart and the candlestick chart as inline SVG.

use std::fs;
use std::path::Path;

use askama::Template;
use chrono::NaiveDate;
use tracing::info;

use crate::adapters::chart_svg::{generate_candlestick_svg, generate_cumulative_returns_svg};
use crate::domain::backtest::{BacktestParams, BacktestResult, BacktestSummary};
use crate::domain::error::SmacrossError;
use crate::domain::ohlcv::PriceSeries;
use crate::ports::report_port::ReportPort;

struct SummaryRow {
    label: &'static str,
    value: String,
}

#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    ticker: &'a str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    short_window: usize,
    long_window: usize,
    rows: usize,
    summary_rows: Vec<SummaryRow>,
    returns_svg: String,
    candlestick_svg: String,
}

pub struct HtmlReportAdapter;

impl HtmlReportAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlReportAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn fmt_pct(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}

fn summary_rows(summary: &BacktestSummary) -> Vec<SummaryRow> {
    let row = |label, value| SummaryRow { label, value };
    vec![
        row("Bars", summary.bars.to_string()),
        row("Buy & Hold Return", fmt_pct(summary.market_return())),
        row("SMA Strategy Return", fmt_pct(summary.strategy_return())),
        row("Buy Signals", summary.buys.to_string()),
        row("Sell Signals", summary.sells.to_string()),
        row(
            "Position at End",
            if summary.open_at_end { "Long" } else { "Flat" }.to_string(),
        ),
    ]
}

pub fn render_html(
    prices: &PriceSeries,
    result: &BacktestResult,
    params: &BacktestParams,
) -> Result<String, SmacrossError> {
    let template = ReportTemplate {
        ticker: &params.ticker,
        start_date: params.start_date,
        end_date: params.end_date,
        short_window: params.short_window,
        long_window: params.long_window,
        rows: prices.len(),
        summary_rows: summary_rows(&result.summary()),
        returns_svg: generate_cumulative_returns_svg(result),
        candlestick_svg: generate_candlestick_svg(prices, result, params),
    };

    template
        .render()
        .map_err(|e| SmacrossError::Io(std::io::Error::other(e.to_string())))
}

impl ReportPort for HtmlReportAdapter {
    fn write(
        &self,
        prices: &PriceSeries,
        result: &BacktestResult,
        params: &BacktestParams,
        output_path: &Path,
    ) -> Result<(), SmacrossError> {
        let html = render_html(prices, result, params)?;
        fs::write(output_path, html)?;
        info!(path = %output_path.display(), "report written");
        Ok(())
    }
}
