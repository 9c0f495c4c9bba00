//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::html_report_adapter::HtmlReportAdapter;
use crate::domain::backtest::{BacktestParams, BacktestSummary, run_backtest};
use crate::domain::config_validation::{
    parse_date, parse_optional_date, parse_optional_window, validate_backtest_config,
};
use crate::domain::error::SmacrossError;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_OUTPUT: &str = "report.html";

#[derive(Parser, Debug)]
#[command(name = "smacross", about = "SMA crossover strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest
    Backtest {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        ticker: Option<String>,
        /// First date to include (YYYY-MM-DD)
        #[arg(long)]
        start: Option<String>,
        /// First date to exclude (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        short: Option<usize>,
        #[arg(long)]
        long: Option<usize>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List tickers available in the data directory
    ListTickers {
        #[arg(short, long)]
        data_dir: PathBuf,
    },
}

/// Command line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub short: Option<usize>,
    pub long: Option<usize>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            ticker,
            start,
            end,
            short,
            long,
            data_dir,
            output,
        } => {
            let overrides = Overrides {
                ticker,
                start,
                end,
                short,
                long,
            };
            run_backtest_command(config.as_ref(), &overrides, data_dir, output)
        }
        Command::Validate { config } => run_validate(&config),
        Command::ListTickers { data_dir } => run_list_tickers(data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, SmacrossError> {
    FileConfigAdapter::from_file(path).map_err(|e| SmacrossError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn fail(err: &SmacrossError) -> ExitCode {
    error!("{err}");
    err.into()
}

fn run_backtest_command(
    config_path: Option<&PathBuf>,
    overrides: &Overrides,
    data_dir: Option<PathBuf>,
    output: Option<PathBuf>,
) -> ExitCode {
    let config = match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            match load_config(path) {
                Ok(c) => c,
                Err(e) => return fail(&e),
            }
        }
        None => FileConfigAdapter::empty(),
    };

    if let Err(e) = validate_backtest_config(&config) {
        return fail(&e);
    }

    let params = match resolve_params(&config, overrides) {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    let data_dir = data_dir
        .or_else(|| config.get_string("data", "dir").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
    let output = output
        .or_else(|| config.get_string("report", "output").map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT));

    let data_port = CsvAdapter::new(data_dir);
    let report_port = HtmlReportAdapter::new();

    match run_backtest_pipeline(&data_port, &report_port, &params, &output) {
        Ok(summary) => {
            print_summary(&params, &summary);
            println!("\nReport written to: {}", output.display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Command line overrides win over config values, which win over defaults.
pub fn resolve_params(
    config: &dyn ConfigPort,
    overrides: &Overrides,
) -> Result<BacktestParams, SmacrossError> {
    let defaults = BacktestParams::default();

    let ticker = overrides
        .ticker
        .clone()
        .or_else(|| config.get_string("backtest", "ticker"))
        .map(|t| t.trim().to_uppercase())
        .unwrap_or(defaults.ticker);

    let start_date = resolve_date(config, overrides.start.as_deref(), "start_date")?
        .unwrap_or(defaults.start_date);
    let end_date =
        resolve_date(config, overrides.end.as_deref(), "end_date")?.unwrap_or(defaults.end_date);

    let short_window = match overrides.short {
        Some(n) => n,
        None => parse_optional_window(config, "short_window")?.unwrap_or(defaults.short_window),
    };
    let long_window = match overrides.long {
        Some(n) => n,
        None => parse_optional_window(config, "long_window")?.unwrap_or(defaults.long_window),
    };

    let params = BacktestParams {
        ticker,
        start_date,
        end_date,
        short_window,
        long_window,
    };
    params.validate()?;
    if params.short_window >= params.long_window {
        warn!(
            short_window = params.short_window,
            long_window = params.long_window,
            "short window is not shorter than long window"
        );
    }

    Ok(params)
}

fn resolve_date(
    config: &dyn ConfigPort,
    flag: Option<&str>,
    key: &str,
) -> Result<Option<NaiveDate>, SmacrossError> {
    match flag {
        Some(s) => parse_date(s, key).map(Some),
        None => parse_optional_date(config, key),
    }
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    params: &BacktestParams,
    output: &Path,
) -> Result<BacktestSummary, SmacrossError> {
    info!(
        ticker = %params.ticker,
        start = %params.start_date,
        end = %params.end_date,
        short = params.short_window,
        long = params.long_window,
        "running backtest"
    );

    params.validate()?;
    let prices = data_port.fetch_prices(&params.ticker, params.start_date, params.end_date)?;
    let result = run_backtest(&prices, params.short_window, params.long_window)?;
    report_port.write(&prices, &result, params, output)?;

    Ok(result.summary())
}

fn print_summary(params: &BacktestParams, summary: &BacktestSummary) {
    println!(
        "Analyzing {} from {} to {} with SMA {}/{}",
        params.ticker, params.start_date, params.end_date, params.short_window, params.long_window
    );
    println!("\n=== Results ===");
    println!("Bars:             {}", summary.bars);
    println!("Buy & Hold:       {:+.2}%", summary.market_return() * 100.0);
    println!("SMA Strategy:     {:+.2}%", summary.strategy_return() * 100.0);
    println!("Buy Signals:      {}", summary.buys);
    println!("Sell Signals:     {}", summary.sells);
    println!(
        "Position at End:  {}",
        if summary.open_at_end { "Long" } else { "Flat" }
    );
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!(path = %config_path.display(), "validating config");
    let config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    if let Err(e) = validate_backtest_config(&config) {
        return fail(&e);
    }

    match resolve_params(&config, &Overrides::default()) {
        Ok(params) => {
            println!("ticker:       {}", params.ticker);
            println!("start_date:   {}", params.start_date);
            println!("end_date:     {}", params.end_date);
            println!("short_window: {}", params.short_window);
            println!("long_window:  {}", params.long_window);
            println!("\nConfiguration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

fn run_list_tickers(data_dir: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.clone());
    match adapter.list_tickers() {
        Ok(tickers) if tickers.is_empty() => {
            warn!(dir = %data_dir.display(), "no tickers found");
            ExitCode::SUCCESS
        }
        Ok(tickers) => {
            for ticker in &tickers {
                println!("{}", ticker);
            }
            info!(count = tickers.len(), "tickers found");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}
