//! CLI integration tests.
//!
//! Tests cover:
//! - Parameter resolution (config file, command line overrides, defaults)
//! - Config loading and validation with real INI files on disk
//! - End-to-end `backtest` runs against CSV files in a temp directory
//! - Exit codes for the error kinds

mod common;

use clap::Parser;
use common::*;
use smacross::adapters::file_config_adapter::FileConfigAdapter;
use smacross::cli::{self, Cli, Overrides};
use smacross::domain::error::SmacrossError;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use tempfile::TempDir;

fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn same_code(a: ExitCode, b: ExitCode) -> bool {
    format!("{:?}", a) == format!("{:?}", b)
}

fn write_price_csv(dir: &Path, ticker: &str, closes: &[f64]) {
    let mut content = String::from("date,open,high,low,close,volume\n");
    for bar in bars_from_closes(date(2024, 1, 1), closes) {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            bar.date, bar.open, bar.high, bar.low, bar.close, bar.volume
        ));
    }
    fs::write(dir.join(format!("{}.csv", ticker)), content).unwrap();
}

const VALID_INI: &str = r#"
[backtest]
ticker = msft
start_date = 2021-01-01
end_date = 2022-06-30
short_window = 20
long_window = 100

[data]
dir = /var/lib/prices

[report]
output = msft.html
"#;

mod param_resolution {
    use super::*;

    #[test]
    fn from_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let params = cli::resolve_params(&adapter, &Overrides::default()).unwrap();

        assert_eq!(params.ticker, "MSFT");
        assert_eq!(params.start_date, date(2021, 1, 1));
        assert_eq!(params.end_date, date(2022, 6, 30));
        assert_eq!(params.short_window, 20);
        assert_eq!(params.long_window, 100);
    }

    #[test]
    fn defaults_when_config_is_empty() {
        let params =
            cli::resolve_params(&FileConfigAdapter::empty(), &Overrides::default()).unwrap();

        assert_eq!(params.ticker, "AAPL");
        assert_eq!(params.start_date, date(2020, 1, 1));
        assert_eq!(params.end_date, date(2023, 1, 1));
        assert_eq!(params.short_window, 50);
        assert_eq!(params.long_window, 200);
    }

    #[test]
    fn overrides_win() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let overrides = Overrides {
            ticker: Some("tsla".into()),
            start: Some("2019-05-01".into()),
            end: None,
            short: Some(5),
            long: None,
        };
        let params = cli::resolve_params(&adapter, &overrides).unwrap();

        assert_eq!(params.ticker, "TSLA");
        assert_eq!(params.start_date, date(2019, 5, 1));
        assert_eq!(params.end_date, date(2022, 6, 30));
        assert_eq!(params.short_window, 5);
        assert_eq!(params.long_window, 100);
    }

    #[test]
    fn zero_window_override_rejected() {
        let overrides = Overrides {
            long: Some(0),
            ..Overrides::default()
        };
        let err = cli::resolve_params(&FileConfigAdapter::empty(), &overrides).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidParameter { name, .. } if name == "long_window"));
    }

    #[test]
    fn path_like_ticker_override_rejected() {
        let overrides = Overrides {
            ticker: Some("../secrets".into()),
            ..Overrides::default()
        };
        let err = cli::resolve_params(&FileConfigAdapter::empty(), &overrides).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidParameter { name, .. } if name == "ticker"));
    }

    #[test]
    fn bad_date_override_rejected() {
        let overrides = Overrides {
            end: Some("01/01/2023".into()),
            ..Overrides::default()
        };
        let err = cli::resolve_params(&FileConfigAdapter::empty(), &overrides).unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigInvalid { key, .. } if key == "end_date"));
    }

    #[test]
    fn start_after_end_rejected() {
        let overrides = Overrides {
            start: Some("2024-01-01".into()),
            end: Some("2023-01-01".into()),
            ..Overrides::default()
        };
        let err = cli::resolve_params(&FileConfigAdapter::empty(), &overrides).unwrap_err();
        assert!(matches!(err, SmacrossError::InvalidParameter { name, .. } if name == "start_date"));
    }
}

mod config_files {
    use super::*;

    #[test]
    fn load_config_from_disk() {
        let file = write_temp_ini(VALID_INI);
        let adapter = cli::load_config(file.path()).unwrap();
        let params = cli::resolve_params(&adapter, &Overrides::default()).unwrap();
        assert_eq!(params.ticker, "MSFT");
    }

    #[test]
    fn load_config_missing_file() {
        let err = cli::load_config(Path::new("/nonexistent/smacross.ini")).unwrap_err();
        assert!(matches!(err, SmacrossError::ConfigParse { .. }));
    }

    #[test]
    fn validate_command_accepts_valid_file() {
        let file = write_temp_ini(VALID_INI);
        let args = Cli::parse_from(["smacross", "validate", "--config", file.path().to_str().unwrap()]);
        assert!(same_code(cli::run(args), ExitCode::SUCCESS));
    }

    #[test]
    fn validate_command_rejects_bad_window() {
        let file = write_temp_ini("[backtest]\nshort_window = ten\n");
        let args = Cli::parse_from(["smacross", "validate", "--config", file.path().to_str().unwrap()]);
        assert!(same_code(cli::run(args), ExitCode::from(2)));
    }
}

mod end_to_end {
    use super::*;

    #[test]
    fn backtest_writes_report() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_price_csv(data.path(), "AAPL", &zigzag_closes());
        let report = out.path().join("report.html");

        let args = Cli::parse_from([
            "smacross",
            "backtest",
            "--ticker",
            "AAPL",
            "--start",
            "2024-01-01",
            "--end",
            "2024-12-31",
            "--short",
            "3",
            "--long",
            "10",
            "--data-dir",
            data.path().to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ]);

        assert!(same_code(cli::run(args), ExitCode::SUCCESS));
        let html = fs::read_to_string(&report).unwrap();
        assert!(html.contains("AAPL Price with 3/10 SMA Strategy"));
        assert!(html.contains("Data Loaded: 60 rows"));
    }

    #[test]
    fn backtest_reads_paths_from_config() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_price_csv(data.path(), "IBM", &zigzag_closes());
        let report = out.path().join("ibm.html");
        let ini = format!(
            "[backtest]\nticker = IBM\nstart_date = 2024-01-01\nend_date = 2025-01-01\nshort_window = 3\nlong_window = 10\n\n[data]\ndir = {}\n\n[report]\noutput = {}\n",
            data.path().display(),
            report.display()
        );
        let file = write_temp_ini(&ini);

        let args = Cli::parse_from(["smacross", "backtest", "-c", file.path().to_str().unwrap()]);

        assert!(same_code(cli::run(args), ExitCode::SUCCESS));
        assert!(report.exists());
    }

    #[test]
    fn backtest_insufficient_data_exit_code() {
        let data = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        write_price_csv(data.path(), "AAPL", &[10.0, 11.0, 12.0]);
        let report = out.path().join("report.html");

        let args = Cli::parse_from([
            "smacross",
            "backtest",
            "--start",
            "2024-01-01",
            "--end",
            "2024-12-31",
            "--data-dir",
            data.path().to_str().unwrap(),
            "--output",
            report.to_str().unwrap(),
        ]);

        assert!(same_code(cli::run(args), ExitCode::from(5)));
        assert!(!report.exists());
    }

    #[test]
    fn backtest_missing_ticker_file_exit_code() {
        let data = TempDir::new().unwrap();
        let args = Cli::parse_from([
            "smacross",
            "backtest",
            "--ticker",
            "NOPE",
            "--data-dir",
            data.path().to_str().unwrap(),
        ]);
        assert!(same_code(cli::run(args), ExitCode::from(3)));
    }

    #[test]
    fn list_tickers_succeeds() {
        let data = TempDir::new().unwrap();
        write_price_csv(data.path(), "AAPL", &[10.0]);
        let args = Cli::parse_from([
            "smacross",
            "list-tickers",
            "--data-dir",
            data.path().to_str().unwrap(),
        ]);
        assert!(same_code(cli::run(args), ExitCode::SUCCESS));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn error_kinds_map_to_codes() {
        let cases = [
            (
                SmacrossError::ConfigMissing {
                    section: "backtest".into(),
                    key: "ticker".into(),
                },
                2,
            ),
            (
                SmacrossError::DataSource {
                    reason: "x".into(),
                },
                3,
            ),
            (
                SmacrossError::InvalidParameter {
                    name: "short_window".into(),
                    reason: "x".into(),
                },
                4,
            ),
            (
                SmacrossError::InsufficientData {
                    bars: 1,
                    minimum: 2,
                },
                5,
            ),
            (
                SmacrossError::NoData {
                    ticker: "AAPL".into(),
                },
                5,
            ),
            (
                SmacrossError::MalformedInput {
                    reason: "x".into(),
                },
                6,
            ),
        ];
        for (err, code) in &cases {
            assert!(same_code(ExitCode::from(err), ExitCode::from(*code)), "{err}");
        }
    }
}
