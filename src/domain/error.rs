//! Domain error types.

/// Top-level error type for smacross.
#[derive(Debug, thiserror::Error)]
pub enum SmacrossError {
    #[error("insufficient data: have {bars} bars, need {minimum}")]
    InsufficientData { bars: usize, minimum: usize },

    #[error("malformed input: {reason}")]
    MalformedInput { reason: String },

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data for {ticker} - check ticker and date range")]
    NoData { ticker: String },

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SmacrossError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SmacrossError::MalformedInput {
            reason: reason.into(),
        }
    }
}

impl From<&SmacrossError> for std::process::ExitCode {
    fn from(err: &SmacrossError) -> Self {
        let code: u8 = match err {
            SmacrossError::Io(_) => 1,
            SmacrossError::ConfigParse { .. }
            | SmacrossError::ConfigMissing { .. }
            | SmacrossError::ConfigInvalid { .. } => 2,
            SmacrossError::DataSource { .. } => 3,
            SmacrossError::InvalidParameter { .. } => 4,
            SmacrossError::NoData { .. } | SmacrossError::InsufficientData { .. } => 5,
            SmacrossError::MalformedInput { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
