use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort a single (instrument, event) analysis.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Price series has no bars")]
    EmptySeries,

    #[error("Malformed price series: {0}")]
    MalformedSeries(String),

    #[error("No trading session on or after {0}")]
    AnchorNotFound(NaiveDate),

    #[error("Trading-day offset {offset} from {anchor} falls outside the series")]
    OutOfRange { anchor: NaiveDate, offset: i64 },

    #[error("Insufficient window: {0}")]
    InsufficientWindow(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Boundary-layer error types (file loading, batch orchestration).
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

pub type CoreResult<T> = std::result::Result<T, AnalysisError>;
