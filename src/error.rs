use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Dataset unavailable: {0}")]
    DataUnavailable(String),

    #[error("Required column '{column}' not found in input")]
    SchemaViolation { column: String },

    #[error("Date range violation: {0}")]
    RangeViolation(String),

    #[error("Station '{station}' not found in dataset")]
    StationNotFound { station: String },

    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl AnalysisError {
    /// Range violations skip the affected aggregate and let the rest of the
    /// session continue; everything else halts processing.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, AnalysisError::RangeViolation(_))
    }
}
