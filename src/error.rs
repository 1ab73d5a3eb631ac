use thiserror::Error;

/// Errors surfaced by the reporting pipeline.
///
/// Only `DataUnavailable` is fatal for a render pass. Filter failures
/// are recovered inside the filter stage (the pass falls back to the
/// unfiltered table), and roster misses or empty result sets are plain
/// values, not errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The export could not be fetched or parsed. No partial table is
    /// ever produced from a bad source.
    #[error("data source unavailable: {0}")]
    DataUnavailable(String),

    /// A filter clause referenced a column the table does not have.
    #[error("unknown filter column: {0}")]
    UnknownFilterColumn(String),
}

impl From<reqwest::Error> for ReportError {
    fn from(err: reqwest::Error) -> Self {
        ReportError::DataUnavailable(err.to_string())
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::DataUnavailable(err.to_string())
    }
}

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        ReportError::DataUnavailable(err.to_string())
    }
}
