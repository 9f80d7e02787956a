use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across loading, reshaping and output.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Error type returned by every stage of the metadata pipeline.
///
/// Underlying parse and I/O failures are wrapped unmodified; the remaining variants describe
/// input that cannot be turned into a metadata document.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Spreadsheet parsing error.
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON (de)serialization error, either reading the job config or writing the document.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input file extension is neither a spreadsheet nor CSV.
    #[error("unsupported file format '{extension}' ({path})")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The table cannot yield a valid subject count (no columns, ragged columns, no sheets).
    #[error("malformed table: {message}")]
    MalformedTable { message: String },

    /// The subject column has no non-missing values.
    #[error("no subjects in column '{column}'")]
    EmptyTable { column: String },

    /// The job configuration is missing or carries unusable values.
    #[error("invalid configuration: {message}")]
    Config { message: String },
}
