//! Error types for the Scrubber library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Scrubber operations.
#[derive(Debug, Error)]
pub enum ScrubberError {
    /// Error reading or writing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Regex compilation error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Empty file or no header to build a table from.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// The transform name is not registered.
    #[error("unsupported transform '{name}'")]
    UnsupportedTransform { name: String },

    /// A required positional parameter was not supplied.
    #[error("transform '{transform}' requires parameter {position} ({name})")]
    MissingParameter {
        transform: String,
        position: usize,
        name: &'static str,
    },

    /// `filter` was given an inner transform that does not target a column.
    #[error("transform '{transform}' is not column-scoped and cannot be used inside 'filter'")]
    NotColumnScoped { transform: String },

    /// Two columns share a name where names must be unique.
    #[error("duplicate column '{column}' cannot be written as JSON records")]
    DuplicateColumn { column: String },

    /// A strftime/strptime format string contains an invalid specifier.
    #[error("invalid date format '{format}'")]
    InvalidDateFormat { format: String },

    /// The named column does not exist in the table.
    #[error("column '{column}' not found")]
    MissingColumn { column: String },

    /// A cell value did not match the expected date format.
    #[error("could not parse '{value}' with format '{format}': {source}")]
    DateParse {
        value: String,
        format: String,
        #[source]
        source: chrono::ParseError,
    },

    /// An operation that needs a table ran before any table was opened.
    #[error("transform '{transform}' has no table to operate on; open one first")]
    NoTable { transform: String },

    /// A pipeline step could not be parsed.
    #[error("invalid step '{step}': {message}")]
    InvalidStep { step: String, message: String },
}

/// Result type alias for Scrubber operations.
pub type Result<T> = std::result::Result<T, ScrubberError>;
