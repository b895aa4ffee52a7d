//! Error types for csvcf-core

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csvcf-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed tabular content
    #[error("failed to parse CSV '{path}': {message}")]
    CsvParse { path: PathBuf, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Bad user input: start index, output directory, empty selection
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A merge input whose file name carries no digits to order by
    #[error("cannot determine merge order for '{path}': file name contains no digits")]
    AmbiguousOrder { path: PathBuf },

    /// Column sets differ between datasets being concatenated
    #[error("column mismatch: expected [{expected}], found [{found}] in {path}")]
    SchemaMismatch {
        expected: String,
        found: String,
        path: PathBuf,
    },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error category shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Io,
    Parse,
    Configuration,
    AmbiguousOrder,
    SchemaMismatch,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileRead { .. } | Error::FileWrite { .. } | Error::WalkDir(_) | Error::Io(_) => {
                ErrorKind::Io
            }
            Error::CsvParse { .. } | Error::Csv { .. } | Error::Json(_) => ErrorKind::Parse,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::AmbiguousOrder { .. } => ErrorKind::AmbiguousOrder,
            Error::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
        }
    }

    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }
}
