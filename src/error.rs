//! Error types for loading and interpreting assessment documents.
//!
//! Failures fall into two families: the document could not be obtained
//! (`DataSourceError`) or it was obtained but does not have the expected
//! shape (`SchemaError`). Both abort the current render pass.

use std::path::PathBuf;
use thiserror::Error;

/// The document could not be read as structured data.
#[derive(Debug, Error)]
pub enum DataSourceError {
    /// No file at the configured location.
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file exists but could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not well-formed JSON.
    #[error("malformed JSON in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The document is well-formed but does not match the expected schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// A field is missing or has the wrong type.
    #[error("{document} does not match the expected schema: {source}")]
    Mismatch {
        document: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required top-level key is absent.
    #[error("{document} is missing required key `{key}`")]
    MissingKey {
        document: String,
        key: &'static str,
    },

    /// The document root has the wrong JSON type.
    #[error("{document} must be a JSON {expected}")]
    WrongRoot {
        document: String,
        expected: &'static str,
    },

    /// A value could not be turned into a calendar date.
    #[error("invalid date {year}-{month:02}-{day:02} for phase {phase_number}")]
    InvalidDate {
        phase_number: u32,
        year: i32,
        month: u32,
        day: u32,
    },
}

/// Top-level error returned by the repository and aggregators.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    DataSource(#[from] DataSourceError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
