//! Error type shared by the interval model, table readers and filters.

use std::io;
use thiserror::Error;

/// Errors that can occur while parsing inputs or running a filter.
#[derive(Error, Debug)]
pub enum FilterError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid interval '{text}': {reason}")]
    InvalidInterval { text: String, reason: String },

    #[error("Malformed row at line {line}: expected 4 tab-separated fields, got {fields}")]
    MalformedRow { line: usize, fields: usize },

    #[error("Sample '{name}' not found in VCF header (samples: {})", .available.join(", "))]
    SampleNotFound {
        name: String,
        available: Vec<String>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid VCF record at {position}: {message}")]
    Vcf { position: String, message: String },
}

pub type Result<T> = std::result::Result<T, FilterError>;

impl FilterError {
    pub(crate) fn invalid_interval(text: &str, reason: impl Into<String>) -> Self {
        FilterError::InvalidInterval {
            text: text.to_string(),
            reason: reason.into(),
        }
    }
}
