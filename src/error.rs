use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run.
///
/// Absent sources, malformed rows, duplicates and missing keys are not errors:
/// they are skipped or reported as findings.
#[derive(Error, Debug)]
pub enum CheckerError {
    /// The source exists but holds zero bytes. Fatal for the whole run.
    #[error("File {} is empty.", .0.display())]
    EmptyFile(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("cannot write report: {0}")]
    Report(#[from] std::io::Error),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

pub type Result<T, E = CheckerError> = std::result::Result<T, E>;
