//! # Store Errors

use std::path::PathBuf;

use thiserror::Error;

/// The store client refused to take an operation. The delegate handed to
/// `schedule` has already been dropped when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("no async runtime available to run the operation")]
    NoRuntime,

    #[error("store client refused the operation: {0}")]
    Rejected(String),
}

/// Errors while loading seed documents.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("seed entry {0} is not an object")]
    NotAnObject(String),
}
