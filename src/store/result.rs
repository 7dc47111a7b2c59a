//! # Operation Results
//!
//! The normalised outcome every store operation completes with.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Machine-readable reason attached to [`OpResult::Failure`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureCode {
    AlreadyExists,
    Timeout,
    /// A sub-document path exists but has the wrong type
    PathMismatch,
    InvalidRequest,
    Unavailable,
    Generic,
}

impl FailureCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCode::AlreadyExists => "ALREADY_EXISTS",
            FailureCode::Timeout => "TIMEOUT",
            FailureCode::PathMismatch => "PATH_MISMATCH",
            FailureCode::InvalidRequest => "INVALID_REQUEST",
            FailureCode::Unavailable => "UNAVAILABLE",
            FailureCode::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for FailureCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rows streamed back by a query or search, plus the terminal metadata row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RowSet {
    pub rows: Vec<Value>,
    pub meta: Value,
}

/// What a successful operation produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Full document body
    Document(Value),
    /// One entry per sub-document spec, `None` where the path was absent or
    /// the spec was a mutation
    Fields(Vec<Option<Value>>),
    Rows(RowSet),
    /// A write was applied
    Stored,
}

impl Payload {
    pub fn kind(&self) -> &'static str {
        match self {
            Payload::Document(_) => "document",
            Payload::Fields(_) => "fields",
            Payload::Rows(_) => "rows",
            Payload::Stored => "stored",
        }
    }
}

/// Completion value delivered to an operation delegate.
#[derive(Debug, Clone, PartialEq)]
pub enum OpResult {
    Success(Payload),
    NotFound,
    PathNotFound,
    Failure { code: FailureCode, message: String },
}

impl OpResult {
    pub fn failure(code: FailureCode, message: impl Into<String>) -> Self {
        OpResult::Failure {
            code,
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::failure(FailureCode::Timeout, "operation timed out")
    }

    pub fn is_success(&self) -> bool {
        matches!(self, OpResult::Success(_))
    }

    /// Split into the payload or the classified failure
    pub fn into_payload(self) -> Result<Payload, StoreStatus> {
        match self {
            OpResult::Success(payload) => Ok(payload),
            OpResult::NotFound => Err(StoreStatus::NotFound),
            OpResult::PathNotFound => Err(StoreStatus::PathNotFound),
            OpResult::Failure { code, message } => Err(StoreStatus::from_failure(code, message)),
        }
    }
}

/// Classified non-success outcome of a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreStatus {
    #[error("document not found")]
    NotFound,

    #[error("path not found")]
    PathNotFound,

    #[error("document already exists")]
    AlreadyExists,

    #[error("operation timed out")]
    Timeout,

    #[error("{code}: {message}")]
    Failed { code: FailureCode, message: String },
}

impl StoreStatus {
    fn from_failure(code: FailureCode, message: String) -> Self {
        match code {
            FailureCode::AlreadyExists => StoreStatus::AlreadyExists,
            FailureCode::Timeout => StoreStatus::Timeout,
            code => StoreStatus::Failed { code, message },
        }
    }
}
