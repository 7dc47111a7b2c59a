//! # Response
//!
//! Success and failure bodies returned by the HTTP surface.

mod assembler;
pub mod context;
mod errors;

pub use assembler::ApiResponse;
pub use errors::{ApiError, ErrorBody};

pub type ApiResult<T> = Result<T, ApiError>;
