//! # Observability
//!
//! `tracing` subscriber setup. Request spans come from `tower-http`'s trace
//! layer in the HTTP server.

mod errors;
mod logging;

pub use errors::{LoggingError, LoggingResult};
pub use logging::{init_logging, LogConfig, LogFormat};
