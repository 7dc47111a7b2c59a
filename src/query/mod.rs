//! # Query Builder
//!
//! Builds store operations from user input: statement selection, parameter
//! encoding and full-text search payloads.

pub mod catalog;
mod encode;
mod fts;
mod params;
pub mod routes;
mod search;

pub use encode::{encode_document, encode_list, encode_scalar, EncodedValue, Scalar};
pub use fts::HotelSearch;
pub use params::QueryParams;
pub use search::{is_same_case, AirportSearch};
