//! Airport search classification.

use crate::store::{QueryRequest, StoreOp};

use super::catalog::{AIRPORT_BY_FAA, AIRPORT_BY_ICAO, AIRPORT_BY_NAME};
use super::encode::encode_list;
use super::params::QueryParams;

/// How a free-text airport search is matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AirportSearch {
    /// Three same-case letters, matched upper-cased against `faa`
    Faa(String),
    /// Four same-case letters, matched upper-cased against `icao`
    Icao(String),
    /// Anything else, matched lower-cased as a substring of the name
    Name(String),
}

impl AirportSearch {
    pub fn classify(input: &str) -> Self {
        if is_same_case(input) {
            match input.chars().count() {
                3 => return AirportSearch::Faa(input.to_ascii_uppercase()),
                4 => return AirportSearch::Icao(input.to_ascii_uppercase()),
                _ => {}
            }
        }
        AirportSearch::Name(input.to_lowercase())
    }

    pub fn statement(&self) -> &'static str {
        match self {
            AirportSearch::Faa(_) => AIRPORT_BY_FAA,
            AirportSearch::Icao(_) => AIRPORT_BY_ICAO,
            AirportSearch::Name(_) => AIRPORT_BY_NAME,
        }
    }

    /// The normalised value bound to `$1`
    pub fn term(&self) -> &str {
        match self {
            AirportSearch::Faa(term) | AirportSearch::Icao(term) | AirportSearch::Name(term) => term,
        }
    }

    pub fn into_operation(self) -> StoreOp {
        let params = QueryParams::positional(encode_list([self.term()]));
        StoreOp::Query(QueryRequest::new(self.statement(), params))
    }
}

/// True when the input is non-empty and made only of ASCII letters of a
/// single case.
pub fn is_same_case(input: &str) -> bool {
    !input.is_empty()
        && (input.chars().all(|c| c.is_ascii_lowercase())
            || input.chars().all(|c| c.is_ascii_uppercase()))
}
