//! Flight path statements: airport-code lookup followed by the route schedule.

use chrono::{Datelike, NaiveDate};

use crate::store::{QueryRequest, StoreOp};

use super::catalog::{FLIGHT_PATH_AIRPORTS, ROUTE_SCHEDULE};
use super::encode::{encode_list, encode_scalar};
use super::params::QueryParams;

/// Date format of the `leave` query parameter
pub const LEAVE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Look up the FAA codes of the departure and destination airports by name.
pub fn airport_codes(from: &str, to: &str) -> StoreOp {
    StoreOp::Query(QueryRequest::new(
        FLIGHT_PATH_AIRPORTS,
        QueryParams::positional(encode_list([from, to])),
    ))
}

/// Scheduled flights between two FAA codes on a weekday (Monday = 0).
pub fn route_schedule(from_faa: &str, to_faa: &str, weekday: u32) -> StoreOp {
    let params = QueryParams::named()
        .bind("fromfaa", encode_scalar(from_faa))
        .bind("tofaa", encode_scalar(to_faa))
        .bind("dayofweek", encode_scalar(weekday));
    StoreOp::Query(QueryRequest::new(ROUTE_SCHEDULE, params))
}

/// Weekday of a `dd/mm/YYYY` date, Monday = 0.
pub fn leave_weekday(leave: &str) -> Result<u32, chrono::ParseError> {
    let date = NaiveDate::parse_from_str(leave, LEAVE_DATE_FORMAT)?;
    Ok(date.weekday().num_days_from_monday())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leave_weekday() {
        // 2024-01-01 was a Monday.
        assert_eq!(leave_weekday("01/01/2024").unwrap(), 0);
        assert_eq!(leave_weekday("07/01/2024").unwrap(), 6);
        assert!(leave_weekday("2024-01-01").is_err());
        assert!(leave_weekday("31/02/2024").is_err());
    }

    #[test]
    fn test_route_schedule_binds_named_params() {
        let StoreOp::Query(request) = route_schedule("SFO", "LAX", 3) else {
            panic!("expected a query");
        };
        assert_eq!(request.params.named_value("fromfaa"), Some(json!("SFO")));
        assert_eq!(request.params.named_value("tofaa"), Some(json!("LAX")));
        assert_eq!(request.params.named_value("dayofweek"), Some(json!(3)));
    }

    #[test]
    fn test_airport_codes_binds_positionally() {
        let StoreOp::Query(request) = airport_codes("San Francisco Intl", "Los Angeles Intl") else {
            panic!("expected a query");
        };
        assert_eq!(request.statement, FLIGHT_PATH_AIRPORTS);
        assert_eq!(request.params.positional_value(2), Some(json!("Los Angeles Intl")));
    }
}
