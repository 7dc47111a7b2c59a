//! Flight paths between two airports on a given day.
//!
//! A dependent two-stage query: the airport names are resolved to FAA codes,
//! then the route schedule is queried with those codes.

use rand::Rng;
use serde_json::{json, Value};
use tracing::{error, info};

use crate::bridge::OperationBridge;
use crate::orchestrator::{step, AggregateContext};
use crate::query::catalog::{FLIGHT_PATH_AIRPORTS, ROUTE_SCHEDULE};
use crate::query::routes;
use crate::response::{context, ApiError, ApiResponse, ApiResult};

/// Upper bound of the simulated flight time, in minutes
const MAX_FLIGHT_TIME: u32 = 8000;

pub async fn find_flight_paths(
    bridge: &mut OperationBridge,
    from: &str,
    to: &str,
    leave: &str,
) -> ApiResult<ApiResponse> {
    let weekday = routes::leave_weekday(leave).map_err(|e| {
        info!(leave, error = %e, "rejecting leave date");
        ApiError::InvalidFlightPathRequest
    })?;

    let mut aggregate = AggregateContext::new();

    aggregate.describe(context::query(FLIGHT_PATH_AIRPORTS));
    let codes = step::run_step(bridge, "airport codes", routes::airport_codes(from, to))
        .await
        .and_then(|payload| step::expect_rows("airport codes", payload))
        .map_err(|e| {
            error!(error = %e, "airport code lookup failed");
            ApiError::FlightPathQueryFailed
        })?;

    let (Some(from_faa), Some(to_faa)) = (
        column(&codes.rows, "fromAirport"),
        column(&codes.rows, "toAirport"),
    ) else {
        info!(from, to, "no airport codes for flight path");
        return Ok(ApiResponse::from_aggregate(aggregate));
    };

    aggregate.describe(context::query(ROUTE_SCHEDULE));
    let schedule = step::run_step(
        bridge,
        "route schedule",
        routes::route_schedule(&from_faa, &to_faa, weekday),
    )
    .await
    .and_then(|payload| step::expect_rows("route schedule", payload))
    .map_err(|e| {
        error!(error = %e, "route schedule query failed");
        ApiError::FlightPathQueryFailed
    })?;

    aggregate.extend(schedule.rows);
    price_flights(aggregate.data_mut());
    Ok(ApiResponse::from_aggregate(aggregate))
}

fn column(rows: &[Value], name: &str) -> Option<String> {
    rows.iter()
        .find_map(|row| row.get(name).and_then(Value::as_str))
        .map(str::to_string)
}

/// Attach a simulated `flighttime` and a `price` derived from it
fn price_flights(rows: &mut [Value]) {
    let mut rng = rand::thread_rng();
    for row in rows.iter_mut() {
        let flight_time = rng.gen_range(1..=MAX_FLIGHT_TIME);
        if let Value::Object(fields) = row {
            fields.insert("flighttime".to_string(), json!(flight_time));
            fields.insert("price".to_string(), json!(price_for(flight_time)));
        }
    }
}

fn price_for(flight_time: u32) -> f64 {
    (f64::from(flight_time) / 8.0 * 100.0).ceil() / 100.0
}
