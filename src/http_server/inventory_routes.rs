//! Inventory routes: airports, flight paths and hotels.

use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;

use crate::flows;
use crate::response::ApiError;

use super::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AirportQuery {
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FlightPathQuery {
    pub leave: Option<String>,
}

pub fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route("/airports", get(airports_handler))
        .route("/flightPaths/:from/:to", get(flight_paths_handler))
        .route("/hotels/:description/:location", get(hotels_handler))
        .route("/hotels/:description/:location/", get(hotels_handler))
}

async fn airports_handler(State(state): State<AppState>, Query(query): Query<AirportQuery>) -> Response {
    let Some(search) = query.search else {
        return state.render(Err(ApiError::MissingAirportSearch));
    };
    let mut bridge = state.bridge();
    state.render(flows::search_airports(&mut bridge, &search).await)
}

async fn flight_paths_handler(
    State(state): State<AppState>,
    Path((from, to)): Path<(String, String)>,
    Query(query): Query<FlightPathQuery>,
) -> Response {
    let Some(leave) = query.leave else {
        return state.render(Err(ApiError::InvalidFlightPathRequest));
    };
    let mut bridge = state.bridge();
    state.render(flows::find_flight_paths(&mut bridge, &from, &to, &leave).await)
}

async fn hotels_handler(
    State(state): State<AppState>,
    Path((description, location)): Path<(String, String)>,
) -> Response {
    let mut bridge = state.bridge();
    state.render(flows::search_hotels(&mut bridge, state.fan_out(), &description, &location).await)
}
