//! Tenant routes: user signup and login, and the user's flight bookings.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, HeaderMap},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};

use crate::flows::{self, BookingRequest, Credentials};
use crate::response::ApiError;

use super::state::AppState;

pub fn tenant_routes() -> Router<AppState> {
    Router::new()
        .route("/:tenant/user/signup", post(signup_handler))
        .route("/:tenant/user/login", post(login_handler))
        .route(
            "/:tenant/user/:username/flights",
            get(list_flights_handler).put(book_flights_handler),
        )
}

async fn signup_handler(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let Ok(Json(credentials)) = body else {
        return state.render(Err(ApiError::InvalidAuthRequest));
    };
    let mut bridge = state.bridge();
    state.render(flows::signup(&mut bridge, state.tokens(), &tenant, credentials).await)
}

async fn login_handler(
    State(state): State<AppState>,
    Path(tenant): Path<String>,
    body: Result<Json<Credentials>, JsonRejection>,
) -> Response {
    let Ok(Json(credentials)) = body else {
        return state.render(Err(ApiError::InvalidAuthRequest));
    };
    let mut bridge = state.bridge();
    state.render(flows::login(&mut bridge, state.tokens(), &tenant, credentials).await)
}

async fn list_flights_handler(
    State(state): State<AppState>,
    Path((tenant, username)): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    if let Err(e) = authorize(&state, &headers, &username) {
        return state.render(Err(e));
    }
    let mut bridge = state.bridge();
    state.render(flows::list_bookings(&mut bridge, state.fan_out(), &tenant, &username).await)
}

async fn book_flights_handler(
    State(state): State<AppState>,
    Path((tenant, username)): Path<(String, String)>,
    headers: HeaderMap,
    body: Result<Json<BookingRequest>, JsonRejection>,
) -> Response {
    if let Err(e) = authorize(&state, &headers, &username) {
        return state.render(Err(e));
    }
    let request = match body {
        Ok(Json(request)) => request,
        Err(rejection) => {
            info!(error = %rejection, "rejecting booking body");
            return state.render(Err(ApiError::InvalidBookingRequest));
        }
    };
    let mut bridge = state.bridge();
    state.render(flows::book_flights(&mut bridge, &tenant, &username, request).await)
}

/// The bearer token must name the user in the path.
fn authorize(state: &AppState, headers: &HeaderMap, username: &str) -> Result<(), ApiError> {
    let header = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let claims = state.tokens().verify_bearer(header).map_err(|e| {
        warn!(error = %e, "rejecting bearer token");
        ApiError::Unauthorized
    })?;

    if claims.user != username.to_lowercase() {
        warn!(token_user = %claims.user, path_user = %username, "token does not match path user");
        return Err(ApiError::TokenUserMismatch);
    }
    Ok(())
}
