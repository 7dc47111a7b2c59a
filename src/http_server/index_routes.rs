//! Index page and liveness check.

use axum::{http::StatusCode, response::Html, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::state::AppState;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Travel Sample API</title></head>
<body>
<h1>Travel Sample API</h1>
<ul>
<li>GET /api/airports?search=</li>
<li>GET /api/flightPaths/{from}/{to}?leave=dd/mm/YYYY</li>
<li>GET /api/hotels/{description}/{location}/</li>
<li>POST /api/tenants/{tenant}/user/signup</li>
<li>POST /api/tenants/{tenant}/user/login</li>
<li>GET|PUT /api/tenants/{tenant}/user/{username}/flights</li>
</ul>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub fn index_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
}

async fn index_handler() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
    };

    (StatusCode::OK, Json(response))
}
