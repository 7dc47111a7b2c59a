//! # HTTP Server
//!
//! Combines the route groups into one axum router and serves it.

use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::config::HttpServerConfig;
use super::index_routes::index_routes;
use super::inventory_routes::inventory_routes;
use super::state::AppState;
use super::tenant_routes::tenant_routes;

pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn new(config: HttpServerConfig, state: AppState) -> Self {
        let router = Self::build_router(state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    pub fn build_router(state: AppState) -> Router {
        // Mirror the caller's origin and requested headers so credentialed
        // requests are accepted from any front end.
        let cors = CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request());

        Router::new()
            .merge(index_routes())
            .nest("/api", inventory_routes())
            .nest("/api/tenants", tenant_routes())
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(middleware::from_fn(preflight_no_content))
                    .layer(cors),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr = self.config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(address = %addr, "travel gateway listening");
        axum::serve(listener, self.router).await
    }
}

/// Answer CORS preflights with 204 instead of 200.
async fn preflight_no_content(request: Request, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if preflight && response.status() == StatusCode::OK {
        *response.status_mut() = StatusCode::NO_CONTENT;
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::{TokenConfig, TokenManager};
    use crate::store::InMemoryStore;

    #[test]
    fn test_server_creation() {
        let state = AppState::new(
            Arc::new(InMemoryStore::new()),
            TokenManager::new(TokenConfig::default()),
        );
        let server = HttpServer::new(HttpServerConfig::with_port(9999), state);
        assert_eq!(server.socket_addr(), "0.0.0.0:9999");
    }
}
