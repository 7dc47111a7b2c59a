//! # HTTP Server
//!
//! The travel API surface.
//!
//! # Endpoints
//!
//! - `/` - Index page
//! - `/health` - Health check
//! - `/api/airports`, `/api/flightPaths/*`, `/api/hotels/*` - Inventory
//! - `/api/tenants/{tenant}/user/*` - Signup, login and bookings

pub mod config;
mod index_routes;
mod inventory_routes;
pub mod server;
mod state;
mod tenant_routes;

pub use config::HttpServerConfig;
pub use server::HttpServer;
pub use state::AppState;
