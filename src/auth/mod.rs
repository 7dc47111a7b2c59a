//! # Auth
//!
//! Bearer tokens for the booking routes and password hashing for stored
//! user documents.

pub mod errors;
pub mod jwt;
pub mod password;

pub use errors::{AuthError, AuthResult};
pub use jwt::{TokenClaims, TokenConfig, TokenManager};
pub use password::{hash_password, verify_password};
