//! # Auth Errors

use thiserror::Error;

/// Result type for auth operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Token and credential errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    // ==================
    // Token Errors
    // ==================
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    // ==================
    // Credential Errors
    // ==================
    #[error("Password hashing failed")]
    HashingFailed,

    #[error("Stored password hash is unreadable")]
    InvalidHash,
}

impl AuthError {
    pub fn status_code(&self) -> u16 {
        match self {
            AuthError::MissingToken
            | AuthError::MalformedToken
            | AuthError::TokenExpired
            | AuthError::InvalidSignature => 401,
            AuthError::TokenGenerationFailed | AuthError::HashingFailed | AuthError::InvalidHash => {
                500
            }
        }
    }
}
