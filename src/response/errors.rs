//! # API Errors
//!
//! Every client-visible failure. The display text is the exact message sent
//! to the client; internal detail is logged where the failure happens and
//! never included here.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Missing search query parameter")]
    MissingAirportSearch,

    #[error("Invalid flight path request")]
    InvalidFlightPathRequest,

    #[error("Problem parsing user auth request")]
    InvalidAuthRequest,

    #[error("User already exists")]
    UserExists,

    #[error("Password does not match")]
    PasswordMismatch,

    #[error("User data not found")]
    UserNotFound,

    #[error("Problem parsing user flight request")]
    Unauthorized,

    #[error("Username does not match token")]
    TokenUserMismatch,

    #[error("Invalid flights payload")]
    InvalidBookingRequest,

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Failed to query airports")]
    AirportQueryFailed,

    #[error("Failed to query flight paths")]
    FlightPathQueryFailed,

    #[error("Failed to search hotels")]
    HotelSearchFailed,

    #[error("User insert failed")]
    UserInsertFailed,

    #[error("Failed to get user data")]
    UserLookupFailed,

    #[error("Failed to create token")]
    TokenIssueFailed,

    #[error("Failed to get user bookings")]
    BookingsLookupFailed,

    #[error("Failed to upsert new flight to bookings")]
    BookingUpsertFailed,

    #[error("Failed to append new flight to user bookings")]
    BookingLinkFailed,

    #[error("Failed to serialize response")]
    Serialization,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            ApiError::MissingAirportSearch
            | ApiError::InvalidFlightPathRequest
            | ApiError::InvalidAuthRequest
            | ApiError::InvalidBookingRequest => StatusCode::BAD_REQUEST,

            // 401 Unauthorized
            ApiError::PasswordMismatch
            | ApiError::UserNotFound
            | ApiError::Unauthorized
            | ApiError::TokenUserMismatch => StatusCode::UNAUTHORIZED,

            // 409 Conflict
            ApiError::UserExists => StatusCode::CONFLICT,

            // 500 Internal Server Error
            ApiError::AirportQueryFailed
            | ApiError::FlightPathQueryFailed
            | ApiError::HotelSearchFailed
            | ApiError::UserInsertFailed
            | ApiError::UserLookupFailed
            | ApiError::TokenIssueFailed
            | ApiError::BookingsLookupFailed
            | ApiError::BookingUpsertFailed
            | ApiError::BookingLinkFailed
            | ApiError::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Failure body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl From<ApiError> for ErrorBody {
    fn from(err: ApiError) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorBody::from(self))).into_response()
    }
}
