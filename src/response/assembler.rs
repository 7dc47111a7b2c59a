//! # Response Assembler
//!
//! Builds the `{"data": ..., "context": [...]}` success body.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::orchestrator::AggregateContext;

use super::errors::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub data: Value,
    pub context: Vec<String>,
    #[serde(skip)]
    status: StatusCode,
}

impl ApiResponse {
    pub fn new(data: Value, context: Vec<String>) -> Self {
        Self {
            data,
            context,
            status: StatusCode::OK,
        }
    }

    /// `data` is the aggregate's elements as an array
    pub fn from_aggregate(aggregate: AggregateContext) -> Self {
        let (data, context) = aggregate.into_parts();
        Self::new(Value::Array(data), context)
    }

    /// Echo of written elements: `{"added": [...]}`
    pub fn added(added: Vec<Value>, context: Vec<String>) -> Self {
        Self::new(json!({ "added": added }), context)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Serialize, optionally pretty-printed
    pub fn render(&self, pretty: bool) -> Response {
        let body = if pretty {
            serde_json::to_vec_pretty(self)
        } else {
            serde_json::to_vec(self)
        };
        match body {
            Ok(body) => (
                self.status,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                error!(error = %e, "failed to serialize response");
                ApiError::Serialization.into_response()
            }
        }
    }
}

impl IntoResponse for ApiResponse {
    fn into_response(self) -> Response {
        self.render(false)
    }
}
