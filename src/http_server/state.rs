//! Shared handler state.

use std::sync::Arc;
use std::time::Duration;

use axum::response::{IntoResponse, Response};

use crate::auth::TokenManager;
use crate::bridge::OperationBridge;
use crate::orchestrator::FanOutMode;
use crate::response::{ApiResponse, ApiResult};
use crate::store::StoreClient;

/// State shared by every route. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn StoreClient>,
    tokens: TokenManager,
    fan_out: FanOutMode,
    op_timeout: Option<Duration>,
    pretty: bool,
}

impl AppState {
    pub fn new(store: Arc<dyn StoreClient>, tokens: TokenManager) -> Self {
        Self {
            store,
            tokens,
            fan_out: FanOutMode::default(),
            op_timeout: None,
            pretty: false,
        }
    }

    pub fn with_fan_out(mut self, fan_out: FanOutMode) -> Self {
        self.fan_out = fan_out;
        self
    }

    pub fn with_op_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// A fresh bridge for one request
    pub fn bridge(&self) -> OperationBridge {
        let bridge = OperationBridge::new(Arc::clone(&self.store));
        match self.op_timeout {
            Some(timeout) => bridge.with_timeout(timeout),
            None => bridge,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    pub fn fan_out(&self) -> FanOutMode {
        self.fan_out
    }

    pub fn op_timeout(&self) -> Option<Duration> {
        self.op_timeout
    }

    /// Turn a flow result into the HTTP response
    pub fn render(&self, result: ApiResult<ApiResponse>) -> Response {
        match result {
            Ok(response) => response.render(self.pretty),
            Err(e) => e.into_response(),
        }
    }
}
