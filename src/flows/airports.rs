//! Airport name search.

use tracing::error;

use crate::bridge::OperationBridge;
use crate::orchestrator::{step, AggregateContext};
use crate::query::AirportSearch;
use crate::response::{context, ApiError, ApiResponse, ApiResult};
use crate::store::StoreOp;

pub async fn search_airports(bridge: &mut OperationBridge, search: &str) -> ApiResult<ApiResponse> {
    let op = AirportSearch::classify(search).into_operation();

    let mut aggregate = AggregateContext::new();
    if let StoreOp::Query(request) = &op {
        aggregate.describe(context::query(&request.statement));
    }

    let rows = step::run_step(bridge, "airports", op)
        .await
        .and_then(|payload| step::expect_rows("airports", payload))
        .map_err(|e| {
            error!(error = %e, "airport search failed");
            ApiError::AirportQueryFailed
        })?;

    aggregate.extend(rows.rows);
    Ok(ApiResponse::from_aggregate(aggregate))
}
