//! Single-operation steps shared by the flows.

use serde_json::Value;
use tracing::debug;

use crate::bridge::OperationBridge;
use crate::store::{OpResult, Payload, RowSet, StoreOp};

use super::errors::OrchestrationError;

/// Schedule `op` and wait for it. Only a scheduling failure is an error here.
pub async fn execute(
    bridge: &mut OperationBridge,
    stage: &'static str,
    op: StoreOp,
) -> Result<OpResult, OrchestrationError> {
    debug!(stage, "{}", op.describe());
    bridge
        .execute(op)
        .await
        .map_err(|source| OrchestrationError::Scheduling { stage, source })
}

/// Schedule `op`, wait for it and require success.
pub async fn run_step(
    bridge: &mut OperationBridge,
    stage: &'static str,
    op: StoreOp,
) -> Result<Payload, OrchestrationError> {
    execute(bridge, stage, op)
        .await?
        .into_payload()
        .map_err(|status| OrchestrationError::Store { stage, status })
}

pub fn expect_rows(stage: &'static str, payload: Payload) -> Result<RowSet, OrchestrationError> {
    match payload {
        Payload::Rows(rows) => Ok(rows),
        other => Err(unexpected(stage, "rows", &other)),
    }
}

pub fn expect_fields(
    stage: &'static str,
    payload: Payload,
) -> Result<Vec<Option<Value>>, OrchestrationError> {
    match payload {
        Payload::Fields(fields) => Ok(fields),
        other => Err(unexpected(stage, "fields", &other)),
    }
}

fn unexpected(stage: &'static str, wanted: &str, got: &Payload) -> OrchestrationError {
    OrchestrationError::Decode {
        stage,
        reason: format!("expected {}, got {}", wanted, got.kind()),
    }
}
