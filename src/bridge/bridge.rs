//! # Operation Bridge
//!
//! Turns the callback-style store client into sequential async code. A flow
//! schedules operations through the bridge, which keeps the receiving end of
//! each delegate, then drains them one at a time or as a batch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::store::{FailureCode, OpKind, OpResult, ScheduleError, StoreClient, StoreOp};

use super::delegate::{Delegate, OpId};

/// Handle to an operation that has been scheduled but not drained yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpHandle(OpId);

impl OpHandle {
    pub fn id(&self) -> OpId {
        self.0
    }
}

struct Pending {
    kind: OpKind,
    completion: oneshot::Receiver<OpResult>,
}

/// Per-request bridge over a shared store client.
///
/// The bridge is owned by one logical flow; operations from different flows
/// never share a bridge, so draining one flow never waits on another.
pub struct OperationBridge {
    client: Arc<dyn StoreClient>,
    pending: HashMap<OpId, Pending>,
    next_id: u64,
    op_timeout: Option<Duration>,
}

impl OperationBridge {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            pending: HashMap::new(),
            next_id: 0,
            op_timeout: None,
        }
    }

    /// Deadline applied to each drained operation
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.op_timeout = Some(timeout);
        self
    }

    /// Number of operations scheduled but not yet drained
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Hand an operation to the store client.
    ///
    /// On failure nothing is left pending and the delegate is never completed.
    pub fn schedule(&mut self, op: StoreOp) -> Result<OpHandle, ScheduleError> {
        self.next_id += 1;
        let id = OpId(self.next_id);
        let kind = op.kind();
        let (delegate, completion) = Delegate::new(id, kind);

        if let Err(e) = self.client.schedule(op, delegate) {
            warn!(op = %id, kind = %kind, error = %e, "failed to schedule operation");
            return Err(e);
        }

        self.pending.insert(id, Pending { kind, completion });
        Ok(OpHandle(id))
    }

    /// Wait for one scheduled operation to complete.
    pub async fn drain_one(&mut self, handle: OpHandle) -> OpResult {
        match self.pending.remove(&handle.0) {
            Some(pending) => settle(handle.0, pending, self.op_timeout).await,
            None => not_pending(handle.0),
        }
    }

    /// Wait for several operations concurrently. Results come back in the
    /// order of `handles`, whatever order they complete in.
    pub async fn drain_batch(&mut self, handles: &[OpHandle]) -> Vec<OpResult> {
        let timeout = self.op_timeout;
        let waits = handles.iter().map(|handle| {
            let pending = self.pending.remove(&handle.0);
            let id = handle.0;
            async move {
                match pending {
                    Some(pending) => settle(id, pending, timeout).await,
                    None => not_pending(id),
                }
            }
        });
        join_all(waits).await
    }

    /// Schedule one operation and wait for it.
    pub async fn execute(&mut self, op: StoreOp) -> Result<OpResult, ScheduleError> {
        let handle = self.schedule(op)?;
        Ok(self.drain_one(handle).await)
    }
}

impl Drop for OperationBridge {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            debug!(
                outstanding = self.pending.len(),
                "bridge dropped with undrained operations"
            );
        }
    }
}

async fn settle(id: OpId, pending: Pending, timeout: Option<Duration>) -> OpResult {
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, pending.completion).await {
            Ok(received) => received,
            Err(_) => {
                warn!(op = %id, kind = %pending.kind, "operation timed out");
                return OpResult::timeout();
            }
        },
        None => pending.completion.await,
    };

    match outcome {
        Ok(result) => {
            debug!(op = %id, kind = %pending.kind, success = result.is_success(), "operation completed");
            result
        }
        Err(_) => {
            warn!(op = %id, kind = %pending.kind, "store client dropped the operation");
            OpResult::failure(FailureCode::Generic, "operation was dropped before completing")
        }
    }
}

fn not_pending(id: OpId) -> OpResult {
    OpResult::failure(FailureCode::Generic, format!("{} is not pending", id))
}
