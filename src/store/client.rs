//! The store client seam.

use crate::bridge::Delegate;

use super::errors::ScheduleError;
use super::operation::StoreOp;

/// A client that executes store operations asynchronously.
///
/// `schedule` must not block. On `Ok` the client owns the delegate and must
/// eventually complete it exactly once, from any thread. On `Err` the
/// delegate is dropped inside the call and never completed.
pub trait StoreClient: Send + Sync {
    fn schedule(&self, op: StoreOp, delegate: Delegate) -> Result<(), ScheduleError>;
}
