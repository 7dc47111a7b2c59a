//! # Operation Delegate
//!
//! Completion handle attached to exactly one scheduled store operation.

use std::fmt;

use tokio::sync::oneshot;

use crate::store::{OpKind, OpResult};

/// Identifier the bridge assigns to each scheduled operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OpId(pub(crate) u64);

impl fmt::Display for OpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op#{}", self.0)
    }
}

/// Carries the result of one operation back to the bridge.
///
/// `complete` consumes the delegate, so a result can be delivered at most
/// once. A delegate dropped without completing is observed by the bridge as
/// a failed operation.
pub struct Delegate {
    id: OpId,
    kind: OpKind,
    completion: oneshot::Sender<OpResult>,
}

impl Delegate {
    pub(crate) fn new(id: OpId, kind: OpKind) -> (Self, oneshot::Receiver<OpResult>) {
        let (completion, receiver) = oneshot::channel();
        (
            Self {
                id,
                kind,
                completion,
            },
            receiver,
        )
    }

    pub fn id(&self) -> OpId {
        self.id
    }

    pub fn kind(&self) -> OpKind {
        self.kind
    }

    /// Deliver the result. Returns `false` if nobody is waiting any more.
    pub fn complete(self, result: OpResult) -> bool {
        self.completion.send(result).is_ok()
    }
}

impl fmt::Debug for Delegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::OpResult;

    #[tokio::test]
    async fn test_complete_delivers_once() {
        let (delegate, receiver) = Delegate::new(OpId(7), OpKind::Get);
        assert_eq!(delegate.id().to_string(), "op#7");
        assert!(delegate.complete(OpResult::NotFound));
        assert_eq!(receiver.await.unwrap(), OpResult::NotFound);
    }

    #[tokio::test]
    async fn test_dropped_delegate_closes_channel() {
        let (delegate, receiver) = Delegate::new(OpId(1), OpKind::Query);
        drop(delegate);
        assert!(receiver.await.is_err());
    }

    #[test]
    fn test_complete_without_waiter() {
        let (delegate, receiver) = Delegate::new(OpId(2), OpKind::Upsert);
        drop(receiver);
        assert!(!delegate.complete(OpResult::NotFound));
    }
}
