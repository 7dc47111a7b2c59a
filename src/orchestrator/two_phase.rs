//! # Two-Phase Write
//!
//! Creates a document, then records its key in a parent document. Phase two
//! is only scheduled after phase one has completed successfully. There is no
//! rollback: when phase two fails the phase one document stays behind
//! unreferenced and the error says so.

use serde_json::Value;
use tracing::{debug, error, info};

use crate::bridge::OperationBridge;
use crate::query::EncodedValue;
use crate::store::{DocLocation, StoreOp, SubdocSpec};

use super::errors::TwoPhaseError;
use super::step;

/// Progress of a [`TwoPhaseWrite`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WritePhase {
    Idle,
    Phase1Pending,
    Phase1Done,
    Phase1Failed,
    Phase2Pending,
    Committed,
    Phase2Failed,
}

impl WritePhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WritePhase::Phase1Failed | WritePhase::Committed | WritePhase::Phase2Failed
        )
    }
}

/// What to write in each phase.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoPhaseRecord {
    /// Document created in phase one
    pub created: DocLocation,
    pub document: Value,
    /// Document whose array field receives the reference in phase two
    pub parent: DocLocation,
    pub field: String,
    pub reference: EncodedValue,
}

#[derive(Debug)]
pub struct TwoPhaseWrite {
    record: TwoPhaseRecord,
    phase: WritePhase,
    transitions: Vec<WritePhase>,
}

impl TwoPhaseWrite {
    pub fn new(record: TwoPhaseRecord) -> Self {
        Self {
            record,
            phase: WritePhase::Idle,
            transitions: vec![WritePhase::Idle],
        }
    }

    pub fn phase(&self) -> WritePhase {
        self.phase
    }

    /// Every state visited so far, starting with `Idle`
    pub fn transitions(&self) -> &[WritePhase] {
        &self.transitions
    }

    pub fn record(&self) -> &TwoPhaseRecord {
        &self.record
    }

    /// Run both phases. A write can only be attempted once.
    pub async fn run(&mut self, bridge: &mut OperationBridge) -> Result<(), TwoPhaseError> {
        if self.phase != WritePhase::Idle {
            return Err(TwoPhaseError::AlreadyAttempted(self.phase));
        }

        self.advance(WritePhase::Phase1Pending);
        let create = StoreOp::Upsert {
            location: self.record.created.clone(),
            value: self.record.document.clone(),
        };
        if let Err(e) = step::run_step(bridge, "create", create).await {
            self.advance(WritePhase::Phase1Failed);
            error!(created = %self.record.created, error = %e, "phase one failed");
            return Err(TwoPhaseError::Phase1(e));
        }
        self.advance(WritePhase::Phase1Done);

        self.advance(WritePhase::Phase2Pending);
        let link = StoreOp::Subdoc {
            location: self.record.parent.clone(),
            specs: vec![SubdocSpec::ArrayAppend {
                path: self.record.field.clone(),
                value: self.record.reference.clone(),
                create_parents: true,
            }],
        };
        if let Err(e) = step::run_step(bridge, "link", link).await {
            self.advance(WritePhase::Phase2Failed);
            error!(
                created = %self.record.created,
                parent = %self.record.parent,
                error = %e,
                "phase two failed"
            );
            return Err(TwoPhaseError::Phase2 {
                created: self.record.created.clone(),
                source: e,
            });
        }
        self.advance(WritePhase::Committed);

        info!(created = %self.record.created, parent = %self.record.parent, "two-phase write committed");
        Ok(())
    }

    fn advance(&mut self, next: WritePhase) {
        debug!(from = ?self.phase, to = ?next, "two-phase transition");
        self.phase = next;
        self.transitions.push(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(WritePhase::Committed.is_terminal());
        assert!(WritePhase::Phase1Failed.is_terminal());
        assert!(WritePhase::Phase2Failed.is_terminal());
        assert!(!WritePhase::Phase1Done.is_terminal());
        assert!(!WritePhase::Idle.is_terminal());
    }
}
