//! # Orchestration Errors

use thiserror::Error;

use crate::store::{DocLocation, ScheduleError, StoreStatus};

use super::two_phase::WritePhase;

/// Why a flow stopped. `stage` names the step that failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrchestrationError {
    #[error("{stage}: could not schedule: {source}")]
    Scheduling {
        stage: &'static str,
        #[source]
        source: ScheduleError,
    },

    #[error("{stage}: {status}")]
    Store {
        stage: &'static str,
        status: StoreStatus,
    },

    #[error("{stage}: unexpected result: {reason}")]
    Decode { stage: &'static str, reason: String },
}

impl OrchestrationError {
    pub fn stage(&self) -> &'static str {
        match self {
            OrchestrationError::Scheduling { stage, .. }
            | OrchestrationError::Store { stage, .. }
            | OrchestrationError::Decode { stage, .. } => stage,
        }
    }

    /// The store status, when the store itself reported the failure
    pub fn status(&self) -> Option<&StoreStatus> {
        match self {
            OrchestrationError::Store { status, .. } => Some(status),
            _ => None,
        }
    }
}

/// Failure of a two-phase write. The variant tells which phase failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TwoPhaseError {
    /// Nothing was written
    #[error("phase one failed: {0}")]
    Phase1(#[source] OrchestrationError),

    /// The phase one document exists but is not referenced
    #[error("phase two failed, {created} is unreferenced: {source}")]
    Phase2 {
        created: DocLocation,
        #[source]
        source: OrchestrationError,
    },

    #[error("write already attempted (state {0:?})")]
    AlreadyAttempted(WritePhase),
}
