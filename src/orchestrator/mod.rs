//! # Orchestrator
//!
//! Multi-step flows over the operation bridge: scatter/gather fan-out into an
//! aggregate context, and the two-phase create-then-link write.

mod aggregate;
mod errors;
mod gather;
pub mod step;
mod two_phase;

pub use aggregate::{AggregateContext, ElementFailure, SkippedElement};
pub use errors::{OrchestrationError, TwoPhaseError};
pub use gather::{ElementFetch, FanOutMode, ScatterGather};
pub use two_phase::{TwoPhaseRecord, TwoPhaseWrite, WritePhase};
