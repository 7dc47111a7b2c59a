//! # Store
//!
//! The document-store collaborator: operation and result types, the
//! [`StoreClient`] seam the bridge schedules through, and an in-memory
//! backend with an evaluator for the travel inventory.

mod client;
mod errors;
mod inventory;
mod memory;
mod operation;
mod result;
mod rows;
mod seed;

pub use client::StoreClient;
pub use errors::{ScheduleError, SeedError};
pub use inventory::InventoryResponder;
pub use memory::{InMemoryStore, Latency, QueryResponder, Snapshot};
pub use operation::{
    DocLocation, OpKind, QueryOptions, QueryRequest, SearchRequest, StoreOp, SubdocSpec,
};
pub use result::{FailureCode, OpResult, Payload, RowSet, StoreStatus};
pub use rows::RowCollector;
pub use seed::load_seed_file;
