//! # Bridge
//!
//! Operation delegates and the per-request bridge that drains them.

mod bridge;
mod delegate;

pub use bridge::{OpHandle, OperationBridge};
pub use delegate::{Delegate, OpId};
