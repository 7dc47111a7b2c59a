//! # Aggregate Context
//!
//! Accumulates the results of one scatter/gather run: the data elements,
//! human-readable descriptions of what was executed, and the elements that
//! were skipped along the way.

use std::fmt;

use serde_json::Value;
use tracing::warn;

use crate::store::{ScheduleError, StoreStatus};

/// Why a single dependent element was left out of the aggregate.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementFailure {
    Scheduling(ScheduleError),
    Store(StoreStatus),
    Decode(String),
}

impl fmt::Display for ElementFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementFailure::Scheduling(e) => write!(f, "not scheduled: {}", e),
            ElementFailure::Store(status) => write!(f, "{}", status),
            ElementFailure::Decode(reason) => write!(f, "undecodable: {}", reason),
        }
    }
}

/// A dependent element that did not make it into the data.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedElement {
    /// Position of the element in the initial result
    pub index: usize,
    pub id: String,
    pub reason: ElementFailure,
}

#[derive(Debug, Default)]
pub struct AggregateContext {
    data: Vec<Value>,
    context: Vec<String>,
    first_failure: Option<ElementFailure>,
    skipped: Vec<SkippedElement>,
}

impl AggregateContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a description of an executed operation
    pub fn describe(&mut self, description: impl Into<String>) {
        self.context.push(description.into());
    }

    pub fn push(&mut self, element: Value) {
        self.data.push(element);
    }

    pub fn extend(&mut self, elements: impl IntoIterator<Item = Value>) {
        self.data.extend(elements);
    }

    /// Leave an element out. The first failure seen is kept.
    pub fn skip(&mut self, index: usize, id: impl Into<String>, reason: ElementFailure) {
        let id = id.into();
        warn!(index, id = %id, reason = %reason, "skipping element");
        if self.first_failure.is_none() {
            self.first_failure = Some(reason.clone());
        }
        self.skipped.push(SkippedElement { index, id, reason });
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Value] {
        &mut self.data
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn first_failure(&self) -> Option<&ElementFailure> {
        self.first_failure.as_ref()
    }

    pub fn skipped(&self) -> &[SkippedElement] {
        &self.skipped
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Vec<Value>, Vec<String>) {
        (self.data, self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_first_failure_is_sticky() {
        let mut aggregate = AggregateContext::new();
        aggregate.push(json!({"id": "b1"}));
        aggregate.skip(1, "b2", ElementFailure::Store(StoreStatus::NotFound));
        aggregate.skip(2, "b3", ElementFailure::Store(StoreStatus::Timeout));

        assert_eq!(aggregate.len(), 1);
        assert_eq!(aggregate.skipped().len(), 2);
        assert_eq!(
            aggregate.first_failure(),
            Some(&ElementFailure::Store(StoreStatus::NotFound))
        );
    }

    #[test]
    fn test_into_parts() {
        let mut aggregate = AggregateContext::new();
        aggregate.describe("KV get - scoped to acme.users: document alice");
        aggregate.extend([json!(1), json!(2)]);
        let (data, context) = aggregate.into_parts();
        assert_eq!(data, vec![json!(1), json!(2)]);
        assert_eq!(context.len(), 1);
    }
}
