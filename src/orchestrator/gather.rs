//! # Scatter/Gather
//!
//! Runs an initial operation, derives a list of element ids from its result,
//! then runs one dependent operation per id and merges the successful results
//! into an [`AggregateContext`] in the order of the initial result.
//!
//! A failing initial operation aborts the run. A failing dependent operation
//! only drops that element.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::bridge::{OpHandle, OperationBridge};
use crate::store::{OpResult, Payload, StoreOp};

use super::aggregate::{AggregateContext, ElementFailure};
use super::errors::OrchestrationError;
use super::step;

/// How dependent operations are issued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FanOutMode {
    /// Schedule one, drain it, then the next
    #[default]
    Serial,
    /// Schedule all, drain as one batch, merge by index
    Parallel,
}

/// The dependent operation of a scatter/gather run.
pub trait ElementFetch {
    /// Operation that fetches the element `id`
    fn operation(&self, id: &str) -> StoreOp;

    /// Shape a successful payload into an aggregate entry. `None` drops the
    /// element as undecodable.
    fn merge(&self, id: &str, payload: Payload) -> Option<Value>;
}

pub struct ScatterGather<'b> {
    bridge: &'b mut OperationBridge,
    mode: FanOutMode,
}

impl<'b> ScatterGather<'b> {
    pub fn new(bridge: &'b mut OperationBridge, mode: FanOutMode) -> Self {
        Self { bridge, mode }
    }

    /// Search, then fetch the detail of every hit.
    ///
    /// Ids are read from `id_field` of each row; rows without one are
    /// recorded as skipped at their row index. Returns the number of hits.
    pub async fn search_then_detail<F: ElementFetch>(
        &mut self,
        search: StoreOp,
        id_field: &str,
        fetch: &F,
        aggregate: &mut AggregateContext,
    ) -> Result<usize, OrchestrationError> {
        const STAGE: &str = "search";

        let payload = step::run_step(self.bridge, STAGE, search).await?;
        let rows = step::expect_rows(STAGE, payload)?.rows;

        let mut ids: Vec<(usize, String)> = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            match row.get(id_field).and_then(Value::as_str) {
                Some(id) => ids.push((index, id.to_string())),
                None => aggregate.skip(
                    index,
                    String::new(),
                    ElementFailure::Decode(format!("search hit without {}", id_field)),
                ),
            }
        }

        debug!(hits = rows.len(), "search complete, fetching details");
        self.fan_out(&ids, fetch, aggregate).await;
        Ok(rows.len())
    }

    /// Read a list of ids from a document field, then fetch each element.
    ///
    /// An absent field is an empty list. Returns the number of ids listed.
    pub async fn list_then_fan_out<F: ElementFetch>(
        &mut self,
        listing: StoreOp,
        fetch: &F,
        aggregate: &mut AggregateContext,
    ) -> Result<usize, OrchestrationError> {
        const STAGE: &str = "listing";

        let ids = match step::execute(self.bridge, STAGE, listing).await? {
            OpResult::PathNotFound => Vec::new(),
            other => {
                let payload = other
                    .into_payload()
                    .map_err(|status| OrchestrationError::Store { stage: STAGE, status })?;
                ids_from_listing(step::expect_fields(STAGE, payload)?)?
            }
        };

        debug!(listed = ids.len(), "listing complete, fetching elements");
        let listed = ids.len();
        let ids: Vec<(usize, String)> = ids.into_iter().enumerate().collect();
        self.fan_out(&ids, fetch, aggregate).await;
        Ok(listed)
    }

    async fn fan_out<F: ElementFetch>(
        &mut self,
        ids: &[(usize, String)],
        fetch: &F,
        aggregate: &mut AggregateContext,
    ) {
        match self.mode {
            FanOutMode::Serial => {
                for (index, id) in ids {
                    let index = *index;
                    match self.bridge.schedule(fetch.operation(id)) {
                        Ok(handle) => {
                            let outcome = self.bridge.drain_one(handle).await;
                            absorb(index, id, outcome, fetch, aggregate);
                        }
                        Err(e) => aggregate.skip(index, id.as_str(), ElementFailure::Scheduling(e)),
                    }
                }
            }
            FanOutMode::Parallel => {
                let mut scheduled: Vec<(&(usize, String), OpHandle)> =
                    Vec::with_capacity(ids.len());
                for entry in ids {
                    let (index, id) = (entry.0, &entry.1);
                    match self.bridge.schedule(fetch.operation(id)) {
                        Ok(handle) => scheduled.push((entry, handle)),
                        Err(e) => aggregate.skip(index, id.as_str(), ElementFailure::Scheduling(e)),
                    }
                }

                let handles: Vec<OpHandle> = scheduled.iter().map(|(_, handle)| *handle).collect();
                let outcomes = self.bridge.drain_batch(&handles).await;
                for ((entry, _), outcome) in scheduled.into_iter().zip(outcomes) {
                    absorb(entry.0, &entry.1, outcome, fetch, aggregate);
                }
            }
        }
    }
}

fn absorb<F: ElementFetch>(
    index: usize,
    id: &str,
    outcome: OpResult,
    fetch: &F,
    aggregate: &mut AggregateContext,
) {
    match outcome.into_payload() {
        Ok(payload) => {
            let kind = payload.kind();
            match fetch.merge(id, payload) {
                Some(element) => aggregate.push(element),
                None => aggregate.skip(
                    index,
                    id,
                    ElementFailure::Decode(format!("could not merge {} payload", kind)),
                ),
            }
        }
        Err(status) => aggregate.skip(index, id, ElementFailure::Store(status)),
    }
}

/// The first field of a listing holds the id array. Non-string entries are
/// ignored.
fn ids_from_listing(fields: Vec<Option<Value>>) -> Result<Vec<String>, OrchestrationError> {
    match fields.into_iter().next().flatten() {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(id) => Some(id),
                other => {
                    warn!(entry = %other, "ignoring non-string id in listing");
                    None
                }
            })
            .collect()),
        Some(other) => Err(OrchestrationError::Decode {
            stage: "listing",
            reason: format!("expected an id array, got {}", other),
        }),
    }
}
