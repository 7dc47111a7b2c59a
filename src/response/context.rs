//! Human-readable descriptions of executed operations, returned to clients in
//! the `context` array.

use std::fmt::Display;

use serde_json::Value;

use crate::query::catalog::INVENTORY_SCOPE;

pub fn query(statement: &str) -> String {
    format!("N1QL query - scoped to {}: {}", INVENTORY_SCOPE, statement)
}

pub fn search(payload: &Value) -> String {
    format!("FTS search - scoped to: {}", payload)
}

/// Key-value operation on a tenant collection
pub fn kv(verb: &str, tenant: &str, collection: &str, target: impl Display) -> String {
    format!("KV {} - scoped to {}.{}: {}", verb, tenant, collection, target)
}
