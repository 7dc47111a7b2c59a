//! # Store Operations
//!
//! The operations the gateway hands to a store client. Each one is
//! self-contained: it owns its location, values and parameters, so it can be
//! moved onto whatever task eventually executes it.

use std::fmt;

use serde_json::Value;

use crate::query::{EncodedValue, QueryParams};

/// Address of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocLocation {
    pub scope: String,
    pub collection: String,
    pub key: String,
}

impl DocLocation {
    pub fn new(
        scope: impl Into<String>,
        collection: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            scope: scope.into(),
            collection: collection.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for DocLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}/{}", self.scope, self.collection, self.key)
    }
}

/// One step of a sub-document operation.
#[derive(Debug, Clone, PartialEq)]
pub enum SubdocSpec {
    /// Read the value at a dotted path
    Get { path: String },
    /// Append to the array at `path`
    ArrayAppend {
        path: String,
        value: EncodedValue,
        create_parents: bool,
    },
}

impl SubdocSpec {
    pub fn get(path: impl Into<String>) -> Self {
        SubdocSpec::Get { path: path.into() }
    }

    pub fn path(&self) -> &str {
        match self {
            SubdocSpec::Get { path } | SubdocSpec::ArrayAppend { path, .. } => path,
        }
    }

    pub fn is_lookup(&self) -> bool {
        matches!(self, SubdocSpec::Get { .. })
    }
}

/// Statement options passed through to the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryOptions {
    pub adhoc: bool,
    pub pretty: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        // Catalog statements are fixed text, so they are always prepared.
        Self {
            adhoc: false,
            pretty: false,
        }
    }
}

/// A parameterised statement.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    pub statement: String,
    pub params: QueryParams,
    pub options: QueryOptions,
}

impl QueryRequest {
    pub fn new(statement: impl Into<String>, params: QueryParams) -> Self {
        Self {
            statement: statement.into(),
            params,
            options: QueryOptions::default(),
        }
    }
}

/// A full-text search request. The payload names its own index.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub payload: Value,
}

impl SearchRequest {
    pub fn index_name(&self) -> Option<&str> {
        self.payload.get("indexName").and_then(Value::as_str)
    }
}

/// Discriminant of a [`StoreOp`], used for logging and history assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Get,
    Insert,
    Upsert,
    Subdoc,
    Query,
    Search,
}

impl OpKind {
    pub fn name(&self) -> &'static str {
        match self {
            OpKind::Get => "get",
            OpKind::Insert => "insert",
            OpKind::Upsert => "upsert",
            OpKind::Subdoc => "subdoc",
            OpKind::Query => "query",
            OpKind::Search => "search",
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An operation the store client can schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreOp {
    Get(DocLocation),
    /// Fails with already-exists when the key is present
    Insert { location: DocLocation, value: Value },
    Upsert { location: DocLocation, value: Value },
    Subdoc {
        location: DocLocation,
        specs: Vec<SubdocSpec>,
    },
    Query(QueryRequest),
    Search(SearchRequest),
}

impl StoreOp {
    pub fn kind(&self) -> OpKind {
        match self {
            StoreOp::Get(_) => OpKind::Get,
            StoreOp::Insert { .. } => OpKind::Insert,
            StoreOp::Upsert { .. } => OpKind::Upsert,
            StoreOp::Subdoc { .. } => OpKind::Subdoc,
            StoreOp::Query(_) => OpKind::Query,
            StoreOp::Search(_) => OpKind::Search,
        }
    }

    /// Document this operation addresses, if it is a key-value operation
    pub fn location(&self) -> Option<&DocLocation> {
        match self {
            StoreOp::Get(location)
            | StoreOp::Insert { location, .. }
            | StoreOp::Upsert { location, .. }
            | StoreOp::Subdoc { location, .. } => Some(location),
            StoreOp::Query(_) | StoreOp::Search(_) => None,
        }
    }

    /// Short description for log lines
    pub fn describe(&self) -> String {
        match self {
            StoreOp::Query(request) => format!(
                "query `{}` params {}",
                request.statement,
                request.params.render()
            ),
            StoreOp::Search(request) => format!(
                "search on {}",
                request.index_name().unwrap_or("<unnamed index>")
            ),
            other => match other.location() {
                Some(location) => format!("{} {}", other.kind(), location),
                None => other.kind().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_location_display() {
        let location = DocLocation::new("acme", "users", "alice");
        assert_eq!(location.to_string(), "acme.users/alice");
    }

    #[test]
    fn test_kind_and_location() {
        let op = StoreOp::Upsert {
            location: DocLocation::new("acme", "bookings", "b1"),
            value: json!({}),
        };
        assert_eq!(op.kind(), OpKind::Upsert);
        assert_eq!(op.location().map(|l| l.key.as_str()), Some("b1"));
        assert_eq!(op.describe(), "upsert acme.bookings/b1");

        let search = StoreOp::Search(SearchRequest {
            payload: json!({"indexName": "hotels-index"}),
        });
        assert!(search.location().is_none());
        assert_eq!(search.describe(), "search on hotels-index");
    }
}
