//! Row accumulation for streaming operations.

use serde_json::Value;
use tracing::warn;

use super::result::{OpResult, Payload, RowSet};

/// Collects the rows of a query or search as they stream in.
///
/// Each row arrives as raw JSON text. Rows that do not decode to a JSON
/// object are logged and skipped; the stream closes with the metadata row.
#[derive(Debug)]
pub struct RowCollector {
    label: &'static str,
    rows: Vec<Value>,
    skipped: usize,
}

impl RowCollector {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            rows: Vec::new(),
            skipped: 0,
        }
    }

    pub fn push_raw(&mut self, raw: &[u8]) {
        match serde_json::from_slice::<Value>(raw) {
            Ok(row @ Value::Object(_)) => self.rows.push(row),
            Ok(other) => {
                self.skipped += 1;
                warn!(stream = self.label, row = %other, "skipping non-object row");
            }
            Err(e) => {
                self.skipped += 1;
                warn!(stream = self.label, error = %e, "skipping undecodable row");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Close the stream with its metadata row.
    pub fn finish(self, meta_raw: &[u8]) -> OpResult {
        let meta = serde_json::from_slice(meta_raw).unwrap_or_else(|e| {
            warn!(stream = self.label, error = %e, "metadata row did not decode");
            Value::Null
        });
        OpResult::Success(Payload::Rows(RowSet {
            rows: self.rows,
            meta,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_collects_objects_and_skips_garbage() {
        let mut collector = RowCollector::new("airports");
        collector.push_raw(br#"{"airportname":"Heathrow"}"#);
        collector.push_raw(b"not json");
        collector.push_raw(b"42");
        collector.push_raw(br#"{"airportname":"Gatwick"}"#);

        assert_eq!(collector.len(), 2);
        assert_eq!(collector.skipped(), 2);

        let result = collector.finish(br#"{"status":"success"}"#);
        let OpResult::Success(Payload::Rows(set)) = result else {
            panic!("expected rows");
        };
        assert_eq!(set.rows[1], json!({"airportname": "Gatwick"}));
        assert_eq!(set.meta["status"], "success");
    }

    #[test]
    fn test_empty_stream_is_success() {
        let collector = RowCollector::new("empty");
        assert!(collector.is_empty());
        assert!(collector.finish(b"{}").is_success());
    }
}
