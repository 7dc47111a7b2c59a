//! # In-Memory Store
//!
//! A complete in-process store client. Documents live in a keyspace of
//! `(scope, collection) -> key -> document`; every scheduled operation is
//! executed on a spawned tokio task and completes its delegate from there,
//! optionally after a simulated latency, so completions arrive out of
//! scheduling order just as they would from a remote cluster.
//!
//! Tests drive failure paths through fault injection and assert on the
//! recorded operation history.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use rand::Rng;
use serde_json::{json, Map, Value};
use tokio::runtime::Handle;
use tracing::{debug, warn};

use crate::bridge::Delegate;

use super::client::StoreClient;
use super::errors::{ScheduleError, SeedError};
use super::operation::{DocLocation, OpKind, QueryRequest, SearchRequest, StoreOp, SubdocSpec};
use super::result::{FailureCode, OpResult, Payload};
use super::rows::RowCollector;

type Keyspace = HashMap<(String, String), BTreeMap<String, Value>>;
type FaultMatcher = Box<dyn Fn(&StoreOp) -> bool + Send + Sync>;

/// Read-only view of the keyspace handed to a [`QueryResponder`].
pub struct Snapshot<'a> {
    docs: &'a Keyspace,
}

impl<'a> Snapshot<'a> {
    pub fn get(&self, scope: &str, collection: &str, key: &str) -> Option<&'a Value> {
        self.docs
            .get(&(scope.to_string(), collection.to_string()))?
            .get(key)
    }

    /// All documents of a collection in key order
    pub fn scan(&self, scope: &str, collection: &str) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.docs
            .get(&(scope.to_string(), collection.to_string()))
            .into_iter()
            .flat_map(|docs| docs.iter().map(|(k, v)| (k.as_str(), v)))
    }
}

/// Evaluates statements and search payloads against the in-memory keyspace.
///
/// Returning `Err` completes the operation with that result instead of rows.
pub trait QueryResponder: Send + Sync {
    fn query(&self, docs: &Snapshot<'_>, request: &QueryRequest) -> Result<Vec<Value>, OpResult>;

    fn search(&self, docs: &Snapshot<'_>, request: &SearchRequest) -> Result<Vec<Value>, OpResult>;
}

/// Simulated completion delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency {
    pub base: Duration,
    pub jitter: Duration,
}

impl Latency {
    pub fn fixed(base: Duration) -> Self {
        Self {
            base,
            jitter: Duration::ZERO,
        }
    }

    pub fn jittered(base: Duration, jitter: Duration) -> Self {
        Self { base, jitter }
    }

    fn sample(&self) -> Duration {
        if self.jitter.is_zero() {
            return self.base;
        }
        let max = u64::try_from(self.jitter.as_micros()).unwrap_or(u64::MAX);
        self.base + Duration::from_micros(rand::thread_rng().gen_range(0..=max))
    }
}

struct Fault {
    matcher: FaultMatcher,
    outcome: OpResult,
}

/// In-process [`StoreClient`].
#[derive(Clone, Default)]
pub struct InMemoryStore {
    docs: Arc<RwLock<Keyspace>>,
    faults: Arc<Mutex<Vec<Fault>>>,
    refusing: Arc<AtomicBool>,
    history: Arc<Mutex<Vec<StoreOp>>>,
    latency: Latency,
    responder: Option<Arc<dyn QueryResponder>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_latency(mut self, latency: Latency) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_responder(mut self, responder: impl QueryResponder + 'static) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }

    // ==================
    // Direct access
    // ==================

    /// Write a document without going through the scheduler
    pub fn put(&self, location: &DocLocation, value: Value) {
        write(&self.docs)
            .entry((location.scope.clone(), location.collection.clone()))
            .or_default()
            .insert(location.key.clone(), value);
    }

    pub fn document(&self, location: &DocLocation) -> Option<Value> {
        read(&self.docs)
            .get(&(location.scope.clone(), location.collection.clone()))
            .and_then(|docs| docs.get(&location.key))
            .cloned()
    }

    /// Load `{ scope: { collection: { key: document } } }`. Returns the
    /// number of documents written.
    pub fn load_seed(&self, seed: &Value) -> Result<usize, SeedError> {
        let scopes = seed
            .as_object()
            .ok_or_else(|| SeedError::NotAnObject("<root>".to_string()))?;

        let mut loaded = 0;
        for (scope, collections) in scopes {
            let collections = collections
                .as_object()
                .ok_or_else(|| SeedError::NotAnObject(scope.clone()))?;
            for (collection, docs) in collections {
                let docs = docs
                    .as_object()
                    .ok_or_else(|| SeedError::NotAnObject(format!("{}.{}", scope, collection)))?;
                for (key, doc) in docs {
                    self.put(&DocLocation::new(scope, collection, key), doc.clone());
                    loaded += 1;
                }
            }
        }
        Ok(loaded)
    }

    // ==================
    // Fault injection
    // ==================

    /// Force every operation addressed at `key` to complete with `outcome`
    pub fn fail_key(&self, key: impl Into<String>, outcome: OpResult) {
        let key = key.into();
        self.inject_fault(
            move |op| op.location().is_some_and(|l| l.key == key),
            outcome,
        );
    }

    /// Force every operation matching `matcher` to complete with `outcome`
    pub fn inject_fault<F>(&self, matcher: F, outcome: OpResult)
    where
        F: Fn(&StoreOp) -> bool + Send + Sync + 'static,
    {
        lock(&self.faults).push(Fault {
            matcher: Box::new(matcher),
            outcome,
        });
    }

    pub fn clear_faults(&self) {
        lock(&self.faults).clear();
    }

    /// Make `schedule` fail until switched off again
    pub fn refuse_scheduling(&self, refuse: bool) {
        self.refusing.store(refuse, Ordering::SeqCst);
    }

    // ==================
    // History
    // ==================

    /// Every operation accepted by `schedule`, in scheduling order
    pub fn history(&self) -> Vec<StoreOp> {
        lock(&self.history).clone()
    }

    pub fn count(&self, kind: OpKind) -> usize {
        lock(&self.history).iter().filter(|op| op.kind() == kind).count()
    }

    // ==================
    // Execution
    // ==================

    /// Execute an operation synchronously on the calling thread
    pub(crate) fn apply(&self, op: &StoreOp) -> OpResult {
        if let Some(outcome) = lock(&self.faults)
            .iter()
            .find(|fault| (fault.matcher)(op))
            .map(|fault| fault.outcome.clone())
        {
            debug!("injected outcome for {}", op.describe());
            return outcome;
        }

        match op {
            StoreOp::Get(location) => match self.document(location) {
                Some(doc) => OpResult::Success(Payload::Document(doc)),
                None => OpResult::NotFound,
            },
            StoreOp::Insert { location, value } => {
                let mut docs = write(&self.docs);
                let collection = docs
                    .entry((location.scope.clone(), location.collection.clone()))
                    .or_default();
                if collection.contains_key(&location.key) {
                    return OpResult::failure(
                        FailureCode::AlreadyExists,
                        format!("{} already exists", location),
                    );
                }
                collection.insert(location.key.clone(), value.clone());
                OpResult::Success(Payload::Stored)
            }
            StoreOp::Upsert { location, value } => {
                self.put(location, value.clone());
                OpResult::Success(Payload::Stored)
            }
            StoreOp::Subdoc { location, specs } => {
                let mut docs = write(&self.docs);
                match docs
                    .get_mut(&(location.scope.clone(), location.collection.clone()))
                    .and_then(|collection| collection.get_mut(&location.key))
                {
                    Some(doc) => apply_subdoc(doc, specs),
                    None => OpResult::NotFound,
                }
            }
            StoreOp::Query(request) => {
                self.stream_rows("query", |responder, snapshot| responder.query(snapshot, request))
            }
            StoreOp::Search(request) => {
                self.stream_rows("search", |responder, snapshot| responder.search(snapshot, request))
            }
        }
    }

    fn stream_rows<F>(&self, label: &'static str, produce: F) -> OpResult
    where
        F: FnOnce(&dyn QueryResponder, &Snapshot<'_>) -> Result<Vec<Value>, OpResult>,
    {
        let Some(responder) = &self.responder else {
            return OpResult::failure(FailureCode::Unavailable, "no query service configured");
        };

        let docs = read(&self.docs);
        let rows = match produce(responder.as_ref(), &Snapshot { docs: &docs }) {
            Ok(rows) => rows,
            Err(outcome) => return outcome,
        };
        drop(docs);

        let mut collector = RowCollector::new(label);
        for row in &rows {
            match serde_json::to_vec(row) {
                Ok(raw) => collector.push_raw(&raw),
                Err(e) => warn!(error = %e, "failed to serialize {} row", label),
            }
        }
        let meta = json!({
            "status": "success",
            "metrics": {
                "resultCount": collector.len(),
                "errorCount": collector.skipped()
            }
        });
        collector.finish(meta.to_string().as_bytes())
    }
}

impl StoreClient for InMemoryStore {
    fn schedule(&self, op: StoreOp, delegate: Delegate) -> Result<(), ScheduleError> {
        if self.refusing.load(Ordering::SeqCst) {
            return Err(ScheduleError::Rejected(format!(
                "{} not accepted",
                op.kind()
            )));
        }
        let runtime = Handle::try_current().map_err(|_| ScheduleError::NoRuntime)?;

        lock(&self.history).push(op.clone());
        debug!(op = %delegate.id(), "scheduled {}", op.describe());

        let delay = self.latency.sample();
        let store = self.clone();
        runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let result = store.apply(&op);
            let id = delegate.id();
            if !delegate.complete(result) {
                debug!(op = %id, "completion arrived after the waiter went away");
            }
        });
        Ok(())
    }
}

/// Resolve a dotted path inside a document
pub(crate) fn lookup_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |node, segment| node.get(segment))
}

fn apply_subdoc(doc: &mut Value, specs: &[SubdocSpec]) -> OpResult {
    let mut working = doc.clone();
    let mut fields = Vec::with_capacity(specs.len());

    for spec in specs {
        match spec {
            SubdocSpec::Get { path } => fields.push(lookup_path(&working, path).cloned()),
            SubdocSpec::ArrayAppend {
                path,
                value,
                create_parents,
            } => {
                let value = match value.decode() {
                    Ok(value) => value,
                    Err(e) => return OpResult::failure(FailureCode::InvalidRequest, e.to_string()),
                };
                if let Err(outcome) = append_at(&mut working, path, value, *create_parents) {
                    return outcome;
                }
                fields.push(None);
            }
        }
    }

    let mutated = specs.iter().any(|spec| !spec.is_lookup());
    if !mutated && !specs.is_empty() && fields.iter().all(Option::is_none) {
        return OpResult::PathNotFound;
    }
    if mutated {
        *doc = working;
    }
    OpResult::Success(Payload::Fields(fields))
}

fn append_at(doc: &mut Value, path: &str, value: Value, create_parents: bool) -> Result<(), OpResult> {
    let mismatch = || OpResult::failure(FailureCode::PathMismatch, format!("{} is not an array path", path));

    let segments: Vec<&str> = path.split('.').collect();
    let Some((last, parents)) = segments.split_last() else {
        return Err(mismatch());
    };

    let mut cursor = doc;
    for segment in parents {
        let map = match cursor {
            Value::Object(map) => map,
            _ => return Err(mismatch()),
        };
        cursor = if create_parents {
            map.entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()))
        } else {
            match map.get_mut(*segment) {
                Some(next) => next,
                None => return Err(OpResult::PathNotFound),
            }
        };
    }

    let Value::Object(map) = cursor else {
        return Err(mismatch());
    };
    match map.get_mut(*last) {
        Some(Value::Array(items)) => {
            items.push(value);
            Ok(())
        }
        Some(_) => Err(mismatch()),
        None if create_parents => {
            map.insert(last.to_string(), Value::Array(vec![value]));
            Ok(())
        }
        None => Err(OpResult::PathNotFound),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
