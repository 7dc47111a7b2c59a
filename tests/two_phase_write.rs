//! Two-Phase Write Tests
//!
//! Create a booking document, then append its key to the user document.
//! - Phase two is never scheduled when phase one fails
//! - A phase two failure leaves the phase one document in place
//! - A write cannot be attempted twice

use std::sync::Arc;

use serde_json::json;
use travel_gateway::bridge::OperationBridge;
use travel_gateway::orchestrator::{TwoPhaseError, TwoPhaseRecord, TwoPhaseWrite, WritePhase};
use travel_gateway::query::encode_scalar;
use travel_gateway::store::{
    DocLocation, FailureCode, InMemoryStore, OpKind, OpResult, StoreOp, StoreStatus,
};

// =============================================================================
// Test Utilities
// =============================================================================

fn user() -> DocLocation {
    DocLocation::new("tenant_agent_01", "users", "bob")
}

fn booking(key: &str) -> DocLocation {
    DocLocation::new("tenant_agent_01", "bookings", key)
}

fn record(key: &str) -> TwoPhaseRecord {
    TwoPhaseRecord {
        created: booking(key),
        document: json!({ "flight": "UA987", "price": 120.5 }),
        parent: user(),
        field: "bookings".to_string(),
        reference: encode_scalar(key),
    }
}

fn store_with_user() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.put(&user(), json!({ "user": "bob", "password": "hash" }));
    store
}

fn bridge_for(store: &InMemoryStore) -> OperationBridge {
    OperationBridge::new(Arc::new(store.clone()))
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_commit_links_booking() {
    let store = store_with_user();
    let mut bridge = bridge_for(&store);

    let mut write = TwoPhaseWrite::new(record("k1"));
    write.run(&mut bridge).await.unwrap();

    assert_eq!(write.phase(), WritePhase::Committed);
    assert_eq!(
        write.transitions(),
        &[
            WritePhase::Idle,
            WritePhase::Phase1Pending,
            WritePhase::Phase1Done,
            WritePhase::Phase2Pending,
            WritePhase::Committed,
        ]
    );
    assert_eq!(store.document(&booking("k1")).unwrap()["flight"], "UA987");
    assert_eq!(store.document(&user()).unwrap()["bookings"], json!(["k1"]));

    let kinds: Vec<OpKind> = store.history().iter().map(StoreOp::kind).collect();
    assert_eq!(kinds, vec![OpKind::Upsert, OpKind::Subdoc]);
}

#[tokio::test]
async fn test_second_booking_appends() {
    let store = store_with_user();
    let mut bridge = bridge_for(&store);

    for key in ["k1", "k2"] {
        TwoPhaseWrite::new(record(key)).run(&mut bridge).await.unwrap();
    }
    assert_eq!(store.document(&user()).unwrap()["bookings"], json!(["k1", "k2"]));
}

#[tokio::test]
async fn test_phase1_failure_skips_phase2() {
    let store = store_with_user();
    store.inject_fault(
        |op| op.kind() == OpKind::Upsert,
        OpResult::failure(FailureCode::Unavailable, "bookings unavailable"),
    );
    let mut bridge = bridge_for(&store);

    let mut write = TwoPhaseWrite::new(record("k1"));
    let err = write.run(&mut bridge).await.unwrap_err();

    assert!(matches!(err, TwoPhaseError::Phase1(_)));
    assert_eq!(write.phase(), WritePhase::Phase1Failed);
    assert_eq!(store.count(OpKind::Subdoc), 0);
    assert!(store.document(&booking("k1")).is_none());
    assert!(store.document(&user()).unwrap().get("bookings").is_none());
}

#[tokio::test]
async fn test_phase2_failure_leaves_booking() {
    let store = store_with_user();
    store.fail_key("bob", OpResult::failure(FailureCode::Unavailable, "users unavailable"));
    let mut bridge = bridge_for(&store);

    let mut write = TwoPhaseWrite::new(record("k1"));
    let err = write.run(&mut bridge).await.unwrap_err();

    match err {
        TwoPhaseError::Phase2 { created, .. } => assert_eq!(created, booking("k1")),
        other => panic!("expected a phase two error, got {:?}", other),
    }
    assert_eq!(write.phase(), WritePhase::Phase2Failed);
    assert!(write.phase().is_terminal());
    assert!(store.document(&booking("k1")).is_some());
}

#[tokio::test]
async fn test_missing_parent_fails_phase2() {
    let store = InMemoryStore::new();
    let mut bridge = bridge_for(&store);

    let mut write = TwoPhaseWrite::new(record("k1"));
    match write.run(&mut bridge).await.unwrap_err() {
        TwoPhaseError::Phase2 { source, .. } => {
            assert_eq!(source.status(), Some(&StoreStatus::NotFound))
        }
        other => panic!("expected a phase two error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_write_runs_once() {
    let store = store_with_user();
    let mut bridge = bridge_for(&store);

    let mut write = TwoPhaseWrite::new(record("k1"));
    write.run(&mut bridge).await.unwrap();

    let err = write.run(&mut bridge).await.unwrap_err();
    assert!(matches!(err, TwoPhaseError::AlreadyAttempted(WritePhase::Committed)));
    assert_eq!(store.count(OpKind::Upsert), 1);
}
