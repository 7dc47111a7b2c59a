//! Flight bookings of a tenant user.
//!
//! Bookings are separate documents in `{tenant}.bookings`; the user document
//! lists their keys in its `bookings` array.

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::bridge::OperationBridge;
use crate::orchestrator::{
    AggregateContext, ElementFetch, FanOutMode, ScatterGather, TwoPhaseError, TwoPhaseRecord,
    TwoPhaseWrite,
};
use crate::query::catalog::{BOOKINGS_COLLECTION, BOOKINGS_FIELD, USERS_COLLECTION};
use crate::query::encode_scalar;
use crate::response::{context, ApiError, ApiResponse, ApiResult};
use crate::store::{DocLocation, Payload, StoreOp, SubdocSpec};

/// Body of a booking request
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub flights: Vec<Value>,
}

/// Fetches one booking document of a tenant.
struct BookingFetch<'t> {
    tenant: &'t str,
}

impl ElementFetch for BookingFetch<'_> {
    fn operation(&self, id: &str) -> StoreOp {
        StoreOp::Get(DocLocation::new(self.tenant, BOOKINGS_COLLECTION, id))
    }

    fn merge(&self, _id: &str, payload: Payload) -> Option<Value> {
        match payload {
            Payload::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

pub async fn list_bookings(
    bridge: &mut OperationBridge,
    mode: FanOutMode,
    tenant: &str,
    user: &str,
) -> ApiResult<ApiResponse> {
    let tenant = tenant.to_lowercase();
    let user = user.to_lowercase();

    let listing = StoreOp::Subdoc {
        location: DocLocation::new(&tenant, USERS_COLLECTION, &user),
        specs: vec![SubdocSpec::get(BOOKINGS_FIELD)],
    };

    let mut aggregate = AggregateContext::new();
    aggregate.describe(context::kv(
        "get",
        &tenant,
        USERS_COLLECTION,
        format!("for {} field in document {}", BOOKINGS_FIELD, user),
    ));

    let fetch = BookingFetch { tenant: &tenant };
    let listed = ScatterGather::new(bridge, mode)
        .list_then_fan_out(listing, &fetch, &mut aggregate)
        .await
        .map_err(|e| {
            error!(error = %e, "booking listing failed");
            ApiError::BookingsLookupFailed
        })?;

    if listed > 0 {
        aggregate.describe(context::kv(
            "get",
            &tenant,
            BOOKINGS_COLLECTION,
            format!("{} booking documents", listed),
        ));
    }
    info!(
        tenant = %tenant,
        user = %user,
        listed,
        returned = aggregate.len(),
        "listed bookings"
    );
    if let Some(failure) = aggregate.first_failure() {
        warn!(first = %failure, skipped = aggregate.skipped().len(), "some bookings were dropped");
    }
    Ok(ApiResponse::from_aggregate(aggregate))
}

/// Book every flight in order. Each flight is its own two-phase write; the
/// first failure stops the run.
pub async fn book_flights(
    bridge: &mut OperationBridge,
    tenant: &str,
    user: &str,
    request: BookingRequest,
) -> ApiResult<ApiResponse> {
    let tenant = tenant.to_lowercase();
    let user = user.to_lowercase();
    let parent = DocLocation::new(&tenant, USERS_COLLECTION, &user);

    let mut added = Vec::with_capacity(request.flights.len());
    for flight in request.flights {
        let key = Uuid::new_v4().to_string();
        let mut write = TwoPhaseWrite::new(TwoPhaseRecord {
            created: DocLocation::new(&tenant, BOOKINGS_COLLECTION, &key),
            document: flight.clone(),
            parent: parent.clone(),
            field: BOOKINGS_FIELD.to_string(),
            reference: encode_scalar(&key),
        });

        match write.run(bridge).await {
            Ok(()) => added.push(flight),
            Err(TwoPhaseError::Phase2 { .. }) => return Err(ApiError::BookingLinkFailed),
            Err(_) => return Err(ApiError::BookingUpsertFailed),
        }
    }

    Ok(ApiResponse::added(
        added,
        vec![context::kv(
            "update",
            &tenant,
            USERS_COLLECTION,
            format!("for {} field in document {}", BOOKINGS_FIELD, user),
        )],
    ))
}
