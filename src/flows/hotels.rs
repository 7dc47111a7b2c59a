//! Hotel search: full-text search, then a field read per hit.

use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::bridge::OperationBridge;
use crate::orchestrator::{AggregateContext, ElementFetch, FanOutMode, ScatterGather};
use crate::query::catalog::{HOTEL_COLLECTION, HOTEL_DETAIL_PATHS, INVENTORY_SCOPE};
use crate::query::HotelSearch;
use crate::response::{context, ApiError, ApiResponse, ApiResult};
use crate::store::{DocLocation, Payload, StoreOp, SubdocSpec};

/// Reads the display fields of one hotel.
struct HotelDetail;

impl ElementFetch for HotelDetail {
    fn operation(&self, id: &str) -> StoreOp {
        StoreOp::Subdoc {
            location: DocLocation::new(INVENTORY_SCOPE, HOTEL_COLLECTION, id),
            specs: HOTEL_DETAIL_PATHS.iter().map(|path| SubdocSpec::get(*path)).collect(),
        }
    }

    fn merge(&self, _id: &str, payload: Payload) -> Option<Value> {
        let Payload::Fields(fields) = payload else {
            return None;
        };
        Some(hotel_entry(&fields))
    }
}

/// `{name, description, address}` from the fields read in
/// [`HOTEL_DETAIL_PATHS`] order. Absent name or description are left out;
/// the address joins whichever components are present.
fn hotel_entry(fields: &[Option<Value>]) -> Value {
    let text = |index: usize| field_text(fields, index);

    let address = (1..=4).filter_map(text).collect::<Vec<_>>().join(", ");

    let mut entry = Map::new();
    if let Some(name) = text(0) {
        entry.insert("name".to_string(), Value::from(name));
    }
    if let Some(description) = text(5) {
        entry.insert("description".to_string(), Value::from(description));
    }
    entry.insert("address".to_string(), Value::from(address));
    Value::Object(entry)
}

fn field_text(fields: &[Option<Value>], index: usize) -> Option<&str> {
    fields.get(index)?.as_ref()?.as_str().filter(|s| !s.is_empty())
}

pub async fn search_hotels(
    bridge: &mut OperationBridge,
    mode: FanOutMode,
    description: &str,
    location: &str,
) -> ApiResult<ApiResponse> {
    let search = HotelSearch::new(description, location);

    let mut aggregate = AggregateContext::new();
    aggregate.describe(context::search(&search.payload()));

    ScatterGather::new(bridge, mode)
        .search_then_detail(search.into_operation(), "id", &HotelDetail, &mut aggregate)
        .await
        .map_err(|e| {
            error!(error = %e, "hotel search failed");
            ApiError::HotelSearchFailed
        })?;

    if let Some(failure) = aggregate.first_failure() {
        warn!(
            skipped = aggregate.skipped().len(),
            returned = aggregate.len(),
            first = %failure,
            "hotel search returned partial results"
        );
    }
    Ok(ApiResponse::from_aggregate(aggregate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hotel_entry_joins_present_address_parts() {
        let fields = vec![
            Some(json!("Harbor Inn")),
            Some(json!("1 Bay St")),
            Some(json!("San Diego")),
            None,
            Some(json!("United States")),
            Some(json!("Sea view")),
        ];
        assert_eq!(
            hotel_entry(&fields),
            json!({
                "name": "Harbor Inn",
                "description": "Sea view",
                "address": "1 Bay St, San Diego, United States"
            })
        );
    }

    #[test]
    fn test_hotel_entry_with_sparse_fields() {
        let fields = vec![Some(json!("Lodge")), None, None, None, None, None];
        assert_eq!(hotel_entry(&fields), json!({"name": "Lodge", "address": ""}));
    }

    #[test]
    fn test_detail_reads_six_paths() {
        let StoreOp::Subdoc { location, specs } = HotelDetail.operation("hotel_1") else {
            panic!("expected subdoc");
        };
        assert_eq!(location.to_string(), "inventory.hotel/hotel_1");
        let paths: Vec<&str> = specs.iter().map(SubdocSpec::path).collect();
        assert_eq!(paths, HOTEL_DETAIL_PATHS);
    }
}
