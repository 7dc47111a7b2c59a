//! # Inventory Responder
//!
//! Evaluates the catalog statements and the hotel search payload against the
//! in-memory keyspace, so the gateway can run without an external cluster.
//! Only the fixed catalog statements are understood; anything else completes
//! with an invalid-request failure.

use serde_json::{json, Value};

use crate::query::catalog::{
    AIRLINE_COLLECTION, AIRPORT_BY_FAA, AIRPORT_BY_ICAO, AIRPORT_BY_NAME, AIRPORT_COLLECTION,
    FLIGHT_PATH_AIRPORTS, HOTELS_INDEX, HOTEL_COLLECTION, INVENTORY_SCOPE, ROUTE_COLLECTION,
    ROUTE_SCHEDULE,
};

use super::memory::{QueryResponder, Snapshot};
use super::operation::{QueryRequest, SearchRequest};
use super::result::{FailureCode, OpResult};

const DEFAULT_SEARCH_LIMIT: usize = 10;

/// [`QueryResponder`] for the travel inventory.
#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryResponder;

impl QueryResponder for InventoryResponder {
    fn query(&self, docs: &Snapshot<'_>, request: &QueryRequest) -> Result<Vec<Value>, OpResult> {
        match request.statement.as_str() {
            AIRPORT_BY_FAA => {
                let term = positional_text(request, 1)?;
                Ok(airport_names(docs, |airport| text_field(airport, "faa") == Some(term.as_str())))
            }
            AIRPORT_BY_ICAO => {
                let term = positional_text(request, 1)?;
                Ok(airport_names(docs, |airport| text_field(airport, "icao") == Some(term.as_str())))
            }
            AIRPORT_BY_NAME => {
                let term = positional_text(request, 1)?;
                Ok(airport_names(docs, |airport| {
                    text_field(airport, "airportname")
                        .is_some_and(|name| name.to_lowercase().contains(term.as_str()))
                }))
            }
            FLIGHT_PATH_AIRPORTS => {
                let from = positional_text(request, 1)?;
                let to = positional_text(request, 2)?;
                Ok(flight_path_codes(docs, &from, &to))
            }
            ROUTE_SCHEDULE => route_schedule(docs, request),
            other => Err(OpResult::failure(
                FailureCode::InvalidRequest,
                format!("unsupported statement: {}", other),
            )),
        }
    }

    fn search(&self, docs: &Snapshot<'_>, request: &SearchRequest) -> Result<Vec<Value>, OpResult> {
        if request.index_name() != Some(HOTELS_INDEX) {
            return Err(OpResult::failure(
                FailureCode::InvalidRequest,
                format!("unknown index: {}", request.index_name().unwrap_or("<none>")),
            ));
        }

        let query = &request.payload["query"];
        let limit = request.payload["limit"]
            .as_u64()
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(DEFAULT_SEARCH_LIMIT);

        Ok(docs
            .scan(INVENTORY_SCOPE, HOTEL_COLLECTION)
            .filter(|&(_, hotel)| matches_query(query, hotel))
            .take(limit)
            .map(|(key, _)| json!({ "id": key, "index": HOTELS_INDEX, "score": 1.0 }))
            .collect())
    }
}

fn text_field<'v>(doc: &'v Value, field: &str) -> Option<&'v str> {
    doc.get(field).and_then(Value::as_str)
}

fn positional_text(request: &QueryRequest, index: usize) -> Result<String, OpResult> {
    match request.params.positional_value(index) {
        Some(Value::String(text)) => Ok(text),
        _ => Err(OpResult::failure(
            FailureCode::InvalidRequest,
            format!("missing text parameter ${}", index),
        )),
    }
}

fn named(request: &QueryRequest, name: &str) -> Result<Value, OpResult> {
    request.params.named_value(name).ok_or_else(|| {
        OpResult::failure(
            FailureCode::InvalidRequest,
            format!("missing parameter ${}", name),
        )
    })
}

fn airport_names<F>(docs: &Snapshot<'_>, predicate: F) -> Vec<Value>
where
    F: Fn(&Value) -> bool,
{
    docs.scan(INVENTORY_SCOPE, AIRPORT_COLLECTION)
        .filter(|&(_, airport)| predicate(airport))
        .map(|(_, airport)| json!({ "airportname": airport["airportname"] }))
        .collect()
}

fn flight_path_codes(docs: &Snapshot<'_>, from: &str, to: &str) -> Vec<Value> {
    let code_for = |name: &str, alias: &str| -> Vec<Value> {
        docs.scan(INVENTORY_SCOPE, AIRPORT_COLLECTION)
            .filter(|&(_, airport)| text_field(airport, "airportname") == Some(name))
            .map(|(_, airport)| json!({ alias: airport["faa"] }))
            .collect()
    };

    let mut rows = code_for(from, "fromAirport");
    for row in code_for(to, "toAirport") {
        if !rows.contains(&row) {
            rows.push(row);
        }
    }
    rows
}

fn route_schedule(docs: &Snapshot<'_>, request: &QueryRequest) -> Result<Vec<Value>, OpResult> {
    let from = named(request, "fromfaa")?;
    let to = named(request, "tofaa")?;
    let day = named(request, "dayofweek")?;

    let mut rows = Vec::new();
    for (_, route) in docs.scan(INVENTORY_SCOPE, ROUTE_COLLECTION) {
        if route["sourceairport"] != from || route["destinationairport"] != to {
            continue;
        }
        let Some(airline) = text_field(route, "airlineid")
            .and_then(|id| docs.get(INVENTORY_SCOPE, AIRLINE_COLLECTION, id))
        else {
            continue;
        };
        let Some(schedule) = route["schedule"].as_array() else {
            continue;
        };
        for leg in schedule.iter().filter(|leg| leg["day"] == day) {
            rows.push(json!({
                "name": airline["name"],
                "flight": leg["flight"],
                "utc": leg["utc"],
                "sourceairport": route["sourceairport"],
                "destinationairport": route["destinationairport"],
                "equipment": route["equipment"],
            }));
        }
    }

    rows.sort_by(|a, b| a["name"].as_str().cmp(&b["name"].as_str()));
    Ok(rows)
}

fn matches_query(query: &Value, doc: &Value) -> bool {
    if query.get("match_all").is_some() {
        return true;
    }
    if let Some(conjuncts) = query.get("conjuncts").and_then(Value::as_array) {
        return conjuncts.iter().all(|conjunct| matches_query(conjunct, doc));
    }
    if let Some(disjuncts) = query.get("disjuncts").and_then(Value::as_array) {
        return disjuncts.iter().any(|disjunct| matches_query(disjunct, doc));
    }
    match (
        query.get("match_phrase").and_then(Value::as_str),
        query.get("field").and_then(Value::as_str),
    ) {
        (Some(phrase), Some(field)) => text_field(doc, field)
            .is_some_and(|text| text.to_lowercase().contains(&phrase.to_lowercase())),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{routes, AirportSearch, HotelSearch};
    use crate::store::{InMemoryStore, Payload, StoreOp};

    fn store() -> InMemoryStore {
        let store = InMemoryStore::new().with_responder(InventoryResponder);
        store
            .load_seed(&json!({
                "inventory": {
                    "airport": {
                        "airport_1": {"airportname": "San Francisco Intl", "faa": "SFO", "icao": "KSFO"},
                        "airport_2": {"airportname": "Los Angeles Intl", "faa": "LAX", "icao": "KLAX"}
                    },
                    "airline": {
                        "airline_1": {"name": "United"},
                        "airline_2": {"name": "Alaska"}
                    },
                    "route": {
                        "route_1": {
                            "airlineid": "airline_1", "sourceairport": "SFO",
                            "destinationairport": "LAX", "equipment": "738",
                            "schedule": [{"day": 1, "flight": "UA100", "utc": "09:00:00"},
                                         {"day": 2, "flight": "UA101", "utc": "10:00:00"}]
                        },
                        "route_2": {
                            "airlineid": "airline_2", "sourceairport": "SFO",
                            "destinationairport": "LAX", "equipment": "320",
                            "schedule": [{"day": 1, "flight": "AS200", "utc": "12:00:00"}]
                        }
                    },
                    "hotel": {
                        "hotel_1": {"name": "Harbor Inn", "city": "San Diego", "description": "Pool and sea view"},
                        "hotel_2": {"name": "Mountain Lodge", "city": "Denver", "description": "Fireplace"}
                    }
                }
            }))
            .unwrap();
        store
    }

    fn rows(store: &InMemoryStore, op: StoreOp) -> Vec<Value> {
        match store.apply(&op) {
            OpResult::Success(Payload::Rows(set)) => set.rows,
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_airport_lookups() {
        let store = store();
        assert_eq!(
            rows(&store, AirportSearch::classify("sfo").into_operation()),
            vec![json!({"airportname": "San Francisco Intl"})]
        );
        assert_eq!(
            rows(&store, AirportSearch::classify("KLAX").into_operation()),
            vec![json!({"airportname": "Los Angeles Intl"})]
        );
        assert_eq!(rows(&store, AirportSearch::classify("Intl").into_operation()).len(), 2);
        assert!(rows(&store, AirportSearch::classify("zzz").into_operation()).is_empty());
    }

    #[test]
    fn test_flight_path_codes() {
        let store = store();
        let found = rows(&store, routes::airport_codes("San Francisco Intl", "Los Angeles Intl"));
        assert_eq!(found, vec![json!({"fromAirport": "SFO"}), json!({"toAirport": "LAX"})]);
    }

    #[test]
    fn test_route_schedule_joins_and_orders() {
        let store = store();
        let found = rows(&store, routes::route_schedule("SFO", "LAX", 1));
        assert_eq!(found.len(), 2);
        assert_eq!(found[0]["name"], "Alaska");
        assert_eq!(found[1]["flight"], "UA100");
        assert_eq!(found[1]["equipment"], "738");
    }

    #[test]
    fn test_hotel_search() {
        let store = store();
        let hits = rows(&store, HotelSearch::new("pool", "san diego").into_operation());
        assert_eq!(hits, vec![json!({"id": "hotel_1", "index": "hotels-index", "score": 1.0})]);
        assert_eq!(rows(&store, HotelSearch::new("*", "*").into_operation()).len(), 2);
    }
}
