//! Query Builder Tests
//!
//! User input only ever reaches the store as bound, encoded parameters.

use serde_json::json;
use travel_gateway::query::catalog::{AIRPORT_BY_NAME, FLIGHT_PATH_AIRPORTS, ROUTE_SCHEDULE};
use travel_gateway::query::{routes, AirportSearch, HotelSearch, QueryParams};
use travel_gateway::store::StoreOp;

fn query_parts(op: StoreOp) -> (String, QueryParams) {
    match op {
        StoreOp::Query(request) => (request.statement, request.params),
        other => panic!("expected a query, got {:?}", other),
    }
}

#[test]
fn test_hostile_airport_search_is_bound() {
    let input = "x' OR '1'='1\" \\ ";
    let (statement, params) = query_parts(AirportSearch::classify(input).into_operation());

    assert_eq!(statement, AIRPORT_BY_NAME);
    assert_eq!(params.positional_value(1), Some(json!(input.to_lowercase())));
}

#[test]
fn test_airport_classification_routes() {
    let cases = [
        ("SFO", "faa=$1", "SFO"),
        ("sfo", "faa=$1", "SFO"),
        ("KSFO", "icao=$1", "KSFO"),
        ("San Francisco", "CONTAINS", "san francisco"),
        ("Sf", "CONTAINS", "sf"),
        ("SFOXX", "CONTAINS", "sfoxx"),
    ];
    for (input, fragment, term) in cases {
        let search = AirportSearch::classify(input);
        assert_eq!(search.term(), term, "term for {:?}", input);
        assert!(
            search.statement().contains(fragment),
            "{:?} should use a statement containing {}",
            input,
            fragment
        );
    }
}

#[test]
fn test_flight_path_statements() {
    let (statement, params) = query_parts(routes::airport_codes("O'Hare \"Intl\"", "Heathrow"));
    assert_eq!(statement, FLIGHT_PATH_AIRPORTS);
    assert_eq!(params.positional_value(1), Some(json!("O'Hare \"Intl\"")));
    assert_eq!(params.positional_value(2), Some(json!("Heathrow")));

    let weekday = routes::leave_weekday("05/06/2026").unwrap();
    let (statement, params) = query_parts(routes::route_schedule("ORD", "LHR", weekday));
    assert_eq!(statement, ROUTE_SCHEDULE);
    assert_eq!(params.named_value("fromfaa"), Some(json!("ORD")));
    assert_eq!(params.named_value("tofaa"), Some(json!("LHR")));
    assert_eq!(params.named_value("dayofweek"), Some(json!(4)));
}

#[test]
fn test_hotel_payload_embeds_terms_as_strings() {
    let search = HotelSearch::new("sea \"view\"", "*");
    let payload = search.payload();

    assert_eq!(payload["indexName"], "hotels-index");
    assert_eq!(payload["limit"], 100);
    let groups = payload["query"]["conjuncts"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert!(groups[0]["disjuncts"]
        .as_array()
        .unwrap()
        .iter()
        .all(|phrase| phrase["match_phrase"] == "sea \"view\""));

    match search.into_operation() {
        StoreOp::Search(request) => assert_eq!(request.index_name(), Some("hotels-index")),
        other => panic!("expected a search, got {:?}", other),
    }
}

#[test]
fn test_hotel_wildcards_match_all() {
    let payload = HotelSearch::new("", "*").payload();
    assert_eq!(payload["query"], json!({ "match_all": {} }));
}
