//! Hotel full-text search payloads.

use serde_json::{json, Value};

use crate::store::{SearchRequest, StoreOp};

use super::catalog::{HOTELS_INDEX, HOTEL_SEARCH_LIMIT};

const LOCATION_FIELDS: [&str; 4] = ["country", "city", "state", "address"];
const DESCRIPTION_FIELDS: [&str; 2] = ["description", "name"];

/// Search terms for the hotel index. An empty term or `*` matches anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelSearch {
    pub description: String,
    pub location: String,
}

impl HotelSearch {
    pub fn new(description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            location: location.into(),
        }
    }

    /// The search payload. Terms are embedded as JSON strings by the
    /// serializer, never by text splicing.
    pub fn payload(&self) -> Value {
        let mut conjuncts = Vec::new();
        if let Some(group) = disjuncts(&self.location, &LOCATION_FIELDS) {
            conjuncts.push(group);
        }
        if let Some(group) = disjuncts(&self.description, &DESCRIPTION_FIELDS) {
            conjuncts.push(group);
        }

        let query = if conjuncts.is_empty() {
            json!({ "match_all": {} })
        } else {
            json!({ "conjuncts": conjuncts })
        };

        json!({
            "indexName": HOTELS_INDEX,
            "limit": HOTEL_SEARCH_LIMIT,
            "query": query,
        })
    }

    pub fn into_operation(self) -> StoreOp {
        StoreOp::Search(SearchRequest {
            payload: self.payload(),
        })
    }
}

fn is_wildcard(term: &str) -> bool {
    term.is_empty() || term == "*"
}

fn disjuncts(term: &str, fields: &[&str]) -> Option<Value> {
    if is_wildcard(term) {
        return None;
    }
    let phrases: Vec<Value> = fields
        .iter()
        .map(|field| json!({ "match_phrase": term, "field": field }))
        .collect();
    Some(json!({ "disjuncts": phrases }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcards_give_match_all() {
        let payload = HotelSearch::new("*", "").payload();
        assert_eq!(payload["query"], json!({"match_all": {}}));
        assert_eq!(payload["indexName"], "hotels-index");
        assert_eq!(payload["limit"], 100);
    }

    #[test]
    fn test_location_only() {
        let payload = HotelSearch::new("*", "France").payload();
        let conjuncts = payload["query"]["conjuncts"].as_array().unwrap();
        assert_eq!(conjuncts.len(), 1);
        let fields: Vec<&str> = conjuncts[0]["disjuncts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["field"].as_str().unwrap())
            .collect();
        assert_eq!(fields, ["country", "city", "state", "address"]);
    }

    #[test]
    fn test_both_groups_in_order() {
        let payload = HotelSearch::new("pool", "San Diego").payload();
        let conjuncts = payload["query"]["conjuncts"].as_array().unwrap();
        assert_eq!(conjuncts.len(), 2);
        assert_eq!(conjuncts[0]["disjuncts"][0]["match_phrase"], "San Diego");
        assert_eq!(conjuncts[1]["disjuncts"][1], json!({"match_phrase": "pool", "field": "name"}));
    }

    #[test]
    fn test_quotes_survive_as_data() {
        let payload = HotelSearch::new(r#"sea "view""#, "*").payload();
        assert_eq!(
            payload["query"]["conjuncts"][0]["disjuncts"][0]["match_phrase"],
            r#"sea "view""#
        );
    }
}
