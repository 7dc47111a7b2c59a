//! Parameter binding for statements.

use std::collections::BTreeMap;

use serde_json::Value;

use super::encode::EncodedValue;

/// Parameters bound to a statement. Values are always pre-encoded.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum QueryParams {
    #[default]
    None,
    /// A JSON array literal whose elements bind to `$1`, `$2`, ...
    Positional(EncodedValue),
    /// Named bindings, keyed without the leading `$`.
    Named(BTreeMap<String, EncodedValue>),
}

impl QueryParams {
    /// Positional parameters from an encoded array literal
    pub fn positional(list: EncodedValue) -> Self {
        QueryParams::Positional(list)
    }

    /// Start an empty set of named parameters
    pub fn named() -> Self {
        QueryParams::Named(BTreeMap::new())
    }

    /// Bind a named parameter. Positional or empty parameters are replaced
    /// by a named set.
    pub fn bind(self, name: impl Into<String>, value: EncodedValue) -> Self {
        let mut named = match self {
            QueryParams::Named(named) => named,
            _ => BTreeMap::new(),
        };
        named.insert(name.into().trim_start_matches('$').to_string(), value);
        QueryParams::Named(named)
    }

    /// Decoded value of the positional parameter `$index` (1-based)
    pub fn positional_value(&self, index: usize) -> Option<Value> {
        let QueryParams::Positional(list) = self else {
            return None;
        };
        match list.decode().ok()? {
            Value::Array(mut items) if index >= 1 && index <= items.len() => {
                Some(items.swap_remove(index - 1))
            }
            _ => None,
        }
    }

    /// Decoded value of a named parameter (with or without the `$`)
    pub fn named_value(&self, name: &str) -> Option<Value> {
        let QueryParams::Named(named) = self else {
            return None;
        };
        named.get(name.trim_start_matches('$'))?.decode().ok()
    }

    /// Render the bindings for debug logging
    pub fn render(&self) -> String {
        match self {
            QueryParams::None => String::from("-"),
            QueryParams::Positional(list) => list.to_string(),
            QueryParams::Named(named) => named
                .iter()
                .map(|(k, v)| format!("${}={}", k, v))
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::encode::{encode_list, encode_scalar};
    use serde_json::json;

    #[test]
    fn test_positional_lookup_is_one_based() {
        let params = QueryParams::positional(encode_list(["JFK", "LAX"]));
        assert_eq!(params.positional_value(1), Some(json!("JFK")));
        assert_eq!(params.positional_value(2), Some(json!("LAX")));
        assert_eq!(params.positional_value(0), None);
        assert_eq!(params.positional_value(3), None);
    }

    #[test]
    fn test_named_binding_strips_dollar() {
        let params = QueryParams::named()
            .bind("$fromfaa", encode_scalar("SFO"))
            .bind("dayofweek", encode_scalar(4u32));
        assert_eq!(params.named_value("fromfaa"), Some(json!("SFO")));
        assert_eq!(params.named_value("$dayofweek"), Some(json!(4)));
        assert_eq!(params.positional_value(1), None);
    }

    #[test]
    fn test_render() {
        let params = QueryParams::named().bind("tofaa", encode_scalar("LAX"));
        assert_eq!(params.render(), "$tofaa=\"LAX\"");
        assert_eq!(QueryParams::None.render(), "-");
    }
}
