//! Helpers for reading service responses across API dialects.
//!
//! Two response shapes are in circulation for the same endpoints:
//!
//! - the 0.90 dialect returns mapping bodies without a `mappings` wrapper,
//!   flattens settings keys with dots (`index.number_of_shards`) and reports
//!   document presence as `exists`;
//! - the 1.x dialect nests mappings and settings under `mappings`/`settings`
//!   and reports document presence as `found`.
//!
//! Newer services also report `hits.total` as an object. The helpers here
//! accept every shape and return one canonical form.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EsResult;

/// A token descriptor returned by the analyzer endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeToken {
    /// The token text.
    pub token: String,
    /// Start offset in the analyzed text.
    #[serde(default)]
    pub start_offset: Option<u64>,
    /// End offset in the analyzed text.
    #[serde(default)]
    pub end_offset: Option<u64>,
    /// Token type, e.g. `<ALPHANUM>` or `word`.
    #[serde(rename = "type", default)]
    pub token_type: Option<String>,
    /// Position in the token stream.
    #[serde(default)]
    pub position: Option<u64>,
}

/// Extracts the token list from an analyzer response.
pub fn parse_tokens(response: &Value) -> EsResult<Vec<AnalyzeToken>> {
    match response.get("tokens") {
        Some(tokens) => Ok(serde_json::from_value(tokens.clone())?),
        None => Ok(Vec::new()),
    }
}

/// Returns the total hit count of a search response.
pub fn hits_total(response: &Value) -> Option<u64> {
    let total = response.get("hits")?.get("total")?;
    total
        .as_u64()
        .or_else(|| total.get("value").and_then(Value::as_u64))
}

/// Returns the `_id` of every hit, in response order.
pub fn hit_ids(response: &Value) -> Vec<String> {
    hits(response)
        .filter_map(|hit| hit.get("_id").and_then(Value::as_str))
        .map(String::from)
        .collect()
}

/// Returns the `_source` of every hit, in response order.
pub fn hit_sources(response: &Value) -> Vec<Value> {
    hits(response)
        .filter_map(|hit| hit.get("_source").cloned())
        .collect()
}

fn hits(response: &Value) -> impl Iterator<Item = &Value> {
    response
        .get("hits")
        .and_then(|h| h.get("hits"))
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
}

/// Reads document presence from a get response (`found` or `exists`).
pub fn document_found(response: &Value) -> Option<bool> {
    response
        .get("found")
        .or_else(|| response.get("exists"))
        .and_then(Value::as_bool)
}

/// Collects alias names from an alias listing.
///
/// The listing is keyed by concrete index name; every entry's `aliases` object
/// contributes its keys.
pub fn alias_names(response: &Value) -> BTreeSet<String> {
    response
        .as_object()
        .into_iter()
        .flat_map(|indices| indices.values())
        .filter_map(|entry| entry.get("aliases").and_then(Value::as_object))
        .flat_map(|aliases| aliases.keys().cloned())
        .collect()
}

/// Returns the `type -> mapping` object of `index` from a mapping response.
pub fn normalize_mappings(index: &str, response: &Value) -> Value {
    let Some(entry) = response.get(index) else {
        return response.clone();
    };
    match entry.get("mappings") {
        Some(mappings) => mappings.clone(),
        None => entry.clone(),
    }
}

/// Returns the nested settings of `index` from a settings response.
///
/// Dotted keys are expanded, so `{"index.number_of_shards": "7"}` and
/// `{"index": {"number_of_shards": "7"}}` both come back in the second form.
pub fn normalize_settings(index: &str, response: &Value) -> Value {
    let entry = response.get(index).unwrap_or(response);
    let settings = entry.get("settings").unwrap_or(entry);
    match settings {
        Value::Object(map) => Value::Object(expand_dotted_keys(map)),
        other => other.clone(),
    }
}

fn expand_dotted_keys(map: &Map<String, Value>) -> Map<String, Value> {
    let mut out = Map::new();
    for (key, value) in map {
        let value = match value {
            Value::Object(inner) => Value::Object(expand_dotted_keys(inner)),
            other => other.clone(),
        };
        let parts: Vec<&str> = key.split('.').collect();
        insert_path(&mut out, &parts, value);
    }
    out
}

fn insert_path(target: &mut Map<String, Value>, parts: &[&str], value: Value) {
    let Some((head, rest)) = parts.split_first() else {
        return;
    };

    if rest.is_empty() {
        let key = (*head).to_string();
        match value {
            Value::Object(incoming) if target.get(&key).is_some_and(Value::is_object) => {
                if let Some(Value::Object(existing)) = target.get_mut(&key) {
                    for (k, v) in incoming {
                        insert_path(existing, &[k.as_str()], v);
                    }
                }
            }
            value => {
                target.insert(key, value);
            }
        }
        return;
    }

    let child = target
        .entry((*head).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !child.is_object() {
        *child = Value::Object(Map::new());
    }
    if let Value::Object(child) = child {
        insert_path(child, rest, value);
    }
}
