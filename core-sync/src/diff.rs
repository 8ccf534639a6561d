//! Structural delta between two property trees
//!
//! The delta is one-directional: it reports keys of `target` that are missing
//! from `source` or hold a different value, and never keys that only exist in
//! `source`. Remote resources carry plenty of properties the catalog does not
//! manage, and those must not show up as changes.

use serde_json::{Map, Value};

/// Compute the delta taking `source` to `target`
///
/// Nested objects are compared recursively and included only when their own
/// delta is non-empty.
pub fn diff(source: &Map<String, Value>, target: &Map<String, Value>) -> Map<String, Value> {
    let mut delta = Map::new();

    for (key, target_value) in target {
        match (source.get(key), target_value) {
            (None, _) => {
                delta.insert(key.clone(), target_value.clone());
            }
            (Some(Value::Object(source_map)), Value::Object(target_map)) => {
                let sub_delta = diff(source_map, target_map);
                if !sub_delta.is_empty() {
                    delta.insert(key.clone(), Value::Object(sub_delta));
                }
            }
            (Some(source_value), _) if source_value != target_value => {
                delta.insert(key.clone(), target_value.clone());
            }
            _ => {}
        }
    }

    delta
}
