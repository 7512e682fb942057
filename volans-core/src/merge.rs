//! Merge - Reconcile planned attributes with API responses
//!
//! The dashboard frequently echoes back only part of what it accepted,
//! returns explicit nulls for fields it ignored, or reshapes nested
//! blocks. These helpers reconcile the planned attribute map with the
//! response map before the result is written to state. They are pure
//! functions; nothing here touches the network.

use std::collections::HashMap;

use crate::resource::Value;

/// Field-wise reconciliation of a planned attribute map with a response map
///
/// A non-null response value wins. A null or absent response value keeps
/// the planned value. Nested maps are merged recursively; lists are
/// zipped index-wise when both sides are lists.
pub fn merge_maps(
    plan: &HashMap<String, Value>,
    response: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    let mut merged = HashMap::new();

    for (key, plan_value) in plan {
        match response.get(key) {
            Some(resp_value) if !resp_value.is_null() => {
                merged.insert(key.clone(), merge_value(plan_value, resp_value));
            }
            _ => {
                merged.insert(key.clone(), plan_value.clone());
            }
        }
    }

    // Response-only fields (computed attributes) pass straight through
    for (key, resp_value) in response {
        if !plan.contains_key(key) && !resp_value.is_null() {
            merged.insert(key.clone(), resp_value.clone());
        }
    }

    merged
}

/// Merge a single planned value with its response counterpart
pub fn merge_value(plan: &Value, response: &Value) -> Value {
    match (plan, response) {
        (_, Value::Null) => plan.clone(),
        (Value::Map(p), Value::Map(r)) => Value::Map(merge_maps(p, r)),
        (Value::List(p), Value::List(r)) => Value::List(merge_lists(p, r)),
        _ => response.clone(),
    }
}

/// Zip two lists index-wise, merging paired elements
///
/// The response's length wins: extra response elements are appended,
/// extra planned elements are dropped (the dashboard is authoritative
/// for list membership).
fn merge_lists(plan: &[Value], response: &[Value]) -> Vec<Value> {
    response
        .iter()
        .enumerate()
        .map(|(i, resp_item)| match plan.get(i) {
            Some(plan_item) => merge_value(plan_item, resp_item),
            None => resp_item.clone(),
        })
        .collect()
}

/// Keep only the path/identity attributes from the plan; take everything
/// else from the response
///
/// Used on create flows where the request body and the response shape
/// diverge: the response carries the canonical object, but the path
/// attributes (e.g. `network_id`, `number`) never appear in it.
pub fn merge_only_path(
    plan: &HashMap<String, Value>,
    response: &HashMap<String, Value>,
    path_keys: &[&str],
) -> HashMap<String, Value> {
    let mut merged: HashMap<String, Value> = response
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    for key in path_keys {
        if let Some(value) = plan.get(*key) {
            merged.insert((*key).to_string(), value.clone());
        }
    }

    merged
}
