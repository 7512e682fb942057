//! Convert - Between attribute maps, JSON, and typed API structs
//!
//! The provider's mapping layer runs on these helpers: an API response
//! struct serializes into an attribute map, and a planned attribute map
//! deserializes into an API request struct. Floats survive the trip as
//! their JSON representation; the attribute model itself only carries
//! integers, so fractional numbers round-trip through `serde_json`.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::resource::Value;

/// Conversion error
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Serialization failed: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Deserialization failed: {0}")]
    Deserialize(#[source] serde_json::Error),

    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// Convert an attribute Value to a JSON value
pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Int(n) => serde_json::Value::Number((*n).into()),
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Null => serde_json::Value::Null,
        Value::List(items) => {
            serde_json::Value::Array(items.iter().map(value_to_json).collect())
        }
        Value::Map(map) => serde_json::Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), value_to_json(v)))
                .collect(),
        ),
        // Refs must be resolved before conversion; an unresolved one
        // serializes as its textual form so the error surfaces remotely
        // rather than silently dropping the attribute.
        Value::Ref(binding, attr) => serde_json::Value::String(format!("${{{binding}.{attr}}}")),
    }
}

/// Convert a JSON value to an attribute Value
pub fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Int(i)
            } else {
                // Fractional numbers (e.g. lat/lng) keep their textual form
                Value::String(n.to_string())
            }
        }
        serde_json::Value::Array(arr) => Value::List(arr.iter().map(json_to_value).collect()),
        serde_json::Value::Object(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
        ),
        serde_json::Value::Null => Value::Null,
    }
}

/// Serialize an API struct into an attribute map
///
/// Nulls in the struct become `Value::Null`, preserving the distinction
/// between "explicitly unset" and "absent" for the merge helpers.
pub fn to_attribute_map<T: Serialize>(value: &T) -> Result<HashMap<String, Value>, ConvertError> {
    let json = serde_json::to_value(value).map_err(ConvertError::Serialize)?;

    let serde_json::Value::Object(map) = json else {
        return Err(ConvertError::NotAnObject(json_kind(&json)));
    };

    Ok(map
        .into_iter()
        .map(|(k, v)| (k, json_to_value(&v)))
        .collect())
}

/// Build an API request struct from an attribute map
///
/// `Null` entries are skipped so unset optionals stay off the wire.
pub fn from_attribute_map<T: DeserializeOwned>(
    attributes: &HashMap<String, Value>,
) -> Result<T, ConvertError> {
    let object: serde_json::Map<String, serde_json::Value> = attributes
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), value_to_json(v)))
        .collect();

    serde_json::from_value(serde_json::Value::Object(object)).map_err(ConvertError::Deserialize)
}

fn json_kind(json: &serde_json::Value) -> &'static str {
    match json {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NetworkBody {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        time_zone: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tags: Option<Vec<String>>,
        #[serde(skip_serializing_if = "Option::is_none")]
        notes: Option<String>,
    }

    #[test]
    fn json_round_trip() {
        let value = Value::Map(HashMap::from([
            ("name".to_string(), Value::String("branch".to_string())),
            ("vlan_id".to_string(), Value::Int(100)),
            ("enabled".to_string(), Value::Bool(true)),
            ("notes".to_string(), Value::Null),
            (
                "tags".to_string(),
                Value::List(vec![Value::String("lab".to_string())]),
            ),
        ]));

        let round_tripped = json_to_value(&value_to_json(&value));
        assert_eq!(round_tripped, value);
    }

    #[test]
    fn fractional_numbers_become_strings() {
        let json = serde_json::json!({"lat": 37.4180951010362});
        let Value::Map(map) = json_to_value(&json) else {
            panic!("Expected map");
        };
        assert_eq!(
            map.get("lat"),
            Some(&Value::String("37.4180951010362".to_string()))
        );
    }

    #[test]
    fn struct_to_attribute_map() {
        let body = NetworkBody {
            name: "branch".to_string(),
            time_zone: Some("America/Los_Angeles".to_string()),
            tags: None,
            notes: None,
        };

        let map = to_attribute_map(&body).unwrap();
        assert_eq!(map.get("name"), Some(&Value::String("branch".to_string())));
        assert_eq!(
            map.get("timeZone"),
            Some(&Value::String("America/Los_Angeles".to_string()))
        );
        // skip_serializing_if drops unset optionals entirely
        assert!(!map.contains_key("tags"));
    }

    #[test]
    fn attribute_map_to_struct() {
        let attrs = HashMap::from([
            ("name".to_string(), Value::String("branch".to_string())),
            (
                "timeZone".to_string(),
                Value::String("Europe/Amsterdam".to_string()),
            ),
            ("notes".to_string(), Value::Null),
        ]);

        let body: NetworkBody = from_attribute_map(&attrs).unwrap();
        assert_eq!(body.name, "branch");
        assert_eq!(body.time_zone.as_deref(), Some("Europe/Amsterdam"));
        // Null entries stay off the wire
        assert_eq!(body.notes, None);
    }

    #[test]
    fn non_object_struct_is_rejected() {
        let result = to_attribute_map(&42);
        assert!(matches!(result, Err(ConvertError::NotAnObject("number"))));
    }
}
