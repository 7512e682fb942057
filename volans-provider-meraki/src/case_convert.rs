//! Case conversion utilities for declaration attribute names to
//! dashboard field names
//!
//! Declarations use snake_case (e.g., `time_zone`, `appliance_ip`);
//! the dashboard uses camelCase (e.g., `timeZone`, `applianceIp`).
//! Schema `api_name` entries take precedence; these conversions are the
//! mechanical fallback for unmapped keys.

use std::collections::HashMap;

use volans_core::resource::Value;

/// Convert snake_case to camelCase
/// e.g., "time_zone" -> "timeZone"
pub fn to_camel_case(s: &str) -> String {
    let mut parts = s.split('_');
    let mut result = parts.next().unwrap_or_default().to_string();
    for part in parts {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            result.extend(first.to_uppercase());
            result.extend(chars);
        }
    }
    result
}

/// Convert camelCase to snake_case
/// e.g., "timeZone" -> "time_zone"
pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.extend(c.to_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

/// Convert attribute keys from snake_case to camelCase (for sending to
/// the dashboard). String values are left untouched; dashboard enums
/// are case-sensitive literals.
pub fn attributes_to_camel_case(attributes: &HashMap<String, Value>) -> HashMap<String, Value> {
    attributes
        .iter()
        .map(|(k, v)| (to_camel_case(k), value_keys_to_camel_case(v)))
        .collect()
}

/// Convert attribute keys from camelCase to snake_case (for reading
/// from the dashboard)
pub fn attributes_to_snake_case(attributes: &HashMap<String, Value>) -> HashMap<String, Value> {
    attributes
        .iter()
        .map(|(k, v)| (to_snake_case(k), value_keys_to_snake_case(v)))
        .collect()
}

fn value_keys_to_camel_case(value: &Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_camel_case(k), value_keys_to_camel_case(v)))
                .collect(),
        ),
        Value::List(items) => Value::List(items.iter().map(value_keys_to_camel_case).collect()),
        other => other.clone(),
    }
}

fn value_keys_to_snake_case(value: &Value) -> Value {
    match value {
        Value::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_snake_case(k), value_keys_to_snake_case(v)))
                .collect(),
        ),
        Value::List(items) => Value::List(items.iter().map(value_keys_to_snake_case).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_camel_case() {
        assert_eq!(to_camel_case("time_zone"), "timeZone");
        assert_eq!(to_camel_case("appliance_ip"), "applianceIp");
        assert_eq!(to_camel_case("name"), "name");
        assert_eq!(to_camel_case("per_client_bandwidth_limit_up"), "perClientBandwidthLimitUp");
    }

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("timeZone"), "time_zone");
        assert_eq!(to_snake_case("applianceIp"), "appliance_ip");
        assert_eq!(to_snake_case("name"), "name");
        assert_eq!(to_snake_case("perClientBandwidthLimitUp"), "per_client_bandwidth_limit_up");
    }

    #[test]
    fn test_nested_key_conversion() {
        let attrs = HashMap::from([(
            "radius_servers".to_string(),
            Value::List(vec![Value::Map(HashMap::from([
                ("host".to_string(), Value::String("radius.corp".to_string())),
                ("port".to_string(), Value::Int(1812)),
            ]))]),
        )]);

        let converted = attributes_to_camel_case(&attrs);
        let Some(Value::List(servers)) = converted.get("radiusServers") else {
            panic!("Expected radiusServers list");
        };
        let Value::Map(server) = &servers[0] else {
            panic!("Expected map");
        };
        assert!(server.contains_key("host"));
        assert!(server.contains_key("port"));
    }

    #[test]
    fn test_string_values_untouched() {
        // "NAT mode" and similar dashboard enums must survive verbatim
        let attrs = HashMap::from([(
            "ip_assignment_mode".to_string(),
            Value::String("NAT mode".to_string()),
        )]);

        let converted = attributes_to_camel_case(&attrs);
        assert_eq!(
            converted.get("ipAssignmentMode"),
            Some(&Value::String("NAT mode".to_string()))
        );
    }

    #[test]
    fn test_round_trip() {
        let attrs = HashMap::from([
            ("time_zone".to_string(), Value::String("UTC".to_string())),
            ("default_vlan_id".to_string(), Value::Int(1)),
        ]);

        let back = attributes_to_snake_case(&attributes_to_camel_case(&attrs));
        assert_eq!(back, attrs);
    }
}
