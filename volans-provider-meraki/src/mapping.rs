//! Attribute mapping between declaration names and wire names
//!
//! Schema `api_name`s drive the translation in both directions; the
//! mechanical snake/camel conversion covers keys the schema doesn't
//! name. `Map`-typed attributes are exempt: their keys are user data
//! (tag names, assignment keys), not field names.

use std::collections::HashMap;

use volans_core::resource::Value;
use volans_core::schema::{AttributeType, ResourceSchema};

use crate::case_convert::{to_camel_case, to_snake_case};

/// Convert a declaration attribute map into wire-named fields
///
/// Internal (`_`-prefixed) and computed attributes stay off the wire.
pub fn api_from_attrs(
    schema: &ResourceSchema,
    attrs: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    let mut api = HashMap::new();

    for (name, value) in attrs {
        if name.starts_with('_') {
            continue;
        }

        let attr_schema = schema.attributes.get(name);
        if attr_schema.is_some_and(|a| a.computed) {
            continue;
        }

        let api_name = attr_schema
            .and_then(|a| a.api_name.clone())
            .unwrap_or_else(|| to_camel_case(name));

        api.insert(
            api_name,
            value_to_api(attr_schema.map(|a| &a.attr_type), value),
        );
    }

    api
}

/// Convert wire-named fields into a declaration attribute map
pub fn attrs_from_api(
    schema: &ResourceSchema,
    api: &HashMap<String, Value>,
) -> HashMap<String, Value> {
    // Reverse lookup: wire name -> (attribute name, type)
    let by_api_name: HashMap<&str, (&String, &AttributeType)> = schema
        .attributes
        .values()
        .filter_map(|a| {
            a.api_name
                .as_deref()
                .map(|api_name| (api_name, (&a.name, &a.attr_type)))
        })
        .collect();

    let mut attrs = HashMap::new();

    for (api_name, value) in api {
        match by_api_name.get(api_name.as_str()) {
            Some((name, attr_type)) => {
                attrs.insert((*name).clone(), value_from_api(Some(attr_type), value));
            }
            None => {
                attrs.insert(to_snake_case(api_name), value_from_api(None, value));
            }
        }
    }

    attrs
}

fn value_to_api(attr_type: Option<&AttributeType>, value: &Value) -> Value {
    match (attr_type, value) {
        (Some(AttributeType::Object(fields)), Value::Map(map)) => {
            let converted = map
                .iter()
                .map(|(k, v)| {
                    let field = fields.get(k);
                    let api_name = field
                        .and_then(|f| f.api_name.clone())
                        .unwrap_or_else(|| to_camel_case(k));
                    (api_name, value_to_api(field.map(|f| &f.attr_type), v))
                })
                .collect();
            Value::Map(converted)
        }
        (Some(AttributeType::List(inner)), Value::List(items)) => Value::List(
            items
                .iter()
                .map(|item| value_to_api(Some(inner), item))
                .collect(),
        ),
        // Map keys are user data, leave them alone
        (Some(AttributeType::Map(_)), Value::Map(_)) => value.clone(),
        (_, Value::Map(map)) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_camel_case(k), value_to_api(None, v)))
                .collect(),
        ),
        (_, Value::List(items)) => {
            Value::List(items.iter().map(|item| value_to_api(None, item)).collect())
        }
        _ => value.clone(),
    }
}

fn value_from_api(attr_type: Option<&AttributeType>, value: &Value) -> Value {
    match (attr_type, value) {
        (Some(AttributeType::Object(fields)), Value::Map(map)) => {
            // Reverse field lookup within the block
            let by_api_name: HashMap<&str, (&String, &AttributeType)> = fields
                .values()
                .filter_map(|f| {
                    f.api_name
                        .as_deref()
                        .map(|api_name| (api_name, (&f.name, &f.attr_type)))
                })
                .collect();

            let converted = map
                .iter()
                .map(|(k, v)| match by_api_name.get(k.as_str()) {
                    Some((name, field_type)) => {
                        ((*name).clone(), value_from_api(Some(field_type), v))
                    }
                    None => (to_snake_case(k), value_from_api(None, v)),
                })
                .collect();
            Value::Map(converted)
        }
        (Some(AttributeType::List(inner)), Value::List(items)) => Value::List(
            items
                .iter()
                .map(|item| value_from_api(Some(inner), item))
                .collect(),
        ),
        (Some(AttributeType::Map(_)), Value::Map(_)) => value.clone(),
        (_, Value::Map(map)) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_snake_case(k), value_from_api(None, v)))
                .collect(),
        ),
        (_, Value::List(items)) => Value::List(
            items
                .iter()
                .map(|item| value_from_api(None, item))
                .collect(),
        ),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas;

    #[test]
    fn network_attrs_to_api() {
        let config = schemas::get_schema_config("network").unwrap();
        let attrs = HashMap::from([
            ("name".to_string(), Value::String("Branch".to_string())),
            (
                "time_zone".to_string(),
                Value::String("Europe/Amsterdam".to_string()),
            ),
            ("_binding".to_string(), Value::String("branch".to_string())),
        ]);

        let api = api_from_attrs(&config.schema, &attrs);
        assert_eq!(api.get("name"), Some(&Value::String("Branch".to_string())));
        assert_eq!(
            api.get("timeZone"),
            Some(&Value::String("Europe/Amsterdam".to_string()))
        );
        // Internal attributes stay off the wire
        assert!(!api.contains_key("_binding"));
    }

    #[test]
    fn computed_attrs_stay_off_the_wire() {
        let config = schemas::get_schema_config("network").unwrap();
        let attrs = HashMap::from([
            ("name".to_string(), Value::String("Branch".to_string())),
            ("id".to_string(), Value::String("N_555".to_string())),
            (
                "url".to_string(),
                Value::String("https://n1.meraki.com/...".to_string()),
            ),
        ]);

        let api = api_from_attrs(&config.schema, &attrs);
        assert!(!api.contains_key("id"));
        assert!(!api.contains_key("url"));
    }

    #[test]
    fn api_to_attrs_uses_schema_names() {
        let config = schemas::get_schema_config("network").unwrap();
        let api = HashMap::from([
            ("id".to_string(), Value::String("N_555".to_string())),
            (
                "timeZone".to_string(),
                Value::String("Europe/Amsterdam".to_string()),
            ),
            // Not in the schema: falls back to mechanical conversion
            (
                "configTemplateId".to_string(),
                Value::String("T_1".to_string()),
            ),
        ]);

        let attrs = attrs_from_api(&config.schema, &api);
        assert_eq!(attrs.get("id"), Some(&Value::String("N_555".to_string())));
        assert_eq!(
            attrs.get("time_zone"),
            Some(&Value::String("Europe/Amsterdam".to_string()))
        );
        assert_eq!(
            attrs.get("config_template_id"),
            Some(&Value::String("T_1".to_string()))
        );
    }

    #[test]
    fn nested_block_field_names_follow_schema() {
        // admin "networks" blocks map network_id <-> id
        let config = schemas::get_schema_config("admin").unwrap();
        let attrs = HashMap::from([(
            "networks".to_string(),
            Value::List(vec![Value::Map(HashMap::from([
                (
                    "network_id".to_string(),
                    Value::String("N_555".to_string()),
                ),
                ("access".to_string(), Value::String("full".to_string())),
            ]))]),
        )]);

        let api = api_from_attrs(&config.schema, &attrs);
        let Some(Value::List(networks)) = api.get("networks") else {
            panic!("Expected networks list");
        };
        let Value::Map(block) = &networks[0] else {
            panic!("Expected map");
        };
        assert_eq!(block.get("id"), Some(&Value::String("N_555".to_string())));
        assert!(!block.contains_key("networkId"));

        // And back again
        let round = attrs_from_api(&config.schema, &api);
        let Some(Value::List(networks)) = round.get("networks") else {
            panic!("Expected networks list");
        };
        let Value::Map(block) = &networks[0] else {
            panic!("Expected map");
        };
        assert_eq!(
            block.get("network_id"),
            Some(&Value::String("N_555".to_string()))
        );
    }
}
