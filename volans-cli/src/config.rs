//! Declaration file loading
//!
//! Desired state lives in a JSON document (volans.json by default):
//! provider settings, backend settings, and the `resources` and `data`
//! arrays. String values of the form `${name.attribute}` are references
//! to another declaration's attribute, resolved at apply time from live
//! state.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use volans_core::convert::json_to_value;
use volans_core::resource::{Resource, Value};

/// Parsed declaration file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeclarationFile {
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub backend: Option<BackendSettings>,
    #[serde(default)]
    pub resources: Vec<Declaration>,
    #[serde(default)]
    pub data: Vec<Declaration>,
}

/// Provider block of the declaration file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSettings {
    /// API key; falls back to MERAKI_DASHBOARD_API_KEY when absent
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub organization_id: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Backend block of the declaration file
#[derive(Debug, Deserialize)]
pub struct BackendSettings {
    #[serde(rename = "type")]
    pub backend_type: String,
    #[serde(flatten)]
    pub attributes: HashMap<String, serde_json::Value>,
}

/// One resource or data source declaration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    #[serde(default)]
    pub attributes: serde_json::Map<String, serde_json::Value>,
    /// Protected resources are skipped by destroy
    #[serde(default)]
    pub protected: bool,
}

/// Load and parse a declaration file
pub fn load_declarations(path: &Path) -> Result<DeclarationFile, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    serde_json::from_str(&content).map_err(|e| format!("Parse error in {}: {}", path.display(), e))
}

/// Convert declarations into core resources, parsing references
pub fn to_resources(file: &DeclarationFile) -> Vec<Resource> {
    let mut resources: Vec<Resource> = file
        .resources
        .iter()
        .map(|d| declaration_to_resource(d, false))
        .collect();

    resources.extend(file.data.iter().map(|d| declaration_to_resource(d, true)));
    resources
}

fn declaration_to_resource(declaration: &Declaration, read_only: bool) -> Resource {
    let mut resource = Resource::new(
        declaration.resource_type.clone(),
        declaration.name.clone(),
    )
    .with_read_only(read_only);

    for (key, json) in &declaration.attributes {
        resource
            .attributes
            .insert(key.clone(), parse_refs(json_to_value(json)));
    }

    resource
}

/// Recursively turn `${name.attribute}` strings into Ref values
fn parse_refs(value: Value) -> Value {
    match value {
        Value::String(s) => match parse_ref(&s) {
            Some((binding, attribute)) => Value::Ref(binding, attribute),
            None => Value::String(s),
        },
        Value::List(items) => Value::List(items.into_iter().map(parse_refs).collect()),
        Value::Map(map) => Value::Map(
            map.into_iter()
                .map(|(k, v)| (k, parse_refs(v)))
                .collect(),
        ),
        other => other,
    }
}

/// Parse `${name.attribute}`; the attribute part may itself be dotted
/// only in the name position (names can't contain dots)
fn parse_ref(s: &str) -> Option<(String, String)> {
    let inner = s.strip_prefix("${")?.strip_suffix('}')?;
    let (binding, attribute) = inner.split_once('.')?;
    if binding.is_empty() || attribute.is_empty() || attribute.contains('.') {
        return None;
    }
    Some((binding.to_string(), attribute.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_declaration_file() {
        let json = r#"{
            "provider": {"organization_id": "2930418"},
            "backend": {"type": "local", "path": "test.state.json"},
            "resources": [
                {
                    "type": "network",
                    "name": "branch",
                    "attributes": {
                        "name": "Branch Office",
                        "product_types": ["wireless"],
                        "time_zone": "Europe/Amsterdam"
                    }
                },
                {
                    "type": "wireless_ssid",
                    "name": "guest",
                    "attributes": {
                        "network_id": "${branch.id}",
                        "number": 2,
                        "enabled": true
                    }
                }
            ],
            "data": [
                {"type": "devices", "name": "all", "attributes": {"network_id": "${branch.id}"}}
            ]
        }"#;

        let file: DeclarationFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.provider.organization_id.as_deref(), Some("2930418"));
        assert_eq!(file.backend.as_ref().unwrap().backend_type, "local");

        let resources = to_resources(&file);
        assert_eq!(resources.len(), 3);

        let ssid = &resources[1];
        assert_eq!(
            ssid.attributes.get("network_id"),
            Some(&Value::Ref("branch".to_string(), "id".to_string()))
        );
        assert_eq!(ssid.attributes.get("number"), Some(&Value::Int(2)));

        let data = &resources[2];
        assert!(data.is_data_source());
    }

    #[test]
    fn ref_syntax() {
        assert_eq!(
            parse_ref("${branch.id}"),
            Some(("branch".to_string(), "id".to_string()))
        );
        assert_eq!(parse_ref("${branch}"), None);
        assert_eq!(parse_ref("$branch.id"), None);
        assert_eq!(parse_ref("${.id}"), None);
        assert_eq!(parse_ref("plain string"), None);
    }

    #[test]
    fn unknown_top_level_keys_rejected() {
        let json = r#"{"resourcez": []}"#;
        assert!(serde_json::from_str::<DeclarationFile>(json).is_err());
    }
}
