//! wireless_ssid schema definitions
//!
//! Endpoint: `/networks/{networkId}/wireless/ssids/{number}`
//!
//! SSIDs are fixed slots 0-14: never created or deleted, only
//! reconfigured. Create degrades to a PUT; delete resets the slot to
//! disabled.

use std::collections::HashMap;

use volans_core::resource::Value;
use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::MerakiSchemaConfig;

const VALID_AUTH_MODES: &[&str] = &[
    "open",
    "open-enhanced",
    "psk",
    "open-with-radius",
    "open-with-nac",
    "8021x-meraki",
    "8021x-nac",
    "8021x-radius",
    "8021x-google",
    "8021x-entra",
    "8021x-localradius",
    "ipsk-with-radius",
    "ipsk-without-radius",
    "ipsk-with-nac",
];

const VALID_BAND_SELECTIONS: &[&str] = &[
    "Dual band operation",
    "5 GHz band only",
    "Dual band operation with Band Steering",
];

fn ssid_number() -> AttributeType {
    AttributeType::Custom {
        name: "SsidNumber".to_string(),
        base: Box::new(AttributeType::Int),
        validate: |value| {
            if let Value::Int(n) = value {
                if (0..=14).contains(n) {
                    Ok(())
                } else {
                    Err(format!("SSID number must be 0-14, got {}", n))
                }
            } else {
                Err("Expected integer".to_string())
            }
        },
    }
}

fn radius_server_block() -> AttributeType {
    AttributeType::Object(HashMap::from([
        (
            "host".to_string(),
            AttributeSchema::new("host", AttributeType::String)
                .required()
                .with_api_name("host"),
        ),
        (
            "port".to_string(),
            AttributeSchema::new("port", AttributeType::Int).with_api_name("port"),
        ),
        (
            "secret".to_string(),
            AttributeSchema::new("secret", AttributeType::String)
                .with_description("Shared secret; accepted on writes, never echoed back")
                .with_api_name("secret"),
        ),
    ]))
}

/// Returns the schema config for the `wireless_ssid` resource
pub fn wireless_ssid_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        // The slot address never appears in response bodies
        path_attrs: &["network_id", "number"],
        update_only: true,
        data_source: false,
        schema: ResourceSchema::new("wireless_ssid")
            .with_description("One of the 15 SSID slots of a wireless network.")
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String).required(),
            )
            .attribute(AttributeSchema::new("number", ssid_number()).required())
            .attribute(
                AttributeSchema::new("name", AttributeType::String).with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new("enabled", AttributeType::Bool).with_api_name("enabled"),
            )
            .attribute(
                AttributeSchema::new(
                    "auth_mode",
                    AttributeType::Enum(VALID_AUTH_MODES.iter().map(|s| s.to_string()).collect()),
                )
                .with_api_name("authMode"),
            )
            .attribute(
                AttributeSchema::new("psk", AttributeType::String)
                    .with_description("Pre-shared key; accepted on writes, never echoed back")
                    .with_api_name("psk"),
            )
            .attribute(
                AttributeSchema::new("encryption_mode", AttributeType::String)
                    .with_api_name("encryptionMode"),
            )
            .attribute(
                AttributeSchema::new("wpa_encryption_mode", AttributeType::String)
                    .with_api_name("wpaEncryptionMode"),
            )
            .attribute(
                AttributeSchema::new("splash_page", AttributeType::String)
                    .with_api_name("splashPage"),
            )
            .attribute(
                AttributeSchema::new(
                    "radius_servers",
                    AttributeType::List(Box::new(radius_server_block())),
                )
                .with_api_name("radiusServers"),
            )
            .attribute(
                AttributeSchema::new("ip_assignment_mode", AttributeType::String)
                    .with_description("e.g. 'NAT mode', 'Bridge mode', 'Layer 3 roaming'")
                    .with_api_name("ipAssignmentMode"),
            )
            .attribute(
                AttributeSchema::new("use_vlan_tagging", AttributeType::Bool)
                    .with_api_name("useVlanTagging"),
            )
            .attribute(
                AttributeSchema::new("default_vlan_id", AttributeType::Int)
                    .with_api_name("defaultVlanId"),
            )
            .attribute(
                AttributeSchema::new(
                    "band_selection",
                    AttributeType::Enum(
                        VALID_BAND_SELECTIONS.iter().map(|s| s.to_string()).collect(),
                    ),
                )
                .with_api_name("bandSelection"),
            )
            .attribute(
                AttributeSchema::new("per_client_bandwidth_limit_up", AttributeType::Int)
                    .with_description("Kbps; 0 means unlimited")
                    .with_api_name("perClientBandwidthLimitUp"),
            )
            .attribute(
                AttributeSchema::new("per_client_bandwidth_limit_down", AttributeType::Int)
                    .with_description("Kbps; 0 means unlimited")
                    .with_api_name("perClientBandwidthLimitDown"),
            )
            .attribute(
                AttributeSchema::new("visible", AttributeType::Bool).with_api_name("visible"),
            )
            .attribute(
                AttributeSchema::new("available_on_all_aps", AttributeType::Bool)
                    .with_api_name("availableOnAllAps"),
            )
            .attribute(
                AttributeSchema::new(
                    "availability_tags",
                    AttributeType::List(Box::new(AttributeType::String)),
                )
                .with_api_name("availabilityTags"),
            ),
    }
}

/// Returns the schema config for the `wireless_ssids` data source
pub fn wireless_ssids_data_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: true,
        schema: ResourceSchema::new("wireless_ssids")
            .with_description("All SSID slots of a network, or one slot by number.")
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String).required(),
            )
            .attribute(
                AttributeSchema::new("number", ssid_number())
                    .with_description("Restrict the lookup to a single slot"),
            )
            .attribute(
                AttributeSchema::new(
                    "items",
                    AttributeType::List(Box::new(AttributeType::Map(Box::new(
                        AttributeType::String,
                    )))),
                )
                .computed(),
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ssid_number_bounds() {
        let t = ssid_number();
        assert!(t.validate(&Value::Int(0)).is_ok());
        assert!(t.validate(&Value::Int(14)).is_ok());
        assert!(t.validate(&Value::Int(15)).is_err());
        assert!(t.validate(&Value::Int(-1)).is_err());
    }

    #[test]
    fn auth_mode_is_validated() {
        let config = wireless_ssid_config();
        let attrs = HashMap::from([
            (
                "network_id".to_string(),
                Value::String("N_555".to_string()),
            ),
            ("number".to_string(), Value::Int(2)),
            (
                "auth_mode".to_string(),
                Value::String("wep".to_string()),
            ),
        ]);
        assert!(config.schema.validate(&attrs).is_err());
    }
}
