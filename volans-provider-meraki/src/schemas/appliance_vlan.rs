//! appliance_vlan schema definitions
//!
//! Endpoint: `/networks/{networkId}/appliance/vlans[/{vlanId}]`

use std::collections::HashMap;

use volans_core::resource::Value;
use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::MerakiSchemaConfig;

fn vlan_id() -> AttributeType {
    AttributeType::Custom {
        name: "VlanId".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            // The dashboard carries VLAN ids as strings ("1234")
            let Value::String(s) = value else {
                return Err("Expected string".to_string());
            };
            match s.parse::<u16>() {
                Ok(n) if (1..=4094).contains(&n) => Ok(()),
                _ => Err(format!("VLAN id '{}' must be 1-4094", s)),
            }
        },
    }
}

fn reserved_ip_range_block() -> AttributeType {
    AttributeType::Object(HashMap::from([
        (
            "start".to_string(),
            AttributeSchema::new("start", AttributeType::String)
                .required()
                .with_api_name("start"),
        ),
        (
            "end".to_string(),
            AttributeSchema::new("end", AttributeType::String)
                .required()
                .with_api_name("end"),
        ),
        (
            "comment".to_string(),
            AttributeSchema::new("comment", AttributeType::String)
                .required()
                .with_api_name("comment"),
        ),
    ]))
}

/// Returns the schema config for the `appliance_vlan` resource
pub fn appliance_vlan_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &["network_id"],
        update_only: false,
        data_source: false,
        schema: ResourceSchema::new("appliance_vlan")
            .with_description("A VLAN on a network's security appliance.")
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String).required(),
            )
            .attribute(
                AttributeSchema::new("vlan_id", vlan_id())
                    .required()
                    .with_description("VLAN id, 1-4094; immutable after creation")
                    .with_api_name("id"),
            )
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new("subnet", types::cidr()).with_api_name("subnet"),
            )
            .attribute(
                AttributeSchema::new("appliance_ip", AttributeType::String)
                    .with_api_name("applianceIp"),
            )
            .attribute(
                AttributeSchema::new("group_policy_id", AttributeType::String)
                    .with_api_name("groupPolicyId"),
            )
            .attribute(
                AttributeSchema::new("dhcp_handling", AttributeType::String)
                    .with_description("e.g. 'Run a DHCP server', 'Do not respond to DHCP requests'")
                    .with_api_name("dhcpHandling"),
            )
            .attribute(
                AttributeSchema::new("dhcp_lease_time", AttributeType::String)
                    .with_api_name("dhcpLeaseTime"),
            )
            .attribute(
                AttributeSchema::new("dns_nameservers", AttributeType::String)
                    .with_api_name("dnsNameservers"),
            )
            .attribute(
                AttributeSchema::new(
                    "reserved_ip_ranges",
                    AttributeType::List(Box::new(reserved_ip_range_block())),
                )
                .with_api_name("reservedIpRanges"),
            )
            .attribute(
                AttributeSchema::new("interface_id", AttributeType::String)
                    .computed()
                    .with_api_name("interfaceId"),
            ),
    }
}
