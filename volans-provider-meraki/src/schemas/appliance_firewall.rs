//! appliance_firewall_l3 schema definitions
//!
//! Endpoint: `/networks/{networkId}/appliance/firewall/l3FirewallRules`
//!
//! One singleton per network holding the ordered rule list. The whole
//! list is replaced on every update; delete degrades to PUTting an
//! empty list.

use std::collections::HashMap;

use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::MerakiSchemaConfig;

fn rule_block() -> AttributeType {
    AttributeType::Object(HashMap::from([
        (
            "comment".to_string(),
            AttributeSchema::new("comment", AttributeType::String).with_api_name("comment"),
        ),
        (
            "policy".to_string(),
            AttributeSchema::new(
                "policy",
                AttributeType::Enum(vec!["allow".to_string(), "deny".to_string()]),
            )
            .required()
            .with_api_name("policy"),
        ),
        (
            "protocol".to_string(),
            AttributeSchema::new(
                "protocol",
                AttributeType::Enum(vec![
                    "tcp".to_string(),
                    "udp".to_string(),
                    "icmp".to_string(),
                    "icmp6".to_string(),
                    "any".to_string(),
                ]),
            )
            .required()
            .with_api_name("protocol"),
        ),
        (
            "src_port".to_string(),
            AttributeSchema::new("src_port", AttributeType::String).with_api_name("srcPort"),
        ),
        (
            "src_cidr".to_string(),
            AttributeSchema::new("src_cidr", AttributeType::String)
                .required()
                .with_description("CIDR, or 'Any'")
                .with_api_name("srcCidr"),
        ),
        (
            "dest_port".to_string(),
            AttributeSchema::new("dest_port", AttributeType::String).with_api_name("destPort"),
        ),
        (
            "dest_cidr".to_string(),
            AttributeSchema::new("dest_cidr", AttributeType::String)
                .required()
                .with_description("CIDR, or 'Any'")
                .with_api_name("destCidr"),
        ),
        (
            "syslog_enabled".to_string(),
            AttributeSchema::new("syslog_enabled", AttributeType::Bool)
                .with_api_name("syslogEnabled"),
        ),
    ]))
}

/// Returns the schema config for the `appliance_firewall_l3` resource
pub fn appliance_firewall_l3_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &["network_id"],
        update_only: true,
        data_source: false,
        schema: ResourceSchema::new("appliance_firewall_l3")
            .with_description("The ordered L3 outbound firewall rules of an appliance network.")
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String).required(),
            )
            .attribute(
                AttributeSchema::new("rules", AttributeType::List(Box::new(rule_block())))
                    .required()
                    .with_description(
                        "Ordered rule list; the dashboard's trailing default rule is not declared",
                    )
                    .with_api_name("rules"),
            )
            .attribute(
                AttributeSchema::new("syslog_default_rule", AttributeType::Bool)
                    .with_description("Log hits on the default rule (requires a syslog server)")
                    .with_api_name("syslogDefaultRule"),
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volans_core::resource::Value;

    fn rule(policy: &str, protocol: &str) -> Value {
        Value::Map(HashMap::from([
            ("policy".to_string(), Value::String(policy.to_string())),
            ("protocol".to_string(), Value::String(protocol.to_string())),
            ("src_cidr".to_string(), Value::String("Any".to_string())),
            (
                "dest_cidr".to_string(),
                Value::String("192.168.1.0/24".to_string()),
            ),
        ]))
    }

    #[test]
    fn valid_rule_list() {
        let config = appliance_firewall_l3_config();
        let attrs = HashMap::from([
            (
                "network_id".to_string(),
                Value::String("N_555".to_string()),
            ),
            (
                "rules".to_string(),
                Value::List(vec![rule("allow", "udp"), rule("deny", "any")]),
            ),
        ]);
        assert!(config.schema.validate(&attrs).is_ok());
    }

    #[test]
    fn bad_policy_rejected() {
        let config = appliance_firewall_l3_config();
        let attrs = HashMap::from([
            (
                "network_id".to_string(),
                Value::String("N_555".to_string()),
            ),
            (
                "rules".to_string(),
                Value::List(vec![rule("drop", "udp")]),
            ),
        ]);
        assert!(config.schema.validate(&attrs).is_err());
    }

    #[test]
    fn rule_missing_cidr_rejected() {
        let config = appliance_firewall_l3_config();
        let incomplete = Value::Map(HashMap::from([
            ("policy".to_string(), Value::String("allow".to_string())),
            ("protocol".to_string(), Value::String("tcp".to_string())),
        ]));
        let attrs = HashMap::from([
            (
                "network_id".to_string(),
                Value::String("N_555".to_string()),
            ),
            ("rules".to_string(), Value::List(vec![incomplete])),
        ]);
        assert!(config.schema.validate(&attrs).is_err());
    }
}
