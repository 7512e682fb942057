//! admin schema definitions
//!
//! Endpoint: `/organizations/{organizationId}/admins[/{adminId}]`

use std::collections::HashMap;

use volans_core::resource::Value;
use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::MerakiSchemaConfig;

const VALID_ORG_ACCESS: &[&str] = &["full", "read-only", "enterprise", "none"];
const VALID_SCOPED_ACCESS: &[&str] = &["full", "read-only", "guest-ambassador", "monitor-only"];

fn email() -> AttributeType {
    AttributeType::Custom {
        name: "Email".to_string(),
        base: Box::new(AttributeType::String),
        validate: |value| {
            if let Value::String(s) = value {
                let mut halves = s.split('@');
                match (halves.next(), halves.next(), halves.next()) {
                    (Some(local), Some(domain), None)
                        if !local.is_empty() && domain.contains('.') =>
                    {
                        Ok(())
                    }
                    _ => Err(format!("Invalid email address '{}'", s)),
                }
            } else {
                Err("Expected string".to_string())
            }
        },
    }
}

fn scoped_access_block(scope_key: &str) -> AttributeType {
    AttributeType::Object(HashMap::from([
        (
            scope_key.to_string(),
            AttributeSchema::new(scope_key, AttributeType::String)
                .required()
                .with_api_name(if scope_key == "network_id" { "id" } else { scope_key }),
        ),
        (
            "access".to_string(),
            AttributeSchema::new(
                "access",
                AttributeType::Enum(VALID_SCOPED_ACCESS.iter().map(|s| s.to_string()).collect()),
            )
            .required()
            .with_api_name("access"),
        ),
    ]))
}

/// Returns the schema config for the `admin` resource
pub fn admin_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: false,
        schema: ResourceSchema::new("admin")
            .with_description("A dashboard administrator of the configured organization.")
            .attribute(
                AttributeSchema::new("id", AttributeType::String)
                    .computed()
                    .with_api_name("id"),
            )
            .attribute(
                AttributeSchema::new("email", email())
                    .required()
                    .with_description("Email of the admin; immutable after creation")
                    .with_api_name("email"),
            )
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new(
                    "org_access",
                    AttributeType::Enum(VALID_ORG_ACCESS.iter().map(|s| s.to_string()).collect()),
                )
                .required()
                .with_api_name("orgAccess"),
            )
            .attribute(
                AttributeSchema::new(
                    "networks",
                    AttributeType::List(Box::new(scoped_access_block("network_id"))),
                )
                .with_description("Per-network access grants")
                .with_api_name("networks"),
            )
            .attribute(
                AttributeSchema::new(
                    "tags",
                    AttributeType::List(Box::new(scoped_access_block("tag"))),
                )
                .with_description("Per-tag access grants")
                .with_api_name("tags"),
            )
            .attribute(
                AttributeSchema::new("authentication_method", AttributeType::String)
                    .with_description("'Email' or 'Cisco SecureX Sign-On'")
                    .with_api_name("authenticationMethod"),
            )
            .attribute(
                AttributeSchema::new("account_status", AttributeType::String)
                    .computed()
                    .with_api_name("accountStatus"),
            )
            .attribute(
                AttributeSchema::new("two_factor_auth_enabled", AttributeType::Bool)
                    .computed()
                    .with_api_name("twoFactorAuthEnabled"),
            )
            .attribute(
                AttributeSchema::new("has_api_key", AttributeType::Bool)
                    .computed()
                    .with_api_name("hasApiKey"),
            )
            .attribute(
                AttributeSchema::new("last_active", AttributeType::String)
                    .computed()
                    .with_api_name("lastActive"),
            ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        let t = email();
        assert!(
            t.validate(&Value::String("miles@meraki.com".to_string()))
                .is_ok()
        );
        assert!(t.validate(&Value::String("miles".to_string())).is_err());
        assert!(
            t.validate(&Value::String("miles@localhost".to_string()))
                .is_err()
        );
        assert!(t.validate(&Value::String("@meraki.com".to_string())).is_err());
    }

    #[test]
    fn org_access_is_validated() {
        let config = admin_config();
        let attrs = HashMap::from([
            (
                "email".to_string(),
                Value::String("miles@meraki.com".to_string()),
            ),
            ("name".to_string(), Value::String("Miles".to_string())),
            (
                "org_access".to_string(),
                Value::String("superadmin".to_string()),
            ),
        ]);
        assert!(config.schema.validate(&attrs).is_err());
    }
}
