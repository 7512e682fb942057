//! network schema definitions
//!
//! Endpoints: `/organizations/{organizationId}/networks` and
//! `/networks/{networkId}`

use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::MerakiSchemaConfig;

const VALID_PRODUCT_TYPES: &[&str] = &[
    "appliance",
    "camera",
    "cellularGateway",
    "secureConnect",
    "sensor",
    "switch",
    "systemsManager",
    "wireless",
];

fn product_type() -> AttributeType {
    AttributeType::Enum(VALID_PRODUCT_TYPES.iter().map(|s| s.to_string()).collect())
}

/// Returns the schema config for the `network` resource
pub fn network_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: false,
        schema: ResourceSchema::new("network")
            .with_description("A network inside the configured organization.")
            .attribute(
                AttributeSchema::new("id", AttributeType::String)
                    .computed()
                    .with_api_name("id"),
            )
            .attribute(
                AttributeSchema::new("organization_id", AttributeType::String)
                    .computed()
                    .with_api_name("organizationId"),
            )
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_description("The name of the network")
                    .with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new(
                    "product_types",
                    AttributeType::List(Box::new(product_type())),
                )
                .required()
                .with_description("The product types of the network; immutable after creation")
                .with_api_name("productTypes"),
            )
            .attribute(
                AttributeSchema::new("time_zone", types::timezone())
                    .with_description("IANA timezone name, e.g. America/Los_Angeles")
                    .with_api_name("timeZone"),
            )
            .attribute(
                AttributeSchema::new("tags", AttributeType::List(Box::new(AttributeType::String)))
                    .with_api_name("tags"),
            )
            .attribute(
                AttributeSchema::new("notes", AttributeType::String).with_api_name("notes"),
            )
            .attribute(
                AttributeSchema::new("enrollment_string", AttributeType::String)
                    .with_description("Unique enrollment string for systems manager")
                    .with_api_name("enrollmentString"),
            )
            .attribute(
                AttributeSchema::new("url", AttributeType::String)
                    .computed()
                    .with_api_name("url"),
            ),
    }
}

/// Returns the schema config for the `networks` data source
pub fn networks_data_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: true,
        schema: ResourceSchema::new("networks")
            .with_description("Networks of the configured organization, or one network by id.")
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String)
                    .with_description("Restrict the lookup to a single network"),
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
