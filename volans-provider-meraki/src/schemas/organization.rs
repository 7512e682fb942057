//! organization schema definitions
//!
//! Endpoints: `/organizations` and `/organizations/{organizationId}`

use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema};

use super::MerakiSchemaConfig;

/// Returns the schema config for the `organization` resource
pub fn organization_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: false,
        schema: ResourceSchema::new("organization")
            .with_description("A dashboard organization, the top-level container for networks and admins.")
            .attribute(
                AttributeSchema::new("id", AttributeType::String)
                    .computed()
                    .with_api_name("id"),
            )
            .attribute(
                AttributeSchema::new("name", AttributeType::String)
                    .required()
                    .with_description("The name of the organization")
                    .with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new("url", AttributeType::String)
                    .computed()
                    .with_description("Dashboard URL (read-only)")
                    .with_api_name("url"),
            )
            // Flattened from the nested `api.enabled` block; mapped in
            // the provider's special-case handlers, so no api_name here.
            .attribute(
                AttributeSchema::new("api_enabled", AttributeType::Bool)
                    .with_description("Whether API access is enabled for the organization"),
            ),
    }
}

/// Returns the schema config for the `organizations` data source
pub fn organizations_data_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: true,
        schema: ResourceSchema::new("organizations")
            .with_description("All organizations the API key can see.")
            .attribute(
                AttributeSchema::new(
                    "organization_id",
                    AttributeType::String,
                )
                .with_description("Restrict the lookup to a single organization"),
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
