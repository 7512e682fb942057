//! device schema definitions
//!
//! Endpoints: `/devices/{serial}`, `/networks/{networkId}/devices`
//! (claim/remove), `/organizations/{organizationId}/devices`
//!
//! Devices are claimed into a network on create and removed on delete;
//! the identifier is the serial.

use volans_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

use super::MerakiSchemaConfig;

/// Returns the schema config for the `device` resource
pub fn device_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &["serial", "network_id"],
        update_only: false,
        data_source: false,
        schema: ResourceSchema::new("device")
            .with_description("A device claimed into a network.")
            .attribute(
                AttributeSchema::new("serial", types::serial())
                    .required()
                    .with_description("Device serial, e.g. Q2XX-XXXX-XXXX")
                    .with_api_name("serial"),
            )
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String)
                    .required()
                    .with_description("Network to claim the device into")
                    .with_api_name("networkId"),
            )
            .attribute(
                AttributeSchema::new("name", AttributeType::String).with_api_name("name"),
            )
            .attribute(
                AttributeSchema::new("tags", AttributeType::List(Box::new(AttributeType::String)))
                    .with_api_name("tags"),
            )
            .attribute(
                AttributeSchema::new("address", AttributeType::String).with_api_name("address"),
            )
            .attribute(
                AttributeSchema::new("lat", AttributeType::String)
                    .with_description("Latitude; fractional, carried as its decimal string")
                    .with_api_name("lat"),
            )
            .attribute(
                AttributeSchema::new("lng", AttributeType::String)
                    .with_description("Longitude; fractional, carried as its decimal string")
                    .with_api_name("lng"),
            )
            .attribute(
                AttributeSchema::new("notes", AttributeType::String).with_api_name("notes"),
            )
            .attribute(
                AttributeSchema::new("mac", types::mac())
                    .computed()
                    .with_api_name("mac"),
            )
            .attribute(
                AttributeSchema::new("model", AttributeType::String)
                    .computed()
                    .with_api_name("model"),
            )
            .attribute(
                AttributeSchema::new("firmware", AttributeType::String)
                    .computed()
                    .with_api_name("firmware"),
            )
            .attribute(
                AttributeSchema::new("lan_ip", AttributeType::String)
                    .computed()
                    .with_api_name("lanIp"),
            )
            .attribute(
                AttributeSchema::new("product_type", AttributeType::String)
                    .computed()
                    .with_api_name("productType"),
            ),
    }
}

/// Returns the schema config for the `devices` data source
pub fn devices_data_config() -> MerakiSchemaConfig {
    MerakiSchemaConfig {
        path_attrs: &[],
        update_only: false,
        data_source: true,
        schema: ResourceSchema::new("devices")
            .with_description(
                "Devices by serial, by network, or across the configured organization.",
            )
            .attribute(
                AttributeSchema::new("serial", types::serial())
                    .with_description("Look up a single device by serial"),
            )
            .attribute(
                AttributeSchema::new("network_id", AttributeType::String)
                    .with_description("List devices of one network"),
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
