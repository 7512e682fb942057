//! Resource schemas for the Meraki dashboard
//!
//! One module per endpoint family, each mirroring the JSON shape of the
//! dashboard's request/response bodies. Attribute `api_name`s carry the
//! camelCase wire names; `computed` marks server-assigned fields that
//! are never sent on create/update.

use volans_core::schema::ResourceSchema;

pub mod admin;
pub mod appliance_firewall;
pub mod appliance_vlan;
pub mod device;
pub mod network;
pub mod organization;
pub mod wireless_ssid;

/// Dashboard schema configuration
///
/// Combines the attribute schema with the endpoint metadata the
/// provider needs for mapping and merging.
pub struct MerakiSchemaConfig {
    /// Path/identity attributes preserved from the plan when merging a
    /// response (they never appear in response bodies)
    pub path_attrs: &'static [&'static str],
    /// Slot/singleton resources that only support PUT: create and
    /// delete degrade to updates
    pub update_only: bool,
    /// Read-only data source
    pub data_source: bool,
    /// The resource schema with attribute definitions
    pub schema: ResourceSchema,
}

/// Returns all schema configs, resources and data sources alike
pub fn configs() -> Vec<MerakiSchemaConfig> {
    vec![
        organization::organization_config(),
        organization::organizations_data_config(),
        network::network_config(),
        network::networks_data_config(),
        device::device_config(),
        device::devices_data_config(),
        wireless_ssid::wireless_ssid_config(),
        wireless_ssid::wireless_ssids_data_config(),
        appliance_vlan::appliance_vlan_config(),
        appliance_firewall::appliance_firewall_l3_config(),
        admin::admin_config(),
    ]
}

/// Get the schema config for a resource type
pub fn get_schema_config(resource_type: &str) -> Option<MerakiSchemaConfig> {
    configs()
        .into_iter()
        .find(|c| c.schema.resource_type == resource_type)
}
