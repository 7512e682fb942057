//! Resource type definitions for the Meraki provider
//!
//! Each type wires its name to the schema module that mirrors the
//! endpoint's JSON shape.

use volans_core::provider::ResourceType;
use volans_core::schema::ResourceSchema;

use crate::schemas;

macro_rules! define_resource_type {
    ($name:ident, $type_name:expr) => {
        pub struct $name;
        impl ResourceType for $name {
            fn name(&self) -> &'static str {
                $type_name
            }
            fn schema(&self) -> ResourceSchema {
                schemas::get_schema_config($type_name)
                    .map(|c| c.schema)
                    .unwrap_or_else(|| ResourceSchema::new($type_name))
            }
        }
    };
}

define_resource_type!(OrganizationType, "organization");
define_resource_type!(NetworkType, "network");
define_resource_type!(DeviceType, "device");
define_resource_type!(WirelessSsidType, "wireless_ssid");
define_resource_type!(ApplianceVlanType, "appliance_vlan");
define_resource_type!(ApplianceFirewallL3Type, "appliance_firewall_l3");
define_resource_type!(AdminType, "admin");

// Data sources (read-only)
define_resource_type!(OrganizationsDataType, "organizations");
define_resource_type!(NetworksDataType, "networks");
define_resource_type!(DevicesDataType, "devices");
define_resource_type!(WirelessSsidsDataType, "wireless_ssids");

/// Returns all resource types supported by this provider
pub fn resource_types() -> Vec<Box<dyn ResourceType>> {
    vec![
        Box::new(OrganizationType),
        Box::new(NetworkType),
        Box::new(DeviceType),
        Box::new(WirelessSsidType),
        Box::new(ApplianceVlanType),
        Box::new(ApplianceFirewallL3Type),
        Box::new(AdminType),
        Box::new(OrganizationsDataType),
        Box::new(NetworksDataType),
        Box::new(DevicesDataType),
        Box::new(WirelessSsidsDataType),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_a_schema() {
        for resource_type in resource_types() {
            let schema = resource_type.schema();
            assert_eq!(schema.resource_type, resource_type.name());
            assert!(
                !schema.attributes.is_empty(),
                "{} has an empty schema",
                resource_type.name()
            );
        }
    }
}
