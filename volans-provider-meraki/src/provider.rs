//! Meraki Dashboard Provider implementation
//!
//! This module contains the main provider implementation that
//! communicates with the Meraki Dashboard API to manage resources.
//! Each resource type maps onto one endpoint family; the shape is
//! always the same: build a request from the planned attributes, call
//! the client, reconcile the response with the plan, and return State.

use std::collections::HashMap;

use tracing::warn;

use volans_core::merge::{merge_maps, merge_only_path};
use volans_core::provider::{ProviderError, ProviderResult};
use volans_core::resource::{Resource, ResourceId, State, Value};

use volans_meraki_api::types::*;
use volans_meraki_api::{Error as ApiError, MerakiClient};

use crate::config::ProviderConfig;
use crate::mapping::{api_from_attrs, attrs_from_api};
use crate::pick::{Strategy, describe_strategies, pick_method};
use crate::schemas::{MerakiSchemaConfig, get_schema_config};

/// Comment the dashboard puts on the rule it appends to every L3 rule
/// list; it must never be sent back.
const DEFAULT_RULE_COMMENT: &str = "Default rule";

/// Meraki Dashboard Provider
pub struct MerakiProvider {
    client: MerakiClient,
    config: ProviderConfig,
}

impl MerakiProvider {
    /// Create a new MerakiProvider from configuration
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        let client = MerakiClient::new(&config.base_url, &config.api_key, config.timeout)
            .map_err(|e| ProviderError::new(format!("Failed to build client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Wrap an existing client (used by tests against a mock server)
    pub fn from_client(client: MerakiClient, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    // =========================================================================
    // Lookup Helpers
    // =========================================================================

    fn schema_config(&self, id: &ResourceId) -> ProviderResult<MerakiSchemaConfig> {
        get_schema_config(&id.resource_type).ok_or_else(|| {
            ProviderError::new(format!("Unknown resource type: {}", id.resource_type))
                .for_resource(id.clone())
        })
    }

    fn organization_id(&self, id: &ResourceId) -> ProviderResult<String> {
        self.config
            .require_organization_id()
            .map(|s| s.to_string())
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))
    }

    fn api_error(&self, e: ApiError, id: &ResourceId) -> ProviderError {
        ProviderError::new(format!("Dashboard request failed: {}", e))
            .for_resource(id.clone())
            .with_cause(e)
    }

    /// Required non-empty string attribute, validated before any call
    fn require_attr(&self, resource: &Resource, key: &str) -> ProviderResult<String> {
        match resource.attributes.get(key) {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            _ => Err(ProviderError::new(format!(
                "Attribute '{}' must be a non-empty string",
                key
            ))
            .for_resource(resource.id.clone())),
        }
    }

    fn attr_int(attrs: &HashMap<String, Value>, key: &str) -> Option<i64> {
        attrs.get(key).and_then(Value::as_int)
    }

    fn attr_str<'a>(attrs: &'a HashMap<String, Value>, key: &str) -> Option<&'a str> {
        attrs.get(key).and_then(Value::as_str)
    }

    /// Split a composite identifier like "N_555/2" into its parts
    fn split_identifier(identifier: &str) -> (&str, Option<&str>) {
        match identifier.split_once('/') {
            Some((head, tail)) => (head, Some(tail)),
            None => (identifier, None),
        }
    }

    // =========================================================================
    // Struct <-> Attribute Conversion
    // =========================================================================

    /// Serialize an API struct into declaration-named attributes
    fn struct_to_attrs<T: serde::Serialize>(
        &self,
        config: &MerakiSchemaConfig,
        value: &T,
        id: &ResourceId,
    ) -> ProviderResult<HashMap<String, Value>> {
        let api_map = volans_core::convert::to_attribute_map(value)
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))?;
        let mut attrs = attrs_from_api(&config.schema, &api_map);
        self.read_special_attributes(&config.schema.resource_type, &mut attrs);
        Ok(attrs)
    }

    /// Build a typed request body from declaration-named attributes
    fn request_from_attrs<T: serde::de::DeserializeOwned>(
        &self,
        config: &MerakiSchemaConfig,
        attrs: &HashMap<String, Value>,
        id: &ResourceId,
    ) -> ProviderResult<T> {
        let api_map = api_from_attrs(&config.schema, attrs);
        volans_core::convert::from_attribute_map(&api_map)
            .map_err(|e| ProviderError::new(e.to_string()).for_resource(id.clone()))
    }

    // =========================================================================
    // Resource Operations
    // =========================================================================

    /// Read a resource's current state
    ///
    /// A 404 from the dashboard is not an error here: it returns
    /// `State::not_found` and the caller decides what drift means.
    pub async fn read_resource(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> ProviderResult<State> {
        let config = self.schema_config(&resource.id)?;

        if config.data_source {
            return self.read_data_source(resource, &config).await;
        }

        let id = resource.id.clone();
        let Some(identifier) = identifier else {
            return Ok(State::not_found(id));
        };

        let result = match id.resource_type.as_str() {
            "organization" => match self.client.get_organization(identifier).await {
                Ok(org) => {
                    let attrs = self.struct_to_attrs(&config, &org, &id)?;
                    Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                }
                Err(e) => Err(e),
            },
            "network" => match self.client.get_network(identifier).await {
                Ok(network) => {
                    let attrs = self.struct_to_attrs(&config, &network, &id)?;
                    Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                }
                Err(e) => Err(e),
            },
            "device" => match self.client.get_device(identifier).await {
                Ok(device) => {
                    let mut attrs = self.struct_to_attrs(&config, &device, &id)?;
                    // A claimed device always carries its network
                    if Self::attr_str(&attrs, "network_id").is_none() {
                        return Ok(State::not_found(id));
                    }
                    attrs.insert(
                        "serial".to_string(),
                        Value::String(identifier.to_string()),
                    );
                    Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                }
                Err(e) => Err(e),
            },
            "wireless_ssid" => {
                let (network_id, number) = Self::split_identifier(identifier);
                let number: i64 = number.and_then(|n| n.parse().ok()).ok_or_else(|| {
                    ProviderError::new(format!("Malformed SSID identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;
                match self
                    .client
                    .get_network_wireless_ssid(network_id, number)
                    .await
                {
                    Ok(ssid) => {
                        let mut attrs = self.struct_to_attrs(&config, &ssid, &id)?;
                        attrs.insert(
                            "network_id".to_string(),
                            Value::String(network_id.to_string()),
                        );
                        Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                    }
                    Err(e) => Err(e),
                }
            }
            "appliance_vlan" => {
                let (network_id, vlan_id) = Self::split_identifier(identifier);
                let vlan_id = vlan_id.ok_or_else(|| {
                    ProviderError::new(format!("Malformed VLAN identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;
                match self
                    .client
                    .get_network_appliance_vlan(network_id, vlan_id)
                    .await
                {
                    Ok(vlan) => {
                        let mut attrs = self.struct_to_attrs(&config, &vlan, &id)?;
                        attrs.insert(
                            "network_id".to_string(),
                            Value::String(network_id.to_string()),
                        );
                        Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                    }
                    Err(e) => Err(e),
                }
            }
            "appliance_firewall_l3" => {
                match self
                    .client
                    .get_network_appliance_firewall_l3_rules(identifier)
                    .await
                {
                    Ok(mut rules) => {
                        strip_default_rule(&mut rules);
                        let mut attrs = self.struct_to_attrs(&config, &rules, &id)?;
                        attrs.insert(
                            "network_id".to_string(),
                            Value::String(identifier.to_string()),
                        );
                        Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                    }
                    Err(e) => Err(e),
                }
            }
            "admin" => {
                let organization_id = self.organization_id(&id)?;
                match self.client.get_organization_admins(&organization_id).await {
                    Ok(admins) => match admins.into_iter().find(|a| a.id == identifier) {
                        Some(admin) => {
                            let attrs = self.struct_to_attrs(&config, &admin, &id)?;
                            Ok(State::existing(id.clone(), attrs).with_identifier(identifier))
                        }
                        None => Ok(State::not_found(id.clone())),
                    },
                    Err(e) => Err(e),
                }
            }
            other => {
                return Err(
                    ProviderError::new(format!("Read not supported for {}", other))
                        .for_resource(id),
                );
            }
        };

        match result {
            Ok(state) => Ok(state),
            Err(e) if e.is_not_found() => Ok(State::not_found(resource.id.clone())),
            Err(e) => Err(self.api_error(e, &resource.id)),
        }
    }

    /// Create a resource
    pub async fn create_resource(&self, resource: Resource) -> ProviderResult<State> {
        let config = self.schema_config(&resource.id)?;
        let id = resource.id.clone();

        if config.data_source {
            return Err(ProviderError::new("Data sources cannot be created").for_resource(id));
        }

        // Slot/singleton resources have nothing to create; the slot
        // already exists and only accepts PUT.
        if config.update_only {
            let identifier = self.slot_identifier(&resource)?;
            return self
                .update_resource(id, &identifier, resource.clone())
                .await;
        }

        match id.resource_type.as_str() {
            "organization" => {
                let name = self.require_attr(&resource, "name")?;
                let org = self
                    .client
                    .create_organization(&CreateOrganizationRequest { name })
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                // The POST only takes a name; API enablement is a follow-up PUT
                let org = match resource.attributes.get("api_enabled").and_then(Value::as_bool) {
                    Some(enabled) => self
                        .client
                        .update_organization(
                            &org.id,
                            &UpdateOrganizationRequest {
                                name: None,
                                api: Some(OrganizationApi { enabled }),
                            },
                        )
                        .await
                        .map_err(|e| self.api_error(e, &id))?,
                    None => org,
                };

                let identifier = org.id.clone();
                let attrs = self.struct_to_attrs(&config, &org, &id)?;
                let merged = merge_maps(&resource.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "network" => {
                let organization_id = self.organization_id(&id)?;
                let body: CreateNetworkRequest =
                    self.request_from_attrs(&config, &resource.attributes, &id)?;
                let network = self
                    .client
                    .create_organization_network(&organization_id, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let identifier = network.id.clone();
                let attrs = self.struct_to_attrs(&config, &network, &id)?;
                let merged = merge_maps(&resource.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "device" => {
                let serial = self.require_attr(&resource, "serial")?;
                let network_id = self.require_attr(&resource, "network_id")?;

                self.client
                    .claim_network_devices(
                        &network_id,
                        &ClaimNetworkDevicesRequest {
                            serials: vec![serial.clone()],
                        },
                    )
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                // Claiming sets nothing but membership; push attributes next
                if let Some(body) = device_update_body(&resource.attributes) {
                    self.client
                        .update_device(&serial, &body)
                        .await
                        .map_err(|e| self.api_error(e, &id))?;
                }

                self.read_resource(&resource, Some(&serial)).await
            }
            "appliance_vlan" => {
                let network_id = self.require_attr(&resource, "network_id")?;

                // Appliances ship with VLANs disabled; the first VLAN
                // can't be created until they're switched on.
                let settings = self
                    .client
                    .get_network_appliance_vlans_settings(&network_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                if !settings.vlans_enabled {
                    self.client
                        .update_network_appliance_vlans_settings(
                            &network_id,
                            &ApplianceVlansSettings {
                                vlans_enabled: true,
                            },
                        )
                        .await
                        .map_err(|e| self.api_error(e, &id))?;
                }

                let body: CreateApplianceVlanRequest =
                    self.request_from_attrs(&config, &resource.attributes, &id)?;
                let vlan = self
                    .client
                    .create_network_appliance_vlan(&network_id, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let identifier = format!("{}/{}", network_id, vlan.id);

                // DHCP options are not accepted on the POST
                let update: UpdateApplianceVlanRequest =
                    self.request_from_attrs(&config, &resource.attributes, &id)?;
                let vlan = if update.dhcp_handling.is_some()
                    || update.dhcp_lease_time.is_some()
                    || update.dns_nameservers.is_some()
                    || update.reserved_ip_ranges.is_some()
                {
                    self.client
                        .update_network_appliance_vlan(&network_id, &vlan.id, &update)
                        .await
                        .map_err(|e| self.api_error(e, &id))?
                } else {
                    vlan
                };

                let attrs = self.struct_to_attrs(&config, &vlan, &id)?;
                let merged = merge_only_path(&resource.attributes, &attrs, config.path_attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "admin" => {
                let organization_id = self.organization_id(&id)?;
                let body: CreateAdminRequest =
                    self.request_from_attrs(&config, &resource.attributes, &id)?;
                let admin = self
                    .client
                    .create_organization_admin(&organization_id, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let identifier = admin.id.clone();
                let attrs = self.struct_to_attrs(&config, &admin, &id)?;
                let merged = merge_maps(&resource.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            other => Err(
                ProviderError::new(format!("Create not supported for {}", other))
                    .for_resource(id),
            ),
        }
    }

    /// Update a resource
    pub async fn update_resource(
        &self,
        id: ResourceId,
        identifier: &str,
        to: Resource,
    ) -> ProviderResult<State> {
        let config = self.schema_config(&id)?;

        if config.data_source {
            return Err(ProviderError::new("Data sources cannot be updated").for_resource(id));
        }

        match id.resource_type.as_str() {
            "organization" => {
                let body = UpdateOrganizationRequest {
                    name: Self::attr_str(&to.attributes, "name").map(|s| s.to_string()),
                    api: to
                        .attributes
                        .get("api_enabled")
                        .and_then(Value::as_bool)
                        .map(|enabled| OrganizationApi { enabled }),
                };
                let org = self
                    .client
                    .update_organization(identifier, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &org, &id)?;
                let merged = merge_maps(&to.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "network" => {
                let body: UpdateNetworkRequest =
                    self.request_from_attrs(&config, &to.attributes, &id)?;
                let network = self
                    .client
                    .update_network(identifier, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &network, &id)?;
                let merged = merge_maps(&to.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "device" => {
                let body = device_update_body(&to.attributes).unwrap_or_default();
                let device = self
                    .client
                    .update_device(identifier, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &device, &id)?;
                let merged = merge_maps(&to.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "wireless_ssid" => {
                let (network_id, number) = Self::split_identifier(identifier);
                let number: i64 = number.and_then(|n| n.parse().ok()).ok_or_else(|| {
                    ProviderError::new(format!("Malformed SSID identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;

                let body: UpdateWirelessSsidRequest =
                    self.request_from_attrs(&config, &to.attributes, &id)?;
                let ssid = self
                    .client
                    .update_network_wireless_ssid(network_id, number, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &ssid, &id)?;
                // Secrets (psk, RADIUS secrets) never come back; the
                // merge keeps the planned values for them.
                let mut merged = merge_maps(&to.attributes, &attrs);
                merged.insert(
                    "network_id".to_string(),
                    Value::String(network_id.to_string()),
                );
                merged.insert("number".to_string(), Value::Int(number));
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "appliance_vlan" => {
                let (network_id, vlan_id) = Self::split_identifier(identifier);
                let vlan_id = vlan_id.ok_or_else(|| {
                    ProviderError::new(format!("Malformed VLAN identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;

                let body: UpdateApplianceVlanRequest =
                    self.request_from_attrs(&config, &to.attributes, &id)?;
                let vlan = self
                    .client
                    .update_network_appliance_vlan(network_id, vlan_id, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &vlan, &id)?;
                let mut merged = merge_maps(&to.attributes, &attrs);
                merged.insert(
                    "network_id".to_string(),
                    Value::String(network_id.to_string()),
                );
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "appliance_firewall_l3" => {
                let body: UpdateL3FirewallRulesRequest =
                    self.request_from_attrs(&config, &to.attributes, &id)?;
                let mut rules = self
                    .client
                    .update_network_appliance_firewall_l3_rules(identifier, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                strip_default_rule(&mut rules);
                let attrs = self.struct_to_attrs(&config, &rules, &id)?;
                let mut merged = merge_maps(&to.attributes, &attrs);
                merged.insert(
                    "network_id".to_string(),
                    Value::String(identifier.to_string()),
                );
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            "admin" => {
                let organization_id = self.organization_id(&id)?;
                let body: UpdateAdminRequest =
                    self.request_from_attrs(&config, &to.attributes, &id)?;
                let admin = self
                    .client
                    .update_organization_admin(&organization_id, identifier, &body)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;

                let attrs = self.struct_to_attrs(&config, &admin, &id)?;
                let merged = merge_maps(&to.attributes, &attrs);
                Ok(State::existing(id, merged).with_identifier(identifier))
            }
            other => Err(
                ProviderError::new(format!("Update not supported for {}", other))
                    .for_resource(id),
            ),
        }
    }

    /// Delete a resource
    pub async fn delete_resource(&self, id: &ResourceId, identifier: &str) -> ProviderResult<()> {
        let config = self.schema_config(id)?;

        if config.data_source {
            return Err(
                ProviderError::new("Data sources cannot be deleted").for_resource(id.clone())
            );
        }

        let result = match id.resource_type.as_str() {
            "organization" => self.client.delete_organization(identifier).await,
            "network" => self.client.delete_network(identifier).await,
            "device" => {
                // Removing from the network releases the device; the
                // network id comes from current state via read.
                let lookup = Resource::new(id.resource_type.clone(), id.name.clone());
                let state = self.read_resource(&lookup, Some(identifier)).await?;
                if !state.exists {
                    return Ok(());
                }
                let Some(network_id) = Self::attr_str(&state.attributes, "network_id") else {
                    return Ok(());
                };
                self.client
                    .remove_network_devices(
                        network_id,
                        &RemoveNetworkDevicesRequest {
                            serial: identifier.to_string(),
                        },
                    )
                    .await
            }
            "wireless_ssid" => {
                // Slots can't be deleted; reset to disabled
                let (network_id, number) = Self::split_identifier(identifier);
                let number: i64 = number.and_then(|n| n.parse().ok()).ok_or_else(|| {
                    ProviderError::new(format!("Malformed SSID identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;
                self.client
                    .update_network_wireless_ssid(
                        network_id,
                        number,
                        &UpdateWirelessSsidRequest {
                            enabled: Some(false),
                            ..Default::default()
                        },
                    )
                    .await
                    .map(|_| ())
            }
            "appliance_vlan" => {
                let (network_id, vlan_id) = Self::split_identifier(identifier);
                let vlan_id = vlan_id.ok_or_else(|| {
                    ProviderError::new(format!("Malformed VLAN identifier '{}'", identifier))
                        .for_resource(id.clone())
                })?;
                self.client
                    .delete_network_appliance_vlan(network_id, vlan_id)
                    .await
            }
            "appliance_firewall_l3" => {
                // The singleton can't be deleted; reset to an empty list
                self.client
                    .update_network_appliance_firewall_l3_rules(
                        identifier,
                        &UpdateL3FirewallRulesRequest::default(),
                    )
                    .await
                    .map(|_| ())
            }
            "admin" => {
                let organization_id = self.organization_id(id)?;
                self.client
                    .delete_organization_admin(&organization_id, identifier)
                    .await
            }
            other => {
                return Err(
                    ProviderError::new(format!("Delete not supported for {}", other))
                        .for_resource(id.clone()),
                );
            }
        };

        match result {
            Ok(()) => Ok(()),
            // Already gone remotely is a successful delete
            Err(e) if e.is_not_found() => {
                warn!("{} was already gone on delete", id);
                Ok(())
            }
            Err(e) => Err(self.api_error(e, id)),
        }
    }

    // =========================================================================
    // Data Sources
    // =========================================================================

    const ORGANIZATIONS_STRATEGIES: &'static [Strategy] = &[
        Strategy {
            name: "by_id",
            requires: &["organization_id"],
        },
        Strategy {
            name: "all",
            requires: &[],
        },
    ];

    const NETWORKS_STRATEGIES: &'static [Strategy] = &[
        Strategy {
            name: "by_id",
            requires: &["network_id"],
        },
        Strategy {
            name: "by_organization",
            requires: &[],
        },
    ];

    const DEVICES_STRATEGIES: &'static [Strategy] = &[
        Strategy {
            name: "by_serial",
            requires: &["serial"],
        },
        Strategy {
            name: "by_network",
            requires: &["network_id"],
        },
        Strategy {
            name: "by_organization",
            requires: &[],
        },
    ];

    const SSIDS_STRATEGIES: &'static [Strategy] = &[
        Strategy {
            name: "by_number",
            requires: &["network_id", "number"],
        },
        Strategy {
            name: "by_network",
            requires: &["network_id"],
        },
    ];

    /// Refresh a data source
    ///
    /// The lookup strategy is picked from whichever filter attributes
    /// are set; results land in the computed `items` list alongside the
    /// echoed filters.
    async fn read_data_source(
        &self,
        resource: &Resource,
        config: &MerakiSchemaConfig,
    ) -> ProviderResult<State> {
        let id = resource.id.clone();
        let attrs = &resource.attributes;

        let strategies = match id.resource_type.as_str() {
            "organizations" => Self::ORGANIZATIONS_STRATEGIES,
            "networks" => Self::NETWORKS_STRATEGIES,
            "devices" => Self::DEVICES_STRATEGIES,
            "wireless_ssids" => Self::SSIDS_STRATEGIES,
            other => {
                return Err(
                    ProviderError::new(format!("Unknown data source: {}", other))
                        .for_resource(id),
                );
            }
        };

        let strategy = pick_method(strategies, attrs).ok_or_else(|| {
            ProviderError::new(format!(
                "No lookup strategy applies; set {}",
                describe_strategies(strategies)
            ))
            .for_resource(id.clone())
        })?;

        let items = match (id.resource_type.as_str(), strategy.name) {
            ("organizations", "by_id") => {
                let org_id = Self::attr_str(attrs, "organization_id").unwrap_or_default();
                let org = self
                    .client
                    .get_organization(org_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "organization", std::slice::from_ref(&org))?
            }
            ("organizations", _) => {
                let orgs = self
                    .client
                    .get_organizations()
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "organization", &orgs)?
            }
            ("networks", "by_id") => {
                let network_id = Self::attr_str(attrs, "network_id").unwrap_or_default();
                let network = self
                    .client
                    .get_network(network_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "network", std::slice::from_ref(&network))?
            }
            ("networks", _) => {
                let organization_id = self.organization_id(&id)?;
                let networks = self
                    .client
                    .get_organization_networks(&organization_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "network", &networks)?
            }
            ("devices", "by_serial") => {
                let serial = Self::attr_str(attrs, "serial").unwrap_or_default();
                let device = self
                    .client
                    .get_device(serial)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "device", std::slice::from_ref(&device))?
            }
            ("devices", "by_network") => {
                let network_id = Self::attr_str(attrs, "network_id").unwrap_or_default();
                let devices = self
                    .client
                    .get_network_devices(network_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "device", &devices)?
            }
            ("devices", _) => {
                let organization_id = self.organization_id(&id)?;
                let devices = self
                    .client
                    .get_organization_devices(&organization_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "device", &devices)?
            }
            ("wireless_ssids", "by_number") => {
                let network_id = Self::attr_str(attrs, "network_id").unwrap_or_default();
                let number = Self::attr_int(attrs, "number").unwrap_or_default();
                let ssid = self
                    .client
                    .get_network_wireless_ssid(network_id, number)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "wireless_ssid", std::slice::from_ref(&ssid))?
            }
            ("wireless_ssids", _) => {
                let network_id = Self::attr_str(attrs, "network_id").unwrap_or_default();
                let ssids = self
                    .client
                    .get_network_wireless_ssids(network_id)
                    .await
                    .map_err(|e| self.api_error(e, &id))?;
                self.items_from(&id, "wireless_ssid", &ssids)?
            }
            _ => unreachable!("strategy tables cover all data sources"),
        };

        let mut result = attrs.clone();
        result.insert("items".to_string(), Value::List(items));
        Ok(State::existing(id, result))
    }

    /// Map API structs to item maps using the singular resource's schema
    fn items_from<T: serde::Serialize>(
        &self,
        id: &ResourceId,
        item_type: &str,
        values: &[T],
    ) -> ProviderResult<Vec<Value>> {
        let item_config = get_schema_config(item_type).ok_or_else(|| {
            ProviderError::new(format!("Unknown item type: {}", item_type))
                .for_resource(id.clone())
        })?;

        values
            .iter()
            .map(|v| {
                self.struct_to_attrs(&item_config, v, id)
                    .map(Value::Map)
            })
            .collect()
    }

    // =========================================================================
    // Special Case Handlers
    // =========================================================================

    /// Handle attributes that don't follow the standard mapping
    fn read_special_attributes(&self, resource_type: &str, attrs: &mut HashMap<String, Value>) {
        if resource_type == "organization" {
            // Flatten the nested `api.enabled` block
            if let Some(Value::Map(api)) = attrs.remove("api")
                && let Some(enabled) = api.get("enabled")
            {
                attrs.insert("api_enabled".to_string(), enabled.clone());
            }
        }
    }

    /// Identifier for slot/singleton resources, derived from their path
    /// attributes (they exist before we ever touch them)
    fn slot_identifier(&self, resource: &Resource) -> ProviderResult<String> {
        match resource.id.resource_type.as_str() {
            "wireless_ssid" => {
                let network_id = self.require_attr(resource, "network_id")?;
                let number =
                    Self::attr_int(&resource.attributes, "number").ok_or_else(|| {
                        ProviderError::new("Attribute 'number' must be an integer")
                            .for_resource(resource.id.clone())
                    })?;
                Ok(format!("{}/{}", network_id, number))
            }
            "appliance_firewall_l3" => self.require_attr(resource, "network_id"),
            other => Err(ProviderError::new(format!(
                "{} is not a slot resource",
                other
            ))
            .for_resource(resource.id.clone())),
        }
    }
}

// =============================================================================
// Free Helpers
// =============================================================================

/// Drop the dashboard-appended default rule from a fetched rule list
fn strip_default_rule(rules: &mut L3FirewallRules) {
    if rules
        .rules
        .last()
        .is_some_and(|r| r.comment.as_deref() == Some(DEFAULT_RULE_COMMENT))
    {
        rules.rules.pop();
    }
}

/// Build a device update body from declaration attributes
///
/// Returns `None` when no updatable attribute is set (a bare claim).
/// Lat/lng are declared as decimal strings and parsed here; the wire
/// wants numbers.
fn device_update_body(attrs: &HashMap<String, Value>) -> Option<UpdateDeviceRequest> {
    let body = UpdateDeviceRequest {
        name: attrs.get("name").and_then(Value::as_str).map(String::from),
        tags: attrs.get("tags").and_then(|v| match v {
            Value::List(items) => Some(
                items
                    .iter()
                    .filter_map(|i| i.as_str().map(String::from))
                    .collect(),
            ),
            _ => None,
        }),
        address: attrs
            .get("address")
            .and_then(Value::as_str)
            .map(String::from),
        lat: attrs.get("lat").and_then(parse_coordinate),
        lng: attrs.get("lng").and_then(parse_coordinate),
        notes: attrs
            .get("notes")
            .and_then(Value::as_str)
            .map(String::from),
        move_map_marker: None,
    };

    let has_any = body.name.is_some()
        || body.tags.is_some()
        || body.address.is_some()
        || body.lat.is_some()
        || body.lng.is_some()
        || body.notes.is_some();

    has_any.then_some(body)
}

fn parse_coordinate(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Int(n) => Some(*n as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_identifier_composite() {
        assert_eq!(
            MerakiProvider::split_identifier("N_555/2"),
            ("N_555", Some("2"))
        );
        assert_eq!(MerakiProvider::split_identifier("N_555"), ("N_555", None));
    }

    #[test]
    fn strip_default_rule_only_strips_trailing() {
        let mut rules = L3FirewallRules {
            rules: vec![
                L3FirewallRule {
                    comment: Some("Allow DNS".to_string()),
                    policy: "allow".to_string(),
                    protocol: "udp".to_string(),
                    src_port: None,
                    src_cidr: Some("Any".to_string()),
                    dest_port: Some("53".to_string()),
                    dest_cidr: Some("Any".to_string()),
                    syslog_enabled: None,
                },
                L3FirewallRule {
                    comment: Some(DEFAULT_RULE_COMMENT.to_string()),
                    policy: "allow".to_string(),
                    protocol: "Any".to_string(),
                    src_port: None,
                    src_cidr: Some("Any".to_string()),
                    dest_port: None,
                    dest_cidr: Some("Any".to_string()),
                    syslog_enabled: None,
                },
            ],
        };

        strip_default_rule(&mut rules);
        assert_eq!(rules.rules.len(), 1);

        // A second pass must not eat user rules
        strip_default_rule(&mut rules);
        assert_eq!(rules.rules.len(), 1);
    }

    #[test]
    fn device_update_body_from_attrs() {
        let attrs = HashMap::from([
            ("name".to_string(), Value::String("ap-lobby".to_string())),
            (
                "lat".to_string(),
                Value::String("37.4180951010362".to_string()),
            ),
            ("lng".to_string(), Value::Int(-122)),
        ]);

        let body = device_update_body(&attrs).unwrap();
        assert_eq!(body.name.as_deref(), Some("ap-lobby"));
        assert_eq!(body.lat, Some(37.4180951010362));
        assert_eq!(body.lng, Some(-122.0));
        assert!(body.tags.is_none());
    }

    #[test]
    fn device_update_body_empty_is_none() {
        let attrs = HashMap::from([(
            "serial".to_string(),
            Value::String("Q2XX-ABCD-1234".to_string()),
        )]);
        assert!(device_update_body(&attrs).is_none());
    }
}
