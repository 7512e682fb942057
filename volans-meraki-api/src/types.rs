//! Request and response types for the Meraki Dashboard API v1.
//!
//! All types match the JSON bodies of `/api/v1/` endpoints. Field names
//! use camelCase via `#[serde(rename_all = "camelCase")]`; every
//! optional request field carries `skip_serializing_if` so unset values
//! stay off the wire (the dashboard treats `null` and absent
//! differently for several endpoints).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Organizations ────────────────────────────────────────────────────

/// Organization — from `GET /organizations` and `GET /organizations/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub api: Option<OrganizationApi>,
    /// Catch-all for additional fields not modeled above.
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// API enablement block on an organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationApi {
    pub enabled: bool,
}

/// Body for `POST /organizations`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    pub name: String,
}

/// Body for `PUT /organizations/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrganizationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api: Option<OrganizationApi>,
}

// ── Networks ─────────────────────────────────────────────────────────

/// Network — from `GET /organizations/{id}/networks` and `GET /networks/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Network {
    pub id: String,
    pub organization_id: Option<String>,
    pub name: String,
    /// One or more of: `appliance`, `switch`, `wireless`, `camera`,
    /// `cellularGateway`, `sensor`, `systemsManager`.
    pub product_types: Vec<String>,
    pub time_zone: Option<String>,
    pub tags: Option<Vec<String>>,
    pub enrollment_string: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub is_bound_to_config_template: Option<bool>,
}

/// Body for `POST /organizations/{id}/networks`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkRequest {
    pub name: String,
    pub product_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_from_network_id: Option<String>,
}

/// Body for `PUT /networks/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrollment_string: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ── Devices ──────────────────────────────────────────────────────────

/// Device — from the organization/network device listings and
/// `GET /devices/{serial}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub serial: String,
    pub name: Option<String>,
    pub mac: Option<String>,
    pub network_id: Option<String>,
    pub model: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub lan_ip: Option<String>,
    pub firmware: Option<String>,
    pub product_type: Option<String>,
    pub url: Option<String>,
}

/// Body for `PUT /devices/{serial}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeviceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_map_marker: Option<bool>,
}

/// Body for `POST /networks/{id}/devices/claim`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimNetworkDevicesRequest {
    pub serials: Vec<String>,
}

/// Body for `POST /networks/{id}/devices/remove`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveNetworkDevicesRequest {
    pub serial: String,
}

// ── Wireless SSIDs ───────────────────────────────────────────────────

/// Wireless SSID — from `GET /networks/{id}/wireless/ssids[/{number}]`.
///
/// SSIDs are fixed slots 0-14; they are never created or deleted, only
/// reconfigured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirelessSsid {
    pub number: i64,
    pub name: String,
    pub enabled: bool,
    pub auth_mode: Option<String>,
    pub encryption_mode: Option<String>,
    pub wpa_encryption_mode: Option<String>,
    pub splash_page: Option<String>,
    pub radius_servers: Option<Vec<RadiusServer>>,
    pub ip_assignment_mode: Option<String>,
    pub use_vlan_tagging: Option<bool>,
    pub default_vlan_id: Option<i64>,
    pub min_bitrate: Option<f64>,
    pub band_selection: Option<String>,
    pub per_client_bandwidth_limit_up: Option<i64>,
    pub per_client_bandwidth_limit_down: Option<i64>,
    pub visible: Option<bool>,
    pub available_on_all_aps: Option<bool>,
    pub availability_tags: Option<Vec<String>>,
}

/// RADIUS server block within an SSID.
///
/// The dashboard accepts `secret` on writes but never echoes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadiusServer {
    pub host: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

/// Body for `PUT /networks/{id}/wireless/ssids/{number}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWirelessSsidRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auth_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub psk: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpa_encryption_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub splash_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius_servers: Option<Vec<RadiusServer>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_assignment_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_vlan_tagging: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_vlan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bitrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band_selection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_client_bandwidth_limit_up: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_client_bandwidth_limit_down: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on_all_aps: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_tags: Option<Vec<String>>,
}

// ── Appliance VLANs ──────────────────────────────────────────────────

/// Appliance VLAN — from `GET /networks/{id}/appliance/vlans[/{vlanId}]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceVlan {
    /// VLAN id as a string (the dashboard returns "1234", not 1234).
    pub id: String,
    pub interface_id: Option<String>,
    pub name: String,
    pub subnet: Option<String>,
    pub appliance_ip: Option<String>,
    pub group_policy_id: Option<String>,
    pub dhcp_handling: Option<String>,
    pub dhcp_lease_time: Option<String>,
    pub dns_nameservers: Option<String>,
    pub reserved_ip_ranges: Option<Vec<ReservedIpRange>>,
}

/// Reserved DHCP range within a VLAN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservedIpRange {
    pub start: String,
    pub end: String,
    pub comment: String,
}

/// Body for `POST /networks/{id}/appliance/vlans`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplianceVlanRequest {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_policy_id: Option<String>,
}

/// Body for `PUT /networks/{id}/appliance/vlans/{vlanId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateApplianceVlanRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appliance_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_policy_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_handling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dhcp_lease_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_nameservers: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_ip_ranges: Option<Vec<ReservedIpRange>>,
}

/// VLANs enablement — `GET`/`PUT /networks/{id}/appliance/vlans/settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceVlansSettings {
    pub vlans_enabled: bool,
}

// ── Appliance L3 firewall rules ──────────────────────────────────────

/// Rule list — `GET`/`PUT /networks/{id}/appliance/firewall/l3FirewallRules`.
///
/// The whole ordered list is replaced on every update; the dashboard
/// appends its own default-allow rule, which must not be sent back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L3FirewallRules {
    pub rules: Vec<L3FirewallRule>,
}

/// Single L3 firewall rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L3FirewallRule {
    pub comment: Option<String>,
    /// `allow` or `deny`.
    pub policy: String,
    /// `tcp`, `udp`, `icmp`, `icmp6`, or `any`.
    pub protocol: String,
    pub src_port: Option<String>,
    pub src_cidr: Option<String>,
    pub dest_port: Option<String>,
    pub dest_cidr: Option<String>,
    pub syslog_enabled: Option<bool>,
}

/// Body for the rule-list PUT.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateL3FirewallRulesRequest {
    pub rules: Vec<L3FirewallRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub syslog_default_rule: Option<bool>,
}

// ── Admins ───────────────────────────────────────────────────────────

/// Dashboard administrator — from `GET /organizations/{id}/admins`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub name: String,
    pub email: String,
    /// `full`, `read-only`, `enterprise`, or `none`.
    pub org_access: String,
    pub account_status: Option<String>,
    pub two_factor_auth_enabled: Option<bool>,
    pub has_api_key: Option<bool>,
    pub last_active: Option<String>,
    pub networks: Option<Vec<AdminNetworkAccess>>,
    pub tags: Option<Vec<AdminTagAccess>>,
    pub authentication_method: Option<String>,
}

/// Per-network access grant on an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNetworkAccess {
    pub id: String,
    pub access: String,
}

/// Per-tag access grant on an admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTagAccess {
    pub tag: String,
    pub access: String,
}

/// Body for `POST /organizations/{id}/admins`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    pub email: String,
    pub name: String,
    pub org_access: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<AdminNetworkAccess>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<AdminTagAccess>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication_method: Option<String>,
}

/// Body for `PUT /organizations/{id}/admins/{adminId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_access: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networks: Option<Vec<AdminNetworkAccess>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<AdminTagAccess>>,
}
