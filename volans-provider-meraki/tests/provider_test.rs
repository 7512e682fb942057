// CRUD tests for `MerakiProvider` against a wiremock dashboard.

use std::collections::HashMap;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use volans_core::resource::{Resource, ResourceId, Value};
use volans_meraki_api::MerakiClient;
use volans_provider_meraki::{MerakiProvider, ProviderConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, MerakiProvider) {
    let server = MockServer::start().await;
    let client = MerakiClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
    let config = ProviderConfig::new("test-key").with_organization_id("2930418");
    (server, MerakiProvider::from_client(client, config))
}

fn string_attr(value: &str) -> Value {
    Value::String(value.to_string())
}

// ── Networks ────────────────────────────────────────────────────────

#[tokio::test]
async fn create_network_merges_response_into_state() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/organizations/2930418/networks"))
        .and(body_json(json!({
            "name": "Branch",
            "productTypes": ["wireless"],
            "timeZone": "Europe/Amsterdam"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "N_555",
            "organizationId": "2930418",
            "name": "Branch",
            "productTypes": ["wireless"],
            "timeZone": "Europe/Amsterdam",
            "url": "https://n1.meraki.com/Branch/n/manage",
            "tags": null,
            "notes": null
        })))
        .mount(&server)
        .await;

    let resource = Resource::new("network", "branch")
        .with_attribute("name", string_attr("Branch"))
        .with_attribute(
            "product_types",
            Value::List(vec![string_attr("wireless")]),
        )
        .with_attribute("time_zone", string_attr("Europe/Amsterdam"));

    let state = provider.create_resource(resource).await.unwrap();

    assert!(state.exists);
    assert_eq!(state.identifier.as_deref(), Some("N_555"));
    // Computed attributes flow in from the response
    assert_eq!(state.attributes.get("id"), Some(&string_attr("N_555")));
    assert_eq!(
        state.attributes.get("url"),
        Some(&string_attr("https://n1.meraki.com/Branch/n/manage"))
    );
    // Nulls in the response don't clobber anything
    assert!(!state.attributes.contains_key("notes"));
}

#[tokio::test]
async fn read_network_404_is_not_found() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/networks/N_gone"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"errors": ["Network not found"]})),
        )
        .mount(&server)
        .await;

    let resource = Resource::new("network", "branch");
    let state = provider.read_resource(&resource, Some("N_gone")).await.unwrap();

    assert!(!state.exists);
}

#[tokio::test]
async fn update_network_uses_wire_names() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/networks/N_555"))
        .and(body_json(json!({
            "name": "Branch",
            "timeZone": "UTC"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "N_555",
            "organizationId": "2930418",
            "name": "Branch",
            "productTypes": ["wireless"],
            "timeZone": "UTC"
        })))
        .mount(&server)
        .await;

    let to = Resource::new("network", "branch")
        .with_attribute("name", string_attr("Branch"))
        .with_attribute("time_zone", string_attr("UTC"));

    let state = provider
        .update_resource(ResourceId::new("network", "branch"), "N_555", to)
        .await
        .unwrap();

    assert_eq!(state.attributes.get("time_zone"), Some(&string_attr("UTC")));
}

// ── Wireless SSIDs (slot resource) ──────────────────────────────────

#[tokio::test]
async fn ssid_create_degrades_to_put_and_keeps_secrets() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/networks/N_555/wireless/ssids/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 2,
            "name": "Guest WiFi",
            "enabled": true,
            "authMode": "psk",
            "psk": null,
            "ipAssignmentMode": "NAT mode"
        })))
        .mount(&server)
        .await;

    let resource = Resource::new("wireless_ssid", "guest")
        .with_attribute("network_id", string_attr("N_555"))
        .with_attribute("number", Value::Int(2))
        .with_attribute("name", string_attr("Guest WiFi"))
        .with_attribute("enabled", Value::Bool(true))
        .with_attribute("auth_mode", string_attr("psk"))
        .with_attribute("psk", string_attr("deadbeef"));

    let state = provider.create_resource(resource).await.unwrap();

    assert_eq!(state.identifier.as_deref(), Some("N_555/2"));
    // The dashboard nulls the psk on echo; the planned value survives
    assert_eq!(state.attributes.get("psk"), Some(&string_attr("deadbeef")));
    assert_eq!(state.attributes.get("number"), Some(&Value::Int(2)));
    assert_eq!(
        state.attributes.get("network_id"),
        Some(&string_attr("N_555"))
    );
}

#[tokio::test]
async fn ssid_delete_resets_slot() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/networks/N_555/wireless/ssids/2"))
        .and(body_json(json!({"enabled": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "number": 2,
            "name": "Unconfigured SSID 3",
            "enabled": false
        })))
        .mount(&server)
        .await;

    provider
        .delete_resource(&ResourceId::new("wireless_ssid", "guest"), "N_555/2")
        .await
        .unwrap();
}

// ── Firewall rules (singleton resource) ─────────────────────────────

#[tokio::test]
async fn firewall_update_strips_trailing_default_rule() {
    let (server, provider) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/networks/N_555/appliance/firewall/l3FirewallRules"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "rules": [
                {
                    "comment": "Allow DNS",
                    "policy": "allow",
                    "protocol": "udp",
                    "srcCidr": "Any",
                    "destPort": "53",
                    "destCidr": "192.168.1.0/24"
                },
                {
                    "comment": "Default rule",
                    "policy": "allow",
                    "protocol": "Any",
                    "srcCidr": "Any",
                    "destCidr": "Any"
                }
            ]
        })))
        .mount(&server)
        .await;

    let rule = Value::Map(HashMap::from([
        ("comment".to_string(), string_attr("Allow DNS")),
        ("policy".to_string(), string_attr("allow")),
        ("protocol".to_string(), string_attr("udp")),
        ("src_cidr".to_string(), string_attr("Any")),
        ("dest_port".to_string(), string_attr("53")),
        ("dest_cidr".to_string(), string_attr("192.168.1.0/24")),
    ]));

    let to = Resource::new("appliance_firewall_l3", "branch")
        .with_attribute("network_id", string_attr("N_555"))
        .with_attribute("rules", Value::List(vec![rule]));

    let state = provider
        .update_resource(
            ResourceId::new("appliance_firewall_l3", "branch"),
            "N_555",
            to,
        )
        .await
        .unwrap();

    let Some(Value::List(rules)) = state.attributes.get("rules") else {
        panic!("Expected rules list");
    };
    // Only the declared rule lands in state, not the appended default
    assert_eq!(rules.len(), 1);
}

// ── Appliance VLANs ─────────────────────────────────────────────────

#[tokio::test]
async fn vlan_create_enables_vlans_first() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/networks/N_555/appliance/vlans/settings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vlansEnabled": false})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/networks/N_555/appliance/vlans/settings"))
        .and(body_json(json!({"vlansEnabled": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"vlansEnabled": true})))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/networks/N_555/appliance/vlans"))
        .and(body_json(json!({
            "id": "100",
            "name": "voice",
            "subnet": "192.168.100.0/24",
            "applianceIp": "192.168.100.1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "100",
            "interfaceId": "1284392014819",
            "name": "voice",
            "subnet": "192.168.100.0/24",
            "applianceIp": "192.168.100.1"
        })))
        .mount(&server)
        .await;

    let resource = Resource::new("appliance_vlan", "voice")
        .with_attribute("network_id", string_attr("N_555"))
        .with_attribute("vlan_id", string_attr("100"))
        .with_attribute("name", string_attr("voice"))
        .with_attribute("subnet", string_attr("192.168.100.0/24"))
        .with_attribute("appliance_ip", string_attr("192.168.100.1"));

    let state = provider.create_resource(resource).await.unwrap();

    assert_eq!(state.identifier.as_deref(), Some("N_555/100"));
    // Path attributes come from the plan, the rest from the response
    assert_eq!(
        state.attributes.get("network_id"),
        Some(&string_attr("N_555"))
    );
    assert_eq!(
        state.attributes.get("interface_id"),
        Some(&string_attr("1284392014819"))
    );
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn device_create_claims_then_updates_then_reads() {
    let (server, provider) = setup().await;

    Mock::given(method("POST"))
        .and(path("/networks/N_555/devices/claim"))
        .and(body_json(json!({"serials": ["Q2XX-ABCD-1234"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/devices/Q2XX-ABCD-1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serial": "Q2XX-ABCD-1234",
            "name": "ap-lobby",
            "networkId": "N_555"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/devices/Q2XX-ABCD-1234"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "serial": "Q2XX-ABCD-1234",
            "name": "ap-lobby",
            "networkId": "N_555",
            "model": "MR36",
            "mac": "00:18:0a:12:34:56",
            "firmware": "wireless-29-5-1"
        })))
        .mount(&server)
        .await;

    let resource = Resource::new("device", "lobby")
        .with_attribute("serial", string_attr("Q2XX-ABCD-1234"))
        .with_attribute("network_id", string_attr("N_555"))
        .with_attribute("name", string_attr("ap-lobby"));

    let state = provider.create_resource(resource).await.unwrap();

    assert_eq!(state.identifier.as_deref(), Some("Q2XX-ABCD-1234"));
    assert_eq!(state.attributes.get("model"), Some(&string_attr("MR36")));
}

// ── Data sources ────────────────────────────────────────────────────

#[tokio::test]
async fn devices_data_source_picks_network_strategy() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/networks/N_555/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"serial": "Q2XX-ABCD-1234", "name": "ap-lobby", "networkId": "N_555"},
            {"serial": "Q2XX-ABCD-5678", "name": "ap-cafe", "networkId": "N_555"}
        ])))
        .mount(&server)
        .await;

    let resource = Resource::new("devices", "branch_devices")
        .with_read_only(true)
        .with_attribute("network_id", string_attr("N_555"));

    let state = provider.read_resource(&resource, None).await.unwrap();

    let Some(Value::List(items)) = state.attributes.get("items") else {
        panic!("Expected items list");
    };
    assert_eq!(items.len(), 2);
    let Value::Map(first) = &items[0] else {
        panic!("Expected map");
    };
    assert_eq!(first.get("name"), Some(&string_attr("ap-lobby")));
}

#[tokio::test]
async fn ssids_data_source_requires_network_id() {
    let (_server, provider) = setup().await;

    let resource = Resource::new("wireless_ssids", "all").with_read_only(true);
    let err = provider.read_resource(&resource, None).await.unwrap_err();

    assert!(err.to_string().contains("network_id"));
}

// ── Admins ──────────────────────────────────────────────────────────

#[tokio::test]
async fn admin_read_scans_the_listing() {
    let (server, provider) = setup().await;

    Mock::given(method("GET"))
        .and(path("/organizations/2930418/admins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": "212406",
                "name": "Miles Meraki",
                "email": "miles@meraki.com",
                "orgAccess": "full",
                "accountStatus": "ok",
                "twoFactorAuthEnabled": false,
                "hasApiKey": true,
                "networks": [{"id": "N_555", "access": "full"}],
                "tags": []
            }
        ])))
        .mount(&server)
        .await;

    let resource = Resource::new("admin", "miles");
    let state = provider.read_resource(&resource, Some("212406")).await.unwrap();

    assert!(state.exists);
    assert_eq!(
        state.attributes.get("org_access"),
        Some(&string_attr("full"))
    );

    // An unknown admin id reads back as drift, not an error
    let state = provider.read_resource(&resource, Some("999999")).await.unwrap();
    assert!(!state.exists);
}
