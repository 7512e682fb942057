// Hand-crafted async HTTP client for the Meraki Dashboard API v1.
//
// Base path: /api/v1/
// Auth: Authorization: Bearer <api key>

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::types::*;

/// Production base URL. Regional shards (e.g. api.meraki.cn) and test
/// servers are configured through `MerakiClient::new`.
pub const DEFAULT_BASE_URL: &str = "https://api.meraki.com/api/v1";

const USER_AGENT: &str = concat!("volans/", env!("CARGO_PKG_VERSION"));

// ── Error response shape from the dashboard ──────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    errors: Vec<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Meraki Dashboard API.
///
/// One method per endpoint; no retries, no backoff. The API key is
/// injected as a sensitive default header and never logged.
pub struct MerakiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl MerakiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL, API key, and request timeout.
    pub fn new(
        base_url: &str,
        api_key: &secrecy::SecretString,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", api_key.expose_secret());
        let mut auth_value =
            HeaderValue::from_str(&bearer).map_err(|e| Error::InvalidApiKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
        })
    }

    /// Ensure the base URL ends with a single trailing slash so that
    /// joining `organizations/...` keeps the `/api/v1` prefix.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"organizations"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        self.handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn post_no_response<B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        self.handle_empty(resp).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        self.handle_response(resp).await
    }

    async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        self.handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: e.to_string(),
                body,
            })
        } else {
            Err(self.error_from(status, resp).await)
        }
    }

    async fn handle_empty(&self, resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(self.error_from(status, resp).await)
        }
    }

    async fn error_from(&self, status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(1);
            return Error::RateLimited { retry_after_secs };
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .ok()
            .filter(|e| !e.errors.is_empty())
            .map(|e| e.errors.join("; "))
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ── Organizations ────────────────────────────────────────────────

    /// `GET /organizations`
    pub async fn get_organizations(&self) -> Result<Vec<Organization>, Error> {
        self.get("organizations").await
    }

    /// `GET /organizations/{organizationId}`
    pub async fn get_organization(&self, organization_id: &str) -> Result<Organization, Error> {
        self.get(&format!("organizations/{organization_id}")).await
    }

    /// `POST /organizations`
    pub async fn create_organization(
        &self,
        body: &CreateOrganizationRequest,
    ) -> Result<Organization, Error> {
        self.post("organizations", body).await
    }

    /// `PUT /organizations/{organizationId}`
    pub async fn update_organization(
        &self,
        organization_id: &str,
        body: &UpdateOrganizationRequest,
    ) -> Result<Organization, Error> {
        self.put(&format!("organizations/{organization_id}"), body)
            .await
    }

    /// `DELETE /organizations/{organizationId}`
    pub async fn delete_organization(&self, organization_id: &str) -> Result<(), Error> {
        self.delete(&format!("organizations/{organization_id}"))
            .await
    }

    // ── Networks ─────────────────────────────────────────────────────

    /// `GET /organizations/{organizationId}/networks`
    pub async fn get_organization_networks(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Network>, Error> {
        self.get(&format!("organizations/{organization_id}/networks"))
            .await
    }

    /// `GET /networks/{networkId}`
    pub async fn get_network(&self, network_id: &str) -> Result<Network, Error> {
        self.get(&format!("networks/{network_id}")).await
    }

    /// `POST /organizations/{organizationId}/networks`
    pub async fn create_organization_network(
        &self,
        organization_id: &str,
        body: &CreateNetworkRequest,
    ) -> Result<Network, Error> {
        self.post(&format!("organizations/{organization_id}/networks"), body)
            .await
    }

    /// `PUT /networks/{networkId}`
    pub async fn update_network(
        &self,
        network_id: &str,
        body: &UpdateNetworkRequest,
    ) -> Result<Network, Error> {
        self.put(&format!("networks/{network_id}"), body).await
    }

    /// `DELETE /networks/{networkId}`
    pub async fn delete_network(&self, network_id: &str) -> Result<(), Error> {
        self.delete(&format!("networks/{network_id}")).await
    }

    // ── Devices ──────────────────────────────────────────────────────

    /// `GET /organizations/{organizationId}/devices`
    pub async fn get_organization_devices(
        &self,
        organization_id: &str,
    ) -> Result<Vec<Device>, Error> {
        self.get(&format!("organizations/{organization_id}/devices"))
            .await
    }

    /// `GET /networks/{networkId}/devices`
    pub async fn get_network_devices(&self, network_id: &str) -> Result<Vec<Device>, Error> {
        self.get(&format!("networks/{network_id}/devices")).await
    }

    /// `GET /devices/{serial}`
    pub async fn get_device(&self, serial: &str) -> Result<Device, Error> {
        self.get(&format!("devices/{serial}")).await
    }

    /// `PUT /devices/{serial}`
    pub async fn update_device(
        &self,
        serial: &str,
        body: &UpdateDeviceRequest,
    ) -> Result<Device, Error> {
        self.put(&format!("devices/{serial}"), body).await
    }

    /// `POST /networks/{networkId}/devices/claim`
    pub async fn claim_network_devices(
        &self,
        network_id: &str,
        body: &ClaimNetworkDevicesRequest,
    ) -> Result<(), Error> {
        self.post_no_response(&format!("networks/{network_id}/devices/claim"), body)
            .await
    }

    /// `POST /networks/{networkId}/devices/remove`
    pub async fn remove_network_devices(
        &self,
        network_id: &str,
        body: &RemoveNetworkDevicesRequest,
    ) -> Result<(), Error> {
        self.post_no_response(&format!("networks/{network_id}/devices/remove"), body)
            .await
    }

    // ── Wireless SSIDs ───────────────────────────────────────────────

    /// `GET /networks/{networkId}/wireless/ssids`
    pub async fn get_network_wireless_ssids(
        &self,
        network_id: &str,
    ) -> Result<Vec<WirelessSsid>, Error> {
        self.get(&format!("networks/{network_id}/wireless/ssids"))
            .await
    }

    /// `GET /networks/{networkId}/wireless/ssids/{number}`
    pub async fn get_network_wireless_ssid(
        &self,
        network_id: &str,
        number: i64,
    ) -> Result<WirelessSsid, Error> {
        self.get(&format!("networks/{network_id}/wireless/ssids/{number}"))
            .await
    }

    /// `PUT /networks/{networkId}/wireless/ssids/{number}`
    pub async fn update_network_wireless_ssid(
        &self,
        network_id: &str,
        number: i64,
        body: &UpdateWirelessSsidRequest,
    ) -> Result<WirelessSsid, Error> {
        self.put(
            &format!("networks/{network_id}/wireless/ssids/{number}"),
            body,
        )
        .await
    }

    // ── Appliance VLANs ──────────────────────────────────────────────

    /// `GET /networks/{networkId}/appliance/vlans`
    pub async fn get_network_appliance_vlans(
        &self,
        network_id: &str,
    ) -> Result<Vec<ApplianceVlan>, Error> {
        self.get(&format!("networks/{network_id}/appliance/vlans"))
            .await
    }

    /// `GET /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn get_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
    ) -> Result<ApplianceVlan, Error> {
        self.get(&format!("networks/{network_id}/appliance/vlans/{vlan_id}"))
            .await
    }

    /// `POST /networks/{networkId}/appliance/vlans`
    pub async fn create_network_appliance_vlan(
        &self,
        network_id: &str,
        body: &CreateApplianceVlanRequest,
    ) -> Result<ApplianceVlan, Error> {
        self.post(&format!("networks/{network_id}/appliance/vlans"), body)
            .await
    }

    /// `PUT /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn update_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
        body: &UpdateApplianceVlanRequest,
    ) -> Result<ApplianceVlan, Error> {
        self.put(
            &format!("networks/{network_id}/appliance/vlans/{vlan_id}"),
            body,
        )
        .await
    }

    /// `DELETE /networks/{networkId}/appliance/vlans/{vlanId}`
    pub async fn delete_network_appliance_vlan(
        &self,
        network_id: &str,
        vlan_id: &str,
    ) -> Result<(), Error> {
        self.delete(&format!("networks/{network_id}/appliance/vlans/{vlan_id}"))
            .await
    }

    /// `GET /networks/{networkId}/appliance/vlans/settings`
    pub async fn get_network_appliance_vlans_settings(
        &self,
        network_id: &str,
    ) -> Result<ApplianceVlansSettings, Error> {
        self.get(&format!("networks/{network_id}/appliance/vlans/settings"))
            .await
    }

    /// `PUT /networks/{networkId}/appliance/vlans/settings`
    pub async fn update_network_appliance_vlans_settings(
        &self,
        network_id: &str,
        body: &ApplianceVlansSettings,
    ) -> Result<ApplianceVlansSettings, Error> {
        self.put(
            &format!("networks/{network_id}/appliance/vlans/settings"),
            body,
        )
        .await
    }

    // ── Appliance L3 firewall rules ──────────────────────────────────

    /// `GET /networks/{networkId}/appliance/firewall/l3FirewallRules`
    pub async fn get_network_appliance_firewall_l3_rules(
        &self,
        network_id: &str,
    ) -> Result<L3FirewallRules, Error> {
        self.get(&format!(
            "networks/{network_id}/appliance/firewall/l3FirewallRules"
        ))
        .await
    }

    /// `PUT /networks/{networkId}/appliance/firewall/l3FirewallRules`
    pub async fn update_network_appliance_firewall_l3_rules(
        &self,
        network_id: &str,
        body: &UpdateL3FirewallRulesRequest,
    ) -> Result<L3FirewallRules, Error> {
        self.put(
            &format!("networks/{network_id}/appliance/firewall/l3FirewallRules"),
            body,
        )
        .await
    }

    // ── Admins ───────────────────────────────────────────────────────

    /// `GET /organizations/{organizationId}/admins`
    pub async fn get_organization_admins(&self, organization_id: &str) -> Result<Vec<Admin>, Error> {
        self.get(&format!("organizations/{organization_id}/admins"))
            .await
    }

    /// `POST /organizations/{organizationId}/admins`
    pub async fn create_organization_admin(
        &self,
        organization_id: &str,
        body: &CreateAdminRequest,
    ) -> Result<Admin, Error> {
        self.post(&format!("organizations/{organization_id}/admins"), body)
            .await
    }

    /// `PUT /organizations/{organizationId}/admins/{adminId}`
    pub async fn update_organization_admin(
        &self,
        organization_id: &str,
        admin_id: &str,
        body: &UpdateAdminRequest,
    ) -> Result<Admin, Error> {
        self.put(
            &format!("organizations/{organization_id}/admins/{admin_id}"),
            body,
        )
        .await
    }

    /// `DELETE /organizations/{organizationId}/admins/{adminId}`
    pub async fn delete_organization_admin(
        &self,
        organization_id: &str,
        admin_id: &str,
    ) -> Result<(), Error> {
        self.delete(&format!(
            "organizations/{organization_id}/admins/{admin_id}"
        ))
        .await
    }
}
