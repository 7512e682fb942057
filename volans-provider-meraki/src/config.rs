//! Provider configuration
//!
//! Mirrors the standard dashboard provider settings: API key, base URL,
//! organization scope, and request timeout. The key can come from the
//! declaration file or from `MERAKI_DASHBOARD_API_KEY`.

use std::time::Duration;

use secrecy::SecretString;

use volans_meraki_api::client::DEFAULT_BASE_URL;

/// Environment variable consulted when no key is configured explicitly
pub const API_KEY_ENV: &str = "MERAKI_DASHBOARD_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for constructing a `MerakiProvider`
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// Organization scope for org-level operations (networks, devices,
    /// admins). Optional: managing organizations themselves doesn't
    /// need it.
    pub organization_id: Option<String>,
    pub timeout: Duration,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No API key configured and {API_KEY_ENV} is not set")]
    MissingApiKey,

    #[error("Organization id is required for this operation")]
    MissingOrganizationId,
}

impl ProviderConfig {
    /// Build a config from an explicit key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            base_url: DEFAULT_BASE_URL.to_string(),
            organization_id: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Build a config, falling back to `MERAKI_DASHBOARD_API_KEY` when
    /// no key is given
    pub fn resolve(api_key: Option<String>) -> Result<Self, ConfigError> {
        let key = match api_key {
            Some(key) if !key.is_empty() => key,
            _ => std::env::var(API_KEY_ENV).map_err(|_| ConfigError::MissingApiKey)?,
        };
        Ok(Self::new(key))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_organization_id(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured organization id, or an error for org-scoped calls
    pub fn require_organization_id(&self) -> Result<&str, ConfigError> {
        self.organization_id
            .as_deref()
            .ok_or(ConfigError::MissingOrganizationId)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_wins() {
        let config = ProviderConfig::resolve(Some("abc123".to_string())).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn builder_chain() {
        let config = ProviderConfig::new("abc123")
            .with_base_url("https://api.meraki.cn/api/v1")
            .with_organization_id("2930418")
            .with_timeout(Duration::from_secs(5));

        assert_eq!(config.base_url, "https://api.meraki.cn/api/v1");
        assert_eq!(config.require_organization_id().unwrap(), "2930418");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_organization_id_is_an_error() {
        let config = ProviderConfig::new("abc123");
        assert!(config.require_organization_id().is_err());
    }
}
