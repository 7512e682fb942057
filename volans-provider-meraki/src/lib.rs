//! Volans Meraki Provider
//!
//! Maps Meraki Dashboard API endpoints onto Volans resources and data
//! sources.
//!
//! ## Module Structure
//!
//! - `config` - Provider settings (API key, base URL, organization scope)
//! - `provider` - MerakiProvider implementation
//! - `resources` - Resource type definitions
//! - `schemas` - Per-endpoint resource schemas
//! - `mapping` - Attribute name translation between declarations and the wire
//! - `pick` - Call-strategy selection for data source reads
//! - `case_convert` - snake_case/camelCase fallbacks

pub mod case_convert;
pub mod config;
pub mod mapping;
pub mod pick;
pub mod provider;
pub mod resources;
pub mod schemas;

// Re-export main types
pub use config::{ProviderConfig, API_KEY_ENV};
pub use provider::MerakiProvider;

use volans_core::provider::{BoxFuture, Provider, ProviderResult};
use volans_core::resource::{Resource, ResourceId, State};

use resources::resource_types;

// =============================================================================
// Provider Trait Implementation
// =============================================================================

impl Provider for MerakiProvider {
    fn name(&self) -> &'static str {
        "meraki"
    }

    fn resource_types(&self) -> Vec<Box<dyn volans_core::provider::ResourceType>> {
        resource_types()
    }

    fn read(
        &self,
        resource: &Resource,
        identifier: Option<&str>,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        let identifier = identifier.map(|s| s.to_string());
        Box::pin(async move { self.read_resource(&resource, identifier.as_deref()).await })
    }

    fn create(&self, resource: &Resource) -> BoxFuture<'_, ProviderResult<State>> {
        let resource = resource.clone();
        Box::pin(async move { self.create_resource(resource).await })
    }

    fn update(
        &self,
        id: &ResourceId,
        identifier: &str,
        _from: &State,
        to: &Resource,
    ) -> BoxFuture<'_, ProviderResult<State>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        let to = to.clone();
        Box::pin(async move { self.update_resource(id, &identifier, to).await })
    }

    fn delete(&self, id: &ResourceId, identifier: &str) -> BoxFuture<'_, ProviderResult<()>> {
        let id = id.clone();
        let identifier = identifier.to_string();
        Box::pin(async move { self.delete_resource(&id, &identifier).await })
    }
}
