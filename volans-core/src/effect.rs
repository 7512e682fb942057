//! Effect - Side effects as values
//!
//! An Effect describes one dashboard operation without performing it.
//! Effects are collected into a Plan, displayed, then applied.

use crate::resource::{Resource, ResourceId, State};

/// A single pending operation against the dashboard
#[derive(Debug, Clone)]
pub enum Effect {
    /// Refresh a data source (read-only, never mutates)
    Read(ResourceId),
    /// Resource does not exist remotely -> create it
    Create(Resource),
    /// Resource exists with differences -> update it
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
    },
    /// Resource exists remotely but is no longer declared -> delete it
    Delete(ResourceId),
}

impl Effect {
    /// Returns whether applying this Effect mutates remote state
    pub fn is_mutating(&self) -> bool {
        !matches!(self, Effect::Read(_))
    }

    /// The identity of the resource this Effect touches
    pub fn resource_id(&self) -> &ResourceId {
        match self {
            Effect::Read(id) | Effect::Delete(id) => id,
            Effect::Create(r) => &r.id,
            Effect::Update { id, .. } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_is_not_mutating() {
        let effect = Effect::Read(ResourceId::new("networks", "all"));
        assert!(!effect.is_mutating());
    }

    #[test]
    fn create_is_mutating() {
        let effect = Effect::Create(Resource::new("network", "branch"));
        assert!(effect.is_mutating());
        assert_eq!(effect.resource_id().name, "branch");
    }
}
