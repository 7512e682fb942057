//! Differ - Compare desired state with current state to generate a Plan
//!
//! Compares the desired state from the declaration file with the current
//! state fetched from the dashboard, and generates a list of required
//! Effects (Plan).

use std::collections::HashMap;

use crate::effect::Effect;
use crate::plan::Plan;
use crate::resource::{Resource, ResourceId, State, Value};

/// Result of a diff operation
#[derive(Debug, Clone)]
pub enum Diff {
    /// Resource does not exist -> needs creation
    Create(Resource),
    /// Resource exists with differences -> needs update
    Update {
        id: ResourceId,
        from: State,
        to: Resource,
        changed_attributes: Vec<String>,
    },
    /// Resource exists with no differences -> no action needed
    NoChange(ResourceId),
    /// Resource exists but not in desired state -> needs deletion
    Delete(ResourceId),
}

impl Diff {
    /// Returns whether this Diff involves a change
    pub fn is_change(&self) -> bool {
        !matches!(self, Diff::NoChange(_))
    }
}

/// Compare desired state with current state to compute a Diff
pub fn diff(desired: &Resource, current: &State) -> Diff {
    if !current.exists {
        return Diff::Create(desired.clone());
    }

    let changed = find_changed_attributes(&desired.attributes, &current.attributes);

    if changed.is_empty() {
        Diff::NoChange(desired.id.clone())
    } else {
        Diff::Update {
            id: desired.id.clone(),
            from: current.clone(),
            to: desired.clone(),
            changed_attributes: changed,
        }
    }
}

/// Find changed attributes between desired and current state
///
/// Internal attributes (prefixed `_`) are skipped. A desired `Null`
/// matches an absent current key: the dashboard omits fields that were
/// never set, and that is not drift.
fn find_changed_attributes(
    desired: &HashMap<String, Value>,
    current: &HashMap<String, Value>,
) -> Vec<String> {
    let mut changed = Vec::new();

    for (key, desired_value) in desired {
        if key.starts_with('_') {
            continue;
        }

        match current.get(key) {
            Some(current_value) if current_value == desired_value => {}
            None if desired_value.is_null() => {}
            Some(Value::Null) if desired_value.is_null() => {}
            _ => changed.push(key.clone()),
        }
    }

    changed.sort();
    changed
}

/// Compute Diff for multiple resources and generate a Plan
///
/// Data sources contribute `Effect::Read`; declared resources contribute
/// mutations as needed.
pub fn create_plan(desired: &[Resource], current_states: &HashMap<ResourceId, State>) -> Plan {
    let mut plan = Plan::new();

    for resource in desired {
        if resource.is_data_source() {
            plan.add(Effect::Read(resource.id.clone()));
            continue;
        }

        let current = current_states
            .get(&resource.id)
            .cloned()
            .unwrap_or_else(|| State::not_found(resource.id.clone()));

        let d = diff(resource, &current);

        match d {
            Diff::Create(r) => plan.add(Effect::Create(r)),
            Diff::Update { id, from, to, .. } => {
                plan.add(Effect::Update { id, from, to });
            }
            Diff::NoChange(_) => {}
            Diff::Delete(id) => plan.add(Effect::Delete(id)),
        }
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_create_when_not_exists() {
        let desired = Resource::new("network", "branch");
        let current = State::not_found(ResourceId::new("network", "branch"));

        let result = diff(&desired, &current);
        assert!(matches!(result, Diff::Create(_)));
    }

    #[test]
    fn diff_no_change_when_same() {
        let desired = Resource::new("network", "branch")
            .with_attribute("time_zone", Value::String("America/Los_Angeles".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert(
            "time_zone".to_string(),
            Value::String("America/Los_Angeles".to_string()),
        );
        let current = State::existing(ResourceId::new("network", "branch"), attrs);

        let result = diff(&desired, &current);
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn diff_update_when_different() {
        let desired = Resource::new("network", "branch")
            .with_attribute("time_zone", Value::String("Europe/Amsterdam".to_string()));

        let mut attrs = HashMap::new();
        attrs.insert(
            "time_zone".to_string(),
            Value::String("America/Los_Angeles".to_string()),
        );
        let current = State::existing(ResourceId::new("network", "branch"), attrs);

        let result = diff(&desired, &current);
        match result {
            Diff::Update {
                changed_attributes, ..
            } => {
                assert!(changed_attributes.contains(&"time_zone".to_string()));
            }
            _ => panic!("Expected Update"),
        }
    }

    #[test]
    fn diff_null_matches_absent() {
        let desired = Resource::new("network", "branch").with_attribute("notes", Value::Null);

        let current = State::existing(ResourceId::new("network", "branch"), HashMap::new());

        let result = diff(&desired, &current);
        assert!(matches!(result, Diff::NoChange(_)));
    }

    #[test]
    fn create_plan_from_resources() {
        let resources = vec![
            Resource::new("network", "new-site"),
            Resource::new("network", "existing-site")
                .with_attribute("time_zone", Value::String("Europe/Amsterdam".to_string())),
            Resource::new("networks", "all").with_read_only(true),
        ];

        let mut current_states = HashMap::new();
        let mut attrs = HashMap::new();
        attrs.insert(
            "time_zone".to_string(),
            Value::String("America/Los_Angeles".to_string()),
        );
        current_states.insert(
            ResourceId::new("network", "existing-site"),
            State::existing(ResourceId::new("network", "existing-site"), attrs),
        );

        let plan = create_plan(&resources, &current_states);

        assert_eq!(plan.effects().len(), 3);
        assert!(matches!(plan.effects()[0], Effect::Create(_)));
        assert!(matches!(plan.effects()[1], Effect::Update { .. }));
        assert!(matches!(plan.effects()[2], Effect::Read(_)));
        assert_eq!(plan.mutation_count(), 2);
    }
}
