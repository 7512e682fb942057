//! Call-strategy selection for data source reads
//!
//! Several data sources can be served by more than one endpoint
//! depending on which filter attributes are set: a device lookup can go
//! through `GET /devices/{serial}`, `GET /networks/{id}/devices`, or
//! `GET /organizations/{id}/devices`. `pick_method` selects the first
//! strategy whose required attributes are all present and non-null.
//! Strategies are ordered most-specific first.

use std::collections::HashMap;

use volans_core::resource::Value;

/// One way of satisfying a read, keyed by the attributes it needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    /// Strategy name, used for dispatch and diagnostics
    pub name: &'static str,
    /// Attributes that must be present and non-null to use this strategy
    pub requires: &'static [&'static str],
}

/// Select the first viable strategy for the given attributes
///
/// Returns `None` when no strategy's requirements are met; the caller
/// reports that as a configuration diagnostic.
pub fn pick_method<'a>(
    strategies: &'a [Strategy],
    attributes: &HashMap<String, Value>,
) -> Option<&'a Strategy> {
    strategies.iter().find(|strategy| {
        strategy
            .requires
            .iter()
            .all(|attr| attributes.get(*attr).is_some_and(|v| !v.is_null()))
    })
}

/// Describe what the strategies would have needed, for diagnostics
pub fn describe_strategies(strategies: &[Strategy]) -> String {
    strategies
        .iter()
        .map(|s| {
            if s.requires.is_empty() {
                "(no arguments)".to_string()
            } else {
                s.requires.join(" + ")
            }
        })
        .collect::<Vec<_>>()
        .join(", or ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEVICE_STRATEGIES: &[Strategy] = &[
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

    #[test]
    fn most_specific_strategy_wins() {
        let attrs = HashMap::from([
            (
                "serial".to_string(),
                Value::String("Q2XX-ABCD-1234".to_string()),
            ),
            (
                "network_id".to_string(),
                Value::String("N_555".to_string()),
            ),
        ]);

        let picked = pick_method(DEVICE_STRATEGIES, &attrs).unwrap();
        assert_eq!(picked.name, "by_serial");
    }

    #[test]
    fn falls_through_to_less_specific() {
        let attrs = HashMap::from([(
            "network_id".to_string(),
            Value::String("N_555".to_string()),
        )]);

        let picked = pick_method(DEVICE_STRATEGIES, &attrs).unwrap();
        assert_eq!(picked.name, "by_network");
    }

    #[test]
    fn null_attribute_does_not_satisfy() {
        let attrs = HashMap::from([("serial".to_string(), Value::Null)]);

        let picked = pick_method(DEVICE_STRATEGIES, &attrs).unwrap();
        assert_eq!(picked.name, "by_organization");
    }

    #[test]
    fn no_viable_strategy() {
        let strategies = &[Strategy {
            name: "by_serial",
            requires: &["serial"],
        }];

        let picked = pick_method(strategies, &HashMap::new());
        assert!(picked.is_none());
    }

    #[test]
    fn describe_lists_requirements() {
        let described = describe_strategies(DEVICE_STRATEGIES);
        assert!(described.contains("serial"));
        assert!(described.contains("network_id"));
        assert!(described.contains("(no arguments)"));
    }
}
