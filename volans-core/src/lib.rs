//! Volans Core
//!
//! Core library for a declarative resource manager over the Cisco Meraki
//! Dashboard API: the typed attribute model, resource schemas, diff/plan
//! machinery, and the state reconciliation helpers shared by providers.

pub mod convert;
pub mod differ;
pub mod effect;
pub mod merge;
pub mod plan;
pub mod provider;
pub mod resource;
pub mod schema;
