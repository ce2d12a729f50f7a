//! Reported capability status shape.

use crate::Capability;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Capabilities as reported in cluster status.
///
/// Both lists are duplicate-free. An empty list is serialized as `[]`,
/// never omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesStatus {
    /// Capabilities currently enabled.
    #[serde(default)]
    pub enabled_capabilities: Vec<Capability>,

    /// Every capability the cluster recognizes.
    #[serde(default)]
    pub known_capabilities: Vec<Capability>,
}
