//! Capability resolution.
//!
//! `resolve` turns (registry, declared spec, previously enabled list) into a
//! [`ClusterCapabilities`]:
//! - `known` is the registry universe, whatever the inputs
//! - `enabled` is baseline ∪ additional ∪ carried-forward
//! - `implicitly_enabled` is what was enabled before but is no longer
//!   selected by baseline ∪ additional
//!
//! Carry-forward makes enablement monotonic: picking a smaller baseline never
//! silently disables a capability that is already running.

use caps_common::{Capability, CapabilitySet};
use caps_config::{CapabilitiesSpec, CapabilityRegistry};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Resolved capability state of a cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClusterCapabilities {
    /// Every capability the registry recognizes.
    pub known: CapabilitySet,

    /// Every capability that is on.
    pub enabled: CapabilitySet,

    /// Capabilities kept on only because they were on before.
    ///
    /// `None` and an empty set both mean nothing was carried forward.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implicitly_enabled: Option<CapabilitySet>,
}

impl ClusterCapabilities {
    /// Whether a capability is enabled.
    pub fn is_enabled(&self, capability: &str) -> bool {
        self.enabled.contains(capability)
    }

    /// Whether a capability is known to the registry.
    pub fn is_known(&self, capability: &str) -> bool {
        self.known.contains(capability)
    }

    /// Whether a capability was carried forward.
    pub fn is_implicitly_enabled(&self, capability: &str) -> bool {
        self.implicitly_enabled
            .as_ref()
            .is_some_and(|set| set.contains(capability))
    }

    /// Carried-forward capabilities in name order.
    pub fn implicitly_enabled(&self) -> impl Iterator<Item = &Capability> {
        self.implicitly_enabled.iter().flatten()
    }

    /// Whether anything was carried forward.
    pub fn has_implicitly_enabled(&self) -> bool {
        self.implicitly_enabled
            .as_ref()
            .is_some_and(|set| !set.is_empty())
    }

    /// Enabled capabilities the registry does not know.
    pub fn unknown_enabled(&self) -> impl Iterator<Item = &Capability> {
        self.enabled.difference(&self.known)
    }
}

/// Resolve the capability state for a declared spec.
///
/// - `spec` absent, or naming no baseline set, selects the registry default.
/// - A baseline name the registry does not have enables nothing; validate the
///   spec first to report it (`caps_config::validate::validate_spec`).
/// - `prior_enabled` is the enabled list from the previous reconciliation and
///   may contain duplicates.
pub fn resolve(
    registry: &CapabilityRegistry,
    spec: Option<&CapabilitiesSpec>,
    prior_enabled: &[Capability],
) -> ClusterCapabilities {
    let mut enabled = baseline(registry, spec).clone();
    if let Some(spec) = spec {
        enabled.extend(spec.additional_enabled_capabilities.iter().cloned());
    }

    let implicit: CapabilitySet = prior_enabled
        .iter()
        .filter(|cap| !enabled.contains(*cap))
        .cloned()
        .collect();
    enabled.extend(implicit.iter().cloned());

    tracing::debug!(
        known = registry.known.len(),
        enabled = enabled.len(),
        implicitly_enabled = implicit.len(),
        "resolved capabilities"
    );

    ClusterCapabilities {
        known: registry.known.clone(),
        enabled,
        implicitly_enabled: non_empty(implicit),
    }
}

/// Mark capabilities as carried forward on an already-resolved state.
///
/// Every name in `implicit` ends up both enabled and implicitly enabled, even
/// if it was already enabled. Earlier implicit markings are replaced, not
/// merged. An empty `implicit` clears the marking.
pub fn apply_implicitly_enabled(
    implicit: &[Capability],
    capabilities: &ClusterCapabilities,
) -> ClusterCapabilities {
    let marked: CapabilitySet = implicit.iter().cloned().collect();

    let mut enabled = capabilities.enabled.clone();
    enabled.extend(marked.iter().cloned());

    ClusterCapabilities {
        known: capabilities.known.clone(),
        enabled,
        implicitly_enabled: non_empty(marked),
    }
}

fn baseline<'r>(
    registry: &'r CapabilityRegistry,
    spec: Option<&CapabilitiesSpec>,
) -> &'r CapabilitySet {
    static EMPTY: CapabilitySet = CapabilitySet::new();

    match spec.and_then(CapabilitiesSpec::baseline_name) {
        None => registry.default_baseline(),
        Some(name) => registry.baseline(name).unwrap_or_else(|| {
            tracing::warn!(
                baseline_capability_set = name,
                "unknown baseline capability set, enabling no baseline capabilities"
            );
            &EMPTY
        }),
    }
}

fn non_empty(set: CapabilitySet) -> Option<CapabilitySet> {
    (!set.is_empty()).then_some(set)
}
