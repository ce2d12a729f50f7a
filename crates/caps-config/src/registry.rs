//! The capability registry: known capability names and baseline sets.
//!
//! A registry is an injected constant. The resolver never reaches for global
//! state, so several registries (a built-in table, a file-loaded table, test
//! tables) can coexist in one process.
//!
//! The built-in table tracks the cluster-version capability history:
//! - `None`: nothing enabled
//! - `v4.11` .. `v4.16`: the defaults shipped with each release
//! - `vCurrent`: every known capability (the default baseline)

use caps_common::{Capability, CapabilitySet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Name of the baseline set that enables nothing.
pub const SET_NONE: &str = "None";

/// Name of the default baseline set.
pub const SET_CURRENT: &str = "vCurrent";

pub const CAP_BAREMETAL: &str = "baremetal";
pub const CAP_MARKETPLACE: &str = "marketplace";
pub const CAP_OPENSHIFT_SAMPLES: &str = "openshift-samples";
pub const CAP_CONSOLE: &str = "Console";
pub const CAP_INSIGHTS: &str = "Insights";
pub const CAP_STORAGE: &str = "Storage";
pub const CAP_CSI_SNAPSHOT: &str = "CSISnapshot";
pub const CAP_NODE_TUNING: &str = "NodeTuning";
pub const CAP_MACHINE_API: &str = "MachineAPI";
pub const CAP_BUILD: &str = "Build";
pub const CAP_DEPLOYMENT_CONFIG: &str = "DeploymentConfig";
pub const CAP_IMAGE_REGISTRY: &str = "ImageRegistry";
pub const CAP_OPERATOR_LIFECYCLE_MANAGER: &str = "OperatorLifecycleManager";
pub const CAP_CLOUD_CREDENTIAL: &str = "CloudCredential";
pub const CAP_INGRESS: &str = "Ingress";
pub const CAP_CLOUD_CONTROLLER_MANAGER: &str = "CloudControllerManager";

/// Versioned baseline sets, oldest first. Each set adds to the previous one.
const VERSIONED_SETS: &[(&str, &[&str])] = &[
    (
        "v4.11",
        &[
            CAP_BAREMETAL,
            CAP_MARKETPLACE,
            CAP_OPENSHIFT_SAMPLES,
            CAP_MACHINE_API,
        ],
    ),
    (
        "v4.12",
        &[CAP_CONSOLE, CAP_INSIGHTS, CAP_STORAGE, CAP_CSI_SNAPSHOT],
    ),
    ("v4.13", &[CAP_NODE_TUNING]),
    (
        "v4.14",
        &[CAP_BUILD, CAP_DEPLOYMENT_CONFIG, CAP_IMAGE_REGISTRY],
    ),
    (
        "v4.15",
        &[CAP_OPERATOR_LIFECYCLE_MANAGER, CAP_CLOUD_CREDENTIAL],
    ),
    ("v4.16", &[CAP_CLOUD_CONTROLLER_MANAGER, CAP_INGRESS]),
];

/// Known capability names and the baseline sets defined over them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityRegistry {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Baseline set used when a spec is absent or names no set.
    pub default_set: String,

    /// Every capability name the registry recognizes.
    pub known: CapabilitySet,

    /// Baseline set name → capabilities enabled by that set.
    pub sets: BTreeMap<String, CapabilitySet>,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CapabilityRegistry {
    /// The built-in cluster-version capability table.
    pub fn builtin() -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(SET_NONE.to_string(), CapabilitySet::new());

        let mut cumulative = CapabilitySet::new();
        for (name, added) in VERSIONED_SETS {
            cumulative.extend(added.iter().copied().map(Capability::from));
            sets.insert(name.to_string(), cumulative.clone());
        }
        sets.insert(SET_CURRENT.to_string(), cumulative.clone());

        CapabilityRegistry {
            schema_version: crate::REGISTRY_SCHEMA_VERSION.to_string(),
            default_set: SET_CURRENT.to_string(),
            known: cumulative,
            sets,
        }
    }

    /// Build a registry from explicit parts.
    pub fn new(
        known: impl IntoIterator<Item = Capability>,
        sets: impl IntoIterator<Item = (String, CapabilitySet)>,
        default_set: impl Into<String>,
    ) -> Self {
        CapabilityRegistry {
            schema_version: crate::REGISTRY_SCHEMA_VERSION.to_string(),
            default_set: default_set.into(),
            known: known.into_iter().collect(),
            sets: sets.into_iter().collect(),
        }
    }

    /// Load a registry from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_json(&content)
    }

    /// Parse a registry from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json).map_err(|e| {
            crate::validate::ValidationError::ParseError(format!("Invalid JSON: {}", e))
        })
    }

    /// Canonical JSON form (sorted keys and members).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Members of the named baseline set, if registered.
    pub fn baseline(&self, name: &str) -> Option<&CapabilitySet> {
        self.sets.get(name)
    }

    /// Members of the default baseline set.
    ///
    /// A registry that passed validation always has one; an unvalidated
    /// registry missing its default yields the empty set.
    pub fn default_baseline(&self) -> &CapabilitySet {
        static EMPTY: CapabilitySet = CapabilitySet::new();
        self.sets.get(&self.default_set).unwrap_or(&EMPTY)
    }

    /// Whether a baseline set with this name is registered.
    pub fn has_set(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }

    /// Whether a capability name is known.
    pub fn is_known(&self, capability: &str) -> bool {
        self.known.contains(capability)
    }

    /// Registered baseline set names, sorted.
    pub fn set_names(&self) -> Vec<&str> {
        self.sets.keys().map(String::as_str).collect()
    }
}
