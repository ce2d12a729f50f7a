//! Registry snapshots for provenance.
//!
//! A snapshot records which registry produced a resolution, so a reported
//! status can be traced back to the exact capability table.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

use crate::registry::CapabilityRegistry;
use crate::resolve::RegistrySource;

/// A frozen summary of the registry in use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    /// Where the registry was loaded from.
    pub source: String,

    /// Path of the registry file (None for the built-in table).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Registry schema version.
    pub schema_version: String,

    /// Default baseline set name.
    pub default_set: String,

    /// Registered baseline set names, sorted.
    pub sets: Vec<String>,

    /// Number of known capabilities.
    pub known_count: usize,

    /// SHA-256 of the registry's canonical JSON.
    pub fingerprint: String,
}

impl RegistrySnapshot {
    /// Capture a snapshot of a registry.
    pub fn capture(
        registry: &CapabilityRegistry,
        source: RegistrySource,
        path: Option<&Path>,
    ) -> Self {
        RegistrySnapshot {
            source: source.to_string(),
            path: path.map(|p| p.display().to_string()),
            schema_version: registry.schema_version.clone(),
            default_set: registry.default_set.clone(),
            sets: registry.sets.keys().cloned().collect(),
            known_count: registry.known.len(),
            fingerprint: fingerprint(registry),
        }
    }
}

/// SHA-256 over the canonical JSON form of a registry.
///
/// Sets and maps are ordered, so equal registries always hash equally.
pub fn fingerprint(registry: &CapabilityRegistry) -> String {
    let canonical = registry.to_json().unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
