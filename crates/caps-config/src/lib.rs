//! Capability resolver configuration.
//!
//! This crate provides the collaborators that feed the resolver:
//! - The capability registry (built-in table or registry.json)
//! - Declared capabilities specs and the manifests that carry them
//! - Registry path resolution (CLI → env → XDG → system → builtin)
//! - Semantic validation of specs and registries
//! - Registry snapshots for provenance

pub mod load;
pub mod manifest;
pub mod registry;
pub mod resolve;
pub mod snapshot;
pub mod validate;

pub use load::{load_manifest, load_registry, ConfigError, LoadedRegistry};
pub use manifest::{CapabilitiesSpec, Manifest};
pub use registry::CapabilityRegistry;
pub use resolve::{resolve_registry_path, RegistrySource};
pub use snapshot::RegistrySnapshot;
pub use validate::{ValidationError, ValidationResult};

/// Schema version for registry files.
pub const REGISTRY_SCHEMA_VERSION: &str = "1.0.0";
