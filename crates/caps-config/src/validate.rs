//! Configuration validation errors and semantic validation.
//!
//! The resolver trusts its inputs. Anything a user can get wrong (an
//! unregistered baseline name, a registry whose sets reference unknown
//! capabilities) is caught here, before resolution.

use caps_common::Capability;
use thiserror::Error;

use crate::manifest::CapabilitiesSpec;
use crate::registry::{CapabilityRegistry, SET_NONE};

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown baseline capability set: {name} (registered: {registered})")]
    UnknownBaselineSet { name: String, registered: String },

    #[error("Default baseline set {0} is not registered")]
    MissingDefaultSet(String),

    #[error("Baseline set {set} references unknown capability {capability}")]
    UnknownSetMember { set: String, capability: String },

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::UnknownBaselineSet { .. } => 62,
            ValidationError::MissingDefaultSet(_) => 63,
            ValidationError::UnknownSetMember { .. } => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate a declared spec against a registry.
///
/// Only the baseline name can make a spec invalid. Unknown additional
/// capabilities are allowed; see [`unknown_capabilities`].
pub fn validate_spec(
    spec: Option<&CapabilitiesSpec>,
    registry: &CapabilityRegistry,
) -> ValidationResult<()> {
    let Some(name) = spec.and_then(CapabilitiesSpec::baseline_name) else {
        return Ok(());
    };

    if !registry.has_set(name) {
        return Err(ValidationError::UnknownBaselineSet {
            name: name.to_string(),
            registered: registry.set_names().join(", "),
        });
    }

    Ok(())
}

/// Additional capabilities in a declared spec that the registry does not know.
///
/// These stay enabled after resolution; callers decide whether to warn.
/// Duplicates are reported once, in first-seen order.
pub fn unknown_capabilities(
    spec: Option<&CapabilitiesSpec>,
    registry: &CapabilityRegistry,
) -> Vec<Capability> {
    let mut unknown: Vec<Capability> = Vec::new();
    for cap in spec
        .map(|s| s.additional_enabled_capabilities.as_slice())
        .unwrap_or_default()
    {
        if !registry.is_known(cap.as_str()) && !unknown.contains(cap) {
            unknown.push(cap.clone());
        }
    }
    unknown
}

/// Validate a registry semantically.
pub fn validate_registry(registry: &CapabilityRegistry) -> ValidationResult<()> {
    if registry.schema_version != crate::REGISTRY_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::REGISTRY_SCHEMA_VERSION.to_string(),
            actual: registry.schema_version.clone(),
        });
    }

    if registry.default_set.is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "default_set".to_string(),
            message: "Must name a baseline set".to_string(),
        });
    }

    if !registry.has_set(&registry.default_set) {
        return Err(ValidationError::MissingDefaultSet(
            registry.default_set.clone(),
        ));
    }

    if let Some(none) = registry.baseline(SET_NONE) {
        if !none.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: format!("sets.{}", SET_NONE),
                message: format!("Must be empty, got {} capabilities", none.len()),
            });
        }
    }

    for (name, members) in &registry.sets {
        if name.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "sets".to_string(),
                message: "Baseline set names must not be empty".to_string(),
            });
        }
        if let Some(unknown) = members.iter().find(|cap| !registry.known.contains(*cap)) {
            return Err(ValidationError::UnknownSetMember {
                set: name.clone(),
                capability: unknown.to_string(),
            });
        }
    }

    Ok(())
}
