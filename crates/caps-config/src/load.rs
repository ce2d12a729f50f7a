//! Loading registries and manifests from disk.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::manifest::{Manifest, ManifestFormat};
use crate::registry::CapabilityRegistry;
use crate::resolve::{resolve_registry_path, RegistrySource};
use crate::snapshot::RegistrySnapshot;
use crate::validate::{validate_registry, ValidationError};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid registry file {path}: {message}")]
    RegistryParse { path: PathBuf, message: String },

    #[error("Invalid manifest {path}: {message}")]
    ManifestParse { path: PathBuf, message: String },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<ConfigError> for caps_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::IoError { source, .. } => caps_common::Error::Io(source),
            ConfigError::ValidationError(inner) => inner.into(),
            ConfigError::RegistryParse { .. } => {
                caps_common::Error::InvalidRegistry(err.to_string())
            }
            ConfigError::ManifestParse { .. } => {
                caps_common::Error::InvalidManifest(err.to_string())
            }
            ConfigError::NotFound { .. } => caps_common::Error::Config(err.to_string()),
        }
    }
}

impl From<ValidationError> for caps_common::Error {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::UnknownBaselineSet { name, .. } => {
                caps_common::Error::UnknownBaselineSet { name }
            }
            ValidationError::MissingDefaultSet(_)
            | ValidationError::UnknownSetMember { .. }
            | ValidationError::VersionMismatch { .. } => {
                caps_common::Error::InvalidRegistry(err.to_string())
            }
            other => caps_common::Error::Config(other.to_string()),
        }
    }
}

/// A validated registry with provenance information.
#[derive(Debug, Clone)]
pub struct LoadedRegistry {
    /// The registry itself.
    pub registry: CapabilityRegistry,

    /// Where it was found.
    pub source: RegistrySource,

    /// Registry file path (None for the built-in table).
    pub path: Option<PathBuf>,
}

impl LoadedRegistry {
    /// Snapshot for reports.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot::capture(&self.registry, self.source, self.path.as_deref())
    }
}

/// Load and validate the capability registry.
///
/// Falls back to the built-in table when no registry file is found.
pub fn load_registry(cli_path: Option<&Path>) -> Result<LoadedRegistry, ConfigError> {
    let (path, source) = resolve_registry_path(cli_path);

    let Some(path) = path else {
        tracing::debug!(source = %source, "using built-in capability registry");
        return Ok(LoadedRegistry {
            registry: CapabilityRegistry::builtin(),
            source,
            path: None,
        });
    };

    if !path.exists() {
        return Err(ConfigError::NotFound { path });
    }

    let registry = CapabilityRegistry::from_file(&path).map_err(|e| match e {
        ValidationError::IoError(message) => ConfigError::IoError {
            path: path.clone(),
            source: std::io::Error::other(message),
        },
        ValidationError::ParseError(message) => ConfigError::RegistryParse {
            path: path.clone(),
            message,
        },
        other => ConfigError::ValidationError(other),
    })?;

    validate_registry(&registry)?;

    tracing::debug!(
        source = %source,
        path = %path.display(),
        sets = registry.sets.len(),
        known = registry.known.len(),
        "loaded capability registry"
    );

    Ok(LoadedRegistry {
        registry,
        source,
        path: Some(path),
    })
}

/// Load a cluster-version manifest (YAML or JSON).
pub fn load_manifest(path: &Path) -> Result<Manifest, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
        path: path.to_path_buf(),
        source: e,
    })?;

    Manifest::parse(&content, ManifestFormat::from_path(path)).map_err(|e| {
        ConfigError::ManifestParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cli_registry_is_not_found() {
        let err = load_registry(Some(Path::new("/no/such/registry.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_unreadable_registry_is_io_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let err = load_registry(Some(temp.path())).unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));

        let common: caps_common::Error = err.into();
        assert_eq!(common.code(), 60);
    }

    #[test]
    fn test_registry_parse_error_keeps_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("registry.json");
        std::fs::write(&path, "{\"known\": [").unwrap();

        match load_registry(Some(&path)).unwrap_err() {
            ConfigError::RegistryParse { path: reported, message } => {
                assert_eq!(reported, path);
                assert!(message.starts_with("Invalid JSON"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_manifest_is_not_found() {
        let err = load_manifest(Path::new("/no/such/cv.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_unknown_baseline_maps_to_common_error() {
        let err: caps_common::Error = ValidationError::UnknownBaselineSet {
            name: "v9".to_string(),
            registered: "None".to_string(),
        }
        .into();
        assert_eq!(err.code(), 11);
    }

    #[test]
    fn test_manifest_parse_maps_to_invalid_manifest() {
        let err: caps_common::Error = ConfigError::ManifestParse {
            path: PathBuf::from("cv.yaml"),
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(err.code(), 13);
    }
}
