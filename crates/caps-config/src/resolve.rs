//! Registry path discovery.
//!
//! Resolution order: CLI argument → environment variables → XDG paths →
//! system config → built-in table.

use std::path::{Path, PathBuf};

/// Where the capability registry came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RegistrySource {
    /// Explicitly provided via CLI argument.
    CliArgument,

    /// Set via environment variable.
    Environment,

    /// Found in XDG config directory.
    XdgConfig,

    /// Found in /etc/caps/.
    SystemConfig,

    /// Using the built-in table.
    #[default]
    Builtin,
}

impl std::fmt::Display for RegistrySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrySource::CliArgument => write!(f, "CLI argument"),
            RegistrySource::Environment => write!(f, "environment variable"),
            RegistrySource::XdgConfig => write!(f, "XDG config"),
            RegistrySource::SystemConfig => write!(f, "system config"),
            RegistrySource::Builtin => write!(f, "builtin"),
        }
    }
}

/// Environment variable names.
pub const ENV_REGISTRY_PATH: &str = "CAPS_REGISTRY";
pub const ENV_CONFIG_DIR: &str = "CAPS_CONFIG_DIR";

/// Standard registry file name.
const REGISTRY_FILENAME: &str = "registry.json";

/// Application name for XDG directories.
const APP_NAME: &str = "caps";

/// Resolve the registry file path.
///
/// An explicit CLI path is returned even if it does not exist, so that the
/// loader can report the missing file instead of silently falling back.
/// Every other candidate is used only if it exists.
///
/// 1. Explicit CLI path
/// 2. CAPS_REGISTRY environment variable
/// 3. CAPS_CONFIG_DIR environment variable + registry.json
/// 4. XDG config directory (~/.config/caps/registry.json)
/// 5. System config (/etc/caps/registry.json)
/// 6. Built-in table (None)
pub fn resolve_registry_path(cli_path: Option<&Path>) -> (Option<PathBuf>, RegistrySource) {
    if let Some(path) = cli_path {
        return (Some(path.to_path_buf()), RegistrySource::CliArgument);
    }

    if let Ok(env_path) = std::env::var(ENV_REGISTRY_PATH) {
        if !env_path.is_empty() {
            let path = PathBuf::from(env_path);
            if path.exists() {
                return (Some(path), RegistrySource::Environment);
            }
            tracing::warn!(
                path = %path.display(),
                "{} points at a missing file, ignoring it",
                ENV_REGISTRY_PATH
            );
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(REGISTRY_FILENAME);
        if path.exists() {
            return (Some(path), RegistrySource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(REGISTRY_FILENAME);
        if path.exists() {
            return (Some(path), RegistrySource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(REGISTRY_FILENAME);
    if system_path.exists() {
        return (Some(system_path), RegistrySource::SystemConfig);
    }

    (None, RegistrySource::Builtin)
}

/// Get the XDG config directory for caps.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// Get the system config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}
