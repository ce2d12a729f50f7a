//! Cluster-version manifests and the declared capabilities spec they carry.
//!
//! Only the capability-related parts of the document are modeled; every other
//! field is ignored on parse.
//!
//! ```yaml
//! spec:
//!   capabilities:
//!     baselineCapabilitySet: v4.11
//!     additionalEnabledCapabilities: [Console]
//! status:
//!   capabilities:
//!     enabledCapabilities: [baremetal, marketplace]
//!     knownCapabilities: [baremetal, marketplace, Console]
//! ```

use caps_common::{CapabilitiesStatus, Capability};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::validate::{ValidationError, ValidationResult};

/// Administrator-declared capability selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitiesSpec {
    /// Baseline set name; absent or empty selects the registry default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_capability_set: Option<String>,

    /// Capabilities enabled on top of the baseline. May contain duplicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_enabled_capabilities: Vec<Capability>,
}

impl CapabilitiesSpec {
    /// Spec selecting a baseline set with no additions.
    pub fn with_baseline(name: impl Into<String>) -> Self {
        CapabilitiesSpec {
            baseline_capability_set: Some(name.into()),
            additional_enabled_capabilities: Vec::new(),
        }
    }

    /// Add capabilities to enable on top of the baseline.
    pub fn with_additional<I, C>(mut self, additional: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Capability>,
    {
        self.additional_enabled_capabilities
            .extend(additional.into_iter().map(Into::into));
        self
    }

    /// The explicitly named baseline set, treating `""` as unset.
    pub fn baseline_name(&self) -> Option<&str> {
        self.baseline_capability_set
            .as_deref()
            .filter(|name| !name.is_empty())
    }
}

/// `spec` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<CapabilitiesSpec>,
}

/// `status` section of a manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capabilities: Option<CapabilitiesStatus>,
}

/// A cluster-version manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub spec: ManifestSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ManifestStatus>,
}

/// Serialization used for a manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Json,
    Yaml,
    /// Unknown extension: JSON is tried first, then YAML.
    Auto,
}

impl ManifestFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ManifestFormat::Json,
            Some("yaml") | Some("yml") => ManifestFormat::Yaml,
            _ => ManifestFormat::Auto,
        }
    }
}

impl Manifest {
    /// Parse a manifest in the given format.
    pub fn parse(content: &str, format: ManifestFormat) -> ValidationResult<Self> {
        match format {
            ManifestFormat::Json => serde_json::from_str(content)
                .map_err(|e| ValidationError::ParseError(format!("Invalid JSON: {}", e))),
            ManifestFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ValidationError::ParseError(format!("Invalid YAML: {}", e))),
            ManifestFormat::Auto => serde_json::from_str(content).or_else(|_| {
                serde_yaml::from_str(content).map_err(|e| {
                    ValidationError::ParseError(format!("Neither JSON nor YAML: {}", e))
                })
            }),
        }
    }

    /// The declared capabilities spec, if any.
    pub fn capabilities(&self) -> Option<&CapabilitiesSpec> {
        self.spec.capabilities.as_ref()
    }

    /// Capabilities enabled in the previously observed status.
    ///
    /// Empty when the manifest has no status yet (first reconciliation).
    pub fn prior_enabled(&self) -> Vec<Capability> {
        self.status
            .as_ref()
            .and_then(|status| status.capabilities.as_ref())
            .map(|caps| caps.enabled_capabilities.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_name_treats_empty_as_unset() {
        assert_eq!(CapabilitiesSpec::default().baseline_name(), None);
        assert_eq!(CapabilitiesSpec::with_baseline("").baseline_name(), None);
        assert_eq!(
            CapabilitiesSpec::with_baseline("v4.11").baseline_name(),
            Some("v4.11")
        );
    }

    #[test]
    fn test_with_additional_keeps_order_and_duplicates() {
        let spec = CapabilitiesSpec::with_baseline("None").with_additional(["b", "a", "b"]);
        let names: Vec<&str> = spec
            .additional_enabled_capabilities
            .iter()
            .map(Capability::as_str)
            .collect();
        assert_eq!(names, vec!["b", "a", "b"]);
    }

    #[test]
    fn test_parse_yaml_manifest() {
        let yaml = r#"
apiVersion: config.openshift.io/v1
kind: ClusterVersion
metadata:
  name: version
spec:
  channel: stable-4.16
  capabilities:
    baselineCapabilitySet: v4.11
    additionalEnabledCapabilities:
      - Console
status:
  capabilities:
    enabledCapabilities: [baremetal, Insights]
    knownCapabilities: [baremetal, Insights, Console]
"#;
        let manifest = Manifest::parse(yaml, ManifestFormat::Yaml).unwrap();
        let spec = manifest.capabilities().unwrap();
        assert_eq!(spec.baseline_name(), Some("v4.11"));
        assert_eq!(
            spec.additional_enabled_capabilities,
            vec![Capability::from("Console")]
        );
        assert_eq!(
            manifest.prior_enabled(),
            vec![Capability::from("baremetal"), Capability::from("Insights")]
        );
    }

    #[test]
    fn test_parse_json_without_capabilities() {
        let manifest = Manifest::parse(r#"{"spec": {}}"#, ManifestFormat::Json).unwrap();
        assert!(manifest.capabilities().is_none());
        assert!(manifest.prior_enabled().is_empty());
    }

    #[test]
    fn test_parse_empty_capabilities_object() {
        let manifest =
            Manifest::parse(r#"{"spec": {"capabilities": {}}}"#, ManifestFormat::Auto).unwrap();
        let spec = manifest.capabilities().unwrap();
        assert_eq!(spec.baseline_name(), None);
        assert!(spec.additional_enabled_capabilities.is_empty());
    }

    #[test]
    fn test_auto_falls_back_to_yaml() {
        let manifest = Manifest::parse(
            "spec:\n  capabilities:\n    baselineCapabilitySet: None\n",
            ManifestFormat::Auto,
        )
        .unwrap();
        assert_eq!(manifest.capabilities().unwrap().baseline_name(), Some("None"));
    }

    #[test]
    fn test_parse_error_is_reported() {
        let err = Manifest::parse("spec: [unclosed", ManifestFormat::Yaml).unwrap_err();
        assert!(matches!(err, ValidationError::ParseError(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ManifestFormat::from_path(Path::new("cv.json")),
            ManifestFormat::Json
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("cv.YML")),
            ManifestFormat::Yaml
        );
        assert_eq!(
            ManifestFormat::from_path(Path::new("cv.txt")),
            ManifestFormat::Auto
        );
    }
}
