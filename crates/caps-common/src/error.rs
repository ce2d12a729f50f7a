//! Error types for the capability resolver.
//!
//! Resolution itself never fails; these errors come from the collaborators
//! around it (loading manifests and registries, validating declared specs).
//! Every error carries:
//! - A stable error code for machine parsing
//! - A category for grouping
//! - A remediation hint for humans
//!
//! Errors serialize to structured JSON for agent consumption:
//! ```json
//! {
//!   "code": 11,
//!   "category": "config",
//!   "message": "unknown baseline capability set: v9.99",
//!   "remediation": "Run 'caps sets' to list the registered baseline capability sets.",
//!   "context": { "baseline_capability_set": "v9.99" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Result type alias for capability resolver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Registry, manifest, and declared spec errors.
    Config,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the capability resolver.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("unknown baseline capability set: {name}")]
    UnknownBaselineSet { name: String },

    #[error("invalid capability registry: {0}")]
    InvalidRegistry(String),

    #[error("invalid manifest: {0}")]
    InvalidManifest(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(String),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::UnknownBaselineSet { .. } => 11,
            Error::InvalidRegistry(_) => 12,
            Error::InvalidManifest(_) => 13,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
            Error::Yaml(_) => 62,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_)
            | Error::UnknownBaselineSet { .. }
            | Error::InvalidRegistry(_)
            | Error::InvalidManifest(_) => ErrorCategory::Config,

            Error::Io(_) | Error::Json(_) | Error::Yaml(_) => ErrorCategory::Io,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Run 'caps validate --manifest <file>' to check the configuration.",
            Error::UnknownBaselineSet { .. } => {
                "Run 'caps sets' to list the registered baseline capability sets."
            }
            Error::InvalidRegistry(_) => {
                "Fix the registry file, or unset CAPS_REGISTRY to fall back to the built-in table."
            }
            Error::InvalidManifest(_) => {
                "Check that the manifest has the shape spec.capabilities / status.capabilities."
            }
            Error::Io(_) => "Check that the file exists and is readable.",
            Error::Json(_) => "Invalid JSON in file. Check syntax with 'jq . <file>'.",
            Error::Yaml(_) => "Invalid YAML in file. Check indentation and quoting.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::UnknownBaselineSet { .. } => "Unknown Baseline Capability Set",
            Error::InvalidRegistry(_) => "Invalid Capability Registry",
            Error::InvalidManifest(_) => "Invalid Manifest",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Error",
            Error::Yaml(_) => "YAML Error",
        }
    }

    /// Format for human consumption: headline, reason, fix.
    pub fn format_human(&self) -> String {
        format!(
            "✗ {}\n  Reason: {}\n  Fix: {}",
            self.headline(),
            self,
            self.remediation()
        )
    }
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// Stable error code.
    pub code: u32,

    /// Error category for grouping.
    pub category: ErrorCategory,

    /// Human-readable error message.
    pub message: String,

    /// Remediation hint.
    pub remediation: String,

    /// Additional structured context.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub context: BTreeMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = BTreeMap::new();

        if let Error::UnknownBaselineSet { name } = err {
            context.insert(
                "baseline_capability_set".to_string(),
                serde_json::json!(name),
            );
        }

        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            remediation: err.remediation().to_string(),
            context,
        }
    }
}

impl StructuredError {
    /// Serialize to a compact JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"message":"{}"}}"#, self.code, self.message)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(
            Error::UnknownBaselineSet {
                name: "v9.99".into()
            }
            .code(),
            11
        );
        assert_eq!(Error::Yaml("bad".into()).code(), 62);
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::InvalidRegistry("x".into()).category(),
            ErrorCategory::Config
        );
        let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(io.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_structured_error_context() {
        let err = Error::UnknownBaselineSet {
            name: "v9.99".into(),
        };
        let structured = StructuredError::from(&err);

        assert_eq!(structured.code, 11);
        assert_eq!(structured.category, ErrorCategory::Config);
        assert_eq!(
            structured.context.get("baseline_capability_set"),
            Some(&serde_json::json!("v9.99"))
        );
    }

    #[test]
    fn test_structured_error_json() {
        let err = Error::InvalidManifest("missing spec".into());
        let json = StructuredError::from(&err).to_json();

        assert!(json.contains(r#""code":13"#));
        assert!(json.contains(r#""category":"config""#));
        assert!(!json.contains("context"));
    }

    #[test]
    fn test_format_human() {
        let err = Error::Config("bad".into());
        let text = err.format_human();
        assert!(text.starts_with("✗ Configuration Error"));
        assert!(text.contains("Reason: configuration error: bad"));
        assert!(text.contains("Fix: "));
    }
}
