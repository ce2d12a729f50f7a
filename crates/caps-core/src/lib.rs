//! Capability resolver core.
//!
//! Derives, from a declared capabilities spec and the previously enabled
//! capabilities, the known / enabled / implicitly-enabled capability picture
//! of a cluster, and projects it into the reported status shape.
//!
//! All resolution functions are pure: the registry is passed in, nothing is
//! cached, and each call builds a fresh [`ClusterCapabilities`].
//!
//! ```
//! use caps_common::Capability;
//! use caps_config::{CapabilitiesSpec, CapabilityRegistry};
//! use caps_core::{project_status, resolve};
//!
//! let registry = CapabilityRegistry::builtin();
//! let spec = CapabilitiesSpec::with_baseline("None").with_additional(["Console"]);
//! let caps = resolve(&registry, Some(&spec), &[Capability::from("marketplace")]);
//!
//! assert!(caps.is_enabled("Console"));
//! assert!(caps.is_implicitly_enabled("marketplace"));
//! assert_eq!(project_status(&caps).enabled_capabilities.len(), 2);
//! ```

pub mod condition;
pub mod exit_codes;
pub mod logging;
pub mod resolver;
pub mod status;

pub use condition::{implicitly_enabled_condition, Condition, ConditionStatus};
pub use resolver::{apply_implicitly_enabled, resolve, ClusterCapabilities};
pub use status::project_status;
