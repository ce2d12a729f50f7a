//! Shared types for the capability resolver.
//!
//! This crate provides the vocabulary used across the workspace:
//! - The `Capability` name type and the `CapabilitySet` container
//! - The reported `CapabilitiesStatus` shape
//! - Common error types with stable codes
//! - Output format specifications

pub mod capability;
pub mod error;
pub mod output;
pub mod status;

pub use capability::{sorted_list, Capability, CapabilitySet};
pub use error::{Error, ErrorCategory, Result, StructuredError};
pub use output::OutputFormat;
pub use status::CapabilitiesStatus;
