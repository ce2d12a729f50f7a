//! Capability names and capability sets.
//!
//! A capability is an opaque, exactly-compared name. Sets of capabilities are
//! kept in an ordered set so membership is cheap and projections come out
//! sorted without a separate pass.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt;

/// A named optional cluster feature (e.g. `marketplace`, `baremetal`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct Capability(pub String);

impl Capability {
    /// The raw capability name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Capability {
    fn from(name: &str) -> Self {
        Capability(name.to_string())
    }
}

impl From<String> for Capability {
    fn from(name: String) -> Self {
        Capability(name)
    }
}

impl AsRef<str> for Capability {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Capability {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// An unordered collection of capability names with set semantics.
pub type CapabilitySet = BTreeSet<Capability>;

/// Flatten a set into a duplicate-free list sorted by name.
pub fn sorted_list(set: &CapabilitySet) -> Vec<Capability> {
    set.iter().cloned().collect()
}
