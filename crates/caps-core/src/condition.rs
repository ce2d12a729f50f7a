//! The `ImplicitlyEnabledCapabilities` status condition.
//!
//! Tells an operator which capabilities stayed on even though the current
//! spec no longer selects them.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::resolver::ClusterCapabilities;

/// Condition type reported for carried-forward capabilities.
pub const CONDITION_IMPLICITLY_ENABLED: &str = "ImplicitlyEnabledCapabilities";

/// Reason when capabilities were carried forward.
pub const REASON_IMPLICITLY_ENABLED: &str = "CapabilitiesImplicitlyEnabled";

/// Reason when enabled capabilities match the declared spec.
pub const REASON_AS_EXPECTED: &str = "AsExpected";

/// Condition status value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum ConditionStatus {
    True,
    False,
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
        }
    }
}

/// A status condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    pub reason: String,
    pub message: String,
    pub last_transition_time: DateTime<Utc>,
}

/// Build the implicitly-enabled condition for a resolved state.
///
/// `now` is supplied by the caller so the result depends only on inputs.
pub fn implicitly_enabled_condition(
    capabilities: &ClusterCapabilities,
    now: DateTime<Utc>,
) -> Condition {
    let names: Vec<&str> = capabilities
        .implicitly_enabled()
        .map(|cap| cap.as_str())
        .collect();

    if names.is_empty() {
        return Condition {
            condition_type: CONDITION_IMPLICITLY_ENABLED.to_string(),
            status: ConditionStatus::False,
            reason: REASON_AS_EXPECTED.to_string(),
            message: "Capabilities match configured spec".to_string(),
            last_transition_time: now,
        };
    }

    Condition {
        condition_type: CONDITION_IMPLICITLY_ENABLED.to_string(),
        status: ConditionStatus::True,
        reason: REASON_IMPLICITLY_ENABLED.to_string(),
        message: format!(
            "The following capabilities could not be disabled: {}",
            names.join(", ")
        ),
        last_transition_time: now,
    }
}
