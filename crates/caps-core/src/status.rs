//! Projection of resolved capabilities into the reported status shape.

use caps_common::{sorted_list, CapabilitiesStatus};

use crate::resolver::ClusterCapabilities;

/// Project resolved capabilities into status lists.
///
/// Both lists are sorted by name and duplicate-free. Empty sets project to
/// empty lists.
pub fn project_status(capabilities: &ClusterCapabilities) -> CapabilitiesStatus {
    CapabilitiesStatus {
        enabled_capabilities: sorted_list(&capabilities.enabled),
        known_capabilities: sorted_list(&capabilities.known),
    }
}
