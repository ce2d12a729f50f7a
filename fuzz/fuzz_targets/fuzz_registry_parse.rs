//! Fuzz target for registry.json parsing.
//!
//! Tests that registry parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use caps_config::validate::validate_registry;
use caps_config::CapabilityRegistry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(registry) = CapabilityRegistry::from_json(json) {
        let _ = validate_registry(&registry);
        let _ = registry.default_baseline();
    }
});
