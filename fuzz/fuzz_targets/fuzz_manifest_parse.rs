//! Fuzz target for cluster-version manifest parsing.
//!
//! Anything that parses must also resolve and project without panicking.

#![no_main]

use caps_config::manifest::{Manifest, ManifestFormat};
use caps_config::CapabilityRegistry;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(content) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(manifest) = Manifest::parse(content, ManifestFormat::Auto) else {
        return;
    };

    let registry = CapabilityRegistry::builtin();
    let _ = caps_config::validate::validate_spec(manifest.capabilities(), &registry);

    let caps = caps_core::resolve(&registry, manifest.capabilities(), &manifest.prior_enabled());
    let status = caps_core::project_status(&caps);
    assert!(status
        .enabled_capabilities
        .windows(2)
        .all(|pair| pair[0] < pair[1]));
});
