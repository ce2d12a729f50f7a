//! End-to-end tests for the `caps` binary.
//!
//! Every command runs with the registry environment cleared so results do
//! not depend on the host's XDG or /etc configuration.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("test")
        .join("fixtures")
}

fn manifest(name: &str) -> PathBuf {
    fixtures().join("manifests").join(name)
}

fn registry(name: &str) -> PathBuf {
    fixtures().join("registry").join(name)
}

/// `caps` pinned to the built-in registry.
fn caps() -> Command {
    let mut cmd = cargo_bin_cmd!("caps");
    cmd.env_remove("CAPS_REGISTRY")
        .env_remove("RUST_LOG")
        .env("CAPS_CONFIG_DIR", fixtures().join("no-such-config-dir"))
        .env("CAPS_LOG", "off");
    cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run caps");
    assert!(
        output.status.success(),
        "caps failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

fn names(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .expect("array")
        .iter()
        .map(|v| v.as_str().expect("string").to_string())
        .collect()
}

mod help {
    use super::*;

    #[test]
    fn help_flag_lists_commands() {
        caps()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("resolve"))
            .stdout(predicate::str::contains("sets"))
            .stdout(predicate::str::contains("validate"))
            .stdout(predicate::str::contains("schema"));
    }

    #[test]
    fn version_flag_works() {
        caps()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("caps"));
    }

    #[test]
    fn version_subcommand_works() {
        caps()
            .arg("version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("caps "));
    }

    #[test]
    fn unknown_flag_is_args_error() {
        caps().arg("--bogus").assert().code(10);
    }

    #[test]
    fn resolve_requires_manifest() {
        caps().arg("resolve").assert().code(10);
    }

    #[test]
    fn prior_conflicts_with_no_prior() {
        caps()
            .args(["resolve", "--no-prior", "--prior", "Console"])
            .arg("--manifest")
            .arg(manifest("baseline_none.yaml"))
            .assert()
            .code(10);
    }
}

mod resolve {
    use super::*;

    #[test]
    fn absent_capabilities_enable_current_set() {
        let out = stdout_json(
            caps()
                .arg("resolve")
                .arg("--manifest")
                .arg(manifest("absent_capabilities.yaml")),
        );

        let enabled = names(&out["status"]["enabledCapabilities"]);
        let known = names(&out["status"]["knownCapabilities"]);
        assert_eq!(enabled.len(), 16);
        assert_eq!(enabled, known);
        assert_eq!(out["condition"]["status"], "False");
        assert_eq!(out["condition"]["reason"], "AsExpected");
        assert_eq!(out["registry"]["source"], "builtin");
    }

    #[test]
    fn none_with_additional_reports_unknown() {
        let out = stdout_json(
            caps()
                .arg("resolve")
                .arg("--manifest")
                .arg(manifest("none_with_additional.json")),
        );

        assert_eq!(
            names(&out["status"]["enabledCapabilities"]),
            vec!["cap1", "cap2", "cap3"]
        );
        assert_eq!(names(&out["unknownEnabled"]), vec!["cap1", "cap2", "cap3"]);
        assert!(names(&out["implicitlyEnabled"]).is_empty());
    }

    #[test]
    fn downgraded_baseline_sets_condition() {
        let out = stdout_json(
            caps()
                .arg("resolve")
                .arg("--manifest")
                .arg(manifest("downgraded_baseline.yaml")),
        );

        assert_eq!(names(&out["implicitlyEnabled"]), vec!["Insights", "Storage"]);
        assert_eq!(out["condition"]["type"], "ImplicitlyEnabledCapabilities");
        assert_eq!(out["condition"]["status"], "True");
        assert_eq!(
            out["condition"]["reason"],
            "CapabilitiesImplicitlyEnabled"
        );
    }

    #[test]
    fn no_prior_ignores_manifest_status() {
        let out = stdout_json(
            caps()
                .args(["resolve", "--no-prior"])
                .arg("--manifest")
                .arg(manifest("downgraded_baseline.yaml")),
        );

        assert!(names(&out["implicitlyEnabled"]).is_empty());
        assert_eq!(names(&out["status"]["enabledCapabilities"]).len(), 5);
    }

    #[test]
    fn blank_prior_names_are_ignored() {
        let out = stdout_json(
            caps()
                .args(["resolve", "--prior", ""])
                .arg("--manifest")
                .arg(manifest("baseline_none.yaml")),
        );

        assert!(names(&out["status"]["enabledCapabilities"]).is_empty());
        assert!(names(&out["implicitlyEnabled"]).is_empty());
        assert_eq!(out["condition"]["status"], "False");
    }

    #[test]
    fn stray_commas_in_prior_are_ignored() {
        let out = stdout_json(
            caps()
                .args(["resolve", "--prior", ",Build,,"])
                .arg("--manifest")
                .arg(manifest("baseline_none.yaml")),
        );

        assert_eq!(names(&out["implicitlyEnabled"]), vec!["Build"]);
        assert_eq!(
            out["condition"]["message"],
            "The following capabilities could not be disabled: Build"
        );
    }

    #[test]
    fn explicit_prior_overrides_manifest_status() {
        let out = stdout_json(
            caps()
                .args(["resolve", "--prior", "Build,Console"])
                .arg("--manifest")
                .arg(manifest("downgraded_baseline.yaml")),
        );

        assert_eq!(names(&out["implicitlyEnabled"]), vec!["Build"]);
    }

    #[test]
    fn summary_format_is_one_line() {
        caps()
            .args(["resolve", "--format", "summary"])
            .arg("--manifest")
            .arg(manifest("baseline_v4_11.yaml"))
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "baseline=v4.11 enabled=4 known=16 implicitly_enabled=0",
            ));
    }

    #[test]
    fn yaml_format_renders() {
        caps()
            .args(["resolve", "--format", "yaml"])
            .arg("--manifest")
            .arg(manifest("baseline_none.yaml"))
            .assert()
            .success()
            .stdout(predicate::str::contains("enabledCapabilities: []"));
    }

    #[test]
    fn unknown_baseline_is_validation_error() {
        let output = caps()
            .arg("resolve")
            .arg("--manifest")
            .arg(manifest("unknown_baseline.yaml"))
            .output()
            .expect("run caps");

        assert_eq!(output.status.code(), Some(11));
        let err: serde_json::Value =
            serde_json::from_slice(&output.stdout).expect("structured error");
        assert_eq!(err["code"], 11);
        assert!(err["message"].as_str().unwrap_or_default().contains("v9.99"));
        assert!(String::from_utf8_lossy(&output.stderr).contains("v9.99"));
    }

    #[test]
    fn missing_manifest_fails() {
        caps()
            .args(["resolve", "--format", "summary"])
            .arg("--manifest")
            .arg(manifest("does_not_exist.yaml"))
            .assert()
            .failure()
            .stderr(predicate::str::contains("does_not_exist.yaml"));
    }

    #[test]
    fn malformed_manifest_fails() {
        caps()
            .args(["resolve", "--format", "summary"])
            .arg("--manifest")
            .arg(manifest("not_a_manifest.yaml"))
            .assert()
            .code(11);
    }

    #[test]
    fn custom_registry_from_cli() {
        let out = stdout_json(
            caps()
                .arg("resolve")
                .arg("--registry")
                .arg(registry("valid_registry.json"))
                .arg("--manifest")
                .arg(manifest("absent_capabilities.yaml")),
        );

        assert_eq!(
            names(&out["status"]["enabledCapabilities"]),
            vec!["alpha", "beta"]
        );
        assert_eq!(
            names(&out["status"]["knownCapabilities"]),
            vec!["alpha", "beta", "gamma"]
        );
        assert_eq!(out["registry"]["source"], "CLI argument");
    }

    #[test]
    fn custom_registry_from_env() {
        let out = stdout_json(
            caps()
                .env("CAPS_REGISTRY", registry("valid_registry.json"))
                .arg("resolve")
                .arg("--manifest")
                .arg(manifest("absent_capabilities.yaml")),
        );

        assert_eq!(out["registry"]["default_set"], "standard");
    }

    #[test]
    fn invalid_registry_is_rejected() {
        caps()
            .args(["resolve", "--format", "summary"])
            .arg("--registry")
            .arg(registry("invalid_registry_unknown_member.json"))
            .arg("--manifest")
            .arg(manifest("absent_capabilities.yaml"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("omega"));
    }
}

mod sets {
    use super::*;

    #[test]
    fn missing_env_registry_warns_and_uses_builtin() {
        caps()
            .env("CAPS_REGISTRY", fixtures().join("registry").join("nope.json"))
            .env("CAPS_LOG", "warn")
            .args(["sets", "--format", "summary"])
            .assert()
            .success()
            .stdout(predicate::str::contains("vCurrent(16)"))
            .stderr(predicate::str::contains(
                "CAPS_REGISTRY points at a missing file",
            ))
            .stderr(predicate::str::contains("nope.json"));
    }

    #[test]
    fn lists_all_builtin_sets() {
        let out = stdout_json(caps().arg("sets"));
        let entries = out.as_array().expect("array");
        assert_eq!(entries.len(), 8);

        let current = entries
            .iter()
            .find(|e| e["name"] == "vCurrent")
            .expect("vCurrent listed");
        assert_eq!(current["default"], true);
        assert_eq!(names(&current["capabilities"]).len(), 16);
    }

    #[test]
    fn shows_one_set() {
        let out = stdout_json(caps().args(["sets", "v4.11"]));
        assert_eq!(
            names(&out[0]["capabilities"]),
            vec!["MachineAPI", "baremetal", "marketplace", "openshift-samples"]
        );
        assert_eq!(out[0]["default"], false);
    }

    #[test]
    fn unknown_set_fails() {
        caps().args(["sets", "v0.1"]).assert().code(11);
    }
}

mod validate {
    use super::*;

    #[test]
    fn valid_manifest_reports_unknown_additional() {
        let out = stdout_json(
            caps()
                .arg("validate")
                .arg("--manifest")
                .arg(manifest("v4_11_with_additional.yaml")),
        );

        assert_eq!(out["valid"], true);
        assert_eq!(out["baselineCapabilitySet"], "v4.11");
        assert_eq!(names(&out["unknownCapabilities"]).len(), 3);
    }

    #[test]
    fn unknown_baseline_fails() {
        caps()
            .args(["validate", "--format", "summary"])
            .arg("--manifest")
            .arg(manifest("unknown_baseline.yaml"))
            .assert()
            .code(11)
            .stderr(predicate::str::contains("caps sets"));
    }
}

mod schema {
    use super::*;

    #[test]
    fn status_schema_names_fields() {
        caps()
            .arg("schema")
            .assert()
            .success()
            .stdout(predicate::str::contains("enabledCapabilities"))
            .stdout(predicate::str::contains("knownCapabilities"));
    }

    #[test]
    fn condition_schema_names_fields() {
        caps()
            .args(["schema", "condition"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lastTransitionTime"));
    }
}
