//! End-to-end CLI runs against a temporary snapshot file

use clap::Parser;
use rwa_registry_cli::{run, Cli};
use std::path::Path;

const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
const OTHER: &str = "0x00000000000000000000000000000000000000ee";
const URN: &str = "urn=0x00000000000000000000000000000000000000aa:1";
const JAR: &str = "jar=0x00000000000000000000000000000000000000bb:1";

fn invoke(state: &Path, args: &[&str]) -> anyhow::Result<Vec<String>> {
    let state = state.to_string_lossy().into_owned();
    let mut argv = vec!["rwa-registry", "--state", state.as_str()];
    argv.extend_from_slice(args);
    run(Cli::try_parse_from(argv)?)
}

#[test]
fn init_add_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("registry.json");

    let facts = invoke(&state, &["init", "--admin", ADMIN]).unwrap();
    assert!(facts[0].contains("authorized"));
    assert!(invoke(&state, &["init", "--admin", ADMIN]).is_err());

    let facts = invoke(
        &state,
        &["add-deal", "--as", ADMIN, "RWA100-A", "--component", URN, "--component", JAR],
    )
    .unwrap();
    assert_eq!(facts.len(), 3);
    assert!(facts[0].contains("deal_added"));

    assert_eq!(invoke(&state, &["list"]).unwrap(), vec!["RWA100-A".to_string()]);
    let report = invoke(&state, &["show", "RWA100-A"]).unwrap().join("\n");
    assert!(report.contains("\"status\": \"ACTIVE\""));
    assert!(report.contains("jar"));

    let types = invoke(&state, &["types"]).unwrap();
    assert_eq!(types[0], "urn");
}

#[test]
fn rejected_command_leaves_snapshot_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("registry.json");
    invoke(&state, &["init", "--admin", ADMIN]).unwrap();
    let before = invoke(&state, &["digest"]).unwrap();

    let err = invoke(&state, &["add-deal", "--as", OTHER, "RWA200-A"]).unwrap_err();
    assert!(err.to_string().contains("Unauthorized"));
    assert_eq!(invoke(&state, &["digest"]).unwrap(), before);

    invoke(&state, &["rely", "--as", ADMIN, OTHER]).unwrap();
    invoke(&state, &["add-deal", "--as", OTHER, "RWA200-A"]).unwrap();
    assert_ne!(invoke(&state, &["digest"]).unwrap(), before);
}

#[test]
fn lifecycle_through_cli() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("registry.json");
    invoke(&state, &["init", "--admin", ADMIN]).unwrap();
    invoke(&state, &["add-deal", "--as", ADMIN, "RWA300-A", "--component", JAR]).unwrap();
    invoke(
        &state,
        &[
            "set-component",
            "--as",
            ADMIN,
            "RWA300-A",
            "jar",
            "0x00000000000000000000000000000000000000cc",
            "2",
        ],
    )
    .unwrap();
    invoke(&state, &["remove-component", "--as", ADMIN, "RWA300-A", "jar"]).unwrap();
    invoke(&state, &["remove", "--as", ADMIN, "RWA300-A"]).unwrap();
    assert!(invoke(&state, &["list"]).unwrap().is_empty());
    assert!(invoke(&state, &["list", "--start", "1"]).is_err());
}

#[test]
fn init_reads_config() {
    let dir = tempfile::tempdir().unwrap();
    let state = dir.path().join("registry.json");
    let config = dir.path().join("registry.toml");
    std::fs::write(&config, "default_components = [\"urn\", \"jar\"]\n").unwrap();

    let config = config.to_string_lossy().into_owned();
    invoke(&state, &["--config", config.as_str(), "init", "--admin", ADMIN]).unwrap();
    assert_eq!(
        invoke(&state, &["types"]).unwrap(),
        vec!["urn".to_string(), "jar".to_string()]
    );
}
