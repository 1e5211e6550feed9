//! Error reporting specs

use crate::prelude::*;

#[test]
fn validate_without_manifest_suggests_init() {
    Project::empty()
        .sw()
        .args(&["validate"])
        .fails()
        .stderr_has("No manifest at")
        .stderr_has("sw init");
}

#[test]
fn run_without_manifest_fails_before_touching_state() {
    let project = Project::empty();
    project.sw().args(&["run"]).fails().stderr_has("No manifest at");
    assert!(!project.path().join(".sw").exists());
}

#[test]
fn invalid_manifest_reports_the_problem() {
    let project = Project::empty();
    project.file(
        "sw.toml",
        "[pipeline]\nname = \"p\"\n\n[[stage]]\nname = \"Build\"\n",
    );

    project
        .sw()
        .args(&["validate"])
        .fails()
        .stderr_has("Invalid manifest")
        .stderr_has("stage Build has no actions");
}

#[test]
fn show_unknown_execution() {
    Project::empty()
        .sw()
        .args(&["show", "nonexistent"])
        .fails()
        .stderr_has("Execution 'nonexistent' not found")
        .stderr_has("sw list");
}
