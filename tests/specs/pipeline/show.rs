//! `sw list` and `sw show` specs

use crate::prelude::*;

#[test]
fn list_without_executions() {
    Project::empty()
        .sw()
        .args(&["list"])
        .passes()
        .stdout_eq("No executions\n");
}

#[test]
fn list_shows_each_run() {
    let project = Project::with_pipeline();
    let id = project.sw().args(&["run"]).passes().execution_id();

    project
        .sw()
        .args(&["list"])
        .passes()
        .stdout_has("PIPELINE")
        .stdout_has(&id[..12])
        .stdout_has("SpecPipeline")
        .stdout_has("Succeeded");
}

#[test]
fn show_accepts_an_id_prefix() {
    let project = Project::with_pipeline();
    let id = project.sw().args(&["run"]).passes().execution_id();

    project
        .sw()
        .args(&["show", &id[..8]])
        .passes()
        .stdout_has(&format!("Execution: {}", id))
        .stdout_has("Pipeline: SpecPipeline")
        .stdout_has("Package")
        .stdout_has("pkg")
        .stdout_has("CodeLocation");
}

#[test]
fn show_as_json() {
    let project = Project::with_pipeline();
    let id = project.sw().args(&["run"]).passes().execution_id();

    let output = project
        .sw()
        .args(&["show", &id, "--format", "json"])
        .passes();
    let value: serde_json::Value = serde_json::from_str(&output.stdout).unwrap();
    assert_eq!(value["id"], id.as_str());
    assert_eq!(value["status"], "Succeeded");
}
