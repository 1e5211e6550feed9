//! `sw run` specs against a local git repository

use crate::prelude::*;

#[test]
fn run_deploys_the_unit() {
    let project = Project::with_pipeline();

    project
        .sw()
        .args(&["run"])
        .passes()
        .stdout_has("Succeeded")
        .stdout_has("Revision: ")
        .stdout_has("Unit SpecStack: created");

    assert!(project.path().join(".sw/wal/events.wal").exists());
    assert!(project.path().join(".sw/sw.log").exists());
}

#[test]
fn rerunning_the_same_commit_is_unchanged() {
    let project = Project::with_pipeline();
    project.sw().args(&["run"]).passes();

    project
        .sw()
        .args(&["run"])
        .passes()
        .stdout_has("Unit SpecStack: unchanged");
}

#[test]
fn a_new_commit_updates_the_unit() {
    let project = Project::with_pipeline();
    project.sw().args(&["run"]).passes();

    project.file("fn/app.py", "def lambda_handler(event, context):\n    return 1\n");
    project.commit("change handler");

    project
        .sw()
        .args(&["run"])
        .passes()
        .stdout_has("Unit SpecStack: updated");
}

#[test]
fn failing_build_stops_before_deploy() {
    let project = Project::empty();
    project.file(
        "sw.toml",
        &MANIFEST.replace(r#"["cd fn", "echo {revision} > REVISION"]"#, r#"["exit 3"]"#),
    );
    project.file("template.json", TEMPLATE);
    project.file("fn/app.py", "pass\n");
    project.git_init();

    project
        .sw()
        .args(&["run"])
        .fails()
        .stdout_has("Failed")
        .stdout_lacks("Unit SpecStack")
        .stderr_has("Build/Package failed (BuildCommandFailed)")
        .stderr_has("sw show");

    project
        .sw()
        .args(&["units"])
        .passes()
        .stdout_eq("No deployment units\n");
}

#[test]
fn units_lists_deployed_stacks() {
    let project = Project::with_pipeline();
    project.sw().args(&["run"]).passes();

    project
        .sw()
        .args(&["units"])
        .passes()
        .stdout_has("UNIT")
        .stdout_has("SpecStack")
        .stdout_has("created");
}

#[test]
fn state_dir_can_be_relocated() {
    let project = Project::with_pipeline();
    let state = tempfile::tempdir().unwrap();

    project
        .sw()
        .env("SW_STATE_DIR", state.path())
        .args(&["run"])
        .passes();

    assert!(state.path().join("wal/events.wal").exists());
    assert!(!project.path().join(".sw").exists());
}
