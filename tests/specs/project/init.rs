//! `sw init` specs

use crate::prelude::*;

#[test]
fn init_writes_a_manifest_that_validates() {
    let project = Project::empty();
    project.sw().args(&["init"]).passes().stdout_has("Wrote");

    let manifest = project.read("sw.toml");
    assert!(manifest.starts_with("# Stagewright pipeline"), "{manifest}");
    assert!(manifest.contains("LambdaStackDeployedName"));

    project
        .sw()
        .args(&["validate"])
        .passes()
        .stdout_has("Pipeline LambdaPipeline: 3 stages")
        .stdout_has("Lambda_CFN_Deploy (deploy)");
}

#[test]
fn init_refuses_to_overwrite() {
    let project = Project::empty();
    project.sw().args(&["init"]).passes();

    project
        .sw()
        .args(&["init"])
        .fails()
        .stderr_has("already exists")
        .stderr_has("--force");
}

#[test]
fn init_force_overwrites() {
    let project = Project::empty();
    project.file("sw.toml", "garbage");

    project.sw().args(&["init", "--force"]).passes();
    assert!(project.read("sw.toml").contains("[pipeline]"));
}

#[test]
fn init_takes_repository_and_branch() {
    let project = Project::empty();
    project
        .sw()
        .args(&["init", "--repository", "git@example.com:fn.git", "--branch", "release"])
        .passes();

    let manifest = project.read("sw.toml");
    assert!(manifest.contains("git@example.com:fn.git"), "{manifest}");
    assert!(manifest.contains("release"));
}
