// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::action::{BuildConfig, DeployConfig, SourceConfig};
use crate::binding::ParameterBinding;

fn name(s: &str) -> ArtifactName {
    ArtifactName::new(s)
}

fn source(action: &str, output: &str) -> Action {
    Action::source(action, SourceConfig::new("repo"), name(output))
}

fn build_config() -> BuildConfig {
    BuildConfig {
        project: "project".to_string(),
        image: None,
        install: Vec::new(),
        commands: vec!["make".to_string()],
        artifact_files: vec!["out/*".to_string()],
        base_directory: None,
    }
}

fn build(action: &str, input: &str, output: &str) -> Action {
    Action::build(action, build_config(), name(input), name(output))
}

fn deploy(action: &str, template: &str, extra: &[&str]) -> Action {
    Action::deploy(
        action,
        DeployConfig {
            template_path: name(template).at_path("template.json"),
            stack_name: "unit".to_string(),
            admin_permissions: false,
            parameter_overrides: Vec::new(),
        },
        extra.iter().map(|e| name(e)).collect(),
    )
}

#[test]
fn three_stage_pipeline_builds() {
    let pipeline = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("synth", "code", "tpl"), build("pkg", "code", "deps")],
        )
        .add_stage("Deploy", vec![deploy("apply", "tpl", &["deps"])])
        .build()
        .unwrap();

    assert_eq!(pipeline.stages().len(), 3);
    assert_eq!(pipeline.stage_index("Deploy"), Some(2));
    let (stage, action) = pipeline.action("pkg").unwrap();
    assert_eq!(stage.name, "Build");
    assert_eq!(action.outputs, vec![name("deps")]);
}

#[test]
fn artifact_records_track_producers_and_consumers() {
    let pipeline = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("synth", "code", "tpl"), build("pkg", "code", "deps")],
        )
        .add_stage("Deploy", vec![deploy("apply", "tpl", &["deps"])])
        .build()
        .unwrap();

    let records = pipeline.artifact_records();
    assert_eq!(records.len(), 3);
    let code = &records[&name("code")];
    assert_eq!(code.producer, "src");
    assert_eq!(code.consumers, vec!["synth", "pkg"]);
    assert_eq!(records[&name("deps")].consumers, vec!["apply"]);
    assert!(records
        .values()
        .all(|r| r.state == crate::artifact::ArtifactState::Declared));
}

#[test]
fn empty_pipeline_is_rejected() {
    let err = Pipeline::builder("p").build().unwrap_err();
    assert_eq!(err, DefinitionError::NoStages("p".to_string()));
}

#[test]
fn empty_stage_is_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", Vec::new())
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::EmptyStage("Build".to_string()));
}

#[test]
fn duplicate_stage_names_are_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Source", vec![build("b", "code", "out")])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::DuplicateStage("Source".to_string()));
}

#[test]
fn duplicate_action_names_are_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("b", "code", "one"), build("b", "code", "two")],
        )
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::DuplicateAction("b".to_string()));
}

#[test]
fn two_producers_of_one_artifact_are_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("a", "code", "out"), build("b", "code", "out")],
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::DuplicateProducer {
            artifact: "out".to_string(),
            first: "a".to_string(),
            second: "b".to_string(),
        }
    );
}

#[test]
fn input_from_later_stage_is_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![build("b", "later", "out")])
        .add_stage("Build2", vec![build("c", "code", "later")])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::UnknownInput {
            action: "b".to_string(),
            artifact: "later".to_string(),
        }
    );
}

#[test]
fn input_nobody_produces_is_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![build("b", "ghost", "out")])
        .build()
        .unwrap_err();
    assert!(matches!(err, DefinitionError::UnknownInput { .. }));
}

#[test]
fn input_from_same_stage_is_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("a", "code", "tpl"), build("b", "tpl", "out")],
        )
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::SameStageInput {
            action: "b".to_string(),
            artifact: "tpl".to_string(),
        }
    );
}

#[test]
fn first_stage_must_be_source_only() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code"), build("b", "code", "out")])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::FirstStageNotSource("b".to_string()));
}

#[test]
fn source_outside_first_stage_is_rejected() {
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Again", vec![source("src2", "more")])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::MisplacedSource("src2".to_string()));
}

#[test]
fn build_without_commands_is_rejected() {
    let mut action = build("b", "code", "out");
    if let ActionConfig::Build(config) = &mut action.config {
        config.commands.clear();
    }
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![action])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::NoCommands("b".to_string()));
}

#[test]
fn build_with_two_outputs_is_rejected() {
    let mut action = build("b", "code", "out");
    action.outputs.push(name("extra"));
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![action])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::BuildShape("b".to_string()));
}

#[test]
fn deploy_with_outputs_is_rejected() {
    let mut action = deploy("apply", "code", &[]);
    action.outputs.push(name("nope"));
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Deploy", vec![action])
        .build()
        .unwrap_err();
    assert_eq!(err, DefinitionError::DeployOutputs("apply".to_string()));
}

#[test]
fn binding_to_undeclared_input_is_rejected() {
    let mut action = deploy("apply", "tpl", &[]);
    if let ActionConfig::Deploy(config) = &mut action.config {
        config
            .parameter_overrides
            .push(ParameterBinding::uri("CodeLocation", name("deps")));
    }
    let err = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage(
            "Build",
            vec![build("synth", "code", "tpl"), build("pkg", "code", "deps")],
        )
        .add_stage("Deploy", vec![action])
        .build()
        .unwrap_err();
    assert_eq!(
        err,
        DefinitionError::UndeclaredReference {
            action: "apply".to_string(),
            artifact: "deps".to_string(),
        }
    );
}

#[test]
fn deploy_inputs_are_deduplicated() {
    let action = deploy("apply", "tpl", &["tpl", "deps"]);
    assert_eq!(action.inputs, vec![name("tpl"), name("deps")]);
}

#[test]
fn decoded_pipeline_round_trips() {
    let pipeline = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![build("pkg", "code", "deps")])
        .build()
        .unwrap();

    let json = serde_json::to_string(&pipeline).unwrap();
    let decoded: Pipeline = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, pipeline);
}

#[test]
fn decoding_cannot_bypass_validation() {
    let empty = serde_json::from_str::<Pipeline>(r#"{"name":"p","stages":[]}"#).unwrap_err();
    assert!(empty.to_string().contains("pipeline p has no stages"));

    // a build reading an artifact no earlier stage produces
    let valid = Pipeline::builder("p")
        .add_stage("Source", vec![source("src", "code")])
        .add_stage("Build", vec![build("pkg", "code", "deps")])
        .build()
        .unwrap();
    let mut json = serde_json::to_value(&valid).unwrap();
    json["stages"][1]["actions"][0]["inputs"] = serde_json::json!(["nowhere"]);
    let err = serde_json::from_value::<Pipeline>(json).unwrap_err();
    assert!(err.to_string().contains("nowhere"), "{err}");
}
