// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use sw_core::{ActionConfig, ActionKind, LocationField};
use yare::parameterized;

const MANIFEST: &str = r#"
[pipeline]
name = "LambdaPipeline"

[[stage]]
name = "Source"

[[stage.action]]
name = "Code_Source"
kind = "source"
repository = "."
output = "source_output"

[[stage]]
name = "Build"

[[stage.action]]
name = "CDK_Build"
kind = "build"
image = "STANDARD_5_0"
input = "source_output"
output = "cdk_build_output"
install = ["npm install"]
commands = ["npx aws-cdk synth LambdaStack -o ."]
artifact_files = ["LambdaStack.template.json"]

[[stage.action]]
name = "Lambda_Build"
kind = "build"
input = "source_output"
output = "lambda_build_output"
commands = ["cd src/LambdaFunc", "pip install -r requirements.txt -t ."]
artifact_files = ["**/*"]
base_directory = "src/LambdaFunc"

[[stage]]
name = "Deploy"

[[stage.action]]
name = "Lambda_CFN_Deploy"
kind = "deploy"
template = "cdk_build_output::LambdaStack.template.json"
stack_name = "LambdaStackDeployedName"
admin_permissions = true
extra_inputs = ["lambda_build_output"]

[[stage.action.parameter]]
parameter = "LambdaSourceBucketNameParameter"
artifact = "lambda_build_output"
field = "bucket"

[[stage.action.parameter]]
parameter = "CodeLocation"
artifact = "lambda_build_output"
"#;

#[test]
fn parses_three_stage_manifest() {
    let pipeline = parse_manifest(MANIFEST).unwrap();

    assert_eq!(pipeline.name, "LambdaPipeline");
    let stages: Vec<_> = pipeline.stages().iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stages, vec!["Source", "Build", "Deploy"]);

    let (_, source) = pipeline.action("Code_Source").unwrap();
    let ActionConfig::Source(config) = &source.config else {
        panic!("expected source config");
    };
    assert_eq!(config.repository, ".");
    assert_eq!(config.branch, "main");
}

#[test]
fn build_fields_and_defaults() {
    let pipeline = parse_manifest(MANIFEST).unwrap();

    let (_, synth) = pipeline.action("CDK_Build").unwrap();
    let ActionConfig::Build(build) = &synth.config else {
        panic!("expected build config");
    };
    assert_eq!(build.image.as_deref(), Some("STANDARD_5_0"));
    assert_eq!(
        build.command_sequence(),
        vec!["npm install", "npx aws-cdk synth LambdaStack -o ."]
    );

    let (_, package) = pipeline.action("Lambda_Build").unwrap();
    let ActionConfig::Build(build) = &package.config else {
        panic!("expected build config");
    };
    // project defaults to the action name
    assert_eq!(build.project, "Lambda_Build");
    assert_eq!(build.base_directory.as_deref(), Some("src/LambdaFunc"));
}

#[test]
fn deploy_template_and_bindings() {
    let pipeline = parse_manifest(MANIFEST).unwrap();
    let (_, deploy) = pipeline.action("Lambda_CFN_Deploy").unwrap();

    assert_eq!(deploy.kind(), ActionKind::DeployApply);
    assert_eq!(deploy.inputs.len(), 2);
    let ActionConfig::Deploy(config) = &deploy.config else {
        panic!("expected deploy config");
    };
    assert_eq!(config.template_path.path, "LambdaStack.template.json");
    assert!(config.admin_permissions);
    assert_eq!(config.parameter_overrides.len(), 2);
    assert_eq!(config.parameter_overrides[0].field, LocationField::Bucket);
    // field defaults to the full URI
    assert_eq!(config.parameter_overrides[1].field, LocationField::Uri);
}

#[test]
fn env_references_expand_at_parse_time() {
    let manifest = MANIFEST.replace(
        r#"repository = ".""#,
        r#"repository = "${SW_TEST_SURELY_UNSET_REPO:-CodeRepo}""#,
    );
    let pipeline = parse_manifest(&manifest).unwrap();
    let (_, source) = pipeline.action("Code_Source").unwrap();
    let ActionConfig::Source(config) = &source.config else {
        panic!("expected source config");
    };
    assert_eq!(config.repository, "CodeRepo");
}

#[test]
fn placeholders_survive_parsing() {
    let manifest = MANIFEST.replace(
        "pip install -r requirements.txt -t .",
        "echo {execution_id} > build.txt",
    );
    let pipeline = parse_manifest(&manifest).unwrap();
    let (_, package) = pipeline.action("Lambda_Build").unwrap();
    let ActionConfig::Build(build) = &package.config else {
        panic!("expected build config");
    };
    assert!(build.commands[1].contains("{execution_id}"));
}

#[test]
fn runtime_env_references_survive_into_build_commands() {
    let manifest = MANIFEST.replace(
        "pip install -r requirements.txt -t .",
        "echo ${SW_REVISION} > REVISION",
    );
    let pipeline = parse_manifest(&manifest).unwrap();
    let (_, package) = pipeline.action("Lambda_Build").unwrap();
    let ActionConfig::Build(build) = &package.config else {
        panic!("expected build config");
    };
    assert_eq!(build.commands[1], "echo ${SW_REVISION} > REVISION");
}

#[parameterized(
    no_pipeline = { "[[stage]]\nname = \"S\"" },
    no_pipeline_name = { "[pipeline]\n" },
    action_without_kind = { "[pipeline]\nname = \"p\"\n[[stage]]\nname = \"S\"\n[[stage.action]]\nname = \"a\"" },
    source_without_output = { "[pipeline]\nname = \"p\"\n[[stage]]\nname = \"S\"\n[[stage.action]]\nname = \"a\"\nkind = \"source\"\nrepository = \".\"" },
)]
fn missing_fields(content: &str) {
    let err = parse_manifest(content).unwrap_err();
    assert!(matches!(err, ParseError::MissingField(_)), "got {err}");
}

#[parameterized(
    unknown_kind = { "[pipeline]\nname = \"p\"\n[[stage]]\nname = \"S\"\n[[stage.action]]\nname = \"a\"\nkind = \"lint\"" },
    stage_not_array = { "[pipeline]\nname = \"p\"\n[stage]\nname = \"S\"" },
    commands_not_strings = { "[pipeline]\nname = \"p\"\n[[stage]]\nname = \"S\"\n[[stage.action]]\nname = \"a\"\nkind = \"build\"\ninput = \"x\"\noutput = \"y\"\ncommands = [1]" },
    template_without_separator = { "[pipeline]\nname = \"p\"\n[[stage]]\nname = \"S\"\n[[stage.action]]\nname = \"a\"\nkind = \"deploy\"\ntemplate = \"tpl.json\"\nstack_name = \"u\"" },
)]
fn invalid_format(content: &str) {
    let err = parse_manifest(content).unwrap_err();
    assert!(matches!(err, ParseError::InvalidFormat(_)), "got {err}");
}

#[test]
fn topology_errors_surface_as_definition_errors() {
    let manifest = MANIFEST.replace(r#"input = "source_output""#, r#"input = "ghost""#);
    let err = parse_manifest(&manifest).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Definition(DefinitionError::UnknownInput { .. })
    ));
}

#[test]
fn no_stages_is_a_definition_error() {
    let err = parse_manifest("[pipeline]\nname = \"p\"").unwrap_err();
    assert!(matches!(
        err,
        ParseError::Definition(DefinitionError::NoStages(_))
    ));
}

#[test]
fn load_manifest_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    let err = load_manifest(&path).unwrap_err();
    assert!(err.to_string().contains("missing.toml"));

    let path = dir.path().join("sw.toml");
    std::fs::write(&path, MANIFEST).unwrap();
    assert_eq!(load_manifest(&path).unwrap().stages().len(), 3);
}

#[test]
fn malformed_toml() {
    assert!(matches!(
        parse_manifest("[pipeline").unwrap_err(),
        ParseError::Toml(_)
    ));
}
