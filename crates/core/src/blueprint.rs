// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The serverless function blueprint
//!
//! Source → Build (template synthesis ∥ dependency packaging) → Deploy.
//! The synthesized template's logical stack name and the deployed unit name
//! are configured independently.

use crate::action::{Action, BuildConfig, DeployConfig, SourceConfig};
use crate::artifact::ArtifactName;
use crate::binding::CodeParameters;
use crate::pipeline::{DefinitionError, Pipeline};
use serde::{Deserialize, Serialize};

/// Knobs for [`serverless_pipeline`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlueprintConfig {
    pub pipeline: String,
    pub repository: String,
    pub branch: String,
    /// Stack name passed to the synthesizer; the template file is derived from it
    pub synthesized_stack: String,
    /// Name of the deployment unit created or updated by the deploy stage
    pub deployed_stack: String,
    pub image: String,
    /// Function source directory, relative to the repository root
    pub function_dir: String,
    pub admin_permissions: bool,
    pub code_parameters: CodeParameters,
}

impl Default for BlueprintConfig {
    fn default() -> Self {
        Self {
            pipeline: "LambdaPipeline".to_string(),
            repository: "CodeRepo".to_string(),
            branch: "main".to_string(),
            synthesized_stack: "LambdaStack".to_string(),
            deployed_stack: "LambdaStackDeployedName".to_string(),
            image: "STANDARD_5_0".to_string(),
            function_dir: "src/LambdaFunc".to_string(),
            admin_permissions: true,
            code_parameters: CodeParameters::default(),
        }
    }
}

impl BlueprintConfig {
    pub fn template_file(&self) -> String {
        format!("{}.template.json", self.synthesized_stack)
    }
}

pub const SOURCE_OUTPUT: &str = "source_output";
pub const TEMPLATE_OUTPUT: &str = "cdk_build_output";
pub const PACKAGE_OUTPUT: &str = "lambda_build_output";

/// Assemble the three-stage serverless pipeline
pub fn serverless_pipeline(config: &BlueprintConfig) -> Result<Pipeline, DefinitionError> {
    let source_output = ArtifactName::new(SOURCE_OUTPUT);
    let template_output = ArtifactName::new(TEMPLATE_OUTPUT);
    let package_output = ArtifactName::new(PACKAGE_OUTPUT);

    let source = Action::source(
        "Code_Source",
        SourceConfig {
            repository: config.repository.clone(),
            branch: config.branch.clone(),
        },
        source_output.clone(),
    );

    let synth = Action::build(
        "CDK_Build",
        BuildConfig {
            project: "CdkBuildProject".to_string(),
            image: Some(config.image.clone()),
            install: vec!["npm install".to_string()],
            commands: vec![
                "npx aws-cdk --version".to_string(),
                format!("npx aws-cdk synth {} -o .", config.synthesized_stack),
            ],
            artifact_files: vec![config.template_file()],
            base_directory: None,
        },
        source_output.clone(),
        template_output.clone(),
    );

    let package = Action::build(
        "Lambda_Build",
        BuildConfig {
            project: "LambdaBuildProject".to_string(),
            image: Some(config.image.clone()),
            install: Vec::new(),
            commands: vec![
                format!("cd {}", config.function_dir),
                "pip install -r requirements.txt -t .".to_string(),
            ],
            artifact_files: vec!["**/*".to_string()],
            base_directory: Some(config.function_dir.clone()),
        },
        source_output,
        package_output.clone(),
    );

    let deploy = Action::deploy(
        "Lambda_CFN_Deploy",
        DeployConfig {
            template_path: template_output.at_path(config.template_file()),
            stack_name: config.deployed_stack.clone(),
            admin_permissions: config.admin_permissions,
            parameter_overrides: config.code_parameters.assign(&package_output),
        },
        vec![package_output],
    );

    Pipeline::builder(config.pipeline.clone())
        .add_stage("Source", vec![source])
        .add_stage("Build", vec![synth, package])
        .add_stage("Deploy", vec![deploy])
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionConfig, ActionKind};

    #[test]
    fn default_topology() {
        let pipeline = serverless_pipeline(&BlueprintConfig::default()).unwrap();

        let layout: Vec<(&str, Vec<&str>)> = pipeline
            .stages()
            .iter()
            .map(|s| {
                (
                    s.name.as_str(),
                    s.actions.iter().map(|a| a.name.as_str()).collect(),
                )
            })
            .collect();
        assert_eq!(
            layout,
            vec![
                ("Source", vec!["Code_Source"]),
                ("Build", vec!["CDK_Build", "Lambda_Build"]),
                ("Deploy", vec!["Lambda_CFN_Deploy"]),
            ]
        );
    }

    #[test]
    fn both_builds_consume_the_source_artifact() {
        let pipeline = serverless_pipeline(&BlueprintConfig::default()).unwrap();
        let build = pipeline.stage("Build").unwrap();
        for action in &build.actions {
            assert_eq!(action.kind(), ActionKind::BuildExecute);
            assert_eq!(action.inputs, vec![ArtifactName::new(SOURCE_OUTPUT)]);
        }
    }

    #[test]
    fn deploy_reads_template_and_package() {
        let pipeline = serverless_pipeline(&BlueprintConfig::default()).unwrap();
        let (_, deploy) = pipeline.action("Lambda_CFN_Deploy").unwrap();

        assert_eq!(
            deploy.inputs,
            vec![
                ArtifactName::new(TEMPLATE_OUTPUT),
                ArtifactName::new(PACKAGE_OUTPUT)
            ]
        );
        let ActionConfig::Deploy(config) = &deploy.config else {
            panic!("expected deploy config");
        };
        assert_eq!(config.stack_name, "LambdaStackDeployedName");
        assert_eq!(
            config.template_path.to_string(),
            "cdk_build_output::LambdaStack.template.json"
        );
        assert!(config.admin_permissions);
        let parameters: Vec<_> = config
            .parameter_overrides
            .iter()
            .map(|b| b.parameter.as_str())
            .collect();
        assert_eq!(
            parameters,
            vec![
                "LambdaSourceBucketNameParameter",
                "LambdaSourceObjectKeyParameter"
            ]
        );
    }

    #[test]
    fn synthesized_and_deployed_names_are_independent() {
        let config = BlueprintConfig {
            synthesized_stack: "Fn".to_string(),
            deployed_stack: "prod-fn".to_string(),
            ..BlueprintConfig::default()
        };
        let pipeline = serverless_pipeline(&config).unwrap();

        let (_, synth) = pipeline.action("CDK_Build").unwrap();
        let ActionConfig::Build(build) = &synth.config else {
            panic!("expected build config");
        };
        assert_eq!(build.artifact_files, vec!["Fn.template.json"]);
        assert!(build.commands.iter().any(|c| c.contains("synth Fn")));

        let (_, deploy) = pipeline.action("Lambda_CFN_Deploy").unwrap();
        let ActionConfig::Deploy(config) = &deploy.config else {
            panic!("expected deploy config");
        };
        assert_eq!(config.stack_name, "prod-fn");
    }

    #[test]
    fn package_output_is_rooted_at_function_dir() {
        let pipeline = serverless_pipeline(&BlueprintConfig::default()).unwrap();
        let (_, package) = pipeline.action("Lambda_Build").unwrap();
        let ActionConfig::Build(build) = &package.config else {
            panic!("expected build config");
        };
        assert_eq!(build.base_directory.as_deref(), Some("src/LambdaFunc"));
        assert_eq!(build.artifact_files, vec!["**/*"]);
    }
}
