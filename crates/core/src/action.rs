// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actions: units of work with declared input and output artifacts

use crate::artifact::{ArtifactName, ArtifactPath};
use crate::binding::ParameterBinding;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of work an action performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    SourceFetch,
    BuildExecute,
    DeployApply,
}

impl ActionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::SourceFetch => "source",
            ActionKind::BuildExecute => "build",
            ActionKind::DeployApply => "deploy",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fetch a snapshot of a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub repository: String,
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    "main".to_string()
}

impl SourceConfig {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            branch: default_branch(),
        }
    }
}

/// Run a build project against the input artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    pub project: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Install phase commands, run before `commands`
    #[serde(default)]
    pub install: Vec<String>,
    pub commands: Vec<String>,
    /// Output selector: file names or glob patterns
    pub artifact_files: Vec<String>,
    /// Directory (relative to the build root) the selector is rooted at
    #[serde(default)]
    pub base_directory: Option<String>,
}

impl BuildConfig {
    /// Every command in execution order
    pub fn command_sequence(&self) -> Vec<String> {
        self.install
            .iter()
            .chain(self.commands.iter())
            .cloned()
            .collect()
    }
}

/// Apply a template as a named deployment unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    pub template_path: ArtifactPath,
    pub stack_name: String,
    /// Grant the deploying principal rights over any resource type
    #[serde(default)]
    pub admin_permissions: bool,
    #[serde(default)]
    pub parameter_overrides: Vec<ParameterBinding>,
}

/// Provider-specific configuration payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionConfig {
    Source(SourceConfig),
    Build(BuildConfig),
    Deploy(DeployConfig),
}

/// A named unit of work within a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<ArtifactName>,
    #[serde(default)]
    pub outputs: Vec<ArtifactName>,
    pub config: ActionConfig,
}

impl Action {
    /// Source action: no inputs, one output
    pub fn source(name: impl Into<String>, config: SourceConfig, output: ArtifactName) -> Self {
        Self {
            name: name.into(),
            inputs: Vec::new(),
            outputs: vec![output],
            config: ActionConfig::Source(config),
        }
    }

    pub fn build(
        name: impl Into<String>,
        config: BuildConfig,
        input: ArtifactName,
        output: ArtifactName,
    ) -> Self {
        Self {
            name: name.into(),
            inputs: vec![input],
            outputs: vec![output],
            config: ActionConfig::Build(config),
        }
    }

    /// Deploy action: the template's artifact plus `extra_inputs`, no outputs
    pub fn deploy(
        name: impl Into<String>,
        config: DeployConfig,
        extra_inputs: Vec<ArtifactName>,
    ) -> Self {
        let mut inputs = vec![config.template_path.artifact.clone()];
        for extra in extra_inputs {
            if !inputs.contains(&extra) {
                inputs.push(extra);
            }
        }
        Self {
            name: name.into(),
            inputs,
            outputs: Vec::new(),
            config: ActionConfig::Deploy(config),
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self.config {
            ActionConfig::Source(_) => ActionKind::SourceFetch,
            ActionConfig::Build(_) => ActionKind::BuildExecute,
            ActionConfig::Deploy(_) => ActionKind::DeployApply,
        }
    }
}
