// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline definition
//!
//! A pipeline is an ordered list of stages assembled once through
//! [`PipelineBuilder`] and validated on `build()`. The resulting topology is
//! immutable: there is no way to reorder or remove stages afterwards.

use crate::action::{Action, ActionConfig, ActionKind};
use crate::artifact::{ArtifactName, ArtifactRecord};
use crate::stage::Stage;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// Errors detected while assembling a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    #[error("pipeline {0} has no stages")]
    NoStages(String),
    #[error("stage {0} has no actions")]
    EmptyStage(String),
    #[error("duplicate stage name: {0}")]
    DuplicateStage(String),
    #[error("duplicate action name: {0}")]
    DuplicateAction(String),
    #[error("artifact {artifact} produced by both {first} and {second}")]
    DuplicateProducer {
        artifact: String,
        first: String,
        second: String,
    },
    #[error("action {action} reads {artifact}, which no earlier stage produces")]
    UnknownInput { action: String, artifact: String },
    #[error("action {action} reads {artifact}, which is produced in the same stage")]
    SameStageInput { action: String, artifact: String },
    #[error("source action {0} must be in the first stage")]
    MisplacedSource(String),
    #[error("action {0} in the first stage must be a source action")]
    FirstStageNotSource(String),
    #[error("source action {0} must declare exactly one output and no inputs")]
    SourceShape(String),
    #[error("build action {0} must declare at least one input and exactly one output")]
    BuildShape(String),
    #[error("deploy action {0} must not declare outputs")]
    DeployOutputs(String),
    #[error("action {action}: {artifact} is referenced but not declared as an input")]
    UndeclaredReference { action: String, artifact: String },
    #[error("build action {0} declares no commands")]
    NoCommands(String),
}

/// An immutable, validated pipeline topology
///
/// Deserializing goes through [`PipelineBuilder::build`], so a decoded
/// pipeline is held to the same rules as one assembled in code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PipelineBuilder")]
pub struct Pipeline {
    pub name: String,
    stages: Vec<Stage>,
}

impl Pipeline {
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, name: &str) -> Option<&Stage> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// Position of a stage in the total order
    pub fn stage_index(&self, name: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.name == name)
    }

    /// Find an action and the stage that holds it
    pub fn action(&self, name: &str) -> Option<(&Stage, &Action)> {
        self.stages
            .iter()
            .find_map(|s| s.action(name).map(|a| (s, a)))
    }

    /// Fresh artifact records (all `Declared`) with producers and consumers
    pub fn artifact_records(&self) -> BTreeMap<ArtifactName, ArtifactRecord> {
        let mut records = BTreeMap::new();
        for action in self.stages.iter().flat_map(|s| s.actions.iter()) {
            for output in &action.outputs {
                records.insert(
                    output.clone(),
                    ArtifactRecord::declared(output.clone(), action.name.clone()),
                );
            }
        }
        for action in self.stages.iter().flat_map(|s| s.actions.iter()) {
            for input in &action.inputs {
                if let Some(record) = records.get_mut(input) {
                    record.consumers.push(action.name.clone());
                }
            }
        }
        records
    }
}

/// Assembles a pipeline stage by stage
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Stage>,
}

impl PipelineBuilder {
    /// Append a stage; it runs strictly after every stage added before it
    pub fn add_stage(mut self, name: impl Into<String>, actions: Vec<Action>) -> Self {
        self.stages.push(Stage {
            name: name.into(),
            actions,
        });
        self
    }

    pub fn build(self) -> Result<Pipeline, DefinitionError> {
        validate(&self.name, &self.stages)?;
        Ok(Pipeline {
            name: self.name,
            stages: self.stages,
        })
    }
}

impl TryFrom<PipelineBuilder> for Pipeline {
    type Error = DefinitionError;

    fn try_from(builder: PipelineBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

fn validate(name: &str, stages: &[Stage]) -> Result<(), DefinitionError> {
    if stages.is_empty() {
        return Err(DefinitionError::NoStages(name.to_string()));
    }

    let mut stage_names = HashSet::new();
    let mut action_names = HashSet::new();
    for stage in stages {
        if !stage_names.insert(stage.name.as_str()) {
            return Err(DefinitionError::DuplicateStage(stage.name.clone()));
        }
        if stage.actions.is_empty() {
            return Err(DefinitionError::EmptyStage(stage.name.clone()));
        }
        for action in &stage.actions {
            if !action_names.insert(action.name.as_str()) {
                return Err(DefinitionError::DuplicateAction(action.name.clone()));
            }
        }
    }

    // artifact -> (producer, stage index)
    let mut producers: HashMap<&ArtifactName, (&str, usize)> = HashMap::new();
    for (index, stage) in stages.iter().enumerate() {
        for action in &stage.actions {
            validate_shape(action, index)?;
            for output in &action.outputs {
                let previous = producers.insert(output, (action.name.as_str(), index));
                if let Some((first, _)) = previous {
                    return Err(DefinitionError::DuplicateProducer {
                        artifact: output.to_string(),
                        first: first.to_string(),
                        second: action.name.clone(),
                    });
                }
            }
        }
    }

    for (index, stage) in stages.iter().enumerate() {
        for action in &stage.actions {
            for input in &action.inputs {
                match producers.get(input) {
                    None => {
                        return Err(DefinitionError::UnknownInput {
                            action: action.name.clone(),
                            artifact: input.to_string(),
                        })
                    }
                    Some((_, produced_in)) if *produced_in == index => {
                        return Err(DefinitionError::SameStageInput {
                            action: action.name.clone(),
                            artifact: input.to_string(),
                        })
                    }
                    Some((_, produced_in)) if *produced_in > index => {
                        return Err(DefinitionError::UnknownInput {
                            action: action.name.clone(),
                            artifact: input.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
            validate_references(action)?;
        }
    }

    Ok(())
}

fn validate_shape(action: &Action, stage_index: usize) -> Result<(), DefinitionError> {
    match (action.kind(), stage_index) {
        (ActionKind::SourceFetch, 0) => {}
        (ActionKind::SourceFetch, _) => {
            return Err(DefinitionError::MisplacedSource(action.name.clone()))
        }
        (_, 0) => return Err(DefinitionError::FirstStageNotSource(action.name.clone())),
        _ => {}
    }

    match &action.config {
        ActionConfig::Source(_) => {
            if !action.inputs.is_empty() || action.outputs.len() != 1 {
                return Err(DefinitionError::SourceShape(action.name.clone()));
            }
        }
        ActionConfig::Build(build) => {
            if action.inputs.is_empty() || action.outputs.len() != 1 {
                return Err(DefinitionError::BuildShape(action.name.clone()));
            }
            if build.command_sequence().is_empty() {
                return Err(DefinitionError::NoCommands(action.name.clone()));
            }
        }
        ActionConfig::Deploy(_) => {
            if !action.outputs.is_empty() {
                return Err(DefinitionError::DeployOutputs(action.name.clone()));
            }
        }
    }
    Ok(())
}

/// Artifacts named inside a deploy payload must be declared inputs
fn validate_references(action: &Action) -> Result<(), DefinitionError> {
    let ActionConfig::Deploy(deploy) = &action.config else {
        return Ok(());
    };
    let referenced = std::iter::once(&deploy.template_path.artifact)
        .chain(deploy.parameter_overrides.iter().map(|b| &b.artifact));
    for artifact in referenced {
        if !action.inputs.contains(artifact) {
            return Err(DefinitionError::UndeclaredReference {
                action: action.name.clone(),
                artifact: artifact.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
