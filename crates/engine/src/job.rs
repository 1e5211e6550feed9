// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Collaborator requests for dispatched actions
//!
//! A job is prepared at dispatch time from the execution as it stands:
//! input locations come from populated artifacts, output locations from the
//! artifact store, and `{execution_id}`, `{revision}`, `{pipeline}`
//! placeholders are filled in.
//!
//! Build outputs are requested under a `{pipeline}/{revision}` prefix; the
//! build collaborator publishes below it by content digest. Re-running an
//! unchanged revision with a reproducible build binds the same locations
//! and leaves the deployment unit unchanged, while a build that produced
//! different files gets a new location.

use std::collections::HashMap;
use sw_adapters::{BuildRequest, DeployRequest, LocalArtifactStore, SourceRequest};
use sw_core::{
    resolve_all, Action, ActionConfig, ActionFailure, ArtifactLocation, ArtifactName,
    ArtifactPath, ArtifactState, Execution, FailureKind,
};
use sw_manifest::interpolate;

/// One action, ready to hand to its collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    Source {
        action: String,
        output: ArtifactName,
        request: SourceRequest,
    },
    Build {
        action: String,
        output: ArtifactName,
        request: BuildRequest,
    },
    Deploy {
        action: String,
        template: ArtifactPath,
        request: DeployRequest,
    },
}

impl Job {
    pub fn action(&self) -> &str {
        match self {
            Job::Source { action, .. } | Job::Build { action, .. } | Job::Deploy { action, .. } => {
                action
            }
        }
    }

    /// Prepare `action` against the current state of `execution`.
    ///
    /// Fails with `ArtifactMissingOrEmpty` when an input is not populated,
    /// which the caller reports as the action's failure.
    pub fn prepare(
        action: &Action,
        execution: &Execution,
        store: &LocalArtifactStore,
    ) -> Result<Job, ActionFailure> {
        let vars = variables(execution);

        match &action.config {
            ActionConfig::Source(config) => {
                let output = single_output(action)?;
                Ok(Job::Source {
                    action: action.name.clone(),
                    request: SourceRequest {
                        repository: interpolate(&config.repository, &vars),
                        branch: interpolate(&config.branch, &vars),
                        output: store.location_for(&output_scope(execution), &output),
                    },
                    output,
                })
            }

            ActionConfig::Build(config) => {
                let input = action.inputs.first().ok_or_else(|| {
                    missing(format!("{} declares no input artifact", action.name))
                })?;
                let output = single_output(action)?;
                Ok(Job::Build {
                    action: action.name.clone(),
                    request: BuildRequest {
                        project: config.project.clone(),
                        image: config.image.clone(),
                        input: populated(execution, input)?,
                        commands: config
                            .command_sequence()
                            .iter()
                            .map(|c| interpolate(c, &vars))
                            .collect(),
                        artifact_files: config.artifact_files.clone(),
                        base_directory: config.base_directory.clone(),
                        output: store.location_for(&output_scope(execution), &output),
                        env: environment(execution),
                    },
                    output,
                })
            }

            ActionConfig::Deploy(config) => {
                for input in &action.inputs {
                    populated(execution, input)?;
                }
                let template = &config.template_path;
                let template_location = populated(execution, &template.artifact)?;
                let has_template = execution
                    .artifact_state(&template.artifact)
                    .is_some_and(|state| state.contains(&template.path));
                if !has_template {
                    return Err(missing(format!(
                        "template {} not found in artifact {}",
                        template.path, template.artifact
                    )));
                }

                let parameters = resolve_all(&config.parameter_overrides, |name| {
                    execution
                        .artifact_state(name)
                        .and_then(ArtifactState::location)
                })
                .map_err(|artifact| {
                    missing(format!("artifact {} has no location to bind", artifact))
                })?;

                Ok(Job::Deploy {
                    action: action.name.clone(),
                    template: template.clone(),
                    request: DeployRequest {
                        unit: interpolate(&config.stack_name, &vars),
                        template: template_location,
                        template_path: template.path.clone(),
                        parameters,
                        admin_permissions: config.admin_permissions,
                    },
                })
            }
        }
    }
}

fn output_scope(execution: &Execution) -> String {
    match &execution.revision {
        Some(revision) => format!("{}/{}", execution.pipeline, revision),
        None => execution.id.clone(),
    }
}

fn variables(execution: &Execution) -> HashMap<String, String> {
    environment(execution)
        .into_iter()
        .filter_map(|(key, value)| {
            key.strip_prefix("SW_")
                .map(|name| (name.to_ascii_lowercase(), value))
        })
        .collect()
}

/// Environment exported to build commands
fn environment(execution: &Execution) -> Vec<(String, String)> {
    vec![
        ("SW_EXECUTION_ID".to_string(), execution.id.clone()),
        (
            "SW_REVISION".to_string(),
            execution.revision.clone().unwrap_or_default(),
        ),
        ("SW_PIPELINE".to_string(), execution.pipeline.clone()),
    ]
}

fn populated(execution: &Execution, name: &ArtifactName) -> Result<ArtifactLocation, ActionFailure> {
    execution
        .artifact_state(name)
        .and_then(ArtifactState::location)
        .cloned()
        .ok_or_else(|| missing(format!("input artifact {} is not populated", name)))
}

fn single_output(action: &Action) -> Result<ArtifactName, ActionFailure> {
    action
        .outputs
        .first()
        .cloned()
        .ok_or_else(|| missing(format!("{} declares no output artifact", action.name)))
}

fn missing(diagnostic: String) -> ActionFailure {
    ActionFailure::new(FailureKind::ArtifactMissingOrEmpty, diagnostic)
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
