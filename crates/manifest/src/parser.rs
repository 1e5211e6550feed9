// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest TOML parsing
//!
//! ```toml
//! [pipeline]
//! name = "LambdaPipeline"
//!
//! [[stage]]
//! name = "Source"
//!
//! [[stage.action]]
//! name = "Code_Source"
//! kind = "source"
//! repository = "."
//! output = "source_output"
//! ```
//!
//! String values go through `${VAR:-default}` expansion, except the
//! run-time `${SW_*}` names build commands receive. `{var}` placeholders
//! are kept for the engine to fill per execution.

use crate::template::expand_env;
use std::path::Path;
use sw_core::{
    Action, ArtifactName, ArtifactPath, BuildConfig, DefinitionError, DeployConfig,
    ParameterBinding, Pipeline, SourceConfig,
};
use thiserror::Error;

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
    #[error("invalid pipeline: {0}")]
    Definition(#[from] DefinitionError),
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Read and parse the manifest at `path`
pub fn load_manifest(path: &Path) -> Result<Pipeline, ParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_manifest(&content)
}

/// Parse a manifest into a validated pipeline
pub fn parse_manifest(content: &str) -> Result<Pipeline, ParseError> {
    let raw: toml::Value = toml::from_str(content)?;
    let table = raw
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat("root must be a table".to_string()))?;

    let name = table
        .get("pipeline")
        .and_then(|v| v.as_table())
        .ok_or_else(|| ParseError::MissingField("pipeline".to_string()))
        .and_then(|t| required_str(t, "name", "pipeline"))?;

    let stages = match table.get("stage") {
        None => Vec::new(),
        Some(toml::Value::Array(stages)) => stages.clone(),
        Some(_) => {
            return Err(ParseError::InvalidFormat(
                "stage must be an array of tables ([[stage]])".to_string(),
            ))
        }
    };

    let mut builder = Pipeline::builder(name);
    for (index, value) in stages.iter().enumerate() {
        let (stage, actions) = parse_stage(index, value)?;
        builder = builder.add_stage(stage, actions);
    }
    Ok(builder.build()?)
}

fn parse_stage(index: usize, value: &toml::Value) -> Result<(String, Vec<Action>), ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("stage[{}] must be a table", index)))?;
    let name = required_str(table, "name", &format!("stage[{}]", index))?;

    let actions = match table.get("action") {
        None => Vec::new(),
        Some(toml::Value::Array(actions)) => actions
            .iter()
            .enumerate()
            .map(|(i, a)| parse_action(&format!("stage.{}.action[{}]", name, i), a))
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => {
            return Err(ParseError::InvalidFormat(format!(
                "stage.{}.action must be an array of tables",
                name
            )))
        }
    };
    Ok((name, actions))
}

fn parse_action(context: &str, value: &toml::Value) -> Result<Action, ParseError> {
    let table = value
        .as_table()
        .ok_or_else(|| ParseError::InvalidFormat(format!("{} must be a table", context)))?;
    let name = required_str(table, "name", context)?;
    let context = format!("action.{}", name);
    let kind = required_str(table, "kind", &context)?;

    match kind.as_str() {
        "source" => {
            let mut config = SourceConfig::new(required_str(table, "repository", &context)?);
            if let Some(branch) = optional_str(table, "branch", &context)? {
                config.branch = branch;
            }
            let output = required_str(table, "output", &context)?;
            Ok(Action::source(name, config, ArtifactName::new(output)))
        }

        "build" => {
            let config = BuildConfig {
                project: optional_str(table, "project", &context)?.unwrap_or_else(|| name.clone()),
                image: optional_str(table, "image", &context)?,
                install: str_list(table, "install", &context)?,
                commands: str_list(table, "commands", &context)?,
                artifact_files: str_list(table, "artifact_files", &context)?,
                base_directory: optional_str(table, "base_directory", &context)?,
            };
            let input = required_str(table, "input", &context)?;
            let output = required_str(table, "output", &context)?;
            Ok(Action::build(
                name,
                config,
                ArtifactName::new(input),
                ArtifactName::new(output),
            ))
        }

        "deploy" => {
            let template = required_str(table, "template", &context)?;
            let (artifact, path) = template.split_once("::").ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "{}.template must look like artifact::path, got {}",
                    context, template
                ))
            })?;
            let config = DeployConfig {
                template_path: ArtifactPath {
                    artifact: ArtifactName::new(artifact),
                    path: path.to_string(),
                },
                stack_name: required_str(table, "stack_name", &context)?,
                admin_permissions: table
                    .get("admin_permissions")
                    .map(|v| {
                        v.as_bool().ok_or_else(|| {
                            ParseError::InvalidFormat(format!(
                                "{}.admin_permissions must be a boolean",
                                context
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(false),
                parameter_overrides: parse_bindings(table, &context)?,
            };
            let extra_inputs = str_list(table, "extra_inputs", &context)?
                .into_iter()
                .map(ArtifactName::new)
                .collect();
            Ok(Action::deploy(name, config, extra_inputs))
        }

        other => Err(ParseError::InvalidFormat(format!(
            "{}.kind must be source, build or deploy, got {}",
            context, other
        ))),
    }
}

fn parse_bindings(
    table: &toml::map::Map<String, toml::Value>,
    context: &str,
) -> Result<Vec<ParameterBinding>, ParseError> {
    let Some(value) = table.get("parameter") else {
        return Ok(Vec::new());
    };
    let entries = value.as_array().ok_or_else(|| {
        ParseError::InvalidFormat(format!("{}.parameter must be an array of tables", context))
    })?;
    entries
        .iter()
        .map(|entry| {
            entry
                .clone()
                .try_into::<ParameterBinding>()
                .map_err(|e| ParseError::InvalidFormat(format!("{}.parameter: {}", context, e)))
        })
        .collect()
}

fn required_str(
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    context: &str,
) -> Result<String, ParseError> {
    optional_str(table, key, context)?
        .ok_or_else(|| ParseError::MissingField(format!("{}.{}", context, key)))
}

fn optional_str(
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    context: &str,
) -> Result<Option<String>, ParseError> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(expand_env(s))),
        Some(_) => Err(ParseError::InvalidFormat(format!(
            "{}.{} must be a string",
            context, key
        ))),
    }
}

fn str_list(
    table: &toml::map::Map<String, toml::Value>,
    key: &str,
    context: &str,
) -> Result<Vec<String>, ParseError> {
    let Some(value) = table.get(key) else {
        return Ok(Vec::new());
    };
    let invalid = || ParseError::InvalidFormat(format!("{}.{} must be a list of strings", context, key));
    value
        .as_array()
        .ok_or_else(invalid)?
        .iter()
        .map(|v| v.as_str().map(expand_env).ok_or_else(invalid))
        .collect()
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
