// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Render a pipeline back to manifest TOML (used by `sw init`)

use sw_core::{Action, ActionConfig, Pipeline};
use toml::map::Map;
use toml::Value;

/// Render `pipeline` as a manifest that parses back to the same pipeline
pub fn render_manifest(pipeline: &Pipeline) -> Result<String, toml::ser::Error> {
    let mut root = Map::new();

    let mut header = Map::new();
    header.insert("name".to_string(), Value::String(pipeline.name.clone()));
    root.insert("pipeline".to_string(), Value::Table(header));

    let mut stages = Vec::new();
    for stage in pipeline.stages() {
        let mut table = Map::new();
        table.insert("name".to_string(), Value::String(stage.name.clone()));
        let actions = stage
            .actions
            .iter()
            .map(render_action)
            .collect::<Result<Vec<_>, _>>()?;
        table.insert("action".to_string(), Value::Array(actions));
        stages.push(Value::Table(table));
    }
    root.insert("stage".to_string(), Value::Array(stages));

    toml::to_string_pretty(&Value::Table(root))
}

fn render_action(action: &Action) -> Result<Value, toml::ser::Error> {
    let mut t = Map::new();
    t.insert("name".to_string(), string(&action.name));
    t.insert("kind".to_string(), string(action.kind().name()));

    match &action.config {
        ActionConfig::Source(source) => {
            t.insert("repository".to_string(), string(&source.repository));
            t.insert("branch".to_string(), string(&source.branch));
            if let Some(output) = action.outputs.first() {
                t.insert("output".to_string(), string(output.as_str()));
            }
        }

        ActionConfig::Build(build) => {
            t.insert("project".to_string(), string(&build.project));
            if let Some(image) = &build.image {
                t.insert("image".to_string(), string(image));
            }
            if let Some(input) = action.inputs.first() {
                t.insert("input".to_string(), string(input.as_str()));
            }
            if let Some(output) = action.outputs.first() {
                t.insert("output".to_string(), string(output.as_str()));
            }
            if !build.install.is_empty() {
                t.insert("install".to_string(), strings(&build.install));
            }
            t.insert("commands".to_string(), strings(&build.commands));
            t.insert("artifact_files".to_string(), strings(&build.artifact_files));
            if let Some(base) = &build.base_directory {
                t.insert("base_directory".to_string(), string(base));
            }
        }

        ActionConfig::Deploy(deploy) => {
            t.insert(
                "template".to_string(),
                string(&deploy.template_path.to_string()),
            );
            t.insert("stack_name".to_string(), string(&deploy.stack_name));
            t.insert(
                "admin_permissions".to_string(),
                Value::Boolean(deploy.admin_permissions),
            );
            let extra: Vec<String> = action
                .inputs
                .iter()
                .filter(|i| **i != deploy.template_path.artifact)
                .map(|i| i.to_string())
                .collect();
            if !extra.is_empty() {
                t.insert("extra_inputs".to_string(), strings(&extra));
            }
            if !deploy.parameter_overrides.is_empty() {
                let bindings = deploy
                    .parameter_overrides
                    .iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>, _>>()?;
                t.insert("parameter".to_string(), Value::Array(bindings));
            }
        }
    }
    Ok(Value::Table(t))
}

fn string(s: &str) -> Value {
    Value::String(s.to_string())
}

fn strings(items: &[String]) -> Value {
    Value::Array(items.iter().map(|s| string(s)).collect())
}
