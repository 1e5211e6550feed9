// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw validate`: parse the manifest and print its topology

use super::{load_pipeline, ManifestArgs};
use crate::config::Config;
use std::fmt;
use sw_core::{ActionConfig, Pipeline};

pub fn validate(args: ManifestArgs, config: &Config) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config, &args)?;
    print!("{}", Topology(&pipeline));
    Ok(())
}

/// Stage-by-stage listing of actions and the artifacts they move
pub struct Topology<'a>(pub &'a Pipeline);

impl fmt::Display for Topology<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pipeline = self.0;
        writeln!(
            f,
            "Pipeline {}: {} stages",
            pipeline.name,
            pipeline.stages().len()
        )?;
        for (i, stage) in pipeline.stages().iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, stage.name)?;
            for action in &stage.actions {
                let inputs = join(action.inputs.iter().map(|a| a.to_string()));
                let target = match &action.config {
                    ActionConfig::Deploy(deploy) => format!("unit {}", deploy.stack_name),
                    _ => join(action.outputs.iter().map(|a| a.to_string())),
                };
                writeln!(
                    f,
                    "       {} ({}) {} -> {}",
                    action.name,
                    action.kind(),
                    if inputs.is_empty() { "-" } else { &inputs },
                    target
                )?;
            }
        }
        Ok(())
    }
}

fn join(items: impl Iterator<Item = String>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sw_core::{serverless_pipeline, BlueprintConfig};

    #[test]
    fn blueprint_topology() {
        let pipeline = serverless_pipeline(&BlueprintConfig::default()).unwrap();
        let text = Topology(&pipeline).to_string();

        assert!(text.starts_with("Pipeline LambdaPipeline: 3 stages\n"));
        assert!(text.contains("Code_Source (source) - -> source_output"));
        assert!(text.contains("CDK_Build (build) source_output -> cdk_build_output"));
        assert!(text.contains(
            "Lambda_CFN_Deploy (deploy) cdk_build_output, lambda_build_output -> unit LambdaStackDeployedName"
        ));
    }
}
