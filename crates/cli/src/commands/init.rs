// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw init`: write the serverless blueprint manifest

use crate::config::Config;
use crate::error::SwError;
use clap::Args;
use sw_core::{serverless_pipeline, BlueprintConfig};
use sw_manifest::render_manifest;

const HEADER: &str = "\
# Stagewright pipeline: Source -> Build -> Deploy for a Python function
# defined with the CDK. Strings accept ${ENV:-default}; build commands and
# stack names also accept {execution_id}, {revision} and {pipeline}.

";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing manifest
    #[arg(long)]
    pub force: bool,
    /// Repository to fetch, relative to the project root or a URL
    #[arg(long, default_value = ".")]
    pub repository: String,
    #[arg(long, default_value = "main")]
    pub branch: String,
}

pub fn init(args: InitArgs, config: &Config) -> anyhow::Result<()> {
    let path = &config.manifest_path;
    if path.exists() && !args.force {
        return Err(SwError::manifest_exists(path).into());
    }

    let blueprint = BlueprintConfig {
        repository: args.repository,
        branch: args.branch,
        ..BlueprintConfig::default()
    };
    let pipeline = serverless_pipeline(&blueprint)?;
    let manifest = render_manifest(&pipeline)?;
    std::fs::write(path, format!("{}{}", HEADER, manifest))?;

    println!("Wrote {}", path.display());
    Ok(())
}
