// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod executions;
pub mod init;
pub mod run;
pub mod units;
pub mod validate;

use crate::config::Config;
use crate::error::SwError;
use clap::Args;
use std::path::PathBuf;
use sw_core::Pipeline;
use sw_manifest::{load_manifest, ParseError};

/// Which manifest to load
#[derive(Args, Debug, Default)]
pub struct ManifestArgs {
    /// Manifest path, relative to the project root (default: sw.toml)
    #[arg(long, short)]
    pub manifest: Option<PathBuf>,
}

/// Load and validate the selected manifest
pub fn load_pipeline(config: &Config, args: &ManifestArgs) -> Result<Pipeline, SwError> {
    let path = config.manifest(args.manifest.as_deref());
    match load_manifest(&path) {
        Ok(pipeline) => Ok(pipeline),
        Err(ParseError::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(SwError::manifest_not_found(&path))
        }
        Err(err) => Err(SwError::manifest_invalid(&path, err)),
    }
}
