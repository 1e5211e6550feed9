// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! sw - staged deployment pipelines for serverless functions

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;
mod completions;
mod config;
mod error;
mod logging;
mod output;

use clap::{Parser, Subcommand};
use commands::{executions, init, run, units, validate, ManifestArgs};
use completions::CompletionsArgs;
use config::{Config, MANIFEST_FILE};
use error::SwError;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "sw",
    version,
    about = "Stagewright - Source, Build and Deploy pipelines for serverless functions"
)]
struct Cli {
    /// Project root directory (default: nearest directory with sw.toml)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the serverless blueprint manifest to sw.toml
    Init(init::InitArgs),
    /// Parse the manifest and print the pipeline topology
    Validate(ManifestArgs),
    /// Execute the pipeline once
    Run(ManifestArgs),
    /// List executions
    List(executions::ListArgs),
    /// Show details of an execution
    Show(executions::ShowArgs),
    /// List deployment units
    Units(units::UnitsArgs),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match dispatch(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<SwError>() {
                Some(sw) => eprint!("{}", sw),
                None => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let project_root = match cli.project {
        Some(root) => root,
        None => find_project_root(&std::env::current_dir()?),
    };
    let config = Config::for_project(&project_root);

    match cli.command {
        Commands::Init(args) => init::init(args, &config),
        Commands::Validate(args) => validate::validate(args, &config),
        Commands::Run(args) => run::run(args, &config).await,
        Commands::List(args) => executions::list(args, &config),
        Commands::Show(args) => executions::show(args, &config),
        Commands::Units(args) => units::units(args, &config).await,
        Commands::Completions(args) => {
            completions::write_completions::<Cli>(args.shell, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Nearest ancestor of `start` holding a manifest, else `start`
fn find_project_root(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(MANIFEST_FILE).is_file())
        .unwrap_or(start)
        .to_path_buf()
}
