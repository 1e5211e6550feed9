// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw list` and `sw show`: executions recorded in the WAL

use crate::config::Config;
use crate::error::SwError;
use crate::output::{self, duration, timestamp, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::fmt;
use sw_core::{ArtifactState, Execution};
use sw_storage::MaterializedState;

#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Execution id or unique prefix
    pub id: String,
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct ExecutionRow {
    id: String,
    pipeline: String,
    status: String,
    revision: Option<String>,
    created_at_ms: i64,
}

impl From<&Execution> for ExecutionRow {
    fn from(execution: &Execution) -> Self {
        Self {
            id: execution.id.clone(),
            pipeline: execution.pipeline.clone(),
            status: execution.status.to_string(),
            revision: execution.revision.clone(),
            created_at_ms: execution.created_at_ms,
        }
    }
}

impl fmt::Display for ExecutionRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let revision = self.revision.as_deref().unwrap_or("-");
        write!(
            f,
            "{:<12} {:<20} {:<10} {:<12} {}",
            &self.id[..12.min(self.id.len())],
            &self.pipeline[..20.min(self.pipeline.len())],
            self.status,
            &revision[..12.min(revision.len())],
            timestamp(self.created_at_ms)
        )
    }
}

pub fn list(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let state = MaterializedState::load(&config.wal_path)?;
    let rows: Vec<ExecutionRow> = state
        .executions_by_age()
        .into_iter()
        .map(ExecutionRow::from)
        .collect();
    output::print_list(
        &rows,
        &format!(
            "{:<12} {:<20} {:<10} {:<12} CREATED",
            "ID", "PIPELINE", "STATUS", "REVISION"
        ),
        "No executions",
        args.format,
    );
    Ok(())
}

pub fn show(args: ShowArgs, config: &Config) -> anyhow::Result<()> {
    let state = MaterializedState::load(&config.wal_path)?;
    let execution = state
        .get_execution(&args.id)
        .ok_or_else(|| SwError::execution_not_found(&args.id))?;
    output::print(&Detail(execution), args.format);
    Ok(())
}

/// Full view of one execution
#[derive(Serialize)]
#[serde(transparent)]
struct Detail<'a>(&'a Execution);

impl fmt::Display for Detail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let e = self.0;
        writeln!(f, "Execution: {}", e.id)?;
        writeln!(f, "  Pipeline: {}", e.pipeline)?;
        writeln!(f, "  Status: {}", e.status)?;
        if e.cancel_requested {
            writeln!(f, "  Cancel requested")?;
        }
        writeln!(f, "  Revision: {}", e.revision.as_deref().unwrap_or("-"))?;
        writeln!(f, "  Created: {}", timestamp(e.created_at_ms))?;
        if let Some(finished) = e.finished_at_ms {
            writeln!(f, "  Finished: {}", timestamp(finished))?;
        }

        writeln!(f, "  Stages:")?;
        for stage in &e.stages {
            writeln!(
                f,
                "    {:<10} {:<10} {}",
                stage.name,
                stage.status,
                duration(stage.started_at_ms, stage.finished_at_ms)
            )?;
            for action in &stage.actions {
                writeln!(
                    f,
                    "      {:<20} {:<10} {}",
                    action.name,
                    action.status,
                    duration(action.started_at_ms, action.finished_at_ms)
                )?;
            }
        }

        writeln!(f, "  Artifacts:")?;
        for record in e.artifacts.values() {
            match &record.state {
                ArtifactState::Populated { location, files } => writeln!(
                    f,
                    "    {:<20} {:<10} {} ({} files)",
                    record.name,
                    record.state.name(),
                    location,
                    files.len()
                )?,
                state => writeln!(f, "    {:<20} {}", record.name, state.name())?,
            }
        }

        if let Some(failure) = &e.failure {
            writeln!(f, "  Failure: {}", failure)?;
        }
        if let Some(deployment) = &e.deployment {
            writeln!(f, "  Deployment: {} ({})", deployment.unit, deployment.outcome)?;
            for (name, value) in &deployment.parameters {
                writeln!(f, "    {} = {}", name, value)?;
            }
        }
        Ok(())
    }
}
