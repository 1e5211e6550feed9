// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw units`: deployment units known to the local deploy collaborator

use crate::config::Config;
use crate::output::{self, OutputFormat};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use sw_adapters::{DeployAdapter, LocalArtifactStore, LocalDeployAdapter, UnitRecord};
use sw_storage::MaterializedState;

#[derive(Args, Debug)]
pub struct UnitsArgs {
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct UnitRow {
    unit: String,
    version: u64,
    template: String,
    /// Outcome of the most recent deploy action, if it is in the WAL
    last_outcome: Option<String>,
    last_execution: Option<String>,
    parameters: BTreeMap<String, String>,
}

impl fmt::Display for UnitRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let execution = self.last_execution.as_deref().unwrap_or("-");
        write!(
            f,
            "{:<28} {:<8} {:<10} {}",
            self.unit,
            self.version,
            self.last_outcome.as_deref().unwrap_or("-"),
            &execution[..12.min(execution.len())]
        )
    }
}

fn rows(records: Vec<UnitRecord>, state: &MaterializedState) -> Vec<UnitRow> {
    records
        .into_iter()
        .map(|record| {
            let summary = state.units.get(&record.unit);
            UnitRow {
                last_outcome: summary.map(|s| s.outcome.to_string()),
                last_execution: summary.map(|s| s.execution_id.clone()),
                unit: record.unit,
                version: record.version,
                template: record.template,
                parameters: record.parameters,
            }
        })
        .collect()
}

pub async fn units(args: UnitsArgs, config: &Config) -> anyhow::Result<()> {
    let adapter = LocalDeployAdapter::new(
        LocalArtifactStore::new(&config.artifacts_path),
        config.units_path.clone(),
    );
    let records = adapter.units().await?;
    let state = MaterializedState::load(&config.wal_path)?;

    output::print_list(
        &rows(records, &state),
        &format!(
            "{:<28} {:<8} {:<10} EXECUTION",
            "UNIT", "VERSION", "OUTCOME"
        ),
        "No deployment units",
        args.format,
    );
    Ok(())
}
