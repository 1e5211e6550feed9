// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw run`: execute the pipeline once with local collaborators

use super::{load_pipeline, ManifestArgs};
use crate::config::Config;
use crate::error::SwError;
use crate::logging::setup_logging;
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};
use sw_adapters::{
    GitSourceAdapter, LocalArtifactStore, LocalDeployAdapter, ShellBuildAdapter,
    TracedBuildAdapter, TracedDeployAdapter, TracedSourceAdapter,
};
use sw_core::{Execution, ExecutionStatus, SystemClock, UuidIdGen};
use sw_engine::{CancelHandle, Runtime, RuntimeDeps};
use sw_storage::{MaterializedState, Wal};

pub async fn run(args: ManifestArgs, config: &Config) -> anyhow::Result<()> {
    let pipeline = load_pipeline(config, &args)?;

    fs::create_dir_all(&config.state_dir)?;
    // NOTE(lifetime): held until the execution finishes; released on drop
    let lock_file = OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&config.lock_path)?;
    if lock_file.try_lock_exclusive().is_err() {
        return Err(SwError::run_in_progress(&config.lock_path).into());
    }

    let _log_guard = setup_logging(config)?;
    tracing::info!(project = %config.project_root.display(), pipeline = %pipeline.name, "sw run");

    let state = MaterializedState::load(&config.wal_path)?;
    let wal = Wal::open(&config.wal_path)?;
    let store = LocalArtifactStore::new(&config.artifacts_path);

    let runtime = Runtime::new(
        RuntimeDeps {
            source: TracedSourceAdapter::new(GitSourceAdapter::new(
                config.project_root.clone(),
                store.clone(),
            )),
            build: TracedBuildAdapter::new(ShellBuildAdapter::new(store.clone())),
            deploy: TracedDeployAdapter::new(LocalDeployAdapter::new(
                store.clone(),
                config.units_path.clone(),
            )),
            store,
            wal: Arc::new(Mutex::new(wal)),
            state: Arc::new(Mutex::new(state)),
        },
        SystemClock,
        UuidIdGen,
    );

    let cancel = CancelHandle::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Cancelling: the active stage will finish first");
            on_interrupt.cancel();
        }
    });

    let execution = runtime.execute(&pipeline, &cancel).await?;
    print!("{}", Summary(&execution));

    let _ = FileExt::unlock(&lock_file);
    if execution.status == ExecutionStatus::Succeeded {
        Ok(())
    } else {
        Err(SwError::execution_unsuccessful(&execution, &config.log_path).into())
    }
}

struct Summary<'a>(&'a Execution);

impl std::fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let execution = self.0;
        writeln!(f, "Execution {}: {}", execution.id, execution.status)?;
        if let Some(revision) = &execution.revision {
            writeln!(f, "  Revision: {}", revision)?;
        }
        for stage in &execution.stages {
            writeln!(f, "  {:<10} {}", stage.name, stage.status)?;
        }
        if let Some(deployment) = &execution.deployment {
            writeln!(f, "  Unit {}: {}", deployment.unit, deployment.outcome)?;
        }
        Ok(())
    }
}
