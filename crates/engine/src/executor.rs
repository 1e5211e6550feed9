// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use crate::job::Job;
use crate::RuntimeDeps;
use std::sync::{Arc, Mutex};
use sw_adapters::{BuildAdapter, DeployAdapter, SourceAdapter};
use sw_core::{
    ActionFailure, ActionResult, DeploymentRecord, Event, Operation, ProducedArtifact,
};
use sw_storage::{MaterializedState, Wal};
use thiserror::Error;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("storage error: {0}")]
    Storage(#[from] sw_storage::WalError),
}

/// Persists operations and runs jobs against the configured adapters
#[derive(Clone)]
pub struct Executor<S, B, D> {
    source: S,
    build: B,
    deploy: D,
    wal: Arc<Mutex<Wal>>,
    state: Arc<Mutex<MaterializedState>>,
}

impl<S, B, D> Executor<S, B, D>
where
    S: SourceAdapter,
    B: BuildAdapter,
    D: DeployAdapter,
{
    pub fn new(deps: &RuntimeDeps<S, B, D>) -> Self {
        Self {
            source: deps.source.clone(),
            build: deps.build.clone(),
            deploy: deps.deploy.clone(),
            wal: Arc::clone(&deps.wal),
            state: Arc::clone(&deps.state),
        }
    }

    /// Append to the WAL, then apply to materialized state
    pub fn persist(&self, operation: &Operation) -> Result<(), ExecuteError> {
        {
            let mut wal = self.wal.lock().unwrap_or_else(|e| e.into_inner());
            wal.append(operation)?;
        }
        {
            let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
            state.apply(operation);
        }
        tracing::debug!(execution = operation.execution_id(), ?operation, "persisted");
        Ok(())
    }

    /// Run a job to completion and report the event it produced.
    ///
    /// Collaborator errors become `ActionFailed`; a job never fails the
    /// engine.
    pub async fn run(&self, job: Job) -> Event {
        let span = tracing::info_span!("action", action = job.action());
        async {
            let start = std::time::Instant::now();
            let action = job.action().to_string();
            let result = self.run_inner(job).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(result) => {
                    tracing::info!(elapsed_ms, outputs = result.outputs.len(), "succeeded");
                    Event::ActionSucceeded { action, result }
                }
                Err(failure) => {
                    tracing::error!(elapsed_ms, kind = %failure.kind, diagnostic = %failure.diagnostic, "failed");
                    Event::ActionFailed { action, failure }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run_inner(&self, job: Job) -> Result<ActionResult, ActionFailure> {
        match job {
            Job::Source {
                output, request, ..
            } => {
                let snapshot = self
                    .source
                    .fetch(&request)
                    .await
                    .map_err(|e| ActionFailure::new(e.kind(), e.to_string()))?;
                Ok(ActionResult {
                    outputs: vec![ProducedArtifact {
                        name: output,
                        location: request.output,
                        files: snapshot.files,
                    }],
                    revision: Some(snapshot.revision),
                    deployment: None,
                })
            }

            Job::Build {
                output, request, ..
            } => {
                let built = self
                    .build
                    .build(&request)
                    .await
                    .map_err(|e| ActionFailure::new(e.kind(), e.to_string()))?;
                Ok(ActionResult {
                    outputs: vec![ProducedArtifact {
                        name: output,
                        location: built.location,
                        files: built.files,
                    }],
                    revision: None,
                    deployment: None,
                })
            }

            Job::Deploy {
                template, request, ..
            } => {
                let outcome = self
                    .deploy
                    .deploy(&request)
                    .await
                    .map_err(|e| ActionFailure::new(e.kind(), e.to_string()))?;
                Ok(ActionResult {
                    outputs: Vec::new(),
                    revision: None,
                    deployment: Some(DeploymentRecord {
                        unit: request.unit,
                        outcome,
                        parameters: request.parameters,
                        template: template.to_string(),
                    }),
                })
            }
        }
    }
}
