// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime for the stagewright engine
//!
//! Drives one execution at a time: events go through the pure state
//! machine, and the resulting effects are persisted or dispatched here.
//! Actions of the active stage run concurrently on a `JoinSet`.

use crate::cancel::CancelHandle;
use crate::job::Job;
use crate::{error::RuntimeError, Executor};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use sw_adapters::{BuildAdapter, DeployAdapter, LocalArtifactStore, SourceAdapter};
use sw_core::{Clock, Effect, Event, Execution, IdGen, Pipeline};
use sw_storage::{MaterializedState, Wal};
use tokio::task::JoinSet;
use tracing::Instrument;

/// Runtime adapter dependencies
pub struct RuntimeDeps<S, B, D> {
    pub source: S,
    pub build: B,
    pub deploy: D,
    pub store: LocalArtifactStore,
    pub wal: Arc<Mutex<Wal>>,
    pub state: Arc<Mutex<MaterializedState>>,
}

/// Runtime that coordinates executions
pub struct Runtime<S, B, D, C: Clock, I: IdGen> {
    executor: Executor<S, B, D>,
    store: LocalArtifactStore,
    state: Arc<Mutex<MaterializedState>>,
    clock: C,
    id_gen: I,
}

impl<S, B, D, C, I> Runtime<S, B, D, C, I>
where
    S: SourceAdapter,
    B: BuildAdapter,
    D: DeployAdapter,
    C: Clock,
    I: IdGen,
{
    /// Create a new runtime
    pub fn new(deps: RuntimeDeps<S, B, D>, clock: C, id_gen: I) -> Self {
        Self {
            executor: Executor::new(&deps),
            store: deps.store,
            state: deps.state,
            clock,
            id_gen,
        }
    }

    /// Shared materialized state
    pub fn state(&self) -> Arc<Mutex<MaterializedState>> {
        Arc::clone(&self.state)
    }

    /// Run `pipeline` once, to a terminal status.
    ///
    /// Action failures end the execution as `Failed` and are returned in
    /// the execution, not as an error.
    pub async fn execute(
        &self,
        pipeline: &Pipeline,
        cancel: &CancelHandle,
    ) -> Result<Execution, RuntimeError> {
        let (execution, create) = Execution::create(self.id_gen.next(), pipeline, &self.clock);
        self.executor.persist(&create)?;

        let span = tracing::info_span!("execution", id = %execution.id, pipeline = %pipeline.name);
        self.drive(pipeline, execution, cancel)
            .instrument(span)
            .await
    }

    async fn drive(
        &self,
        pipeline: &Pipeline,
        mut execution: Execution,
        cancel: &CancelHandle,
    ) -> Result<Execution, RuntimeError> {
        tracing::info!(stages = pipeline.stages().len(), "created");

        let mut queue = VecDeque::from([Event::Started]);
        let mut cancel_rx = cancel.subscribe();
        let mut watching_cancel = true;
        if *cancel_rx.borrow_and_update() {
            queue.push_back(Event::CancelRequested);
            watching_cancel = false;
        }

        let mut actions = JoinSet::new();
        loop {
            while let Some(event) = queue.pop_front() {
                tracing::debug!(event = event.name(), "event");
                let (next, effects) = execution.transition(&event, &self.clock);
                execution = next;
                for effect in effects {
                    self.apply_effect(pipeline, &execution, effect, &mut queue, &mut actions)?;
                }
            }

            if execution.is_terminal() {
                break;
            }
            if actions.is_empty() {
                return Err(RuntimeError::Stalled(execution.id.clone()));
            }

            tokio::select! {
                joined = actions.join_next() => {
                    if let Some(joined) = joined {
                        queue.push_back(joined?);
                    }
                }
                changed = cancel_rx.changed(), if watching_cancel => {
                    match changed {
                        Ok(()) => {
                            let cancelled = *cancel_rx.borrow_and_update();
                            if cancelled {
                                tracing::info!("cancel requested");
                                queue.push_back(Event::CancelRequested);
                                watching_cancel = false;
                            }
                        }
                        Err(_) => watching_cancel = false,
                    }
                }
            }
        }

        tracing::info!(status = %execution.status, "finished");
        Ok(execution)
    }

    fn apply_effect(
        &self,
        pipeline: &Pipeline,
        execution: &Execution,
        effect: Effect,
        queue: &mut VecDeque<Event>,
        actions: &mut JoinSet<Event>,
    ) -> Result<(), RuntimeError> {
        match effect {
            Effect::Persist { operation } => self.executor.persist(&operation)?,

            Effect::StartStage { stage } => {
                tracing::info!(%stage, "starting stage");
                queue.push_back(Event::StageStarted { stage });
            }

            Effect::StartAction { stage, action } => {
                let (_, definition) =
                    pipeline
                        .action(&action)
                        .ok_or_else(|| RuntimeError::ActionNotFound {
                            pipeline: pipeline.name.clone(),
                            action: action.clone(),
                        })?;
                tracing::info!(%stage, %action, kind = %definition.kind(), "dispatching");

                queue.push_back(Event::ActionStarted {
                    action: action.clone(),
                });
                match Job::prepare(definition, execution, &self.store) {
                    Ok(job) => {
                        let executor = self.executor.clone();
                        actions.spawn(async move { executor.run(job).await });
                    }
                    Err(failure) => queue.push_back(Event::ActionFailed { action, failure }),
                }
            }

            Effect::Finished { status } => {
                tracing::debug!(%status, "terminal");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
