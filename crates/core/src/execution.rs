// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Execution state machine
//!
//! An execution is one run of a pipeline. Stages run strictly in order; the
//! actions inside a stage run concurrently. `transition` is pure: it returns
//! the next state plus the effects the engine must perform (persist an
//! operation, start a stage, dispatch an action, finish).

use crate::action::ActionKind;
use crate::artifact::{ArtifactName, ArtifactRecord, ArtifactState};
use crate::clock::Clock;
use crate::deployment::DeploymentRecord;
use crate::effect::Effect;
use crate::event::{ActionResult, Event};
use crate::failure::{ActionFailure, FailureKind, FailureRecord};
use crate::operation::{ActionLayout, Operation, StageLayout};
use crate::pipeline::Pipeline;
use crate::stage::StageStatus;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall status of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    Defined,
    Running,
    Succeeded,
    Failed,
    Cancelled,
}

impl ExecutionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExecutionStatus::Succeeded | ExecutionStatus::Failed | ExecutionStatus::Cancelled
        )
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExecutionStatus::Defined => "Defined",
            ExecutionStatus::Running => "Running",
            ExecutionStatus::Succeeded => "Succeeded",
            ExecutionStatus::Failed => "Failed",
            ExecutionStatus::Cancelled => "Cancelled",
        };
        f.pad(s)
    }
}

/// Run state of one action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRun {
    pub name: String,
    pub kind: ActionKind,
    pub status: StageStatus,
    pub started_at_ms: Option<i64>,
    pub finished_at_ms: Option<i64>,
    pub failure: Option<ActionFailure>,
}

/// Run state of one stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRun {
    pub name: String,
    pub status: StageStatus,
    pub started_at_ms: Option<i64>,
    pub finished_at_ms: Option<i64>,
    pub actions: Vec<ActionRun>,
}

impl StageRun {
    fn pending(layout: &StageLayout) -> Self {
        Self {
            name: layout.name.clone(),
            status: StageStatus::Pending,
            started_at_ms: None,
            finished_at_ms: None,
            actions: layout
                .actions
                .iter()
                .map(|a| ActionRun {
                    name: a.name.clone(),
                    kind: a.kind,
                    status: StageStatus::Pending,
                    started_at_ms: None,
                    finished_at_ms: None,
                    failure: None,
                })
                .collect(),
        }
    }

    pub fn action(&self, name: &str) -> Option<&ActionRun> {
        self.actions.iter().find(|a| a.name == name)
    }

    fn all_actions_terminal(&self) -> bool {
        self.actions.iter().all(|a| a.status.is_terminal())
    }
}

/// One run of a pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub pipeline: String,
    pub status: ExecutionStatus,
    pub revision: Option<String>,
    pub stages: Vec<StageRun>,
    pub artifacts: BTreeMap<ArtifactName, ArtifactRecord>,
    pub failure: Option<FailureRecord>,
    pub deployment: Option<DeploymentRecord>,
    pub cancel_requested: bool,
    pub created_at_ms: i64,
    pub finished_at_ms: Option<i64>,
}

impl Execution {
    /// Define a new execution of `pipeline`.
    ///
    /// Returns the creation operation alongside, so callers can persist it.
    pub fn create(
        id: impl Into<String>,
        pipeline: &Pipeline,
        clock: &impl Clock,
    ) -> (Execution, Operation) {
        let op = Operation::ExecutionCreate {
            id: id.into(),
            pipeline: pipeline.name.clone(),
            stages: pipeline
                .stages()
                .iter()
                .map(|stage| StageLayout {
                    name: stage.name.clone(),
                    actions: stage
                        .actions
                        .iter()
                        .map(|a| ActionLayout {
                            name: a.name.clone(),
                            kind: a.kind(),
                        })
                        .collect(),
                })
                .collect(),
            artifacts: pipeline.artifact_records().into_values().collect(),
            at_ms: clock.epoch_ms(),
        };
        let mut execution = Self::defined(pipeline.name.clone());
        execution.apply(&op);
        (execution, op)
    }

    fn defined(pipeline: String) -> Self {
        Self {
            id: String::new(),
            pipeline,
            status: ExecutionStatus::Defined,
            revision: None,
            stages: Vec::new(),
            artifacts: BTreeMap::new(),
            failure: None,
            deployment: None,
            cancel_requested: false,
            created_at_ms: 0,
            finished_at_ms: None,
        }
    }

    /// Build an execution from its creation operation (WAL replay)
    pub fn from_create(op: &Operation) -> Option<Self> {
        let Operation::ExecutionCreate { pipeline, .. } = op else {
            return None;
        };
        let mut execution = Self::defined(pipeline.clone());
        execution.apply(op);
        Some(execution)
    }

    pub fn stage(&self, name: &str) -> Option<&StageRun> {
        self.stages.iter().find(|s| s.name == name)
    }

    /// The stage currently executing, if any
    pub fn active_stage(&self) -> Option<&StageRun> {
        self.stages
            .iter()
            .find(|s| s.status == StageStatus::Executing)
    }

    /// The first stage that has not been entered yet
    pub fn next_pending_stage(&self) -> Option<&StageRun> {
        self.stages.iter().find(|s| s.status == StageStatus::Pending)
    }

    /// Find an action and the index of its stage
    pub fn action(&self, name: &str) -> Option<(usize, &ActionRun)> {
        self.stages
            .iter()
            .enumerate()
            .find_map(|(i, s)| s.action(name).map(|a| (i, a)))
    }

    pub fn artifact_state(&self, name: &ArtifactName) -> Option<&ArtifactState> {
        self.artifacts.get(name).map(|r| &r.state)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Handle an event and return the new state plus effects
    pub fn transition(&self, event: &Event, clock: &impl Clock) -> (Execution, Vec<Effect>) {
        let now = clock.epoch_ms();
        let mut plan = Plan::new(self);

        match event {
            Event::Started if self.status == ExecutionStatus::Defined => {
                plan.record(Operation::ExecutionStatus {
                    id: self.id.clone(),
                    status: ExecutionStatus::Running,
                    at_ms: now,
                });
                if let Some(first) = plan.state.stages.first() {
                    plan.effects.push(Effect::StartStage {
                        stage: first.name.clone(),
                    });
                }
            }

            Event::StageStarted { stage } if self.can_start_stage(stage) => {
                plan.record(Operation::StageStatus {
                    id: self.id.clone(),
                    stage: stage.clone(),
                    status: StageStatus::Executing,
                    at_ms: now,
                });
                if let Some(run) = self.stage(stage) {
                    for action in &run.actions {
                        plan.effects.push(Effect::StartAction {
                            stage: stage.clone(),
                            action: action.name.clone(),
                        });
                    }
                }
            }

            Event::ActionStarted { action }
                if self.action_has_status(action, StageStatus::Pending) =>
            {
                plan.record(Operation::ActionStatus {
                    id: self.id.clone(),
                    action: action.clone(),
                    status: StageStatus::Executing,
                    failure: None,
                    at_ms: now,
                });
            }

            Event::ActionSucceeded { action, result }
                if self.action_has_status(action, StageStatus::Executing) =>
            {
                match self.check_outputs(action, result) {
                    Ok(()) => plan.succeed_action(action, result, now),
                    Err(failure) => plan.fail_action(action, failure, now),
                }
                plan.settle(now);
            }

            Event::ActionFailed { action, failure }
                if self.action_has_status(action, StageStatus::Executing) =>
            {
                plan.fail_action(action, failure.clone(), now);
                plan.settle(now);
            }

            Event::CancelRequested if !self.is_terminal() && !self.cancel_requested => {
                plan.record(Operation::CancelRequested {
                    id: self.id.clone(),
                });
                if plan.state.active_stage().is_none() {
                    plan.finish(ExecutionStatus::Cancelled, now);
                }
            }

            // Invalid transitions - no change
            _ => {}
        }

        plan.into_parts()
    }

    /// A stage may start only while running, when it is pending, and when
    /// every earlier stage has succeeded.
    fn can_start_stage(&self, stage: &str) -> bool {
        if self.status != ExecutionStatus::Running || self.cancel_requested {
            return false;
        }
        let Some(index) = self.stages.iter().position(|s| s.name == stage) else {
            return false;
        };
        self.stages[index].status == StageStatus::Pending
            && self.stages[..index]
                .iter()
                .all(|s| s.status == StageStatus::Succeeded)
    }

    fn action_has_status(&self, action: &str, status: StageStatus) -> bool {
        match self.action(action) {
            Some((stage_index, run)) => {
                run.status == status && self.stages[stage_index].status == StageStatus::Executing
            }
            None => false,
        }
    }

    /// Every declared output must be reported, located, and non-empty
    fn check_outputs(&self, action: &str, result: &ActionResult) -> Result<(), ActionFailure> {
        let declared = self
            .artifacts
            .values()
            .filter(|record| record.producer == action);
        for record in declared {
            let produced = result.outputs.iter().find(|o| o.name == record.name);
            match produced {
                None => {
                    return Err(ActionFailure::new(
                        FailureKind::ArtifactMissingOrEmpty,
                        format!("{} did not produce artifact {}", action, record.name),
                    ))
                }
                Some(p) if p.files.is_empty() => {
                    return Err(ActionFailure::new(
                        FailureKind::ArtifactMissingOrEmpty,
                        format!("artifact {} is empty", record.name),
                    ))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Apply a persisted operation to this execution
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::ExecutionCreate {
                id,
                stages,
                artifacts,
                at_ms,
                ..
            } => {
                self.id = id.clone();
                self.created_at_ms = *at_ms;
                self.stages = stages.iter().map(StageRun::pending).collect();
                self.artifacts = artifacts
                    .iter()
                    .map(|a| (a.name.clone(), a.clone()))
                    .collect();
            }

            Operation::ExecutionStatus { status, at_ms, .. } => {
                self.status = *status;
                if status.is_terminal() {
                    self.finished_at_ms = Some(*at_ms);
                }
            }

            Operation::RevisionResolved { revision, .. } => {
                self.revision = Some(revision.clone());
            }

            Operation::StageStatus {
                stage,
                status,
                at_ms,
                ..
            } => {
                if let Some(run) = self.stages.iter_mut().find(|s| &s.name == stage) {
                    run.status = *status;
                    if *status == StageStatus::Executing {
                        run.started_at_ms = Some(*at_ms);
                    } else if status.is_terminal() {
                        run.finished_at_ms = Some(*at_ms);
                    }
                }
            }

            Operation::ActionStatus {
                action,
                status,
                failure,
                at_ms,
                ..
            } => {
                let run = self
                    .stages
                    .iter_mut()
                    .flat_map(|s| s.actions.iter_mut())
                    .find(|a| &a.name == action);
                if let Some(run) = run {
                    run.status = *status;
                    if *status == StageStatus::Executing {
                        run.started_at_ms = Some(*at_ms);
                    } else if status.is_terminal() {
                        run.finished_at_ms = Some(*at_ms);
                    }
                    if failure.is_some() {
                        run.failure = failure.clone();
                    }
                }
            }

            Operation::ArtifactState {
                artifact, state, ..
            } => {
                if let Some(record) = self.artifacts.get_mut(artifact) {
                    record.state = state.clone();
                }
            }

            Operation::FailureRecorded { failure, .. } => {
                if self.failure.is_none() {
                    self.failure = Some(failure.clone());
                }
            }

            Operation::DeploymentRecorded { deployment, .. } => {
                self.deployment = Some(deployment.clone());
            }

            Operation::CancelRequested { .. } => {
                self.cancel_requested = true;
            }
        }
    }
}

/// Accumulates operations (applied as they are recorded) and effects
struct Plan {
    state: Execution,
    effects: Vec<Effect>,
}

impl Plan {
    fn new(execution: &Execution) -> Self {
        Self {
            state: execution.clone(),
            effects: Vec::new(),
        }
    }

    fn record(&mut self, operation: Operation) {
        self.state.apply(&operation);
        self.effects.push(Effect::Persist { operation });
    }

    fn into_parts(self) -> (Execution, Vec<Effect>) {
        (self.state, self.effects)
    }

    fn id(&self) -> String {
        self.state.id.clone()
    }

    fn succeed_action(&mut self, action: &str, result: &ActionResult, now: i64) {
        if let Some(revision) = &result.revision {
            self.record(Operation::RevisionResolved {
                id: self.id(),
                revision: revision.clone(),
            });
        }
        for output in &result.outputs {
            if !self.state.artifacts.contains_key(&output.name) {
                continue;
            }
            self.record(Operation::ArtifactState {
                id: self.id(),
                artifact: output.name.clone(),
                state: ArtifactState::Populated {
                    location: output.location.clone(),
                    files: output.files.clone(),
                },
            });
        }
        if let Some(deployment) = &result.deployment {
            self.record(Operation::DeploymentRecorded {
                id: self.id(),
                deployment: deployment.clone(),
            });
        }
        self.record(Operation::ActionStatus {
            id: self.id(),
            action: action.to_string(),
            status: StageStatus::Succeeded,
            failure: None,
            at_ms: now,
        });
    }

    fn fail_action(&mut self, action: &str, failure: ActionFailure, now: i64) {
        let stage = self
            .state
            .action(action)
            .map(|(i, _)| self.state.stages[i].name.clone())
            .unwrap_or_default();
        self.record(Operation::ActionStatus {
            id: self.id(),
            action: action.to_string(),
            status: StageStatus::Failed,
            failure: Some(failure.clone()),
            at_ms: now,
        });
        if self.state.failure.is_none() {
            self.record(Operation::FailureRecorded {
                id: self.id(),
                failure: FailureRecord {
                    stage,
                    action: action.to_string(),
                    kind: failure.kind,
                    diagnostic: failure.diagnostic,
                },
            });
        }
    }

    /// Close the active stage once all its actions are terminal
    fn settle(&mut self, now: i64) {
        let Some(stage) = self.state.active_stage().cloned() else {
            return;
        };
        if !stage.all_actions_terminal() {
            return;
        }

        let succeeded = stage
            .actions
            .iter()
            .all(|a| a.status == StageStatus::Succeeded);

        if !succeeded {
            self.record(Operation::StageStatus {
                id: self.id(),
                stage: stage.name.clone(),
                status: StageStatus::Failed,
                at_ms: now,
            });
            // No partial-stage success: outputs of the stage's successful
            // actions never reach later stages.
            let produced: Vec<ArtifactName> = self
                .state
                .artifacts
                .values()
                .filter(|r| stage.action(&r.producer).is_some())
                .map(|r| r.name.clone())
                .collect();
            for artifact in produced {
                self.record(Operation::ArtifactState {
                    id: self.id(),
                    artifact,
                    state: ArtifactState::Discarded,
                });
            }
            self.finish(ExecutionStatus::Failed, now);
            return;
        }

        self.record(Operation::StageStatus {
            id: self.id(),
            stage: stage.name.clone(),
            status: StageStatus::Succeeded,
            at_ms: now,
        });

        if self.state.cancel_requested {
            self.finish(ExecutionStatus::Cancelled, now);
            return;
        }

        match self.state.next_pending_stage() {
            Some(next) => {
                let next = next.name.clone();
                self.effects.push(Effect::StartStage { stage: next });
            }
            None => self.finish(ExecutionStatus::Succeeded, now),
        }
    }

    fn finish(&mut self, status: ExecutionStatus, now: i64) {
        self.record(Operation::ExecutionStatus {
            id: self.id(),
            status,
            at_ms: now,
        });
        self.effects.push(Effect::Finished { status });
    }
}

#[cfg(test)]
#[path = "execution_tests.rs"]
mod tests;
