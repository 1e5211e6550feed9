// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects requested by the execution state machine

use crate::execution::ExecutionStatus;
use crate::operation::Operation;

/// Side effects the engine performs on behalf of the state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append to the write-ahead log and update materialized state
    Persist { operation: Operation },
    /// Every predecessor stage succeeded; this stage may start
    StartStage { stage: String },
    /// Dispatch an action to its collaborator
    StartAction { stage: String, action: String },
    /// The execution reached a terminal status
    Finished { status: ExecutionStatus },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Effect::Persist { .. } => "persist",
            Effect::StartStage { .. } => "start_stage",
            Effect::StartAction { .. } => "start_action",
            Effect::Finished { .. } => "finished",
        }
    }
}
