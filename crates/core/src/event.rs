// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Events that drive the execution state machine

use crate::artifact::{ArtifactLocation, ArtifactName};
use crate::deployment::DeploymentRecord;
use crate::failure::ActionFailure;
use serde::{Deserialize, Serialize};

/// An artifact written by a successful action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProducedArtifact {
    pub name: ArtifactName,
    pub location: ArtifactLocation,
    pub files: Vec<String>,
}

/// What a successful action reports back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    #[serde(default)]
    pub outputs: Vec<ProducedArtifact>,
    /// Source revision snapshotted by a source action
    #[serde(default)]
    pub revision: Option<String>,
    #[serde(default)]
    pub deployment: Option<DeploymentRecord>,
}

/// Events that trigger execution state transitions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Activate a defined execution
    Started,
    /// A stage's predecessor has succeeded and its actions are being dispatched
    StageStarted { stage: String },
    /// An action was handed to its collaborator
    ActionStarted { action: String },
    ActionSucceeded { action: String, result: ActionResult },
    ActionFailed {
        action: String,
        failure: ActionFailure,
    },
    /// Stop after the active stage; start nothing new
    CancelRequested,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Started => "started",
            Event::StageStarted { .. } => "stage_started",
            Event::ActionStarted { .. } => "action_started",
            Event::ActionSucceeded { .. } => "action_succeeded",
            Event::ActionFailed { .. } => "action_failed",
            Event::CancelRequested => "cancel_requested",
        }
    }
}
