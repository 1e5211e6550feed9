// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations for the write-ahead log
//!
//! Every execution state change is expressed as an operation. The state
//! machine applies operations to itself, and storage replays the same
//! operations to rebuild state after a restart.

use crate::artifact::{ArtifactName, ArtifactRecord, ArtifactState};
use crate::deployment::DeploymentRecord;
use crate::execution::ExecutionStatus;
use crate::failure::{ActionFailure, FailureRecord};
use crate::stage::StageStatus;
use serde::{Deserialize, Serialize};

/// Layout of one stage at creation time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageLayout {
    pub name: String,
    pub actions: Vec<ActionLayout>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLayout {
    pub name: String,
    pub kind: crate::action::ActionKind,
}

/// Operations that can be persisted to the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// Create a new execution of a pipeline
    ExecutionCreate {
        id: String,
        pipeline: String,
        stages: Vec<StageLayout>,
        artifacts: Vec<ArtifactRecord>,
        at_ms: i64,
    },
    ExecutionStatus {
        id: String,
        status: ExecutionStatus,
        at_ms: i64,
    },
    RevisionResolved {
        id: String,
        revision: String,
    },
    StageStatus {
        id: String,
        stage: String,
        status: StageStatus,
        at_ms: i64,
    },
    ActionStatus {
        id: String,
        action: String,
        status: StageStatus,
        #[serde(default)]
        failure: Option<ActionFailure>,
        at_ms: i64,
    },
    ArtifactState {
        id: String,
        artifact: ArtifactName,
        state: ArtifactState,
    },
    FailureRecorded {
        id: String,
        failure: FailureRecord,
    },
    DeploymentRecorded {
        id: String,
        deployment: DeploymentRecord,
    },
    CancelRequested {
        id: String,
    },
}

impl Operation {
    /// The execution this operation belongs to
    pub fn execution_id(&self) -> &str {
        match self {
            Operation::ExecutionCreate { id, .. }
            | Operation::ExecutionStatus { id, .. }
            | Operation::RevisionResolved { id, .. }
            | Operation::StageStatus { id, .. }
            | Operation::ActionStatus { id, .. }
            | Operation::ArtifactState { id, .. }
            | Operation::FailureRecorded { id, .. }
            | Operation::DeploymentRecorded { id, .. }
            | Operation::CancelRequested { id } => id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operations_serialize_with_op_tag() {
        let op = Operation::CancelRequested {
            id: "exec-1".to_string(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json, serde_json::json!({"op": "cancel_requested", "id": "exec-1"}));
    }

    #[test]
    fn action_status_failure_defaults_to_none() {
        let json = r#"{"op":"action_status","id":"e","action":"CDK_Build","status":"Executing","at_ms":5}"#;
        let op: Operation = serde_json::from_str(json).unwrap();
        assert!(matches!(
            op,
            Operation::ActionStatus { failure: None, at_ms: 5, .. }
        ));
        assert_eq!(op.execution_id(), "e");
    }
}
