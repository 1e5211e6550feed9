// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Failure taxonomy for pipeline executions
//!
//! Every failure is stage-fatal and execution-fatal. Nothing is retried
//! within an execution; a new execution is the retry mechanism.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why an action failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureKind {
    SourceUnavailable,
    BuildCommandFailed,
    ArtifactMissingOrEmpty,
    TemplateInvalid,
    PermissionDenied,
    DeploymentConflict,
}

impl FailureKind {
    pub fn name(&self) -> &'static str {
        match self {
            FailureKind::SourceUnavailable => "SourceUnavailable",
            FailureKind::BuildCommandFailed => "BuildCommandFailed",
            FailureKind::ArtifactMissingOrEmpty => "ArtifactMissingOrEmpty",
            FailureKind::TemplateInvalid => "TemplateInvalid",
            FailureKind::PermissionDenied => "PermissionDenied",
            FailureKind::DeploymentConflict => "DeploymentConflict",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Failure reported by a collaborator for a single action.
///
/// `diagnostic` is opaque to the pipeline: a log path, a stderr tail, a
/// collaborator message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub kind: FailureKind,
    pub diagnostic: String,
}

impl ActionFailure {
    pub fn new(kind: FailureKind, diagnostic: impl Into<String>) -> Self {
        Self {
            kind,
            diagnostic: diagnostic.into(),
        }
    }
}

impl fmt::Display for ActionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.diagnostic)
    }
}

/// The failure an execution exposes: which stage/action failed and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub stage: String,
    pub action: String,
    pub kind: FailureKind,
    pub diagnostic: String,
}

impl fmt::Display for FailureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} failed ({}): {}",
            self.stage, self.action, self.kind, self.diagnostic
        )
    }
}
