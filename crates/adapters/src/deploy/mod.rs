// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy collaborators: apply a template as a named unit

mod local;

pub use local::LocalDeployAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DeployCall, FakeDeployAdapter};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sw_core::{ArtifactLocation, DeployOutcome, FailureKind};
use thiserror::Error;

/// Apply `template_path` inside the `template` artifact as `unit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployRequest {
    pub unit: String,
    pub template: ArtifactLocation,
    pub template_path: String,
    /// Parameter values after binding resolution
    pub parameters: BTreeMap<String, String>,
    pub admin_permissions: bool,
}

/// Current state of a deployment unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub unit: String,
    /// sha256 over the normalized template and parameters
    pub digest: String,
    pub template: String,
    pub parameters: BTreeMap<String, String>,
    /// Number of times the unit changed (create counts as 1)
    pub version: u64,
}

/// Errors from deploy operations
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("template {0} not found in artifact")]
    TemplateMissing(String),
    #[error("invalid template: {0}")]
    TemplateInvalid(String),
    #[error("parameter {0} is not declared by the template")]
    UnknownParameter(String),
    #[error("parameter {0} has no value and no default")]
    MissingParameter(String),
    #[error("invalid unit name: {0}")]
    InvalidUnitName(String),
    #[error("resource type {0} requires admin permissions")]
    PermissionDenied(String),
    #[error("unit {0} has a deployment in progress")]
    Conflict(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeployError {
    pub fn kind(&self) -> FailureKind {
        match self {
            DeployError::TemplateMissing(_) => FailureKind::ArtifactMissingOrEmpty,
            DeployError::TemplateInvalid(_)
            | DeployError::UnknownParameter(_)
            | DeployError::MissingParameter(_)
            | DeployError::InvalidUnitName(_) => FailureKind::TemplateInvalid,
            DeployError::PermissionDenied(_) => FailureKind::PermissionDenied,
            DeployError::Conflict(_) | DeployError::Io(_) | DeployError::Json(_) => {
                FailureKind::DeploymentConflict
            }
        }
    }
}

/// Adapter for the stack deployment collaborator
#[async_trait]
pub trait DeployAdapter: Clone + Send + Sync + 'static {
    /// Create or update the unit; applying an identical template and
    /// parameters again reports `Unchanged`.
    async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DeployError>;

    /// Every unit this collaborator manages
    async fn units(&self) -> Result<Vec<UnitRecord>, DeployError>;
}
