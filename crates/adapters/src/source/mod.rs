// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source collaborators: snapshot a repository into an artifact

mod git;

pub use git::GitSourceAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeSourceAdapter, SourceCall};

use async_trait::async_trait;
use sw_core::{ArtifactLocation, FailureKind};
use thiserror::Error;

/// What to fetch and where to put it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    pub repository: String,
    pub branch: String,
    pub output: ArtifactLocation,
}

/// A fetched revision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub revision: String,
    pub files: Vec<String>,
}

/// Errors from source operations
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("repository not found: {0}")]
    RepositoryNotFound(String),
    #[error("branch {branch} not found in {repository}")]
    BranchNotFound { repository: String, branch: String },
    #[error("command failed: {0}")]
    CommandFailed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Every source error leaves the pipeline without a revision
    pub fn kind(&self) -> FailureKind {
        FailureKind::SourceUnavailable
    }
}

/// Adapter for the source-control collaborator
#[async_trait]
pub trait SourceAdapter: Clone + Send + Sync + 'static {
    /// Snapshot the branch head into `request.output`
    async fn fetch(&self, request: &SourceRequest) -> Result<SourceSnapshot, SourceError>;
}
