// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build collaborators: run commands over an input artifact

mod shell;

pub use shell::ShellBuildAdapter;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{BuildCall, FakeBuildAdapter};

use async_trait::async_trait;
use sw_core::{ArtifactLocation, FailureKind};
use thiserror::Error;

/// One build project invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub project: String,
    pub image: Option<String>,
    pub input: ArtifactLocation,
    /// Install commands followed by build commands, in order
    pub commands: Vec<String>,
    /// Output selector: file names or glob patterns
    pub artifact_files: Vec<String>,
    /// Selector root, relative to the build root
    pub base_directory: Option<String>,
    /// Output prefix; the published artifact lives below it
    pub output: ArtifactLocation,
    pub env: Vec<(String, String)>,
}

/// Where the output artifact was published, its files and the build log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub location: ArtifactLocation,
    pub files: Vec<String>,
    pub log: String,
}

/// Errors from build operations
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("input artifact missing: {0}")]
    InputMissing(String),
    #[error("command `{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },
    #[error("no files matched {patterns:?}")]
    NoMatchingFiles { patterns: Vec<String> },
    #[error("invalid output pattern {pattern}: {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    pub fn kind(&self) -> FailureKind {
        match self {
            BuildError::InputMissing(_) | BuildError::NoMatchingFiles { .. } => {
                FailureKind::ArtifactMissingOrEmpty
            }
            BuildError::CommandFailed { .. }
            | BuildError::InvalidPattern { .. }
            | BuildError::Io(_) => FailureKind::BuildCommandFailed,
        }
    }
}

/// Adapter for the build-execution collaborator
#[async_trait]
pub trait BuildAdapter: Clone + Send + Sync + 'static {
    /// Run the commands and publish the selected files below `request.output`
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError>;
}
