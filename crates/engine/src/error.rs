// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ExecuteError;
use thiserror::Error;

/// Errors that can occur in the runtime
///
/// Action failures are not errors here: they are recorded on the execution.
/// These are the conditions under which the engine itself cannot go on.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("action not found in pipeline {pipeline}: {action}")]
    ActionNotFound { pipeline: String, action: String },
    #[error("action task failed: {0}")]
    ActionTask(#[from] tokio::task::JoinError),
    #[error("execution {0} stopped with no action in flight")]
    Stalled(String),
}
