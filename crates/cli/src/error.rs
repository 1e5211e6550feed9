// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-friendly error display with context and suggestions.
//!
//! Each error says what went wrong, why it might have happened, and how
//! to fix it.

use std::fmt;
use std::path::Path;
use sw_core::Execution;

/// Error with context and recovery suggestions for user-friendly display.
#[derive(Debug)]
pub struct SwError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    /// Original error if any
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SwError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    /// Add context about why this error might have happened.
    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    /// Add a suggestion for how to fix this error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Set the source error that caused this error.
    pub fn with_source<E: std::error::Error + Send + Sync + 'static>(mut self, source: E) -> Self {
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for SwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for SwError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Common error builders for typical failure scenarios.
impl SwError {
    pub fn manifest_not_found(path: &Path) -> Self {
        SwError::new(format!("No manifest at {}", path.display()))
            .with_suggestion("Create the default serverless pipeline: sw init")
            .with_suggestion("Point at another manifest: --manifest <PATH>")
    }

    pub fn manifest_exists(path: &Path) -> Self {
        SwError::new(format!("{} already exists", path.display()))
            .with_suggestion("Overwrite it: sw init --force")
    }

    pub fn manifest_invalid<E: std::error::Error + Send + Sync + 'static>(
        path: &Path,
        err: E,
    ) -> Self {
        SwError::new(format!("Invalid manifest {}", path.display()))
            .with_context(err.to_string())
            .with_suggestion("Check the manifest: sw validate")
            .with_source(err)
    }

    pub fn run_in_progress(lock_path: &Path) -> Self {
        SwError::new("Another execution is running in this project")
            .with_context(format!("{} is locked", lock_path.display()))
            .with_suggestion("Wait for the other `sw run` to finish")
    }

    pub fn execution_not_found(id: &str) -> Self {
        SwError::new(format!("Execution '{}' not found", id))
            .with_context("The id may be mistyped or ambiguous as a prefix")
            .with_suggestion("List executions: sw list")
    }

    /// A run that ended without succeeding
    pub fn execution_unsuccessful(execution: &Execution, log_path: &Path) -> Self {
        let mut err = SwError::new(format!(
            "Execution {} ended {}",
            execution.id, execution.status
        ));
        if let Some(failure) = &execution.failure {
            err = err.with_context(failure.to_string());
        }
        err.with_suggestion(format!("Inspect it: sw show {}", execution.id))
            .with_suggestion(format!("Read the log: {}", log_path.display()))
    }
}
