// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake build adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{BuildAdapter, BuildError, BuildOutput, BuildRequest};
use crate::ticker::Ticker;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Recorded build call, stamped at start and finish
#[derive(Debug, Clone)]
pub struct BuildCall {
    pub request: BuildRequest,
    pub started: u64,
    pub finished: u64,
}

#[derive(Debug, Clone)]
enum Scripted {
    Files(Vec<String>),
    Fail(String),
}

#[derive(Debug, Default)]
struct FakeBuildState {
    scripts: HashMap<String, Scripted>,
    delays: HashMap<String, Duration>,
    calls: Vec<BuildCall>,
}

/// Fake build adapter for testing.
///
/// Projects without a script produce one file named `{project}.out`.
#[derive(Clone, Default)]
pub struct FakeBuildAdapter {
    state: Arc<Mutex<FakeBuildState>>,
    ticker: Ticker,
}

impl FakeBuildAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(ticker: Ticker) -> Self {
        Self {
            state: Arc::default(),
            ticker,
        }
    }

    /// Files the project reports on success (may be empty)
    pub fn set_files(&self, project: &str, files: &[&str]) {
        self.lock().scripts.insert(
            project.to_string(),
            Scripted::Files(files.iter().map(|f| f.to_string()).collect()),
        );
    }

    /// Make the project's commands fail with `stderr`
    pub fn set_failure(&self, project: &str, stderr: &str) {
        self.lock()
            .scripts
            .insert(project.to_string(), Scripted::Fail(stderr.to_string()));
    }

    /// Hold the project's build open for `delay`
    pub fn set_delay(&self, project: &str, delay: Duration) {
        self.lock().delays.insert(project.to_string(), delay);
    }

    /// Get all recorded calls, in completion order
    pub fn calls(&self) -> Vec<BuildCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeBuildState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl BuildAdapter for FakeBuildAdapter {
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let started = self.ticker.tick();
        let (script, delay) = {
            let state = self.lock();
            (
                state.scripts.get(&request.project).cloned(),
                state.delays.get(&request.project).copied(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let finished = self.ticker.tick();
        self.lock().calls.push(BuildCall {
            request: request.clone(),
            started,
            finished,
        });

        match script {
            Some(Scripted::Fail(stderr)) => Err(BuildError::CommandFailed {
                command: request.commands.join("\n"),
                status: "exit status: 1".to_string(),
                stderr,
            }),
            Some(Scripted::Files(files)) => Ok(BuildOutput {
                location: request.output.clone(),
                files,
                log: String::new(),
            }),
            None => Ok(BuildOutput {
                location: request.output.clone(),
                files: vec![format!("{}.out", request.project)],
                log: String::new(),
            }),
        }
    }
}
