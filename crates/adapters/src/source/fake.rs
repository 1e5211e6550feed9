// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake source adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{SourceAdapter, SourceError, SourceRequest, SourceSnapshot};
use crate::ticker::Ticker;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Recorded fetch call
#[derive(Debug, Clone)]
pub struct SourceCall {
    pub request: SourceRequest,
    pub started: u64,
    pub finished: u64,
}

#[derive(Debug)]
struct FakeSourceState {
    revision: String,
    files: Vec<String>,
    unavailable: bool,
    calls: Vec<SourceCall>,
}

/// Fake source adapter for testing
#[derive(Clone)]
pub struct FakeSourceAdapter {
    state: Arc<Mutex<FakeSourceState>>,
    ticker: Ticker,
}

impl Default for FakeSourceAdapter {
    fn default() -> Self {
        Self::with_ticker(Ticker::new())
    }
}

impl FakeSourceAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(ticker: Ticker) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeSourceState {
                revision: "0000000000000000000000000000000000000001".to_string(),
                files: vec!["package.json".to_string(), "src/LambdaFunc/app.py".to_string()],
                unavailable: false,
                calls: Vec::new(),
            })),
            ticker,
        }
    }

    /// Revision reported by subsequent fetches
    pub fn set_revision(&self, revision: impl Into<String>) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).revision = revision.into();
    }

    /// Make subsequent fetches fail as if the repository were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).unavailable = unavailable;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<SourceCall> {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }
}

#[async_trait]
impl SourceAdapter for FakeSourceAdapter {
    async fn fetch(&self, request: &SourceRequest) -> Result<SourceSnapshot, SourceError> {
        let started = self.ticker.tick();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(SourceCall {
            request: request.clone(),
            started,
            finished: self.ticker.tick(),
        });

        if state.unavailable {
            return Err(SourceError::RepositoryNotFound(request.repository.clone()));
        }
        Ok(SourceSnapshot {
            revision: state.revision.clone(),
            files: state.files.clone(),
        })
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
