// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake deploy adapter for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{DeployAdapter, DeployError, DeployRequest, UnitRecord};
use crate::ticker::Ticker;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use sw_core::DeployOutcome;

/// Recorded deploy call, stamped at start and finish
#[derive(Debug, Clone)]
pub struct DeployCall {
    pub request: DeployRequest,
    pub started: u64,
    pub finished: u64,
}

#[derive(Default)]
struct FakeDeployState {
    units: BTreeMap<String, UnitRecord>,
    in_progress: HashSet<String>,
    failure: Option<fn(&DeployRequest) -> DeployError>,
    calls: Vec<DeployCall>,
}

/// Fake deploy adapter for testing.
///
/// Units are compared on template location, path and parameters.
#[derive(Clone, Default)]
pub struct FakeDeployAdapter {
    state: Arc<Mutex<FakeDeployState>>,
    ticker: Ticker,
}

impl FakeDeployAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticker(ticker: Ticker) -> Self {
        Self {
            state: Arc::default(),
            ticker,
        }
    }

    /// Mark a unit as having a deployment in progress
    pub fn hold(&self, unit: &str) {
        self.lock().in_progress.insert(unit.to_string());
    }

    /// Fail every subsequent deploy with the error built by `make`
    pub fn set_failure(&self, make: fn(&DeployRequest) -> DeployError) {
        self.lock().failure = Some(make);
    }

    pub fn unit(&self, unit: &str) -> Option<UnitRecord> {
        self.lock().units.get(unit).cloned()
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DeployCall> {
        self.lock().calls.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeDeployState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl DeployAdapter for FakeDeployAdapter {
    async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DeployError> {
        let started = self.ticker.tick();
        let mut state = self.lock();
        state.calls.push(DeployCall {
            request: request.clone(),
            started,
            finished: self.ticker.tick(),
        });

        if let Some(make) = state.failure {
            return Err(make(request));
        }
        if state.in_progress.contains(&request.unit) {
            return Err(DeployError::Conflict(request.unit.clone()));
        }

        let template = format!("{}/{}", request.template.uri(), request.template_path);
        let digest = format!("{}|{:?}", template, request.parameters);
        let (outcome, version) = match state.units.get(&request.unit) {
            None => (DeployOutcome::Created, 1),
            Some(record) if record.digest == digest => return Ok(DeployOutcome::Unchanged),
            Some(record) => (DeployOutcome::Updated, record.version + 1),
        };
        state.units.insert(
            request.unit.clone(),
            UnitRecord {
                unit: request.unit.clone(),
                digest,
                template,
                parameters: request.parameters.clone(),
                version,
            },
        );
        Ok(outcome)
    }

    async fn units(&self) -> Result<Vec<UnitRecord>, DeployError> {
        Ok(self.lock().units.values().cloned().collect())
    }
}
