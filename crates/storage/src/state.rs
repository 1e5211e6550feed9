// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Materialized state from WAL replay

use crate::wal::{Wal, WalError};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use sw_core::{DeployOutcome, Execution, Operation};

/// Latest known deployment of a unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    pub unit: String,
    pub execution_id: String,
    pub outcome: DeployOutcome,
    pub parameters: BTreeMap<String, String>,
    pub deployments: usize,
}

/// Executions and deployment units rebuilt from operations
#[derive(Debug, Default)]
pub struct MaterializedState {
    pub executions: HashMap<String, Execution>,
    pub units: BTreeMap<String, UnitSummary>,
}

impl MaterializedState {
    /// Rebuild state by replaying the WAL at `path`
    pub fn load(path: &Path) -> Result<Self, WalError> {
        let mut state = Self::default();
        for op in Wal::replay(path)? {
            state.apply(&op);
        }
        Ok(state)
    }

    /// Get an execution by ID or unique prefix (like git commit hashes)
    pub fn get_execution(&self, id: &str) -> Option<&Execution> {
        if let Some(execution) = self.executions.get(id) {
            return Some(execution);
        }

        let mut matches = self
            .executions
            .iter()
            .filter(|(k, _)| k.starts_with(id))
            .map(|(_, v)| v);
        match (matches.next(), matches.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    /// Executions ordered oldest first
    pub fn executions_by_age(&self) -> Vec<&Execution> {
        let mut executions: Vec<_> = self.executions.values().collect();
        executions.sort_by(|a, b| {
            a.created_at_ms
                .cmp(&b.created_at_ms)
                .then_with(|| a.id.cmp(&b.id))
        });
        executions
    }

    /// Apply an operation to update the state
    pub fn apply(&mut self, op: &Operation) {
        match op {
            Operation::ExecutionCreate { id, .. } => {
                if let Some(execution) = Execution::from_create(op) {
                    self.executions.insert(id.clone(), execution);
                }
            }

            Operation::DeploymentRecorded { id, deployment } => {
                let deployments = self
                    .units
                    .get(&deployment.unit)
                    .map(|u| u.deployments)
                    .unwrap_or(0);
                self.units.insert(
                    deployment.unit.clone(),
                    UnitSummary {
                        unit: deployment.unit.clone(),
                        execution_id: id.clone(),
                        outcome: deployment.outcome,
                        parameters: deployment.parameters.clone(),
                        deployments: deployments + 1,
                    },
                );
                if let Some(execution) = self.executions.get_mut(id) {
                    execution.apply(op);
                }
            }

            _ => {
                if let Some(execution) = self.executions.get_mut(op.execution_id()) {
                    execution.apply(op);
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
