// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deployment units and the result of applying a template to one

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// What the deploy collaborator did with the unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeployOutcome {
    Created,
    Updated,
    /// Same template and parameters as the current unit state
    Unchanged,
}

impl fmt::Display for DeployOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DeployOutcome::Created => "created",
            DeployOutcome::Updated => "updated",
            DeployOutcome::Unchanged => "unchanged",
        };
        f.pad(s)
    }
}

/// A deploy action's effect on a deployment unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub unit: String,
    pub outcome: DeployOutcome,
    /// Parameters after binding resolution
    pub parameters: BTreeMap<String, String>,
    /// Template file applied (`artifact::path`)
    pub template: String,
}
