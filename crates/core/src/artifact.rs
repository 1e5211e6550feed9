// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Artifacts: immutable named file bundles passed between stages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of an artifact, unique within a pipeline
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactName(pub String);

impl ArtifactName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reference a single file inside this artifact
    pub fn at_path(&self, path: impl Into<String>) -> ArtifactPath {
        ArtifactPath {
            artifact: self.clone(),
            path: path.into(),
        }
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for ArtifactName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ArtifactName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Where a collaborator stored a populated artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactLocation {
    pub bucket: String,
    pub key: String,
}

impl ArtifactLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Parse an `s3://bucket/key` URI
    pub fn parse(uri: &str) -> Option<Self> {
        let rest = uri.strip_prefix("s3://")?;
        let (bucket, key) = rest.split_once('/')?;
        if bucket.is_empty() || key.is_empty() {
            return None;
        }
        Some(Self::new(bucket, key))
    }

    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// A file selected inside an artifact (e.g. the synthesized template)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactPath {
    pub artifact: ArtifactName,
    pub path: String,
}

impl fmt::Display for ArtifactPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.artifact, self.path)
    }
}

/// Lifecycle of an artifact within one execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ArtifactState {
    /// Declared by the pipeline, not yet written
    Declared,
    /// Written by its producer; read-only from here on
    Populated {
        location: ArtifactLocation,
        files: Vec<String>,
    },
    /// Produced by a stage that failed; never handed to later stages
    Discarded,
}

impl ArtifactState {
    pub fn name(&self) -> &'static str {
        match self {
            ArtifactState::Declared => "declared",
            ArtifactState::Populated { .. } => "populated",
            ArtifactState::Discarded => "discarded",
        }
    }

    pub fn location(&self) -> Option<&ArtifactLocation> {
        match self {
            ArtifactState::Populated { location, .. } => Some(location),
            _ => None,
        }
    }

    pub fn contains(&self, path: &str) -> bool {
        match self {
            ArtifactState::Populated { files, .. } => files.iter().any(|f| f == path),
            _ => false,
        }
    }
}

/// Per-execution record of one artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    pub name: ArtifactName,
    /// Action that writes this artifact (exactly one)
    pub producer: String,
    /// Actions that read it
    #[serde(default)]
    pub consumers: Vec<String>,
    pub state: ArtifactState,
}

impl ArtifactRecord {
    pub fn declared(name: ArtifactName, producer: impl Into<String>) -> Self {
        Self {
            name,
            producer: producer.into(),
            consumers: Vec::new(),
            state: ArtifactState::Declared,
        }
    }
}

#[cfg(test)]
#[path = "artifact_tests.rs"]
mod tests;
