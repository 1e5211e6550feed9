// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project paths

use std::path::{Path, PathBuf};

/// Manifest file name at the project root
pub const MANIFEST_FILE: &str = "sw.toml";

/// Paths used by the CLI for one project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Project root directory
    pub project_root: PathBuf,
    /// Default pipeline manifest
    pub manifest_path: PathBuf,
    /// State directory (`.sw`, or `SW_STATE_DIR`)
    pub state_dir: PathBuf,
    /// Write-ahead log of execution operations
    pub wal_path: PathBuf,
    /// Local artifact store root
    pub artifacts_path: PathBuf,
    /// Deployment unit records
    pub units_path: PathBuf,
    pub log_path: PathBuf,
    /// Held for the duration of `sw run`
    pub lock_path: PathBuf,
}

impl Config {
    /// Create config for a project
    pub fn for_project(project_root: &Path) -> Self {
        let state_dir = std::env::var_os("SW_STATE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| project_root.join(".sw"));
        Self::with_state_dir(project_root, state_dir)
    }

    fn with_state_dir(project_root: &Path, state_dir: PathBuf) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            manifest_path: project_root.join(MANIFEST_FILE),
            wal_path: state_dir.join("wal").join("events.wal"),
            artifacts_path: state_dir.join("artifacts"),
            units_path: state_dir.join("units"),
            log_path: state_dir.join("sw.log"),
            lock_path: state_dir.join("run.lock"),
            state_dir,
        }
    }

    /// The manifest to use: an explicit path (relative to the project root)
    /// or `sw.toml`
    pub fn manifest(&self, explicit: Option<&Path>) -> PathBuf {
        match explicit {
            Some(path) => self.project_root.join(path),
            None => self.manifest_path.clone(),
        }
    }
}
