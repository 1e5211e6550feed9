// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Git source adapter

use super::{SourceAdapter, SourceError, SourceRequest, SourceSnapshot};
use crate::store::LocalArtifactStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Clones a branch into the artifact store and drops the `.git` directory,
/// leaving a plain snapshot.
#[derive(Clone)]
pub struct GitSourceAdapter {
    /// Relative repository paths resolve against this directory
    root: PathBuf,
    store: LocalArtifactStore,
}

impl GitSourceAdapter {
    pub fn new(root: PathBuf, store: LocalArtifactStore) -> Self {
        Self { root, store }
    }

    fn resolve(&self, repository: &str) -> String {
        if repository.contains("://") || repository.starts_with("git@") {
            return repository.to_string();
        }
        let path = Path::new(repository);
        if path.is_absolute() {
            repository.to_string()
        } else {
            self.root.join(path).display().to_string()
        }
    }
}

#[async_trait]
impl SourceAdapter for GitSourceAdapter {
    async fn fetch(&self, request: &SourceRequest) -> Result<SourceSnapshot, SourceError> {
        let url = self.resolve(&request.repository);
        let dest = self.store.path(&request.output);
        crate::store::reset_dir(&dest)?;

        let output = Command::new("git")
            .arg("clone")
            .arg("--quiet")
            .arg("--single-branch")
            .arg("--branch")
            .arg(&request.branch)
            .arg(&url)
            .arg(&dest)
            .output()
            .await
            .map_err(|e| SourceError::CommandFailed(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("Remote branch") && stderr.contains("not found") {
                return Err(SourceError::BranchNotFound {
                    repository: request.repository.clone(),
                    branch: request.branch.clone(),
                });
            }
            if stderr.contains("does not exist") || stderr.contains("not a git repository") {
                return Err(SourceError::RepositoryNotFound(request.repository.clone()));
            }
            return Err(SourceError::CommandFailed(stderr.trim().to_string()));
        }

        let output = Command::new("git")
            .current_dir(&dest)
            .arg("rev-parse")
            .arg("HEAD")
            .output()
            .await
            .map_err(|e| SourceError::CommandFailed(e.to_string()))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::CommandFailed(stderr.trim().to_string()));
        }
        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();

        std::fs::remove_dir_all(dest.join(".git"))?;
        let files = self.store.list_files(&request.output)?;

        Ok(SourceSnapshot { revision, files })
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod tests;
