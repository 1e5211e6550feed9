// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shell build adapter
//!
//! Copies the input artifact into a scratch directory, runs the commands
//! there as a single `sh -e` script (so `cd` carries over between commands),
//! then publishes the selected files under `{output}/{digest}`, where the
//! digest covers every selected path and its contents. A published
//! directory is never rewritten: an identical build reuses it, a different
//! build lands next to it.

use super::{BuildAdapter, BuildError, BuildOutput, BuildRequest};
use crate::store::{copy_tree, relative_string, reset_dir, LocalArtifactStore};
use sha2::{Digest, Sha256};
use sw_core::ArtifactLocation;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::process::Command;

#[derive(Clone)]
pub struct ShellBuildAdapter {
    store: LocalArtifactStore,
}

impl ShellBuildAdapter {
    pub fn new(store: LocalArtifactStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BuildAdapter for ShellBuildAdapter {
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let input = self.store.path(&request.input);
        if !input.is_dir() {
            return Err(BuildError::InputMissing(request.input.uri()));
        }

        let work = self.store.work_dir(&request.output);
        reset_dir(&work)?;
        copy_tree(&input, &work)?;

        let script = request.commands.join("\n");
        let output = Command::new("sh")
            .arg("-ec")
            .arg(&script)
            .current_dir(&work)
            .envs(request.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .await?;

        let mut log = String::from_utf8_lossy(&output.stdout).to_string();
        log.push_str(&String::from_utf8_lossy(&output.stderr));
        if !output.status.success() {
            return Err(BuildError::CommandFailed {
                command: script,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let base = match &request.base_directory {
            Some(dir) => work.join(dir),
            None => work.clone(),
        };
        let selected = select_files(&base, &request.artifact_files)?;
        if selected.is_empty() {
            return Err(BuildError::NoMatchingFiles {
                patterns: request.artifact_files.clone(),
            });
        }

        let mut files: Vec<(String, PathBuf)> = selected
            .into_iter()
            .filter_map(|path| {
                let relative = relative_string(path.strip_prefix(&base).ok()?);
                Some((relative, path))
            })
            .collect();
        files.sort();
        files.dedup_by(|a, b| a.0 == b.0);

        let location = ArtifactLocation::new(
            request.output.bucket.clone(),
            format!("{}/{}", request.output.key, content_digest(&files)?),
        );
        let dest = self.store.path(&location);
        if dest.is_dir() {
            tracing::debug!(%location, "identical output already published");
        } else {
            publish(&work, &dest, &files)?;
        }

        let files = files.into_iter().map(|(relative, _)| relative).collect();
        Ok(BuildOutput {
            location,
            files,
            log,
        })
    }
}

/// Short sha256 over the sorted relative paths and their contents
fn content_digest(files: &[(String, PathBuf)]) -> Result<String, BuildError> {
    let mut hasher = Sha256::new();
    for (relative, path) in files {
        let content = fs::read(path)?;
        hasher.update(relative.as_bytes());
        hasher.update([0]);
        hasher.update((content.len() as u64).to_le_bytes());
        hasher.update(&content);
    }
    let hex = format!("{:x}", hasher.finalize());
    Ok(hex[..16].to_string())
}

/// Copy `files` into a staging directory under `work`, then move it to `dest`
fn publish(work: &Path, dest: &Path, files: &[(String, PathBuf)]) -> Result<(), BuildError> {
    let mut staging = work.as_os_str().to_owned();
    staging.push(".publish");
    let staging = PathBuf::from(staging);
    reset_dir(&staging)?;
    for (relative, path) in files {
        let target = staging.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(path, &target)?;
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match fs::rename(&staging, dest) {
        Ok(()) => Ok(()),
        // Lost a race to an identical build
        Err(_) if dest.is_dir() => {
            fs::remove_dir_all(&staging)?;
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Files under `base` matching any pattern, patterns being relative to `base`
fn select_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, BuildError> {
    if !base.is_dir() {
        return Ok(Vec::new());
    }
    let escaped = glob::Pattern::escape(&base.to_string_lossy());
    let mut selected = Vec::new();
    for pattern in patterns {
        let full = format!("{}/{}", escaped, pattern);
        let entries = glob::glob(&full).map_err(|e| BuildError::InvalidPattern {
            pattern: pattern.clone(),
            message: e.to_string(),
        })?;
        selected.extend(entries.filter_map(|entry| entry.ok()).filter(|p| p.is_file()));
    }
    Ok(selected)
}

#[cfg(test)]
#[path = "shell_tests.rs"]
mod tests;
