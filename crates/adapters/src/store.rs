// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local artifact store
//!
//! Maps `s3://{bucket}/{key}` locations onto `{root}/{bucket}/{key}`
//! directories. Collaborators write an artifact's directory exactly once;
//! consumers only read it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use sw_core::{ArtifactLocation, ArtifactName};

pub const DEFAULT_BUCKET: &str = "sw-artifacts";

#[derive(Debug, Clone)]
pub struct LocalArtifactStore {
    root: PathBuf,
    bucket: String,
}

impl LocalArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            bucket: DEFAULT_BUCKET.to_string(),
        }
    }

    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = bucket.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Where `artifact` lives under `scope` (an execution id, or
    /// `{pipeline}/{revision}` for outputs derived from a known revision)
    pub fn location_for(&self, scope: &str, artifact: &ArtifactName) -> ArtifactLocation {
        ArtifactLocation::new(self.bucket.clone(), format!("{}/{}", scope, artifact))
    }

    pub fn path(&self, location: &ArtifactLocation) -> PathBuf {
        self.root.join(&location.bucket).join(&location.key)
    }

    /// Scratch directory for a build writing to `output`
    pub fn work_dir(&self, output: &ArtifactLocation) -> PathBuf {
        self.root
            .join(".work")
            .join(&output.bucket)
            .join(&output.key)
    }

    /// Relative paths of every file in the artifact, sorted, `/`-separated.
    /// A location that was never written lists as empty.
    pub fn list_files(&self, location: &ArtifactLocation) -> io::Result<Vec<String>> {
        let dir = self.path(location);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        collect_files(&dir, &dir, &mut files)?;
        files.sort();
        Ok(files)
    }

    /// Empty (or create) the directory for `location` before writing to it
    pub fn prepare(&self, location: &ArtifactLocation) -> io::Result<PathBuf> {
        let dir = self.path(location);
        reset_dir(&dir)?;
        Ok(dir)
    }
}

/// Remove `dir` if present and recreate it empty
pub fn reset_dir(dir: &Path) -> io::Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    fs::create_dir_all(dir)
}

/// Recursively copy the contents of `from` into `to`
pub fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

fn collect_files(base: &Path, dir: &Path, files: &mut Vec<String>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(base, &path, files)?;
        } else if let Ok(relative) = path.strip_prefix(base) {
            files.push(relative_string(relative));
        }
    }
    Ok(())
}

pub(crate) fn relative_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
