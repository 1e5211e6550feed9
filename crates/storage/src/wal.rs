// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Write-ahead log of execution operations
//!
//! One JSON object per line, fsynced on every append. A torn final line
//! (the process died mid-write) is dropped on replay; corruption anywhere
//! else is an error. Opening the log for writing cuts the torn line off.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use sw_core::Operation;
use thiserror::Error;

/// Errors that can occur in WAL operations
#[derive(Debug, Error)]
pub enum WalError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("corrupt WAL entry at line {line}: {source}")]
    Corrupt {
        line: usize,
        source: serde_json::Error,
    },
}

/// Append-only operation log
pub struct Wal {
    file: File,
    sequence: u64,
}

impl Wal {
    /// Open or create a WAL at the given path, creating parent directories.
    ///
    /// A torn final line is cut off so the next append starts on a fresh
    /// line.
    pub fn open(path: &Path) -> Result<Self, WalError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .read(true)
            .open(path)?;

        let scan = Self::scan(path)?;
        if file.metadata()?.len() > scan.valid_len {
            tracing::warn!(
                path = %path.display(),
                valid_len = scan.valid_len,
                "truncating torn WAL tail"
            );
            file.set_len(scan.valid_len)?;
        }
        if !scan.terminated {
            writeln!(file)?;
        }
        file.sync_all()?;

        let sequence = scan.entries.last().map(|e| e.seq).unwrap_or(0);
        Ok(Self { file, sequence })
    }

    /// Append an operation, returning its sequence number
    pub fn append(&mut self, op: &Operation) -> Result<u64, WalError> {
        let entry = WalEntry {
            seq: self.sequence + 1,
            op: op.clone(),
        };
        let line = serde_json::to_string(&entry)?;
        writeln!(self.file, "{}", line)?;
        self.file.sync_all()?;
        self.sequence = entry.seq;
        Ok(self.sequence)
    }

    /// Sequence number of the last entry written
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Replay all operations from the log, in append order
    pub fn replay(path: &Path) -> Result<Vec<Operation>, WalError> {
        Ok(Self::read_entries(path)?
            .into_iter()
            .map(|e| e.op)
            .collect())
    }

    fn read_entries(path: &Path) -> Result<Vec<WalEntry>, WalError> {
        Ok(Self::scan(path)?.entries)
    }

    fn scan(path: &Path) -> Result<Scan, WalError> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Scan::default()),
            Err(e) => return Err(e.into()),
        };

        let lines: Vec<&[u8]> = bytes.split_inclusive(|b| *b == b'\n').collect();
        let last = lines.iter().rposition(|l| !is_blank(l));

        let mut scan = Scan::default();
        let mut offset = 0u64;
        for (index, line) in lines.iter().enumerate() {
            offset += line.len() as u64;
            if is_blank(line) {
                continue;
            }
            match serde_json::from_slice::<WalEntry>(line) {
                Ok(entry) => {
                    scan.entries.push(entry);
                    scan.valid_len = offset;
                    scan.terminated = line.ends_with(b"\n");
                }
                Err(_) if Some(index) == last => break,
                Err(source) => {
                    return Err(WalError::Corrupt {
                        line: index + 1,
                        source,
                    })
                }
            }
        }
        Ok(scan)
    }
}

/// Entries up to the end of the last complete one
struct Scan {
    entries: Vec<WalEntry>,
    valid_len: u64,
    terminated: bool,
}

impl Default for Scan {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            valid_len: 0,
            terminated: true,
        }
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(u8::is_ascii_whitespace)
}

#[derive(Debug, Serialize, Deserialize)]
struct WalEntry {
    seq: u64,
    op: Operation,
}

#[cfg(test)]
#[path = "wal_tests.rs"]
mod tests;
