// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared logical clock for ordering assertions across fakes
#![cfg_attr(coverage_nightly, coverage(off))]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Monotonic counter shared between fake adapters.
///
/// Each fake stamps the start and end of every call, so tests can assert
/// that one call finished before another began.
#[derive(Clone, Debug, Default)]
pub struct Ticker {
    counter: Arc<AtomicU64>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}
