// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Stagewright execution engine

mod cancel;
mod error;
mod executor;
mod job;
mod runtime;

pub use cancel::CancelHandle;
pub use error::RuntimeError;
pub use executor::{ExecuteError, Executor};
pub use job::Job;
pub use runtime::{Runtime, RuntimeDeps};
