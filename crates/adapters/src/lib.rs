// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Collaborators that fetch sources, run builds and apply templates

pub mod build;
pub mod deploy;
pub mod source;
pub mod store;
pub mod traced;

pub use build::{BuildAdapter, BuildError, BuildOutput, BuildRequest, ShellBuildAdapter};
pub use deploy::{DeployAdapter, DeployError, DeployRequest, LocalDeployAdapter, UnitRecord};
pub use source::{GitSourceAdapter, SourceAdapter, SourceError, SourceRequest, SourceSnapshot};
pub use store::LocalArtifactStore;
pub use traced::{TracedBuildAdapter, TracedDeployAdapter, TracedSourceAdapter};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod ticker;
#[cfg(any(test, feature = "test-support"))]
pub use build::{BuildCall, FakeBuildAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use deploy::{DeployCall, FakeDeployAdapter};
#[cfg(any(test, feature = "test-support"))]
pub use source::{FakeSourceAdapter, SourceCall};
#[cfg(any(test, feature = "test-support"))]
pub use ticker::Ticker;
