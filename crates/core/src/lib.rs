// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sw-core: pipeline topology and execution state machine
//!
//! This crate provides:
//! - Artifacts, actions, stages and the validated pipeline definition
//! - The pure execution state machine (events in, effects out)
//! - WAL operations and the failure taxonomy
//! - The serverless function blueprint

pub mod action;
pub mod artifact;
pub mod binding;
pub mod blueprint;
pub mod clock;
pub mod deployment;
pub mod effect;
pub mod event;
pub mod execution;
pub mod failure;
pub mod id;
pub mod operation;
pub mod pipeline;
pub mod stage;

pub use action::{Action, ActionConfig, ActionKind, BuildConfig, DeployConfig, SourceConfig};
pub use artifact::{ArtifactLocation, ArtifactName, ArtifactPath, ArtifactRecord, ArtifactState};
pub use binding::{resolve_all, CodeParameters, LocationField, ParameterBinding};
pub use blueprint::{serverless_pipeline, BlueprintConfig};
pub use clock::{Clock, FakeClock, SystemClock};
pub use deployment::{DeployOutcome, DeploymentRecord};
pub use effect::Effect;
pub use event::{ActionResult, Event, ProducedArtifact};
pub use execution::{ActionRun, Execution, ExecutionStatus, StageRun};
pub use failure::{ActionFailure, FailureKind, FailureRecord};
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use operation::{ActionLayout, Operation, StageLayout};
pub use pipeline::{DefinitionError, Pipeline, PipelineBuilder};
pub use stage::{Stage, StageStatus};
