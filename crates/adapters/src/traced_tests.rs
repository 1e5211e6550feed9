// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::build::FakeBuildAdapter;
use crate::deploy::FakeDeployAdapter;
use crate::source::FakeSourceAdapter;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use sw_core::ArtifactLocation;
use tracing_subscriber::fmt::MakeWriter;

/// A writer that captures log output for testing
#[derive(Clone, Default)]
struct CapturedLogs {
    logs: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    fn new() -> Self {
        Self::default()
    }

    fn contents(&self) -> String {
        let logs = self.logs.lock().unwrap();
        String::from_utf8_lossy(&logs).to_string()
    }
}

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.logs.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run a test with captured tracing output
fn with_tracing<F, Fut>(f: F) -> (String, Fut::Output)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future,
{
    let logs = CapturedLogs::new();
    let logs_clone = logs.clone();

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_writer(logs_clone)
        .with_ansi(false)
        .without_time()
        .finish();

    let result = tracing::subscriber::with_default(subscriber, || {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(f())
    });

    (logs.contents(), result)
}

fn source_request(repository: &str) -> SourceRequest {
    SourceRequest {
        repository: repository.to_string(),
        branch: "main".to_string(),
        output: ArtifactLocation::new("b", "exec-1/source_output"),
    }
}

fn build_request(commands: &[&str]) -> BuildRequest {
    BuildRequest {
        project: "CdkBuildProject".to_string(),
        image: Some("STANDARD_5_0".to_string()),
        input: ArtifactLocation::new("b", "exec-1/source_output"),
        commands: commands.iter().map(|c| c.to_string()).collect(),
        artifact_files: vec!["LambdaStack.template.json".to_string()],
        base_directory: None,
        output: ArtifactLocation::new("b", "exec-1/cdk_build_output"),
        env: Vec::new(),
    }
}

fn deploy_request() -> DeployRequest {
    DeployRequest {
        unit: "LambdaStackDeployedName".to_string(),
        template: ArtifactLocation::new("b", "exec-1/cdk_build_output"),
        template_path: "LambdaStack.template.json".to_string(),
        parameters: BTreeMap::new(),
        admin_permissions: true,
    }
}

// =============================================================================
// Precondition validation tests
// =============================================================================

#[tokio::test]
async fn traced_source_rejects_empty_repository() {
    let fake = FakeSourceAdapter::new();
    let traced = TracedSourceAdapter::new(fake.clone());

    let err = traced.fetch(&source_request("  ")).await.unwrap_err();
    assert!(
        err.to_string().contains("repository is empty"),
        "Expected error about repository, got: {}",
        err
    );
    // Inner adapter never called
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn traced_build_rejects_empty_commands() {
    let fake = FakeBuildAdapter::new();
    let traced = TracedBuildAdapter::new(fake.clone());

    let err = traced.build(&build_request(&[])).await.unwrap_err();
    assert!(err.to_string().contains("no commands to run"));
    assert!(fake.calls().is_empty());
}

// =============================================================================
// Tracing output verification tests
// =============================================================================

#[test]
fn traced_source_logs_entry_and_completion() {
    let (logs, result) = with_tracing(|| async {
        let traced = TracedSourceAdapter::new(FakeSourceAdapter::new());
        traced.fetch(&source_request("CodeRepo")).await
    });

    assert!(result.is_ok(), "fetch should succeed: {:?}", result);
    assert!(
        logs.contains("source.fetch"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("CodeRepo"),
        "Should log repository. Logs:\n{}",
        logs
    );
    assert!(logs.contains("fetching"), "Should log entry. Logs:\n{}", logs);
    assert!(logs.contains("fetched"), "Should log completion. Logs:\n{}", logs);
    assert!(
        logs.contains("elapsed_ms"),
        "Should log timing. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_build_logs_failure() {
    let (logs, result) = with_tracing(|| async {
        let fake = FakeBuildAdapter::new();
        fake.set_failure("CdkBuildProject", "synth exploded");
        TracedBuildAdapter::new(fake)
            .build(&build_request(&["npx aws-cdk synth"]))
            .await
    });

    assert!(result.is_err());
    assert!(
        logs.contains("build.run"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("build failed"),
        "Should log failure. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("synth exploded"),
        "Should log the error. Logs:\n{}",
        logs
    );
}

#[test]
fn traced_deploy_logs_outcome() {
    let (logs, result) = with_tracing(|| async {
        TracedDeployAdapter::new(FakeDeployAdapter::new())
            .deploy(&deploy_request())
            .await
    });

    assert!(result.is_ok());
    assert!(
        logs.contains("deploy.apply"),
        "Should log span name. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("LambdaStackDeployedName"),
        "Should log unit. Logs:\n{}",
        logs
    );
    assert!(
        logs.contains("created"),
        "Should log outcome. Logs:\n{}",
        logs
    );
}
