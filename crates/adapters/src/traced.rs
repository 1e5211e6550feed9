// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::build::{BuildAdapter, BuildError, BuildOutput, BuildRequest};
use crate::deploy::{DeployAdapter, DeployError, DeployRequest, UnitRecord};
use crate::source::{SourceAdapter, SourceError, SourceRequest, SourceSnapshot};
use async_trait::async_trait;
use sw_core::DeployOutcome;
use tracing::Instrument;

/// Wrapper that adds tracing to any SourceAdapter
#[derive(Clone)]
pub struct TracedSourceAdapter<S> {
    inner: S,
}

impl<S> TracedSourceAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: SourceAdapter> SourceAdapter for TracedSourceAdapter<S> {
    async fn fetch(&self, request: &SourceRequest) -> Result<SourceSnapshot, SourceError> {
        let span = tracing::info_span!(
            "source.fetch",
            repository = %request.repository,
            branch = %request.branch,
        );
        async {
            tracing::info!(output = %request.output, "fetching");

            // Precondition: a repository must be named
            if request.repository.trim().is_empty() {
                tracing::error!("repository is empty");
                return Err(SourceError::RepositoryNotFound(
                    "repository is empty".to_string(),
                ));
            }

            let start = std::time::Instant::now();
            let result = self.inner.fetch(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(snapshot) => tracing::info!(
                    revision = %snapshot.revision,
                    files = snapshot.files.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "fetched"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "fetch failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any BuildAdapter
#[derive(Clone)]
pub struct TracedBuildAdapter<B> {
    inner: B,
}

impl<B> TracedBuildAdapter<B> {
    pub fn new(inner: B) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<B: BuildAdapter> BuildAdapter for TracedBuildAdapter<B> {
    async fn build(&self, request: &BuildRequest) -> Result<BuildOutput, BuildError> {
        let span = tracing::info_span!("build.run", project = %request.project);
        async {
            tracing::info!(
                input = %request.input,
                commands = request.commands.len(),
                image = request.image.as_deref().unwrap_or("default"),
                "starting"
            );

            // Precondition: there must be something to run
            if request.commands.is_empty() {
                tracing::error!("no commands");
                return Err(BuildError::CommandFailed {
                    command: String::new(),
                    status: "not started".to_string(),
                    stderr: "no commands to run".to_string(),
                });
            }

            let start = std::time::Instant::now();
            let result = self.inner.build(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(output) => tracing::info!(
                    files = output.files.len(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "build succeeded"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "build failed"
                ),
            }
            if let Ok(output) = &result {
                tracing::debug!(log = %output.log, "build log");
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any DeployAdapter
#[derive(Clone)]
pub struct TracedDeployAdapter<D> {
    inner: D,
}

impl<D> TracedDeployAdapter<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: DeployAdapter> DeployAdapter for TracedDeployAdapter<D> {
    async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DeployError> {
        let span = tracing::info_span!("deploy.apply", unit = %request.unit);
        async {
            tracing::info!(
                template = %request.template,
                path = %request.template_path,
                parameters = request.parameters.len(),
                admin = request.admin_permissions,
                "applying"
            );

            let start = std::time::Instant::now();
            let result = self.inner.deploy(request).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(outcome) => tracing::info!(
                    %outcome,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "deployed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "deploy failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn units(&self) -> Result<Vec<UnitRecord>, DeployError> {
        let result = self.inner.units().await;
        tracing::trace!(count = result.as_ref().map(|v| v.len()).ok(), "listed units");
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
