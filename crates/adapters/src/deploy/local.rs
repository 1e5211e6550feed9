// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Local deploy adapter
//!
//! Keeps one `{unit}.json` record per deployment unit. A `{unit}.lock` file
//! held with an exclusive lock marks a deployment in progress.

use super::{DeployAdapter, DeployError, DeployRequest, UnitRecord};
use crate::store::LocalArtifactStore;
use async_trait::async_trait;
use fs2::FileExt;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use sw_core::DeployOutcome;

/// Resource types a deploy without admin permissions may manage
pub const DEFAULT_ALLOWED_TYPES: &[&str] = &["AWS::Lambda::*", "AWS::IAM::Role", "AWS::Logs::*"];

#[derive(Clone)]
pub struct LocalDeployAdapter {
    store: LocalArtifactStore,
    units_dir: PathBuf,
    allowed_types: Vec<String>,
}

impl LocalDeployAdapter {
    pub fn new(store: LocalArtifactStore, units_dir: PathBuf) -> Self {
        Self {
            store,
            units_dir,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn with_allowed_types(mut self, types: Vec<String>) -> Self {
        self.allowed_types = types;
        self
    }

    fn record_path(&self, unit: &str) -> PathBuf {
        self.units_dir.join(format!("{}.json", unit))
    }

    fn lock_path(&self, unit: &str) -> PathBuf {
        self.units_dir.join(format!("{}.lock", unit))
    }

    fn allowed(&self, resource_type: &str) -> bool {
        self.allowed_types.iter().any(|allowed| match allowed.strip_suffix('*') {
            Some(prefix) => resource_type.starts_with(prefix),
            None => resource_type == allowed,
        })
    }

    fn read_record(&self, unit: &str) -> Result<Option<UnitRecord>, DeployError> {
        match fs::read_to_string(self.record_path(unit)) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_record(&self, record: &UnitRecord) -> Result<(), DeployError> {
        let path = self.record_path(&record.unit);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(record)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    /// Write the unit record unless it already matches; the caller holds the lock
    fn upsert(&self, request: &DeployRequest, template: &Value) -> Result<DeployOutcome, DeployError> {
        let digest = digest(template, &request.parameters)?;
        let (outcome, version) = match self.read_record(&request.unit)? {
            None => (DeployOutcome::Created, 1),
            Some(record) if record.digest == digest => return Ok(DeployOutcome::Unchanged),
            Some(record) => (DeployOutcome::Updated, record.version + 1),
        };
        self.write_record(&UnitRecord {
            unit: request.unit.clone(),
            digest,
            template: format!("{}/{}", request.template.uri(), request.template_path),
            parameters: request.parameters.clone(),
            version,
        })?;
        Ok(outcome)
    }

    /// Parse and check the template against the request
    fn validate(&self, request: &DeployRequest, template: &Value) -> Result<(), DeployError> {
        let resources = template
            .get("Resources")
            .and_then(Value::as_object)
            .ok_or_else(|| DeployError::TemplateInvalid("missing Resources".to_string()))?;

        let declared = match template.get("Parameters") {
            None => serde_json::Map::new(),
            Some(Value::Object(map)) => map.clone(),
            Some(_) => {
                return Err(DeployError::TemplateInvalid(
                    "Parameters must be an object".to_string(),
                ))
            }
        };
        if let Some(unknown) = request.parameters.keys().find(|p| !declared.contains_key(*p)) {
            return Err(DeployError::UnknownParameter(unknown.clone()));
        }
        for (name, spec) in &declared {
            if !request.parameters.contains_key(name) && spec.get("Default").is_none() {
                return Err(DeployError::MissingParameter(name.clone()));
            }
        }

        if !request.admin_permissions {
            for resource in resources.values() {
                let resource_type = resource.get("Type").and_then(Value::as_str).unwrap_or("");
                if !self.allowed(resource_type) {
                    return Err(DeployError::PermissionDenied(resource_type.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Stack-style unit names: letters, digits and hyphens, starting with a letter
fn valid_unit_name(unit: &str) -> bool {
    unit.chars().next().is_some_and(|c| c.is_ascii_alphabetic())
        && unit.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn digest(template: &Value, parameters: &BTreeMap<String, String>) -> Result<String, DeployError> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(template)?);
    hasher.update(serde_json::to_vec(parameters)?);
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}

fn read_template(path: &Path) -> Result<Value, DeployError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DeployError::TemplateMissing(path.display().to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&content).map_err(|e| DeployError::TemplateInvalid(e.to_string()))
}

#[async_trait]
impl DeployAdapter for LocalDeployAdapter {
    async fn deploy(&self, request: &DeployRequest) -> Result<DeployOutcome, DeployError> {
        if !valid_unit_name(&request.unit) {
            return Err(DeployError::InvalidUnitName(request.unit.clone()));
        }

        let template_file = self.store.path(&request.template).join(&request.template_path);
        let template = read_template(&template_file)?;
        self.validate(request, &template)?;

        fs::create_dir_all(&self.units_dir)?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path(&request.unit))?;
        if lock.try_lock_exclusive().is_err() {
            return Err(DeployError::Conflict(request.unit.clone()));
        }

        let result = self.upsert(request, &template);
        let _ = FileExt::unlock(&lock);
        result
    }

    async fn units(&self) -> Result<Vec<UnitRecord>, DeployError> {
        let entries = match fs::read_dir(&self.units_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut units = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let content = fs::read_to_string(&path)?;
                units.push(serde_json::from_str::<UnitRecord>(&content)?);
            }
        }
        units.sort_by(|a, b| a.unit.cmp(&b.unit));
        Ok(units)
    }
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
