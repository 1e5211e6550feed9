// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deploy-time parameter bindings
//!
//! A binding is declared when the pipeline is defined, naming a template
//! parameter and the artifact whose location will fill it. The location only
//! exists once the producing build action has run, so resolution is a pure
//! function called by the deploy action right before it applies the template.

use crate::artifact::{ArtifactLocation, ArtifactName};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which part of an artifact location a parameter receives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationField {
    /// The full `s3://bucket/key` URI
    Uri,
    Bucket,
    ObjectKey,
}

/// A template parameter bound to an artifact's eventual location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterBinding {
    pub parameter: String,
    pub artifact: ArtifactName,
    #[serde(default = "default_field")]
    pub field: LocationField,
}

fn default_field() -> LocationField {
    LocationField::Uri
}

impl ParameterBinding {
    pub fn new(parameter: impl Into<String>, artifact: ArtifactName, field: LocationField) -> Self {
        Self {
            parameter: parameter.into(),
            artifact,
            field,
        }
    }

    /// Bind the whole location URI to a single parameter
    pub fn uri(parameter: impl Into<String>, artifact: ArtifactName) -> Self {
        Self::new(parameter, artifact, LocationField::Uri)
    }

    pub fn resolve(&self, location: &ArtifactLocation) -> String {
        match self.field {
            LocationField::Uri => location.uri(),
            LocationField::Bucket => location.bucket.clone(),
            LocationField::ObjectKey => location.key.clone(),
        }
    }
}

/// Resolve every binding against the locations known at deploy time.
///
/// Returns the name of the first artifact without a location on failure.
pub fn resolve_all<'a, F>(
    bindings: &[ParameterBinding],
    mut locate: F,
) -> Result<BTreeMap<String, String>, ArtifactName>
where
    F: FnMut(&ArtifactName) -> Option<&'a ArtifactLocation>,
{
    let mut resolved = BTreeMap::new();
    for binding in bindings {
        let location = locate(&binding.artifact).ok_or_else(|| binding.artifact.clone())?;
        resolved.insert(binding.parameter.clone(), binding.resolve(location));
    }
    Ok(resolved)
}

/// Function code supplied through two template parameters (bucket + key)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeParameters {
    pub bucket_parameter: String,
    pub object_key_parameter: String,
}

impl Default for CodeParameters {
    fn default() -> Self {
        Self {
            bucket_parameter: "LambdaSourceBucketNameParameter".to_string(),
            object_key_parameter: "LambdaSourceObjectKeyParameter".to_string(),
        }
    }
}

impl CodeParameters {
    /// Bindings that point the function code at `artifact`
    pub fn assign(&self, artifact: &ArtifactName) -> Vec<ParameterBinding> {
        vec![
            ParameterBinding::new(
                self.bucket_parameter.clone(),
                artifact.clone(),
                LocationField::Bucket,
            ),
            ParameterBinding::new(
                self.object_key_parameter.clone(),
                artifact.clone(),
                LocationField::ObjectKey,
            ),
        ]
    }
}
