// src/manifest/parser.rs

//! Manifest parsing and validation

use crate::error::{ConsistencyError, Error, Result};
use crate::manifest::format::Manifest;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Component table for ACE+TAO, compiled into the binary
const BUILTIN_MANIFEST: &str = include_str!("../../data/ace-tao.toml");

/// Parse a manifest from a TOML string
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    toml::from_str(content).map_err(|e| Error::ParseError(format!("Invalid manifest: {}", e)))
}

/// Parse a manifest from a file
pub fn parse_manifest_file(path: &Path) -> Result<Manifest> {
    debug!("Loading component manifest from {}", path.display());
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::IoError(format!(
            "Failed to read manifest file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_manifest(&content)
}

/// Parse the embedded ACE+TAO manifest
pub fn builtin_manifest() -> Result<Manifest> {
    parse_manifest(BUILTIN_MANIFEST)
}

/// Validate the parts of a manifest that do not depend on a feature set
///
/// Hard errors are returned as `Err`; soft issues come back as warnings.
pub fn validate_manifest(manifest: &Manifest) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    if manifest.package.name.is_empty() {
        return Err(Error::ParseError(
            "Manifest package name cannot be empty".to_string(),
        ));
    }
    if manifest.package.version.is_empty() {
        return Err(Error::ParseError(
            "Manifest package version cannot be empty".to_string(),
        ));
    }

    let mut declared = HashSet::new();
    for feature in &manifest.features {
        if !declared.insert(feature.name.as_str()) {
            return Err(Error::ParseError(format!(
                "Feature '{}' is declared more than once",
                feature.name
            )));
        }
    }

    let mut ids = HashSet::new();
    let mut used_features = HashSet::new();
    for def in &manifest.components {
        if def.id.is_empty() {
            return Err(Error::ParseError("Component id cannot be empty".to_string()));
        }
        if !ids.insert(def.id.as_str()) {
            return Err(ConsistencyError::DuplicateComponent { id: def.id.clone() }.into());
        }
        for feature in def.gate_features() {
            if !manifest.declares_feature(feature) {
                return Err(ConsistencyError::UnknownGateFeature {
                    component: def.id.clone(),
                    feature: feature.to_string(),
                }
                .into());
            }
            used_features.insert(feature);
        }
        if def.requires.iter().any(|r| r == &def.id) {
            return Err(ConsistencyError::Cycle {
                path: vec![def.id.clone(), def.id.clone()],
            }
            .into());
        }
        if def.conditional.iter().any(|c| c.gate.is_always()) {
            warnings.push(format!(
                "Component {} has an unconditional 'when' entry",
                def.id
            ));
        }
    }

    for feature in &manifest.features {
        if !used_features.contains(feature.name.as_str()) {
            warnings.push(format!(
                "Feature {} does not gate any component",
                feature.name
            ));
        }
        if feature.package.is_none() {
            warnings.push(format!(
                "Feature {} does not name an external package",
                feature.name
            ));
        }
    }

    if manifest.package.summary.is_none() {
        warnings.push("Missing package summary".to_string());
    }

    Ok(warnings)
}
