// src/registry/builder.rs

//! Registry construction: gate, merge, validate

use crate::error::{ConsistencyError, Error, Result};
use crate::feature::FeatureSet;
use crate::manifest::{ComponentDef, Manifest, builtin_manifest, validate_manifest};
use crate::registry::component::Component;
use crate::registry::graph::ComponentGraph;
use crate::registry::Registry;
use crate::settings::BuildSettings;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Build the ACE+TAO registry for a feature set and build settings
///
/// Uses the embedded manifest. Identical inputs always produce an
/// identical registry.
pub fn build_registry(features: &FeatureSet, settings: &BuildSettings) -> Result<Registry> {
    let manifest = builtin_manifest()?;
    RegistryBuilder::new(&manifest).build(features, settings)
}

/// Feature combinations are enumerated exhaustively; keep that bounded
pub const MAX_CHECK_FEATURES: usize = 16;

/// Builds registries from one manifest
#[derive(Debug, Clone, Copy)]
pub struct RegistryBuilder<'a> {
    manifest: &'a Manifest,
}

impl<'a> RegistryBuilder<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        Self { manifest }
    }

    /// Produce the validated component set for one configuration
    ///
    /// Errors:
    /// - `ConfigurationError` for a feature outside the manifest's closed
    ///   list or an unsupported operating system
    /// - `ConsistencyError` for a dangling requirement or a cycle left
    ///   after gating
    pub fn build(&self, features: &FeatureSet, settings: &BuildSettings) -> Result<Registry> {
        self.manifest.check_request(features, settings)?;
        self.validate()?;
        self.assemble(features, settings)
    }

    /// Validate the manifest once, logging its warnings
    pub fn validate(&self) -> Result<Vec<String>> {
        let warnings = validate_manifest(self.manifest)?;
        for warning in &warnings {
            warn!(
                "{} {}: {}",
                self.manifest.package.name, self.manifest.package.version, warning
            );
        }
        Ok(warnings)
    }

    /// Build the registry for every subset of the closed feature list
    ///
    /// The manifest is validated once up front; a structural defect there
    /// fails the whole check. Every combination then gets its own outcome
    /// so request problems and authoring defects can be told apart.
    pub fn check_all(&self, settings: &BuildSettings) -> Result<CheckReport> {
        let names = self.manifest.feature_names();
        if names.len() > MAX_CHECK_FEATURES {
            return Err(Error::ConfigurationError(format!(
                "{} declares {} features; at most {} can be checked exhaustively",
                self.manifest.package.name,
                names.len(),
                MAX_CHECK_FEATURES
            )));
        }

        let warnings = self.validate()?;
        let mut results = Vec::with_capacity(1 << names.len());

        for mask in 0..(1u32 << names.len()) {
            let features: FeatureSet = names
                .iter()
                .enumerate()
                .filter(|(bit, _)| mask & (1u32 << *bit) != 0)
                .map(|(_, name)| *name)
                .collect();

            let outcome = self
                .manifest
                .check_request(&features, settings)
                .and_then(|()| self.assemble(&features, settings))
                .map(|registry| registry.len());
            if let Err(e) = &outcome {
                debug!("Registry for {} failed: {}", features, e);
            }
            results.push(CheckResult { features, outcome });
        }

        Ok(CheckReport { warnings, results })
    }

    /// Gate, merge and check one configuration of an already validated manifest
    fn assemble(&self, features: &FeatureSet, settings: &BuildSettings) -> Result<Registry> {
        let mut components: BTreeMap<String, Component> = BTreeMap::new();
        for def in &self.manifest.components {
            if !def.gate.evaluate(features) {
                debug!("Gating out {} ({} not satisfied)", def.id, def.gate);
                continue;
            }
            components.insert(def.id.clone(), resolve(def, features));
        }

        let graph = check_consistency(&components)?;

        info!(
            "Built {} {} registry: {} components, features {}, {} build",
            self.manifest.package.name,
            self.manifest.package.version,
            components.len(),
            features,
            settings.build_type
        );

        Ok(Registry::from_parts(
            components.into_values().collect(),
            graph,
            features.clone(),
            settings.clone(),
        ))
    }
}

/// Outcome of building one feature combination
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub features: FeatureSet,
    /// Component count, or why the registry could not be built
    pub outcome: Result<usize>,
}

/// Results of [`RegistryBuilder::check_all`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Manifest warnings, reported once
    pub warnings: Vec<String>,
    /// One entry per feature combination, empty set first
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// Combinations rejected as bad requests (feature or platform)
    pub fn configuration_failures(&self) -> usize {
        self.count(Error::is_configuration)
    }

    /// Combinations whose gated table is inconsistent
    pub fn consistency_failures(&self) -> usize {
        self.count(Error::is_consistency)
    }

    /// True when every combination built
    pub fn is_clean(&self) -> bool {
        self.results.iter().all(|r| r.outcome.is_ok())
    }

    fn count(&self, kind: fn(&Error) -> bool) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome.as_ref().err().is_some_and(kind))
            .count()
    }
}

/// Turn a manifest row into a component, merging satisfied conditionals
fn resolve(def: &ComponentDef, features: &FeatureSet) -> Component {
    let mut component = Component::new(def.id.clone());
    component.artifact_names = def.artifact_names();
    component.feature_gate = def.gate.clone();
    component.system_dependencies.extend(def.system_libs.iter().cloned());
    component.component_dependencies.extend(def.requires.iter().cloned());
    component.external_requirements.extend(def.external.iter().cloned());

    for extra in def.conditional.iter().filter(|c| c.gate.evaluate(features)) {
        debug!("Merging {} dependencies into {}", extra.gate, def.id);
        component.system_dependencies.extend(extra.system_libs.iter().cloned());
        component.component_dependencies.extend(extra.requires.iter().cloned());
        component.external_requirements.extend(extra.external.iter().cloned());
    }

    component
}

/// Referential integrity, then acyclicity
fn check_consistency(components: &BTreeMap<String, Component>) -> Result<ComponentGraph> {
    let mut graph = ComponentGraph::new();

    for component in components.values() {
        if let Some(missing) = component
            .component_dependencies
            .iter()
            .find(|dep| !components.contains_key(*dep))
        {
            return Err(ConsistencyError::Dangling {
                component: component.id.clone(),
                missing: missing.clone(),
            }
            .into());
        }
        graph.add_component(
            &component.id,
            component.component_dependencies.iter().map(String::as_str),
        );
    }

    graph.ensure_acyclic()?;
    Ok(graph)
}
