// src/registry/mod.rs

//! Component registry for one build configuration
//!
//! The registry is the set of components that exist for a given feature
//! set and build settings, with conditional dependencies already merged in
//! and the requirement graph validated once at construction.
//!
//! # Usage
//!
//! ```ignore
//! use acetao::{build_registry, BuildSettings, FeatureSet};
//!
//! let features = FeatureSet::empty().with_feature("zlib");
//! let registry = build_registry(&features, &BuildSettings::default())?;
//!
//! let ace = registry.get("ACE")?;
//! assert!(ace.system_dependencies.contains("z"));
//! assert!(registry.contains("TAO_ZlibCompressor"));
//! ```
//!
//! Construction is a pure function of its inputs: it touches no files and
//! holds no shared state, so independent callers never need to coordinate.

mod builder;
mod component;
pub mod graph;

pub use builder::{CheckReport, CheckResult, MAX_CHECK_FEATURES, RegistryBuilder, build_registry};
pub use component::Component;
pub use graph::ComponentGraph;

use crate::error::{Error, Result};
use crate::feature::FeatureSet;
use crate::settings::BuildSettings;
use std::collections::{BTreeMap, BTreeSet};

/// Validated, immutable set of components
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    /// Arena of components sorted by id
    components: Vec<Component>,
    /// Component id to arena index
    index: BTreeMap<String, usize>,
    graph: ComponentGraph,
    features: FeatureSet,
    settings: BuildSettings,
}

impl Registry {
    pub(crate) fn from_parts(
        mut components: Vec<Component>,
        graph: ComponentGraph,
        features: FeatureSet,
        settings: BuildSettings,
    ) -> Self {
        components.sort_by(|a, b| a.id.cmp(&b.id));
        let index = components
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Self {
            components,
            index,
            graph,
            features,
            settings,
        }
    }

    /// Number of components present
    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Look up a component by id
    pub fn get(&self, id: &str) -> Result<&Component> {
        self.index
            .get(id)
            .map(|&i| &self.components[i])
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Components in id order
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Component ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.components.iter().map(|c| c.id.as_str())
    }

    /// Components that require nothing else in the registry
    pub fn roots(&self) -> Vec<&Component> {
        self.components.iter().filter(|c| c.is_root()).collect()
    }

    /// Ids of components that directly require `id`
    pub fn dependents(&self, id: &str) -> Result<BTreeSet<String>> {
        self.graph
            .dependents(id)
            .cloned()
            .ok_or_else(|| Error::NotFound(id.to_string()))
    }

    /// Every component `id` needs, directly or transitively
    pub fn transitive_dependencies(&self, id: &str) -> Result<BTreeSet<String>> {
        self.get(id)?;
        Ok(self.graph.transitive_dependencies(id))
    }

    /// Every system library `id` needs once its requirements are linked too
    pub fn transitive_system_dependencies(&self, id: &str) -> Result<BTreeSet<String>> {
        let mut libs = self.get(id)?.system_dependencies.clone();
        for dep in self.graph.transitive_dependencies(id) {
            libs.extend(self.get(&dep)?.system_dependencies.iter().cloned());
        }
        Ok(libs)
    }

    /// All component ids ordered so requirements come first
    pub fn link_order(&self) -> Result<Vec<String>> {
        self.graph.topological_sort()
    }

    /// The requirement graph
    pub fn graph(&self) -> &ComponentGraph {
        &self.graph
    }

    /// The feature set this registry was built for
    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// The build settings this registry was built for
    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Hand the components over as a plain `id -> Component` mapping
    pub fn into_map(self) -> BTreeMap<String, Component> {
        self.components
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = &'a Component;
    type IntoIter = std::slice::Iter<'a, Component>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}
